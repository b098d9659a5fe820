mod extractor;
mod label;
mod path;

pub use extractor::{
    position, predicate_lemma, role_class, Extraction, Feature, FeatureExtractor, Record,
};
pub use label::{normalize, TAG_SEPARATOR};
pub use path::{tree_path, DOWN, UP};

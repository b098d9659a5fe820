//! Feature records for semantic-role classification.
//!
//! Annotated predicate instances are turned into one [`Record`] per argument
//! (predicate lemma, tree path, phrase type, position, voice and role class)
//! and collected in a [`Dataset`] that is written as ARFF relation files,
//! optionally split into consecutive train/dev/test partitions.

pub mod corpus;
pub mod dataset;
pub mod error;
pub mod feature;

pub use corpus::{AnnotatedInstance, SpanPointer, Tree, Voice};
pub use dataset::{AttributeDomain, Dataset, Remainder, WriteReport};
pub use error::{Error, Result};
pub use feature::{Feature, FeatureExtractor, Record};

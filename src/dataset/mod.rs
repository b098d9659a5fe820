mod argument;
mod arff;
pub mod ipc;
mod traits;

pub use argument::{ArgumentBuilder, ExtractArgs};
pub use arff::{
    parse_attribute_line, partition_bounds, quote, AttributeDomain, Dataset, Remainder,
    WriteReport,
};
pub use traits::{BuildSummary, IDataset};

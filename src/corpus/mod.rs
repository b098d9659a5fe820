mod instance;
mod pointer;
mod tree;

pub use instance::{parse_instances, read_instances, AnnotatedInstance, Argument, Corpus, Voice};
pub use pointer::{SpanPointer, TreeAddress, PLACEHOLDER_LABELS};
pub use tree::{Node, NodeId, NodeSpec, Tree};

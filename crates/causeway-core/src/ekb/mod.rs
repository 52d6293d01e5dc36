pub mod context;
pub mod matcher;
pub mod processor;
pub mod resolver;
pub mod tree;

pub use context::DocumentContext;
pub use matcher::{Candidate, PatternMatcher, Polarity};
pub use processor::{CausalExtractor, ExtractionOutput, ExtractionStats};
pub use resolver::{ConceptResolver, Resolved, ResolutionGuard};
pub use tree::{DocumentTree, Node, NodeId, NodeKind};

pub mod concept;
pub mod config;
pub mod ekb;
pub mod error;
pub mod evidence;
pub mod grounding;
pub mod statement;

pub use concept::{Concept, Grounding, Groundings, TEXT_NAMESPACE};
pub use config::ExtractionConfig;
pub use ekb::{CausalExtractor, DocumentTree, ExtractionOutput, ExtractionStats, NodeKind};
pub use error::{Error, Result};
pub use evidence::{Epistemics, Evidence};
pub use grounding::{GroundingLookup, MappingEntry, OntologyMap};
pub use statement::Statement;

/// Extract causal statements from one serialized document under the
/// default configuration.
#[must_use]
pub fn extract(xml: &str) -> Vec<Statement> {
    CausalExtractor::new().extract(xml).statements
}

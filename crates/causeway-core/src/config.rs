use serde::{Deserialize, Serialize};

/// Knobs for a single extraction run. A default config matches the
/// reader's stock behavior; tests swap in their own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Namespace under which reader-assigned ontology types are grounded.
    pub reader_namespace: String,
    /// Upper bound on argument-reference recursion. Well-formed documents
    /// never get near it; a reference cycle in a malformed document trips it.
    pub max_resolution_depth: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            reader_namespace: "EKB".to_string(),
            max_resolution_depth: 32,
        }
    }
}

impl ExtractionConfig {
    #[must_use]
    pub fn with_reader_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.reader_namespace = namespace.into();
        self
    }

    #[must_use]
    pub fn with_max_resolution_depth(mut self, depth: usize) -> Self {
        self.max_resolution_depth = depth;
        self
    }
}

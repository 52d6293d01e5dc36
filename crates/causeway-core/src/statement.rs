use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::concept::Concept;
use crate::evidence::Evidence;

/// A causal influence of one concept on another. `polarity` is `None` for
/// an unspecified/positive influence and `Some(-1)` for a negative one
/// (inhibition or decrease). Evidence never participates in identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Statement {
    pub subject: Concept,
    pub object: Concept,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub polarity: Option<i32>,
    pub evidence: Vec<Evidence>,
}

impl Statement {
    #[must_use]
    pub fn new(subject: Concept, object: Concept) -> Self {
        Self {
            subject,
            object,
            polarity: None,
            evidence: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_polarity(mut self, polarity: Option<i32>) -> Self {
        self.polarity = polarity;
        self
    }

    #[must_use]
    pub fn with_evidence(mut self, evidence: Evidence) -> Self {
        self.evidence.push(evidence);
        self
    }

    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.polarity == Some(-1)
    }

    /// Content address over (subject, object, polarity), excluding evidence.
    /// Stable across processes, so downstream stores can key on it.
    #[must_use]
    pub fn canonical_hash(&self) -> String {
        let mut canonical = String::new();
        canonical.push_str(&self.subject.name);
        canonical.push('\u{1}');
        self.subject.groundings.write_canonical(&mut canonical);
        canonical.push('\u{1}');
        canonical.push_str(&self.object.name);
        canonical.push('\u{1}');
        self.object.groundings.write_canonical(&mut canonical);
        canonical.push('\u{1}');
        match self.polarity {
            Some(p) => canonical.push_str(&p.to_string()),
            None => canonical.push('_'),
        }

        let mut hasher = Sha256::new();
        hasher.update(canonical.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

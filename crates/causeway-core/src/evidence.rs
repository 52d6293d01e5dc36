use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Flags qualifying how an evidence sentence supports its statement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Epistemics {
    /// Whether the statement is asserted directly by the sentence. This
    /// engine only extracts indirect noun-level relations, so it always
    /// records false.
    pub direct: bool,
}

/// The source text that licensed an extraction, with enough document
/// coordinates to find it again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evidence {
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_type: Option<String>,
    pub epistemics: Epistemics,
}

impl Evidence {
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: Uuid::now_v7(),
            document_id: None,
            text: None,
            section_type: None,
            epistemics: Epistemics::default(),
        }
    }

    #[must_use]
    pub fn with_document_id(mut self, document_id: impl Into<String>) -> Self {
        self.document_id = Some(document_id.into());
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    #[must_use]
    pub fn with_section_type(mut self, section_type: impl Into<String>) -> Self {
        self.section_type = Some(section_type.into());
        self
    }
}

impl Default for Evidence {
    fn default() -> Self {
        Self::new()
    }
}

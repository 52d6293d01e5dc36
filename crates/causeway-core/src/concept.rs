use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Namespace used to ground a concept in its own surface text.
pub const TEXT_NAMESPACE: &str = "TEXT";

/// A single grounding entry: an identifier in some ontology namespace,
/// optionally carrying the mapper's confidence in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grounding {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl Grounding {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            score: None,
        }
    }

    #[must_use]
    pub fn scored(id: impl Into<String>, score: f64) -> Self {
        Self {
            id: id.into(),
            score: Some(score),
        }
    }
}

/// Namespace-keyed grounding table. Ordered so serialized output and the
/// canonical hash are stable regardless of insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Groundings(BTreeMap<String, Vec<Grounding>>);

impl Groundings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, namespace: impl Into<String>, grounding: Grounding) {
        self.0.entry(namespace.into()).or_default().push(grounding);
    }

    #[must_use]
    pub fn contains_namespace(&self, namespace: &str) -> bool {
        self.0.contains_key(namespace)
    }

    #[must_use]
    pub fn get(&self, namespace: &str) -> Option<&[Grounding]> {
        self.0.get(namespace).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Grounding])> {
        self.0.iter().map(|(ns, g)| (ns.as_str(), g.as_slice()))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Deterministic flat rendering, used by the canonical statement hash.
    pub(crate) fn write_canonical(&self, out: &mut String) {
        for (namespace, groundings) in &self.0 {
            for grounding in groundings {
                out.push_str(namespace);
                out.push('=');
                out.push_str(&grounding.id);
                if let Some(score) = grounding.score {
                    out.push('@');
                    out.push_str(&format!("{score:?}"));
                }
                out.push(';');
            }
        }
    }
}

/// A named entity reference with its grounding table. Every resolution
/// produces a fresh value; concepts are never merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Concept {
    pub name: String,
    #[serde(default, skip_serializing_if = "Groundings::is_empty")]
    pub groundings: Groundings,
}

impl Concept {
    /// A concept grounded only in its own surface text.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let mut groundings = Groundings::new();
        groundings.insert(TEXT_NAMESPACE, Grounding::new(name.clone()));
        Self { name, groundings }
    }

    #[must_use]
    pub fn with_grounding(mut self, namespace: impl Into<String>, grounding: Grounding) -> Self {
        self.groundings.insert(namespace, grounding);
        self
    }
}

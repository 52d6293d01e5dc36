use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::concept::{Concept, Grounding};
use crate::statement::Statement;

/// Read-only lookup from one (namespace, identifier) pair to equivalent
/// identifiers in other namespaces. Injected into whatever consumes it so
/// tests can swap the table.
pub trait GroundingLookup {
    fn lookup(&self, namespace: &str, id: &str) -> Vec<(String, Grounding)>;
}

/// One directed cross-ontology equivalence, as loaded from a mapping table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingEntry {
    pub from_namespace: String,
    pub from_id: String,
    pub to_namespace: String,
    pub to_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl MappingEntry {
    #[must_use]
    pub fn new(
        from_namespace: impl Into<String>,
        from_id: impl Into<String>,
        to_namespace: impl Into<String>,
        to_id: impl Into<String>,
    ) -> Self {
        Self {
            from_namespace: from_namespace.into(),
            from_id: from_id.into(),
            to_namespace: to_namespace.into(),
            to_id: to_id.into(),
            score: None,
        }
    }

    #[must_use]
    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }
}

/// Immutable cross-ontology map. Built once from an injected entry list;
/// when symmetric, the reverse of every pair is inserted during
/// construction rather than patched in later. Lookups are index-backed.
#[derive(Debug, Clone, Default)]
pub struct OntologyMap {
    forward: HashMap<(String, String), Vec<(String, Grounding)>>,
}

impl OntologyMap {
    #[must_use]
    pub fn new(entries: Vec<MappingEntry>, symmetric: bool) -> Self {
        let mut forward: HashMap<(String, String), Vec<(String, Grounding)>> = HashMap::new();

        let mut insert = |from: (String, String), to_ns: String, to: Grounding| {
            let targets = forward.entry(from).or_default();
            if !targets.iter().any(|(ns, g)| *ns == to_ns && g.id == to.id) {
                targets.push((to_ns, to));
            }
        };

        for entry in entries {
            let to = match entry.score {
                Some(score) => Grounding::scored(entry.to_id.clone(), score),
                None => Grounding::new(entry.to_id.clone()),
            };
            insert(
                (entry.from_namespace.clone(), entry.from_id.clone()),
                entry.to_namespace.clone(),
                to,
            );

            if symmetric {
                let back = match entry.score {
                    Some(score) => Grounding::scored(entry.from_id, score),
                    None => Grounding::new(entry.from_id),
                };
                insert(
                    (entry.to_namespace, entry.to_id),
                    entry.from_namespace,
                    back,
                );
            }
        }

        Self { forward }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Augment every concept in `statements` with mapped groundings.
    /// Namespaces a concept already carries are left untouched.
    pub fn apply(&self, statements: &mut [Statement]) {
        for statement in statements {
            self.apply_concept(&mut statement.subject);
            self.apply_concept(&mut statement.object);
        }
    }

    fn apply_concept(&self, concept: &mut Concept) {
        let mut mapped = Vec::new();
        for (namespace, groundings) in concept.groundings.iter() {
            for grounding in groundings {
                mapped.extend(self.lookup(namespace, &grounding.id));
            }
        }

        for (namespace, grounding) in mapped {
            if concept.groundings.contains_namespace(&namespace) {
                continue;
            }
            concept.groundings.insert(namespace, grounding);
        }
    }
}

impl GroundingLookup for OntologyMap {
    fn lookup(&self, namespace: &str, id: &str) -> Vec<(String, Grounding)> {
        let key = (namespace.to_string(), id.to_string());
        if let Some(targets) = self.forward.get(&key) {
            return targets.clone();
        }
        // Mapping tables are lowercased inconsistently at their source.
        let lowered = (namespace.to_string(), id.to_lowercase());
        self.forward.get(&lowered).cloned().unwrap_or_default()
    }
}

use std::collections::HashSet;

use crate::concept::{Concept, Grounding};
use crate::config::ExtractionConfig;
use crate::statement::Statement;

use super::tree::{DocumentTree, Node, NodeId};

/// What an argument reference resolved to: a plain grounded concept, or a
/// whole sub-statement when the argument pointed at a nested event.
#[derive(Debug, Clone)]
pub enum Resolved {
    Concept(Concept),
    Nested(Statement),
}

impl Resolved {
    /// The concept standing in for this resolution on the enclosing
    /// statement. A nested sub-statement contributes its object concept:
    /// the affected term is the head noun of the event's semantics.
    #[must_use]
    pub fn into_concept(self) -> Concept {
        match self {
            Self::Concept(concept) => concept,
            Self::Nested(statement) => statement.object,
        }
    }
}

/// Tracks one argument-resolution chain. Reference cycles only occur in
/// malformed documents, but an unguarded cycle would recurse forever, so
/// every nested event entered is recorded and revisits are refused, with a
/// depth bound behind it.
#[derive(Debug)]
pub struct ResolutionGuard {
    visited: HashSet<NodeId>,
    max_depth: usize,
}

impl ResolutionGuard {
    #[must_use]
    pub fn new(max_depth: usize) -> Self {
        Self {
            visited: HashSet::new(),
            max_depth,
        }
    }

    /// Record entry into a nested event. False means the chain must stop:
    /// the node was already entered (a cycle) or the chain is too deep.
    pub fn enter(&mut self, node: &Node) -> bool {
        if self.visited.len() >= self.max_depth {
            tracing::warn!(
                depth = self.visited.len(),
                "argument resolution exceeded depth bound"
            );
            return false;
        }
        if !self.visited.insert(node.node_id()) {
            tracing::warn!(
                node = node.attr("id").unwrap_or("<unnamed>"),
                "argument reference cycle detected"
            );
            return false;
        }
        true
    }
}

/// Resolves argument references to grounded concepts. The recursive
/// nested-event path composes with the statement factory, which owns the
/// dedup store the nested sub-statements land in.
pub struct ConceptResolver<'t> {
    tree: &'t DocumentTree,
    reader_namespace: String,
    max_depth: usize,
}

impl<'t> ConceptResolver<'t> {
    #[must_use]
    pub fn new(tree: &'t DocumentTree, config: &ExtractionConfig) -> Self {
        Self {
            tree,
            reader_namespace: config.reader_namespace.clone(),
            max_depth: config.max_resolution_depth,
        }
    }

    #[must_use]
    pub fn guard(&self) -> ResolutionGuard {
        ResolutionGuard::new(self.max_depth)
    }

    /// Follow an argument node's `id` reference to its target annotation.
    #[must_use]
    pub fn follow(&self, argument: &Node) -> Option<&'t Node> {
        let reference = argument.attr("id")?;
        let target = self.tree.by_id(reference);
        if target.is_none() {
            tracing::debug!(reference, "dangling argument reference");
        }
        target
    }

    /// Resolve a term-level annotation to a concept. The display text is
    /// required; the reader's ontology type is grounded when present.
    #[must_use]
    pub fn resolve_term(&self, node: &Node) -> Option<Concept> {
        let text = self.tree.display_text(node)?;
        let mut concept = Concept::new(text);
        if let Some(type_tag) = self.tree.type_tag(node) {
            concept = concept.with_grounding(&self.reader_namespace, Grounding::new(type_tag));
        }
        Some(concept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::concept::TEXT_NAMESPACE;

    const SAMPLE: &str = r#"
        <ekb id="doc-2">
          <TERM id="V1"><type>ONT::RAINING</type><text>rainfall</text></TERM>
          <TERM id="V2"><text>floods</text></TERM>
          <TERM id="V3"><type>ONT::SILENT</type></TERM>
          <CC id="C1">
            <type>ONT::CAUSE</type>
            <arg id="V1" role=":FACTOR"/>
            <arg id="V99" role=":OUTCOME"/>
          </CC>
        </ekb>
    "#;

    fn resolver(tree: &DocumentTree) -> ConceptResolver<'_> {
        ConceptResolver::new(tree, &ExtractionConfig::default())
    }

    #[test]
    fn term_resolution_grounds_text_and_type() {
        let tree = DocumentTree::parse(SAMPLE).unwrap();
        let resolver = resolver(&tree);

        let concept = resolver.resolve_term(tree.by_id("V1").unwrap()).unwrap();
        assert_eq!(concept.name, "rainfall");
        assert_eq!(
            concept.groundings.get(TEXT_NAMESPACE).unwrap()[0].id,
            "rainfall"
        );
        assert_eq!(concept.groundings.get("EKB").unwrap()[0].id, "ONT::RAINING");

        let untyped = resolver.resolve_term(tree.by_id("V2").unwrap()).unwrap();
        assert!(!untyped.groundings.contains_namespace("EKB"));
    }

    #[test]
    fn term_without_text_fails_resolution() {
        let tree = DocumentTree::parse(SAMPLE).unwrap();
        let resolver = resolver(&tree);
        assert!(resolver.resolve_term(tree.by_id("V3").unwrap()).is_none());
    }

    #[test]
    fn follow_resolves_references_and_tolerates_dangling() {
        let tree = DocumentTree::parse(SAMPLE).unwrap();
        let resolver = resolver(&tree);
        let cc = tree.by_id("C1").unwrap();

        let factor = tree.child_with_role(cc, ":FACTOR").unwrap();
        assert_eq!(
            resolver.follow(factor).and_then(|n| n.attr("id")),
            Some("V1")
        );

        let outcome = tree.child_with_role(cc, ":OUTCOME").unwrap();
        assert!(resolver.follow(outcome).is_none());
    }

    #[test]
    fn guard_refuses_revisits_and_depth() {
        let tree = DocumentTree::parse(SAMPLE).unwrap();
        let node = tree.by_id("V1").unwrap();

        let mut guard = ResolutionGuard::new(8);
        assert!(guard.enter(node));
        assert!(!guard.enter(node));

        let mut shallow = ResolutionGuard::new(0);
        assert!(!shallow.enter(node));
    }

    #[test]
    fn nested_resolution_contributes_object_concept() {
        let statement = Statement::new(Concept::new("fertilizer"), Concept::new("crop yield"));
        let concept = Resolved::Nested(statement).into_concept();
        assert_eq!(concept.name, "crop yield");
    }
}

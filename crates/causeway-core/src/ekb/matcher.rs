use super::tree::{DocumentTree, Node, NodeKind};

pub const CAUSE_TYPE: &str = "ONT::CAUSE";
pub const INFLUENCE_TYPE: &str = "ONT::INFLUENCE";
pub const INCREASE_TYPE: &str = "ONT::INCREASE";
pub const DECREASE_TYPE: &str = "ONT::DECREASE";
pub const INHIBIT_TYPE: &str = "ONT::INHIBIT";

pub const FACTOR_ROLE: &str = ":FACTOR";
pub const OUTCOME_ROLE: &str = ":OUTCOME";
pub const AGENT_ROLE: &str = ":AGENT";
pub const AFFECTED_ROLE: &str = ":AFFECTED";

/// Direction of an influence. Positive influences are recorded with no
/// explicit polarity on the statement; negative ones carry -1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Positive,
    Negative,
}

impl Polarity {
    #[must_use]
    pub fn as_delta(self) -> Option<i32> {
        match self {
            Self::Positive => None,
            Self::Negative => Some(-1),
        }
    }
}

/// Polarity implied by an affect event's ontology type, or None for event
/// types this engine does not extract.
#[must_use]
pub fn affect_polarity(type_tag: &str) -> Option<Polarity> {
    match type_tag {
        INHIBIT_TYPE | DECREASE_TYPE => Some(Polarity::Negative),
        INCREASE_TYPE => Some(Polarity::Positive),
        _ => None,
    }
}

/// One matched relation shape: the relation node itself (the evidence
/// anchor) and its two argument nodes, still unresolved.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'t> {
    pub trigger: &'t Node,
    pub cause: &'t Node,
    pub effect: &'t Node,
    pub polarity: Polarity,
}

/// Scans the tree for the three extracted relation shapes. Each scan walks
/// the whole tree in document order; their outputs are concatenated in a
/// fixed order with no cross-scan priority.
pub struct PatternMatcher<'t> {
    tree: &'t DocumentTree,
}

impl<'t> PatternMatcher<'t> {
    #[must_use]
    pub fn new(tree: &'t DocumentTree) -> Self {
        Self { tree }
    }

    /// All candidates: causal connectives, then affect events, then
    /// influence connectives.
    #[must_use]
    pub fn scan(&self) -> Vec<Candidate<'t>> {
        let mut candidates = self.causal_connectives();
        candidates.extend(self.affect_events());
        candidates.extend(self.influence_connectives());
        candidates
    }

    /// Explicit causal connectives between two terms.
    #[must_use]
    pub fn causal_connectives(&self) -> Vec<Candidate<'t>> {
        self.connectives(CAUSE_TYPE)
    }

    /// Influence connectives; same shape as causal, always positive.
    #[must_use]
    pub fn influence_connectives(&self) -> Vec<Candidate<'t>> {
        self.connectives(INFLUENCE_TYPE)
    }

    fn connectives(&self, type_tag: &str) -> Vec<Candidate<'t>> {
        self.tree
            .find_all(|node| node.kind() == NodeKind::Connective)
            .filter(|node| self.tree.type_tag(node) == Some(type_tag))
            .filter_map(|node| {
                // Both roles must be present for a match.
                let factor = self.tree.child_with_role(node, FACTOR_ROLE)?;
                let outcome = self.tree.child_with_role(node, OUTCOME_ROLE)?;
                Some(Candidate {
                    trigger: node,
                    cause: factor,
                    effect: outcome,
                    polarity: Polarity::Positive,
                })
            })
            .collect()
    }

    /// Increase/decrease/inhibit events applying an agent to an affected.
    #[must_use]
    pub fn affect_events(&self) -> Vec<Candidate<'t>> {
        self.tree
            .find_all(|node| node.kind() == NodeKind::Event)
            .filter_map(|node| {
                let polarity = affect_polarity(self.tree.type_tag(node)?)?;
                self.affect_candidate(node, polarity)
            })
            .collect()
    }

    /// The agent/affected shape of a single event node, under an already
    /// determined polarity. Also entered from argument resolution when an
    /// argument references a nested event.
    #[must_use]
    pub fn affect_candidate(
        &self,
        event: &'t Node,
        polarity: Polarity,
    ) -> Option<Candidate<'t>> {
        let agent = self.tree.child_with_role(event, AGENT_ROLE)?;
        let affected = self.tree.child_with_role(event, AFFECTED_ROLE)?;
        Some(Candidate {
            trigger: event,
            cause: agent,
            effect: affected,
            polarity,
        })
    }
}

use std::collections::HashMap;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::config::ExtractionConfig;
use crate::statement::Statement;

use super::context::DocumentContext;
use super::matcher::{Candidate, PatternMatcher, Polarity};
use super::resolver::{ConceptResolver, Resolved, ResolutionGuard};
use super::tree::{DocumentTree, Node, NodeKind};

/// Counters for one extraction run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionStats {
    pub sentences: usize,
    pub paragraphs: usize,
    pub causal_matches: usize,
    pub affect_matches: usize,
    pub influence_matches: usize,
    pub duplicates_collapsed: usize,
    pub dropped_candidates: usize,
    pub duration_ms: u64,
}

/// Everything one run produced: the deduplicated statements in discovery
/// order plus run counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
    pub statements: Vec<Statement>,
    pub stats: ExtractionStats,
}

impl ExtractionOutput {
    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Insertion-ordered statement store keyed by canonical hash. At most one
/// live statement per hash within a run.
#[derive(Debug, Default)]
struct StatementStore {
    statements: Vec<Statement>,
    index: HashMap<String, usize>,
    collapsed: usize,
}

impl StatementStore {
    /// Register a statement, or hand back the first one stored under the
    /// same canonical hash. On a collapse the incoming evidence is
    /// discarded, not appended to the stored statement.
    fn insert(&mut self, statement: Statement) -> Statement {
        let hash = statement.canonical_hash();
        if let Some(&existing) = self.index.get(&hash) {
            self.collapsed += 1;
            return self.statements[existing].clone();
        }
        self.index.insert(hash, self.statements.len());
        self.statements.push(statement.clone());
        statement
    }
}

/// Turns matched candidates into registered statements: resolves both
/// argument sides, attaches evidence from the trigger node, and routes
/// everything through the dedup store.
struct StatementFactory<'t> {
    tree: &'t DocumentTree,
    context: &'t DocumentContext,
    matcher: PatternMatcher<'t>,
    resolver: ConceptResolver<'t>,
    store: StatementStore,
}

impl<'t> StatementFactory<'t> {
    fn new(
        tree: &'t DocumentTree,
        context: &'t DocumentContext,
        config: &ExtractionConfig,
    ) -> Self {
        Self {
            tree,
            context,
            matcher: PatternMatcher::new(tree),
            resolver: ConceptResolver::new(tree, config),
            store: StatementStore::default(),
        }
    }

    /// Build and register the statement for one candidate. None means a
    /// resolution gap on either side; nothing is emitted for it.
    fn build(&mut self, candidate: &Candidate<'t>) -> Option<Statement> {
        let mut cause_guard = self.resolver.guard();
        let subject =
            self.resolve_argument(candidate.cause, candidate.polarity, &mut cause_guard)?;

        let mut effect_guard = self.resolver.guard();
        let object =
            self.resolve_argument(candidate.effect, candidate.polarity, &mut effect_guard)?;

        Some(self.assemble(candidate, subject, object))
    }

    fn resolve_argument(
        &mut self,
        argument: &'t Node,
        polarity: Polarity,
        guard: &mut ResolutionGuard,
    ) -> Option<Resolved> {
        let target = self.resolver.follow(argument)?;

        if target.kind() == NodeKind::Event {
            // A nested event argument becomes its own registered
            // sub-statement, resolved under the ambient polarity of the
            // enclosing match rather than the nested event's own type.
            if !guard.enter(target) {
                return None;
            }
            let nested = self.matcher.affect_candidate(target, polarity)?;
            let subject = self.resolve_argument(nested.cause, polarity, guard)?;
            let object = self.resolve_argument(nested.effect, polarity, guard)?;
            let statement = self.assemble(&nested, subject, object);
            return Some(Resolved::Nested(statement));
        }

        self.resolver.resolve_term(target).map(Resolved::Concept)
    }

    fn assemble(
        &mut self,
        candidate: &Candidate<'t>,
        subject: Resolved,
        object: Resolved,
    ) -> Statement {
        let evidence = self.context.evidence_for(self.tree, candidate.trigger);
        let statement = Statement::new(subject.into_concept(), object.into_concept())
            .with_polarity(candidate.polarity.as_delta())
            .with_evidence(evidence);
        self.store.insert(statement)
    }

    fn finish(self) -> (Vec<Statement>, usize) {
        (self.store.statements, self.store.collapsed)
    }
}

/// The extraction engine. Stateless between runs; every call to
/// [`CausalExtractor::extract`] gets its own tree, context, and dedup
/// store, so documents can be processed independently in parallel.
#[derive(Debug, Clone, Default)]
pub struct CausalExtractor {
    config: ExtractionConfig,
}

impl CausalExtractor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: ExtractionConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Extract every causal statement from one serialized document.
    ///
    /// Never raises: malformed markup logs a diagnostic and yields an
    /// empty output, so a corpus driver can keep going.
    #[must_use]
    pub fn extract(&self, xml: &str) -> ExtractionOutput {
        let started = Instant::now();
        match DocumentTree::parse(xml) {
            Ok(tree) => self.extract_tree(&tree, started),
            Err(error) => {
                tracing::error!(%error, "could not parse document");
                ExtractionOutput {
                    document_id: None,
                    statements: Vec::new(),
                    stats: ExtractionStats {
                        duration_ms: started.elapsed().as_millis() as u64,
                        ..ExtractionStats::default()
                    },
                }
            }
        }
    }

    fn extract_tree(&self, tree: &DocumentTree, started: Instant) -> ExtractionOutput {
        let context = DocumentContext::from_tree(tree);
        let matcher = PatternMatcher::new(tree);

        let causal = matcher.causal_connectives();
        let affect = matcher.affect_events();
        let influence = matcher.influence_connectives();

        let mut stats = ExtractionStats {
            sentences: context.sentence_count(),
            paragraphs: context.paragraph_count(),
            causal_matches: causal.len(),
            affect_matches: affect.len(),
            influence_matches: influence.len(),
            ..ExtractionStats::default()
        };

        let document_id = context.document_id().map(str::to_string);
        let mut factory = StatementFactory::new(tree, &context, &self.config);

        for candidate in causal.iter().chain(affect.iter()).chain(influence.iter()) {
            if factory.build(candidate).is_none() {
                stats.dropped_candidates += 1;
                tracing::warn!(
                    trigger = candidate.trigger.attr("id").unwrap_or("<unnamed>"),
                    "dropping candidate with unresolvable argument"
                );
            }
        }

        let (statements, collapsed) = factory.finish();
        stats.duplicates_collapsed = collapsed;
        stats.duration_ms = started.elapsed().as_millis() as u64;

        ExtractionOutput {
            document_id,
            statements,
            stats,
        }
    }
}

use std::collections::HashMap;

use crate::evidence::Evidence;

use super::tree::{DocumentTree, Node};

/// Per-document metadata tables: the source sentences and paragraphs the
/// annotations point back into. Built once per run from the input block.
#[derive(Debug, Default)]
pub struct DocumentContext {
    document_id: Option<String>,
    sentences: HashMap<String, String>,
    paragraphs: HashMap<String, String>,
    par_to_sec: HashMap<String, String>,
}

impl DocumentContext {
    #[must_use]
    pub fn from_tree(tree: &DocumentTree) -> Self {
        let mut context = Self {
            document_id: tree.document_id().map(str::to_string),
            ..Self::default()
        };

        for paragraph in tree.find_path("input/paragraphs/paragraph") {
            let Some(id) = paragraph.attr("id") else {
                continue;
            };
            if let Some(text) = paragraph.text() {
                context.paragraphs.insert(id.to_string(), text.to_string());
            }
            if let Some(sec_type) = paragraph.attr("sec-type") {
                context.par_to_sec.insert(id.to_string(), sec_type.to_string());
            }
        }

        for sentence in tree.find_path("input/sentences/sentence") {
            if let (Some(id), Some(text)) = (sentence.attr("id"), sentence.text()) {
                context.sentences.insert(id.to_string(), text.to_string());
            }
        }

        context
    }

    #[must_use]
    pub fn document_id(&self) -> Option<&str> {
        self.document_id.as_deref()
    }

    #[must_use]
    pub fn sentence(&self, id: &str) -> Option<&str> {
        self.sentences.get(id).map(String::as_str)
    }

    #[must_use]
    pub fn paragraph(&self, id: &str) -> Option<&str> {
        self.paragraphs.get(id).map(String::as_str)
    }

    #[must_use]
    pub fn section_for(&self, paragraph_id: &str) -> Option<&str> {
        self.par_to_sec.get(paragraph_id).map(String::as_str)
    }

    #[must_use]
    pub fn sentence_count(&self) -> usize {
        self.sentences.len()
    }

    #[must_use]
    pub fn paragraph_count(&self) -> usize {
        self.paragraphs.len()
    }

    /// Evidence for an annotation node. Always succeeds; fields the
    /// document does not provide stay empty.
    ///
    /// Annotations carry sentence fragments; the full source sentence lives
    /// in the sentence table under the node's `uttnum`. An unknown or
    /// missing `uttnum` falls back to the node's own fragment.
    #[must_use]
    pub fn evidence_for(&self, tree: &DocumentTree, node: &Node) -> Evidence {
        let text = node
            .attr("uttnum")
            .and_then(|uttnum| self.sentence(uttnum))
            .or_else(|| tree.display_text(node));

        let section = node
            .attr("paragraph")
            .and_then(|paragraph_id| self.section_for(paragraph_id));

        let mut evidence = Evidence::new();
        if let Some(document_id) = &self.document_id {
            evidence = evidence.with_document_id(document_id);
        }
        if let Some(text) = text {
            evidence = evidence.with_text(text);
        }
        if let Some(section) = section {
            evidence = evidence.with_section_type(section);
        }
        evidence
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        <ekb id="doc-7">
          <input>
            <paragraphs>
              <paragraph id="p1" sec-type="results">Drought reduces yields. It compounds.</paragraph>
              <paragraph id="p2">No section here.</paragraph>
            </paragraphs>
            <sentences>
              <sentence id="1">Drought reduces yields.</sentence>
              <sentence id="2">It compounds.</sentence>
            </sentences>
          </input>
          <EVENT id="V1" paragraph="p1" uttnum="2">
            <type>ONT::DECREASE</type>
            <text>reduces</text>
          </EVENT>
          <EVENT id="V2" paragraph="p2" uttnum="99">
            <type>ONT::DECREASE</type>
            <text>a fragment</text>
          </EVENT>
          <EVENT id="V3">
            <type>ONT::DECREASE</type>
          </EVENT>
        </ekb>
    "#;

    fn context_and_tree() -> (DocumentContext, DocumentTree) {
        let tree = DocumentTree::parse(SAMPLE).unwrap();
        let context = DocumentContext::from_tree(&tree);
        (context, tree)
    }

    #[test]
    fn tables_are_built_from_input_block() {
        let (context, _tree) = context_and_tree();
        assert_eq!(context.document_id(), Some("doc-7"));
        assert_eq!(context.sentence_count(), 2);
        assert_eq!(context.paragraph_count(), 2);
        assert_eq!(context.sentence("2"), Some("It compounds."));
        assert_eq!(context.section_for("p1"), Some("results"));
        assert_eq!(context.section_for("p2"), None);
    }

    #[test]
    fn evidence_uses_full_sentence_over_fragment() {
        let (context, tree) = context_and_tree();
        let node = tree.by_id("V1").unwrap();
        let evidence = context.evidence_for(&tree, node);
        assert_eq!(evidence.text.as_deref(), Some("It compounds."));
        assert_eq!(evidence.section_type.as_deref(), Some("results"));
        assert_eq!(evidence.document_id.as_deref(), Some("doc-7"));
        assert!(!evidence.epistemics.direct);
    }

    #[test]
    fn unknown_uttnum_falls_back_to_fragment() {
        let (context, tree) = context_and_tree();
        let node = tree.by_id("V2").unwrap();
        let evidence = context.evidence_for(&tree, node);
        assert_eq!(evidence.text.as_deref(), Some("a fragment"));
        assert_eq!(evidence.section_type, None);
    }

    #[test]
    fn bare_node_still_yields_evidence() {
        let (context, tree) = context_and_tree();
        let node = tree.by_id("V3").unwrap();
        let evidence = context.evidence_for(&tree, node);
        assert_eq!(evidence.text, None);
        assert_eq!(evidence.section_type, None);
        assert_eq!(evidence.document_id.as_deref(), Some("doc-7"));
    }
}

use std::collections::HashMap;

use crate::error::{Error, Result};

/// Index of a node within its tree's arena. Arena order is document order,
/// so iterating the arena is a depth-first walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Closed classification of annotation nodes. Dispatch happens on this
/// variant, never on the element tag string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// A term (noun-level entity) annotation.
    Term,
    /// A unary state-change event (increase/decrease/inhibit).
    Event,
    /// A binary connective between two argument roles.
    Connective,
    /// Anything else: input metadata, modality markers, argument stubs.
    Other,
}

impl NodeKind {
    fn from_tag(tag: &str) -> Self {
        match tag {
            "TERM" => Self::Term,
            "EVENT" => Self::Event,
            "CC" => Self::Connective,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    id: NodeId,
    tag: String,
    kind: NodeKind,
    attrs: HashMap<String, String>,
    text: Option<String>,
    children: Vec<NodeId>,
}

impl Node {
    #[must_use]
    pub fn node_id(&self) -> NodeId {
        self.id
    }

    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    #[must_use]
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Attribute value, or None when absent. Never fails.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// Text content directly under this element, before any child element.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

/// An annotated document tree, parsed once and immutable for the duration
/// of an extraction run.
#[derive(Debug)]
pub struct DocumentTree {
    nodes: Vec<Node>,
    by_id: HashMap<String, NodeId>,
}

impl DocumentTree {
    /// Parse well-formed markup into an owned arena. Malformed input is a
    /// recoverable error; the extraction entry point downgrades it to an
    /// empty result.
    pub fn parse(xml: &str) -> Result<Self> {
        let doc = roxmltree::Document::parse(xml)
            .map_err(|e| Error::MalformedDocument(e.to_string()))?;

        let mut tree = Self {
            nodes: Vec::new(),
            by_id: HashMap::new(),
        };
        tree.add_element(doc.root_element());

        // Argument references point at top-level annotations, so only the
        // root's direct children are indexed; argument stubs deeper in the
        // tree reuse the same id values and must not shadow their targets.
        // First registration wins, matching first-match-in-document-order
        // resolution everywhere else.
        let top_level = tree.nodes[0].children.clone();
        for node_id in top_level {
            if let Some(id_value) = tree.nodes[node_id.0].attrs.get("id").cloned() {
                tree.by_id.entry(id_value).or_insert(node_id);
            }
        }

        Ok(tree)
    }

    fn add_element(&mut self, element: roxmltree::Node<'_, '_>) -> NodeId {
        let id = NodeId(self.nodes.len());
        let tag = element.tag_name().name().to_string();

        let mut attrs = HashMap::new();
        for attr in element.attributes() {
            attrs.insert(attr.name().to_string(), attr.value().to_string());
        }

        self.nodes.push(Node {
            id,
            kind: NodeKind::from_tag(&tag),
            tag,
            attrs,
            text: element.text().map(str::to_string),
            children: Vec::new(),
        });

        for child in element.children().filter(roxmltree::Node::is_element) {
            let child_id = self.add_element(child);
            self.nodes[id.0].children.push(child_id);
        }

        id
    }

    #[must_use]
    pub fn root(&self) -> &Node {
        &self.nodes[0]
    }

    /// The root `id` attribute, when the document carries one.
    #[must_use]
    pub fn document_id(&self) -> Option<&str> {
        self.root().attr("id")
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Resolve a top-level annotation by its `id` attribute.
    #[must_use]
    pub fn by_id(&self, id: &str) -> Option<&Node> {
        self.by_id.get(id).map(|node_id| self.node(*node_id))
    }

    /// Every node in document order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn find_all<'a, P>(&'a self, predicate: P) -> impl Iterator<Item = &'a Node>
    where
        P: Fn(&Node) -> bool + 'a,
    {
        self.nodes().filter(move |node| predicate(node))
    }

    pub fn find_first<'a, P>(&'a self, predicate: P) -> Option<&'a Node>
    where
        P: Fn(&Node) -> bool + 'a,
    {
        self.find_all(predicate).next()
    }

    /// Walk a `a/b/c` tag path down the child axis from the root.
    #[must_use]
    pub fn find_path(&self, path: &str) -> Vec<&Node> {
        let mut current = vec![self.root()];
        for tag in path.split('/') {
            let mut next = Vec::new();
            for node in current {
                next.extend(self.children(node).filter(|child| child.tag() == tag));
            }
            current = next;
        }
        current
    }

    pub fn children<'a>(&'a self, node: &'a Node) -> impl Iterator<Item = &'a Node> + 'a {
        node.children.iter().map(move |id| self.node(*id))
    }

    /// Text of this node's `<type>` child: the reader-assigned ontology tag.
    #[must_use]
    pub fn type_tag<'a>(&'a self, node: &'a Node) -> Option<&'a str> {
        self.children(node)
            .find(|child| child.tag() == "type")
            .and_then(Node::text)
    }

    /// Text of this node's `<text>` child: the annotation's surface form.
    #[must_use]
    pub fn display_text<'a>(&'a self, node: &'a Node) -> Option<&'a str> {
        self.children(node)
            .find(|child| child.tag() == "text")
            .and_then(Node::text)
    }

    /// First child carrying the given `role` attribute, document order.
    #[must_use]
    pub fn child_with_role<'a>(&'a self, node: &'a Node, role: &str) -> Option<&'a Node> {
        self.children(node)
            .find(|child| child.attr("role") == Some(role))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        <ekb id="doc-1">
          <input>
            <paragraphs>
              <paragraph id="p1" sec-type="abstract">Rainfall causes floods.</paragraph>
            </paragraphs>
            <sentences>
              <sentence id="1">Rainfall causes floods.</sentence>
            </sentences>
          </input>
          <TERM id="V1" paragraph="p1" uttnum="1">
            <type>ONT::RAINING</type>
            <text>rainfall</text>
          </TERM>
          <EVENT id="V2" paragraph="p1" uttnum="1">
            <type>ONT::INCREASE</type>
          </EVENT>
          <CC id="V3" paragraph="p1" uttnum="1">
            <type>ONT::CAUSE</type>
            <arg id="V1" role=":FACTOR"/>
            <arg id="V2" role=":OUTCOME"/>
          </CC>
        </ekb>
    "#;

    #[test]
    fn parse_classifies_nodes() {
        let tree = DocumentTree::parse(SAMPLE).unwrap();
        assert_eq!(tree.document_id(), Some("doc-1"));
        assert_eq!(tree.by_id("V1").unwrap().kind(), NodeKind::Term);
        assert_eq!(tree.by_id("V2").unwrap().kind(), NodeKind::Event);
        assert_eq!(tree.by_id("V3").unwrap().kind(), NodeKind::Connective);
        assert_eq!(tree.root().kind(), NodeKind::Other);
    }

    #[test]
    fn malformed_markup_is_an_error() {
        assert!(DocumentTree::parse("<ekb><unclosed></ekb>").is_err());
        assert!(DocumentTree::parse("not xml at all").is_err());
    }

    #[test]
    fn by_id_resolves_and_tolerates_misses() {
        let tree = DocumentTree::parse(SAMPLE).unwrap();
        let term = tree.by_id("V1").unwrap();
        assert_eq!(tree.display_text(term), Some("rainfall"));
        assert_eq!(tree.type_tag(term), Some("ONT::RAINING"));
        assert!(tree.by_id("V99").is_none());
    }

    #[test]
    fn missing_attributes_yield_none() {
        let tree = DocumentTree::parse(SAMPLE).unwrap();
        let term = tree.by_id("V1").unwrap();
        assert_eq!(term.attr("no-such-attribute"), None);
        let event = tree.by_id("V2").unwrap();
        assert_eq!(tree.display_text(event), None);
    }

    #[test]
    fn find_path_walks_the_child_axis() {
        let tree = DocumentTree::parse(SAMPLE).unwrap();
        let paragraphs = tree.find_path("input/paragraphs/paragraph");
        assert_eq!(paragraphs.len(), 1);
        assert_eq!(paragraphs[0].attr("sec-type"), Some("abstract"));
        assert!(tree.find_path("input/no/such/path").is_empty());
    }

    #[test]
    fn find_all_is_document_ordered() {
        let tree = DocumentTree::parse(SAMPLE).unwrap();
        let ids: Vec<_> = tree
            .find_all(|node| node.attr("id").is_some() && node.kind() != NodeKind::Other)
            .filter_map(|node| node.attr("id"))
            .collect();
        assert_eq!(ids, vec!["V1", "V2", "V3"]);

        let first = tree
            .find_first(|node| node.kind() == NodeKind::Event)
            .unwrap();
        assert_eq!(first.attr("id"), Some("V2"));
        assert!(tree
            .find_first(|node| node.tag() == "nonexistent")
            .is_none());
    }

    #[test]
    fn argument_stubs_never_shadow_their_targets() {
        // The argument stub referencing E9 appears before the annotation
        // it points at; the reference must still land on the annotation.
        let xml = r#"
            <ekb id="doc-8">
              <EVENT id="E8">
                <type>ONT::INCREASE</type>
                <arg1 id="E9" role=":AGENT"/>
              </EVENT>
              <EVENT id="E9">
                <type>ONT::DECREASE</type>
                <text>shrinks</text>
              </EVENT>
            </ekb>
        "#;
        let tree = DocumentTree::parse(xml).unwrap();
        let target = tree.by_id("E9").unwrap();
        assert_eq!(target.kind(), NodeKind::Event);
        assert_eq!(tree.display_text(target), Some("shrinks"));
    }

    #[test]
    fn roles_resolve_on_children() {
        let tree = DocumentTree::parse(SAMPLE).unwrap();
        let cc = tree.by_id("V3").unwrap();
        let factor = tree.child_with_role(cc, ":FACTOR").unwrap();
        assert_eq!(factor.attr("id"), Some("V1"));
        assert!(tree.child_with_role(cc, ":AGENT").is_none());
    }
}

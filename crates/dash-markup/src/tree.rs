//! Arena-backed markup tree and its line renderer.
//!
//! Elements live in a [`MarkupTree`] and are addressed by [`NodeId`]. A node
//! is appended to its parent at creation time and lives as long as the tree.

use crate::attrs::Attributes;

/// Indentation emitted per nesting level.
pub const INDENT: &str = "  ";

/// Handle to an element inside a [`MarkupTree`].
///
/// Handles are only meaningful for the tree that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Arena index of this node.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Handle to a section element, issued only by section-creating operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SectionId(NodeId);

impl SectionId {
    /// The underlying element handle.
    pub fn node(self) -> NodeId {
        self.0
    }
}

impl From<SectionId> for NodeId {
    fn from(id: SectionId) -> Self {
        id.0
    }
}

/// Render strategy of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// Open tag, children, close tag.
    Container,
    /// Single open tag line; children are never rendered.
    Leaf,
    /// Container carrying a heading depth for its title.
    Section { level: u32 },
}

/// A child slot of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Child {
    /// Nested element.
    Node(NodeId),
    /// Raw text, emitted verbatim on its own line.
    Text(String),
}

/// Element description used to append a node.
#[derive(Debug, Clone)]
pub struct Element {
    tag: String,
    attrs: Attributes,
    kind: ElementKind,
    text: Vec<String>,
}

impl Element {
    /// A plain container element.
    pub fn container(tag: impl Into<String>) -> Self {
        Self::with_kind(tag, ElementKind::Container)
    }

    /// A leaf element such as `hr`, `img` or `meta`.
    pub fn leaf(tag: impl Into<String>) -> Self {
        Self::with_kind(tag, ElementKind::Leaf)
    }

    /// A section element at `level`.
    pub fn section(tag: impl Into<String>, level: u32) -> Self {
        Self::with_kind(tag, ElementKind::Section { level })
    }

    fn with_kind(tag: impl Into<String>, kind: ElementKind) -> Self {
        Self {
            tag: tag.into(),
            attrs: Attributes::new(),
            kind,
            text: Vec::new(),
        }
    }

    /// Replace the attribute list.
    pub fn attrs(mut self, attrs: Attributes) -> Self {
        self.attrs = attrs;
        self
    }

    /// Append one attribute.
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push(key, value);
        self
    }

    /// Append a raw text child. The text is not escaped.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text.push(text.into());
        self
    }
}

#[derive(Debug, Clone)]
struct Node {
    tag: String,
    attrs: Attributes,
    kind: ElementKind,
    children: Vec<Child>,
}

/// Arena of markup elements.
#[derive(Debug, Clone, Default)]
pub struct MarkupTree {
    nodes: Vec<Node>,
}

impl MarkupTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of elements in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Create a detached element, typically a document root.
    pub fn create_root(&mut self, element: Element) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            tag: element.tag,
            attrs: element.attrs,
            kind: element.kind,
            children: element.text.into_iter().map(Child::Text).collect(),
        });
        id
    }

    /// Create a detached section, typically a document root.
    pub fn create_root_section(&mut self, tag: impl Into<String>, level: u32, attrs: Attributes) -> SectionId {
        SectionId(self.create_root(Element::section(tag, level).attrs(attrs)))
    }

    /// Append `element` to `parent` and return its handle.
    ///
    /// # Panics
    ///
    /// Panics if `parent` was issued by another tree.
    pub fn new_node(&mut self, parent: NodeId, element: Element) -> NodeId {
        let id = self.create_root(element);
        self.nodes[parent.0].children.push(Child::Node(id));
        id
    }

    /// Append a section element to `parent`.
    pub fn new_section(
        &mut self,
        parent: NodeId,
        tag: impl Into<String>,
        level: u32,
        attrs: Attributes,
    ) -> SectionId {
        SectionId(self.new_node(parent, Element::section(tag, level).attrs(attrs)))
    }

    /// Append a raw text child to `parent`.
    pub fn push_text(&mut self, parent: NodeId, text: impl Into<String>) {
        self.nodes[parent.0].children.push(Child::Text(text.into()));
    }

    /// Splice pre-rendered lines into `parent` as raw text children.
    pub fn splice_lines<I, S>(&mut self, parent: NodeId, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.nodes[parent.0]
            .children
            .extend(lines.into_iter().map(|line| Child::Text(line.into())));
    }

    pub fn tag(&self, id: NodeId) -> &str {
        &self.nodes[id.0].tag
    }

    pub fn attributes(&self, id: NodeId) -> &Attributes {
        &self.nodes[id.0].attrs
    }

    pub fn kind(&self, id: NodeId) -> ElementKind {
        self.nodes[id.0].kind
    }

    pub fn children(&self, id: NodeId) -> &[Child] {
        &self.nodes[id.0].children
    }

    /// Heading level of a section.
    pub fn level(&self, id: SectionId) -> u32 {
        match self.nodes[id.node().0].kind {
            ElementKind::Section { level } => level,
            // SectionId is only issued for section elements.
            _ => unreachable!("section handle points at a non-section element"),
        }
    }

    /// Child element handles of `id`, skipping raw text.
    pub fn child_nodes(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes[id.0].children.iter().filter_map(|child| match child {
            Child::Node(node) => Some(*node),
            Child::Text(_) => None,
        })
    }

    /// Render `id` and its descendants as lines indented by `indent` levels.
    pub fn render(&self, id: NodeId, indent: usize) -> Vec<String> {
        let mut lines = Vec::new();
        self.render_into(id, indent, &mut lines);
        lines
    }

    fn render_into(&self, id: NodeId, indent: usize, out: &mut Vec<String>) {
        let node = &self.nodes[id.0];
        let pad = INDENT.repeat(indent);
        out.push(format!("{pad}<{}{}>", node.tag, node.attrs.render()));
        if node.kind == ElementKind::Leaf {
            return;
        }
        let child_pad = INDENT.repeat(indent + 1);
        for child in &node.children {
            match child {
                Child::Node(child) => self.render_into(*child, indent + 1, out),
                Child::Text(text) => out.push(format!("{child_pad}{text}")),
            }
        }
        out.push(format!("{pad}</{}>", node.tag));
    }
}

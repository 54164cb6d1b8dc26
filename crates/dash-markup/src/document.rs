//! Top-level HTML document.
//!
//! The document owns a `head` with page metadata and a `body` holding a
//! single frame section at level 1. Authoring operations called on the
//! document are forwarded to that frame.

use crate::artifact::{ArtifactEncoder, TabularRenderer};
use crate::attrs::Attributes;
use crate::canvas::Canvas;
use crate::error::Result;
use crate::escape::escape_html;
use crate::tree::{Element, MarkupTree, NodeId, SectionId};

/// Declaration emitted before the root element by [`HtmlDocument::to_html`].
pub const DOCTYPE: &str = "<!DOCTYPE html>";

/// An HTML page with head/body scaffolding and a single frame section.
#[derive(Debug, Clone)]
pub struct HtmlDocument {
    tree: MarkupTree,
    root: NodeId,
    head: NodeId,
    frame: SectionId,
    page_title: String,
}

impl HtmlDocument {
    /// Build the scaffolding for a page titled `title`.
    pub fn new(title: impl Into<String>) -> Self {
        let page_title = title.into();
        let mut tree = MarkupTree::new();
        let root = tree.create_root(Element::container("html").attr("lang", "en"));
        let head = tree.new_node(root, Element::container("head"));
        tree.new_node(head, Element::leaf("meta").attr("charset", "UTF-8"));
        tree.new_node(
            head,
            Element::leaf("meta")
                .attr("name", "viewport")
                .attr("content", "width=device-width, initial-scale=1.0"),
        );
        tree.new_node(
            head,
            Element::container("title").text(escape_html(&page_title)),
        );
        let body = tree.new_section(root, "body", 1, Attributes::new());
        let frame = tree.new_section(body.node(), "div", 1, Attributes::new().klass("frame"));
        Self {
            tree,
            root,
            head,
            frame,
            page_title,
        }
    }

    /// Title shown in the browser tab.
    pub fn page_title(&self) -> &str {
        &self.page_title
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn head(&self) -> NodeId {
        self.head
    }

    /// The single top-level section of the body.
    pub fn frame(&self) -> SectionId {
        self.frame
    }

    pub fn tree(&self) -> &MarkupTree {
        &self.tree
    }

    /// Authoring view over any section of this document.
    pub fn section(&mut self, id: SectionId) -> Canvas<'_> {
        Canvas::new(&mut self.tree, id)
    }

    /// Authoring view over the frame.
    pub fn frame_canvas(&mut self) -> Canvas<'_> {
        let frame = self.frame;
        self.section(frame)
    }

    /// Insert an inline stylesheet into the head.
    pub fn add_style(&mut self, css: &str) -> NodeId {
        self.tree
            .new_node(self.head, Element::container("style").text(css))
    }

    /// Insert an inline script into the head.
    pub fn add_script(&mut self, js: &str) -> NodeId {
        self.tree
            .new_node(self.head, Element::container("script").text(js))
    }

    /// Insert a `<meta name=... content=...>` leaf into the head.
    pub fn add_meta(&mut self, name: &str, content: &str) -> NodeId {
        self.tree.new_node(
            self.head,
            Element::leaf("meta")
                .attr("name", escape_html(name))
                .attr("content", escape_html(content)),
        )
    }

    pub fn new_row(&mut self) -> SectionId {
        self.frame_canvas().new_row()
    }

    pub fn hr(&mut self) {
        self.frame_canvas().hr()
    }

    pub fn title(&mut self, text: &str) -> NodeId {
        self.frame_canvas().title(text)
    }

    pub fn split(&mut self, width: u32) -> Result<(SectionId, SectionId)> {
        self.frame_canvas().split(width)
    }

    pub fn text(&mut self, msg: &str) -> NodeId {
        self.frame_canvas().text(msg)
    }

    pub fn figure(&mut self, artifact: &dyn ArtifactEncoder) -> Result<NodeId> {
        self.frame_canvas().figure(artifact)
    }

    pub fn table(&mut self, table: &dyn TabularRenderer) {
        self.frame_canvas().table(table)
    }

    pub fn code(&mut self, source: &str) -> NodeId {
        self.frame_canvas().code(source)
    }

    pub fn new_label(&mut self, tag: &str, attrs: Attributes) -> NodeId {
        self.frame_canvas().new_label(tag, attrs)
    }

    pub fn new_canvas(&mut self, tag: &str, level: Option<u32>, attrs: Attributes) -> SectionId {
        self.frame_canvas().new_canvas(tag, level, attrs)
    }

    /// Render the whole document as lines starting at `indent`.
    pub fn render(&self, indent: usize) -> Vec<String> {
        self.tree.render(self.root, indent)
    }

    /// Full page text: doctype followed by the rendered lines.
    pub fn to_html(&self) -> String {
        let mut out = String::from(DOCTYPE);
        for line in self.render(0) {
            out.push('\n');
            out.push_str(&line);
        }
        out
    }
}

impl std::fmt::Display for HtmlDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render(0).join("\n"))
    }
}

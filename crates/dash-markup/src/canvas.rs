//! Section authoring operations.
//!
//! A [`Canvas`] is a mutable view of one section element. Each operation
//! appends to the section's children; container-producing operations
//! return the new handle so the caller can keep authoring inside it.

use crate::artifact::{ArtifactEncoder, TabularRenderer};
use crate::attrs::Attributes;
use crate::error::{MarkupError, Result};
use crate::escape::escape_text;
use crate::tree::{Element, MarkupTree, NodeId, SectionId};
use tracing::trace;

/// Number of width units shared by the two columns of a split.
pub const SPLIT_COLUMNS: u32 = 10;

/// Language marker used by [`Canvas::code`].
pub const DEFAULT_CODE_LANGUAGE: &str = "rust";

/// Authoring view over one section of a [`MarkupTree`].
pub struct Canvas<'a> {
    tree: &'a mut MarkupTree,
    id: SectionId,
}

impl<'a> Canvas<'a> {
    pub fn new(tree: &'a mut MarkupTree, id: SectionId) -> Self {
        Self { tree, id }
    }

    /// Handle of the section being authored.
    pub fn id(&self) -> SectionId {
        self.id
    }

    /// Heading depth of this section.
    pub fn level(&self) -> u32 {
        self.tree.level(self.id)
    }

    /// Switch this view to another section of the same tree.
    pub fn focus(self, id: SectionId) -> Canvas<'a> {
        Canvas { tree: self.tree, id }
    }

    /// Append an arbitrary element.
    pub fn new_node(&mut self, element: Element) -> NodeId {
        self.tree.new_node(self.id.node(), element)
    }

    /// Append a leaf element such as a horizontal rule.
    pub fn new_label(&mut self, tag: &str, attrs: Attributes) -> NodeId {
        self.new_node(Element::leaf(tag).attrs(attrs))
    }

    /// Append a nested section; `level` defaults to one deeper than this one.
    pub fn new_canvas(&mut self, tag: &str, level: Option<u32>, attrs: Attributes) -> SectionId {
        let level = level.unwrap_or_else(|| self.level().saturating_add(1));
        self.tree.new_section(self.id.node(), tag, level, attrs)
    }

    /// Append a generic `section` row one level deeper.
    pub fn new_row(&mut self) -> SectionId {
        self.new_canvas("section", None, Attributes::new())
    }

    /// Append a horizontal rule.
    pub fn hr(&mut self) {
        self.new_label("hr", Attributes::new());
    }

    /// Append an `h<level>` heading.
    ///
    /// `&`, `<` and `>` are escaped; the heading holds a single text child.
    pub fn title(&mut self, text: &str) -> NodeId {
        let tag = format!("h{}", self.level());
        self.new_node(Element::container(tag).text(escape_body(text)))
    }

    /// Append a two-column row and return the left and right columns.
    ///
    /// The columns carry width classes `c<width>` and `c<10 - width>`.
    pub fn split(&mut self, width: u32) -> Result<(SectionId, SectionId)> {
        if width > SPLIT_COLUMNS {
            return Err(MarkupError::InvalidArgument(format!(
                "split width {width} outside 0..={SPLIT_COLUMNS}"
            )));
        }
        let level = self.level().saturating_add(1);
        let row = self.new_node(Element::container("div").attrs(Attributes::new().klass("row")));
        let left = self.tree.new_section(
            row,
            "div",
            level,
            Attributes::new().klass(format!("c{width}")),
        );
        let right = self.tree.new_section(
            row,
            "div",
            level,
            Attributes::new().klass(format!("c{}", SPLIT_COLUMNS - width)),
        );
        Ok((left, right))
    }

    /// Append a paragraph of escaped text with newlines as `<br>`.
    pub fn text(&mut self, msg: &str) -> NodeId {
        self.new_node(Element::container("p").text(escape_text(msg)))
    }

    /// Append an image leaf whose source is produced by `artifact`.
    pub fn figure(&mut self, artifact: &dyn ArtifactEncoder) -> Result<NodeId> {
        let src = artifact.encode_inline()?;
        trace!(bytes = src.len(), "Embedding figure");
        Ok(self.image(&src))
    }

    /// Append an image leaf with an already-encoded source.
    pub fn image(&mut self, src: &str) -> NodeId {
        self.new_label("img", Attributes::new().with("src", src))
    }

    /// Splice table markup from `table` as raw lines.
    ///
    /// The lines are inserted verbatim; the renderer owns their escaping.
    pub fn table(&mut self, table: &dyn TabularRenderer) {
        self.splice_lines(table.render_lines());
    }

    /// Splice pre-rendered lines as raw text children.
    pub fn splice_lines<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tree.splice_lines(self.id.node(), lines);
    }

    /// Append a code block marked with the default language.
    pub fn code(&mut self, source: &str) -> NodeId {
        self.code_with_language(source, DEFAULT_CODE_LANGUAGE)
    }

    /// Append `<pre><code class="language">` with one raw line per source line.
    ///
    /// Source lines are inserted unescaped.
    pub fn code_with_language(&mut self, source: &str, language: &str) -> NodeId {
        let pre = self.new_node(Element::container("pre"));
        let code = self.tree.new_node(
            pre,
            Element::container("code").attrs(Attributes::new().klass(language)),
        );
        self.tree.splice_lines(code, source.lines());
        pre
    }
}

/// Escape element content; quotes are left alone.
fn escape_body(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

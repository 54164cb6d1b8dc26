//! Write cursor over a report document.
//!
//! The recorder owns the [`HtmlDocument`] and a cursor naming the section
//! that currently receives output. Opening a section moves the cursor into
//! it; nothing moves it back automatically.

use crate::error::Result;
use crate::output::{OutputDispatcher, Renderable};
use dash_markup::{Attributes, Canvas, HtmlDocument, NodeId, SectionId, DEFAULT_CODE_LANGUAGE};
use std::any::Any;
use std::fmt::Debug;
use tracing::debug;

/// Document plus the section currently receiving output.
pub struct ReportRecorder {
    document: HtmlDocument,
    current: SectionId,
    dispatcher: OutputDispatcher,
    code_language: String,
}

impl ReportRecorder {
    /// Start a document titled `title` with the cursor on its frame.
    pub fn new(title: impl Into<String>) -> Self {
        Self::with_dispatcher(title, OutputDispatcher::default())
    }

    /// Start a document with a custom output dispatcher.
    pub fn with_dispatcher(title: impl Into<String>, dispatcher: OutputDispatcher) -> Self {
        let document = HtmlDocument::new(title);
        let current = document.frame();
        Self {
            document,
            current,
            dispatcher,
            code_language: DEFAULT_CODE_LANGUAGE.to_string(),
        }
    }

    /// Language marker used when echoing step source.
    pub fn set_code_language(&mut self, language: impl Into<String>) {
        self.code_language = language.into();
    }

    pub fn document(&self) -> &HtmlDocument {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut HtmlDocument {
        &mut self.document
    }

    pub fn dispatcher_mut(&mut self) -> &mut OutputDispatcher {
        &mut self.dispatcher
    }

    /// Section currently receiving output.
    pub fn current_id(&self) -> SectionId {
        self.current
    }

    /// Authoring view over the current section.
    pub fn current(&mut self) -> Canvas<'_> {
        self.document.section(self.current)
    }

    /// Move the cursor to an existing section, e.g. back to a parent.
    pub fn focus(&mut self, section: SectionId) {
        self.current = section;
    }

    /// Open a titled top-level section and move the cursor into it.
    pub fn new_section(&mut self, title: &str) -> SectionId {
        let row = self.document.new_row();
        self.enter(row, title)
    }

    /// Open a titled section inside the current one and move the cursor into it.
    pub fn new_subsection(&mut self, title: &str) -> SectionId {
        let row = self.current().new_row();
        self.enter(row, title)
    }

    fn enter(&mut self, row: SectionId, title: &str) -> SectionId {
        self.document.section(row).title(title);
        self.current = row;
        debug!(title, level = self.document.tree().level(row), "Section opened");
        row
    }

    /// Echo source text in an `input` block of the current section.
    pub fn input(&mut self, source: &str) -> NodeId {
        let language = self.code_language.clone();
        let frame = self
            .current()
            .new_canvas("div", None, Attributes::new().klass("input"));
        self.document
            .section(frame)
            .code_with_language(source, &language)
    }

    /// Append escaped text to the current section.
    pub fn print(&mut self, text: &str) -> NodeId {
        self.current().text(text)
    }

    /// Append `value` to the current section according to its shape.
    pub fn output<T: Any + Debug>(&mut self, value: &T) -> Result<()> {
        let renderable = self.dispatcher.classify(value);
        self.embed(renderable)
    }

    /// Append an already-classified value to the current section.
    pub fn embed(&mut self, renderable: Renderable<'_>) -> Result<()> {
        debug!(kind = renderable.kind(), "Output embedded");
        let mut section = self.document.section(self.current);
        match renderable {
            Renderable::Text(text) => {
                section.text(&text);
            }
            Renderable::Generic(dump) => {
                section.text(&dump);
            }
            Renderable::Table(table) => section.table(table),
            Renderable::Image(figure) => {
                section.figure(figure)?;
            }
        }
        Ok(())
    }

    /// Render the document as lines.
    pub fn render(&self) -> Vec<String> {
        self.document.render(0)
    }
}

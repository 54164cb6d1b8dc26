//! Open figures produced while a step runs.
//!
//! Steps draw into the backend; when a recorded step finishes, the current
//! figure is embedded and every open figure is closed so nothing carries
//! over into the next step.

use dash_markup::ArtifactEncoder;
use tracing::trace;

/// Stack of open figures; the last one opened is current.
#[derive(Debug, Default)]
pub struct FigureBackend {
    open: Vec<Box<dyn ArtifactEncoder>>,
}

impl FigureBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a figure and make it current.
    pub fn open(&mut self, figure: impl ArtifactEncoder + 'static) {
        self.open.push(Box::new(figure));
        trace!(open = self.open.len(), "Figure opened");
    }

    /// The current figure, if any.
    pub fn current(&self) -> Option<&dyn ArtifactEncoder> {
        self.open.last().map(|f| f.as_ref())
    }

    /// Whether the current figure has drawn content.
    pub fn has_drawn(&self) -> bool {
        self.current().is_some_and(|f| f.has_content())
    }

    pub fn open_count(&self) -> usize {
        self.open.len()
    }

    /// Close every figure and hand back the current one.
    pub fn take_current(&mut self) -> Option<Box<dyn ArtifactEncoder>> {
        let current = self.open.pop();
        self.close_all();
        current
    }

    /// Close every open figure.
    pub fn close_all(&mut self) {
        self.open.clear();
    }
}

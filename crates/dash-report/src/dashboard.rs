//! Instrumented report sessions.
//!
//! A [`Dashboard`] owns the document being written, the registered report
//! steps and the figure backend. Steps run through one of two doors:
//!
//! - [`Dashboard::dispatch`] is the top-level entry point. When no step is
//!   already running it records the call: a titled section, the step's
//!   source excerpt, everything the step prints or outputs, any failure,
//!   and the figure left open at the end.
//! - [`Dashboard::call`] is for steps invoking other steps. It runs the
//!   handler directly with no section of its own, so only the outermost
//!   step shows up in the report.

use crate::assets::{AssetInjector, StyleDirectory};
use crate::config::{DashboardConfig, FailurePolicy};
use crate::error::{ReportError, Result};
use crate::figures::FigureBackend;
use crate::invocation::Invocation;
use crate::output::{OutputDispatcher, Renderable};
use crate::recorder::ReportRecorder;
use crate::signature::{Args, BoundArgs};
use crate::step::{ReportStep, StepRegistry};
use chrono::{DateTime, Utc};
use dash_markup::{ArtifactEncoder, Canvas, HtmlDocument, SectionId};
use std::any::Any;
use std::fmt::Debug;
use std::io::Write as _;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::rc::Rc;
use tracing::{debug, info, warn};

/// Where text written through [`std::fmt::Write`] ends up.
#[derive(Debug)]
enum TextSink {
    /// Process stdout, outside recorded steps.
    Stdout,
    /// Pending paragraph text for the current section.
    Document(String),
}

/// A report being recorded.
pub struct Dashboard {
    config: DashboardConfig,
    recorder: ReportRecorder,
    steps: StepRegistry,
    figures: FigureBackend,
    depth: usize,
    sink: TextSink,
    generated_at: DateTime<Utc>,
}

impl Dashboard {
    /// Create a dashboard with the default output dispatcher.
    pub fn new(config: DashboardConfig) -> Result<Self> {
        Self::with_dispatcher(config, OutputDispatcher::default())
    }

    /// Create a dashboard with a custom output dispatcher.
    pub fn with_dispatcher(config: DashboardConfig, dispatcher: OutputDispatcher) -> Result<Self> {
        config.validate()?;
        let generated_at = Utc::now();
        let mut recorder = ReportRecorder::with_dispatcher(config.title.clone(), dispatcher);
        recorder.set_code_language(config.code_language.clone());

        let document = recorder.document_mut();
        if config.include_generator_meta {
            document.add_meta(
                "generator",
                &format!("dash-report {}", env!("CARGO_PKG_VERSION")),
            );
            document.add_meta("generated", &generated_at.to_rfc3339());
        }
        if let Some(root) = &config.asset_root {
            StyleDirectory::new(root, &config.style).inject(document)?;
        }
        if let Some(script) = &config.highlight_init {
            document.add_script(script);
        }
        document.title(&config.title);

        debug!(title = %config.title, style = %config.style, "Dashboard created");
        Ok(Self {
            config,
            recorder,
            steps: StepRegistry::new(),
            figures: FigureBackend::new(),
            depth: 0,
            sink: TextSink::Stdout,
            generated_at,
        })
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    /// Register a step so it can be dispatched or called.
    pub fn register(&mut self, step: ReportStep) -> Result<&mut Self> {
        debug!(step = step.name(), "Step registered");
        self.steps.register(step)?;
        Ok(self)
    }

    pub fn steps(&self) -> &StepRegistry {
        &self.steps
    }

    pub fn recorder(&self) -> &ReportRecorder {
        &self.recorder
    }

    pub fn recorder_mut(&mut self) -> &mut ReportRecorder {
        self.flush_text();
        &mut self.recorder
    }

    pub fn document(&self) -> &HtmlDocument {
        self.recorder.document()
    }

    /// Whether a recorded step is running.
    pub fn is_recording(&self) -> bool {
        matches!(self.sink, TextSink::Document(_))
    }

    /// Open a figure; the current one is embedded when the recorded step ends.
    pub fn open_figure(&mut self, figure: impl ArtifactEncoder + 'static) {
        self.figures.open(figure);
    }

    pub fn figures(&self) -> &FigureBackend {
        &self.figures
    }

    pub fn figures_mut(&mut self) -> &mut FigureBackend {
        &mut self.figures
    }

    /// Authoring view over the section currently receiving output.
    pub fn current(&mut self) -> Canvas<'_> {
        self.flush_text();
        self.recorder.current()
    }

    /// Open a titled section and move output into it.
    pub fn new_section(&mut self, title: &str) -> SectionId {
        self.flush_text();
        self.recorder.new_section(title)
    }

    /// Open a titled section inside the current one.
    pub fn new_subsection(&mut self, title: &str) -> SectionId {
        self.flush_text();
        self.recorder.new_subsection(title)
    }

    /// Append `value` to the current section according to its shape.
    pub fn output<T: Any + Debug>(&mut self, value: &T) -> Result<()> {
        self.flush_text();
        self.recorder.output(value)
    }

    /// Print a line: into the document while recording, to stdout otherwise.
    pub fn print(&mut self, message: impl std::fmt::Display) {
        // Writing to a String never fails; stdout failures are not fatal to the report.
        let _ = std::fmt::Write::write_fmt(self, format_args!("{message}\n"));
    }

    /// Top-level entry point: record `name` unless a step is already running.
    pub fn dispatch(&mut self, name: &str, args: &Args) -> Result<&mut Self> {
        let top_level = self.depth == 0;
        self.invoke(name, args, top_level)
    }

    /// Invoke `name` from inside a step without recording it.
    pub fn call(&mut self, name: &str, args: &Args) -> Result<&mut Self> {
        self.invoke(name, args, false)
    }

    /// Dispatch each invocation in order.
    pub fn run(&mut self, invocations: &[Invocation]) -> Result<&mut Self> {
        for invocation in invocations {
            self.dispatch(&invocation.step, &invocation.args)?;
        }
        Ok(self)
    }

    fn invoke(&mut self, name: &str, args: &Args, record: bool) -> Result<&mut Self> {
        let step = self
            .steps
            .get(name)
            .ok_or_else(|| ReportError::UnknownStep(name.to_string()))?;
        let bound = step.signature().bind(args)?;

        if record {
            self.record(&step, &bound)?;
            return Ok(self);
        }

        debug!(step = name, depth = self.depth, "Step called without recording");
        let depth = self.depth;
        self.depth += 1;
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| step.run(self, &bound)));
        self.depth = depth;
        let result = outcome.unwrap_or_else(|payload| panic::resume_unwind(payload));
        result.map_err(|err| ReportError::InstrumentedCallFailure {
            step: name.to_string(),
            message: format_failure(&*err),
        })?;
        Ok(self)
    }

    fn record(&mut self, step: &Rc<ReportStep>, bound: &BoundArgs) -> Result<()> {
        let title = bound.title();
        info!(step = step.name(), %title, "Recording step");

        self.recorder.new_section(&title);
        if !step.excerpt().is_empty() {
            self.recorder.input(step.excerpt());
        }

        let previous = std::mem::replace(&mut self.sink, TextSink::Document(String::new()));
        self.depth = 1;
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| step.run(self, bound)));
        self.depth = 0;
        self.flush_text();
        self.sink = previous;

        let failure = match outcome {
            Ok(Ok(())) => None,
            Ok(Err(err)) => Some(format_failure(&*err)),
            Err(payload) => Some(format_panic(payload.as_ref())),
        };
        if let Some(message) = &failure {
            warn!(step = step.name(), error = %message, "Step failed");
            self.recorder.print(message);
        }

        if self.figures.has_drawn() {
            if let Some(figure) = self.figures.take_current() {
                if let Err(err) = self.recorder.embed(Renderable::Image(&*figure)) {
                    warn!(step = step.name(), error = %err, "Figure could not be embedded");
                    self.recorder.print(&format!("figure could not be embedded: {err}"));
                }
            }
        }
        self.figures.close_all();

        match (failure, self.config.failure_policy) {
            (Some(message), FailurePolicy::RecordAndPropagate) => {
                Err(ReportError::InstrumentedCallFailure {
                    step: step.name().to_string(),
                    message,
                })
            }
            _ => Ok(()),
        }
    }

    /// Move captured text into the current section as one paragraph.
    fn flush_text(&mut self) {
        let TextSink::Document(pending) = &mut self.sink else {
            return;
        };
        if pending.is_empty() {
            return;
        }
        let mut text = std::mem::take(pending);
        if text.ends_with('\n') {
            text.pop();
        }
        self.recorder.print(&text);
    }

    /// Render the document, minified if configured.
    pub fn show(&self) -> String {
        let html = self.recorder.document().to_html();
        let output = if self.config.minify {
            let cfg = minify_html::Cfg {
                minify_js: true,
                minify_css: true,
                ..Default::default()
            };
            String::from_utf8(minify_html::minify(html.as_bytes(), &cfg)).unwrap_or(html)
        } else {
            html
        };

        info!(
            bytes = output.len(),
            title = %self.config.title,
            "Report rendered"
        );
        output
    }

    /// Render and write the document to `path`.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.show())?;
        Ok(())
    }
}

impl std::fmt::Write for Dashboard {
    fn write_str(&mut self, s: &str) -> std::fmt::Result {
        match &mut self.sink {
            TextSink::Stdout => std::io::stdout()
                .write_all(s.as_bytes())
                .map_err(|_| std::fmt::Error),
            TextSink::Document(pending) => {
                pending.push_str(s);
                Ok(())
            }
        }
    }
}

impl std::fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("title", &self.config.title)
            .field("steps", &self.steps.names())
            .field("depth", &self.depth)
            .field("sink", &self.sink)
            .finish_non_exhaustive()
    }
}

/// Failure text for an error and its source chain.
pub fn format_failure(err: &(dyn std::error::Error + 'static)) -> String {
    let mut text = format!("Error: {err}");
    let mut source = err.source();
    while let Some(cause) = source {
        text.push_str(&format!("\n  caused by: {cause}"));
        source = cause.source();
    }
    text
}

/// Failure text for a panic payload.
pub fn format_panic(payload: &(dyn Any + Send)) -> String {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string());
    format!("Panic: {detail}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::Signature;
    use std::fmt::Write as _;

    fn quiet_config() -> DashboardConfig {
        DashboardConfig::new()
            .with_title("Test")
            .with_generator_meta(false)
            .with_highlight_init(None)
    }

    #[test]
    fn test_frame_titled_on_creation() {
        let dash = Dashboard::new(quiet_config()).unwrap();
        let html = dash.show();
        assert!(html.contains("<h1>"));
        assert!(html.contains("<title>"));
        assert!(!html.contains("hljs"));
    }

    #[test]
    fn test_generator_meta() {
        let dash = Dashboard::new(DashboardConfig::new()).unwrap();
        let html = dash.show();
        assert!(html.contains(r#"<meta name="generator" content="dash-report "#));
        assert!(html.contains(r#"<meta name="generated" content=""#));
        assert!(html.contains("hljs.initHighlightingOnLoad();"));
    }

    #[test]
    fn test_print_outside_step_leaves_document_alone() {
        let mut dash = Dashboard::new(quiet_config()).unwrap();
        let before = dash.show();
        write!(dash, "").unwrap();
        assert!(!dash.is_recording());
        assert_eq!(before, dash.show());
    }

    #[test]
    fn test_unknown_step() {
        let mut dash = Dashboard::new(quiet_config()).unwrap();
        assert!(matches!(
            dash.dispatch("nope", &Args::new()),
            Err(ReportError::UnknownStep(_))
        ));
    }

    #[test]
    fn test_depth_restored_after_panic_in_nested_call() {
        let mut dash = Dashboard::new(quiet_config()).unwrap();
        dash.register(ReportStep::new(Signature::new("boom"), |_, _| panic!("kaboom")))
            .unwrap();
        dash.register(ReportStep::new(Signature::new("outer"), |d, _| {
            d.call("boom", &Args::new())?;
            Ok(())
        }))
        .unwrap();
        dash.register(ReportStep::new(Signature::new("after"), |d, _| {
            d.print("still recorded");
            Ok(())
        }))
        .unwrap();

        dash.dispatch("outer", &Args::new()).unwrap();
        dash.dispatch("after", &Args::new()).unwrap();
        let html = dash.show();
        assert!(html.contains("Panic: kaboom"));
        assert!(html.contains("after()"));
        assert!(html.contains("still recorded"));
    }

    #[test]
    fn test_depth_restored_after_panic_in_top_level_call() {
        let mut dash = Dashboard::new(quiet_config()).unwrap();
        dash.register(ReportStep::new(Signature::new("boom"), |_, _| panic!("kaboom")))
            .unwrap();
        dash.register(ReportStep::new(Signature::new("after"), |d, _| {
            d.print("recorded after panic");
            Ok(())
        }))
        .unwrap();

        let caught = panic::catch_unwind(AssertUnwindSafe(|| {
            let _ = dash.call("boom", &Args::new());
        }));
        assert!(caught.is_err());
        assert_eq!(dash.depth, 0);

        dash.dispatch("after", &Args::new()).unwrap();
        let html = dash.show();
        assert!(html.contains("after()"));
        assert!(html.contains("recorded after panic"));
    }

    #[test]
    fn test_format_failure_chain() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "data.csv");
        let err = ReportError::from(io);
        let text = format_failure(&err);
        assert!(text.starts_with("Error: IO error: data.csv"));
    }

    #[test]
    fn test_format_panic_payloads() {
        let s: Box<dyn Any + Send> = Box::new("static");
        assert_eq!(format_panic(s.as_ref()), "Panic: static");
        let owned: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(format_panic(owned.as_ref()), "Panic: owned");
        let other: Box<dyn Any + Send> = Box::new(7u8);
        assert_eq!(format_panic(other.as_ref()), "Panic: non-string panic payload");
    }
}

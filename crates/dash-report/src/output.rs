//! Capability dispatch for values written to a report.
//!
//! A value is offered to an ordered list of [`OutputProbe`]s; the first
//! probe that recognizes it decides how it is rendered. Values nobody
//! claims fall back to a pretty `Debug` dump.

use dash_markup::{ArtifactEncoder, DataTable, PngArtifact, SvgArtifact, TabularRenderer};
use std::any::Any;
use std::borrow::Cow;
use std::fmt::Debug;
use std::marker::PhantomData;

/// How a value is embedded into the current section.
#[derive(Debug)]
pub enum Renderable<'a> {
    /// Escaped paragraph text.
    Text(Cow<'a, str>),
    /// Pre-rendered table markup.
    Table(&'a dyn TabularRenderer),
    /// Inline image.
    Image(&'a dyn ArtifactEncoder),
    /// Structural dump of an unrecognized value, shown as text.
    Generic(String),
}

impl Renderable<'_> {
    /// Short name of the variant, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Renderable::Text(_) => "text",
            Renderable::Table(_) => "table",
            Renderable::Image(_) => "image",
            Renderable::Generic(_) => "generic",
        }
    }
}

/// Recognizes values of a particular shape.
pub trait OutputProbe {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Claim `value` if it has this probe's shape.
    fn probe<'a>(&self, value: &'a dyn Any) -> Option<Renderable<'a>>;
}

/// Claims `String` and `&'static str` values as text.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextProbe;

impl OutputProbe for TextProbe {
    fn name(&self) -> &str {
        "text"
    }

    fn probe<'a>(&self, value: &'a dyn Any) -> Option<Renderable<'a>> {
        if let Some(s) = value.downcast_ref::<String>() {
            return Some(Renderable::Text(Cow::Borrowed(s.as_str())));
        }
        value
            .downcast_ref::<&'static str>()
            .map(|s| Renderable::Text(Cow::Borrowed(*s)))
    }
}

/// Claims `serde_json::Value`s; strings become text, the rest pretty JSON.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonProbe;

impl OutputProbe for JsonProbe {
    fn name(&self) -> &str {
        "json"
    }

    fn probe<'a>(&self, value: &'a dyn Any) -> Option<Renderable<'a>> {
        let json = value.downcast_ref::<serde_json::Value>()?;
        Some(match json {
            serde_json::Value::String(s) => Renderable::Text(Cow::Borrowed(s.as_str())),
            other => Renderable::Text(Cow::Owned(
                serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
            )),
        })
    }
}

/// Claims values of type `T` as figures.
pub struct FigureProbe<T>(PhantomData<fn() -> T>);

impl<T> Default for FigureProbe<T> {
    fn default() -> Self {
        Self(PhantomData)
    }
}

impl<T: ArtifactEncoder + 'static> OutputProbe for FigureProbe<T> {
    fn name(&self) -> &str {
        std::any::type_name::<T>()
    }

    fn probe<'a>(&self, value: &'a dyn Any) -> Option<Renderable<'a>> {
        value
            .downcast_ref::<T>()
            .map(|v| Renderable::Image(v as &dyn ArtifactEncoder))
    }
}

/// Claims values of type `T` as tables.
pub struct TableProbe<T>(PhantomData<fn() -> T>);

impl<T> Default for TableProbe<T> {
    fn default() -> Self {
        Self(PhantomData)
    }
}

impl<T: TabularRenderer + 'static> OutputProbe for TableProbe<T> {
    fn name(&self) -> &str {
        std::any::type_name::<T>()
    }

    fn probe<'a>(&self, value: &'a dyn Any) -> Option<Renderable<'a>> {
        value
            .downcast_ref::<T>()
            .map(|v| Renderable::Table(v as &dyn TabularRenderer))
    }
}

/// Ordered probe list with a generic fallback.
pub struct OutputDispatcher {
    probes: Vec<Box<dyn OutputProbe>>,
}

impl Default for OutputDispatcher {
    fn default() -> Self {
        Self::new()
            .with_figure::<PngArtifact>()
            .with_figure::<SvgArtifact>()
            .with_figure::<Box<dyn ArtifactEncoder>>()
            .with_table::<DataTable>()
            .with_probe(TextProbe)
            .with_probe(JsonProbe)
    }
}

impl OutputDispatcher {
    /// A dispatcher with no probes; everything falls back to the dump.
    pub fn new() -> Self {
        Self { probes: Vec::new() }
    }

    /// Append a probe; earlier probes win.
    pub fn with_probe(mut self, probe: impl OutputProbe + 'static) -> Self {
        self.register(probe);
        self
    }

    /// Treat values of type `T` as figures.
    pub fn with_figure<T: ArtifactEncoder + 'static>(self) -> Self {
        self.with_probe(FigureProbe::<T>::default())
    }

    /// Treat values of type `T` as tables.
    pub fn with_table<T: TabularRenderer + 'static>(self) -> Self {
        self.with_probe(TableProbe::<T>::default())
    }

    /// Append a probe in place.
    pub fn register(&mut self, probe: impl OutputProbe + 'static) {
        self.probes.push(Box::new(probe));
    }

    /// Names of the registered probes, in order.
    pub fn probe_names(&self) -> Vec<&str> {
        self.probes.iter().map(|p| p.name()).collect()
    }

    /// Decide how `value` is rendered.
    pub fn classify<'a, T: Any + Debug>(&self, value: &'a T) -> Renderable<'a> {
        let any: &'a dyn Any = value;
        self.probes
            .iter()
            .find_map(|probe| probe.probe(any))
            .unwrap_or_else(|| Renderable::Generic(format!("{value:#?}")))
    }
}

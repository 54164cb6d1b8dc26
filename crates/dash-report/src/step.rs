//! Report steps and their registry.
//!
//! A [`ReportStep`] pairs a plain handler function with its declared
//! [`Signature`] and the source excerpt shown above its output. Steps are
//! registered explicitly on a [`Dashboard`](crate::Dashboard); only
//! registered steps are instrumented.

use crate::dashboard::Dashboard;
use crate::error::{ReportError, Result, StepResult};
use crate::signature::{BoundArgs, Signature};
use crate::source::clean_source;
use std::rc::Rc;

/// Handler invoked with the dashboard and the bound arguments.
pub type StepHandler = dyn Fn(&mut Dashboard, &BoundArgs) -> StepResult;

/// A registered, instrumentable report step.
pub struct ReportStep {
    signature: Signature,
    excerpt: String,
    description: Option<String>,
    handler: Box<StepHandler>,
}

impl ReportStep {
    /// Create a step from its signature and handler.
    pub fn new<F>(signature: Signature, handler: F) -> Self
    where
        F: Fn(&mut Dashboard, &BoundArgs) -> StepResult + 'static,
    {
        Self {
            signature,
            excerpt: String::new(),
            description: None,
            handler: Box::new(handler),
        }
    }

    /// Attach the step's full definition text; the body is extracted and dedented.
    pub fn with_source(mut self, definition: &str) -> Self {
        self.excerpt = clean_source(definition);
        self
    }

    /// Attach an excerpt that is shown exactly as given.
    pub fn with_excerpt(mut self, excerpt: impl Into<String>) -> Self {
        self.excerpt = excerpt.into();
        self
    }

    /// One-line summary for step listings.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn name(&self) -> &str {
        self.signature.name()
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn excerpt(&self) -> &str {
        &self.excerpt
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub(crate) fn run(&self, dashboard: &mut Dashboard, args: &BoundArgs) -> StepResult {
        (self.handler)(dashboard, args)
    }
}

impl std::fmt::Debug for ReportStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportStep")
            .field("signature", &self.signature)
            .field("excerpt_lines", &self.excerpt.lines().count())
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Registered steps in registration order.
#[derive(Debug, Default)]
pub struct StepRegistry {
    steps: Vec<Rc<ReportStep>>,
}

impl StepRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `step`, rejecting invalid signatures and duplicate names.
    pub fn register(&mut self, step: ReportStep) -> Result<()> {
        step.signature().validate()?;
        if self.get(step.name()).is_some() {
            return Err(ReportError::DuplicateStep(step.name().to_string()));
        }
        self.steps.push(Rc::new(step));
        Ok(())
    }

    /// Look up a step by name.
    pub fn get(&self, name: &str) -> Option<Rc<ReportStep>> {
        self.steps.iter().find(|s| s.name() == name).cloned()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReportStep> {
        self.steps.iter().map(|s| s.as_ref())
    }

    pub fn names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

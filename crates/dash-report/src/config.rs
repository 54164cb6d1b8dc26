//! Dashboard configuration types.

use crate::error::{ReportError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What happens to a failure raised inside a recorded step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Record the failure in the document and continue.
    #[default]
    Record,
    /// Record the failure, then return it to the dispatcher.
    RecordAndPropagate,
}

impl std::str::FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "record" => Ok(FailurePolicy::Record),
            "record_and_propagate" | "propagate" => Ok(FailurePolicy::RecordAndPropagate),
            _ => Err(format!("unknown failure policy: {}", s)),
        }
    }
}

impl std::fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailurePolicy::Record => write!(f, "record"),
            FailurePolicy::RecordAndPropagate => write!(f, "record_and_propagate"),
        }
    }
}

/// Complete dashboard configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Schema version.
    #[serde(default = "default_schema_version")]
    pub schema_version: String,
    /// Report title; also the page title.
    #[serde(default = "default_title")]
    pub title: String,
    /// Asset style directory name under `asset_root`.
    #[serde(default = "default_style")]
    pub style: String,
    /// Directory holding style directories. No assets are injected when unset.
    #[serde(default)]
    pub asset_root: Option<PathBuf>,
    /// Language marker for echoed step source.
    #[serde(default = "default_code_language")]
    pub code_language: String,
    /// Handling of failures inside recorded steps.
    #[serde(default)]
    pub failure_policy: FailurePolicy,
    /// Minify the rendered document.
    #[serde(default)]
    pub minify: bool,
    /// Script appended to the head after injected assets.
    #[serde(default = "default_highlight_init")]
    pub highlight_init: Option<String>,
    /// Add generator and timestamp meta tags to the head.
    #[serde(default = "default_true")]
    pub include_generator_meta: bool,
}

fn default_schema_version() -> String {
    "1.0.0".to_string()
}

fn default_title() -> String {
    "Dashboard".to_string()
}

fn default_style() -> String {
    "default".to_string()
}

fn default_code_language() -> String {
    "rust".to_string()
}

fn default_highlight_init() -> Option<String> {
    Some("hljs.initHighlightingOnLoad();".to_string())
}

fn default_true() -> bool {
    true
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            title: default_title(),
            style: default_style(),
            asset_root: None,
            code_language: default_code_language(),
            failure_policy: FailurePolicy::default(),
            minify: false,
            highlight_init: default_highlight_init(),
            include_generator_meta: true,
        }
    }
}

impl DashboardConfig {
    /// Create a new dashboard configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the report title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the asset style name and root directory.
    pub fn with_assets(mut self, root: impl Into<PathBuf>, style: impl Into<String>) -> Self {
        self.asset_root = Some(root.into());
        self.style = style.into();
        self
    }

    /// Set the code language marker.
    pub fn with_code_language(mut self, language: impl Into<String>) -> Self {
        self.code_language = language.into();
        self
    }

    /// Set the failure policy.
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Enable output minification.
    pub fn with_minify(mut self, minify: bool) -> Self {
        self.minify = minify;
        self
    }

    /// Replace or drop the highlight init script.
    pub fn with_highlight_init(mut self, script: Option<String>) -> Self {
        self.highlight_init = script;
        self
    }

    /// Toggle generator meta tags.
    pub fn with_generator_meta(mut self, enabled: bool) -> Self {
        self.include_generator_meta = enabled;
        self
    }

    /// Check field values that serde cannot.
    pub fn validate(&self) -> Result<()> {
        if self.style.trim().is_empty() {
            return Err(ReportError::InvalidConfig("style must not be empty".to_string()));
        }
        if self.code_language.trim().is_empty() {
            return Err(ReportError::InvalidConfig(
                "code_language must not be empty".to_string(),
            ));
        }
        if self.style.contains(['/', '\\']) || self.style == ".." {
            return Err(ReportError::InvalidConfig(format!(
                "style '{}' must be a plain directory name",
                self.style
            )));
        }
        Ok(())
    }

    /// Load configuration from JSON.
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load and validate configuration from a JSON file.
    pub fn load(path: &std::path::Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

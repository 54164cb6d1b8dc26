//! Collaborators that turn non-textual values into embeddable markup.
//!
//! [`ArtifactEncoder`] produces a self-contained inline source for an `img`
//! element; [`TabularRenderer`] produces pre-rendered table markup lines.
//! The tree never re-renders or validates what these return.

use crate::error::{MarkupError, Result};
use crate::escape::escape_html;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// Encodes a graphical artifact into an inline image source.
pub trait ArtifactEncoder: std::fmt::Debug {
    /// Self-contained source suitable for an `img` `src` attribute.
    fn encode_inline(&self) -> Result<String>;

    /// Whether the artifact has drawn content worth embedding.
    fn has_content(&self) -> bool {
        true
    }
}

/// Renders a tabular value into markup lines.
pub trait TabularRenderer: std::fmt::Debug {
    /// Pre-rendered markup, one entry per output line.
    fn render_lines(&self) -> Vec<String>;
}

impl<T: ArtifactEncoder + ?Sized> ArtifactEncoder for Box<T> {
    fn encode_inline(&self) -> Result<String> {
        (**self).encode_inline()
    }

    fn has_content(&self) -> bool {
        (**self).has_content()
    }
}

/// A rasterized PNG image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PngArtifact {
    bytes: Vec<u8>,
}

/// PNG file signature.
const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

impl PngArtifact {
    /// Wrap encoded PNG bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl ArtifactEncoder for PngArtifact {
    fn encode_inline(&self) -> Result<String> {
        if !self.bytes.starts_with(&PNG_SIGNATURE) {
            return Err(MarkupError::Encode {
                kind: "png".to_string(),
                reason: "missing PNG signature".to_string(),
            });
        }
        Ok(format!("data:image/png;base64,{}", STANDARD.encode(&self.bytes)))
    }

    fn has_content(&self) -> bool {
        !self.bytes.is_empty()
    }
}

/// An SVG drawing kept as markup text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvgArtifact {
    markup: String,
}

impl SvgArtifact {
    pub fn new(markup: impl Into<String>) -> Self {
        Self {
            markup: markup.into(),
        }
    }

    pub fn markup(&self) -> &str {
        &self.markup
    }
}

impl ArtifactEncoder for SvgArtifact {
    fn encode_inline(&self) -> Result<String> {
        if !self.markup.contains("<svg") {
            return Err(MarkupError::Encode {
                kind: "svg".to_string(),
                reason: "no <svg> root element".to_string(),
            });
        }
        Ok(format!(
            "data:image/svg+xml;base64,{}",
            STANDARD.encode(self.markup.as_bytes())
        ))
    }

    fn has_content(&self) -> bool {
        !self.markup.trim().is_empty()
    }
}

/// Column-labelled rows of JSON values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataTable {
    /// Column headers.
    pub columns: Vec<String>,
    /// Row cells, one value per column.
    pub rows: Vec<Vec<serde_json::Value>>,
}

impl DataTable {
    /// Create a table with the given headers and no rows.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row.
    pub fn with_row(mut self, row: Vec<serde_json::Value>) -> Self {
        self.rows.push(row);
        self
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn cell_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => escape_html(s),
        serde_json::Value::Null => String::new(),
        other => escape_html(&other.to_string()),
    }
}

impl TabularRenderer for DataTable {
    fn render_lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.rows.len() + 6);
        lines.push(r#"<table class="dataframe">"#.to_string());
        lines.push("<thead>".to_string());
        let header: String = self
            .columns
            .iter()
            .map(|c| format!("<th>{}</th>", escape_html(c)))
            .collect();
        lines.push(format!("<tr>{header}</tr>"));
        lines.push("</thead>".to_string());
        lines.push("<tbody>".to_string());
        for row in &self.rows {
            let cells: String = row
                .iter()
                .map(|v| format!("<td>{}</td>", cell_text(v)))
                .collect();
            lines.push(format!("<tr>{cells}</tr>"));
        }
        lines.push("</tbody>".to_string());
        lines.push("</table>".to_string());
        lines
    }
}

//! Markup element tree and HTML renderer for dashboard reports.
//!
//! Builds an in-memory tree of elements and prints it as indented HTML,
//! one element per line.
//!
//! # Model
//!
//! - **Container**: renders as an open tag, its children one level deeper, and a close tag
//! - **Leaf**: renders as a single open tag line, never children, never a close tag
//! - **Section**: a container with a heading level, authored through [`Canvas`]
//! - **Raw text**: emitted verbatim on its own line
//!
//! # Example
//!
//! ```
//! use dash_markup::HtmlDocument;
//!
//! let mut doc = HtmlDocument::new("Weekly numbers");
//! let row = doc.new_row();
//! let mut section = doc.section(row);
//! section.title("Totals");
//! section.text("revenue < costs\nagain");
//! let html = doc.to_html();
//! assert!(html.contains("<h2>"));
//! assert!(html.contains("revenue &lt; costs<br>again"));
//! ```

pub mod artifact;
pub mod attrs;
pub mod canvas;
pub mod document;
pub mod error;
pub mod escape;
pub mod tree;

pub use artifact::{ArtifactEncoder, DataTable, PngArtifact, SvgArtifact, TabularRenderer};
pub use attrs::{Attributes, CLASS_ALIAS};
pub use canvas::{Canvas, DEFAULT_CODE_LANGUAGE, SPLIT_COLUMNS};
pub use document::{HtmlDocument, DOCTYPE};
pub use error::{MarkupError, Result};
pub use escape::{escape_html, escape_text};
pub use tree::{Child, Element, ElementKind, MarkupTree, NodeId, SectionId, INDENT};

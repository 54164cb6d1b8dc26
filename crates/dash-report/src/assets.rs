//! Inline style and script assets for the document head.

use crate::error::Result;
use dash_markup::HtmlDocument;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Injects inline assets into a document head.
pub trait AssetInjector {
    /// Insert assets and return how many were added.
    fn inject(&self, document: &mut HtmlDocument) -> Result<usize>;
}

/// Reads `*.css` and `*.js` files from one style directory.
///
/// Files are injected in file-name order: stylesheets as `<style>`,
/// scripts as `<script>`. Other files are ignored.
#[derive(Debug, Clone)]
pub struct StyleDirectory {
    dir: PathBuf,
}

impl StyleDirectory {
    /// Style `style` under `root`.
    pub fn new(root: impl AsRef<Path>, style: &str) -> Self {
        Self {
            dir: root.as_ref().join(style),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl AssetInjector for StyleDirectory {
    fn inject(&self, document: &mut HtmlDocument) -> Result<usize> {
        if !self.dir.is_dir() {
            warn!(dir = %self.dir.display(), "Style directory not found; no assets injected");
            return Ok(0);
        }

        let mut paths: Vec<PathBuf> = std::fs::read_dir(&self.dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file())
            .collect();
        paths.sort();

        let mut injected = 0;
        for path in paths {
            let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
            match extension {
                "css" => {
                    document.add_style(&std::fs::read_to_string(&path)?);
                }
                "js" => {
                    document.add_script(&std::fs::read_to_string(&path)?);
                }
                _ => {
                    debug!(path = %path.display(), "Skipping non-asset file");
                    continue;
                }
            }
            injected += 1;
        }
        debug!(dir = %self.dir.display(), injected, "Assets injected");
        Ok(injected)
    }
}

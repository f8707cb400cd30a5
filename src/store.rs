use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::formats::{LeafRef, Version};

const FALLBACK_NAME: &str = "untitled";

/// File-system safe form of a display name.
///
/// Keeps alphanumerics, `_`, `-` and whitespace, trims, and turns spaces
/// into `_`. Applying it twice yields the same result.
pub fn sanitize_name(name: &str) -> String {
    let kept = name
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '_' || *c == '-')
        .collect::<String>();
    let safe = kept.trim().replace(' ', "_");
    if safe.is_empty() {
        FALLBACK_NAME.to_owned()
    } else {
        safe
    }
}

/// A located document: where it lives on disk and how the index links to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentPath {
    pub absolute: PathBuf,
    /// Forward-slash path relative to the archive root.
    pub relative: String,
}

impl DocumentPath {
    pub fn exists(&self) -> bool {
        self.absolute.exists()
    }
}

/// Output tree `<root>/<version>/<category>/<item>.md`.
#[derive(Debug)]
pub struct Archive {
    root: PathBuf,
    claimed: HashMap<PathBuf, LeafKey>,
}

/// Identity of a page on the site, independent of its display name.
type LeafKey = (Version, String, String);

fn leaf_key(leaf: &LeafRef) -> LeafKey {
    (
        leaf.version,
        leaf.category.clone(),
        leaf.class_or_function.clone(),
    )
}

impl Archive {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            claimed: HashMap::new(),
        }
    }

    /// Reserve the document path for `leaf` in this run.
    ///
    /// Distinct pages that sanitize to the same path get `_2`, `_3`, ...
    /// in discovery order. The same page listed twice keeps one path.
    pub fn locate(&mut self, leaf: &LeafRef) -> DocumentPath {
        let (relative, new_collision) = self.claim(leaf);
        if new_collision {
            tracing::warn!(
                item = %leaf.name,
                category = %leaf.category_name,
                path = %relative.display(),
                "document path collision; using suffixed file name"
            );
        }

        DocumentPath {
            absolute: self.root.join(&relative),
            relative: to_slash_path(&relative),
        }
    }

    /// Returns the relative path and whether this call had to step past a
    /// path held by another page.
    fn claim(&mut self, leaf: &LeafRef) -> (PathBuf, bool) {
        let stem = leaf.target().relative_stem;
        let key = leaf_key(leaf);
        let mut relative = stem.with_extension("md");
        let mut n = 1_usize;
        while let Some(owner) = self.claimed.get(&relative) {
            if *owner == key {
                return (relative, false);
            }
            n += 1;
            let file_name = format!(
                "{}_{n}.md",
                stem.file_name().unwrap_or_default().to_string_lossy()
            );
            relative = stem.with_file_name(file_name);
        }
        self.claimed.insert(relative.clone(), key);
        (relative, n > 1)
    }

    pub fn write_document(
        &self,
        leaf: &LeafRef,
        path: &DocumentPath,
        body: &str,
    ) -> anyhow::Result<()> {
        let parent_dir = path.absolute.parent().ok_or_else(|| {
            anyhow::anyhow!("document path must have parent: {}", path.absolute.display())
        })?;
        std::fs::create_dir_all(parent_dir)
            .with_context(|| format!("create document dir: {}", parent_dir.display()))?;

        std::fs::write(&path.absolute, render_document(leaf, body))
            .with_context(|| format!("write document: {}", path.absolute.display()))?;
        Ok(())
    }
}

pub fn render_document(leaf: &LeafRef, body: &str) -> String {
    format!(
        "# {}\n\n**Category:** {}\n**Version:** {}\n\n---\n\n{body}",
        leaf.name, leaf.category_name, leaf.version
    )
}

fn to_slash_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

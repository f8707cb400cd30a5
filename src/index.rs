use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::formats::Manifest;

pub const MANIFEST_FILE: &str = "manifest.json";
pub const INDEX_FILE: &str = "INDEX.md";

#[derive(Debug, Clone)]
pub struct WrittenOutputs {
    pub manifest: PathBuf,
    pub index: PathBuf,
}

/// Stamp the manifest and write `manifest.json` plus `INDEX.md`.
pub fn write_outputs(
    out_dir: &Path,
    manifest: &mut Manifest,
    title: &str,
) -> anyhow::Result<WrittenOutputs> {
    manifest.metadata.generated_at = Some(chrono::Utc::now().to_rfc3339());

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("create output dir: {}", out_dir.display()))?;

    let manifest_path = out_dir.join(MANIFEST_FILE);
    let mut json = serde_json::to_string_pretty(manifest).context("serialize manifest")?;
    json.push('\n');
    std::fs::write(&manifest_path, json)
        .with_context(|| format!("write manifest: {}", manifest_path.display()))?;

    let index_path = out_dir.join(INDEX_FILE);
    std::fs::write(&index_path, render_index(manifest, title))
        .with_context(|| format!("write index: {}", index_path.display()))?;

    Ok(WrittenOutputs {
        manifest: manifest_path,
        index: index_path,
    })
}

pub fn render_index(manifest: &Manifest, title: &str) -> String {
    let mut out = String::new();
    let generated_at = manifest.metadata.generated_at.as_deref().unwrap_or("-");

    out.push_str(&format!("# {title} Index\n\n"));
    out.push_str(&format!("**Generated:** {generated_at}\n"));
    out.push_str(&format!("**Source:** {}\n", manifest.metadata.source_url));
    out.push_str(&format!("**Total Files:** {}\n\n", manifest.metadata.total_files));
    out.push_str("---\n\n");

    let mut versions = manifest.versions.iter().collect::<Vec<_>>();
    versions.sort_by_key(|(version, _)| version.as_str());

    out.push_str("## Table of Contents\n\n");
    for (version, _) in &versions {
        let anchor = version.as_str();
        out.push_str(&format!("- [{}](#{anchor})\n", anchor.to_uppercase()));
    }
    out.push_str("\n---\n\n");

    for (version, entry) in &versions {
        out.push_str(&format!("## {}\n\n", version.as_str().to_uppercase()));

        for (category, data) in &entry.categories {
            out.push_str(&format!("### {category} ({} items)\n\n", data.items.len()));

            let mut items = data.items.iter().collect::<Vec<_>>();
            items.sort_by(|a, b| a.name.cmp(&b.name));
            for item in items {
                out.push_str(&format!("- [{}]({})\n", item.name, item.path));
            }
            out.push('\n');
        }
        out.push('\n');
    }

    out
}

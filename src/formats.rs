use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Documentation family. Each family addresses its pages with a different
/// selector query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Version {
    Script,
    Engine,
}

impl Version {
    pub const ALL: [Version; 2] = [Version::Script, Version::Engine];

    pub fn as_str(self) -> &'static str {
        match self {
            Version::Script => "script",
            Version::Engine => "engine",
        }
    }

    pub fn selector_param(self) -> &'static str {
        match self {
            Version::Script => "class",
            Version::Engine => "function",
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub type QueryParams = Vec<(&'static str, String)>;

fn query_params(version: Version, category: &str, class_or_function: &str) -> QueryParams {
    vec![
        ("version", version.as_str().to_owned()),
        ("category", category.to_owned()),
        (version.selector_param(), class_or_function.to_owned()),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRef {
    pub version: Version,
    pub category: String,
    pub class_or_function: String,
    pub name: String,
}

impl CategoryRef {
    pub fn query_params(&self) -> QueryParams {
        query_params(self.version, &self.category, &self.class_or_function)
    }
}

/// Smallest scrapeable unit: a subcategory, or a category without children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafRef {
    pub version: Version,
    pub category: String,
    pub class_or_function: String,
    pub name: String,
    pub category_name: String,
}

/// Where a leaf is fetched from and where its document lands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafTarget {
    pub params: QueryParams,
    /// Relative to the output root, without the `.md` extension.
    pub relative_stem: PathBuf,
}

impl LeafRef {
    pub fn from_category(category: &CategoryRef) -> Self {
        Self {
            version: category.version,
            category: category.category.clone(),
            class_or_function: category.class_or_function.clone(),
            name: category.name.clone(),
            category_name: category.name.clone(),
        }
    }

    pub fn target(&self) -> LeafTarget {
        let relative_stem = PathBuf::from(self.version.as_str())
            .join(crate::store::sanitize_name(&self.category_name))
            .join(crate::store::sanitize_name(&self.name));
        LeafTarget {
            params: query_params(self.version, &self.category, &self.class_or_function),
            relative_stem,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub metadata: ManifestMetadata,
    pub versions: BTreeMap<Version, ManifestVersion>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestMetadata {
    pub generated_at: Option<String>,
    pub source_url: String,
    pub total_files: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestVersion {
    pub categories: BTreeMap<String, ManifestCategory>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestCategory {
    pub items: Vec<ManifestItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestItem {
    pub name: String,
    /// Forward-slash path relative to the output root.
    pub path: String,
}

impl Manifest {
    pub fn new(source_url: &str) -> Self {
        Self {
            metadata: ManifestMetadata {
                generated_at: None,
                source_url: source_url.to_owned(),
                total_files: 0,
            },
            versions: BTreeMap::new(),
        }
    }

    pub fn record(&mut self, leaf: &LeafRef, path: &str) {
        self.versions
            .entry(leaf.version)
            .or_default()
            .categories
            .entry(leaf.category_name.clone())
            .or_default()
            .items
            .push(ManifestItem {
                name: leaf.name.clone(),
                path: path.to_owned(),
            });
        self.metadata.total_files += 1;
    }
}

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::parser::types::Node;

/// Where parsed man pages come from. Fetching, caching and markup parsing
/// live behind this trait.
pub trait PageSource: Sync {
    /// Names of every page the source can provide, sorted.
    fn names(&self) -> Result<Vec<String>>;

    fn load(&self, name: &str) -> Result<Node>;
}

/// A directory of `<name>.json` files, each holding one serialized page tree.
#[derive(Debug, Clone)]
pub struct JsonPageDir {
    root: PathBuf,
}

impl JsonPageDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Only API entities get documentation blocks.
pub fn is_documentable(name: &str) -> bool {
    name.starts_with("Vk") || name.starts_with("vk") || name.starts_with("VK_")
}

impl PageSource for JsonPageDir {
    fn names(&self) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.root)
            .with_context(|| format!("reading page directory {}", self.root.display()))?;

        let mut names = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if is_documentable(stem) {
                    names.push(stem.to_string());
                }
            }
        }

        names.sort();
        debug!("found {} pages in {}", names.len(), self.root.display());
        Ok(names)
    }

    fn load(&self, name: &str) -> Result<Node> {
        let path = self.root.join(format!("{}.json", name));
        load_page(&path)
    }
}

pub fn load_page(path: &Path) -> Result<Node> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading page {}", path.display()))?;
    let page: Node = serde_json::from_str(&content)
        .with_context(|| format!("decoding page tree {}", path.display()))?;
    Ok(page)
}

//! Installed-page catalogue, used only for random selection.
//!
//! Built once per session by scanning `man?/` subdirectories of each manual
//! tree and deriving `(name, section)` from file names such as `ls.1.gz`.
//! A tree that cannot be read simply contributes nothing.

use indexmap::IndexSet;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

use super::resolver::split_page_file_name;
use super::{ManError, ManTool, ToolInvoker};
use crate::query::DocumentQuery;

/// Lazily populated list of every installed page.
#[derive(Debug, Default)]
pub struct Catalogue {
    entries: Option<Vec<DocumentQuery>>,
}

impl Catalogue {
    pub fn new() -> Self {
        Self::default()
    }

    /// A catalogue with fixed contents, skipping the directory scan.
    pub fn from_entries(entries: Vec<DocumentQuery>) -> Self {
        Self {
            entries: Some(entries),
        }
    }

    /// The catalogue entries, scanning the tool's manual trees on first use.
    pub fn entries<I: ToolInvoker>(&mut self, tool: &ManTool<I>) -> &[DocumentQuery] {
        self.entries.get_or_insert_with(|| match tool.search_path() {
            Ok(dirs) => {
                let entries = scan(&dirs);
                info!("Catalogue holds {} pages from {} tree(s)", entries.len(), dirs.len());
                entries
            }
            Err(e) => {
                warn!("{}: {:?}", e, e.reason());
                Vec::new()
            }
        })
    }
}

/// Scan manual trees for page files, de-duplicating across trees.
pub fn scan(dirs: &[PathBuf]) -> Vec<DocumentQuery> {
    let mut seen: IndexSet<DocumentQuery> = IndexSet::new();
    for dir in dirs {
        match scan_tree(dir) {
            Ok(found) => seen.extend(found),
            Err(e) => warn!("{}: {:?}", e, e.reason()),
        }
    }
    seen.into_iter().collect()
}

fn scan_tree(dir: &Path) -> Result<Vec<DocumentQuery>, ManError> {
    let unavailable = |reason: String| ManError::CatalogueUnavailable { reason };

    if !dir.is_dir() {
        return Err(unavailable(format!("{} is not a directory", dir.display())));
    }

    let pattern = format!("{}/man?/*", glob::Pattern::escape(&dir.to_string_lossy()));
    let paths = glob::glob(&pattern).map_err(|e| unavailable(e.to_string()))?;

    let mut entries = Vec::new();
    for path in paths {
        let path = match path {
            Ok(path) => path,
            Err(e) => {
                debug!("Skipping unreadable entry: {}", e);
                continue;
            }
        };
        if !path.is_file() {
            continue;
        }
        let file_name = path.file_name().and_then(|n| n.to_str());
        if let Some((name, section)) = file_name.and_then(split_page_file_name) {
            entries.push(DocumentQuery::with_section(name, section));
        }
    }
    Ok(entries)
}

use log::{debug, warn};
use regex::Regex;
use std::sync::OnceLock;

use super::{ManError, ManTool, ToolInvoker};
use crate::query::DocumentQuery;

/// Extensions the tool leaves on compressed page sources.
pub(crate) const COMPRESSION_EXTENSIONS: [&str; 6] = ["gz", "bz2", "xz", "zst", "lzma", "Z"];

impl<I: ToolInvoker> ManTool<I> {
    /// Resolve a query to its canonical `name(section)` title (`-w` mode).
    pub fn resolve(&self, query: &DocumentQuery) -> Result<String, ManError> {
        let label = query.to_string();
        let output = self
            .invoke(&["-w"], &query.tool_args())
            .map_err(|e| ManError::ToolFailure {
                query: label.clone(),
                reason: e.to_string(),
            })?;

        match output.code {
            Some(0) => {
                let path = output.stdout.lines().next().unwrap_or("").trim();
                let title = title_from_path(path).ok_or_else(|| ManError::ToolFailure {
                    query: label.clone(),
                    reason: format!("unrecognised page path {:?}", path),
                })?;
                debug!("Resolved {} to {}", label, title);
                Ok(title)
            }
            Some(code) if code == self.settings.not_found_code => {
                Err(ManError::NotFound { query: label })
            }
            code => Err(ManError::ToolFailure {
                query: label,
                reason: format!("lookup exited with {:?}", code),
            }),
        }
    }

    /// Every section providing the page's name (`-f` mode), as titles.
    ///
    /// Never fails: a tool error just means there are no alternates to offer.
    pub fn list_sections(&self, query: &DocumentQuery) -> Vec<String> {
        let args = vec![query.name.clone()];
        match self.invoke(&["-f"], &args) {
            Ok(output) if output.success() => parse_section_list(&output.stdout),
            Ok(output) => {
                debug!("No alternates for {}: exit {:?}", query.name, output.code);
                Vec::new()
            }
            Err(e) => {
                warn!("Listing sections for {} failed: {}", query.name, e);
                Vec::new()
            }
        }
    }
}

/// Derive `name(section)` from a page source path such as
/// `/usr/share/man/man1/ls.1.gz`.
pub(crate) fn title_from_path(path: &str) -> Option<String> {
    let (name, section) = split_page_file_name(path.rsplit('/').next()?)?;
    Some(format!("{}({})", name, section))
}

/// Split `ls.1.gz` / `ls.1` into `("ls", "1")`.
pub(crate) fn split_page_file_name(file_name: &str) -> Option<(&str, &str)> {
    let stem = match file_name.rsplit_once('.') {
        Some((stem, ext)) if COMPRESSION_EXTENSIONS.contains(&ext) => stem,
        _ => file_name,
    };
    let (name, section) = stem.rsplit_once('.')?;
    if name.is_empty() || section.is_empty() {
        return None;
    }
    Some((name, section))
}

/// Parse `-f` output (`ls (1)  - list directory contents`) into titles.
fn parse_section_list(stdout: &str) -> Vec<String> {
    static LINE: OnceLock<Regex> = OnceLock::new();
    let line_re = LINE.get_or_init(|| Regex::new(r"^(\S+) \((\S+)\)").unwrap());

    let mut titles: Vec<String> = Vec::new();
    for line in stdout.lines() {
        if let Some(caps) = line_re.captures(line) {
            let title = format!("{}({})", &caps[1], &caps[2]);
            if !titles.contains(&title) {
                titles.push(title);
            }
        }
    }
    titles
}

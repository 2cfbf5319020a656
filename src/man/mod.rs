//! Access to the external manual lookup tool.
//!
//! [`ManTool`] wraps a [`ToolInvoker`] with the settings every call shares
//! (manual directory, locale override, timeout, not-found exit code) and
//! exposes the three things the navigator needs from the tool:
//!
//! - [`ManTool::resolve`] / [`ManTool::list_sections`]: query → canonical title
//! - [`ManTool::fetch`]: title → hypertext (+ plain glyphs when tables need it)
//! - [`ManTool::search_path`]: the default manual directories, for the catalogue

pub mod catalogue;
mod error;
mod fetcher;
pub mod invoker;
mod resolver;

pub use catalogue::Catalogue;
pub use error::{InvokeError, ManError};
pub use fetcher::FetchedPage;
pub use invoker::{SubprocessInvoker, ToolInvoker, ToolOutput};

use std::path::PathBuf;
use std::time::Duration;

use crate::config::ManConfig;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_NOT_FOUND_CODE: i32 = 16;

/// Settings shared by every tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolSettings {
    /// Manual tree passed as `-M`; `None` uses the tool's own search path.
    pub directory: Option<PathBuf>,
    /// Passed as `-L<locale>`.
    pub locale: Option<String>,
    pub timeout: Duration,
    /// Exit code the tool uses for "no such page" in `-w` mode.
    pub not_found_code: i32,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            directory: None,
            locale: None,
            timeout: DEFAULT_TIMEOUT,
            not_found_code: DEFAULT_NOT_FOUND_CODE,
        }
    }
}

impl From<&ManConfig> for ToolSettings {
    fn from(config: &ManConfig) -> Self {
        Self {
            directory: config.directory.clone(),
            locale: config.locale.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
            not_found_code: config.not_found_exit_code,
        }
    }
}

/// The lookup tool plus its invocation settings.
pub struct ManTool<I> {
    invoker: I,
    settings: ToolSettings,
}

impl<I: ToolInvoker> ManTool<I> {
    pub fn new(invoker: I, settings: ToolSettings) -> Self {
        Self { invoker, settings }
    }

    /// `-D [-M dir] [-L locale]`, prepended to every invocation.
    fn base_args(&self) -> Vec<String> {
        let mut args = vec!["-D".to_string()];
        if let Some(dir) = &self.settings.directory {
            args.push("-M".to_string());
            args.push(dir.display().to_string());
        }
        if let Some(locale) = &self.settings.locale {
            args.push(format!("-L{}", locale));
        }
        args
    }

    fn invoke(&self, mode: &[&str], query: &[String]) -> Result<ToolOutput, InvokeError> {
        let mut args = self.base_args();
        args.extend(mode.iter().map(|s| s.to_string()));
        args.extend(query.iter().cloned());
        self.invoker.run(&args, self.settings.timeout)
    }

    /// Directories the tool searches by default (`-w` with no page).
    ///
    /// Returns the configured directory when there is one.
    pub fn search_path(&self) -> Result<Vec<PathBuf>, ManError> {
        if let Some(dir) = &self.settings.directory {
            return Ok(vec![dir.clone()]);
        }

        let failure = |reason: String| ManError::CatalogueUnavailable { reason };
        let output = self.invoke(&["-w"], &[]).map_err(|e| failure(e.to_string()))?;
        if !output.success() {
            return Err(failure(format!("search path lookup exited with {:?}", output.code)));
        }

        Ok(output
            .stdout
            .trim()
            .split(':')
            .filter(|entry| !entry.is_empty())
            .map(PathBuf::from)
            .collect())
    }
}

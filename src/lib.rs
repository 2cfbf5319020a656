//! # manview
//!
//! A manual page navigator library: resolves free-form queries to manual
//! pages through the system's lookup tool, turns the tool's HTML rendering
//! into a linked, table-aware document, and keeps a back/forward history of
//! what was opened.
//!
//! ## Features
//!
//! - Query parsing (`ls`, `ls(1)`, `3 printf`, several at once)
//! - Cross-references rewritten to `manpage:` links
//! - Tables rebuilt from the tool's box-drawing rendering
//! - URL and e-mail linkification
//! - De-duplicated history with a cursor and a raw-text view
//! - Random pages from the installed catalogue
//!
//! ## Example
//!
//! ```no_run
//! use manview::man::{ManTool, SubprocessInvoker, ToolSettings};
//! use manview::navigator::{Navigator, NavigatorOptions};
//!
//! let tool = ManTool::new(SubprocessInvoker::new("man"), ToolSettings::default());
//! let mut navigator = Navigator::new(tool, NavigatorOptions::default());
//!
//! navigator.open_query("ls(1) grep");
//! for title in navigator.history().titles() {
//!     println!("{}", title);
//! }
//! for message in navigator.errors().iter() {
//!     eprintln!("{}", message);
//! }
//! ```

/// Configuration file handling.
///
/// Tool invocation, display switches and colours, persisted as TOML.
pub mod config;

/// History entries, cursor and the session error log.
pub mod history;

/// Lookup tool access: resolution, fetching and the page catalogue.
pub mod man;

/// Markup transformation pipeline.
pub mod markup;

/// Navigation state machine and the presentation boundary.
pub mod navigator;

/// Query parsing.
pub mod query;

/// Line-oriented front end used by the binary.
pub mod shell;

/// Stylesheet for rendered pages.
pub mod style;

#[cfg(test)]
mod test_support;

pub use config::Config;
pub use history::{Direction, ErrorLog, NavigationHistory, PageView, ResolvedDocument};
pub use man::{ManError, ManTool, SubprocessInvoker, ToolInvoker, ToolOutput};
pub use markup::{FormattedText, TransformOptions, transform};
pub use navigator::{Navigator, NavigatorOptions, OpenRequest, Outcome, Presenter};
pub use query::{DocumentQuery, parse};

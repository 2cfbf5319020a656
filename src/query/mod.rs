//! Free-form query parsing.
//!
//! Turns whatever the user typed (command line arguments or the inline
//! search box) into an ordered list of [`DocumentQuery`] values, one per
//! manual page requested.
//!
//! ```
//! use manview::query::{DocumentQuery, parse};
//!
//! let queries = parse("ls(1) grep");
//! assert_eq!(queries, vec![
//!     DocumentQuery::with_section("ls", "1"),
//!     DocumentQuery::new("grep"),
//! ]);
//! ```

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::OnceLock;

/// A request for one manual page, before the tool has resolved it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DocumentQuery {
    pub name: String,
    /// `None` lets the lookup tool pick its default section.
    pub section: Option<String>,
}

impl DocumentQuery {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            section: None,
        }
    }

    pub fn with_section(name: impl Into<String>, section: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            section: Some(section.into()),
        }
    }

    /// Build a query from a canonical `name(section)` title.
    ///
    /// Returns `None` when the text is not in title form.
    pub fn from_title(title: &str) -> Option<Self> {
        let (name, rest) = title.split_once('(')?;
        let section = rest.strip_suffix(')')?;
        if name.is_empty() || section.is_empty() {
            return None;
        }
        Some(Self::with_section(name, section))
    }

    /// Arguments handed to the lookup tool: `[section] name`.
    pub fn tool_args(&self) -> Vec<String> {
        match &self.section {
            Some(section) => vec![section.clone(), self.name.clone()],
            None => vec![self.name.clone()],
        }
    }

    /// Canonical `name(section)` form, when the section is known.
    pub fn title(&self) -> Option<String> {
        self.section
            .as_ref()
            .map(|section| format!("{}({})", self.name, section))
    }
}

impl fmt::Display for DocumentQuery {
    /// Formats as the normalised token: `section name` or just `name`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.section {
            Some(section) => write!(f, "{} {}", section, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

const QUOTES: [char; 3] = ['"', '\'', '`'];

/// Parse user input into document queries.
///
/// Rules, applied in order:
/// - quote characters (`"`, `'`, `` ` ``) are dropped
/// - a digit-led run followed by a space and a second run is one
///   `section name` token, any other non-space run is a name-only token
/// - `name(section)` is rewritten to `section name`
/// - tokens starting with `-` are discarded
///
/// An input with nothing left after filtering yields an empty list.
pub fn parse(input: &str) -> Vec<DocumentQuery> {
    normalized_tokens(input)
        .iter()
        .map(|token| token_to_query(token))
        .collect()
}

/// The normalised `section name` / `name` tokens, as strings.
pub fn normalized_tokens(input: &str) -> Vec<String> {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    static PARENS: OnceLock<Regex> = OnceLock::new();

    let token_re = TOKEN.get_or_init(|| Regex::new(r"\d(?:\S+)? \S+|\S+").unwrap());
    let parens_re = PARENS.get_or_init(|| Regex::new(r"(.+)\((.+)\)").unwrap());

    let cleaned: String = input.chars().filter(|c| !QUOTES.contains(c)).collect();

    token_re
        .find_iter(&cleaned)
        .map(|m| {
            let token = m.as_str();
            if token.contains('(') {
                parens_re.replace(token, "$2 $1").into_owned()
            } else {
                token.to_string()
            }
        })
        .filter(|token| !token.is_empty() && !token.starts_with('-'))
        .collect()
}

fn token_to_query(token: &str) -> DocumentQuery {
    match token.split_once(' ') {
        Some((section, name)) => DocumentQuery::with_section(name, section),
        None => DocumentQuery::new(token),
    }
}

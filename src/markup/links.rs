//! Link targets inside transformed pages.
//!
//! The transformer emits two internal schemes alongside ordinary web links:
//! `manpage:NAME.SECTION` for cross-references and `raw:currentpage` for
//! "show the plain-glyph rendering". This module classifies an activated URI.

use crate::query::DocumentQuery;

pub const MANPAGE_SCHEME: &str = "manpage";
pub const RAW_SCHEME: &str = "raw";
pub const RAW_LINK: &str = "raw:currentpage";

/// Where an activated link leads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTarget {
    /// Another manual page (`manpage:ls.1`)
    Manual(DocumentQuery),
    /// The plain-glyph rendering of the current page (`raw:currentpage`)
    Raw,
    /// Anything else: web, mail, unknown schemes
    External(String),
}

impl LinkTarget {
    /// Classify a URI by its scheme.
    pub fn parse(uri: &str) -> Self {
        match uri.split_once(':') {
            Some((MANPAGE_SCHEME, rest)) => {
                let rest = rest.trim_start_matches('/');
                match rest.rsplit_once('.') {
                    Some((name, section)) if !name.is_empty() && !section.is_empty() => {
                        LinkTarget::Manual(DocumentQuery::with_section(name, section))
                    }
                    _ => LinkTarget::Manual(DocumentQuery::new(rest)),
                }
            }
            Some((RAW_SCHEME, _)) => LinkTarget::Raw,
            _ => LinkTarget::External(external_url(uri)),
        }
    }

    /// A string representation of the target for display
    pub fn as_str(&self) -> String {
        match self {
            LinkTarget::Manual(query) => match &query.section {
                Some(section) => format!("{}:{}.{}", MANPAGE_SCHEME, query.name, section),
                None => format!("{}:{}", MANPAGE_SCHEME, query.name),
            },
            LinkTarget::Raw => RAW_LINK.to_string(),
            LinkTarget::External(url) => url.clone(),
        }
    }
}

/// Internal link for a cross-reference to `name(section)`.
pub fn manpage_uri(name: &str, section: &str) -> String {
    format!("{}:{}.{}", MANPAGE_SCHEME, name, section)
}

/// Undo the typesetter's hyphen-to-minus substitution so the URL works
/// outside the page.
pub fn external_url(uri: &str) -> String {
    uri.replace('\u{2212}', "-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_manpage_link() {
        assert_eq!(
            LinkTarget::parse("manpage:ls.1"),
            LinkTarget::Manual(DocumentQuery::with_section("ls", "1"))
        );
        assert_eq!(
            LinkTarget::parse("manpage:systemd.unit.5"),
            LinkTarget::Manual(DocumentQuery::with_section("systemd.unit", "5"))
        );
    }

    #[test]
    fn test_parse_manpage_without_section() {
        assert_eq!(
            LinkTarget::parse("manpage:ls"),
            LinkTarget::Manual(DocumentQuery::new("ls"))
        );
    }

    #[test]
    fn test_parse_raw_link() {
        assert_eq!(LinkTarget::parse(RAW_LINK), LinkTarget::Raw);
        assert_eq!(LinkTarget::parse("raw://currentpage"), LinkTarget::Raw);
    }

    #[test]
    fn test_parse_external_links() {
        assert_eq!(
            LinkTarget::parse("https://example.com/a\u{2212}b"),
            LinkTarget::External("https://example.com/a-b".to_string())
        );
        assert_eq!(
            LinkTarget::parse("mailto:bugs@example.org"),
            LinkTarget::External("mailto:bugs@example.org".to_string())
        );
        assert_eq!(
            LinkTarget::parse("gopher://old.example"),
            LinkTarget::External("gopher://old.example".to_string())
        );
    }

    #[test]
    fn test_round_trip_display() {
        let target = LinkTarget::parse(&manpage_uri("grep", "1"));
        assert_eq!(target.as_str(), "manpage:grep.1");
    }
}

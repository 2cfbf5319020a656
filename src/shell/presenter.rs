use log::{debug, warn};
use regex::Regex;
use serde::Serialize;
use std::io::{self, Write};
use std::sync::OnceLock;

use crate::history::PageView;
use crate::navigator::Presenter;
use crate::style::StyleSheet;

/// How rendered pages are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// Complete HTML document with the stylesheet filled in
    #[default]
    Html,
    /// Tags stripped, entities decoded
    Text,
    /// One JSON object per page
    Json,
}

/// JSON shape of a rendered page.
#[derive(Debug, Serialize)]
struct PageSummary<'a> {
    title: &'a str,
    sections: &'a [String],
    raw_available: bool,
    raw: bool,
    content: String,
}

/// Line-oriented presenter: pages go to `out`, errors and busy notices to
/// `err`, external links to the desktop opener.
pub struct TerminalPresenter<W, E> {
    out: W,
    err: E,
    format: Format,
    stylesheet: StyleSheet,
    busy: bool,
    rendered: usize,
}

impl TerminalPresenter<io::Stdout, io::Stderr> {
    pub fn stdio(format: Format, stylesheet: StyleSheet) -> Self {
        Self::new(io::stdout(), io::stderr(), format, stylesheet)
    }
}

impl<W: Write, E: Write> TerminalPresenter<W, E> {
    pub fn new(out: W, err: E, format: Format, stylesheet: StyleSheet) -> Self {
        Self {
            out,
            err,
            format,
            stylesheet,
            busy: false,
            rendered: 0,
        }
    }

    /// Write a line of shell output (listings, help).
    pub fn println(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.out, "{}", line)
    }

    /// Write a line to the error stream.
    pub fn eprintln(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.err, "{}", line)
    }

    pub fn into_inner(self) -> (W, E) {
        (self.out, self.err)
    }

    fn page(&self, view: &PageView<'_>) -> io::Result<String> {
        let html = self.stylesheet.apply(&view.html());
        match self.format {
            Format::Html => Ok(html),
            Format::Text => Ok(to_text(&html)),
            Format::Json => {
                let summary = PageSummary {
                    title: view.title(),
                    sections: &view.document.sections,
                    raw_available: view.document.raw_available(),
                    raw: view.is_raw(),
                    content: html,
                };
                serde_json::to_string_pretty(&summary).map_err(io::Error::other)
            }
        }
    }
}

impl<W: Write, E: Write> Presenter for TerminalPresenter<W, E> {
    fn set_busy(&mut self, busy: bool) {
        if self.busy != busy {
            debug!("Busy: {}", busy);
        }
        self.busy = busy;
    }

    fn render(&mut self, view: &PageView<'_>) {
        let result = self
            .page(view)
            .and_then(|page| writeln!(self.out, "{}", page))
            .and_then(|_| self.out.flush());
        match result {
            Ok(()) => {
                self.rendered += 1;
                debug!("Rendered {} (page {} this session)", view.title(), self.rendered);
            }
            Err(e) => warn!("Could not write {}: {}", view.title(), e),
        }
    }

    fn show_error(&mut self, message: &str) {
        if let Err(e) = writeln!(self.err, "error: {}", message) {
            warn!("Could not report {:?}: {}", message, e);
        }
    }

    fn open_external(&mut self, uri: &str) -> Result<(), String> {
        open::that(uri).map_err(|e| e.to_string())
    }
}

/// Reduce a page to readable text: head and tags dropped, common entities
/// decoded, blank-line runs squeezed.
pub fn to_text(html: &str) -> String {
    static HEAD: OnceLock<Regex> = OnceLock::new();
    static TAG: OnceLock<Regex> = OnceLock::new();
    static BLANKS: OnceLock<Regex> = OnceLock::new();

    let head = HEAD.get_or_init(|| Regex::new(r"(?s)<head>.*?</head>").unwrap());
    let tag = TAG.get_or_init(|| Regex::new(r"<[^>]*>").unwrap());
    let blanks = BLANKS.get_or_init(|| Regex::new(r"\n(?:[ \t]*\n){2,}").unwrap());

    let without_head = head.replace(html, "");
    let without_tags = tag.replace_all(&without_head, "");
    let decoded = without_tags
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&minus;", "-")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&");
    blanks.replace_all(decoded.trim(), "\n\n").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::{NavigationHistory, ResolvedDocument};
    use crate::markup::FormattedText;

    fn history() -> NavigationHistory {
        let mut history = NavigationHistory::new();
        history.insert(ResolvedDocument::new(
            "ls(1)",
            FormattedText {
                html: "<html><head><style type=\"text/css\"></style></head><body><h2>NAME</h2><p>ls &lt;dir&gt;</p></body></html>".to_string(),
                plain: None,
            },
            vec!["ls(1)".to_string()],
        ));
        history
    }

    fn render(format: Format) -> String {
        let history = history();
        let mut presenter =
            TerminalPresenter::new(Vec::new(), Vec::new(), format, StyleSheet::default());
        presenter.render(&history.view().unwrap());
        assert_eq!(presenter.rendered, 1);
        let (out, _) = presenter.into_inner();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_html_output_is_styled() {
        let out = render(Format::Html);
        assert!(out.contains("<style type=\"text/css\">body { color: LightSlateGray"));
    }

    #[test]
    fn test_text_output_strips_markup() {
        assert_eq!(render(Format::Text).trim(), "NAMEls <dir>");
    }

    #[test]
    fn test_json_output() {
        let out = render(Format::Json);
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["title"], "ls(1)");
        assert_eq!(value["sections"][0], "ls(1)");
        assert_eq!(value["raw_available"], false);
        assert_eq!(value["raw"], false);
        assert!(value["content"].as_str().unwrap().contains("<h2>NAME</h2>"));
    }

    #[test]
    fn test_show_error_goes_to_err() {
        let mut presenter =
            TerminalPresenter::new(Vec::new(), Vec::new(), Format::Html, StyleSheet::default());
        presenter.show_error("ls: Not Found");
        let (out, err) = presenter.into_inner();
        assert!(out.is_empty());
        assert_eq!(String::from_utf8(err).unwrap(), "error: ls: Not Found\n");
    }

    #[test]
    fn test_to_text_decodes_entities() {
        assert_eq!(to_text("<p>a &amp;&lt; b</p>\n\n\n\n<p>c</p>"), "a &< b\n\nc");
    }
}

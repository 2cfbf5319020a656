//! Markup transformation.
//!
//! Turns the lookup tool's raw hypertext rendering into the displayable
//! document: masthead stripped, cross-references linked, tables rebuilt from
//! the plain-glyph rendering, URLs and e-mail addresses anchored. The steps
//! run in a fixed order; later steps rely on the output of earlier ones.

pub mod links;
pub mod steps;
pub mod table;

use serde::Serialize;
use strum::{Display, EnumIter, IntoEnumIterator};

pub use links::{LinkTarget, RAW_LINK};
pub use steps::image_markers;

/// A page ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedText {
    pub html: String,
    /// Plain-glyph rendering, kept when it was fetched for table work.
    pub plain: Option<String>,
}

impl FormattedText {
    pub fn raw_available(&self) -> bool {
        self.plain.is_some()
    }

    /// The plain-glyph rendering wrapped as a preformatted document.
    pub fn raw_html(&self) -> Option<String> {
        self.plain.as_deref().map(|plain| {
            format!(
                "<html><head><style type=\"text/css\"></style></head><body><pre>{}</pre></body></html>",
                html_escape(plain)
            )
        })
    }
}

/// Switches for the optional steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformOptions {
    pub url_links: bool,
    pub email_links: bool,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            url_links: true,
            email_links: true,
        }
    }
}

/// One named rewrite. Declaration order is execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum Step {
    StripMasthead,
    RemoveAnchors,
    ClearStyle,
    LinkManualReferences,
    TagEnvironmentVariables,
    ReconstructTables,
    LinkifyUrls,
    LinkifyEmails,
    CollapseBlankLines,
}

impl Step {
    /// Whether this step runs under the given options.
    pub fn enabled(self, options: &TransformOptions) -> bool {
        match self {
            Step::LinkifyUrls => options.url_links,
            Step::LinkifyEmails => options.email_links,
            _ => true,
        }
    }

    pub fn apply(self, html: &str, plain: Option<&str>) -> String {
        match self {
            Step::StripMasthead => steps::strip_masthead(html),
            Step::RemoveAnchors => steps::remove_anchors(html),
            Step::ClearStyle => steps::clear_style(html),
            Step::LinkManualReferences => steps::link_manual_references(html),
            Step::TagEnvironmentVariables => steps::tag_environment_variables(html),
            Step::ReconstructTables => steps::reconstruct_tables(html, plain),
            Step::LinkifyUrls => steps::linkify_urls(html),
            Step::LinkifyEmails => steps::linkify_emails(html),
            Step::CollapseBlankLines => steps::collapse_blank_lines(html),
        }
    }
}

/// Run the pipeline over a fetched page.
pub fn transform(hypertext: &str, plain: Option<String>, options: &TransformOptions) -> FormattedText {
    let mut html = hypertext.to_string();
    for step in Step::iter().filter(|s| s.enabled(options)) {
        html = step.apply(&html, plain.as_deref());
    }
    FormattedText { html, plain }
}

/// Escape the characters that are significant in HTML text.
pub(crate) fn html_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

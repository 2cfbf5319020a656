//! The individual rewrites of the transformation pipeline.
//!
//! Each function takes the whole document and returns the rewritten copy.
//! They are public so each can be exercised on its own; [`super::transform`]
//! runs them in order.

use log::debug;
use regex::{Captures, Regex};
use std::ops::Range;
use std::sync::OnceLock;

use super::links::{RAW_LINK, manpage_uri};
use super::table;

const META_HEAD: &str = "<html><head><meta charset='utf-8'>";

/// Drop the tool's masthead: everything before the style block becomes a
/// minimal head, and everything between `<body>` and the first section
/// heading is removed.
pub fn strip_masthead(html: &str) -> String {
    let mut out = match html.find("<style") {
        Some(start) => format!("{}{}", META_HEAD, &html[start..]),
        None => html.to_string(),
    };

    if let Some(body) = out.find("<body>") {
        let start = body + "<body>".len();
        if let Some(offset) = out[start..].find("<h2>") {
            out.replace_range(start..start + offset, "\n");
        }
    }

    out
}

/// Remove the single-line `<a name=...>` anchors placed before headings.
pub fn remove_anchors(html: &str) -> String {
    static ANCHOR: OnceLock<Regex> = OnceLock::new();
    let re = ANCHOR.get_or_init(|| Regex::new(r"(?m)^<a name[^\n]*\n").unwrap());
    re.replace_all(html, "").into_owned()
}

/// Empty the style block, keeping the tags so a theme can be injected later.
pub fn clear_style(html: &str) -> String {
    static STYLE: OnceLock<Regex> = OnceLock::new();
    let re = STYLE.get_or_init(|| {
        Regex::new(r#"(?s)(<style type="text/css">).*?(</style>)"#).unwrap()
    });
    re.replace(html, "$1$2").into_owned()
}

/// Turn `<b>NAME</b>(SECTION)` mentions into `manpage:` links.
pub fn link_manual_references(html: &str) -> String {
    static XREF: OnceLock<Regex> = OnceLock::new();
    let re = XREF.get_or_init(|| {
        Regex::new(r"(?i)<b>([_A-Z.0-9-]+)</b>\((\d+[A-Z]*)\)").unwrap()
    });
    re.replace_all(html, |caps: &Captures| {
        format!(
            "<a href='{}'>{}({})</a>",
            manpage_uri(&caps[1], &caps[2]),
            &caps[1],
            &caps[2]
        )
    })
    .into_owned()
}

/// Wrap `$UPPER_SNAKE` (optionally dotted) tokens in `<envar>`.
pub fn tag_environment_variables(html: &str) -> String {
    static ENVAR: OnceLock<Regex> = OnceLock::new();
    let re = ENVAR.get_or_init(|| {
        Regex::new(r"\$[A-Z_][A-Z0-9_]*(?:\.[A-Z_][A-Z0-9_]*)*").unwrap()
    });
    re.replace_all(html, "<envar>${0}</envar>").into_owned()
}

/// Byte ranges of the lines carrying an embedded image, in document order.
pub fn image_markers(html: &str) -> Vec<Range<usize>> {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    let re = MARKER.get_or_init(|| Regex::new(r"[^\n\r\t]*<img src[^\n\r\t]*>").unwrap());
    re.find_iter(html).map(|m| m.range()).collect()
}

/// Replace image markers with tables rebuilt from the plain rendering.
///
/// All or nothing: when the number of framed blocks differs from the number
/// of markers, every image becomes a link to the raw view instead.
pub fn reconstruct_tables(html: &str, plain: Option<&str>) -> String {
    let markers = image_markers(html);
    if markers.is_empty() {
        return html.to_string();
    }

    let blocks = plain.map(table::box_blocks).unwrap_or_default();
    if blocks.len() == markers.len() {
        let mut out = String::with_capacity(html.len());
        let mut last = 0;
        for (range, block) in markers.iter().zip(&blocks) {
            out.push_str(&html[last..range.start]);
            out.push_str(&table::build_table(block));
            last = range.end;
        }
        out.push_str(&html[last..]);
        return out;
    }

    debug!(
        "{} image marker(s) but {} table block(s), linking raw view",
        markers.len(),
        blocks.len()
    );
    static IMG: OnceLock<Regex> = OnceLock::new();
    let re = IMG.get_or_init(|| Regex::new(r"<img src[^>]*>").unwrap());
    let link = format!("<a href='{}' class='rawlink'>[raw]</a>", RAW_LINK);
    re.replace_all(html, regex::NoExpand(link.as_str())).into_owned()
}

/// Wrap bare `http(s)://` URLs in anchors.
pub fn linkify_urls(html: &str) -> String {
    static URL: OnceLock<Regex> = OnceLock::new();
    let re = URL.get_or_init(|| {
        Regex::new(r"(?i)https?://[\dA-Z.-]+\.[A-Z.-]{2,6}[/\w&;.%~?=#+\-\x{2212}]*").unwrap()
    });
    linkify(html, re, |url| url.to_string())
}

/// Wrap bare e-mail addresses in `mailto:` anchors.
pub fn linkify_emails(html: &str) -> String {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    let re = EMAIL.get_or_init(|| {
        Regex::new(r"(?i)[_A-Z0-9.+-]+@[_A-Z0-9-]+\.[A-Z0-9.-]+").unwrap()
    });
    linkify(html, re, |address| format!("mailto:{}", address))
}

/// Remove horizontal rules and squeeze runs of blank lines to one.
pub fn collapse_blank_lines(html: &str) -> String {
    static BLANKS: OnceLock<Regex> = OnceLock::new();
    let re = BLANKS.get_or_init(|| Regex::new(r"\n(?:[ \t]*\n){2,}").unwrap());
    let without_rules = html.replace("<hr>", "");
    re.replace_all(&without_rules, "\n\n").into_owned()
}

/// Anchor every match of `re` that is not already inside markup.
fn linkify(html: &str, re: &Regex, href: impl Fn(&str) -> String) -> String {
    let mut out = String::with_capacity(html.len());
    let mut last = 0;

    for m in re.find_iter(html) {
        if inside_markup(&html[..m.start()], &html[m.end()..]) {
            continue;
        }
        let (text, trailing) = split_trailing_punctuation(m.as_str());
        if text.is_empty() {
            continue;
        }
        out.push_str(&html[last..m.start()]);
        out.push_str(&format!("<a href='{}'>{}</a>{}", href(text), text, trailing));
        last = m.end();
    }

    out.push_str(&html[last..]);
    out
}

/// Matches inside a tag or the text of an open anchor are left alone.
fn inside_markup(before: &str, after: &str) -> bool {
    let in_tag = before.rfind('<') > before.rfind('>');
    let in_anchor = before
        .rfind("<a ")
        .is_some_and(|open| !before[open..].contains("</a>"));
    in_tag || in_anchor || after.starts_with("</a>")
}

fn split_trailing_punctuation(text: &str) -> (&str, &str) {
    let mut end = text.len();
    loop {
        let head = &text[..end];
        if let Some(stripped) = head.strip_suffix("&gt;").or_else(|| head.strip_suffix("&quot;")) {
            end = stripped.len();
        } else if let Some(c) = head.chars().last().filter(|c| ".,;:!?)-".contains(*c)) {
            end -= c.len_utf8();
        } else {
            break;
        }
    }
    (&text[..end], &text[end..])
}

//! Session state: opened documents, the cursor over them, and the error log.
//!
//! Entries are appended once per distinct title and never removed or
//! reordered. The cursor is unset only while the history is empty; every
//! mutation keeps it on a valid index. The raw-display flag lives on the
//! entries but only the entry under the cursor ever carries it: moving the
//! cursor clears it.

mod error_log;

pub use error_log::ErrorLog;

use log::debug;
use serde::Serialize;

use crate::markup::FormattedText;

/// One opened manual page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedDocument {
    /// Canonical `name(section)`.
    pub title: String,
    pub content: FormattedText,
    /// Alternate sections as titles, in the order the tool listed them.
    pub sections: Vec<String>,
    /// Show the plain-glyph rendering instead of the formatted one.
    pub raw: bool,
}

impl ResolvedDocument {
    pub fn new(title: impl Into<String>, content: FormattedText, sections: Vec<String>) -> Self {
        Self {
            title: title.into(),
            content,
            sections,
            raw: false,
        }
    }

    pub fn raw_available(&self) -> bool {
        self.content.raw_available()
    }
}

/// Cursor movement for back/forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Back,
    Forward,
}

/// What the presentation layer should show for the current entry.
#[derive(Debug, Clone, Copy)]
pub struct PageView<'a> {
    pub document: &'a ResolvedDocument,
    pub index: usize,
    pub can_go_back: bool,
    pub can_go_forward: bool,
}

impl PageView<'_> {
    pub fn title(&self) -> &str {
        &self.document.title
    }

    pub fn is_raw(&self) -> bool {
        self.document.raw && self.document.raw_available()
    }

    /// The document to display: formatted hypertext, or the plain-glyph
    /// rendering as a preformatted page when the raw view is on.
    pub fn html(&self) -> String {
        if self.document.raw {
            if let Some(raw) = self.document.content.raw_html() {
                return raw;
            }
        }
        self.document.content.html.clone()
    }
}

/// Append-only, title-deduplicated list of opened documents with a cursor.
#[derive(Debug, Default)]
pub struct NavigationHistory {
    entries: Vec<ResolvedDocument>,
    cursor: Option<usize>,
}

impl NavigationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn entries(&self) -> &[ResolvedDocument] {
        &self.entries
    }

    pub fn current(&self) -> Option<&ResolvedDocument> {
        self.cursor.and_then(|i| self.entries.get(i))
    }

    pub fn position(&self, title: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.title == title)
    }

    pub fn contains(&self, title: &str) -> bool {
        self.position(title).is_some()
    }

    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.title.as_str())
    }

    /// Add a document and put the cursor on it.
    ///
    /// A title already present is not added again; the cursor moves to the
    /// existing entry. Returns the entry's index and whether it was appended.
    pub fn insert(&mut self, document: ResolvedDocument) -> (usize, bool) {
        if let Some(index) = self.position(&document.title) {
            debug!("{} already open at {}", document.title, index);
            self.move_to(index);
            return (index, false);
        }

        debug!("Appending {} at {}", document.title, self.entries.len());
        self.entries.push(document);
        let index = self.entries.len() - 1;
        self.move_to(index);
        (index, true)
    }

    /// Put the cursor on `index` and clear the raw flag.
    ///
    /// Returns `false`, leaving everything untouched, when out of range.
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.entries.len() {
            debug!("Ignoring selection of {} in history of {}", index, self.entries.len());
            return false;
        }
        self.move_to(index);
        true
    }

    /// Back or forward one entry.
    ///
    /// With the raw view on, either direction only returns to the formatted
    /// view. At either end of the history the step is a no-op. Returns
    /// whether the view changed.
    pub fn step(&mut self, direction: Direction) -> bool {
        let Some(index) = self.cursor else {
            return false;
        };

        if self.entries[index].raw {
            self.entries[index].raw = false;
            return true;
        }

        let target = match direction {
            Direction::Back => index.checked_sub(1),
            Direction::Forward => Some(index + 1).filter(|&i| i < self.entries.len()),
        };
        match target {
            Some(target) => {
                self.move_to(target);
                true
            }
            None => false,
        }
    }

    /// Switch the current entry to its raw view.
    ///
    /// Returns whether the view changed: nothing happens when there is no
    /// current entry, no plain rendering, or the raw view is already on.
    pub fn show_raw(&mut self) -> bool {
        match self.cursor.and_then(|i| self.entries.get_mut(i)) {
            Some(entry) if entry.raw_available() && !entry.raw => {
                entry.raw = true;
                true
            }
            _ => false,
        }
    }

    /// Back is possible from any entry but the first, and from a raw view.
    pub fn can_go_back(&self) -> bool {
        match self.cursor {
            Some(index) => index > 0 || self.entries[index].raw,
            None => false,
        }
    }

    pub fn can_go_forward(&self) -> bool {
        matches!(self.cursor, Some(index) if index + 1 < self.entries.len())
    }

    pub fn view(&self) -> Option<PageView<'_>> {
        let index = self.cursor?;
        Some(PageView {
            document: self.entries.get(index)?,
            index,
            can_go_back: self.can_go_back(),
            can_go_forward: self.can_go_forward(),
        })
    }

    fn move_to(&mut self, index: usize) {
        if let Some(entry) = self.cursor.and_then(|i| self.entries.get_mut(i)) {
            entry.raw = false;
        }
        self.entries[index].raw = false;
        self.cursor = Some(index);
    }
}

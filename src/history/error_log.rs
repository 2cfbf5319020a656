use indexmap::IndexSet;
use serde::Serialize;

/// Session-wide, de-duplicated list of user-facing error messages.
///
/// Insertion order is kept for display; messages are never removed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ErrorLog {
    messages: IndexSet<String>,
}

impl ErrorLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message. Returns `false` when it was already logged.
    pub fn push(&mut self, message: impl Into<String>) -> bool {
        self.messages.insert(message.into())
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.messages.iter().map(String::as_str)
    }

    /// All messages, one per line.
    pub fn summary(&self) -> String {
        self.iter().collect::<Vec<_>>().join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicates_are_dropped() {
        let mut log = ErrorLog::new();
        assert!(log.push("ls: Not Found"));
        assert!(!log.push("ls: Not Found"));
        assert!(log.push("cat: Not Found"));
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_summary_keeps_insertion_order() {
        let mut log = ErrorLog::new();
        log.push("b: Not Found");
        log.push("a: Not Found");
        log.push("b: Not Found");
        assert_eq!(log.summary(), "b: Not Found\na: Not Found");
    }

    #[test]
    fn test_empty_log() {
        let log = ErrorLog::new();
        assert!(log.is_empty());
        assert_eq!(log.summary(), "");
    }
}

//! The navigation state machine.
//!
//! A [`Navigator`] owns the lookup tool, the history, the error log and the
//! catalogue. Every user action arrives as an [`OpenRequest`] and runs to
//! completion before the next one; the [`Presenter`] is told when work starts
//! and stops, what to draw afterwards, and which failures to surface.

use log::{debug, info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::history::{Direction, ErrorLog, NavigationHistory, PageView, ResolvedDocument};
use crate::man::{Catalogue, ManError, ManTool, ToolInvoker};
use crate::markup::{self, LinkTarget, TransformOptions};
use crate::query::{self, DocumentQuery};

/// Most documents a single random request may open.
pub const MAX_RANDOM_PAGES: usize = 20;

/// Catalogue entries tried per requested random page before giving up.
const RANDOM_ATTEMPTS_PER_PAGE: usize = 3;

/// Everything the navigator can be asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenRequest {
    /// Free text typed by the user
    Query(String),
    /// Startup arguments; failures are logged but not surfaced
    BatchQuery(Vec<String>),
    /// Open this many unopened pages from the catalogue
    Random(usize),
    /// Jump to a history entry
    Index(usize),
    Relative(Direction),
    /// An activated link URI
    Link(String),
    /// One of the current page's alternate sections, as `name(section)`
    Alternate(String),
}

impl OpenRequest {
    /// Failures of these requests are shown to the user, not only logged.
    pub fn is_interactive(&self) -> bool {
        matches!(
            self,
            OpenRequest::Query(_) | OpenRequest::Link(_) | OpenRequest::Alternate(_)
        )
    }
}

/// The presentation layer as seen from the navigator.
pub trait Presenter {
    fn set_busy(&mut self, busy: bool);

    fn render(&mut self, view: &PageView<'_>);

    fn show_error(&mut self, message: &str);

    /// Hand a web or mail link to whatever the desktop uses for it.
    fn open_external(&mut self, uri: &str) -> Result<(), String>;
}

/// Result of one navigation operation.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// The current view differs from before and should be redrawn.
    pub changed: bool,
    /// Messages recorded by this operation, in order.
    pub errors: Vec<String>,
}

impl Outcome {
    fn changed(changed: bool) -> Self {
        Self {
            changed,
            errors: Vec::new(),
        }
    }
}

/// Behaviour switches for a [`Navigator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigatorOptions {
    pub transform: TransformOptions,
    /// List alternate sections for each opened page.
    pub alternates: bool,
}

impl Default for NavigatorOptions {
    fn default() -> Self {
        Self {
            transform: TransformOptions::default(),
            alternates: true,
        }
    }
}

pub struct Navigator<I> {
    tool: ManTool<I>,
    history: NavigationHistory,
    errors: ErrorLog,
    catalogue: Catalogue,
    options: NavigatorOptions,
    rng: StdRng,
}

impl<I: ToolInvoker> Navigator<I> {
    pub fn new(tool: ManTool<I>, options: NavigatorOptions) -> Self {
        Self {
            tool,
            history: NavigationHistory::new(),
            errors: ErrorLog::new(),
            catalogue: Catalogue::new(),
            options,
            rng: StdRng::from_os_rng(),
        }
    }

    /// Use a fixed catalogue instead of scanning manual trees.
    pub fn with_catalogue(mut self, catalogue: Catalogue) -> Self {
        self.catalogue = catalogue;
        self
    }

    /// Use a specific random source, e.g. a seeded one.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn history(&self) -> &NavigationHistory {
        &self.history
    }

    pub fn errors(&self) -> &ErrorLog {
        &self.errors
    }

    pub fn view(&self) -> Option<PageView<'_>> {
        self.history.view()
    }

    /// Run one request against the presenter.
    ///
    /// Busy is set for the duration, the view is re-rendered when it changed,
    /// and errors of interactive requests are shown.
    pub fn open(&mut self, request: OpenRequest, presenter: &mut dyn Presenter) -> Outcome {
        debug!("Open request: {:?}", request);
        let interactive = request.is_interactive();

        presenter.set_busy(true);
        let outcome = match request {
            OpenRequest::Query(text) => self.open_query(&text),
            OpenRequest::BatchQuery(args) => self.open_query(&args.join(" ")),
            OpenRequest::Random(count) => self.open_random(count),
            OpenRequest::Index(index) => self.open_index(index),
            OpenRequest::Relative(direction) => self.open_relative(direction),
            OpenRequest::Link(uri) => self.activate_link(&uri, presenter),
            OpenRequest::Alternate(title) => self.open_alternate_section(&title),
        };

        if interactive {
            for message in &outcome.errors {
                presenter.show_error(message);
            }
        }
        if outcome.changed {
            if let Some(view) = self.history.view() {
                presenter.render(&view);
            }
        }
        presenter.set_busy(false);

        outcome
    }

    /// Parse `text` and open every page it names, in order.
    ///
    /// A failing token is logged and skipped; the others still open.
    pub fn open_query(&mut self, text: &str) -> Outcome {
        let queries = query::parse(text);
        if queries.is_empty() {
            debug!("{:?}: {}", text, ManError::EmptyQuery);
            return Outcome::default();
        }
        self.open_queries(&queries)
    }

    pub fn open_queries(&mut self, queries: &[DocumentQuery]) -> Outcome {
        let mut outcome = Outcome::default();
        for query in queries {
            match self.open_document(query) {
                Ok(_) => outcome.changed = true,
                Err(e) => outcome.errors.push(self.record(&e)),
            }
        }
        outcome
    }

    /// Open up to `count` pages picked at random among unopened catalogue
    /// entries, leaving the cursor on the last one appended.
    ///
    /// Picks are made without replacement, so a small catalogue just runs
    /// out. An empty catalogue makes this a no-op. At most
    /// `RANDOM_ATTEMPTS_PER_PAGE` entries are tried per requested page.
    pub fn open_random(&mut self, count: usize) -> Outcome {
        if count > MAX_RANDOM_PAGES {
            info!("Random request for {} pages capped at {}", count, MAX_RANDOM_PAGES);
        }
        let count = count.min(MAX_RANDOM_PAGES);
        if count == 0 {
            return Outcome::default();
        }

        let mut candidates: Vec<DocumentQuery> = self
            .catalogue
            .entries(&self.tool)
            .iter()
            .filter(|entry| entry.title().is_none_or(|t| !self.history.contains(&t)))
            .cloned()
            .collect();
        if candidates.is_empty() {
            info!("No unopened catalogue entries for random selection");
            return Outcome::default();
        }
        candidates.shuffle(&mut self.rng);
        candidates.truncate(count * RANDOM_ATTEMPTS_PER_PAGE);

        let mut outcome = Outcome::default();
        let mut last_appended = None;
        let mut appended = 0;
        for candidate in candidates {
            if appended == count {
                break;
            }
            match self.open_document(&candidate) {
                Ok((index, true)) => {
                    appended += 1;
                    last_appended = Some(index);
                }
                Ok((_, false)) => {}
                Err(e) => outcome.errors.push(self.record(&e)),
            }
        }

        if appended < count {
            info!("Opened {} of {} random pages, candidates exhausted", appended, count);
        }
        if let Some(index) = last_appended {
            self.history.select(index);
            outcome.changed = true;
        }
        outcome
    }

    /// Move the cursor to a history entry. Out-of-range indices are ignored.
    pub fn open_index(&mut self, index: usize) -> Outcome {
        Outcome::changed(self.history.select(index))
    }

    pub fn open_relative(&mut self, direction: Direction) -> Outcome {
        Outcome::changed(self.history.step(direction))
    }

    /// Open one of the current page's alternate sections.
    pub fn open_alternate_section(&mut self, title: &str) -> Outcome {
        self.open_query(title)
    }

    /// Follow a link from the current page.
    pub fn activate_link(&mut self, uri: &str, presenter: &mut dyn Presenter) -> Outcome {
        match LinkTarget::parse(uri) {
            LinkTarget::Manual(query) => self.open_queries(&[query]),
            LinkTarget::Raw => {
                let changed = self.history.show_raw();
                if !changed {
                    debug!("No raw view to show for {:?}", self.history.current().map(|d| &d.title));
                }
                Outcome::changed(changed)
            }
            LinkTarget::External(url) => {
                info!("Opening {} externally", url);
                match presenter.open_external(&url) {
                    Ok(()) => Outcome::default(),
                    Err(reason) => {
                        warn!("{}: {}", url, reason);
                        let message = format!("{}: An error occurred", url);
                        self.errors.push(message.clone());
                        Outcome {
                            changed: false,
                            errors: vec![message],
                        }
                    }
                }
            }
        }
    }

    /// Resolve, fetch, transform and insert one page.
    ///
    /// A title already in the history only moves the cursor; nothing is
    /// fetched. Returns the entry index and whether it was appended.
    fn open_document(&mut self, query: &DocumentQuery) -> Result<(usize, bool), ManError> {
        let title = self.tool.resolve(query)?;

        if let Some(index) = self.history.position(&title) {
            self.history.select(index);
            return Ok((index, false));
        }

        let page = self.tool.fetch(&title)?;
        let content = markup::transform(&page.hypertext, page.plain, &self.options.transform);
        let sections = if self.options.alternates {
            let name = DocumentQuery::from_title(&title).unwrap_or_else(|| query.clone());
            self.tool.list_sections(&name)
        } else {
            Vec::new()
        };

        info!("Opened {}", title);
        Ok(self.history.insert(ResolvedDocument::new(title, content, sections)))
    }

    /// Log a failure and add its message to the error log.
    fn record(&mut self, error: &ManError) -> String {
        match error.reason() {
            Some(reason) => warn!("{} ({})", error, reason),
            None => warn!("{}", error),
        }
        let message = error.to_string();
        self.errors.push(message.clone());
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ScriptedInvoker, scripted_tool};

    #[derive(Default)]
    struct RecordingPresenter {
        busy_changes: Vec<bool>,
        rendered: Vec<String>,
        shown_errors: Vec<String>,
        external: Vec<String>,
        fail_external: bool,
    }

    impl Presenter for RecordingPresenter {
        fn set_busy(&mut self, busy: bool) {
            self.busy_changes.push(busy);
        }

        fn render(&mut self, view: &PageView<'_>) {
            self.rendered.push(view.title().to_string());
        }

        fn show_error(&mut self, message: &str) {
            self.shown_errors.push(message.to_string());
        }

        fn open_external(&mut self, uri: &str) -> Result<(), String> {
            self.external.push(uri.to_string());
            if self.fail_external {
                Err("no opener".to_string())
            } else {
                Ok(())
            }
        }
    }

    fn navigator(invoker: &ScriptedInvoker) -> Navigator<&ScriptedInvoker> {
        Navigator::new(scripted_tool(invoker), NavigatorOptions::default())
            .with_rng(StdRng::seed_from_u64(7))
    }

    #[test]
    fn test_open_same_title_twice_keeps_one_entry() {
        let invoker = ScriptedInvoker::new();
        invoker.page("ls", "1", "<p>list</p>");
        let mut nav = navigator(&invoker);

        nav.open_query("ls");
        nav.open_query("ls(1)");

        assert_eq!(nav.history().len(), 1);
        assert_eq!(nav.history().cursor(), Some(0));
        let fetches = invoker.calls().iter().filter(|c| c.contains("-Hcat")).count();
        assert_eq!(fetches, 1);
    }

    #[test]
    fn test_not_found_logs_one_message() {
        let invoker = ScriptedInvoker::new();
        invoker.respond("-D -w nosuch", 16, "");
        let mut nav = navigator(&invoker);

        let outcome = nav.open_query("nosuch");

        assert!(!outcome.changed);
        assert_eq!(outcome.errors, vec!["nosuch: Not Found"]);
        assert!(nav.history().is_empty());
        assert_eq!(nav.errors().iter().collect::<Vec<_>>(), vec!["nosuch: Not Found"]);
    }

    #[test]
    fn test_same_failure_twice_is_logged_once() {
        let invoker = ScriptedInvoker::new();
        invoker.respond("-D -w nosuch", 16, "");
        let mut nav = navigator(&invoker);

        nav.open_query("nosuch");
        nav.open_query("nosuch");

        assert_eq!(nav.errors().len(), 1);
    }

    #[test]
    fn test_failed_token_does_not_abort_siblings() {
        let invoker = ScriptedInvoker::new();
        invoker.page("ls", "1", "<p>list</p>");
        invoker.page("grep", "1", "<p>search</p>");
        invoker.respond("-D -w nosuch", 16, "");
        let mut nav = navigator(&invoker);

        let outcome = nav.open_query("ls nosuch grep");

        assert!(outcome.changed);
        assert_eq!(nav.history().titles().collect::<Vec<_>>(), vec!["ls(1)", "grep(1)"]);
        assert_eq!(nav.history().cursor(), Some(1));
        assert_eq!(nav.errors().len(), 1);
    }

    #[test]
    fn test_tool_failure_and_fetch_failure_messages() {
        let invoker = ScriptedInvoker::new();
        invoker.respond_timeout("-D -w slow");
        invoker.respond("-D -w broken", 0, "/usr/share/man/man1/broken.1.gz");
        invoker.respond("-D -Hcat --nh 1 broken", 3, "");
        let mut nav = navigator(&invoker);

        nav.open_query("slow broken");

        assert_eq!(
            nav.errors().iter().collect::<Vec<_>>(),
            vec!["slow: An error occurred", "broken(1): An error occurred"]
        );
        assert!(nav.history().is_empty());
    }

    #[test]
    fn test_empty_query_is_noop() {
        let invoker = ScriptedInvoker::new();
        let mut nav = navigator(&invoker);
        let outcome = nav.open_query("  -x ");
        assert_eq!(outcome, Outcome::default());
        assert!(invoker.calls().is_empty());
        assert!(nav.errors().is_empty());
    }

    #[test]
    fn test_alternate_sections_are_listed() {
        let invoker = ScriptedInvoker::new();
        invoker.page("printf", "1", "<p>print</p>");
        invoker.respond("-D -f printf", 0, "printf (1)  - format\nprintf (3)  - formatted output\n");
        let mut nav = navigator(&invoker);

        nav.open_query("printf");

        let current = nav.history().current().unwrap();
        assert_eq!(current.sections, vec!["printf(1)", "printf(3)"]);
    }

    #[test]
    fn test_alternates_disabled_skips_listing() {
        let invoker = ScriptedInvoker::new();
        invoker.page("ls", "1", "<p>list</p>");
        let options = NavigatorOptions {
            alternates: false,
            ..Default::default()
        };
        let mut nav = Navigator::new(scripted_tool(&invoker), options);

        nav.open_query("ls");

        assert!(nav.history().current().unwrap().sections.is_empty());
        assert!(!invoker.calls().iter().any(|c| c.contains("-f")));
    }

    #[test]
    fn test_open_alternate_section() {
        let invoker = ScriptedInvoker::new();
        invoker.page("printf", "1", "<p>print</p>");
        invoker.page("printf", "3", "<p>format</p>");
        let mut nav = navigator(&invoker);

        nav.open_query("printf");
        nav.open_alternate_section("printf(3)");

        assert_eq!(
            nav.history().titles().collect::<Vec<_>>(),
            vec!["printf(1)", "printf(3)"]
        );
        assert_eq!(nav.history().current().unwrap().title, "printf(3)");
    }

    #[test]
    fn test_manpage_link_opens_page() {
        let invoker = ScriptedInvoker::new();
        invoker.page("ls", "1", "see <b>dir</b>(1)");
        invoker.page("dir", "1", "<p>dir</p>");
        let mut nav = navigator(&invoker);
        let mut presenter = RecordingPresenter::default();

        nav.open(OpenRequest::Query("ls".to_string()), &mut presenter);
        assert!(nav.history().current().unwrap().content.html.contains("manpage:dir.1"));

        nav.open(OpenRequest::Link("manpage:dir.1".to_string()), &mut presenter);

        assert_eq!(presenter.rendered, vec!["ls(1)", "dir(1)"]);
        assert_eq!(nav.history().len(), 2);
    }

    #[test]
    fn test_raw_link_switches_view_without_touching_history() {
        let invoker = ScriptedInvoker::new();
        invoker.respond("-D -w tbl", 0, "/usr/share/man/man1/tbl.1.gz");
        invoker.respond(
            "-D -Hcat --nh 1 tbl",
            0,
            "<style type=\"text/css\"></style><body>\n<h2>T</h2>\n<img src=\"a.png\">\n<img src=\"b.png\">\n</body>",
        );
        invoker.respond("-D -Pcat --nh 1 tbl", 0, "┌──┐\n│ A│\n└──┘\n");
        invoker.respond("-D -f tbl", 0, "tbl (1)  - tables\n");
        let mut nav = navigator(&invoker);

        nav.open_query("tbl");
        let html = &nav.history().current().unwrap().content.html;
        assert!(html.contains("raw:currentpage"));
        assert!(!html.contains("<table"));

        let mut presenter = RecordingPresenter::default();
        let outcome = nav.open(OpenRequest::Link("raw:currentpage".to_string()), &mut presenter);

        assert!(outcome.changed);
        assert_eq!(nav.history().len(), 1);
        assert!(nav.view().unwrap().is_raw());

        nav.open(OpenRequest::Relative(Direction::Back), &mut presenter);
        assert!(!nav.view().unwrap().is_raw());
        assert_eq!(nav.history().cursor(), Some(0));
    }

    #[test]
    fn test_external_link_goes_to_presenter() {
        let invoker = ScriptedInvoker::new();
        let mut nav = navigator(&invoker);
        let mut presenter = RecordingPresenter::default();

        let outcome = nav.open(
            OpenRequest::Link("https://example.org/a\u{2212}b".to_string()),
            &mut presenter,
        );

        assert!(!outcome.changed);
        assert_eq!(presenter.external, vec!["https://example.org/a-b"]);
        assert!(presenter.rendered.is_empty());
    }

    #[test]
    fn test_failed_external_open_is_shown() {
        let invoker = ScriptedInvoker::new();
        let mut nav = navigator(&invoker);
        let mut presenter = RecordingPresenter {
            fail_external: true,
            ..Default::default()
        };

        nav.open(OpenRequest::Link("mailto:a@b.org".to_string()), &mut presenter);

        assert_eq!(presenter.shown_errors, vec!["mailto:a@b.org: An error occurred"]);
        assert_eq!(nav.errors().len(), 1);
    }

    #[test]
    fn test_busy_toggles_around_request() {
        let invoker = ScriptedInvoker::new();
        invoker.page("ls", "1", "<p>list</p>");
        let mut nav = navigator(&invoker);
        let mut presenter = RecordingPresenter::default();

        nav.open(OpenRequest::Query("ls".to_string()), &mut presenter);

        assert_eq!(presenter.busy_changes, vec![true, false]);
    }

    #[test]
    fn test_batch_errors_are_not_shown() {
        let invoker = ScriptedInvoker::new();
        invoker.respond("-D -w nosuch", 16, "");
        let mut nav = navigator(&invoker);
        let mut presenter = RecordingPresenter::default();

        nav.open(OpenRequest::BatchQuery(vec!["nosuch".to_string()]), &mut presenter);
        assert!(presenter.shown_errors.is_empty());
        assert_eq!(nav.errors().len(), 1);

        nav.open(OpenRequest::Query("nosuch".to_string()), &mut presenter);
        assert_eq!(presenter.shown_errors, vec!["nosuch: Not Found"]);
    }

    #[test]
    fn test_relative_navigation_boundaries() {
        let invoker = ScriptedInvoker::new();
        for name in ["a", "b", "c"] {
            invoker.page(name, "1", "<p>x</p>");
        }
        let mut nav = navigator(&invoker);
        nav.open_query("a b c");

        nav.open_index(0);
        assert!(!nav.open_relative(Direction::Back).changed);
        assert_eq!(nav.history().cursor(), Some(0));

        nav.open_index(2);
        assert!(!nav.open_relative(Direction::Forward).changed);
        assert_eq!(nav.history().cursor(), Some(2));
    }

    #[test]
    fn test_open_random_appends_distinct_entries() {
        let invoker = ScriptedInvoker::new();
        let names = ["a", "b", "c", "d", "e"];
        for name in names {
            invoker.page(name, "1", "<p>x</p>");
        }
        let catalogue = Catalogue::from_entries(
            names.iter().map(|n| DocumentQuery::with_section(*n, "1")).collect(),
        );
        let mut nav = navigator(&invoker).with_catalogue(catalogue);
        nav.open_query("a");

        let outcome = nav.open_random(3);

        assert!(outcome.changed);
        let titles: Vec<&str> = nav.history().titles().collect();
        assert_eq!(titles.len(), 4);
        let mut unique = titles.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), 4);
        assert_eq!(nav.history().cursor(), Some(3));
    }

    #[test]
    fn test_open_random_exhausts_small_catalogue() {
        let invoker = ScriptedInvoker::new();
        invoker.page("only", "1", "<p>x</p>");
        let catalogue = Catalogue::from_entries(vec![DocumentQuery::with_section("only", "1")]);
        let mut nav = navigator(&invoker).with_catalogue(catalogue);

        nav.open_random(5);
        assert_eq!(nav.history().len(), 1);

        let outcome = nav.open_random(1);
        assert!(!outcome.changed);
        assert_eq!(nav.history().len(), 1);
    }

    #[test]
    fn test_open_random_with_empty_catalogue_is_noop() {
        let invoker = ScriptedInvoker::new();
        let mut nav = navigator(&invoker).with_catalogue(Catalogue::from_entries(Vec::new()));
        assert_eq!(nav.open_random(3), Outcome::default());
        assert!(nav.errors().is_empty());
    }

    #[test]
    fn test_open_random_skips_failures() {
        let invoker = ScriptedInvoker::new();
        invoker.page("good", "1", "<p>x</p>");
        invoker.respond("-D -w 1 bad", 16, "");
        let catalogue = Catalogue::from_entries(vec![
            DocumentQuery::with_section("bad", "1"),
            DocumentQuery::with_section("good", "1"),
        ]);
        let mut nav = navigator(&invoker).with_catalogue(catalogue);

        nav.open_random(2);

        assert_eq!(nav.history().titles().collect::<Vec<_>>(), vec!["good(1)"]);
        assert_eq!(nav.errors().iter().collect::<Vec<_>>(), vec!["1 bad: Not Found"]);
    }

    #[test]
    fn test_open_random_gives_up_on_a_failing_tool() {
        let invoker = ScriptedInvoker::new();
        let catalogue = Catalogue::from_entries(
            (0..500)
                .map(|i| DocumentQuery::with_section(format!("page{}", i), "1"))
                .collect(),
        );
        let mut nav = navigator(&invoker).with_catalogue(catalogue);

        let outcome = nav.open_random(1);

        assert!(!outcome.changed);
        assert_eq!(invoker.calls().len(), RANDOM_ATTEMPTS_PER_PAGE);
        assert_eq!(outcome.errors.len(), RANDOM_ATTEMPTS_PER_PAGE);
        assert_eq!(nav.errors().len(), RANDOM_ATTEMPTS_PER_PAGE);
    }

    #[test]
    fn test_open_random_caps_large_requests() {
        let invoker = ScriptedInvoker::new();
        let names: Vec<String> = (0..30).map(|i| format!("p{}", i)).collect();
        for name in &names {
            invoker.page(name, "1", "<p>x</p>");
        }
        let catalogue = Catalogue::from_entries(
            names.iter().map(|n| DocumentQuery::with_section(n.as_str(), "1")).collect(),
        );
        let mut nav = navigator(&invoker).with_catalogue(catalogue);

        nav.open_random(25);

        assert_eq!(nav.history().len(), MAX_RANDOM_PAGES);
    }
}

use std::str::FromStr;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use crate::history::Direction;
use crate::navigator::OpenRequest;

/// Leading word of a shell line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Keyword {
    Open,
    Back,
    Forward,
    Goto,
    Random,
    Link,
    Raw,
    Alt,
    Sections,
    History,
    Errors,
    Show,
    Help,
    #[strum(serialize = "quit", serialize = "exit")]
    Quit,
}

impl Keyword {
    pub fn usage(self) -> &'static str {
        match self {
            Keyword::Open => "open <query>     open pages (bare text works too)",
            Keyword::Back => "back             previous page, or leave the raw view",
            Keyword::Forward => "forward          next page",
            Keyword::Goto => "goto <n>         jump to history entry n",
            Keyword::Random => "random [n]       open n random pages (default 1)",
            Keyword::Link => "link <uri>       follow a link (manpage:, raw:, http:, mailto:)",
            Keyword::Raw => "raw              show the plain rendering of the current page",
            Keyword::Alt => "alt <name(sec)>  open another section of the current page",
            Keyword::Sections => "sections         list the current page's sections",
            Keyword::History => "history          list opened pages",
            Keyword::Errors => "errors           list errors so far",
            Keyword::Show => "show             print the current page again",
            Keyword::Help => "help             this list",
            Keyword::Quit => "quit             leave",
        }
    }
}

/// A parsed shell line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Request(OpenRequest),
    Sections,
    History,
    Errors,
    Show,
    Help,
    Quit,
}

/// Parse one input line. Blank lines yield `Ok(None)`.
///
/// Text not starting with a keyword is a query.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    let Ok(keyword) = Keyword::from_str(word) else {
        return Ok(Some(Command::Request(OpenRequest::Query(line.to_string()))));
    };

    let required = |what: &str| {
        if rest.is_empty() {
            Err(format!("{} needs {}", keyword, what))
        } else {
            Ok(rest.to_string())
        }
    };

    let command = match keyword {
        Keyword::Open => Command::Request(OpenRequest::Query(required("a query")?)),
        Keyword::Back => Command::Request(OpenRequest::Relative(Direction::Back)),
        Keyword::Forward => Command::Request(OpenRequest::Relative(Direction::Forward)),
        Keyword::Goto => {
            let index = required("an index")?
                .parse::<usize>()
                .map_err(|e| format!("goto: {}", e))?;
            Command::Request(OpenRequest::Index(index))
        }
        Keyword::Random => {
            let count = if rest.is_empty() {
                1
            } else {
                rest.parse::<usize>().map_err(|e| format!("random: {}", e))?
            };
            Command::Request(OpenRequest::Random(count))
        }
        Keyword::Link => Command::Request(OpenRequest::Link(required("a URI")?)),
        Keyword::Raw => Command::Request(OpenRequest::Link(crate::markup::RAW_LINK.to_string())),
        Keyword::Alt => Command::Request(OpenRequest::Alternate(required("a section title")?)),
        Keyword::Sections => Command::Sections,
        Keyword::History => Command::History,
        Keyword::Errors => Command::Errors,
        Keyword::Show => Command::Show,
        Keyword::Help => Command::Help,
        Keyword::Quit => Command::Quit,
    };
    Ok(Some(command))
}

/// One usage line per keyword.
pub fn help_text() -> String {
    Keyword::iter().map(Keyword::usage).collect::<Vec<_>>().join("\n")
}

//! Line-oriented front end.
//!
//! Reads commands from a [`BufRead`], turns them into navigator requests,
//! and writes pages and listings through a [`TerminalPresenter`].

mod command;
mod presenter;

pub use command::{Command, Keyword, help_text, parse_command};
pub use presenter::{Format, TerminalPresenter, to_text};

use log::debug;
use std::io::{self, BufRead, Write};

use crate::man::ToolInvoker;
use crate::navigator::{Navigator, Presenter};

/// Run commands until `quit` or end of input.
pub fn run<I, R, W, E>(
    navigator: &mut Navigator<I>,
    presenter: &mut TerminalPresenter<W, E>,
    input: R,
) -> io::Result<()>
where
    I: ToolInvoker,
    R: BufRead,
    W: Write,
    E: Write,
{
    for line in input.lines() {
        let line = line?;
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                presenter.eprintln(&message)?;
                continue;
            }
        };
        debug!("Shell command: {:?}", command);

        match command {
            Command::Request(request) => {
                navigator.open(request, presenter);
            }
            Command::Sections => match navigator.history().current() {
                Some(current) if !current.sections.is_empty() => {
                    for section in &current.sections {
                        let marker = if *section == current.title { "*" } else { " " };
                        presenter.println(&format!("{} {}", marker, section))?;
                    }
                }
                Some(_) => presenter.println("no other sections")?,
                None => presenter.println("no page open")?,
            },
            Command::History => {
                let cursor = navigator.history().cursor();
                for (index, title) in navigator.history().titles().enumerate() {
                    let marker = if Some(index) == cursor { ">" } else { " " };
                    presenter.println(&format!("{} {:>3}  {}", marker, index, title))?;
                }
            }
            Command::Errors => {
                for message in navigator.errors().iter() {
                    presenter.println(message)?;
                }
            }
            Command::Show => match navigator.view() {
                Some(view) => presenter.render(&view),
                None => presenter.println("no page open")?,
            },
            Command::Help => presenter.println(&help_text())?,
            Command::Quit => break,
        }
    }
    Ok(())
}

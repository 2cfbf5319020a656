use clap::{Parser, ValueEnum};
use log::LevelFilter;
use std::path::PathBuf;

use manview::config::Config;
use manview::shell::Format;

#[derive(Parser, Debug)]
#[command(name = "manview")]
#[command(version)]
#[command(about = "A manual page navigator with hyperlinks and back/forward history")]
#[command(
    long_about = "manview - Resolve manual pages, turn cross-references into links, rebuild\n\
    tables, and browse them with a back/forward history.\n\n\
    Without --interactive the page at the cursor is printed once and the\n\
    error log goes to stderr.\n\n\
    Examples:\n  \
    manview ls                 # Print ls(1) as HTML\n  \
    manview -o text 'printf(3)' # Print printf(3) as plain text\n  \
    manview -i ls grep         # Open both, then browse interactively\n  \
    manview -p 3 -i            # Start with three random pages"
)]
pub struct Cli {
    /// Pages to open, e.g. `ls`, `ls(1)` or `3 printf`
    ///
    /// All arguments are joined and parsed as one query; flag-like words
    /// are ignored.
    #[arg(value_name = "QUERY", trailing_var_arg = true, allow_hyphen_values = true)]
    pub query: Vec<String>,

    /// Manual lookup command
    #[arg(short = 'M', long = "man-command", value_name = "COMMAND")]
    pub man_command: Option<String>,

    /// Manual pages directory (passed as `-M` to the lookup command)
    #[arg(short = 'D', long = "man-directory", value_name = "DIR", value_parser = existing_directory)]
    pub man_directory: Option<PathBuf>,

    /// Number of random pages opened at startup (0-20)
    #[arg(short = 'p', long = "random-page", value_name = "N", value_parser = clap::value_parser!(u8).range(0..=20))]
    pub random_page: Option<u8>,

    /// Do not list the other sections providing each page
    #[arg(short = 'P', long = "disable-proposal")]
    pub disable_proposal: bool,

    /// Do not turn e-mail addresses into links
    #[arg(long = "no-email-link")]
    pub no_email_link: bool,

    /// Do not turn URLs into links
    #[arg(long = "no-url-link")]
    pub no_url_link: bool,

    /// Use the host theme's colours instead of the built-in stylesheet
    #[arg(short = 't', long = "theme-color")]
    pub theme_color: bool,

    /// Read commands from stdin after the startup pages are opened
    #[arg(short = 'i', long = "interactive")]
    pub interactive: bool,

    /// Output format for rendered pages
    ///
    ///   html - themed HTML document (default)
    ///   text - tags stripped, entities decoded
    ///   json - title, sections, raw flag and content
    #[arg(short = 'o', long = "output", default_value = "html")]
    pub output: OutputFormat,

    /// Write logs to this file instead of stderr
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Save the effective configuration to the config file and exit
    #[arg(long = "write-config")]
    pub write_config: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Html,
    Text,
    Json,
}

impl From<OutputFormat> for Format {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Html => Format::Html,
            OutputFormat::Text => Format::Text,
            OutputFormat::Json => Format::Json,
        }
    }
}

impl Cli {
    /// Layer the command line over a loaded configuration.
    pub fn apply(&self, config: &mut Config) {
        if let Some(command) = &self.man_command {
            config.man.command = command.clone();
        }
        if let Some(dir) = &self.man_directory {
            config.man.directory = Some(dir.clone());
        }
        if let Some(count) = self.random_page {
            config.display.random_pages = usize::from(count);
        }
        if self.disable_proposal {
            config.display.alternates = false;
        }
        if self.no_email_link {
            config.display.email_links = false;
        }
        if self.no_url_link {
            config.display.url_links = false;
        }
        if self.theme_color {
            config.style.theme_colors = true;
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

fn existing_directory(value: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(value);
    if path.is_dir() {
        Ok(path)
    } else {
        Err(format!("'{}' directory not found", value))
    }
}

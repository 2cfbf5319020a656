//! # manview
//!
//! Command-line manual page navigator.
//!
//! ## Usage
//!
//! Print a page as themed HTML:
//! ```sh
//! manview ls
//! ```
//!
//! Open several pages and browse them:
//! ```sh
//! manview -i 'ls(1)' grep
//! ```
//!
//! Start with random pages, printed as text:
//! ```sh
//! manview -p 3 -o text
//! ```

mod cli;

use clap::Parser as ClapParser;
use cli::Cli;
use color_eyre::Result;
use log::info;
use manview::config::Config;
use manview::man::{ManTool, SubprocessInvoker, ToolSettings};
use manview::markup::TransformOptions;
use manview::navigator::{Navigator, NavigatorOptions, Presenter};
use manview::shell::{self, TerminalPresenter};
use manview::style::StyleSheet;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode, WriteLogger};
use std::fs::File;
use std::io;
use std::process;

fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Cli::parse();
    init_logging(&args)?;

    let mut config = Config::load();
    args.apply(&mut config);
    let config = config.normalized();

    if args.write_config {
        let path = config.save()?;
        println!("Configuration written to {}", path.display());
        return Ok(());
    }

    let tool = ManTool::new(
        SubprocessInvoker::new(config.man.command.clone()),
        ToolSettings::from(&config.man),
    );
    let options = NavigatorOptions {
        transform: TransformOptions {
            url_links: config.display.url_links,
            email_links: config.display.email_links,
        },
        alternates: config.display.alternates,
    };
    let mut navigator = Navigator::new(tool, options);
    let mut presenter =
        TerminalPresenter::stdio(args.output.into(), StyleSheet::new(&config.style));

    // Startup pages: random ones first, then the command line batch. Failures
    // only go to the error log.
    if config.display.random_pages > 0 {
        navigator.open_random(config.display.random_pages);
    }
    if !args.query.is_empty() {
        navigator.open_query(&args.query.join(" "));
    }
    info!(
        "Startup opened {} page(s), {} error(s)",
        navigator.history().len(),
        navigator.errors().len()
    );

    if let Some(view) = navigator.view() {
        presenter.render(&view);
    }

    if args.interactive {
        shell::run(&mut navigator, &mut presenter, io::stdin().lock())?;
        return Ok(());
    }

    if !navigator.errors().is_empty() {
        eprintln!("{}", navigator.errors().summary());
    }

    if navigator.history().is_empty() {
        if !navigator.errors().is_empty() {
            process::exit(1);
        }
        eprintln!("Nothing to open.");
        eprintln!("\nUsage: manview [OPTIONS] [QUERY]...");
        eprintln!("       manview -i [OPTIONS] [QUERY]...");
        eprintln!("\nTry 'manview --help' for more information.");
    }

    Ok(())
}

/// Log to `--log-file` when given, stderr otherwise.
fn init_logging(args: &Cli) -> Result<()> {
    let level = args.log_level();
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    match &args.log_file {
        Some(path) => WriteLogger::init(level, log_config, File::create(path)?)?,
        None => TermLogger::init(level, log_config, TerminalMode::Stderr, ColorChoice::Auto)?,
    }
    Ok(())
}

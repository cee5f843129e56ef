//! CLI entry and dispatch.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chatmd_core::export::DEFAULT_TITLE;
use chatmd_core::{to_html, ParseErrors, Parser, PrintableDocument};
use chrono::Local;
use clap::Parser as _;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use crate::output;

const LOG_ENV: &str = "CHATMD_LOG";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(clap::Parser)]
#[command(name = "chatmd")]
#[command(version)]
#[command(about = "Render assistant chat replies to HTML")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Write output to FILE instead of stdout
    #[arg(short, long, global = true, value_name = "FILE")]
    output: Option<PathBuf>,
}

/// Input shared by every command.
#[derive(clap::Args, Debug, Clone, Default)]
struct InputArgs {
    /// Reply to read; stdin when omitted or "-"
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Render a reply to an HTML fragment
    Render {
        #[command(flatten)]
        input: InputArgs,

        /// Wrap the fragment in a printable HTML document
        #[arg(long)]
        standalone: bool,

        /// Title of the printable document
        #[arg(long, env = "CHATMD_TITLE", default_value = DEFAULT_TITLE)]
        title: String,
    },

    /// Display the block structure of a reply
    Parse {
        #[command(flatten)]
        input: InputArgs,

        /// Output the tree as JSON
        #[arg(short, long)]
        json: bool,

        /// Include inline content for every block
        #[arg(short, long, conflicts_with = "json")]
        verbose: bool,
    },

    /// Report constructs that degraded to text; exits 1 when any exist
    Validate {
        #[command(flatten)]
        input: InputArgs,

        /// Output the report as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show block and inline counts
    Stats {
        #[command(flatten)]
        input: InputArgs,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    let out = cli.output.as_deref();
    match cli.command {
        Commands::Render {
            input,
            standalone,
            title,
        } => {
            let text = read_input(&input)?;
            let title = standalone.then_some(title.as_str());
            emit(out, &cmd_render(&text, title))
        }
        Commands::Parse {
            input,
            json,
            verbose,
        } => {
            let text = read_input(&input)?;
            emit(out, &cmd_parse(&text, json, verbose)?)
        }
        Commands::Validate { input, json } => {
            let text = read_input(&input)?;
            let result = Parser::new().parse_with_recovery(&text);
            emit(out, &output::validation_report(&result.errors, json)?)?;
            if !result.errors.is_empty() {
                bail!("{} diagnostic(s) found", result.errors.len());
            }
            Ok(())
        }
        Commands::Stats { input } => {
            let text = read_input(&input)?;
            let result = Parser::new().parse_with_recovery(&text);
            let stats = output::DocumentStats::from_document(&result.document, &text);
            emit(out, &stats.report(result.errors.len())?)
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    // A subscriber may already be installed when embedded; keep it.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn read_input(args: &InputArgs) -> Result<String> {
    match args.file.as_deref() {
        Some(path) if path != Path::new("-") => {
            debug!(path = %path.display(), "reading reply");
            fs::read_to_string(path).with_context(|| format!("failed to read '{}'", path.display()))
        }
        _ => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            Ok(buf)
        }
    }
}

/// Write to `path`, or stdout when none is given.
fn emit(path: Option<&Path>, text: &str) -> Result<()> {
    match path {
        Some(path) => fs::write(path, text)
            .with_context(|| format!("failed to write '{}'", path.display())),
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(text.as_bytes())
                .and_then(|()| stdout.flush())
                .context("failed to write stdout")
        }
    }
}

fn log_diagnostics(errors: &ParseErrors) {
    for error in errors.iter() {
        warn!(kind = error.kind.as_str(), "{error}");
    }
}

// =============================================================================
// Render Command
// =============================================================================

/// `title` is set when a printable document was requested.
fn cmd_render(input: &str, title: Option<&str>) -> String {
    let result = Parser::new().parse_with_recovery(input);
    log_diagnostics(&result.errors);

    let fragment = to_html(&result.document);
    let mut html = match title {
        Some(title) => {
            let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
            PrintableDocument::new(title)
                .generated_at(timestamp)
                .wrap(&fragment)
        }
        None => fragment,
    };
    if !html.ends_with('\n') {
        html.push('\n');
    }
    html
}

// =============================================================================
// Parse Command
// =============================================================================

fn cmd_parse(input: &str, json: bool, verbose: bool) -> Result<String> {
    let result = Parser::new().parse_with_recovery(input);
    log_diagnostics(&result.errors);

    if json {
        output::document_json(&result.document)
    } else {
        output::document_summary(&result.document, verbose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn fragment_gets_trailing_newline() {
        assert_eq!(cmd_render("hi", None), "<p>hi</p>\n");
    }

    #[test]
    fn standalone_render_wraps_fragment() {
        let html = cmd_render("**done**", Some("Notes"));
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Notes</title>"));
        assert!(html.contains("<strong>done</strong>"));
        assert!(html.contains("Generated on: "));
    }
}

//! chatmd CLI - render, inspect, and validate assistant chat replies
//!
//! Usage:
//!   chatmd <COMMAND> [FILE]
//!
//! Commands:
//!   render    Render a reply to an HTML fragment or printable document
//!   parse     Display block structure
//!   validate  Report degraded constructs
//!   stats     Show block and inline counts

mod cli;
mod output;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{e:#}");
        std::process::exit(1);
    }
}

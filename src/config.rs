// Command-line configuration

use std::env;
use std::path::PathBuf;

use clap::Parser;

const HISTORY_FILE: &str = ".lark_history";

/// The Lark programming language interpreter.
#[derive(Parser, Debug, Clone)]
#[command(name = "lark", version)]
pub struct Config {
    /// Source file to run. Starts the REPL when omitted.
    pub file: Option<PathBuf>,

    /// Evaluate SRC and print the result.
    #[arg(short, long, value_name = "SRC", conflicts_with = "file")]
    pub eval: Option<String>,

    /// Tracing filter, e.g. `lark=debug`. Overrides RUST_LOG.
    #[arg(long, value_name = "FILTER")]
    pub log: Option<String>,

    /// Do not load or save REPL history.
    #[arg(long)]
    pub no_history: bool,
}

impl Config {
    pub fn history_path(&self) -> Option<PathBuf> {
        if self.no_history {
            return None;
        }
        env::var_os("HOME").map(|home| PathBuf::from(home).join(HISTORY_FILE))
    }
}

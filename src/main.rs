// ═══════════════════════════════════════════════════════════
// Lark — The Lark Programming Language
// ═══════════════════════════════════════════════════════════

use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use tracing::debug;

use lark::config::Config;
use lark::{repl, Interpreter, LarkError};

fn main() -> ExitCode {
    let config = Config::parse();
    init_logging(config.log.as_deref());

    let result = match (&config.eval, &config.file) {
        (Some(source), _) => run_source(source),
        (None, Some(path)) => run_file(path),
        (None, None) => repl::start(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report(&e);
            ExitCode::FAILURE
        }
    }
}

// Silent unless a filter is given on the command line or in RUST_LOG.
fn init_logging(filter: Option<&str>) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = match filter {
        Some(directives) => EnvFilter::new(directives),
        None if env::var("RUST_LOG").is_ok() => EnvFilter::from_default_env(),
        None => return,
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn report(e: &LarkError) {
    match e {
        LarkError::Syntax(e)  => eprintln!("\x1b[31m[parse error]\x1b[0m {}", e),
        LarkError::Runtime(e) => eprintln!("\x1b[31m[runtime error]\x1b[0m {}", e),
        other                 => eprintln!("\x1b[31m[Lark]\x1b[0m {}", other),
    }
}

// ═══════════════════════════════════════════════════════════
// Running source
// ═══════════════════════════════════════════════════════════

fn run_file(path: &Path) -> Result<(), LarkError> {
    let source = fs::read_to_string(path).map_err(|source| LarkError::Read {
        path: path.display().to_string(),
        source,
    })?;
    debug!(path = %path.display(), bytes = source.len(), "running file");
    run_source(&source)
}

fn run_source(source: &str) -> Result<(), LarkError> {
    run_source_to(source, &mut io::stdout().lock())
}

fn run_source_to(source: &str, out: &mut impl Write) -> Result<(), LarkError> {
    let interp = Interpreter::new();
    match interp.eval(source)? {
        Some(val) if !val.is_null() => writeln!(out, "{}", val.inspect()).map_err(LarkError::Write),
        _ => Ok(()),
    }
}

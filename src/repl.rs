// ═══════════════════════════════════════════════════════════
// REPL
// ═══════════════════════════════════════════════════════════

use std::io::{self, Write};

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::{debug, warn};

use crate::builtins;
use crate::config::Config;
use crate::error::LarkError;
use crate::evaluator::Signal;
use crate::Interpreter;

pub const PROMPT: &str = ">> ";

pub fn start(config: &Config) -> Result<(), LarkError> {
    println!("  \x1b[90mThe Lark Programming Language v{}\x1b[0m", env!("CARGO_PKG_VERSION"));
    println!("  \x1b[90mType :help for help, :quit to exit\x1b[0m");
    println!();

    let mut rl = DefaultEditor::new()?;
    let history = config.history_path();
    if let Some(path) = &history {
        if rl.load_history(path).is_err() {
            debug!(path = %path.display(), "no previous history");
        }
    }

    let interp = Interpreter::new();
    let stdout = io::stdout();

    loop {
        let line = match rl.readline(PROMPT) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };

        let trimmed = line.trim();
        match trimmed {
            ":quit" | ":q" | ":exit" => break,
            ":help" | ":h" => { print_help(); continue; }
            "" => continue,
            _ => {}
        }
        rl.add_history_entry(trimmed)?;

        if let Err(e) = eval_line(&interp, trimmed, &mut stdout.lock()) {
            warn!(error = %e, "cannot write REPL output");
        }
    }

    if let Some(path) = &history {
        if let Err(e) = rl.save_history(path) {
            warn!(path = %path.display(), error = %e, "cannot save history");
        }
    }
    Ok(())
}

/// Evaluates one line and writes what the user should see. Language errors
/// are printed, never returned.
pub fn eval_line(interp: &Interpreter, line: &str, out: &mut impl Write) -> io::Result<()> {
    match interp.eval(line) {
        Ok(Some(val)) => writeln!(out, "{}", val.inspect()),
        Ok(None) => Ok(()),
        Err(LarkError::Syntax(e)) => writeln!(out, "\t{}", e),
        Err(LarkError::Runtime(e)) => {
            let signal = Signal::from(e);
            debug!(kind = %signal.type_name(), "evaluation stopped");
            writeln!(out, "{}", signal)
        }
        Err(e) => writeln!(out, "{}", e),
    }
}

fn print_help() {
    println!();
    println!("  \x1b[1mLark Language Quick Reference\x1b[0m");
    println!();
    println!("  \x1b[33mBindings:\x1b[0m     let x = 42;");
    println!("  \x1b[33mFunctions:\x1b[0m    let add = fn(a, b) {{ a + b }}; add(1, 2)");
    println!("  \x1b[33mConditions:\x1b[0m   if (x > 1) {{ \"big\" }} else {{ \"small\" }}");
    println!("  \x1b[33mCollections:\x1b[0m  [1, 2, 3][0]    {{\"key\": \"value\"}}[\"key\"]");
    println!("  \x1b[33mBuilt-ins:\x1b[0m    {}", builtins::names().collect::<Vec<_>>().join(", "));
    println!();
    println!("  \x1b[33mREPL commands:\x1b[0m  :help  :quit");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn session(lines: &[&str]) -> String {
        let interp = Interpreter::new();
        let mut out = Vec::new();
        for line in lines {
            eval_line(&interp, line, &mut out).unwrap();
        }
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn bindings_persist_between_lines() {
        assert_eq!(session(&["let x = 2;", "x * 21"]), "42\n");
    }

    #[test]
    fn errors_are_printed_and_the_session_continues() {
        assert_eq!(
            session(&["1 + true", "\"still \" + \"here\""]),
            "ERROR: type mismatch: INTEGER + BOOLEAN\nstill here\n"
        );
    }

    #[test]
    fn syntax_errors_are_indented() {
        assert_eq!(session(&["let = 1"]), "\texpected identifier, got '=' at line 1, col 5\n");
    }
}

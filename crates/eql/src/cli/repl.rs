//! REPL implementation

use super::output::{self, OutputFormat};
use super::run::engine_options;
use super::TransportConfig;
use crate::Session;
use anyhow::{bail, Result};
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

/// Configuration for REPL
pub struct ReplConfig {
    pub transport: TransportConfig,
    pub strict: bool,
    pub output_format: OutputFormat,
}

/// REPL state
///
/// The session keeps the connection between inputs.
struct ReplState {
    session: Session,
    explain: bool,
    format: OutputFormat,
}

/// Run the interactive REPL
pub fn run(config: ReplConfig) -> Result<()> {
    let transport = config.transport.build()?;

    println!("{}", "EQL Interactive REPL".cyan().bold());
    println!("Type {} for help, {} to quit", ":help".green(), ":quit".green());
    println!("Transport: {}", transport.name());
    println!();

    let mut state = ReplState {
        session: Session::new(engine_options(config.strict), transport),
        explain: false,
        format: config.output_format,
    };

    let mut rl = DefaultEditor::new()?;

    let history_file = dirs::home_dir().map(|mut path| {
        path.push(".eql_history");
        path
    });
    if let Some(ref path) = history_file {
        let _ = rl.load_history(path);
    }

    loop {
        match rl.readline("eql> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                rl.add_history_entry(line)?;

                if line.starts_with(':') {
                    match handle_command(line, &mut state) {
                        Ok(false) => break,
                        Ok(true) => {}
                        Err(e) => eprintln!("{}", output::format_error(&e)),
                    }
                    continue;
                }

                evaluate_input(line, &mut state);
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
            }
            Err(ReadlineError::Eof) => {
                println!("^D");
                break;
            }
            Err(err) => {
                eprintln!("Error: {:?}", err);
                break;
            }
        }
    }

    if let Some(ref path) = history_file {
        let _ = rl.save_history(path);
    }

    println!("Goodbye!");
    Ok(())
}

/// Handle REPL commands (starting with :); `Ok(false)` quits
fn handle_command(command: &str, state: &mut ReplState) -> Result<bool> {
    let parts: Vec<&str> = command.split_whitespace().collect();

    match parts.first().copied().unwrap_or_default() {
        ":help" | ":h" => print_help(),
        ":quit" | ":q" | ":exit" => return Ok(false),
        ":status" | ":s" => match state.session.context().connection() {
            Some(connection) => println!("Connected: {}", connection.info()),
            None => println!("Not connected"),
        },
        ":explain" | ":e" => {
            state.explain = !state.explain;
            let mode = if state.explain { "on" } else { "off" };
            println!("{}", output::format_success(&format!("Explain {}", mode)));
        }
        ":format" | ":f" => {
            state.format = match parts.get(1).copied() {
                Some("json") => OutputFormat::Json,
                Some("pretty") => OutputFormat::Pretty,
                Some("table") => OutputFormat::Table,
                _ => bail!("Usage: :format json|pretty|table"),
            };
        }
        other => bail!("Unknown command: {}. Type :help for available commands", other),
    }
    Ok(true)
}

fn evaluate_input(line: &str, state: &mut ReplState) {
    let explain = state.explain;
    let format = state.format;
    let result = state.session.run_with(
        line,
        |plan| {
            if explain {
                match output::format_plan(plan) {
                    Ok(text) => println!("{}\n{}", "plan:".cyan().bold(), text),
                    Err(e) => eprintln!("{}", output::format_error(&e)),
                }
            }
        },
        |outcome| match output::format_outcome(outcome, format) {
            Ok(text) => println!("{}", text),
            Err(e) => eprintln!("{}", output::format_error(&e)),
        },
    );
    if let Err(error) = result {
        eprintln!("{}", output::format_diagnostic(&error.to_diagnostic(), "<input>"));
    }
}

fn print_help() {
    println!("{}", "Commands:".bold());
    println!("  {}           Show this help", ":help".green());
    println!("  {}           Exit the REPL", ":quit".green());
    println!("  {}         Show the current connection", ":status".green());
    println!("  {}        Toggle printing request plans", ":explain".green());
    println!("  {} <fmt>   Output as json, pretty or table", ":format".green());
    println!();
    println!("{}", "Statements:".bold());
    println!("  connect host:port[, host:port...] [cluster name]");
    println!("  query target [fields a, b] [where expr] [return limit[, offset]] [sort f [asc|desc], ...]");
}

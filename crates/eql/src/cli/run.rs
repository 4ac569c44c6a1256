//! Run command implementation

use super::output::{self, OutputFormat};
use super::TransportConfig;
use crate::{ConnectivePolicy, EngineOptions, Session};
use anyhow::{bail, Context, Result};
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

/// Configuration for the run command
pub struct RunConfig {
    pub file: PathBuf,
    pub transport: TransportConfig,
    /// Reject `and`/`or` mixed at one level
    pub strict: bool,
    /// Print each statement's plan before it executes
    pub explain: bool,
    pub verbose: bool,
    pub output_format: OutputFormat,
    pub output_file: Option<PathBuf>,
}

impl RunConfig {
    pub fn engine_options(&self) -> EngineOptions {
        engine_options(self.strict)
    }
}

pub(crate) fn engine_options(strict: bool) -> EngineOptions {
    EngineOptions {
        connective_policy: if strict {
            ConnectivePolicy::RequireParentheses
        } else {
            ConnectivePolicy::AndWins
        },
    }
}

/// Run an EQL script file
pub fn run(config: RunConfig) -> Result<()> {
    let file_name = config.file.display().to_string();
    if config.verbose {
        eprintln!("Running EQL script: {}", file_name);
    }

    let source = fs::read_to_string(&config.file)
        .with_context(|| format!("Failed to read EQL file: {}", file_name))?;

    let transport = config.transport.build()?;
    if config.verbose {
        eprintln!("Transport: {}", transport.name());
    }

    let mut session = Session::new(config.engine_options(), transport);
    let mut rendered = Vec::new();
    let to_stdout = config.output_file.is_none();

    let result = session.run_with(
        &source,
        |plan| {
            if config.explain {
                match output::format_plan(plan) {
                    Ok(text) => eprintln!("{}\n{}", "plan:".cyan().bold(), text),
                    Err(e) => eprintln!("{}", output::format_error(&e)),
                }
            }
        },
        |outcome| match output::format_outcome(outcome, config.output_format) {
            Ok(text) if to_stdout => println!("{}", text),
            Ok(text) => rendered.push(text),
            Err(e) => eprintln!("{}", output::format_error(&e)),
        },
    );

    if !to_stdout {
        output::write_output(&rendered.join("\n"), config.output_file.as_deref())?;
    }

    match result {
        Ok(outcomes) => {
            if config.verbose {
                eprintln!(
                    "{}",
                    output::format_success(&format!("{} statement(s) completed", outcomes.len()))
                );
            }
            Ok(())
        }
        Err(error) => {
            eprintln!("{}", output::format_diagnostic(&error.to_diagnostic(), &file_name));
            bail!("{} stopped with {}", file_name, error.code())
        }
    }
}

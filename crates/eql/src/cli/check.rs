//! Check command implementation

use super::output;
use super::run::engine_options;
use crate::{check_source, CheckReport};
use anyhow::{bail, Result};
use colored::Colorize;
use eql_diagnostics::{Diagnostic, EQL0400};
use std::fs;
use std::path::PathBuf;

/// Configuration for the check command
pub struct CheckConfig {
    pub files: Vec<PathBuf>,
    /// Mixed `and`/`or` is an error instead of a warning
    pub strict: bool,
    pub verbose: bool,
}

struct FileReport {
    file: PathBuf,
    report: CheckReport,
}

/// Check EQL files without running them
pub fn check(config: CheckConfig) -> Result<()> {
    if config.files.is_empty() {
        bail!("No files specified for checking");
    }

    let options = engine_options(config.strict);
    let reports: Vec<FileReport> = config
        .files
        .iter()
        .map(|file| {
            if config.verbose {
                eprintln!("Checking: {}", file.display());
            }
            let report = match fs::read_to_string(file) {
                Ok(source) => check_source(&source, options),
                Err(e) => CheckReport {
                    statements: 0,
                    diagnostics: vec![Diagnostic::error(
                        EQL0400,
                        format!("Failed to read file: {}", e),
                    )],
                },
            };
            FileReport {
                file: file.clone(),
                report,
            }
        })
        .collect();

    for file_report in &reports {
        print_file_report(file_report);
    }

    let total_errors: usize = reports.iter().map(|r| r.report.error_count()).sum();
    let total_warnings: usize = reports.iter().map(|r| r.report.warning_count()).sum();

    println!();
    if total_errors == 0 && total_warnings == 0 {
        println!(
            "{}",
            output::format_success(&format!(
                "All {} file(s) checked successfully",
                reports.len()
            ))
        );
        return Ok(());
    }

    let mut summary = Vec::new();
    if total_errors > 0 {
        summary.push(format!("{} error(s)", total_errors).red().to_string());
    }
    if total_warnings > 0 {
        summary.push(format!("{} warning(s)", total_warnings).yellow().to_string());
    }
    eprintln!("{} {}", "Found".bold(), summary.join(", "));

    if total_errors > 0 {
        bail!("Check failed with {} error(s)", total_errors);
    }
    Ok(())
}

fn print_file_report(file_report: &FileReport) {
    let name = file_report.file.display().to_string();
    let report = &file_report.report;
    let status = if report.error_count() == 0 {
        "✓".green().bold()
    } else {
        "✗".red().bold()
    };
    println!(
        "{} {} ({} statement(s))",
        status,
        name.bold(),
        report.statements
    );
    for diagnostic in &report.diagnostics {
        println!("{}", output::format_diagnostic(diagnostic, &name));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &tempfile::TempDir, name: &str, source: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, source).unwrap();
        path
    }

    #[test]
    fn test_check_clean_files() {
        let dir = tempfile::tempdir().unwrap();
        let files = vec![
            write(&dir, "a.eql", "connect localhost:9200;"),
            write(&dir, "b.eql", "query logs where (a=1 or b=2) and c=3;"),
        ];
        check(CheckConfig {
            files,
            strict: false,
            verbose: false,
        })
        .unwrap();
    }

    #[test]
    fn test_warnings_pass_unless_strict() {
        let dir = tempfile::tempdir().unwrap();
        let file = write(&dir, "mixed.eql", "query logs where a=1 and b=2 or c=3;");

        check(CheckConfig {
            files: vec![file.clone()],
            strict: false,
            verbose: false,
        })
        .unwrap();

        let err = check(CheckConfig {
            files: vec![file],
            strict: true,
            verbose: false,
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "Check failed with 1 error(s)");
    }

    #[test]
    fn test_unreadable_file_is_an_error() {
        let err = check(CheckConfig {
            files: vec![PathBuf::from("/nonexistent/x.eql")],
            strict: false,
            verbose: false,
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "Check failed with 1 error(s)");
    }

    #[test]
    fn test_no_files() {
        let err = check(CheckConfig {
            files: Vec::new(),
            strict: false,
            verbose: false,
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "No files specified for checking");
    }
}

//! Output formatting utilities

use anyhow::{Context, Result};
use clap::ValueEnum;
use colored::Colorize;
use eql_cluster::{Hit, SearchResponse};
use eql_diagnostics::{Diagnostic, Severity};
use eql_eval::{StatementOutcome, StatementPlan};
use serde_json::Value;
use std::fs::File;
use std::io::{IsTerminal, Write};
use std::path::Path;
use tabled::builder::Builder;
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One compact JSON document per statement
    Json,
    /// Indented JSON
    #[default]
    Pretty,
    /// Hits as a table
    Table,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

/// Set up color output based on user preference
pub fn setup_colors(mode: ColorMode) {
    let enabled = match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => std::io::stdout().is_terminal(),
    };
    colored::control::set_override(enabled);
}

/// Format an error for display
pub fn format_error(error: &anyhow::Error) -> String {
    format!("{} {:#}", "Error:".red().bold(), error)
}

pub fn format_warning(warning: &str) -> String {
    format!("{} {}", "Warning:".yellow().bold(), warning)
}

pub fn format_success(message: &str) -> String {
    format!("{} {}", "Success:".green().bold(), message)
}

/// Format diagnostic information (file:line:col)
pub fn format_location(file: &str, line: usize, col: usize) -> String {
    format!("{}:{}:{}", file.cyan(), line, col)
}

/// Format a diagnostic found in `file`
pub fn format_diagnostic(diagnostic: &Diagnostic, file: &str) -> String {
    let level = match diagnostic.severity {
        Severity::Error => "error".red().bold(),
        Severity::Warning => "warning".yellow().bold(),
    };
    let mut text = match &diagnostic.location {
        Some(loc) => format!(
            "  {}[{}] {}: {}",
            level,
            diagnostic.code,
            format_location(file, loc.line, loc.column),
            diagnostic.message
        ),
        None => format!("  {}[{}]: {}", level, diagnostic.code, diagnostic.message),
    };
    if let Some(help) = &diagnostic.help {
        text.push_str(&format!("\n    {} {}", "help:".cyan(), help));
    }
    text
}

/// Write output to a file or stdout
pub fn write_output(content: &str, output_file: Option<&Path>) -> Result<()> {
    if let Some(path) = output_file {
        let mut file = File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        file.write_all(content.as_bytes())
            .with_context(|| format!("Failed to write to output file: {}", path.display()))?;
        eprintln!(
            "{}",
            format_success(&format!("Output written to {}", path.display()))
        );
    } else {
        println!("{}", content);
    }
    Ok(())
}

/// Format JSON value for output
pub fn format_json(value: &Value, pretty: bool) -> Result<String> {
    if pretty {
        serde_json::to_string_pretty(value).context("Failed to serialize JSON")
    } else {
        serde_json::to_string(value).context("Failed to serialize JSON")
    }
}

/// Render one statement outcome
pub fn format_outcome(outcome: &StatementOutcome, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json | OutputFormat::Pretty => {
            let value = serde_json::to_value(outcome).context("Failed to serialize outcome")?;
            format_json(&value, format == OutputFormat::Pretty)
        }
        OutputFormat::Table => Ok(match outcome {
            StatementOutcome::Connected {
                cluster_name,
                endpoints,
            } => {
                #[derive(Tabled)]
                struct EndpointRow {
                    #[tabled(rename = "Host")]
                    host: String,
                    #[tabled(rename = "Port")]
                    port: u16,
                }

                let rows = endpoints.iter().map(|e| EndpointRow {
                    host: e.host.clone(),
                    port: e.port,
                });
                format!(
                    "Connected to {}\n{}",
                    cluster_name.as_deref().unwrap_or("(default cluster)"),
                    Table::new(rows).with(Style::modern())
                )
            }
            StatementOutcome::Queried { request, response } => {
                format_hits(response, &request.fields)
            }
        }),
    }
}

/// Summary line plus a table of hits
///
/// Columns are the projected fields when there are any, otherwise every
/// source field in order of first appearance.
pub fn format_hits(response: &SearchResponse, fields: &[String]) -> String {
    let summary = format!(
        "{} of {} hit(s) in {}ms{}",
        response.hits.hits.len(),
        response.total(),
        response.took,
        if response.timed_out { " (timed out)" } else { "" }
    );
    if response.hits.hits.is_empty() {
        return summary;
    }

    let columns = if fields.is_empty() {
        source_fields(&response.hits.hits)
    } else {
        fields.to_vec()
    };

    let mut builder = Builder::default();
    builder.push_record(
        ["_index", "_id"]
            .into_iter()
            .map(str::to_string)
            .chain(columns.iter().cloned()),
    );
    for hit in &response.hits.hits {
        let cells = columns.iter().map(|column| {
            hit.source
                .as_ref()
                .and_then(|source| source.get(column))
                .map(format_value)
                .unwrap_or_default()
        });
        builder.push_record([hit.index.clone(), hit.id.clone()].into_iter().chain(cells));
    }
    format!("{}\n{}", summary, builder.build().with(Style::modern()))
}

fn source_fields(hits: &[Hit]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for hit in hits {
        if let Some(Value::Object(source)) = &hit.source {
            for key in source.keys() {
                if !columns.contains(key) {
                    columns.push(key.clone());
                }
            }
        }
    }
    columns
}

/// Format a simple value for display
fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Describe what a statement is about to do
pub fn format_plan(plan: &StatementPlan) -> Result<String> {
    Ok(match plan {
        StatementPlan::Connect {
            cluster_name,
            hosts,
        } => {
            let hosts: Vec<String> = hosts.iter().map(ToString::to_string).collect();
            match cluster_name {
                Some(name) => format!("CONNECT {} (cluster {})", hosts.join(", "), name),
                None => format!("CONNECT {}", hosts.join(", ")),
            }
        }
        StatementPlan::Query(request) => {
            let search = request.to_search_request();
            format!(
                "POST /{}/_search\n{}",
                search.target(),
                format_json(&search.to_body(), true)?
            )
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use eql_cluster::{Hits, TotalHits};
    use serde_json::json;

    fn response() -> SearchResponse {
        SearchResponse {
            took: 2,
            timed_out: false,
            hits: Hits {
                total: Some(TotalHits::Count(10)),
                max_score: None,
                hits: vec![
                    Hit {
                        index: "logs".into(),
                        id: "1".into(),
                        score: None,
                        source: Some(json!({"level": "ERROR", "code": 500})),
                    },
                    Hit {
                        index: "logs".into(),
                        id: "2".into(),
                        score: None,
                        source: Some(json!({"level": "WARN", "host": "a"})),
                    },
                ],
            },
        }
    }

    #[test]
    fn test_hits_table_uses_every_source_field() {
        colored::control::set_override(false);
        let text = format_hits(&response(), &[]);
        assert!(text.starts_with("2 of 10 hit(s) in 2ms"));
        let header = text.lines().nth(2).unwrap();
        for column in ["_index", "_id", "level", "code", "host"] {
            assert!(header.contains(column), "{header}");
        }
    }

    #[test]
    fn test_hits_table_uses_projection() {
        let text = format_hits(&response(), &["level".to_string()]);
        assert!(text.contains("ERROR"));
        assert!(!text.contains("500"));
    }

    #[test]
    fn test_empty_response_is_summary_only() {
        assert_eq!(
            format_hits(&SearchResponse::default(), &[]),
            "0 of 0 hit(s) in 0ms"
        );
    }

    #[test]
    fn test_json_outcome() {
        let outcome = StatementOutcome::Connected {
            cluster_name: None,
            endpoints: vec![eql_cluster::HostPort::new("h", 9200)],
        };
        let text = format_outcome(&outcome, OutputFormat::Json).unwrap();
        assert_eq!(
            text,
            r#"{"statement":"connected","cluster_name":null,"endpoints":[{"host":"h","port":9200}]}"#
        );
    }
}

//! Static checks for scripts that are not run

use eql_ast::NodeKind;
use eql_diagnostics::{Diagnostic, Severity, EQL0100};
use eql_eval::{post_order, ConnectivePolicy, EngineOptions, EqlEngine, EvaluationContext};
use eql_parser::{parse_with_mode, ParseMode};

/// Findings for one script
#[derive(Debug, Clone, Default)]
pub struct CheckReport {
    /// Statements that parsed
    pub statements: usize,
    /// Errors and warnings in source order
    pub diagnostics: Vec<Diagnostic>,
}

impl CheckReport {
    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }
}

/// Parse every statement, plan the ones that parsed, and flag clauses that
/// mix `and` with `or`
///
/// Planning evaluates every rule except the statement side effects, so bad
/// ports and literals are found without contacting a cluster.
pub fn check_source(source: &str, options: EngineOptions) -> CheckReport {
    let parsed = parse_with_mode(source, ParseMode::Analysis);
    let mut diagnostics: Vec<Diagnostic> = parsed.errors.iter().map(|e| e.to_diagnostic()).collect();

    if options.connective_policy == ConnectivePolicy::AndWins {
        // Nodes left behind by a statement that failed to parse are not walked
        for &stmt in parsed.tree.statements() {
            for id in post_order(&parsed.tree, stmt) {
                let Some(node) = parsed.tree.get(id) else {
                    continue;
                };
                if let NodeKind::FilterRest(rest) = &node.kind {
                    if rest.is_mixed() {
                        diagnostics.push(
                            Diagnostic::warning(
                                EQL0100,
                                "'and' and 'or' mixed at one level; only the 'and' terms are kept",
                            )
                            .with_span(node.span, source)
                            .with_help("Group the 'or' terms in parentheses"),
                        );
                    }
                }
            }
        }
    }

    let engine = EqlEngine::with_options(options);
    let mut ctx = EvaluationContext::default();
    for &stmt in parsed.tree.statements() {
        if let Err(error) = engine.plan_statement(&parsed.tree, stmt, &mut ctx) {
            let mut diagnostic = Diagnostic::error(error.code(), error.to_string());
            if let Some(node) = parsed.tree.get(stmt) {
                diagnostic = diagnostic.with_span(node.span, source);
            }
            diagnostics.push(diagnostic);
        }
    }

    diagnostics.sort_by_key(|d| d.location.as_ref().map(|l| l.offset));
    CheckReport {
        statements: parsed.tree.statements().len(),
        diagnostics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eql_diagnostics::{EQL0001, EQL0201};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_clean_script() {
        let report = check_source(
            "connect localhost:9200; query logs where a=1 and b='x'",
            EngineOptions::default(),
        );
        assert_eq!(report.statements, 2);
        assert!(report.diagnostics.is_empty(), "{:?}", report.diagnostics);
    }

    #[test]
    fn test_reports_parse_and_literal_errors_together() {
        let report = check_source(
            "connect localhost:70000; query logs where; query ok",
            EngineOptions::default(),
        );
        let codes: Vec<_> = report.diagnostics.iter().map(|d| d.code).collect();
        assert_eq!(codes, vec![EQL0201, EQL0001]);
        assert_eq!(report.error_count(), 2);
    }

    #[test]
    fn test_mixed_connectives_warn() {
        let report = check_source("query t where a=1 and b=2 or c=3", EngineOptions::default());
        assert_eq!(report.warning_count(), 1);
        assert_eq!(report.error_count(), 0);
        assert_eq!(report.diagnostics[0].code, EQL0100);
    }

    #[test]
    fn test_mixed_connectives_error_when_strict() {
        let options = EngineOptions {
            connective_policy: ConnectivePolicy::RequireParentheses,
        };
        let report = check_source("query t where a=1 and b=2 or c=3", options);
        assert_eq!(report.warning_count(), 0);
        assert_eq!(report.error_count(), 1);
        assert_eq!(report.diagnostics[0].code, EQL0100);
    }

    #[test]
    fn test_failed_statement_is_not_checked_for_connectives() {
        let report = check_source(
            "query t where a=1 and b=2 or c=3 return x; query ok",
            EngineOptions::default(),
        );
        assert_eq!(report.statements, 1);
        assert_eq!(report.warning_count(), 0);
        assert_eq!(report.error_count(), 1);
        assert!(report.diagnostics.iter().all(|d| d.code != EQL0100));
    }
}

//! Tests for EQL statement parsing
//!
//! Covers:
//! - Connect statements (host lists, cluster names)
//! - Query statements and their optional clauses
//! - Filter predicate shapes (terms, parentheses, rest clauses)
//! - Error codes and locations

use eql_ast::{Connective, NodeId, NodeKind, ParseTree, PredHead, SortMarker};
use eql_diagnostics::{EQL0001, EQL0002, EQL0003, EQL0005, EQL0006, EQL0007};
use eql_parser::{parse, parse_with_mode, ParseMode, MAX_FILTER_DEPTH};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn parse_ok(input: &str) -> ParseTree {
    parse(input).unwrap_or_else(|e| panic!("Failed to parse '{}': {:?}", input, e))
}

fn kind(tree: &ParseTree, id: NodeId) -> &NodeKind {
    &tree.get(id).expect("node exists").kind
}

fn only_query(tree: &ParseTree) -> &eql_ast::QueryStmt {
    match kind(tree, tree.statements()[0]) {
        NodeKind::QueryStmt(q) => q,
        other => panic!("Expected QueryStmt, got: {:?}", other),
    }
}

fn predicate_of(tree: &ParseTree, query: &eql_ast::QueryStmt) -> NodeId {
    let filter = query.filter.expect("where clause");
    match kind(tree, filter) {
        NodeKind::FilterStmt(f) => f.predicate,
        other => panic!("Expected FilterStmt, got: {:?}", other),
    }
}

// === Connect ===

#[test]
fn test_connect_single_host() {
    let tree = parse_ok("connect localhost:9200;");
    assert_eq!(tree.statements().len(), 1);

    match kind(&tree, tree.statements()[0]) {
        NodeKind::ConnectStmt(c) => {
            assert_eq!(c.hosts.len(), 1);
            assert!(c.cluster_name.is_none());
            match kind(&tree, c.hosts[0]) {
                NodeKind::HostPort(hp) => {
                    assert_eq!(hp.host.text, "localhost");
                    assert_eq!(hp.port.text, "9200");
                }
                other => panic!("Expected HostPort, got: {:?}", other),
            }
        }
        other => panic!("Expected ConnectStmt, got: {:?}", other),
    }
}

#[test]
fn test_connect_host_list_and_cluster() {
    let tree = parse_ok("connect es1:9200, es2:9201 , 10.0.0.3:9202 cluster logging");
    match kind(&tree, tree.statements()[0]) {
        NodeKind::ConnectStmt(c) => {
            let hosts: Vec<String> = c
                .hosts
                .iter()
                .map(|id| match kind(&tree, *id) {
                    NodeKind::HostPort(hp) => format!("{}:{}", hp.host.text, hp.port.text),
                    other => panic!("Expected HostPort, got: {:?}", other),
                })
                .collect();
            assert_eq!(hosts, vec!["es1:9200", "es2:9201", "10.0.0.3:9202"]);
            assert_eq!(c.cluster_name.as_ref().map(|t| t.text.as_str()), Some("logging"));
        }
        other => panic!("Expected ConnectStmt, got: {:?}", other),
    }
}

#[test]
fn test_keywords_are_case_insensitive() {
    let tree = parse_ok("CONNECT localhost:9200; Query logs WHERE a=1 Return 5");
    assert_eq!(tree.statements().len(), 2);
}

// === Query clauses ===

#[test]
fn test_bare_query() {
    let tree = parse_ok("query logs");
    let q = only_query(&tree);
    assert_eq!(q.key.text, "logs");
    assert!(q.fields.is_none());
    assert!(q.filter.is_none());
    assert!(q.page.is_none());
    assert!(q.sort.is_none());
}

#[test]
fn test_query_with_every_clause() {
    let tree = parse_ok(
        "query logs-* fields ts, level where level=\"ERROR\" return 10, 5 sort ts desc, host",
    );
    let q = only_query(&tree);
    assert_eq!(q.key.text, "logs-*");

    match kind(&tree, q.fields.unwrap()) {
        NodeKind::FieldList(f) => {
            let names: Vec<&str> = f.fields.iter().map(|t| t.text.as_str()).collect();
            assert_eq!(names, vec!["ts", "level"]);
        }
        other => panic!("Expected FieldList, got: {:?}", other),
    }

    match kind(&tree, q.page.unwrap()) {
        NodeKind::ReturnStmt(r) => {
            assert_eq!(r.size.text, "10");
            assert_eq!(r.lower.as_ref().map(|t| t.text.as_str()), Some("5"));
        }
        other => panic!("Expected ReturnStmt, got: {:?}", other),
    }

    match kind(&tree, q.sort.unwrap()) {
        NodeKind::SortStmt(s) => {
            let items: Vec<(&str, Option<SortMarker>)> = s
                .items
                .iter()
                .map(|item| match kind(&tree, item.order) {
                    NodeKind::SortOrder(o) => (item.key.text.as_str(), o.marker),
                    other => panic!("Expected SortOrder, got: {:?}", other),
                })
                .collect();
            assert_eq!(items, vec![("ts", Some(SortMarker::Desc)), ("host", None)]);
        }
        other => panic!("Expected SortStmt, got: {:?}", other),
    }
}

#[test]
fn test_return_without_offset() {
    let tree = parse_ok("query logs return 20");
    let q = only_query(&tree);
    match kind(&tree, q.page.unwrap()) {
        NodeKind::ReturnStmt(r) => {
            assert_eq!(r.size.text, "20");
            assert!(r.lower.is_none());
        }
        other => panic!("Expected ReturnStmt, got: {:?}", other),
    }
}

// === Filter predicates ===

#[test]
fn test_term_keeps_raw_value_token() {
    let tree = parse_ok("query logs where level=\"ERROR\"");
    let q = only_query(&tree);
    match kind(&tree, predicate_of(&tree, q)) {
        NodeKind::FilterPred(p) => {
            assert!(p.rest.is_none());
            match &p.head {
                PredHead::Term { field, value } => {
                    assert_eq!(field.text, "level");
                    assert_eq!(value.text, "\"ERROR\"");
                }
                other => panic!("Expected Term head, got: {:?}", other),
            }
        }
        other => panic!("Expected FilterPred, got: {:?}", other),
    }
}

#[test]
fn test_rest_siblings_are_flat() {
    let tree = parse_ok("query t where a=1 and b=2 or c=3 and d=4");
    let q = only_query(&tree);
    let NodeKind::FilterPred(top) = kind(&tree, predicate_of(&tree, q)) else {
        panic!("Expected FilterPred");
    };
    let NodeKind::FilterRest(rest) = kind(&tree, top.rest.unwrap()) else {
        panic!("Expected FilterRest");
    };

    let connectives: Vec<Connective> = rest.links.iter().map(|(c, _)| *c).collect();
    assert_eq!(
        connectives,
        vec![Connective::And, Connective::Or, Connective::And]
    );
    assert!(rest.is_mixed());
    for (_, sibling) in &rest.links {
        match kind(&tree, *sibling) {
            NodeKind::FilterPred(p) => assert!(p.rest.is_none()),
            other => panic!("Expected FilterPred, got: {:?}", other),
        }
    }
}

#[test]
fn test_parenthesized_sibling_carries_its_own_rest() {
    let tree = parse_ok("query t where a=1 and (b=2 or c='x')");
    let q = only_query(&tree);
    let NodeKind::FilterPred(top) = kind(&tree, predicate_of(&tree, q)) else {
        panic!("Expected FilterPred");
    };
    let NodeKind::FilterRest(rest) = kind(&tree, top.rest.unwrap()) else {
        panic!("Expected FilterRest");
    };
    let NodeKind::FilterPred(paren) = kind(&tree, rest.links[0].1) else {
        panic!("Expected FilterPred");
    };
    let PredHead::Paren(inner) = paren.head else {
        panic!("Expected Paren head");
    };
    let NodeKind::FilterPred(inner) = kind(&tree, inner) else {
        panic!("Expected FilterPred");
    };
    assert!(inner.rest.is_some());
}

#[test]
fn test_identical_terms_are_distinct_nodes() {
    let tree = parse_ok("query t where a=1 or a=1");
    let q = only_query(&tree);
    let NodeKind::FilterPred(top) = kind(&tree, predicate_of(&tree, q)) else {
        panic!("Expected FilterPred");
    };
    let NodeKind::FilterRest(rest) = kind(&tree, top.rest.unwrap()) else {
        panic!("Expected FilterRest");
    };
    assert_ne!(rest.links[0].1, predicate_of(&tree, q));
}

#[test]
fn test_comments_and_blank_statements() {
    let tree = parse_ok(
        "-- connect first\nconnect localhost:9200;;\n// then query\nquery logs;\n",
    );
    assert_eq!(tree.statements().len(), 2);
}

#[test]
fn test_statement_spans_cover_source() {
    let source = "connect localhost:9200; query logs where a=1";
    let tree = parse_ok(source);
    let spans: Vec<&str> = tree
        .statements()
        .iter()
        .map(|id| {
            let span = tree.get(*id).unwrap().span;
            &source[span.start..span.end]
        })
        .collect();
    assert_eq!(spans, vec!["connect localhost:9200", "query logs where a=1"]);
}

// === Errors ===

#[rstest]
#[case("connect localhost", EQL0007)]
#[case("connect localhost:", EQL0007)]
#[case("query logs where level=\"ERROR", EQL0005)]
#[case("query logs query other", EQL0006)]
#[case("query logs where", EQL0002)]
#[case("select * from logs", EQL0001)]
#[case("query where a=1", EQL0001)]
fn test_error_codes(#[case] input: &str, #[case] expected: eql_diagnostics::ErrorCode) {
    let err = parse(input).expect_err("should not parse");
    assert_eq!(err.code(), expected, "input: {input}, error: {err}");
}

#[test]
fn test_error_location_points_at_offending_token() {
    let err = parse("connect localhost:9200;\nquery logs wher a=1").unwrap_err();
    let loc = err.location().expect("location");
    assert_eq!((loc.line, loc.column), (2, 12));
    assert!(err.to_string().contains("wher"));
}

fn nested_filter(depth: usize) -> String {
    format!(
        "query t where {}a=1{}",
        "(".repeat(depth),
        ")".repeat(depth)
    )
}

#[test]
fn test_nesting_up_to_limit_parses() {
    let tree = parse_ok(&nested_filter(MAX_FILTER_DEPTH));
    assert_eq!(tree.statements().len(), 1);
}

#[rstest]
#[case(MAX_FILTER_DEPTH + 1)]
#[case(50_000)]
fn test_nesting_past_limit_is_an_error(#[case] depth: usize) {
    let err = parse(&nested_filter(depth)).unwrap_err();
    assert_eq!(err.code(), EQL0003);
    let loc = err.location().expect("location");
    // "query t where " is 14 columns; the first rejected '(' follows the
    // accepted ones
    assert_eq!((loc.line, loc.column), (1, 15 + MAX_FILTER_DEPTH));
}

#[test]
fn test_nesting_limit_in_analysis_mode() {
    let source = format!("{}; query ok", nested_filter(MAX_FILTER_DEPTH + 1));
    let result = parse_with_mode(&source, ParseMode::Analysis);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].code(), EQL0003);
    assert_eq!(result.tree.statements().len(), 1);
}

#[test]
fn test_analysis_mode_collects_every_bad_statement() {
    let result = parse_with_mode(
        "connect localhost; query logs; query other where a=; query ok",
        ParseMode::Analysis,
    );
    assert_eq!(result.errors.len(), 2);
    assert_eq!(result.tree.statements().len(), 2);
}

#[test]
fn test_fast_mode_stops_at_first_error() {
    let result = parse_with_mode("connect localhost; query logs where a=", ParseMode::Fast);
    assert!(!result.is_ok());
    assert_eq!(result.errors.len(), 1);
    assert!(result.tree.statements().is_empty());
}

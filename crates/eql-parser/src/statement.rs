//! Statement parser: builds the arena parse tree for a whole script

use crate::combinators::{
    digits, host, lit, name, try_keyword, try_lit, value_literal, ws, Input, PResult, HOST_PORT,
    NESTING, STRING_LITERAL, TERMINATOR,
};
use crate::{ParseMode, ParseResult};
use eql_ast::{
    ConnectStmt, Connective, FieldListNode, FilterPred, FilterRest, FilterStmt, HostPortNode,
    NodeId, NodeKind, ParseTree, PredHead, QueryStmt, ReturnStmt, SortItem, SortMarker,
    SortOrderNode, SortStmt,
};
use eql_diagnostics::{
    EqlError, Result, SourceLocation, Span, EQL0001, EQL0002, EQL0003, EQL0005, EQL0006,
    EQL0007,
};
use log::debug;
use winnow::combinator::{cut_err, fail};
use winnow::error::{ContextError, ErrMode, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::stream::Stream;

/// Deepest parenthesized filter accepted
pub const MAX_FILTER_DEPTH: usize = 128;

/// Parse an EQL script into a parse tree, failing on the first error
pub fn parse(source: &str) -> Result<ParseTree> {
    let mut tree = ParseTree::new();
    let mut input = Input::new(source);

    match script(&mut input, &mut tree) {
        Ok(()) => {
            debug!(
                "parsed {} statement(s), {} node(s)",
                tree.statements().len(),
                tree.len()
            );
            Ok(tree)
        }
        Err(e) => Err(to_eql_error(&e, source, &input)),
    }
}

/// Parse an EQL script with the specified mode
///
/// In Fast mode the first error stops parsing. In Analysis mode a failed
/// statement is skipped up to the next `;` and parsing resumes, so every
/// statement-level error in the script is reported.
pub fn parse_with_mode(source: &str, mode: ParseMode) -> ParseResult {
    match mode {
        ParseMode::Fast => match parse(source) {
            Ok(tree) => ParseResult::success(tree),
            Err(e) => ParseResult::error(vec![e]),
        },
        ParseMode::Analysis => {
            let mut tree = ParseTree::new();
            let mut input = Input::new(source);
            let mut errors = Vec::new();

            loop {
                match script(&mut input, &mut tree) {
                    Ok(()) => break,
                    Err(e) => {
                        errors.push(to_eql_error(&e, source, &input));
                        if !skip_past_terminator(&mut input) {
                            break;
                        }
                    }
                }
            }

            ParseResult { tree, errors }
        }
    }
}

/// Advance past the next `;`; false when the input ran out first
fn skip_past_terminator(input: &mut Input<'_>) -> bool {
    while let Some(c) = input.next_token() {
        if c == ';' {
            return true;
        }
    }
    false
}

/// script := (statement ';')* statement? EOF
fn script(input: &mut Input<'_>, tree: &mut ParseTree) -> PResult<()> {
    loop {
        ws.parse_next(input)?;
        if input.is_empty() {
            return Ok(());
        }
        if try_lit(input, ";")?.is_some() {
            continue;
        }

        let stmt = statement(input, tree)?;
        tree.push_statement(stmt);

        ws.parse_next(input)?;
        if input.is_empty() {
            return Ok(());
        }
        lit(";")
            .context(StrContext::Label(TERMINATOR))
            .parse_next(input)?;
    }
}

fn statement(input: &mut Input<'_>, tree: &mut ParseTree) -> PResult<NodeId> {
    if let Some(kw) = try_keyword(input, "connect")? {
        return connect_statement(input, tree, kw);
    }
    if let Some(kw) = try_keyword(input, "query")? {
        return query_statement(input, tree, kw);
    }

    fail::<_, NodeId, _>
        .context(StrContext::Expected(StrContextValue::StringLiteral("connect")))
        .context(StrContext::Expected(StrContextValue::StringLiteral("query")))
        .parse_next(input)
}

fn span_of(tree: &ParseTree, id: NodeId) -> Span {
    tree.get(id).map(|node| node.span).unwrap_or_default()
}

/// connect := 'connect' hostport (',' hostport)* ('cluster' NAME)?
fn connect_statement(input: &mut Input<'_>, tree: &mut ParseTree, kw: Span) -> PResult<NodeId> {
    let mut hosts = vec![host_port(input, tree)?];
    while try_lit(input, ",")?.is_some() {
        hosts.push(host_port(input, tree)?);
    }

    let cluster_name = match try_keyword(input, "cluster")? {
        Some(_) => Some(name(input)?),
        None => None,
    };

    let end = match (&cluster_name, hosts.last()) {
        (Some(tok), _) => tok.span,
        (None, Some(last)) => span_of(tree, *last),
        (None, None) => kw,
    };

    Ok(tree.push(
        NodeKind::ConnectStmt(ConnectStmt {
            hosts,
            cluster_name,
        }),
        kw.merge(end),
    ))
}

/// hostport := HOST ':' DIGITS
fn host_port(input: &mut Input<'_>, tree: &mut ParseTree) -> PResult<NodeId> {
    let host_tok = host(input)?;
    lit(":")
        .context(StrContext::Label(HOST_PORT))
        .parse_next(input)?;
    let port_tok = digits
        .context(StrContext::Label(HOST_PORT))
        .parse_next(input)?;

    let span = host_tok.span.merge(port_tok.span);
    Ok(tree.push(
        NodeKind::HostPort(HostPortNode {
            host: host_tok,
            port: port_tok,
        }),
        span,
    ))
}

/// query := 'query' KEY fields? where? return? sort?
fn query_statement(input: &mut Input<'_>, tree: &mut ParseTree, kw: Span) -> PResult<NodeId> {
    let key = name(input)?;
    let mut span = kw.merge(key.span);

    let fields = match try_keyword(input, "fields")? {
        Some(kw) => Some(field_list(input, tree, kw)?),
        None => None,
    };
    let filter = match try_keyword(input, "where")? {
        Some(kw) => Some(filter_statement(input, tree, kw)?),
        None => None,
    };
    let page = match try_keyword(input, "return")? {
        Some(kw) => Some(return_statement(input, tree, kw)?),
        None => None,
    };
    let sort = match try_keyword(input, "sort")? {
        Some(kw) => Some(sort_statement(input, tree, kw)?),
        None => None,
    };

    for clause in [fields, filter, page, sort].into_iter().flatten() {
        span = span.merge(span_of(tree, clause));
    }

    Ok(tree.push(
        NodeKind::QueryStmt(QueryStmt {
            key,
            fields,
            filter,
            page,
            sort,
        }),
        span,
    ))
}

/// fields := 'fields' NAME (',' NAME)*
fn field_list(input: &mut Input<'_>, tree: &mut ParseTree, kw: Span) -> PResult<NodeId> {
    let mut fields = vec![name(input)?];
    while try_lit(input, ",")?.is_some() {
        fields.push(name(input)?);
    }

    let span = fields.iter().fold(kw, |span, tok| span.merge(tok.span));
    Ok(tree.push(NodeKind::FieldList(FieldListNode { fields }), span))
}

/// where := 'where' filter
fn filter_statement(input: &mut Input<'_>, tree: &mut ParseTree, kw: Span) -> PResult<NodeId> {
    let predicate = filter_predicate(input, tree, 0)?;
    let span = kw.merge(span_of(tree, predicate));
    Ok(tree.push(NodeKind::FilterStmt(FilterStmt { predicate }), span))
}

/// filter := primary rest?
///
/// `depth` counts the parentheses enclosing this predicate.
fn filter_predicate(input: &mut Input<'_>, tree: &mut ParseTree, depth: usize) -> PResult<NodeId> {
    let (head, mut span) = predicate_head(input, tree, depth)?;
    let rest = filter_rest(input, tree, depth)?;
    if let Some(rest) = rest {
        span = span.merge(span_of(tree, rest));
    }
    Ok(tree.push(NodeKind::FilterPred(FilterPred { head, rest }), span))
}

/// A sibling predicate inside a rest clause: a head with no rest of its own
fn primary(input: &mut Input<'_>, tree: &mut ParseTree, depth: usize) -> PResult<NodeId> {
    let (head, span) = predicate_head(input, tree, depth)?;
    Ok(tree.push(NodeKind::FilterPred(FilterPred { head, rest: None }), span))
}

/// primary := '(' filter ')' | NAME '=' (INT | STRING)
fn predicate_head(
    input: &mut Input<'_>,
    tree: &mut ParseTree,
    depth: usize,
) -> PResult<(PredHead, Span)> {
    let before = input.checkpoint();
    if let Some(open) = try_lit(input, "(")? {
        if depth >= MAX_FILTER_DEPTH {
            input.reset(&before);
            ws.parse_next(input)?;
            return cut_err(fail::<_, (PredHead, Span), _>.context(StrContext::Label(NESTING)))
                .parse_next(input);
        }
        let inner = filter_predicate(input, tree, depth + 1)?;
        let close = lit(")").parse_next(input)?;
        return Ok((PredHead::Paren(inner), open.merge(close)));
    }

    let field = name(input)?;
    lit("=").parse_next(input)?;
    let value = value_literal(input)?;
    let span = field.span.merge(value.span);
    Ok((PredHead::Term { field, value }, span))
}

/// rest := (('and' | 'or') primary)+
fn filter_rest(
    input: &mut Input<'_>,
    tree: &mut ParseTree,
    depth: usize,
) -> PResult<Option<NodeId>> {
    let mut links = Vec::new();
    let mut span: Option<Span> = None;

    loop {
        let (connective, kw) = if let Some(kw) = try_keyword(input, "and")? {
            (Connective::And, kw)
        } else if let Some(kw) = try_keyword(input, "or")? {
            (Connective::Or, kw)
        } else {
            break;
        };

        let sibling = primary(input, tree, depth)?;
        let covered = kw.merge(span_of(tree, sibling));
        span = Some(span.map_or(covered, |s| s.merge(covered)));
        links.push((connective, sibling));
    }

    Ok(span.map(|span| tree.push(NodeKind::FilterRest(FilterRest { links }), span)))
}

/// return := 'return' DIGITS (',' DIGITS)?
fn return_statement(input: &mut Input<'_>, tree: &mut ParseTree, kw: Span) -> PResult<NodeId> {
    let size = digits(input)?;
    let lower = match try_lit(input, ",")? {
        Some(_) => Some(digits(input)?),
        None => None,
    };

    let end = lower.as_ref().map_or(size.span, |tok| tok.span);
    Ok(tree.push(
        NodeKind::ReturnStmt(ReturnStmt { size, lower }),
        kw.merge(end),
    ))
}

/// sort := 'sort' NAME order? (',' NAME order?)*
fn sort_statement(input: &mut Input<'_>, tree: &mut ParseTree, kw: Span) -> PResult<NodeId> {
    let mut items = vec![sort_item(input, tree)?];
    while try_lit(input, ",")?.is_some() {
        items.push(sort_item(input, tree)?);
    }

    let span = items
        .iter()
        .fold(kw, |span, item| span.merge(span_of(tree, item.order)));
    Ok(tree.push(NodeKind::SortStmt(SortStmt { items }), span))
}

fn sort_item(input: &mut Input<'_>, tree: &mut ParseTree) -> PResult<SortItem> {
    let key = name(input)?;

    let (marker, span) = if let Some(kw) = try_keyword(input, "asc")? {
        (Some(SortMarker::Asc), kw)
    } else if let Some(kw) = try_keyword(input, "desc")? {
        (Some(SortMarker::Desc), kw)
    } else {
        (None, Span::point(key.span.end))
    };

    let order = tree.push(NodeKind::SortOrder(SortOrderNode { marker }), span);
    Ok(SortItem { key, order })
}

/// Turn a winnow failure into a located EQL parse error
fn to_eql_error(err: &ErrMode<ContextError>, source: &str, input: &Input<'_>) -> EqlError {
    let offset = source.len().saturating_sub(input.eof_offset());
    let rest = source.get(offset..).unwrap_or_default();
    let at_end = rest.trim().is_empty();

    let ctx = match err {
        ErrMode::Backtrack(e) | ErrMode::Cut(e) => Some(e),
        ErrMode::Incomplete(_) => None,
    };
    let has_label = |label: &str| {
        ctx.is_some_and(|e| {
            e.context()
                .any(|c| matches!(c, StrContext::Label(l) if *l == label))
        })
    };

    if has_label(NESTING) {
        return EqlError::parse_at(
            EQL0003,
            format!("filter nested deeper than {MAX_FILTER_DEPTH} parentheses"),
            SourceLocation::from_span(Span::new(offset, offset + 1), source),
        );
    }

    let code = if has_label(STRING_LITERAL) {
        EQL0005
    } else if has_label(HOST_PORT) {
        EQL0007
    } else if has_label(TERMINATOR) {
        EQL0006
    } else if at_end {
        EQL0002
    } else {
        EQL0001
    };

    let mut expected: Vec<String> = Vec::new();
    for c in ctx.into_iter().flat_map(|e| e.context()) {
        if let StrContext::Expected(value) = c {
            let text = value.to_string();
            if !expected.contains(&text) {
                expected.push(text);
            }
        }
    }

    let found: String = rest
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .chars()
        .take(24)
        .collect();
    let mut message = if at_end {
        "unexpected end of input".to_string()
    } else {
        format!("unexpected '{}'", found)
    };
    if !expected.is_empty() {
        message.push_str(&format!(", expected {}", expected.join(" or ")));
    }

    let span = Span::new(offset, offset + found.len().max(1).min(rest.len().max(1)));
    EqlError::parse_at(code, message, SourceLocation::from_span(span, source))
}

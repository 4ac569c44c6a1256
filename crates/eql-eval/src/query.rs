//! Query statements: projection, paging, sorting and execution

use crate::{
    Attributes, EvalError, EvalResult, EvaluationContext, PageSpec, QueryRequest, SortDirection,
    SortEntry, SortSpec,
};
use eql_ast::{FieldListNode, ReturnStmt, SortMarker, SortOrderNode, SortStmt, Token};
use eql_cluster::SearchResponse;

pub fn field_list(node: &FieldListNode) -> Vec<String> {
    node.fields.iter().map(|field| field.text.clone()).collect()
}

fn count(token: &Token) -> EvalResult<u32> {
    token
        .as_str()
        .parse::<u32>()
        .map_err(|_| EvalError::malformed_literal(&token.text, "non-negative 32-bit integer"))
}

/// `return limit[, offset]`
pub fn page(node: &ReturnStmt) -> EvalResult<PageSpec> {
    Ok(PageSpec {
        limit: Some(count(&node.size)?),
        offset: node.lower.as_ref().map(count).transpose()?,
    })
}

pub fn sort_order(node: &SortOrderNode) -> SortDirection {
    match node.marker {
        Some(SortMarker::Asc) => SortDirection::Ascending,
        Some(SortMarker::Desc) => SortDirection::Descending,
        None => SortDirection::Unspecified,
    }
}

pub fn sort(node: &SortStmt, attrs: &Attributes) -> EvalResult<SortSpec> {
    let entries = node
        .items
        .iter()
        .map(|item| {
            attrs
                .direction(item.order)
                .map(|direction| SortEntry::new(item.key.text.clone(), direction))
        })
        .collect::<EvalResult<Vec<_>>>()?;
    Ok(SortSpec { entries })
}

/// Execute a query against the active connection
///
/// Fails with [`EvalError::NotConnected`] before any network traffic when no
/// connect statement has run. Exactly one request is sent.
pub fn evaluate_query(ctx: &EvaluationContext, request: &QueryRequest) -> EvalResult<SearchResponse> {
    let connection = ctx.connection().ok_or(EvalError::NotConnected)?;
    let search = request.apply(connection.prepare_search(request.target.clone()));
    log::debug!("Search body for '{}': {}", search.target(), search.to_body());
    let response = connection.execute(&search)?;
    log::info!(
        "Query on '{}' returned {} hit(s) of {} in {}ms",
        request.target,
        response.hits.hits.len(),
        response.total(),
        response.took
    );
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use eql_diagnostics::Span;
    use pretty_assertions::assert_eq;

    fn tok(text: &str) -> Token {
        Token::new(text, Span::default())
    }

    #[test]
    fn test_page_limit_and_offset() {
        let node = ReturnStmt {
            size: tok("10"),
            lower: Some(tok("5")),
        };
        assert_eq!(
            page(&node).unwrap(),
            PageSpec {
                limit: Some(10),
                offset: Some(5)
            }
        );
    }

    #[test]
    fn test_page_limit_only() {
        let node = ReturnStmt {
            size: tok("10"),
            lower: None,
        };
        assert_eq!(page(&node).unwrap().offset, None);
    }

    #[test]
    fn test_page_overflow() {
        let node = ReturnStmt {
            size: tok("4294967296"),
            lower: None,
        };
        assert!(matches!(
            page(&node),
            Err(EvalError::MalformedLiteral { .. })
        ));
    }

    #[test]
    fn test_query_without_connection() {
        let ctx = EvaluationContext::default();
        let err = evaluate_query(&ctx, &QueryRequest::new("logs")).unwrap_err();
        assert!(matches!(err, EvalError::NotConnected));
    }
}

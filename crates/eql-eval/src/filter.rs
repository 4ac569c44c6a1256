//! Filter tree compilation
//!
//! A predicate is a head (a term or a parenthesized predicate) plus an
//! optional rest clause of sibling predicates. The rest clause compiles
//! first: its AND-joined siblings become an `And` node, or its OR-joined
//! siblings an `Or` node, in declaration order. The head is then appended
//! as the last child. So `a=1 and b=2 and c=3` compiles to
//! `and(b = 2, c = 3, a = 1)`.
//!
//! When one level mixes `and` and `or`, the outcome depends on
//! [`ConnectivePolicy`].

use crate::{Attributes, EvalError, EvalResult};
use eql_ast::{FilterPred, FilterRest, NodeId, PredHead, Token};
use eql_cluster::{FilterNode, TermValue};

/// How a rest clause that mixes `and` and `or` is compiled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectivePolicy {
    /// Keep the AND siblings and drop the OR siblings
    #[default]
    AndWins,
    /// Reject the clause with [`EvalError::AmbiguousConnectives`]
    RequireParentheses,
}

/// Convert a raw value token: digits become an integer, a quoted token a
/// string without its quotes
pub fn parse_literal(token: &Token) -> EvalResult<TermValue> {
    let raw = token.as_str();
    if let Some(text) = unquote(raw) {
        return Ok(TermValue::String(text.to_string()));
    }
    raw.parse::<i64>()
        .map(TermValue::Integer)
        .map_err(|_| EvalError::malformed_literal(raw, "integer or quoted string"))
}

fn unquote(raw: &str) -> Option<&str> {
    ['"', '\'']
        .into_iter()
        .find_map(|q| raw.strip_prefix(q).and_then(|s| s.strip_suffix(q)))
}

/// Predicate rule: compile the head, then attach it to the compiled rest
pub fn predicate(pred: &FilterPred, attrs: &Attributes) -> EvalResult<FilterNode> {
    let head = match &pred.head {
        PredHead::Term { field, value } => FilterNode::term(field.text.clone(), parse_literal(value)?),
        PredHead::Paren(inner) => attrs.filter(*inner)?.clone(),
    };

    let Some(rest) = pred.rest else {
        return Ok(head);
    };
    Ok(match attrs.filter(rest)?.clone() {
        FilterNode::And(mut children) => {
            children.push(head);
            FilterNode::And(children)
        }
        FilterNode::Or(mut children) => {
            children.push(head);
            FilterNode::Or(children)
        }
        // A rest clause always compiles to a composite
        FilterNode::Term { .. } => {
            return Err(EvalError::missing_attribute(rest, "filter_rest"));
        }
    })
}

/// Rest rule: gather the siblings into one composite
///
/// Every sibling has already been compiled, OR siblings included, so a bad
/// literal anywhere in the clause is reported even when its branch is
/// dropped. A clause with no siblings at all has nothing to compile and
/// fails with [`EvalError::MissingAttribute`] for node `id`.
pub fn rest(
    id: NodeId,
    rest: &FilterRest,
    attrs: &Attributes,
    policy: ConnectivePolicy,
) -> EvalResult<FilterNode> {
    let ands = rest
        .ands()
        .map(|id| attrs.filter(id).cloned())
        .collect::<EvalResult<Vec<_>>>()?;
    let ors = rest
        .ors()
        .map(|id| attrs.filter(id).cloned())
        .collect::<EvalResult<Vec<_>>>()?;

    if ands.is_empty() && ors.is_empty() {
        return Err(EvalError::missing_attribute(id, "filter_rest"));
    }
    if ands.is_empty() {
        return Ok(FilterNode::or(ors));
    }
    if !ors.is_empty() {
        match policy {
            ConnectivePolicy::RequireParentheses => return Err(EvalError::AmbiguousConnectives),
            ConnectivePolicy::AndWins => log::warn!(
                "'and' and 'or' mixed in one clause; keeping the 'and' terms and dropping {} 'or' term(s)",
                ors.len()
            ),
        }
    }
    Ok(FilterNode::and(ands))
}

#[cfg(test)]
mod tests {
    use super::*;
    use eql_ast::{NodeKind, ParseTree};
    use eql_diagnostics::Span;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn tok(text: &str) -> Token {
        Token::new(text, Span::default())
    }

    #[rstest]
    #[case("42", TermValue::Integer(42))]
    #[case("-7", TermValue::Integer(-7))]
    #[case("\"ERROR\"", TermValue::String("ERROR".into()))]
    #[case("'api'", TermValue::String("api".into()))]
    #[case("\"\"", TermValue::String(String::new()))]
    #[case("'it\"s'", TermValue::String("it\"s".into()))]
    fn test_parse_literal(#[case] raw: &str, #[case] expected: TermValue) {
        assert_eq!(parse_literal(&tok(raw)).unwrap(), expected);
    }

    #[test]
    fn test_integer_overflow_is_malformed() {
        let err = parse_literal(&tok("99999999999999999999")).unwrap_err();
        assert!(matches!(err, EvalError::MalformedLiteral { .. }), "{err:?}");
    }

    #[test]
    fn test_term_predicate_without_rest() {
        let pred = FilterPred {
            head: PredHead::Term {
                field: tok("level"),
                value: tok("\"ERROR\""),
            },
            rest: None,
        };
        assert_eq!(
            predicate(&pred, &Attributes::new()).unwrap(),
            FilterNode::term("level", "ERROR")
        );
    }

    #[rstest]
    #[case(ConnectivePolicy::AndWins)]
    #[case(ConnectivePolicy::RequireParentheses)]
    fn test_rest_without_siblings_is_missing(#[case] policy: ConnectivePolicy) {
        let empty = FilterRest { links: Vec::new() };
        let mut tree = ParseTree::new();
        let id = tree.push(NodeKind::FilterRest(empty.clone()), Span::default());

        let err = rest(id, &empty, &Attributes::new(), policy).unwrap_err();
        assert!(
            matches!(err, EvalError::MissingAttribute { node, rule: "filter_rest" } if node == id),
            "{err:?}"
        );
    }
}

//! Token-level parsers shared by the statement grammar

use eql_ast::Token;
use eql_diagnostics::Span;
use std::ops::Range;
use winnow::ascii::{multispace1, Caseless};
use winnow::combinator::{alt, cut_err, not, opt, repeat, terminated};
use winnow::error::{ContextError, ErrMode, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::stream::LocatingSlice;
use winnow::token::{one_of, take_till, take_while};
use winnow::ModalResult;

/// Parser input: the script text with byte-offset tracking
pub type Input<'a> = LocatingSlice<&'a str>;

/// Parser result
pub type PResult<T> = ModalResult<T>;

/// Labels attached to parse errors, used to pick an error code
pub(crate) const HOST_PORT: &str = "host:port";
pub(crate) const STRING_LITERAL: &str = "string literal";
pub(crate) const TERMINATOR: &str = "statement terminator";
pub(crate) const NESTING: &str = "nesting depth";

/// Skip whitespace and `--` / `//` line comments
pub fn ws(input: &mut Input<'_>) -> PResult<()> {
    repeat(
        0..,
        alt((
            multispace1.void(),
            (alt(("--", "//")), take_till(0.., '\n')).void(),
        )),
    )
    .parse_next(input)
}

/// Characters allowed after the first one in a name
fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-' | '*' | '@')
}

fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || matches!(c, '_' | '@')
}

fn is_host_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-')
}

fn to_token((text, range): (&str, Range<usize>)) -> Token {
    Token::new(text, range.into())
}

/// Match a case-insensitive keyword that is not a prefix of a longer name
pub fn keyword<'a>(kw: &'static str) -> impl Parser<Input<'a>, (), ErrMode<ContextError>> {
    move |input: &mut Input<'a>| {
        terminated(Caseless(kw), not(one_of(is_name_char)))
            .void()
            .context(StrContext::Expected(StrContextValue::StringLiteral(kw)))
            .parse_next(input)
    }
}

/// Keyword preceded by optional whitespace
pub fn padded_keyword<'a>(kw: &'static str) -> impl Parser<Input<'a>, (), ErrMode<ContextError>> {
    move |input: &mut Input<'a>| {
        ws.parse_next(input)?;
        keyword(kw).parse_next(input)
    }
}

/// Consume `kw` if it is next and return its span; never consumes input
/// when it is not
pub fn try_keyword(input: &mut Input<'_>, kw: &'static str) -> PResult<Option<Span>> {
    ws.parse_next(input)?;
    opt(keyword(kw).span().map(Span::from)).parse_next(input)
}

/// Punctuation preceded by optional whitespace
pub fn lit<'a>(symbol: &'static str) -> impl Parser<Input<'a>, Span, ErrMode<ContextError>> {
    move |input: &mut Input<'a>| {
        ws.parse_next(input)?;
        symbol
            .span()
            .map(Span::from)
            .context(StrContext::Expected(StrContextValue::StringLiteral(symbol)))
            .parse_next(input)
    }
}

/// Consume `symbol` if it is next and return its span
pub fn try_lit(input: &mut Input<'_>, symbol: &'static str) -> PResult<Option<Span>> {
    ws.parse_next(input)?;
    opt(symbol.span().map(Span::from)).parse_next(input)
}

/// A field, collection or cluster name; keywords are rejected
pub fn name(input: &mut Input<'_>) -> PResult<Token> {
    ws.parse_next(input)?;
    (one_of(is_name_start), take_while(0.., is_name_char))
        .take()
        .verify(|text: &str| !is_keyword(text))
        .with_span()
        .map(to_token)
        .context(StrContext::Expected(StrContextValue::Description("name")))
        .parse_next(input)
}

/// A host name or address
pub fn host(input: &mut Input<'_>) -> PResult<Token> {
    ws.parse_next(input)?;
    take_while(1.., is_host_char)
        .with_span()
        .map(to_token)
        .context(StrContext::Label(HOST_PORT))
        .parse_next(input)
}

/// An unsigned run of decimal digits
pub fn digits(input: &mut Input<'_>) -> PResult<Token> {
    ws.parse_next(input)?;
    take_while(1.., |c: char| c.is_ascii_digit())
        .with_span()
        .map(to_token)
        .context(StrContext::Expected(StrContextValue::Description("number")))
        .parse_next(input)
}

/// An optionally negative integer literal
fn integer_literal(input: &mut Input<'_>) -> PResult<Token> {
    (opt('-'), take_while(1.., |c: char| c.is_ascii_digit()))
        .take()
        .with_span()
        .map(to_token)
        .parse_next(input)
}

/// A single- or double-quoted string literal; the token keeps its quotes
fn string_literal(input: &mut Input<'_>) -> PResult<Token> {
    alt((
        ('"', cut_err((take_till(0.., '"'), '"'))).take(),
        ('\'', cut_err((take_till(0.., '\''), '\''))).take(),
    ))
    .with_span()
    .map(to_token)
    .context(StrContext::Label(STRING_LITERAL))
    .parse_next(input)
}

/// Right-hand side of a term: integer or string, kept as raw text
pub fn value_literal(input: &mut Input<'_>) -> PResult<Token> {
    ws.parse_next(input)?;
    alt((integer_literal, string_literal))
        .context(StrContext::Expected(StrContextValue::Description(
            "integer or quoted string",
        )))
        .parse_next(input)
}

/// Check if a word is an EQL keyword
pub fn is_keyword(s: &str) -> bool {
    matches!(
        s.to_ascii_lowercase().as_str(),
        "connect"
            | "cluster"
            | "query"
            | "fields"
            | "where"
            | "and"
            | "or"
            | "return"
            | "sort"
            | "asc"
            | "desc"
    )
}

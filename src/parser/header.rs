//! Parsing of the `foreach` and `if` statement headers

use std::cmp::Ordering;
use std::fmt;

use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;

// This include forces recompiling this source file if the grammar file changes.
// Uncomment it when doing changes to the .pest file
const _GRAMMAR: &str = include_str!("header.pest");

#[derive(Parser)]
#[grammar = "parser/header.pest"]
struct HeaderParser;

/// `{% foreach name in source %}`
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Foreach<'a> {
    /// Name the current element is bound to
    pub name: &'a str,
    /// Path of the sequence to iterate
    pub source: &'a str,
}

/// The comparison operators an `if` accepts
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Operator {
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `<=`
    Lte,
    /// `>=`
    Gte,
    /// `==`
    Eq,
}

impl Operator {
    /// Whether `left OP right` holds given how `left` orders against `right`
    pub fn holds(self, ordering: Ordering) -> bool {
        match self {
            Operator::Lt => ordering == Ordering::Less,
            Operator::Gt => ordering == Ordering::Greater,
            Operator::Lte => ordering != Ordering::Greater,
            Operator::Gte => ordering != Ordering::Less,
            Operator::Eq => ordering == Ordering::Equal,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match *self {
                Operator::Lt => "<",
                Operator::Gt => ">",
                Operator::Lte => "<=",
                Operator::Gte => ">=",
                Operator::Eq => "==",
            }
        )
    }
}

/// `{% if path op literal %}`
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Condition<'a> {
    /// Path of the left operand
    pub path: &'a str,
    pub op: Operator,
    /// Right operand, quotes removed
    pub literal: &'a str,
}

fn describe(rule: &Rule) -> String {
    match *rule {
        Rule::EOI => "end of the statement".to_string(),
        Rule::ident => "a name".to_string(),
        Rule::path => "a path (names separated by `.`)".to_string(),
        Rule::kw_in => "`in`".to_string(),
        Rule::op_lte => "`<=`".to_string(),
        Rule::op_gte => "`>=`".to_string(),
        Rule::op_eq => "`==`".to_string(),
        Rule::op_lt => "`<`".to_string(),
        Rule::op_gt => "`>`".to_string(),
        Rule::literal | Rule::double_quoted | Rule::single_quoted | Rule::bare => {
            "a literal value".to_string()
        }
        Rule::foreach_header => "`NAME in PATH`".to_string(),
        Rule::if_header => "`PATH OPERATOR VALUE`".to_string(),
        ref other => format!("{:?}", other),
    }
}

fn parse_header(rule: Rule, input: &str) -> Result<Pair<'_, Rule>, String> {
    match HeaderParser::parse(rule, input) {
        // We must have the header pair if we got there
        Ok(mut pairs) => pairs.next().ok_or_else(|| "empty header".to_string()),
        Err(e) => Err(e.renamed_rules(describe).to_string()),
    }
}

/// Reads the header of a `foreach`, `input` being everything after the keyword
pub(crate) fn parse_foreach(input: &str) -> Result<Foreach<'_>, String> {
    let mut name = None;
    let mut source = None;

    for p in parse_header(Rule::foreach_header, input)?.into_inner() {
        match p.as_rule() {
            Rule::ident => name = Some(p.as_str()),
            Rule::path => source = Some(p.as_str()),
            Rule::kw_in | Rule::EOI => (),
            _ => unreachable!("unexpected {:?} rule in parse_foreach", p.as_rule()),
        }
    }

    match (name, source) {
        (Some(name), Some(source)) => Ok(Foreach { name, source }),
        _ => Err(format!("incomplete foreach header `{}`", input.trim())),
    }
}

/// Reads the header of an `if`, `input` being everything after the keyword
pub(crate) fn parse_condition(input: &str) -> Result<Condition<'_>, String> {
    let mut path = None;
    let mut op = None;
    let mut literal = None;

    for p in parse_header(Rule::if_header, input)?.into_inner() {
        match p.as_rule() {
            Rule::path => path = Some(p.as_str()),
            Rule::op_lt => op = Some(Operator::Lt),
            Rule::op_gt => op = Some(Operator::Gt),
            Rule::op_lte => op = Some(Operator::Lte),
            Rule::op_gte => op = Some(Operator::Gte),
            Rule::op_eq => op = Some(Operator::Eq),
            Rule::literal => literal = Some(parse_literal(p)),
            Rule::EOI => (),
            _ => unreachable!("unexpected {:?} rule in parse_condition", p.as_rule()),
        }
    }

    match (path, op, literal) {
        (Some(path), Some(op), Some(literal)) => Ok(Condition { path, op, literal }),
        _ => Err(format!("incomplete if header `{}`", input.trim())),
    }
}

/// Quoted literals lose their quotes
fn parse_literal(pair: Pair<'_, Rule>) -> &'_ str {
    let text = pair.as_str();
    match pair.into_inner().next().map(|p| p.as_rule()) {
        Some(Rule::double_quoted) | Some(Rule::single_quoted) => &text[1..text.len() - 1],
        _ => text,
    }
}

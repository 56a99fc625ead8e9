//! Element identity
//!
//! Named elements are matched by name. Statements and list arguments have
//! no identifier, so they are matched by a structural fingerprint instead;
//! [`Matcher`] makes that fingerprint an explicit value.

use std::fmt;

use crate::syntax::query::{chain_ends_with, find_call, selector_before};
use crate::syntax::{inline_text, Delim, Line, ListItem, TokenKind, TokenTree};

/// How an existing element is recognized as the one a template wants
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Matcher {
    /// Field, method, parameter, composite-literal key or import path
    ByName(String),
    /// Statement whose top-level call selector ends with this dotted name
    ByCalleeName(String),
    /// `if` statement whose condition mentions this field
    ByConditionField(String),
    /// List argument with this normalized text or string value
    ByArgumentLiteral(String),
}

impl Matcher {
    pub fn name(name: impl Into<String>) -> Self {
        Matcher::ByName(name.into())
    }

    pub fn callee(callee: impl Into<String>) -> Self {
        Matcher::ByCalleeName(callee.into())
    }

    pub fn condition_field(field: impl Into<String>) -> Self {
        Matcher::ByConditionField(field.into())
    }

    pub fn literal(value: impl Into<String>) -> Self {
        Matcher::ByArgumentLiteral(value.into())
    }

    /// The key value, used in reports
    pub fn value(&self) -> &str {
        match self {
            Matcher::ByName(v)
            | Matcher::ByCalleeName(v)
            | Matcher::ByConditionField(v)
            | Matcher::ByArgumentLiteral(v) => v,
        }
    }

    /// Does an element carrying one of `names` match?
    pub fn matches_names<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> bool {
        match self {
            Matcher::ByName(wanted) | Matcher::ByArgumentLiteral(wanted) => {
                names.into_iter().any(|n| n == wanted)
            }
            _ => false,
        }
    }

    /// Does a call argument or composite-literal entry match?
    pub fn matches_item(&self, item: &ListItem) -> bool {
        let code = item.code();
        match self {
            Matcher::ByName(name) => item.key() == Some(name.as_str()),
            Matcher::ByArgumentLiteral(value) => !code.is_empty() && literal_key(code) == *value,
            Matcher::ByCalleeName(callee) => {
                !code.is_empty() && find_call(code, callee) == Some(vec![code.len() - 1])
            }
            Matcher::ByConditionField(_) => false,
        }
    }

    /// Does a body statement match?
    pub fn matches_line(&self, line: &Line) -> bool {
        if line.is_comment() {
            return false;
        }
        let tokens = &line.tokens;
        match self {
            Matcher::ByName(name) => assigned_names(tokens).any(|n| n == name),
            Matcher::ByCalleeName(callee) => tokens.iter().enumerate().any(|(i, t)| {
                t.as_group().is_some_and(|g| g.delim == Delim::Paren)
                    && chain_ends_with(&selector_before(tokens, i), callee)
            }),
            Matcher::ByConditionField(field) => {
                tokens.first().is_some_and(|t| t.is_keyword("if"))
                    && mentions_ident(condition(tokens), field)
            }
            Matcher::ByArgumentLiteral(value) => contains_string(tokens, value),
        }
    }
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Matcher::ByName(v) => write!(f, "{}", v),
            Matcher::ByCalleeName(v) => write!(f, "call {}", v),
            Matcher::ByConditionField(v) => write!(f, "guard on {}", v),
            Matcher::ByArgumentLiteral(v) => write!(f, "{}", v),
        }
    }
}

/// Where a statement that is not present yet goes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Placement {
    /// After every existing statement
    #[default]
    End,
    /// Right before the body's final `return`, or at the end when there is none
    BeforeReturn,
}

/// Identity text of a list argument: the value of a lone string literal,
/// otherwise the canonical single-line text.
pub fn literal_key(code: &[TokenTree]) -> String {
    if let [TokenTree::Token(tok)] = code {
        if let Some(value) = tok.unquoted() {
            return value.to_string();
        }
    }
    inline_text(code)
}

/// Identifiers on the left of a top-level `=` or `:=`, or after `var`.
fn assigned_names(tokens: &[TokenTree]) -> impl Iterator<Item = &str> {
    let lhs: &[TokenTree] = if tokens.first().is_some_and(|t| t.is_keyword("var")) {
        &tokens[1..tokens.len().min(2)]
    } else {
        match tokens.iter().position(|t| t.is_op("=") || t.is_op(":=")) {
            Some(end) => &tokens[..end],
            None => &[],
        }
    };
    lhs.iter().filter_map(TokenTree::ident)
}

/// Tokens of an `if` header up to its block.
fn condition(tokens: &[TokenTree]) -> &[TokenTree] {
    let end = tokens
        .iter()
        .position(|t| t.as_group().is_some_and(|g| g.delim == Delim::Brace))
        .unwrap_or(tokens.len());
    &tokens[1..end]
}

fn mentions_ident(trees: &[TokenTree], name: &str) -> bool {
    trees.iter().any(|t| match t {
        TokenTree::Token(tok) => tok.kind == TokenKind::Ident && tok.text == name,
        TokenTree::Group(g) => mentions_ident(&g.trees, name),
    })
}

fn contains_string(trees: &[TokenTree], value: &str) -> bool {
    trees.iter().any(|t| match t {
        TokenTree::Token(tok) => tok.unquoted() == Some(value),
        TokenTree::Group(g) => contains_string(&g.trees, value),
    })
}

//! Tokens and token trees
//!
//! The lexer produces a flat [`Token`] stream; [`build_trees`] folds it into
//! [`TokenTree`]s so that every bracketed region becomes a [`Group`]. All of
//! the engine's structural matching works on token trees.

use super::error::ParseError;

/// Go's reserved words.
pub const KEYWORDS: &[&str] = &[
    "break",
    "case",
    "chan",
    "const",
    "continue",
    "default",
    "defer",
    "else",
    "fallthrough",
    "for",
    "func",
    "go",
    "goto",
    "if",
    "import",
    "interface",
    "map",
    "package",
    "range",
    "return",
    "select",
    "struct",
    "switch",
    "type",
    "var",
];

pub fn is_keyword(text: &str) -> bool {
    KEYWORDS.contains(&text)
}

/// Classification of a single token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Ident,
    Keyword,
    Number,
    /// Interpreted or raw string literal
    Str,
    /// Rune literal
    Char,
    /// Operators and punctuation, including delimiters before tree building
    Op,
    Comment,
    /// Statement terminator inserted at a line end (Go's automatic semicolon)
    Terminator,
}

/// A lexed token with the layout information the printer needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    /// 1-based source line, 0 for synthesized tokens
    pub line: u32,
    /// Line breaks before this token: 0 same line, 1 new line, 2 blank line
    pub breaks: u8,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            line: 0,
            breaks: 0,
        }
    }

    pub fn ident(text: impl Into<String>) -> Self {
        Self::new(TokenKind::Ident, text)
    }

    pub fn op(text: impl Into<String>) -> Self {
        Self::new(TokenKind::Op, text)
    }

    pub fn comment(text: impl Into<String>) -> Self {
        Self::new(TokenKind::Comment, text)
    }

    pub fn terminator() -> Self {
        Self::new(TokenKind::Terminator, "")
    }

    pub fn is_op(&self, op: &str) -> bool {
        self.kind == TokenKind::Op && self.text == op
    }

    pub fn is_keyword(&self, kw: &str) -> bool {
        self.kind == TokenKind::Keyword && self.text == kw
    }

    pub fn is_literal(&self) -> bool {
        matches!(self.kind, TokenKind::Number | TokenKind::Str | TokenKind::Char)
    }

    /// Line comments (and block comments spanning lines) force a line break after them.
    pub fn ends_line(&self) -> bool {
        self.kind == TokenKind::Comment && (self.text.starts_with("//") || self.text.contains('\n'))
    }

    /// The value of a string literal without its quotes.
    pub fn unquoted(&self) -> Option<&str> {
        if self.kind != TokenKind::Str || self.text.len() < 2 {
            return None;
        }
        Some(&self.text[1..self.text.len() - 1])
    }
}

/// Bracket kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Delim {
    Paren,
    Bracket,
    Brace,
}

impl Delim {
    pub fn open(self) -> &'static str {
        match self {
            Delim::Paren => "(",
            Delim::Bracket => "[",
            Delim::Brace => "{",
        }
    }

    pub fn close(self) -> &'static str {
        match self {
            Delim::Paren => ")",
            Delim::Bracket => "]",
            Delim::Brace => "}",
        }
    }

    fn from_open(text: &str) -> Option<Self> {
        match text {
            "(" => Some(Delim::Paren),
            "[" => Some(Delim::Bracket),
            "{" => Some(Delim::Brace),
            _ => None,
        }
    }

    fn from_close(text: &str) -> Option<Self> {
        match text {
            ")" => Some(Delim::Paren),
            "]" => Some(Delim::Bracket),
            "}" => Some(Delim::Brace),
            _ => None,
        }
    }
}

/// A bracketed region of tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub delim: Delim,
    pub trees: Vec<TokenTree>,
    pub line: u32,
    /// Line breaks before the opening delimiter
    pub breaks: u8,
    /// Line breaks before the closing delimiter; non-zero means multi-line layout
    pub close_breaks: u8,
}

impl Group {
    pub fn new(delim: Delim, trees: Vec<TokenTree>) -> Self {
        Self {
            delim,
            trees,
            line: 0,
            breaks: 0,
            close_breaks: 0,
        }
    }

    pub fn is_multiline(&self) -> bool {
        self.close_breaks > 0
    }

    pub fn has_terminator(&self) -> bool {
        self.trees
            .iter()
            .any(|t| matches!(t, TokenTree::Token(tok) if tok.kind == TokenKind::Terminator))
    }

    pub fn has_comma(&self) -> bool {
        self.trees.iter().any(|t| t.is_op(","))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenTree {
    Token(Token),
    Group(Group),
}

impl TokenTree {
    pub fn breaks(&self) -> u8 {
        match self {
            TokenTree::Token(t) => t.breaks,
            TokenTree::Group(g) => g.breaks,
        }
    }

    pub fn set_breaks(&mut self, breaks: u8) {
        match self {
            TokenTree::Token(t) => t.breaks = breaks,
            TokenTree::Group(g) => g.breaks = breaks,
        }
    }

    pub fn line(&self) -> u32 {
        match self {
            TokenTree::Token(t) => t.line,
            TokenTree::Group(g) => g.line,
        }
    }

    pub fn as_token(&self) -> Option<&Token> {
        match self {
            TokenTree::Token(t) => Some(t),
            TokenTree::Group(_) => None,
        }
    }

    pub fn as_group(&self) -> Option<&Group> {
        match self {
            TokenTree::Group(g) => Some(g),
            TokenTree::Token(_) => None,
        }
    }

    pub fn as_group_mut(&mut self) -> Option<&mut Group> {
        match self {
            TokenTree::Group(g) => Some(g),
            TokenTree::Token(_) => None,
        }
    }

    pub fn is_op(&self, op: &str) -> bool {
        self.as_token().is_some_and(|t| t.is_op(op))
    }

    pub fn is_keyword(&self, kw: &str) -> bool {
        self.as_token().is_some_and(|t| t.is_keyword(kw))
    }

    pub fn is_kind(&self, kind: TokenKind) -> bool {
        self.as_token().is_some_and(|t| t.kind == kind)
    }

    pub fn is_comment(&self) -> bool {
        self.is_kind(TokenKind::Comment)
    }

    pub fn is_terminator(&self) -> bool {
        self.is_kind(TokenKind::Terminator)
    }

    pub fn is_group(&self, delim: Delim) -> bool {
        self.as_group().is_some_and(|g| g.delim == delim)
    }

    /// Identifier text, if this tree is a plain identifier.
    pub fn ident(&self) -> Option<&str> {
        match self {
            TokenTree::Token(t) if t.kind == TokenKind::Ident => Some(&t.text),
            _ => None,
        }
    }
}

/// Fold a flat token stream into token trees.
pub fn build_trees(tokens: Vec<Token>) -> Result<Vec<TokenTree>, ParseError> {
    let mut stack: Vec<(Token, Delim, Vec<TokenTree>)> = Vec::new();
    let mut current: Vec<TokenTree> = Vec::new();

    for token in tokens {
        if token.kind == TokenKind::Op {
            if let Some(delim) = Delim::from_open(&token.text) {
                stack.push((token, delim, std::mem::take(&mut current)));
                continue;
            }
            if let Some(delim) = Delim::from_close(&token.text) {
                let Some((open, expected, parent)) = stack.pop() else {
                    return Err(ParseError::UnbalancedDelimiter {
                        line: token.line,
                        found: token.text,
                    });
                };
                if expected != delim {
                    return Err(ParseError::MismatchedDelimiter {
                        line: token.line,
                        expected: expected.close().to_string(),
                        found: token.text,
                    });
                }
                let trees = std::mem::replace(&mut current, parent);
                current.push(TokenTree::Group(Group {
                    delim,
                    trees,
                    line: open.line,
                    breaks: open.breaks,
                    close_breaks: token.breaks,
                }));
                continue;
            }
        }
        current.push(TokenTree::Token(token));
    }

    if let Some((open, delim, _)) = stack.pop() {
        return Err(ParseError::UnclosedDelimiter {
            line: open.line,
            delim: delim.open().to_string(),
        });
    }
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::lexer::tokenize;

    #[test]
    fn build_trees_nests_groups() {
        let trees = build_trees(tokenize("f(a, [b]{c})").unwrap()).unwrap();
        // f, (..), terminator
        assert_eq!(trees.len(), 3);
        let call = trees[1].as_group().unwrap();
        assert_eq!(call.delim, Delim::Paren);
        assert!(call.has_comma());
        assert!(call.trees[2].is_group(Delim::Bracket));
        assert!(call.trees[3].is_group(Delim::Brace));
    }

    #[test]
    fn build_trees_records_multiline_close() {
        let trees = build_trees(tokenize("x{\n\ta,\n}").unwrap()).unwrap();
        let group = trees[1].as_group().unwrap();
        assert!(group.is_multiline());
    }

    #[test]
    fn build_trees_rejects_unbalanced() {
        let err = build_trees(tokenize("f(a").unwrap()).unwrap_err();
        assert!(matches!(err, ParseError::UnclosedDelimiter { .. }));

        let err = build_trees(tokenize("a)").unwrap()).unwrap_err();
        assert!(matches!(err, ParseError::UnbalancedDelimiter { .. }));

        let err = build_trees(tokenize("(a]").unwrap()).unwrap_err();
        assert!(matches!(err, ParseError::MismatchedDelimiter { .. }));
    }
}

//! Go lexer
//!
//! Scans Go source into [`Token`]s with `logos` and applies Go's automatic
//! semicolon rule: a [`TokenKind::Terminator`] is emitted at the end of every
//! line whose last significant token can end a statement.

use logos::{Lexer, Logos};

use super::error::ParseError;
use super::token::{is_keyword, Token, TokenKind};

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\f\r]+")]
enum RawTok {
    #[token("\u{FEFF}")]
    Bom,

    #[token("\n")]
    Newline,

    #[regex(r"//[^\n]*")]
    LineComment,

    #[token("/*", block_comment)]
    BlockComment,

    #[regex(r"[_\p{L}][_\p{L}\p{Nd}]*")]
    Word,

    #[regex(r"[0-9]", number)]
    #[regex(r"\.[0-9]", number)]
    Number,

    #[regex(r"`[^`]*`")]
    RawString,

    #[regex(r#""([^"\\\n]|\\.)*""#)]
    String,

    #[regex(r"'([^'\\\n]|\\.)+'")]
    Rune,

    #[token("...")]
    #[token("<<=")]
    #[token(">>=")]
    #[token("&^=")]
    #[token("+=")]
    #[token("-=")]
    #[token("*=")]
    #[token("/=")]
    #[token("%=")]
    #[token("&=")]
    #[token("|=")]
    #[token("^=")]
    #[token("<<")]
    #[token(">>")]
    #[token("&^")]
    #[token("&&")]
    #[token("||")]
    #[token("==")]
    #[token("!=")]
    #[token("<=")]
    #[token(">=")]
    #[token("++")]
    #[token("--")]
    #[token(":=")]
    #[token("<-")]
    #[token("=")]
    #[token("+")]
    #[token("-")]
    #[token("*")]
    #[token("/")]
    #[token("%")]
    #[token("&")]
    #[token("|")]
    #[token("^")]
    #[token("~")]
    #[token("!")]
    #[token("<")]
    #[token(">")]
    #[token("(")]
    #[token(")")]
    #[token("[")]
    #[token("]")]
    #[token("{")]
    #[token("}")]
    #[token(",")]
    #[token(";")]
    #[token(":")]
    #[token(".")]
    Op,
}

/// Extend `/*` through the closing `*/`; unterminated comments are errors.
fn block_comment(lex: &mut Lexer<RawTok>) -> bool {
    match lex.remainder().find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            true
        }
        None => {
            lex.bump(lex.remainder().len());
            false
        }
    }
}

/// Extend a numeric literal over digits, letters, underscores and dots.
///
/// A sign belongs to the literal only right after an exponent marker: `e`/`E`
/// in decimal literals, `p`/`P` in hex ones, so `0x1e+5` stays a sum.
fn number(lex: &mut Lexer<RawTok>) -> bool {
    let start = lex.slice().as_bytes();
    let rest = lex.remainder().as_bytes();
    let hex = start == b"0" && matches!(rest.first(), Some(b'x' | b'X'));
    let mut prev = start[start.len() - 1];
    let mut len = 0;
    while let Some(&b) = rest.get(len) {
        let exponent = if hex {
            matches!(prev, b'p' | b'P')
        } else {
            matches!(prev, b'e' | b'E')
        };
        let part = b.is_ascii_alphanumeric() || b == b'_' || b == b'.';
        if !part && !(exponent && matches!(b, b'+' | b'-')) {
            break;
        }
        prev = b;
        len += 1;
    }
    lex.bump(len);
    true
}

/// Can a statement end after this token?
fn ends_statement(token: &Token) -> bool {
    match token.kind {
        TokenKind::Ident | TokenKind::Number | TokenKind::Str | TokenKind::Char => true,
        TokenKind::Keyword => matches!(
            token.text.as_str(),
            "break" | "continue" | "fallthrough" | "return"
        ),
        TokenKind::Op => matches!(token.text.as_str(), "++" | "--" | ")" | "]" | "}"),
        TokenKind::Comment | TokenKind::Terminator => false,
    }
}

struct Scanner {
    out: Vec<Token>,
    line: u32,
    pending_breaks: u8,
    can_terminate: bool,
}

impl Scanner {
    fn push(&mut self, kind: TokenKind, text: &str) {
        self.out.push(Token {
            kind,
            text: text.to_string(),
            line: self.line,
            breaks: self.pending_breaks,
        });
        self.pending_breaks = 0;
    }

    fn terminate(&mut self) {
        if self.can_terminate {
            self.out.push(Token {
                kind: TokenKind::Terminator,
                text: String::new(),
                line: self.line,
                breaks: 0,
            });
            self.can_terminate = false;
        }
    }

    fn advance_lines(&mut self, text: &str) {
        let count = text.bytes().filter(|b| *b == b'\n').count();
        self.line += u32::try_from(count).unwrap_or(u32::MAX);
    }
}

/// Scan Go source into tokens, inserting statement terminators.
pub fn tokenize(src: &str) -> Result<Vec<Token>, ParseError> {
    let mut lexer = RawTok::lexer(src);
    let mut scanner = Scanner {
        out: Vec::new(),
        line: 1,
        pending_breaks: 0,
        can_terminate: false,
    };

    while let Some(raw) = lexer.next() {
        let slice = lexer.slice();
        let raw = raw.map_err(|()| ParseError::UnexpectedChar {
            line: scanner.line,
            found: slice.to_string(),
        })?;

        match raw {
            RawTok::Bom => {}
            RawTok::Newline => {
                scanner.terminate();
                scanner.line += 1;
                scanner.pending_breaks = (scanner.pending_breaks + 1).min(2);
            }
            RawTok::LineComment | RawTok::BlockComment => {
                if raw == RawTok::LineComment || slice.contains('\n') {
                    scanner.terminate();
                }
                scanner.push(TokenKind::Comment, slice.trim_end());
                scanner.advance_lines(slice);
            }
            RawTok::Word => {
                let kind = if is_keyword(slice) {
                    TokenKind::Keyword
                } else {
                    TokenKind::Ident
                };
                scanner.push(kind, slice);
            }
            RawTok::Number => scanner.push(TokenKind::Number, slice),
            RawTok::RawString | RawTok::String => {
                scanner.push(TokenKind::Str, slice);
                scanner.advance_lines(slice);
            }
            RawTok::Rune => scanner.push(TokenKind::Char, slice),
            RawTok::Op => scanner.push(TokenKind::Op, slice),
        }

        if let Some(last) = scanner.out.last() {
            if last.kind != TokenKind::Comment {
                scanner.can_terminate = ends_statement(last);
            }
        }
    }

    scanner.terminate();
    Ok(scanner.out)
}

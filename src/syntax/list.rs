//! Splitting token-tree sequences into statement lines and list items

use super::token::{Token, TokenKind, TokenTree};
use super::tree::Line;

/// One comma-separated entry of a call's arguments or a composite literal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    /// Leading comment lines followed by the entry's code
    pub tokens: Vec<TokenTree>,
    /// Comment on the same line, after the comma
    pub comment: Option<Token>,
}

impl ListItem {
    pub fn new(tokens: Vec<TokenTree>) -> Self {
        Self {
            tokens,
            comment: None,
        }
    }

    /// The entry without its leading comment lines.
    pub fn code(&self) -> &[TokenTree] {
        let start = self
            .tokens
            .iter()
            .position(|t| !t.is_comment())
            .unwrap_or(self.tokens.len());
        &self.tokens[start..]
    }

    pub fn has_code(&self) -> bool {
        !self.code().is_empty()
    }

    pub fn blank_before(&self) -> bool {
        self.tokens.first().is_some_and(|t| t.breaks() >= 2)
    }

    /// Key of a `Key: value` entry.
    pub fn key(&self) -> Option<&str> {
        match self.code() {
            [key, colon, ..] if colon.is_op(":") => key.ident(),
            _ => None,
        }
    }
}

fn starts_case_clause(tokens: &[TokenTree]) -> bool {
    tokens
        .first()
        .is_some_and(|t| t.is_keyword("case") || t.is_keyword("default"))
}

/// Split a statement sequence into lines.
///
/// Terminators end a line and are dropped. A comment on the same line as the
/// terminator becomes that line's trailing comment; any other comment forms a
/// comment-only line. `case x:` heads are split from a body that starts on the
/// next line.
pub fn split_lines(trees: Vec<TokenTree>) -> Vec<Line> {
    let mut lines: Vec<Line> = Vec::new();
    let mut current: Vec<TokenTree> = Vec::new();
    let mut just_terminated = false;
    let mut iter = trees.into_iter().peekable();

    while let Some(tree) = iter.next() {
        if tree.is_terminator() {
            if !current.is_empty() {
                lines.push(Line::new(std::mem::take(&mut current)));
            }
            just_terminated = true;
            continue;
        }

        if tree.is_comment() && current.is_empty() {
            let trailing = just_terminated
                && tree.breaks() == 0
                && lines
                    .last()
                    .is_some_and(|l| l.comment.is_none() && !l.is_comment());
            just_terminated = false;
            match tree {
                TokenTree::Token(comment) if trailing => {
                    if let Some(last) = lines.last_mut() {
                        last.comment = Some(comment);
                    }
                }
                tree => lines.push(Line::new(vec![tree])),
            }
            continue;
        }

        just_terminated = false;
        let clause_end = tree.is_op(":") && starts_case_clause(&current);
        current.push(tree);
        if clause_end && iter.peek().map_or(true, |next| next.breaks() > 0) {
            lines.push(Line::new(std::mem::take(&mut current)));
        }
    }

    if !current.is_empty() {
        lines.push(Line::new(current));
    }
    lines
}

/// Flatten lines back into a statement sequence.
pub fn join_lines(lines: Vec<Line>) -> Vec<TokenTree> {
    let mut out = Vec::new();
    for line in lines {
        let is_comment = line.is_comment();
        out.extend(line.tokens);
        if !is_comment {
            out.push(TokenTree::Token(Token::terminator()));
        }
        if let Some(comment) = line.comment {
            out.push(TokenTree::Token(Token { breaks: 0, ..comment }));
        }
    }
    out
}

/// Split a comma-separated list into items.
pub fn split_items(trees: Vec<TokenTree>) -> Vec<ListItem> {
    let mut items: Vec<ListItem> = Vec::new();
    let mut current: Vec<TokenTree> = Vec::new();
    let mut after_comma = false;

    for tree in trees {
        if tree.is_terminator() {
            continue;
        }
        if tree.is_op(",") {
            items.push(ListItem::new(std::mem::take(&mut current)));
            after_comma = true;
            continue;
        }
        let trailing = after_comma
            && current.is_empty()
            && tree.is_comment()
            && tree.breaks() == 0
            && items.last().is_some_and(|i| i.comment.is_none());
        after_comma = false;
        match tree {
            TokenTree::Token(comment) if trailing => {
                if let Some(last) = items.last_mut() {
                    last.comment = Some(comment);
                }
            }
            tree => current.push(tree),
        }
    }

    if !current.is_empty() {
        items.push(ListItem::new(current));
    }
    items
}

/// Join items back into a comma-separated list. Multi-line lists get a
/// trailing comma after the last entry.
pub fn join_items(items: Vec<ListItem>, multiline: bool) -> Vec<TokenTree> {
    let last_code = items.iter().rposition(ListItem::has_code);
    let mut out = Vec::new();
    for (i, item) in items.into_iter().enumerate() {
        let has_code = item.has_code();
        out.extend(item.tokens);
        if has_code && (multiline || Some(i) != last_code) {
            out.push(TokenTree::Token(Token::op(",")));
        }
        if let Some(comment) = item.comment {
            out.push(TokenTree::Token(Token { breaks: 0, ..comment }));
        }
    }
    out
}

/// The last identifier of an entry, naming bare references like `NewRepo`
/// or `repo.New`.
pub fn trailing_ident(trees: &[TokenTree]) -> Option<&str> {
    trees.iter().rev().find_map(|t| match t {
        TokenTree::Token(tok) if tok.kind == TokenKind::Ident => Some(tok.text.as_str()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::lexer::tokenize;
    use crate::syntax::token::build_trees;

    fn trees(src: &str) -> Vec<TokenTree> {
        build_trees(tokenize(src).unwrap()).unwrap()
    }

    fn inner(src: &str) -> Vec<TokenTree> {
        let mut top = trees(src);
        match top.remove(1) {
            TokenTree::Group(g) => g.trees,
            TokenTree::Token(_) => panic!("expected group"),
        }
    }

    #[test]
    fn split_lines_attaches_trailing_comments() {
        let lines = split_lines(trees("a := 1 // one\n// free\nb()\n"));
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].comment.as_ref().unwrap().text, "// one");
        assert!(lines[1].is_comment());
        assert!(lines[2].comment.is_none());
    }

    #[test]
    fn split_lines_keeps_blank_line_markers() {
        let lines = split_lines(trees("a()\n\nb()\n"));
        assert!(!lines[0].blank_before());
        assert!(lines[1].blank_before());
    }

    #[test]
    fn split_lines_separates_case_heads() {
        let body = inner("switch {\ncase x > 1:\n\treturn\ndefault:\n}\n");
        let lines = split_lines(body);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].tokens[0].is_keyword("case"));
        assert!(lines[1].tokens[0].is_keyword("return"));
        assert!(lines[2].tokens[0].is_keyword("default"));
    }

    #[test]
    fn split_items_attaches_comments_after_commas() {
        let items = split_items(inner("f(\n\ta, // first\n\t// lead\n\tb,\n)"));
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].comment.as_ref().unwrap().text, "// first");
        assert!(items[1].tokens[0].is_comment());
        assert_eq!(items[1].code().len(), 1);
    }

    #[test]
    fn split_items_reads_keys() {
        let items = split_items(inner("T{Name: n, Price: p}"));
        assert_eq!(items[0].key(), Some("Name"));
        assert_eq!(items[1].key(), Some("Price"));
    }

    #[test]
    fn join_items_adds_trailing_comma_only_when_multiline() {
        let items = split_items(inner("f(a, b)"));
        assert_eq!(join_items(items.clone(), false).len(), 3);
        assert_eq!(join_items(items, true).len(), 4);
    }
}

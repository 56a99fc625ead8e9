//! Pretty printer
//!
//! Renders trees in gofmt's layout: tab indentation, one blank line between
//! top-level declarations, and tabwriter-style alignment for struct fields,
//! interface methods, grouped specs and multi-line list entries.
//!
//! Every layout decision depends only on what the parser records (group
//! multi-line flags, blank-line markers, comment placement), so printing a
//! re-parsed printout reproduces it exactly.

use super::list::{split_items, split_lines, ListItem};
use super::parser::parse_params;
use super::token::{Delim, Group, Token, TokenKind, TokenTree};
use super::tree::{
    Block, Decl, Field, FuncDecl, ImportDecl, ImportSpec, InterfaceElem, Item, Line, Member,
    Param, ParamList, SourceFile, TypeDecl, TypeExpr, ValueDecl, ValueSpec,
};

const UNARY_OPS: &[&str] = &["+", "-", "!", "^", "*", "&", "<-", "~"];

/// Keywords whose statement ends in a block: a brace group after them is a body.
const BLOCK_KEYWORDS: &[&str] = &["if", "for", "switch", "select", "func", "else"];

#[derive(Debug, Clone, Copy)]
struct Ctx {
    /// Single-line rendering with comments dropped
    flat: bool,
    in_brackets: bool,
    /// Expression nesting as gofmt counts it; 1 at statement level
    depth: u8,
}

impl Default for Ctx {
    fn default() -> Self {
        Self {
            flat: false,
            in_brackets: false,
            depth: 1,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Prev<'a> {
    Token {
        kind: TokenKind,
        text: &'a str,
        unary: bool,
    },
    Group(Delim),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Plain,
    /// Statement body
    Block,
    /// `struct { ... }` / `interface { ... }` body inside an expression
    TypeBody,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    Inline,
    /// One statement per line
    Lines,
    /// One list entry per line with a trailing comma
    Items,
    /// Empty group whose closing delimiter is on its own line
    Open,
}

fn layout_of(group: &Group, role: Role) -> Layout {
    if group.has_terminator() || (role == Role::Block && !group.trees.is_empty()) {
        return Layout::Lines;
    }
    if !group.is_multiline() {
        return Layout::Inline;
    }
    if group.trees.is_empty() {
        return Layout::Open;
    }
    if group.delim == Delim::Brace && (role != Role::Plain || !group.has_comma()) {
        Layout::Lines
    } else {
        Layout::Items
    }
}

fn is_unary(prev: Option<Prev<'_>>, tok: &Token) -> bool {
    if tok.kind != TokenKind::Op || !UNARY_OPS.contains(&tok.text.as_str()) {
        return false;
    }
    match prev {
        None => true,
        Some(Prev::Token {
            kind: TokenKind::Keyword,
            ..
        }) => true,
        Some(Prev::Token {
            kind: TokenKind::Op,
            text,
            ..
        }) => !matches!(text, "++" | "--"),
        Some(Prev::Group(Delim::Bracket)) => true,
        Some(_) => false,
    }
}

/// Binding strength of a binary operator.
fn precedence(tok: &Token) -> Option<u8> {
    if tok.kind != TokenKind::Op {
        return None;
    }
    match tok.text.as_str() {
        "||" => Some(1),
        "&&" => Some(2),
        "==" | "!=" | "<" | "<=" | ">" | ">=" => Some(3),
        "+" | "-" | "|" | "^" => Some(4),
        "*" | "/" | "%" | "<<" | ">>" | "&" | "&^" => Some(5),
        _ => None,
    }
}

/// Tokens that keep an operand going: names, literals, selectors and type keywords.
fn continues_operand(tok: &Token) -> bool {
    match tok.kind {
        TokenKind::Ident | TokenKind::Number | TokenKind::Str | TokenKind::Char => true,
        TokenKind::Op => tok.text == ".",
        TokenKind::Keyword => matches!(
            tok.text.as_str(),
            "func" | "map" | "chan" | "struct" | "interface"
        ),
        TokenKind::Comment | TokenKind::Terminator => false,
    }
}

/// Would the operator fuse with a unary operator opening its right operand?
///
/// Returns the precedence level below which blanks must stay.
fn collision(op: &str, next: Option<&TokenTree>) -> u8 {
    let Some(next) = next
        .and_then(TokenTree::as_token)
        .filter(|t| t.kind == TokenKind::Op)
    else {
        return 0;
    };
    match (op, next.text.as_str()) {
        ("/", "*") | ("&", "&") | ("&", "^") => 5,
        ("+", "+") | ("-", "-") => 4,
        _ => 0,
    }
}

fn follows_operand(prev: Option<Prev<'_>>) -> bool {
    matches!(
        prev,
        Some(Prev::Token {
            kind: TokenKind::Ident | TokenKind::Str,
            ..
        }) | Some(Prev::Group(_))
    )
}

fn argument_count(group: &Group) -> usize {
    split_items(group.trees.clone())
        .iter()
        .filter(|item| item.has_code())
        .count()
}

/// `name:` opening a statement line
fn label_len(tokens: &[TokenTree]) -> usize {
    match tokens {
        [name, colon, ..] if name.ident().is_some() && colon.is_op(":") => 2,
        _ => 0,
    }
}

#[derive(Debug)]
struct Operator {
    /// Position in the token stream
    index: usize,
    prec: u8,
    collision: u8,
}

#[derive(Debug)]
enum Operand {
    /// The `n`th operand of the expression
    Leaf(usize),
    Binary {
        op: usize,
        left: Box<Operand>,
        right: Box<Operand>,
    },
}

/// Rebuild the left-associative tree of a flat operator sequence.
fn climb(ops: &[Operator], next: &mut usize, min: u8) -> Operand {
    let mut left = Operand::Leaf(*next);
    while let Some(op) = ops.get(*next).filter(|op| op.prec >= min) {
        let at = *next;
        *next += 1;
        let right = climb(ops, next, op.prec + 1);
        left = Operand::Binary {
            op: at,
            left: Box::new(left),
            right: Box::new(right),
        };
    }
    left
}

/// Whether the additive and multiplicative levels occur below `node`, and
/// the worst operator collision.
fn walk(ops: &[Operator], node: &Operand) -> (bool, bool, u8) {
    let Operand::Binary { op, left, right } = node else {
        return (false, false, 0);
    };
    let op = &ops[*op];
    let (l4, l5, lc) = walk(ops, left);
    let (r4, r5, rc) = walk(ops, right);
    (
        op.prec == 4 || l4 || r4,
        op.prec == 5 || l5 || r5,
        op.collision.max(lc).max(rc),
    )
}

/// Operators at or above the returned precedence print without blanks.
fn cutoff(ops: &[Operator], node: &Operand, depth: u8) -> u8 {
    let (has4, has5, collision) = walk(ops, node);
    if collision > 0 {
        return collision + 1;
    }
    match (has4 && has5, depth <= 1) {
        (true, true) => 5,
        (false, true) => 6,
        _ => 4,
    }
}

/// Operators and operand trees of the expression being scanned
#[derive(Debug, Default)]
struct Expression {
    ops: Vec<Operator>,
    /// `(stream index, operand number)`
    members: Vec<(usize, usize)>,
}

/// Binary operator spacing and operand depths of one token stream
struct ExprLayout {
    tight: Vec<bool>,
    depth: Vec<u8>,
}

impl ExprLayout {
    fn of(trees: &[TokenTree], depth: u8) -> Self {
        let mut layout = Self {
            tight: vec![false; trees.len()],
            depth: vec![depth; trees.len()],
        };
        let mut expr = Expression::default();
        let mut prev: Option<Prev<'_>> = None;

        for (i, tree) in trees.iter().enumerate() {
            if tree.is_comment() {
                continue;
            }
            let tok = match tree {
                TokenTree::Group(group) => {
                    expr.members.push((i, expr.ops.len()));
                    prev = Some(Prev::Group(group.delim));
                    continue;
                }
                TokenTree::Token(tok) => tok,
            };
            if tok.kind == TokenKind::Terminator {
                layout.close(&mut expr, depth);
                continue;
            }
            let unary = is_unary(prev, tok);
            match precedence(tok).filter(|_| !unary) {
                Some(prec) => {
                    let next = trees[i + 1..].iter().find(|t| !t.is_comment());
                    expr.ops.push(Operator {
                        index: i,
                        prec,
                        collision: collision(&tok.text, next),
                    });
                }
                None if unary || continues_operand(tok) => expr.members.push((i, expr.ops.len())),
                None => layout.close(&mut expr, depth),
            }
            prev = Some(Prev::Token {
                kind: tok.kind,
                text: &tok.text,
                unary,
            });
        }
        layout.close(&mut expr, depth);
        layout
    }

    fn close(&mut self, expr: &mut Expression, depth: u8) {
        if !expr.ops.is_empty() {
            let mut next = 0;
            let root = climb(&expr.ops, &mut next, 1);
            let mut operands = vec![depth; expr.ops.len() + 1];
            self.mark(&expr.ops, &root, depth, &mut operands);
            for &(index, operand) in &expr.members {
                self.depth[index] = operands[operand];
            }
        }
        expr.ops.clear();
        expr.members.clear();
    }

    fn mark(&mut self, ops: &[Operator], node: &Operand, depth: u8, operands: &mut [u8]) {
        match node {
            Operand::Leaf(n) => operands[*n] = depth,
            Operand::Binary { op, left, right } => {
                let prec = ops[*op].prec;
                self.tight[ops[*op].index] = prec >= cutoff(ops, node, depth);
                let same_level =
                    matches!(**left, Operand::Binary { op: l, .. } if ops[l].prec == prec);
                let left_depth = if same_level {
                    depth
                } else {
                    depth.saturating_add(1)
                };
                self.mark(ops, left, left_depth, operands);
                self.mark(ops, right, depth.saturating_add(1), operands);
            }
        }
    }
}

/// Does `prev` leave room for a following operand or group without a space?
fn after_op_needs_space(text: &str, unary: bool, ctx: Ctx) -> bool {
    if unary {
        return false;
    }
    match text {
        "." | "..." => false,
        ":" => !ctx.in_brackets,
        _ => true,
    }
}

fn space_before(
    prev: Prev<'_>,
    tree: &TokenTree,
    next: Option<&TokenTree>,
    ctx: Ctx,
    expect_block: bool,
) -> bool {
    match tree {
        TokenTree::Token(tok) if tok.kind == TokenKind::Op => {
            match tok.text.as_str() {
                "," | ";" | ":" | "." | "++" | "--" => return false,
                "..." => return next.is_some(),
                _ => {}
            }
            if !is_unary(Some(prev), tok) {
                return true;
            }
            match prev {
                Prev::Token {
                    kind: TokenKind::Keyword,
                    ..
                } => true,
                Prev::Token {
                    kind: TokenKind::Op,
                    text,
                    unary,
                } => after_op_needs_space(text, unary, ctx),
                _ => false,
            }
        }
        TokenTree::Token(_) => match prev {
            Prev::Token {
                kind: TokenKind::Op,
                text,
                unary,
            } => after_op_needs_space(text, unary, ctx),
            Prev::Token { .. } => true,
            Prev::Group(Delim::Bracket) => false,
            Prev::Group(_) => true,
        },
        TokenTree::Group(group) => match (group.delim, prev) {
            (
                _,
                Prev::Token {
                    kind: TokenKind::Op,
                    text,
                    unary,
                },
            ) => after_op_needs_space(text, unary, ctx),
            (Delim::Brace, _) if expect_block => true,
            (
                Delim::Paren,
                Prev::Token {
                    kind: TokenKind::Keyword,
                    text,
                    ..
                },
            ) => text != "func",
            (
                Delim::Bracket,
                Prev::Token {
                    kind: TokenKind::Keyword,
                    text,
                    ..
                },
            ) => text != "map",
            (
                Delim::Brace,
                Prev::Token {
                    kind: TokenKind::Keyword,
                    text,
                    ..
                },
            ) => !matches!(text, "struct" | "interface") || group.is_multiline(),
            (_, Prev::Token { .. }) => false,
            (Delim::Paren | Delim::Bracket, Prev::Group(Delim::Paren)) => expect_block,
            (Delim::Brace, Prev::Group(Delim::Paren | Delim::Brace)) => true,
            (_, Prev::Group(_)) => false,
        },
    }
}

/// Lay out rows of cells the way gofmt's tabwriter does: a cell is padded to
/// the widest cell of its column across the adjacent rows that have a cell
/// after it.
fn align(rows: &[Vec<String>]) -> Vec<String> {
    let width = |s: &str| s.chars().count();
    let mut widths: Vec<Vec<usize>> = rows.iter().map(|r| vec![0; r.len()]).collect();
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);

    for col in 0..columns {
        let mut i = 0;
        while i < rows.len() {
            if rows[i].len() <= col + 1 {
                i += 1;
                continue;
            }
            let start = i;
            while i < rows.len() && rows[i].len() > col + 1 {
                i += 1;
            }
            let max = rows[start..i]
                .iter()
                .map(|r| width(&r[col]))
                .max()
                .unwrap_or(0);
            for row in &mut widths[start..i] {
                row[col] = max;
            }
        }
    }

    rows.iter()
        .zip(widths)
        .map(|(cells, widths)| {
            let mut line = String::new();
            for (col, cell) in cells.iter().enumerate() {
                line.push_str(cell);
                if col + 1 < cells.len() {
                    let pad = widths[col] + 1 - width(cell);
                    line.extend(std::iter::repeat(' ').take(pad));
                }
            }
            line
        })
        .collect()
}

/// One printed line of an aligned section
#[derive(Debug)]
enum Row {
    Cells { cells: Vec<String>, blank_before: bool },
    Comment { token: Token, blank_before: bool },
}

impl Row {
    fn comment(token: &Token) -> Self {
        Row::Comment {
            token: token.clone(),
            blank_before: token.breaks >= 2,
        }
    }

    fn blank_before(&self) -> bool {
        match self {
            Row::Cells { blank_before, .. } | Row::Comment { blank_before, .. } => *blank_before,
        }
    }
}

/// Is a paren group at this point the parameter or result list of a func literal or type?
fn starts_signature(prev: Option<Prev<'_>>, expect_block: bool) -> bool {
    match prev {
        Some(Prev::Token {
            kind: TokenKind::Keyword,
            text,
            ..
        }) => text == "func",
        Some(Prev::Group(Delim::Paren)) => expect_block,
        _ => false,
    }
}

fn starts_case_clause(tokens: &[TokenTree]) -> bool {
    tokens
        .first()
        .is_some_and(|t| t.is_keyword("case") || t.is_keyword("default"))
}

fn import_spec_text(spec: &ImportSpec) -> String {
    match &spec.alias {
        Some(alias) => format!("{} \"{}\"", alias, spec.path),
        None => format!("\"{}\"", spec.path),
    }
}

struct Printer {
    buf: String,
    indent: usize,
    line_start: bool,
    /// A line comment was written; the next output starts a continuation line
    pending_break: bool,
    continuation: bool,
}

impl Printer {
    fn new(indent: usize) -> Self {
        Self {
            buf: String::new(),
            indent,
            line_start: true,
            pending_break: false,
            continuation: false,
        }
    }

    /// A printer for text that continues a line the caller has already indented.
    fn fragment(indent: usize) -> Self {
        Self {
            line_start: false,
            ..Self::new(indent)
        }
    }

    fn render(&self, f: impl FnOnce(&mut Printer)) -> String {
        let mut p = Printer::fragment(self.indent);
        f(&mut p);
        p.buf
    }

    fn write(&mut self, text: &str) {
        if self.pending_break {
            self.newline();
            self.continuation = true;
        }
        if self.line_start {
            let depth = self.indent + usize::from(self.continuation);
            self.buf.extend(std::iter::repeat('\t').take(depth));
            self.line_start = false;
            self.continuation = false;
        }
        self.buf.push_str(text);
    }

    fn newline(&mut self) {
        while self.buf.ends_with(' ') {
            self.buf.pop();
        }
        self.buf.push('\n');
        self.line_start = true;
        self.pending_break = false;
    }

    fn comments(&mut self, comments: &[Token]) {
        for (i, comment) in comments.iter().enumerate() {
            if i > 0 && comment.breaks >= 2 {
                self.newline();
            }
            self.write(&comment.text);
            self.newline();
        }
    }

    fn file(&mut self, file: &SourceFile) {
        self.comments(&file.header);
        if !file.header.is_empty() && file.header_detached {
            self.newline();
        }
        self.write("package ");
        self.write(&file.package);
        self.newline();
        for decl in &file.decls {
            self.newline();
            self.decl(decl);
        }
        if !file.trailing.is_empty() {
            self.newline();
            self.comments(&file.trailing);
        }
    }

    fn decl(&mut self, decl: &Decl) {
        self.comments(&decl.doc);
        if !decl.doc.is_empty() && decl.detached_doc {
            self.newline();
        }
        match &decl.item {
            Item::Import(d) => self.import_decl(d),
            Item::Type(t) => self.type_decl(t),
            Item::Func(f) => self.func_decl(f),
            Item::Value(v) => self.value_decl(v),
            Item::Verbatim(trees) => self.stream(trees, Ctx::default()),
        }
        if let Some(comment) = &decl.comment {
            self.write(" ");
            self.write(&comment.text);
        }
        self.newline();
    }

    fn rows(&mut self, rows: Vec<Row>) {
        let mut run: Vec<Vec<String>> = Vec::new();
        for (i, row) in rows.into_iter().enumerate() {
            let blank = i > 0 && row.blank_before();
            let multiline = matches!(&row, Row::Cells { cells, .. } if cells.iter().any(|c| c.contains('\n')));
            if blank || multiline || matches!(row, Row::Comment { .. }) {
                self.flush(&mut run);
            }
            if blank {
                self.newline();
            }
            match row {
                Row::Cells { cells, .. } if multiline => {
                    self.write(&cells.join(" "));
                    self.newline();
                }
                Row::Cells { cells, .. } => run.push(cells),
                Row::Comment { token, .. } => {
                    self.write(&token.text);
                    self.newline();
                }
            }
        }
        self.flush(&mut run);
    }

    fn flush(&mut self, run: &mut Vec<Vec<String>>) {
        for line in align(&std::mem::take(run)) {
            self.write(&line);
            self.newline();
        }
    }

    fn import_decl(&mut self, decl: &ImportDecl) {
        if let (false, [Member::Item(spec)]) = (decl.grouped, decl.specs.as_slice()) {
            self.write("import ");
            self.write(&import_spec_text(spec));
            if let Some(comment) = &spec.comment {
                self.write(" ");
                self.write(&comment.text);
            }
            return;
        }
        if decl.specs.is_empty() {
            self.write("import ()");
            return;
        }
        self.write("import (");
        self.newline();
        self.indent += 1;
        let rows = decl
            .specs
            .iter()
            .map(|member| match member {
                Member::Comment(token) => Row::comment(token),
                Member::Item(spec) => {
                    let mut cells = vec![import_spec_text(spec)];
                    cells.extend(spec.comment.as_ref().map(|c| c.text.clone()));
                    Row::Cells {
                        cells,
                        blank_before: spec.blank_before,
                    }
                }
            })
            .collect();
        self.rows(rows);
        self.indent -= 1;
        self.write(")");
    }

    fn type_decl(&mut self, decl: &TypeDecl) {
        self.write("type ");
        self.write(&decl.name);
        if let Some(params) = &decl.type_params {
            self.group(params, Role::Plain, Ctx::default());
        }
        self.write(if decl.alias { " = " } else { " " });
        self.type_expr(&decl.ty);
    }

    fn type_expr(&mut self, ty: &TypeExpr) {
        match ty {
            TypeExpr::Struct(fields) if fields.is_empty() => self.write("struct{}"),
            TypeExpr::Interface(elems) if elems.is_empty() => self.write("interface{}"),
            TypeExpr::Struct(fields) => {
                self.write("struct {");
                self.newline();
                self.indent += 1;
                let rows = fields
                    .iter()
                    .map(|member| match member {
                        Member::Comment(token) => Row::comment(token),
                        Member::Item(field) => self.field_row(field),
                    })
                    .collect();
                self.rows(rows);
                self.indent -= 1;
                self.write("}");
            }
            TypeExpr::Interface(elems) => {
                self.write("interface {");
                self.newline();
                self.indent += 1;
                let rows = elems
                    .iter()
                    .map(|member| match member {
                        Member::Comment(token) => Row::comment(token),
                        Member::Item(elem) => self.interface_row(elem),
                    })
                    .collect();
                self.rows(rows);
                self.indent -= 1;
                self.write("}");
            }
            TypeExpr::Other(trees) => self.stream(trees, Ctx::default()),
        }
    }

    fn field_row(&self, field: &Field) -> Row {
        let mut cells = Vec::new();
        if !field.names.is_empty() {
            cells.push(field.names.join(", "));
        }
        cells.push(self.render(|p| p.stream(&field.ty, Ctx::default())));
        cells.extend(field.tag.clone());
        cells.extend(field.comment.as_ref().map(|c| c.text.clone()));
        Row::Cells {
            cells,
            blank_before: field.blank_before,
        }
    }

    fn interface_row(&self, elem: &InterfaceElem) -> Row {
        let (text, comment, blank_before) = match elem {
            InterfaceElem::Method(method) => {
                let text = self.render(|p| {
                    p.write(&method.name);
                    p.params(&method.params, Ctx::default());
                    if !method.results.is_empty() {
                        p.write(" ");
                        p.stream(&method.results, Ctx::default());
                    }
                });
                (text, &method.comment, method.blank_before)
            }
            InterfaceElem::Embedded {
                ty,
                comment,
                blank_before,
            } => (
                self.render(|p| p.stream(ty, Ctx::default())),
                comment,
                *blank_before,
            ),
        };
        let mut cells = vec![text];
        cells.extend(comment.as_ref().map(|c| c.text.clone()));
        Row::Cells {
            cells,
            blank_before,
        }
    }

    fn func_decl(&mut self, func: &FuncDecl) {
        self.write("func ");
        if let Some(recv) = &func.recv {
            self.write("(");
            if let Some(name) = &recv.name {
                self.write(name);
                self.write(" ");
            }
            self.stream(&recv.ty, Ctx::default());
            self.write(") ");
        }
        self.write(&func.name);
        if let Some(params) = &func.type_params {
            self.group(params, Role::Plain, Ctx::default());
        }
        self.params(&func.params, Ctx::default());
        if !func.results.is_empty() {
            self.write(" ");
            self.stream(&func.results, Ctx::default());
        }
        if let Some(body) = &func.body {
            self.write(" ");
            self.block(body);
        }
    }

    fn param(&mut self, param: &Param, ctx: Ctx) {
        if !param.names.is_empty() {
            self.write(&param.names.join(", "));
            self.write(" ");
        }
        self.stream(
            &param.ty,
            Ctx {
                flat: ctx.flat,
                ..Ctx::default()
            },
        );
    }

    fn params(&mut self, list: &ParamList, ctx: Ctx) {
        self.write("(");
        if list.multiline && !ctx.flat && !list.params.is_empty() {
            self.newline();
            self.indent += 1;
            for param in &list.params {
                self.param(param, ctx);
                self.write(",");
                self.newline();
            }
            self.indent -= 1;
        } else {
            for (i, param) in list.params.iter().enumerate() {
                if i > 0 {
                    self.write(", ");
                }
                self.param(param, ctx);
            }
        }
        self.write(")");
    }

    fn block(&mut self, block: &Block) {
        self.write("{");
        self.newline();
        self.indent += 1;
        self.lines(&block.lines);
        self.indent -= 1;
        self.write("}");
    }

    fn lines(&mut self, lines: &[Line]) {
        let switch_body = lines.iter().any(|l| starts_case_clause(&l.tokens));
        for (i, line) in lines.iter().enumerate() {
            if i > 0 && line.blank_before() {
                self.newline();
            }
            let dedent = switch_body && starts_case_clause(&line.tokens) && self.indent > 0;
            if dedent {
                self.indent -= 1;
            }
            let mut tokens = line.tokens.as_slice();
            let label = label_len(tokens);
            if label > 0 && self.indent > 0 {
                self.indent -= 1;
                self.stream(&tokens[..label], Ctx::default());
                self.indent += 1;
                tokens = &tokens[label..];
                if let Some(comment) = tokens
                    .first()
                    .and_then(TokenTree::as_token)
                    .filter(|t| t.kind == TokenKind::Comment && t.breaks == 0)
                {
                    self.write(" ");
                    self.write(&comment.text);
                    tokens = &tokens[1..];
                }
                if !tokens.is_empty() {
                    self.newline();
                }
            }
            self.stream(tokens, Ctx::default());
            if let Some(comment) = &line.comment {
                self.write(" ");
                self.write(&comment.text);
            }
            if dedent {
                self.indent += 1;
            }
            self.newline();
        }
    }

    fn value_spec_inline(&mut self, spec: &ValueSpec) {
        self.write(&spec.names.join(", "));
        if !spec.ty.is_empty() {
            self.write(" ");
            self.stream(&spec.ty, Ctx::default());
        }
        if !spec.values.is_empty() {
            self.write(" = ");
            self.stream(&spec.values, Ctx::default());
        }
        if let Some(comment) = &spec.comment {
            self.write(" ");
            self.write(&comment.text);
        }
    }

    fn value_decl(&mut self, decl: &ValueDecl) {
        self.write(decl.keyword.as_str());
        if let (false, [Member::Item(spec)]) = (decl.grouped, decl.specs.as_slice()) {
            self.write(" ");
            self.value_spec_inline(spec);
            return;
        }
        if decl.specs.is_empty() {
            self.write(" ()");
            return;
        }
        self.write(" (");
        self.newline();
        self.indent += 1;
        let typed = decl
            .specs
            .iter()
            .filter_map(Member::item)
            .any(|s| !s.ty.is_empty());
        let rows = decl
            .specs
            .iter()
            .map(|member| match member {
                Member::Comment(token) => Row::comment(token),
                Member::Item(spec) => {
                    let mut cells = vec![spec.names.join(", ")];
                    if typed {
                        cells.push(self.render(|p| p.stream(&spec.ty, Ctx::default())));
                    }
                    if !spec.values.is_empty() {
                        cells.push(self.render(|p| {
                            p.write("= ");
                            p.stream(&spec.values, Ctx::default());
                        }));
                    }
                    if cells.last().is_some_and(String::is_empty) {
                        cells.pop();
                    }
                    cells.extend(spec.comment.as_ref().map(|c| c.text.clone()));
                    Row::Cells {
                        cells,
                        blank_before: spec.blank_before,
                    }
                }
            })
            .collect();
        self.rows(rows);
        self.indent -= 1;
        self.write(")");
    }

    fn stream(&mut self, trees: &[TokenTree], ctx: Ctx) {
        let mut prev: Option<Prev<'_>> = None;
        let mut expect_block = false;
        let layout = ExprLayout::of(trees, ctx.depth);
        let mut after_tight = false;

        for (i, tree) in trees.iter().enumerate() {
            if tree.is_terminator() {
                continue;
            }
            if !ctx.flat && prev.is_some() && tree.breaks() > 0 {
                self.pending_break = true;
            }
            if let TokenTree::Token(tok) = tree {
                if tok.kind == TokenKind::Comment {
                    if ctx.flat {
                        continue;
                    }
                    if prev.is_some() && !self.pending_break {
                        self.write(" ");
                    }
                    self.write(&tok.text);
                    self.pending_break = tok.ends_line();
                    continue;
                }
            }

            if let Some(p) = prev {
                let next = trees[i + 1..]
                    .iter()
                    .find(|t| !t.is_comment() && !t.is_terminator());
                let tight = layout.tight[i] || after_tight;
                if !self.pending_break && !tight && space_before(p, tree, next, ctx, expect_block) {
                    self.write(" ");
                }
            }
            after_tight = layout.tight[i];

            match tree {
                TokenTree::Token(tok) => {
                    let unary = is_unary(prev, tok);
                    self.write(&tok.text);
                    if tok.kind == TokenKind::Keyword && BLOCK_KEYWORDS.contains(&tok.text.as_str())
                    {
                        expect_block = true;
                    }
                    prev = Some(Prev::Token {
                        kind: tok.kind,
                        text: &tok.text,
                        unary,
                    });
                }
                TokenTree::Group(group)
                    if group.delim == Delim::Paren && starts_signature(prev, expect_block) =>
                {
                    self.params(&parse_params(group.clone()), ctx);
                    prev = Some(Prev::Group(Delim::Paren));
                }
                TokenTree::Group(group) => {
                    let after_type_keyword = matches!(
                        prev,
                        Some(Prev::Token { kind: TokenKind::Keyword, text, .. })
                            if text == "struct" || text == "interface"
                    );
                    let role = match group.delim {
                        Delim::Brace if expect_block => Role::Block,
                        Delim::Brace if after_type_keyword => Role::TypeBody,
                        _ => Role::Plain,
                    };
                    let depth = layout.depth[i];
                    let depth = match group.delim {
                        Delim::Brace => 1,
                        Delim::Bracket if follows_operand(prev) => depth.saturating_add(1),
                        Delim::Bracket => 1,
                        Delim::Paren if follows_operand(prev) && argument_count(group) > 1 => {
                            depth.saturating_add(1)
                        }
                        Delim::Paren if follows_operand(prev) => depth,
                        Delim::Paren => depth.saturating_sub(1).max(1),
                    };
                    self.group(group, role, Ctx { depth, ..ctx });
                    if role == Role::Block {
                        expect_block = false;
                    }
                    prev = Some(Prev::Group(group.delim));
                }
            }
        }
    }

    fn group(&mut self, group: &Group, role: Role, ctx: Ctx) {
        let inner = Ctx {
            in_brackets: group.delim == Delim::Bracket,
            ..ctx
        };
        self.write(group.delim.open());
        if ctx.flat {
            self.flat_group(group, role, inner);
            self.write(group.delim.close());
            return;
        }
        match layout_of(group, role) {
            Layout::Lines => {
                self.newline();
                self.indent += 1;
                self.lines(&split_lines(group.trees.clone()));
                self.indent -= 1;
            }
            Layout::Items => {
                self.newline();
                self.indent += 1;
                self.items(&split_items(group.trees.clone()), inner);
                self.indent -= 1;
            }
            Layout::Open => self.newline(),
            Layout::Inline => {
                let pad = role != Role::Plain && !group.trees.is_empty();
                if pad {
                    self.write(" ");
                }
                self.stream(&group.trees, inner);
                if pad {
                    self.write(" ");
                }
            }
        }
        self.write(group.delim.close());
    }

    fn items(&mut self, items: &[ListItem], ctx: Ctx) {
        let mut rows = Vec::new();
        for (i, item) in items.iter().enumerate() {
            let blank = i > 0 && item.blank_before();
            let code = item.code();
            let leading = &item.tokens[..item.tokens.len() - code.len()];
            for (j, tree) in leading.iter().enumerate() {
                if let Some(token) = tree.as_token() {
                    rows.push(Row::Comment {
                        token: token.clone(),
                        blank_before: blank && j == 0,
                    });
                }
            }
            if code.is_empty() {
                continue;
            }

            let keyed = code.len() > 2 && code[1].is_op(":") && code[0].as_token().is_some();
            let mut cells = if keyed {
                vec![
                    self.render(|p| p.stream(&code[..2], ctx)),
                    self.render(|p| p.stream(&code[2..], ctx)) + ",",
                ]
            } else {
                vec![self.render(|p| p.stream(code, ctx)) + ","]
            };
            cells.extend(item.comment.as_ref().map(|c| c.text.clone()));
            rows.push(Row::Cells {
                cells,
                blank_before: blank && leading.is_empty(),
            });
        }
        self.rows(rows);
    }

    fn flat_group(&mut self, group: &Group, role: Role, ctx: Ctx) {
        let statements = group.has_terminator()
            || (group.delim == Delim::Brace
                && group.is_multiline()
                && (role != Role::Plain || !group.has_comma()));
        if statements {
            let lines: Vec<Line> = split_lines(group.trees.clone())
                .into_iter()
                .filter(|l| !l.is_comment())
                .collect();
            if lines.is_empty() {
                return;
            }
            self.write(" ");
            for (i, line) in lines.iter().enumerate() {
                if i > 0 {
                    self.write("; ");
                }
                self.stream(&line.tokens, ctx);
            }
            self.write(" ");
            return;
        }

        let mut end = group.trees.len();
        while end > 0 && group.trees[end - 1].is_comment() {
            end -= 1;
        }
        if end > 0 && group.trees[end - 1].is_op(",") {
            end -= 1;
        }
        let trees = &group.trees[..end];
        let pad = role != Role::Plain && trees.iter().any(|t| !t.is_comment());
        if pad {
            self.write(" ");
        }
        self.stream(trees, ctx);
        if pad {
            self.write(" ");
        }
    }
}

/// Render a whole file.
pub fn print_file(file: &SourceFile) -> String {
    let mut p = Printer::new(0);
    p.file(file);
    p.buf
}

/// Render a single top-level declaration with its doc comments.
pub fn print_decl(decl: &Decl) -> String {
    let mut p = Printer::new(0);
    p.decl(decl);
    p.buf
}

/// Render statement lines at the given indentation depth.
pub fn print_lines(lines: &[Line], indent: usize) -> String {
    let mut p = Printer::new(indent);
    p.lines(lines);
    p.buf
}

/// Canonical single-line text of a token sequence, without comments.
///
/// Two sequences that differ only in layout, comments or a trailing comma
/// produce the same text.
pub fn inline_text(trees: &[TokenTree]) -> String {
    let mut p = Printer::new(0);
    p.stream(
        trees,
        Ctx {
            flat: true,
            ..Ctx::default()
        },
    );
    p.buf
}

//! Go syntax front end
//!
//! A lexer, a declaration-level tree, structural queries over token trees
//! and a gofmt-style printer. The printer output is stable: parsing printed
//! text and printing it again yields the same bytes.

mod error;
mod lexer;
mod list;
mod parser;
mod printer;
pub mod query;
mod token;
mod tree;


pub use error::ParseError;
pub use lexer::tokenize;
pub use list::{join_items, join_lines, split_items, split_lines, trailing_ident, ListItem};
pub use printer::{inline_text, print_decl, print_file, print_lines};
pub use token::{build_trees, is_keyword, Delim, Group, Token, TokenKind, TokenTree};
pub use tree::{
    Block, Decl, Field, FuncDecl, ImportDecl, ImportSpec, InterfaceElem, Item, Line, Member,
    Method, Param, ParamList, Receiver, SourceFile, TypeDecl, TypeExpr, ValueDecl, ValueKeyword,
    ValueSpec,
};

fn trees(src: &str) -> Result<Vec<TokenTree>, ParseError> {
    build_trees(tokenize(src)?)
}

/// Parse a complete Go source file.
pub fn parse_file(src: &str) -> Result<SourceFile, ParseError> {
    parser::parse_source(trees(src)?)
}

/// Parse and re-print a file in canonical layout.
pub fn format_source(src: &str) -> Result<String, ParseError> {
    parse_file(src).map(|file| print_file(&file))
}

/// Parse exactly one top-level declaration, with its doc comments.
pub fn parse_decl(src: &str) -> Result<Decl, ParseError> {
    let (mut decls, _) = parser::parse_decl_lines(split_lines(trees(src)?))?;
    if decls.len() != 1 {
        return Err(ParseError::WrongCount {
            what: "declaration",
            count: decls.len(),
        });
    }
    Ok(decls.remove(0))
}

/// Parse a statement sequence.
pub fn parse_stmts(src: &str) -> Result<Vec<Line>, ParseError> {
    Ok(split_lines(trees(src)?))
}

/// Parse exactly one statement.
pub fn parse_stmt(src: &str) -> Result<Line, ParseError> {
    let mut lines = parse_stmts(src)?;
    if lines.len() != 1 || lines[0].is_comment() {
        return Err(ParseError::WrongCount {
            what: "statement",
            count: lines.len(),
        });
    }
    Ok(lines.remove(0))
}

/// Parse a single expression (or type) into token trees.
pub fn parse_expr(src: &str) -> Result<Vec<TokenTree>, ParseError> {
    let mut trees = trees(src)?;
    while trees.last().is_some_and(TokenTree::is_terminator) {
        trees.pop();
    }
    let statements = trees.iter().filter(|t| t.is_terminator()).count() + 1;
    if trees.is_empty() || statements > 1 {
        return Err(ParseError::WrongCount {
            what: "expression",
            count: if trees.is_empty() { 0 } else { statements },
        });
    }
    Ok(trees)
}

/// Parse one entry of a call or composite literal (`Name: m.Name`, `"col"`).
pub fn parse_list_item(src: &str) -> Result<ListItem, ParseError> {
    let mut items = split_items(parse_expr(src)?);
    if items.len() != 1 {
        return Err(ParseError::WrongCount {
            what: "list entry",
            count: items.len(),
        });
    }
    Ok(items.remove(0))
}

/// Parse a struct field line such as ``Name string `json:"name"` ``.
pub fn parse_field(src: &str) -> Result<Field, ParseError> {
    let decl = parse_decl(&format!("type _ struct {{\n{}\n}}", src))?;
    let fields = match decl.item {
        Item::Type(TypeDecl {
            ty: TypeExpr::Struct(fields),
            ..
        }) => fields,
        _ => Vec::new(),
    };
    single(fields, "field")
}

/// Parse an interface element such as `Find(ctx context.Context) error`.
pub fn parse_method(src: &str) -> Result<InterfaceElem, ParseError> {
    let decl = parse_decl(&format!("type _ interface {{\n{}\n}}", src))?;
    let elems = match decl.item {
        Item::Type(TypeDecl {
            ty: TypeExpr::Interface(elems),
            ..
        }) => elems,
        _ => Vec::new(),
    };
    single(elems, "method")
}

/// Parse one parameter group such as `repo WidgetRepository`.
pub fn parse_param(src: &str) -> Result<Param, ParseError> {
    let decl = parse_decl(&format!("func _({})", src))?;
    let mut params = match decl.item {
        Item::Func(func) => func.params.params,
        _ => Vec::new(),
    };
    if params.len() != 1 {
        return Err(ParseError::WrongCount {
            what: "parameter",
            count: params.len(),
        });
    }
    Ok(params.remove(0))
}

fn single<T>(members: Vec<Member<T>>, what: &'static str) -> Result<T, ParseError> {
    let mut items: Vec<T> = members
        .into_iter()
        .filter_map(|m| match m {
            Member::Item(item) => Some(item),
            Member::Comment(_) => None,
        })
        .collect();
    if items.len() != 1 {
        return Err(ParseError::WrongCount {
            what,
            count: items.len(),
        });
    }
    Ok(items.remove(0))
}

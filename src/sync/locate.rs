//! Declaration lookup

use std::fmt;

use crate::syntax::{split_lines, Decl, Item, SourceFile, TokenTree};

/// The kind of top-level declaration a sync targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclKind {
    /// Import declaration, keyed by import path
    Import,
    /// Struct, interface or any other named type
    Type,
    /// Function, or method keyed as `Recv.Name`
    Function,
    /// Package-level `var` or `const`
    Variable,
}

impl DeclKind {
    pub fn of(item: &Item) -> Option<Self> {
        match item {
            Item::Import(_) => Some(DeclKind::Import),
            Item::Type(_) => Some(DeclKind::Type),
            Item::Func(_) => Some(DeclKind::Function),
            Item::Value(_) => Some(DeclKind::Variable),
            Item::Verbatim(_) => None,
        }
    }
}

impl fmt::Display for DeclKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DeclKind::Import => "import",
            DeclKind::Type => "type",
            DeclKind::Function => "func",
            DeclKind::Variable => "var",
        })
    }
}

/// Does `decl` declare `name` as a `kind`?
///
/// Names are compared exactly; a type matches whatever its shape.
pub fn declares(decl: &Decl, kind: DeclKind, name: &str) -> bool {
    match (&decl.item, kind) {
        (Item::Import(imports), DeclKind::Import) => imports.paths().any(|p| p == name),
        (Item::Type(ty), DeclKind::Type) => ty.name == name,
        (Item::Func(func), DeclKind::Function) => func.key() == name,
        (Item::Value(value), DeclKind::Variable) => value.declares(name),
        (Item::Verbatim(trees), DeclKind::Type) => grouped_type_names(trees).any(|n| n == name),
        _ => false,
    }
}

/// Names declared by a `type ( ... )` group.
///
/// The group is kept verbatim, so a type found here is never merged into;
/// its elements end up unplaced instead of being declared a second time.
fn grouped_type_names(trees: &[TokenTree]) -> impl Iterator<Item = String> {
    let specs = match trees {
        [keyword, TokenTree::Group(group)] if keyword.is_keyword("type") => {
            split_lines(group.trees.clone())
        }
        _ => Vec::new(),
    };
    specs
        .into_iter()
        .filter_map(|line| line.tokens.first().and_then(TokenTree::ident).map(str::to_string))
}

/// Index of the first top-level declaration of `kind` named `name`.
pub fn locate(file: &SourceFile, kind: DeclKind, name: &str) -> Option<usize> {
    file.decls.iter().position(|d| declares(d, kind, name))
}

/// Short description for logs and errors (`type Widget`, `func repo.Create`).
pub fn describe(decl: &Decl) -> String {
    match (DeclKind::of(&decl.item), decl.name()) {
        (Some(kind), Some(name)) => format!("{} {}", kind, name),
        (Some(kind), None) => format!("{} declaration", kind),
        (None, _) => "declaration".to_string(),
    }
}

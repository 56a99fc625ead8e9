//! Declaration-level syntax tree
//!
//! Top-level declarations are parsed into structured items; everything below
//! the level the engine merges at (types, expressions, statement bodies) is
//! kept as token trees.

use super::token::{Group, Token, TokenTree};

/// A parsed Go source file
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourceFile {
    /// Comments above the package clause (build tags, license, generated markers)
    pub header: Vec<Token>,
    /// A blank line separates `header` from the package clause
    pub header_detached: bool,
    pub package: String,
    pub decls: Vec<Decl>,
    /// Comments after the last declaration
    pub trailing: Vec<Token>,
}

impl SourceFile {
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            ..Self::default()
        }
    }
}

/// A top-level declaration with its surrounding comments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decl {
    pub doc: Vec<Token>,
    /// A blank line separates `doc` from the declaration
    pub detached_doc: bool,
    pub item: Item,
    /// Comment on the same line as the declaration's last token
    pub comment: Option<Token>,
}

impl Decl {
    pub fn new(item: Item) -> Self {
        Self {
            doc: Vec::new(),
            detached_doc: false,
            item,
            comment: None,
        }
    }

    /// The name used to locate this declaration, if it has exactly one.
    pub fn name(&self) -> Option<String> {
        match &self.item {
            Item::Type(t) => Some(t.name.clone()),
            Item::Func(f) => Some(f.key()),
            Item::Value(v) => {
                let mut specs = v.specs.iter().filter_map(Member::item);
                match (specs.next(), specs.next()) {
                    (Some(spec), None) => spec.names.first().cloned(),
                    _ => None,
                }
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    Import(ImportDecl),
    Type(TypeDecl),
    Func(FuncDecl),
    Value(ValueDecl),
    /// Top-level construct the engine never targets, printed as-is
    Verbatim(Vec<TokenTree>),
}

/// A list entry that is either a real member or a free-standing comment line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Member<T> {
    Item(T),
    Comment(Token),
}

impl<T> Member<T> {
    pub fn item(&self) -> Option<&T> {
        match self {
            Member::Item(item) => Some(item),
            Member::Comment(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImportDecl {
    pub specs: Vec<Member<ImportSpec>>,
    /// Written as `import ( ... )`
    pub grouped: bool,
}

impl ImportDecl {
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.specs
            .iter()
            .filter_map(Member::item)
            .map(|s| s.path.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    pub alias: Option<String>,
    /// Import path without quotes
    pub path: String,
    pub comment: Option<Token>,
    pub blank_before: bool,
}

impl ImportSpec {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            alias: None,
            path: path.into(),
            comment: None,
            blank_before: false,
        }
    }

    pub fn aliased(alias: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            alias: Some(alias.into()),
            ..Self::new(path)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    pub name: String,
    pub type_params: Option<Group>,
    /// `type A = B`
    pub alias: bool,
    pub ty: TypeExpr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    Struct(Vec<Member<Field>>),
    Interface(Vec<Member<InterfaceElem>>),
    Other(Vec<TokenTree>),
}

/// A struct field; `names` is empty for embedded fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub names: Vec<String>,
    pub ty: Vec<TokenTree>,
    /// Tag literal including its quotes
    pub tag: Option<String>,
    pub comment: Option<Token>,
    pub blank_before: bool,
}

impl Field {
    /// Names this field can be matched by; embedded fields use their type name.
    pub fn keys(&self) -> Vec<&str> {
        if !self.names.is_empty() {
            return self.names.iter().map(String::as_str).collect();
        }
        self.ty
            .iter()
            .rev()
            .find_map(TokenTree::ident)
            .into_iter()
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterfaceElem {
    Method(Method),
    /// Embedded interface or type-set term
    Embedded {
        ty: Vec<TokenTree>,
        comment: Option<Token>,
        blank_before: bool,
    },
}

impl InterfaceElem {
    pub fn name(&self) -> Option<&str> {
        match self {
            InterfaceElem::Method(m) => Some(&m.name),
            InterfaceElem::Embedded { ty, .. } => ty.iter().rev().find_map(TokenTree::ident),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    pub name: String,
    pub params: ParamList,
    pub results: Vec<TokenTree>,
    pub comment: Option<Token>,
    pub blank_before: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncDecl {
    pub recv: Option<Receiver>,
    pub name: String,
    pub type_params: Option<Group>,
    pub params: ParamList,
    pub results: Vec<TokenTree>,
    pub body: Option<Block>,
}

impl FuncDecl {
    /// Locator name: `Name` for functions, `Recv.Name` for methods.
    pub fn key(&self) -> String {
        match self.recv.as_ref().and_then(Receiver::base_type) {
            Some(base) => format!("{}.{}", base, self.name),
            None => self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receiver {
    pub name: Option<String>,
    pub ty: Vec<TokenTree>,
}

impl Receiver {
    /// Receiver type without pointer and type arguments (`*Repo[T]` -> `Repo`).
    pub fn base_type(&self) -> Option<&str> {
        self.ty.iter().find_map(TokenTree::ident)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParamList {
    pub params: Vec<Param>,
    pub multiline: bool,
}

/// A parameter group: `a, b int` has two names and one type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub names: Vec<String>,
    pub ty: Vec<TokenTree>,
}

/// A function body
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Block {
    pub lines: Vec<Line>,
}

impl Block {
    /// Index of the final `return` statement, when the body ends with one.
    pub fn final_return(&self) -> Option<usize> {
        let last = self.lines.iter().rposition(|l| !l.is_comment())?;
        self.lines[last]
            .tokens
            .first()
            .is_some_and(|t| t.is_keyword("return"))
            .then_some(last)
    }
}

/// One statement (or comment line) inside a block, with its trailing comment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub tokens: Vec<TokenTree>,
    pub comment: Option<Token>,
}

impl Line {
    pub fn new(tokens: Vec<TokenTree>) -> Self {
        Self {
            tokens,
            comment: None,
        }
    }

    pub fn is_comment(&self) -> bool {
        self.tokens.iter().all(TokenTree::is_comment)
    }

    pub fn blank_before(&self) -> bool {
        self.tokens.first().is_some_and(|t| t.breaks() >= 2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKeyword {
    Var,
    Const,
}

impl ValueKeyword {
    pub fn as_str(self) -> &'static str {
        match self {
            ValueKeyword::Var => "var",
            ValueKeyword::Const => "const",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueDecl {
    pub keyword: ValueKeyword,
    pub specs: Vec<Member<ValueSpec>>,
    /// Written as `var ( ... )`
    pub grouped: bool,
}

impl ValueDecl {
    pub fn declares(&self, name: &str) -> bool {
        self.specs
            .iter()
            .filter_map(Member::item)
            .any(|s| s.names.iter().any(|n| n == name))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueSpec {
    pub names: Vec<String>,
    pub ty: Vec<TokenTree>,
    pub values: Vec<TokenTree>,
    pub comment: Option<Token>,
    pub blank_before: bool,
}

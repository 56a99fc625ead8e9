//! Desired sub-parts of a declaration

use std::fmt;

use crate::syntax::{
    self, inline_text, Field, ImportSpec, InterfaceElem, Line, ListItem, Param, ParseError,
};

use super::matcher::{literal_key, Matcher, Placement};

/// One element a generator wants present in a declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    /// Import spec, merged into the file's import declaration
    Import(ImportSpec),
    /// Struct field
    Field(Field),
    /// Interface method or embedded interface
    Method(InterfaceElem),
    /// Function parameter group
    Param(Param),
    /// Entry of the composite literal of type `literal` inside the declaration
    CompositeEntry { literal: String, entry: ListItem },
    /// Argument of the call to `callee` inside the declaration
    CallArgument { callee: String, argument: ListItem },
    /// Body statement located by fingerprint
    Statement {
        matcher: Matcher,
        placement: Placement,
        line: Line,
    },
}

impl Element {
    pub fn import(path: impl Into<String>) -> Self {
        Element::Import(ImportSpec::new(path))
    }

    pub fn import_as(alias: impl Into<String>, path: impl Into<String>) -> Self {
        Element::Import(ImportSpec::aliased(alias, path))
    }

    /// A struct field such as ``Price int64 `db:"price"` ``.
    pub fn field(src: &str) -> Result<Self, ParseError> {
        syntax::parse_field(src).map(Element::Field)
    }

    /// An interface method such as `Delete(ctx context.Context, id int64) error`.
    pub fn method(src: &str) -> Result<Self, ParseError> {
        syntax::parse_method(src).map(Element::Method)
    }

    /// A parameter group such as `repo WidgetRepository`.
    pub fn param(src: &str) -> Result<Self, ParseError> {
        syntax::parse_param(src).map(Element::Param)
    }

    /// A `Key: value` entry of the `literal` composite literal.
    pub fn entry(literal: impl Into<String>, src: &str) -> Result<Self, ParseError> {
        Ok(Element::CompositeEntry {
            literal: literal.into(),
            entry: syntax::parse_list_item(src)?,
        })
    }

    /// An argument of the `callee` call, e.g. `("fx.Provide", "NewWidgetRepository")`.
    pub fn argument(callee: impl Into<String>, src: &str) -> Result<Self, ParseError> {
        Ok(Element::CallArgument {
            callee: callee.into(),
            argument: syntax::parse_list_item(src)?,
        })
    }

    pub fn statement(matcher: Matcher, placement: Placement, src: &str) -> Result<Self, ParseError> {
        Ok(Element::Statement {
            matcher,
            placement,
            line: syntax::parse_stmt(src)?,
        })
    }

    /// A guard block for an optional field, inserted before the final return.
    pub fn guard(field: impl Into<String>, src: &str) -> Result<Self, ParseError> {
        Self::statement(Matcher::condition_field(field), Placement::BeforeReturn, src)
    }

    /// How an existing element with the same identity is recognized.
    pub fn matcher(&self) -> Matcher {
        match self {
            Element::Import(spec) => Matcher::name(spec.path.clone()),
            Element::Field(field) => Matcher::name(field.keys().first().copied().unwrap_or("_")),
            Element::Method(elem) => Matcher::name(elem.name().unwrap_or("_")),
            Element::Param(param) => Matcher::name(param_key(param)),
            Element::CompositeEntry { entry, .. } => match entry.key() {
                Some(key) => Matcher::name(key),
                None => Matcher::literal(literal_key(entry.code())),
            },
            Element::CallArgument { argument, .. } => Matcher::literal(literal_key(argument.code())),
            Element::Statement { matcher, .. } => matcher.clone(),
        }
    }

    /// Identity key, as reported in outcomes
    pub fn key(&self) -> String {
        self.matcher().to_string()
    }

    /// What the element is merged into, for unplaced-element reports
    pub fn target(&self) -> String {
        match self {
            Element::Import(_) => "import declaration".to_string(),
            Element::Field(_) => "struct type".to_string(),
            Element::Method(_) => "interface type".to_string(),
            Element::Param(_) => "function signature".to_string(),
            Element::CompositeEntry { literal, .. } => format!("{}{{...}} literal", literal),
            Element::CallArgument { callee, .. } => format!("{}(...) call", callee),
            Element::Statement { .. } => "function body".to_string(),
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Import(spec) => write!(f, "import \"{}\"", spec.path),
            Element::Field(field) => write!(f, "field {}", field.keys().join(", ")),
            Element::Method(_) => write!(f, "method {}", self.key()),
            Element::Param(_) => write!(f, "param {}", self.key()),
            Element::CompositeEntry { literal, entry } => {
                write!(f, "{} entry {}", literal, inline_text(entry.code()))
            }
            Element::CallArgument { callee, argument } => {
                write!(f, "{} argument {}", callee, inline_text(argument.code()))
            }
            Element::Statement { matcher, .. } => write!(f, "statement ({})", matcher),
        }
    }
}

/// Parameters are keyed by their first name; unnamed ones by their type.
fn param_key(param: &Param) -> String {
    match param.names.first() {
        Some(name) => name.clone(),
        None => inline_text(&param.ty),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_element_is_keyed_by_name() {
        let element = Element::field("Price int64 `db:\"price\"`").unwrap();
        assert_eq!(element.matcher(), Matcher::name("Price"));
        assert_eq!(element.to_string(), "field Price");
    }

    #[test]
    fn call_argument_is_keyed_by_literal_value() {
        let element = Element::argument("Columns", "\"price\"").unwrap();
        assert_eq!(element.matcher(), Matcher::literal("price"));
        assert_eq!(element.target(), "Columns(...) call");
    }

    #[test]
    fn composite_entry_prefers_its_key() {
        let keyed = Element::entry("Widget", "Price: price").unwrap();
        assert_eq!(keyed.matcher(), Matcher::name("Price"));
        let positional = Element::entry("Pair", "left").unwrap();
        assert_eq!(positional.matcher(), Matcher::literal("left"));
    }

    #[test]
    fn guard_goes_before_return() {
        let element = Element::guard("Name", "if u.Name != nil {\n\tw.Name = *u.Name\n}").unwrap();
        match element {
            Element::Statement { placement, matcher, .. } => {
                assert_eq!(placement, Placement::BeforeReturn);
                assert_eq!(matcher, Matcher::condition_field("Name"));
            }
            other => panic!("unexpected element {other:?}"),
        }
    }

    #[test]
    fn malformed_fragment_is_a_parse_error() {
        assert!(Element::field("Price int64 {").is_err());
        assert!(Element::statement(Matcher::callee("f"), Placement::End, "f()\ng()").is_err());
    }
}

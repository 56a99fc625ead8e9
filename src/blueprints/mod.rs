//! Representative generators for one entity
//!
//! Every generator is a pure function of an [`Entity`] and a [`Layout`]. It
//! builds the canonical declarations and the elements that must exist in
//! them, and never looks at what is on disk; the synchronizer does the rest.
//!
//! ## Usage
//!
//! ```ignore
//! let entity = Entity::new("Widget")
//!     .with_field(EntityField::new("Name", "string"))
//!     .with_field(EntityField::new("Price", "int64").optional());
//! let layout = Layout::new(".", "example.com/shop");
//! entity_pass(&entity, &layout)?.run(&Synchronizer::new(config.sync))?;
//! ```

mod model;
mod postgres;
mod repository;
mod usecase;
mod wiring;

use std::path::{Path, PathBuf};

use crate::error::{ScaffoldError, ScaffoldResult};
use crate::sync::{Bootstrap, DeclKind, Element, GenerationPass, SyncRequest};
use crate::syntax::{is_keyword, ImportSpec, ParseError};

/// One field of the model description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityField {
    pub name: String,
    pub go_type: String,
    /// Struct tag without backquotes; derived from the column when unset
    pub tag: Option<String>,
    /// Settable through a partial update
    pub optional: bool,
}

impl EntityField {
    pub fn new(name: impl Into<String>, go_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            go_type: go_type.into(),
            tag: None,
            optional: false,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// `CreatedAt` → `created_at`
    pub fn column(&self) -> String {
        snake_case(&self.name)
    }

    /// `CreatedAt` → `createdAt`
    pub fn var_name(&self) -> String {
        lower_camel(&self.name)
    }

    pub fn tag(&self) -> String {
        match &self.tag {
            Some(tag) => tag.clone(),
            None => format!("json:\"{c}\" db:\"{c}\"", c = self.column()),
        }
    }

    /// Package qualifiers in the field type (`time` for `map[string]*time.Time`).
    fn packages(&self) -> impl Iterator<Item = &str> {
        self.go_type
            .split(|c: char| !(c.is_alphanumeric() || c == '_' || c == '.'))
            .filter_map(|word| word.split_once('.').map(|(pkg, _)| pkg))
            .filter(|pkg| !pkg.is_empty())
    }
}

/// An entity of the model description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    /// Exported Go name, e.g. `Widget`
    pub name: String,
    /// File stem, e.g. `widget`
    pub stem: String,
    pub table: String,
    pub fields: Vec<EntityField>,
}

impl Entity {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let stem = snake_case(&name);
        Self {
            table: format!("{}s", stem),
            stem,
            name,
            fields: Vec::new(),
        }
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    pub fn with_field(mut self, field: EntityField) -> Self {
        self.fields.push(field);
        self
    }

    pub fn var_name(&self) -> String {
        lower_camel(&self.name)
    }

    fn optional_fields(&self) -> impl Iterator<Item = &EntityField> {
        self.fields.iter().filter(|f| f.optional)
    }

    /// Standard-library packages the field types refer to.
    fn field_imports(&self) -> Vec<ImportSpec> {
        let mut paths: Vec<&str> = Vec::new();
        for pkg in self.fields.iter().flat_map(EntityField::packages) {
            if !paths.contains(&pkg) {
                paths.push(pkg);
            }
        }
        paths.into_iter().map(ImportSpec::new).collect()
    }
}

/// Where the generated project lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub root: PathBuf,
    /// Go module path, e.g. `example.com/shop`
    pub module: String,
}

impl Layout {
    pub fn new(root: impl Into<PathBuf>, module: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            module: module.into(),
        }
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// Import spec for a package of the generated module.
    pub fn import(&self, package: &str) -> ImportSpec {
        ImportSpec::new(format!("{}/{}", self.module, package))
    }
}

/// All generators for one entity, in dependency order.
pub fn entity_pass(entity: &Entity, layout: &Layout) -> ScaffoldResult<GenerationPass> {
    Ok(GenerationPass::new()
        .stage(model::stage(entity, layout)?)
        .stage(repository::stage(entity, layout)?)
        .stage(usecase::stage(entity, layout)?)
        .stage(postgres::stage(entity, layout)?)
        .stage(wiring::stage(entity, layout)?))
}

/// Attach the declaration name to fragment parse errors.
trait InTemplate<T> {
    fn in_template(self, name: &str) -> ScaffoldResult<T>;
}

impl<T> InTemplate<T> for Result<T, ParseError> {
    fn in_template(self, name: &str) -> ScaffoldResult<T> {
        self.map_err(|source| ScaffoldError::Template {
            name: name.to_string(),
            source,
        })
    }
}

fn block(lines: &[String]) -> String {
    lines.iter().map(|line| format!("\t{}\n", line)).collect()
}

/// A struct type whose fields are all ensured.
fn struct_request(
    path: &Path,
    bootstrap: &Bootstrap,
    name: &str,
    fields: &[String],
) -> ScaffoldResult<SyncRequest> {
    let template = if fields.is_empty() {
        format!("type {} struct{{}}", name)
    } else {
        format!("type {} struct {{\n{}}}", name, block(fields))
    };
    let elements = fields
        .iter()
        .map(|f| Element::field(f).in_template(name))
        .collect::<ScaffoldResult<Vec<_>>>()?;
    Ok(
        SyncRequest::from_source(path, DeclKind::Type, name, bootstrap.clone(), &template)?
            .with_elements(elements),
    )
}

/// An interface type whose methods are all ensured.
fn interface_request(
    path: &Path,
    bootstrap: &Bootstrap,
    name: &str,
    methods: &[String],
) -> ScaffoldResult<SyncRequest> {
    let template = format!("type {} interface {{\n{}}}", name, block(methods));
    let elements = methods
        .iter()
        .map(|m| Element::method(m).in_template(name))
        .collect::<ScaffoldResult<Vec<_>>>()?;
    Ok(
        SyncRequest::from_source(path, DeclKind::Type, name, bootstrap.clone(), &template)?
            .with_elements(elements),
    )
}

fn snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_lower) {
                out.push('_');
            }
        }
        out.extend(c.to_lowercase());
    }
    out
}

fn lower_camel(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let upper = chars.iter().take_while(|c| c.is_uppercase()).count();
    // keep the last capital of an acronym that starts a word: HTTPServer → httpServer
    let lower = match upper {
        n if n == chars.len() => n,
        0 | 1 => upper,
        n => n - 1,
    };
    let mut out: String = chars[..lower].iter().flat_map(|c| c.to_lowercase()).collect();
    out.extend(&chars[lower..]);
    if is_keyword(&out) {
        out.push_str("Value");
    }
    out
}

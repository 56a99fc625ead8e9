//! Element merging
//!
//! Every desired element is looked up among the existing elements (and the
//! ones already appended in the same pass). A hit leaves the existing element
//! untouched; a miss appends the desired one. Nothing is ever removed or
//! reordered.

use crate::syntax::query::{find_call, find_composite, group_at_mut, GroupPath};
use crate::syntax::{
    inline_text, join_items, split_items, Decl, Field, Group, ImportDecl, ImportSpec,
    InterfaceElem, Item, Line, ListItem, Member, Method, Param, TokenTree, TypeDecl, TypeExpr,
};

use super::conflict::TemplateConflict;
use super::element::Element;
use super::matcher::{Matcher, Placement};

/// What a merge pass did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeLog {
    /// Keys of appended elements, in order
    pub appended: Vec<String>,
    pub conflicts: Vec<TemplateConflict>,
    /// Elements whose target was not found in the declaration
    pub unplaced: Vec<String>,
}

/// An element that can be recognized by a [`Matcher`] and compared by content
pub trait Keyed {
    fn matched_by(&self, matcher: &Matcher) -> bool;

    /// Normalized content; equal content under the same key is not a conflict.
    fn content(&self) -> String;
}

impl Keyed for Field {
    fn matched_by(&self, matcher: &Matcher) -> bool {
        matcher.matches_names(self.keys())
    }

    fn content(&self) -> String {
        let ty = inline_text(&self.ty);
        match &self.tag {
            Some(tag) => format!("{} {}", ty, tag),
            None => ty,
        }
    }
}

impl Keyed for InterfaceElem {
    fn matched_by(&self, matcher: &Matcher) -> bool {
        matcher.matches_names(self.name())
    }

    fn content(&self) -> String {
        match self {
            InterfaceElem::Method(method) => signature(method),
            InterfaceElem::Embedded { ty, .. } => inline_text(ty),
        }
    }
}

impl Keyed for Param {
    fn matched_by(&self, matcher: &Matcher) -> bool {
        if self.names.is_empty() {
            return matcher.matches_names([inline_text(&self.ty).as_str()]);
        }
        matcher.matches_names(self.names.iter().map(String::as_str))
    }

    fn content(&self) -> String {
        inline_text(&self.ty)
    }
}

impl Keyed for ImportSpec {
    fn matched_by(&self, matcher: &Matcher) -> bool {
        matcher.matches_names([self.path.as_str()])
    }

    fn content(&self) -> String {
        match &self.alias {
            Some(alias) => format!("{} \"{}\"", alias, self.path),
            None => format!("\"{}\"", self.path),
        }
    }
}

impl Keyed for ListItem {
    fn matched_by(&self, matcher: &Matcher) -> bool {
        matcher.matches_item(self)
    }

    fn content(&self) -> String {
        inline_text(self.code())
    }
}

impl Keyed for Line {
    fn matched_by(&self, matcher: &Matcher) -> bool {
        matcher.matches_line(self)
    }

    fn content(&self) -> String {
        inline_text(&self.tokens)
    }
}

impl<T: Keyed> Keyed for Member<T> {
    fn matched_by(&self, matcher: &Matcher) -> bool {
        self.item().is_some_and(|item| item.matched_by(matcher))
    }

    fn content(&self) -> String {
        self.item().map(Keyed::content).unwrap_or_default()
    }
}

fn signature(method: &Method) -> String {
    let params: Vec<String> = method
        .params
        .params
        .iter()
        .map(|p| {
            let ty = inline_text(&p.ty);
            if p.names.is_empty() {
                ty
            } else {
                format!("{} {}", p.names.join(", "), ty)
            }
        })
        .collect();
    let results = inline_text(&method.results);
    if results.is_empty() {
        format!("({})", params.join(", "))
    } else {
        format!("({}) {}", params.join(", "), results)
    }
}

/// Ensure one desired element is present in `existing`.
///
/// Returns `true` when it was inserted. `at` is the insertion index for a
/// missing element, `None` meaning the end.
pub fn ensure<T: Keyed>(
    existing: &mut Vec<T>,
    matcher: &Matcher,
    desired: T,
    at: Option<usize>,
    decl: &str,
    log: &mut MergeLog,
) -> bool {
    if let Some(found) = existing.iter().find(|e| e.matched_by(matcher)) {
        let (have, want) = (found.content(), desired.content());
        if have != want {
            log.conflicts.push(TemplateConflict {
                decl: decl.to_string(),
                key: matcher.to_string(),
                existing: have,
                desired: want,
            });
        }
        return false;
    }
    match at {
        Some(index) if index <= existing.len() => existing.insert(index, desired),
        _ => existing.push(desired),
    }
    log.appended.push(matcher.to_string());
    true
}

/// Merge a desired list into an existing one, appending what is missing in
/// desired order.
pub fn merge<T: Keyed + Clone>(
    existing: &mut Vec<T>,
    desired: &[(Matcher, T)],
    decl: &str,
    log: &mut MergeLog,
) {
    for (matcher, item) in desired {
        ensure(existing, matcher, item.clone(), None, decl, log);
    }
}

/// Merge import specs into an import declaration.
pub fn merge_imports(imports: &mut ImportDecl, specs: &[ImportSpec], log: &mut MergeLog) {
    let mut added = false;
    for spec in specs {
        let matcher = Matcher::name(spec.path.clone());
        added |= ensure(
            &mut imports.specs,
            &matcher,
            Member::Item(spec.clone()),
            None,
            "import",
            log,
        );
    }
    if added && imports.specs.len() > 1 {
        imports.grouped = true;
    }
}

/// Merge non-import elements into a declaration.
pub fn merge_decl(decl: &mut Decl, name: &str, elements: &[Element], log: &mut MergeLog) {
    for element in elements {
        if !merge_element(decl, name, element, log) {
            log.unplaced.push(format!("{} (no {})", element, element.target()));
        }
    }
}

/// Returns `false` when the element's target does not exist in `decl`.
fn merge_element(decl: &mut Decl, name: &str, element: &Element, log: &mut MergeLog) -> bool {
    let matcher = element.matcher();
    match element {
        Element::Import(_) => false,
        Element::Field(field) => match &mut decl.item {
            Item::Type(TypeDecl {
                ty: TypeExpr::Struct(fields),
                ..
            }) => {
                ensure(fields, &matcher, Member::Item(field.clone()), None, name, log);
                true
            }
            _ => false,
        },
        Element::Method(method) => match &mut decl.item {
            Item::Type(TypeDecl {
                ty: TypeExpr::Interface(elems),
                ..
            }) => {
                ensure(elems, &matcher, Member::Item(method.clone()), None, name, log);
                true
            }
            _ => false,
        },
        Element::Param(param) => match &mut decl.item {
            Item::Func(func) => {
                ensure(&mut func.params.params, &matcher, param.clone(), None, name, log);
                true
            }
            _ => false,
        },
        Element::CompositeEntry { literal, entry } => {
            let group = find_group_mut(decl, |trees| find_composite(trees, literal));
            merge_into_group(group, &matcher, entry, name, log)
        }
        Element::CallArgument { callee, argument } => {
            let group = find_group_mut(decl, |trees| find_call(trees, callee));
            merge_into_group(group, &matcher, argument, name, log)
        }
        Element::Statement {
            placement, line, ..
        } => match &mut decl.item {
            Item::Func(func) => match &mut func.body {
                Some(body) => {
                    let at = match placement {
                        Placement::End => None,
                        Placement::BeforeReturn => body.final_return(),
                    };
                    ensure(&mut body.lines, &matcher, line.clone(), at, name, log);
                    true
                }
                None => false,
            },
            _ => false,
        },
    }
}

fn merge_into_group(
    group: Option<&mut Group>,
    matcher: &Matcher,
    desired: &ListItem,
    decl: &str,
    log: &mut MergeLog,
) -> bool {
    let Some(group) = group else {
        return false;
    };
    let mut items = split_items(group.trees.clone());
    if ensure(&mut items, matcher, desired.clone(), None, decl, log) {
        group.trees = join_items(items, group.is_multiline());
    }
    true
}

/// Token sequences of a declaration that may hold expressions.
fn expression_streams(item: &mut Item) -> Vec<&mut Vec<TokenTree>> {
    match item {
        Item::Func(func) => match &mut func.body {
            Some(body) => body.lines.iter_mut().map(|line| &mut line.tokens).collect(),
            None => Vec::new(),
        },
        Item::Value(value) => value
            .specs
            .iter_mut()
            .filter_map(|member| match member {
                Member::Item(spec) => Some(&mut spec.values),
                Member::Comment(_) => None,
            })
            .collect(),
        Item::Type(TypeDecl {
            ty: TypeExpr::Other(trees),
            ..
        }) => vec![trees],
        Item::Verbatim(trees) => vec![trees],
        _ => Vec::new(),
    }
}

/// First group, in source order, that `find` locates inside the declaration.
fn find_group_mut<'a>(
    decl: &'a mut Decl,
    find: impl Fn(&[TokenTree]) -> Option<GroupPath>,
) -> Option<&'a mut Group> {
    for trees in expression_streams(&mut decl.item) {
        if let Some(path) = find(trees) {
            return group_at_mut(trees, &path);
        }
    }
    None
}

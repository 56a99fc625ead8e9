//! Domain model: entity struct, partial update and constructor

use std::path::Path;

use crate::error::ScaffoldResult;
use crate::sync::{Bootstrap, DeclKind, Element, Stage, SyncRequest};

use super::{block, struct_request, Entity, EntityField, InTemplate, Layout};

pub(super) fn stage(entity: &Entity, layout: &Layout) -> ScaffoldResult<Stage> {
    let path = layout.path(&format!("internal/domain/models/{}.go", entity.stem));
    let bootstrap = Bootstrap::new("models");

    let mut fields = vec!["ID int64 `json:\"id\" db:\"id\"`".to_string()];
    fields.extend(entity.fields.iter().map(|f| format!("{} {} `{}`", f.name, f.go_type, f.tag())));
    let model = struct_request(&path, &bootstrap, &entity.name, &fields)?
        .with_imports(entity.field_imports());

    let update_fields: Vec<String> = entity
        .optional_fields()
        .map(|f| format!("{} {} `json:\"{},omitempty\"`", f.name, pointer(f), f.column()))
        .collect();
    let update = struct_request(&path, &bootstrap, &update_name(entity), &update_fields)?
        .with_imports(entity.field_imports());

    Ok(Stage::new("models")
        .with_request(model)
        .with_request(update)
        .with_request(apply(entity, &path, &bootstrap)?)
        .with_request(constructor(entity, &path, &bootstrap)?))
}

fn update_name(entity: &Entity) -> String {
    format!("Update{}", entity.name)
}

fn pointer(field: &EntityField) -> String {
    if field.go_type.starts_with('*') {
        field.go_type.clone()
    } else {
        format!("*{}", field.go_type)
    }
}

/// `if u.Price != nil { widget.Price = *u.Price }`
fn guard(entity: &Entity, field: &EntityField) -> String {
    let deref = if field.go_type.starts_with('*') { "" } else { "*" };
    format!(
        "if u.{f} != nil {{\n\t{v}.{f} = {d}u.{f}\n}}",
        f = field.name,
        v = entity.var_name(),
        d = deref
    )
}

/// `Update<Entity>.Apply`, one guard per optional field.
fn apply(entity: &Entity, path: &Path, bootstrap: &Bootstrap) -> ScaffoldResult<SyncRequest> {
    let update = update_name(entity);
    let name = format!("{}.Apply", update);
    let var = entity.var_name();

    let guards: Vec<(String, String)> = entity
        .optional_fields()
        .map(|f| (f.name.clone(), guard(entity, f)))
        .collect();
    let mut body: Vec<String> = guards
        .iter()
        .flat_map(|(_, src)| src.lines().map(str::to_string).collect::<Vec<_>>())
        .collect();
    body.push(format!("return {}", var));
    let template = format!(
        "func (u {u}) Apply({v} *{e}) *{e} {{\n{b}}}",
        u = update,
        v = var,
        e = entity.name,
        b = block(&body)
    );

    let elements = guards
        .iter()
        .map(|(field, src)| Element::guard(field.as_str(), src).in_template(&name))
        .collect::<ScaffoldResult<Vec<_>>>()?;
    Ok(
        SyncRequest::from_source(path, DeclKind::Function, name, bootstrap.clone(), &template)?
            .with_elements(elements),
    )
}

/// `New<Entity>` taking every field and returning a composite literal.
fn constructor(entity: &Entity, path: &Path, bootstrap: &Bootstrap) -> ScaffoldResult<SyncRequest> {
    let name = format!("New{}", entity.name);
    let params: Vec<String> = entity
        .fields
        .iter()
        .map(|f| format!("{} {}", f.var_name(), f.go_type))
        .collect();
    let entries: Vec<String> = entity
        .fields
        .iter()
        .map(|f| format!("{}: {}", f.name, f.var_name()))
        .collect();

    let literal = if entries.is_empty() {
        format!("&{}{{}}", entity.name)
    } else {
        let lines: String = entries.iter().map(|e| format!("\t\t{},\n", e)).collect();
        format!("&{}{{\n{}\t}}", entity.name, lines)
    };
    let template = format!(
        "func {n}({p}) *{e} {{\n\treturn {l}\n}}",
        n = name,
        p = params.join(", "),
        e = entity.name,
        l = literal
    );

    let mut elements = params
        .iter()
        .map(|p| Element::param(p).in_template(&name))
        .collect::<ScaffoldResult<Vec<_>>>()?;
    for entry in &entries {
        elements.push(Element::entry(entity.name.as_str(), entry).in_template(&name)?);
    }
    Ok(
        SyncRequest::from_source(path, DeclKind::Function, name, bootstrap.clone(), &template)?
            .with_elements(elements),
    )
}

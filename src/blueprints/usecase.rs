//! Use-case interface, implementation struct and constructor

use std::path::Path;

use crate::error::ScaffoldResult;
use crate::sync::{Bootstrap, DeclKind, Element, Stage, SyncRequest};
use crate::syntax::ImportSpec;

use super::repository::repository_name;
use super::{interface_request, lower_camel, struct_request, Entity, InTemplate, Layout};

pub(super) fn usecase_name(entity: &Entity) -> String {
    format!("{}Usecase", entity.name)
}

/// Constructor dependencies as `(name, type)`
fn dependencies(entity: &Entity) -> Vec<(String, String)> {
    let repository = repository_name(entity);
    vec![
        (lower_camel(&repository), format!("repositories.{}", repository)),
        ("logger".to_string(), "*slog.Logger".to_string()),
    ]
}

pub(super) fn stage(entity: &Entity, layout: &Layout) -> ScaffoldResult<Stage> {
    let path = layout.path(&format!("internal/domain/usecases/{}.go", entity.stem));
    let bootstrap = Bootstrap::new("usecases");
    let imports = [
        ImportSpec::new("context"),
        ImportSpec::new("log/slog"),
        layout.import("internal/domain/models"),
        layout.import("internal/domain/repositories"),
    ];

    let model = format!("*models.{}", entity.name);
    let methods = vec![
        format!("Create(ctx context.Context, create {m}) ({m}, error)", m = model),
        format!("Get(ctx context.Context, id int64) ({}, error)", model),
        format!("List(ctx context.Context) ([]{}, error)", model),
        format!(
            "Update(ctx context.Context, id int64, update *models.Update{}) ({}, error)",
            entity.name, model
        ),
        "Delete(ctx context.Context, id int64) error".to_string(),
    ];
    let interface = interface_request(&path, &bootstrap, &usecase_name(entity), &methods)?
        .with_imports(imports.iter().cloned());

    let fields: Vec<String> = dependencies(entity)
        .into_iter()
        .map(|(name, ty)| format!("{} {}", name, ty))
        .collect();
    let implementation = struct_request(&path, &bootstrap, &impl_name(entity), &fields)?
        .with_imports(imports.iter().cloned());

    Ok(Stage::new("usecases")
        .with_request(interface)
        .with_request(implementation)
        .with_request(constructor(entity, &path, &bootstrap)?))
}

/// `widgetUsecase`
fn impl_name(entity: &Entity) -> String {
    lower_camel(&usecase_name(entity))
}

fn constructor(entity: &Entity, path: &Path, bootstrap: &Bootstrap) -> ScaffoldResult<SyncRequest> {
    let usecase = usecase_name(entity);
    let name = format!("New{}", usecase);
    let dependencies = dependencies(entity);

    let params: Vec<String> = dependencies
        .iter()
        .map(|(name, ty)| format!("{} {}", name, ty))
        .collect();
    let entries: Vec<String> = dependencies
        .iter()
        .map(|(name, _)| format!("{n}: {n}", n = name))
        .collect();
    let lines: String = entries.iter().map(|e| format!("\t\t{},\n", e)).collect();
    let template = format!(
        "func {n}({p}) {u} {{\n\treturn &{i}{{\n{l}\t}}\n}}",
        n = name,
        p = params.join(", "),
        u = usecase,
        i = impl_name(entity),
        l = lines
    );

    let mut elements = params
        .iter()
        .map(|p| Element::param(p).in_template(&name))
        .collect::<ScaffoldResult<Vec<_>>>()?;
    for entry in &entries {
        elements.push(Element::entry(impl_name(entity), entry).in_template(&name)?);
    }
    Ok(
        SyncRequest::from_source(path, DeclKind::Function, name, bootstrap.clone(), &template)?
            .with_elements(elements),
    )
}

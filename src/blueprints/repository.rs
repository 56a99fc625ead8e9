//! Repository port interface

use crate::error::ScaffoldResult;
use crate::sync::{Bootstrap, Stage};
use crate::syntax::ImportSpec;

use super::{interface_request, Entity, Layout};

pub(super) fn repository_name(entity: &Entity) -> String {
    format!("{}Repository", entity.name)
}

pub(super) fn stage(entity: &Entity, layout: &Layout) -> ScaffoldResult<Stage> {
    let path = layout.path(&format!("internal/domain/repositories/{}.go", entity.stem));
    let model = format!("*models.{}", entity.name);
    let var = entity.var_name();
    let methods = vec![
        format!("Create(ctx context.Context, {} {}) error", var, model),
        format!("Get(ctx context.Context, id int64) ({}, error)", model),
        format!("List(ctx context.Context) ([]{}, error)", model),
        format!("Update(ctx context.Context, {} {}) error", var, model),
        "Delete(ctx context.Context, id int64) error".to_string(),
    ];
    let request = interface_request(
        &path,
        &Bootstrap::new("repositories"),
        &repository_name(entity),
        &methods,
    )?
    .with_import(ImportSpec::new("context"))
    .with_import(layout.import("internal/domain/models"));

    Ok(Stage::new("repositories").with_request(request))
}

//! Dependency wiring module shared by every entity

use crate::error::ScaffoldResult;
use crate::sync::{Bootstrap, DeclKind, Element, Stage, SyncRequest};
use crate::syntax::ImportSpec;

use super::repository::repository_name;
use super::usecase::usecase_name;
use super::{Entity, InTemplate, Layout};

const PROVIDERS: &str = "Providers";

pub(super) fn stage(entity: &Entity, layout: &Layout) -> ScaffoldResult<Stage> {
    let path = layout.path("internal/app/providers.go");
    let constructors = [
        format!("postgres.New{}", repository_name(entity)),
        format!("usecases.New{}", usecase_name(entity)),
    ];
    let lines: String = constructors
        .iter()
        .map(|c| format!("\t\t{},\n", c))
        .collect();
    let template = format!(
        "var {} = fx.Options(\n\tfx.Provide(\n{}\t),\n)",
        PROVIDERS, lines
    );

    let elements = constructors
        .iter()
        .map(|c| Element::argument("fx.Provide", c).in_template(PROVIDERS))
        .collect::<ScaffoldResult<Vec<_>>>()?;
    let request = SyncRequest::from_source(
        path,
        DeclKind::Variable,
        PROVIDERS,
        Bootstrap::new("app"),
        &template,
    )?
    .with_import(ImportSpec::new("go.uber.org/fx"))
    .with_import(layout.import("internal/domain/usecases"))
    .with_import(layout.import("internal/repositories/postgres"))
    .with_elements(elements);

    Ok(Stage::new("wiring").with_request(request))
}

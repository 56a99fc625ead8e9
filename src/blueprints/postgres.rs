//! Postgres repository adapter

use std::path::Path;

use crate::error::ScaffoldResult;
use crate::sync::{Bootstrap, DeclKind, Element, Stage, SyncRequest};
use crate::syntax::ImportSpec;

use super::repository::repository_name;
use super::{struct_request, Entity, InTemplate, Layout};

pub(super) fn stage(entity: &Entity, layout: &Layout) -> ScaffoldResult<Stage> {
    let path = layout.path(&format!("internal/repositories/postgres/{}.go", entity.stem));
    let bootstrap = Bootstrap::new("postgres");
    let imports = [
        ImportSpec::new("context"),
        ImportSpec::new("database/sql"),
        ImportSpec::aliased("sq", "github.com/Masterminds/squirrel"),
        layout.import("internal/domain/models"),
        layout.import("internal/domain/repositories"),
    ];
    let name = repository_name(entity);

    let adapter = struct_request(&path, &bootstrap, &name, &["db *sql.DB".to_string()])?
        .with_imports(imports.iter().cloned());

    let constructor = SyncRequest::from_source(
        &path,
        DeclKind::Function,
        format!("New{}", name),
        bootstrap.clone(),
        &format!(
            "func New{n}(db *sql.DB) repositories.{n} {{\n\treturn &{n}{{db: db}}\n}}",
            n = name
        ),
    )?
    .with_imports(imports.iter().cloned());

    Ok(Stage::new("postgres")
        .with_request(adapter)
        .with_request(constructor)
        .with_request(create(entity, &path, &bootstrap)?.with_imports(imports)))
}

/// `Create` builds its insert with one column and one value per field.
fn create(entity: &Entity, path: &Path, bootstrap: &Bootstrap) -> ScaffoldResult<SyncRequest> {
    let name = format!("{}.Create", repository_name(entity));
    let var = entity.var_name();
    let columns: Vec<String> = entity
        .fields
        .iter()
        .map(|f| format!("\"{}\"", f.column()))
        .collect();
    let values: Vec<String> = entity
        .fields
        .iter()
        .map(|f| format!("{}.{}", var, f.name))
        .collect();

    let template = format!(
        "func (r *{repo}) Create(ctx context.Context, {v} *models.{e}) error {{\n\
         \tq := sq.Insert(\"{table}\").\n\
         \t\tColumns({cols}).\n\
         \t\tValues({vals}).\n\
         \t\tSuffix(\"RETURNING id\").\n\
         \t\tPlaceholderFormat(sq.Dollar)\n\
         \treturn q.RunWith(r.db).QueryRowContext(ctx).Scan(&{v}.ID)\n\
         }}",
        repo = repository_name(entity),
        v = var,
        e = entity.name,
        table = entity.table,
        cols = columns.join(", "),
        vals = values.join(", "),
    );

    let mut elements = Vec::with_capacity(columns.len() * 2);
    for column in &columns {
        elements.push(Element::argument("Columns", column).in_template(&name)?);
    }
    for value in &values {
        elements.push(Element::argument("Values", value).in_template(&name)?);
    }
    Ok(
        SyncRequest::from_source(path, DeclKind::Function, name, bootstrap.clone(), &template)?
            .with_elements(elements),
    )
}

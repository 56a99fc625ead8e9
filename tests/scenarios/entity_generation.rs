//! Scenario: Generating and evolving an entity
//!
//! Journey: a developer generates the layers for `Widget`, edits the
//! generated code by hand, adds a field to the model and generates again.
//!
//! Success Criteria:
//! - First pass creates every layer file
//! - Second pass with the same model writes nothing
//! - A new field reaches every layer without losing hand edits

use crate::common::*;
use scaffold::{entity_pass, Entity, EntityField, Layout};

fn widget() -> Entity {
    Entity::new("Widget")
        .with_field(EntityField::new("Name", "string"))
        .with_field(EntityField::new("Price", "int64").optional())
}

fn layout(project: &TestProject) -> Layout {
    Layout::new(project.root.path(), "example.com/shop")
}

/// SCENARIO: first generation creates every layer
#[test]
fn scenario_generates_all_layers() {
    let project = TestProject::new();
    let report = entity_pass(&widget(), &layout(&project))
        .unwrap()
        .run(&project.sync)
        .unwrap();

    assert_eq!(report.conflicts(), 0);
    assert_eq!(report.unplaced(), 0);
    for file in [
        "internal/domain/models/widget.go",
        "internal/domain/repositories/widget.go",
        "internal/domain/usecases/widget.go",
        "internal/repositories/postgres/widget.go",
        "internal/app/providers.go",
    ] {
        assert!(project.exists(file), "{file} was not generated");
    }

    insta::assert_snapshot!(project.read("internal/domain/models/widget.go"), @r#"
package models

type Widget struct {
	ID    int64  `json:"id" db:"id"`
	Name  string `json:"name" db:"name"`
	Price int64  `json:"price" db:"price"`
}

type UpdateWidget struct {
	Price *int64 `json:"price,omitempty"`
}

func (u UpdateWidget) Apply(widget *Widget) *Widget {
	if u.Price != nil {
		widget.Price = *u.Price
	}
	return widget
}

func NewWidget(name string, price int64) *Widget {
	return &Widget{
		Name:  name,
		Price: price,
	}
}
"#);

    let repository = project.read("internal/domain/repositories/widget.go");
    assert!(repository.starts_with(
        "package repositories\n\nimport (\n\t\"context\"\n\t\"example.com/shop/internal/domain/models\"\n)\n"
    ));
    assert!(repository.contains("\tGet(ctx context.Context, id int64) (*models.Widget, error)\n"));

    let postgres = project.read("internal/repositories/postgres/widget.go");
    assert!(postgres.contains("\tsq \"github.com/Masterminds/squirrel\"\n"));
    assert!(postgres.contains("\t\tColumns(\"name\", \"price\").\n"));
    assert!(postgres.contains("\t\tValues(widget.Name, widget.Price).\n"));
}

/// SCENARIO: generating twice is a no-op
#[test]
fn scenario_regeneration_writes_nothing() {
    let project = TestProject::new();
    let pass = entity_pass(&widget(), &layout(&project)).unwrap();

    let first = pass.run(&project.sync).unwrap();
    let second = pass.run(&project.sync).unwrap();

    assert!(first.changed());
    assert!(!second.changed());
    assert_eq!(second.written(), 0);
    assert_eq!(first.outcomes.len(), second.outcomes.len());
}

/// SCENARIO: a new field flows into every layer, hand edits survive
#[test]
fn scenario_new_field_reaches_every_layer() {
    let project = TestProject::new();
    entity_pass(&widget(), &layout(&project))
        .unwrap()
        .run(&project.sync)
        .unwrap();

    let models = "internal/domain/models/widget.go";
    let edited = format!(
        "{}\n// Discounted reports whether the widget is on sale.\nfunc (w *Widget) Discounted() bool {{\n\treturn w.Price < 100\n}}\n",
        project.read(models)
    );
    project.write(models, &edited);

    let evolved = widget().with_field(EntityField::new("Stock", "int").optional());
    let report = entity_pass(&evolved, &layout(&project))
        .unwrap()
        .run(&project.sync)
        .unwrap();
    assert_eq!(report.conflicts(), 0);

    let content = project.read(models);
    assert!(content.contains("\tStock int    `json:\"stock\" db:\"stock\"`\n"), "{content}");
    assert!(content.contains("func (w *Widget) Discounted() bool {\n\treturn w.Price < 100\n}\n"));
    assert!(content.contains(
        "\tif u.Stock != nil {\n\t\twidget.Stock = *u.Stock\n\t}\n\treturn widget\n}"
    ));
    assert!(content.contains("func NewWidget(name string, price int64, stock int) *Widget {"));
    assert!(content.contains("\t\tStock: stock,\n"));

    let postgres = project.read("internal/repositories/postgres/widget.go");
    assert!(postgres.contains("Columns(\"name\", \"price\", \"stock\")"));
    assert!(postgres.contains("Values(widget.Name, widget.Price, widget.Stock)"));
}

/// SCENARIO: a second entity joins the shared wiring module
#[test]
fn scenario_second_entity_extends_wiring() {
    let project = TestProject::new();
    let layout = layout(&project);
    let mut pass = entity_pass(&widget(), &layout).unwrap();
    pass.extend(entity_pass(&Entity::new("Gadget"), &layout).unwrap());

    pass.run(&project.sync).unwrap();

    insta::assert_snapshot!(project.read("internal/app/providers.go"), @r#"
package app

import (
	"go.uber.org/fx"
	"example.com/shop/internal/domain/usecases"
	"example.com/shop/internal/repositories/postgres"
)

var Providers = fx.Options(
	fx.Provide(
		postgres.NewWidgetRepository,
		usecases.NewWidgetUsecase,
		postgres.NewGadgetRepository,
		usecases.NewGadgetUsecase,
	),
)
"#);
}

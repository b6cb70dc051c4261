use super::*;
use crate::schema::testing;
use crate::statement::HazardKind;

fn generator_for(new_schema: &Schema) -> ViewGenerator {
    ViewGenerator::new(new_schema, &PlanOptions::default())
}

fn empty_schema_generator() -> ViewGenerator {
    generator_for(&Schema::default())
}

#[test]
fn add_emits_create_view() {
    let generator = empty_schema_generator();
    let view = testing::view("active_users", "SELECT * FROM users WHERE name IS NOT NULL", &["users"], &[]);

    let statements = generator.add(&view).unwrap();
    assert_eq!(statements.len(), 1);
    assert_eq!(
        statements[0].ddl,
        r#"CREATE VIEW "public"."active_users" AS SELECT * FROM users WHERE name IS NOT NULL"#
    );
    assert!(statements[0].hazards.is_empty());
}

#[test]
fn add_rejects_empty_definition() {
    let generator = empty_schema_generator();
    let view = testing::view("v", "   ", &[], &[]);
    let err = generator.add(&view).unwrap_err();
    assert!(matches!(err, crate::PlanError::GeneratorFailure { .. }));
}

#[test]
fn delete_emits_drop_with_hazard() {
    let generator = empty_schema_generator();
    let view = testing::view("v", "SELECT 1", &[], &[]);

    let statements = generator.delete(&view).unwrap();
    assert_eq!(statements.len(), 1);
    assert_eq!(statements[0].ddl, r#"DROP VIEW "public"."v""#);
    assert_eq!(statements[0].hazards[0].kind, HazardKind::DeletesData);
}

#[test]
fn alter_of_equal_views_is_empty() {
    let generator = empty_schema_generator();
    let view = testing::view("v", "SELECT 1", &[], &[]);
    assert!(generator.alter(&view, &view).unwrap().is_empty());
}

#[test]
fn alter_is_drop_then_create() {
    let generator = empty_schema_generator();
    let old = testing::view("expensive_products", "SELECT * FROM products WHERE price > 100", &["products"], &[]);
    let new = testing::view("expensive_products", "SELECT * FROM products WHERE price > 200", &["products"], &[]);

    let statements = generator.alter(&old, &new).unwrap();
    assert_eq!(statements.len(), 2);
    assert_eq!(statements[0].ddl, r#"DROP VIEW "public"."expensive_products""#);
    assert_eq!(
        statements[1].ddl,
        r#"CREATE VIEW "public"."expensive_products" AS SELECT * FROM products WHERE price > 200"#
    );
    let drops_with_hazard: Vec<_> = statements
        .iter()
        .filter(|s| s.hazards.iter().any(|h| h.kind == HazardKind::DeletesData))
        .collect();
    assert_eq!(drops_with_hazard.len(), 1);
}

#[test]
fn add_alter_deps_point_at_tables_and_views() {
    let generator = empty_schema_generator();
    let view = testing::view("v", "SELECT 1", &["t"], &["w"]);

    let deps = generator.add_alter_deps(&view, None).unwrap();
    assert_eq!(deps.len(), 2);
    let me = view_vertex_id(&view.name, DiffKind::AddAlter);
    assert!(deps.iter().all(|e| e.to == me));
    assert!(deps.iter().any(|e| e.from.kind == ObjectKind::Table));
    assert!(deps.iter().any(|e| e.from.kind == ObjectKind::View));
}

#[test]
fn self_reference_is_ignored() {
    let generator = empty_schema_generator();
    let view = testing::view("v", "SELECT 1", &[], &["v"]);
    let deps = generator.add_alter_deps(&view, None).unwrap();
    assert!(deps.is_empty());
}

#[test]
fn altered_view_runs_before_dropped_old_dependency() {
    // old view read "legacy"; the new schema no longer contains it
    let generator = empty_schema_generator();
    let old = testing::view("v", "SELECT * FROM legacy", &["legacy"], &[]);
    let new = testing::view("v", "SELECT 1", &[], &[]);

    let deps = generator.add_alter_deps(&new, Some(&old)).unwrap();
    assert_eq!(deps.len(), 1);
    assert_eq!(deps[0].from, view_vertex_id(&new.name, DiffKind::AddAlter));
    assert_eq!(deps[0].to.kind, ObjectKind::Table);
    assert_eq!(deps[0].to.diff_kind, DiffKind::Delete);
}

#[test]
fn no_delete_edge_when_old_dependency_survives() {
    // "kept" is still in the new schema, so there is no Delete vertex for it
    let new_schema = Schema {
        tables: vec![testing::table("kept", &[("id", "INT")])],
        ..Default::default()
    };
    let generator = generator_for(&new_schema);
    let old = testing::view("v", "SELECT * FROM kept", &["kept"], &[]);
    let new = testing::view("v", "SELECT 1", &[], &[]);

    let deps = generator.add_alter_deps(&new, Some(&old)).unwrap();
    assert!(deps.is_empty());
}

#[test]
fn delete_deps_run_before_dependency_deletes() {
    let generator = empty_schema_generator();
    let view = testing::view("quarterly_sales", "SELECT 1", &[], &["monthly_sales"]);

    let deps = generator.delete_deps(&view).unwrap();
    assert_eq!(deps.len(), 1);
    assert_eq!(deps[0].from, view_vertex_id(&view.name, DiffKind::Delete));
    assert_eq!(deps[0].to.diff_kind, DiffKind::Delete);
    assert!(deps[0].to.name.contains("monthly_sales"));
}

#[test]
fn delete_deps_skip_surviving_dependencies() {
    let new_schema = Schema {
        tables: vec![testing::table("t", &[("id", "INT")])],
        ..Default::default()
    };
    let generator = generator_for(&new_schema);
    let view = testing::view("v", "SELECT * FROM t", &["t"], &[]);

    let deps = generator.delete_deps(&view).unwrap();
    assert!(deps.is_empty());
}

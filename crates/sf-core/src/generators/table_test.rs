use super::*;
use crate::schema::testing;

fn generator() -> TableGenerator {
    TableGenerator::new(&PlanOptions::default())
}

#[test]
fn add_emits_create_table_with_columns() {
    let mut table = testing::table("users", &[("id", "INT"), ("name", "TEXT")]);
    table.columns[0].nullable = false;
    table.primary_key = vec!["id".to_string()];

    let statements = generator().add(&table).unwrap();
    assert_eq!(statements.len(), 1);
    assert_eq!(
        statements[0].ddl,
        "CREATE TABLE \"public\".\"users\" (\n    \"id\" INT NOT NULL,\n    \"name\" TEXT,\n    PRIMARY KEY (\"id\")\n)"
    );
}

#[test]
fn add_renders_defaults_and_checks() {
    let mut table = testing::table("t", &[("amount", "NUMERIC(10,2)")]);
    table.columns[0].default = Some("0".to_string());
    table.check_constraints = vec![CheckConstraint {
        name: Some("amount_positive".to_string()),
        expression: "amount >= 0".to_string(),
    }];

    let statements = generator().add(&table).unwrap();
    assert!(statements[0].ddl.contains("\"amount\" NUMERIC(10,2) DEFAULT 0"));
    assert!(statements[0]
        .ddl
        .contains("CONSTRAINT \"amount_positive\" CHECK (amount >= 0)"));
}

#[test]
fn delete_emits_drop_with_hazard() {
    let table = testing::table("t", &[("id", "INT")]);
    let statements = generator().delete(&table).unwrap();
    assert_eq!(statements[0].ddl, "DROP TABLE \"public\".\"t\"");
    assert_eq!(statements[0].hazards[0].kind, HazardKind::DeletesData);
}

#[test]
fn alter_of_equal_tables_is_empty() {
    let table = testing::table("t", &[("id", "INT")]);
    assert!(generator().alter(&table, &table).unwrap().is_empty());
}

#[test]
fn alter_adds_new_column() {
    let old = testing::table("t", &[("a", "INT")]);
    let new = testing::table("t", &[("a", "INT"), ("b", "INT")]);

    let statements = generator().alter(&old, &new).unwrap();
    assert_eq!(statements.len(), 1);
    assert_eq!(
        statements[0].ddl,
        "ALTER TABLE \"public\".\"t\" ADD COLUMN \"b\" INT"
    );
}

#[test]
fn alter_drops_removed_column_with_hazard() {
    let old = testing::table("t", &[("a", "INT"), ("b", "INT")]);
    let new = testing::table("t", &[("a", "INT")]);

    let statements = generator().alter(&old, &new).unwrap();
    assert_eq!(statements.len(), 1);
    assert_eq!(
        statements[0].ddl,
        "ALTER TABLE \"public\".\"t\" DROP COLUMN \"b\""
    );
    assert_eq!(statements[0].hazards[0].kind, HazardKind::DeletesData);
}

#[test]
fn alter_drops_before_adds() {
    let old = testing::table("t", &[("a", "INT")]);
    let new = testing::table("t", &[("b", "INT")]);

    let statements = generator().alter(&old, &new).unwrap();
    assert_eq!(statements.len(), 2);
    assert!(statements[0].ddl.contains("DROP COLUMN \"a\""));
    assert!(statements[1].ddl.contains("ADD COLUMN \"b\" INT"));
}

#[test]
fn alter_changes_column_type_with_lock_hazard() {
    let old = testing::table("t", &[("a", "INT")]);
    let new = testing::table("t", &[("a", "BIGINT")]);

    let statements = generator().alter(&old, &new).unwrap();
    assert_eq!(statements.len(), 1);
    assert_eq!(
        statements[0].ddl,
        "ALTER TABLE \"public\".\"t\" ALTER COLUMN \"a\" SET DATA TYPE BIGINT"
    );
    assert_eq!(
        statements[0].hazards[0].kind,
        HazardKind::AcquiresAccessExclusiveLock
    );
}

#[test]
fn alter_toggles_nullability() {
    let old = testing::table("t", &[("a", "INT")]);
    let mut new = testing::table("t", &[("a", "INT")]);
    new.columns[0].nullable = false;

    let statements = generator().alter(&old, &new).unwrap();
    assert_eq!(
        statements[0].ddl,
        "ALTER TABLE \"public\".\"t\" ALTER COLUMN \"a\" SET NOT NULL"
    );

    let back = generator().alter(&new, &old).unwrap();
    assert_eq!(
        back[0].ddl,
        "ALTER TABLE \"public\".\"t\" ALTER COLUMN \"a\" DROP NOT NULL"
    );
}

#[test]
fn alter_sets_and_drops_default() {
    let old = testing::table("t", &[("a", "INT")]);
    let mut new = testing::table("t", &[("a", "INT")]);
    new.columns[0].default = Some("0".to_string());

    let statements = generator().alter(&old, &new).unwrap();
    assert_eq!(
        statements[0].ddl,
        "ALTER TABLE \"public\".\"t\" ALTER COLUMN \"a\" SET DEFAULT 0"
    );

    let back = generator().alter(&new, &old).unwrap();
    assert_eq!(
        back[0].ddl,
        "ALTER TABLE \"public\".\"t\" ALTER COLUMN \"a\" DROP DEFAULT"
    );
}

#[test]
fn alter_emits_category_order_across_columns() {
    // b dropped, a's type changed, c added: drops, then adds, then changes
    let old = testing::table("t", &[("a", "INT"), ("b", "INT")]);
    let new = testing::table("t", &[("a", "BIGINT"), ("c", "INT")]);

    let statements = generator().alter(&old, &new).unwrap();
    let ddl: Vec<&str> = statements.iter().map(|s| s.ddl.as_str()).collect();
    assert_eq!(
        ddl,
        vec![
            "ALTER TABLE \"public\".\"t\" DROP COLUMN \"b\"",
            "ALTER TABLE \"public\".\"t\" ADD COLUMN \"c\" INT",
            "ALTER TABLE \"public\".\"t\" ALTER COLUMN \"a\" SET DATA TYPE BIGINT",
        ]
    );
}

#[test]
fn alter_groups_type_nullability_and_default_passes() {
    // a changes type, b becomes NOT NULL, a gains a default: every type
    // change precedes every nullability change precedes every default change
    let old = testing::table("t", &[("a", "INT"), ("b", "INT")]);
    let mut new = testing::table("t", &[("a", "BIGINT"), ("b", "INT")]);
    new.columns[0].default = Some("0".to_string());
    new.columns[1].nullable = false;

    let statements = generator().alter(&old, &new).unwrap();
    let ddl: Vec<&str> = statements.iter().map(|s| s.ddl.as_str()).collect();
    assert_eq!(
        ddl,
        vec![
            "ALTER TABLE \"public\".\"t\" ALTER COLUMN \"a\" SET DATA TYPE BIGINT",
            "ALTER TABLE \"public\".\"t\" ALTER COLUMN \"b\" SET NOT NULL",
            "ALTER TABLE \"public\".\"t\" ALTER COLUMN \"a\" SET DEFAULT 0",
        ]
    );
}

#[test]
fn alter_swaps_primary_key() {
    let mut old = testing::table("t", &[("a", "INT"), ("b", "INT")]);
    old.primary_key = vec!["a".to_string()];
    let mut new = old.clone();
    new.primary_key = vec!["b".to_string()];

    let statements = generator().alter(&old, &new).unwrap();
    assert_eq!(statements.len(), 2);
    assert_eq!(
        statements[0].ddl,
        "ALTER TABLE \"public\".\"t\" DROP CONSTRAINT IF EXISTS \"t_pkey\""
    );
    assert_eq!(
        statements[1].ddl,
        "ALTER TABLE \"public\".\"t\" ADD PRIMARY KEY (\"b\")"
    );
}

#[test]
fn alter_manages_named_check_constraints() {
    let mut old = testing::table("t", &[("a", "INT")]);
    old.check_constraints = vec![CheckConstraint {
        name: Some("old_check".to_string()),
        expression: "a > 0".to_string(),
    }];
    let mut new = testing::table("t", &[("a", "INT")]);
    new.check_constraints = vec![CheckConstraint {
        name: Some("new_check".to_string()),
        expression: "a > 1".to_string(),
    }];

    let statements = generator().alter(&old, &new).unwrap();
    assert_eq!(statements.len(), 2);
    assert_eq!(
        statements[0].ddl,
        "ALTER TABLE \"public\".\"t\" DROP CONSTRAINT \"old_check\""
    );
    assert_eq!(
        statements[1].ddl,
        "ALTER TABLE \"public\".\"t\" ADD CONSTRAINT \"new_check\" CHECK (a > 1)"
    );
}

#[test]
fn tables_declare_no_dependencies() {
    let table = testing::table("t", &[("a", "INT")]);
    assert!(generator().add_alter_deps(&table, None).unwrap().is_empty());
    assert!(generator().delete_deps(&table).unwrap().is_empty());
}

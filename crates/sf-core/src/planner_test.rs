use super::*;
use crate::error::PlanError;
use crate::schema::testing;
use crate::statement::HazardKind;

fn plan(old: &Schema, new: &Schema) -> Plan {
    generate_plan(old, new, &PlanOptions::default()).unwrap()
}

/// Position of the first statement whose DDL contains `needle`.
fn position(plan: &Plan, needle: &str) -> usize {
    plan.statements
        .iter()
        .position(|s| s.ddl.contains(needle))
        .unwrap_or_else(|| panic!("no statement contains {needle:?}"))
}

#[test]
fn identical_snapshots_plan_nothing() {
    let schema = Schema {
        tables: vec![testing::table("users", &[("id", "INT"), ("name", "TEXT")])],
        views: vec![testing::view(
            "active_users",
            "SELECT * FROM users WHERE name IS NOT NULL",
            &["users"],
            &[],
        )],
        ..Default::default()
    };

    let plan = plan(&schema, &schema);
    assert!(plan.is_empty());
}

#[test]
fn view_created_after_its_table() {
    let old = Schema::default();
    let new = Schema {
        tables: vec![testing::table("sales", &[("id", "INT"), ("amount", "DECIMAL")])],
        views: vec![testing::view("monthly_sales", "SELECT * FROM sales", &["sales"], &[])],
        ..Default::default()
    };

    let plan = plan(&old, &new);
    assert_eq!(plan.statements.len(), 2);
    assert!(position(&plan, "CREATE TABLE") < position(&plan, "CREATE VIEW"));
}

#[test]
fn cascading_views_create_bottom_up() {
    let old = Schema::default();
    let new = Schema {
        tables: vec![testing::table("sales", &[("amount", "DECIMAL")])],
        views: vec![
            testing::view("monthly_sales", "SELECT * FROM sales", &["sales"], &[]),
            testing::view(
                "quarterly_sales",
                "SELECT * FROM monthly_sales",
                &[],
                &["monthly_sales"],
            ),
        ],
        ..Default::default()
    };

    let plan = plan(&old, &new);
    assert!(position(&plan, r#"CREATE TABLE "public"."sales""#) < position(&plan, r#""monthly_sales""#));
    assert!(
        position(&plan, r#"CREATE VIEW "public"."monthly_sales""#)
            < position(&plan, r#"CREATE VIEW "public"."quarterly_sales""#)
    );
}

#[test]
fn cascading_views_drop_top_down() {
    let old = Schema {
        tables: vec![testing::table("sales", &[("amount", "DECIMAL")])],
        views: vec![
            testing::view("monthly_sales", "SELECT * FROM sales", &["sales"], &[]),
            testing::view(
                "quarterly_sales",
                "SELECT * FROM monthly_sales",
                &[],
                &["monthly_sales"],
            ),
        ],
        ..Default::default()
    };
    let new = Schema {
        tables: old.tables.clone(),
        ..Default::default()
    };

    let plan = plan(&old, &new);
    assert_eq!(plan.statements.len(), 2);
    assert!(
        position(&plan, r#"DROP VIEW "public"."quarterly_sales""#)
            < position(&plan, r#"DROP VIEW "public"."monthly_sales""#)
    );
    assert!(plan.hazard_kinds().contains(&HazardKind::DeletesData));
}

#[test]
fn view_alter_is_one_drop_and_one_create() {
    let table = testing::table("products", &[("price", "DECIMAL")]);
    let old = Schema {
        tables: vec![table.clone()],
        views: vec![testing::view(
            "expensive_products",
            "SELECT * FROM products WHERE price > 100",
            &["products"],
            &[],
        )],
        ..Default::default()
    };
    let new = Schema {
        tables: vec![table],
        views: vec![testing::view(
            "expensive_products",
            "SELECT * FROM products WHERE price > 200",
            &["products"],
            &[],
        )],
        ..Default::default()
    };

    let plan = plan(&old, &new);
    assert_eq!(plan.statements.len(), 2);
    assert_eq!(
        plan.statements[0].ddl,
        r#"DROP VIEW "public"."expensive_products""#
    );
    assert_eq!(
        plan.statements[1].ddl,
        r#"CREATE VIEW "public"."expensive_products" AS SELECT * FROM products WHERE price > 200"#
    );
    assert!(plan.hazard_kinds().contains(&HazardKind::DeletesData));
}

#[test]
fn function_alter_never_emits_a_drop() {
    let def_old = "CREATE OR REPLACE FUNCTION public.f()\nRETURNS integer\nLANGUAGE sql\nRETURN 1;";
    let def_new = "CREATE OR REPLACE FUNCTION public.f()\nRETURNS integer\nLANGUAGE sql\nRETURN 2;";

    let old = Schema {
        functions: vec![testing::function("f", def_old, "sql")],
        ..Default::default()
    };
    let new = Schema {
        functions: vec![testing::function("f", def_new, "sql")],
        ..Default::default()
    };

    let plan = plan(&old, &new);
    assert_eq!(plan.statements.len(), 1);
    assert_eq!(plan.statements[0].ddl, def_new);
}

#[test]
fn function_installed_after_referenced_column_is_added() {
    let old = Schema {
        tables: vec![testing::table("t", &[("a", "INT")])],
        ..Default::default()
    };

    let mut function = testing::function(
        "f",
        "CREATE OR REPLACE FUNCTION public.f()\nRETURNS integer\nLANGUAGE sql\nRETURN (SELECT t.b FROM t LIMIT 1);",
        "sql",
    );
    function.depends_on_tables = vec![testing::qualified("t")];
    function.referenced_columns = vec![crate::schema::TableColumnRef {
        table: "t".to_string(),
        column: "b".to_string(),
    }];
    let new = Schema {
        tables: vec![testing::table("t", &[("a", "INT"), ("b", "INT")])],
        functions: vec![function],
        ..Default::default()
    };

    let plan = plan(&old, &new);
    assert!(position(&plan, "ADD COLUMN \"b\"") < position(&plan, "CREATE OR REPLACE FUNCTION"));
}

#[test]
fn event_trigger_created_after_its_function() {
    let function = testing::function(
        "log_table_ddl",
        "CREATE OR REPLACE FUNCTION public.log_table_ddl()\nRETURNS event_trigger\nLANGUAGE plpgsql\nAS $$ BEGIN RAISE NOTICE 'ddl'; END; $$;",
        "plpgsql",
    );
    let old = Schema::default();
    let new = Schema {
        functions: vec![function],
        event_triggers: vec![testing::event_trigger(
            "log_table_changes",
            "ddl_command_end",
            &["CREATE TABLE", "ALTER TABLE", "DROP TABLE"],
            "log_table_ddl",
        )],
        ..Default::default()
    };

    let plan = plan(&old, &new);
    assert!(
        position(&plan, "CREATE OR REPLACE FUNCTION")
            < position(&plan, "CREATE EVENT TRIGGER")
    );
    assert!(plan
        .statements
        .iter()
        .any(|s| s.ddl.contains("WHEN TAG IN ('CREATE TABLE', 'ALTER TABLE', 'DROP TABLE')")));
}

#[test]
fn event_trigger_dropped_before_its_function() {
    let function = testing::function(
        "log_ddl_command",
        "CREATE OR REPLACE FUNCTION public.log_ddl_command()\nRETURNS event_trigger\nLANGUAGE plpgsql\nAS $$ BEGIN NULL; END; $$;",
        "plpgsql",
    );
    let old = Schema {
        functions: vec![function],
        event_triggers: vec![testing::event_trigger(
            "log_ddl",
            "ddl_command_end",
            &[],
            "log_ddl_command",
        )],
        ..Default::default()
    };
    let new = Schema::default();

    let plan = plan(&old, &new);
    assert!(position(&plan, "DROP EVENT TRIGGER") < position(&plan, "DROP FUNCTION"));
}

#[test]
fn mutually_dependent_views_are_a_cycle() {
    let old = Schema::default();
    let new = Schema {
        views: vec![
            testing::view("a", "SELECT * FROM b", &[], &["b"]),
            testing::view("b", "SELECT * FROM a", &[], &["a"]),
        ],
        ..Default::default()
    };

    let err = generate_plan(&old, &new, &PlanOptions::default()).unwrap_err();
    match err {
        PlanError::CycleDetected { vertices } => {
            assert_eq!(vertices.len(), 2);
        }
        other => panic!("expected CycleDetected, got {other:?}"),
    }
}

#[test]
fn options_flow_into_statement_timeouts() {
    use std::time::Duration;

    let options = PlanOptions {
        default_statement_timeout: Duration::from_secs(60),
        default_lock_timeout: Duration::from_secs(5),
    };
    let new = Schema {
        tables: vec![testing::table("t", &[("id", "INT")])],
        ..Default::default()
    };

    let plan = generate_plan(&Schema::default(), &new, &options).unwrap();
    assert_eq!(plan.statements[0].timeout, Duration::from_secs(60));
    assert_eq!(plan.statements[0].lock_timeout, Duration::from_secs(5));
}

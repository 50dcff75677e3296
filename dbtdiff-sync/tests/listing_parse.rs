//! `dbt ls --output json` parsing tests.

use dbtdiff_sync::compiler::parse_listing;
use rstest::rstest;

const MIXED: &str = r#"
12:00:01  Running with dbt=1.7.4
12:00:02  Registered adapter: snowflake=1.7.1
{"name": "orders", "resource_type": "model", "package_name": "shop", "original_file_path": "models/orders.sql", "database": "analytics", "schema": "staging", "alias": "orders"}
12:00:03  Found 42 models, 17 tests
{"name": "not_null_orders_id", "resource_type": "test", "package_name": "shop", "original_file_path": "models/schema.yml", "database": "analytics", "schema": "staging_dbt_test__audit", "alias": null}
{"level": "info", "msg": "done"}
{"name": "customers", "resource_type": "model", "package_name": "shop", "original_file_path": "models/customers.sql", "database": "analytics", "schema": "marts", "alias": ""}
{"name": "broken", "resource_type": 
"#;

#[test]
fn interleaved_log_lines_are_skipped_in_order() {
    let records = parse_listing(MIXED);
    let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["orders", "not_null_orders_id", "customers"]);
    assert_eq!(records[0].original_path, "models/orders.sql");
    assert_eq!(records[1].resource_type, "test");
    assert!(records[1].alias.is_none());
    assert_eq!(records[2].alias.as_deref(), Some(""));
}

#[rstest]
#[case("")]
#[case("No nodes selected!")]
#[case("12:00:01  Running with dbt=1.7.4\n12:00:02  No nodes selected!\n")]
#[case("[]")]
fn output_without_records_is_empty(#[case] output: &str) {
    assert!(parse_listing(output).is_empty());
}

#[test]
fn crlf_line_endings_are_tolerated() {
    let output = "log line\r\n{\"name\":\"a\",\"resource_type\":\"model\"}\r\n";
    let records = parse_listing(output);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "a");
    assert!(records[0].database.is_none());
}

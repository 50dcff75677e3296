use dbtdiff_core::ResourceRecord;
use dbtdiff_renderer::{location, Renderer, NO_MODIFIED_MODELS};
use rstest::rstest;

fn record(
    name: &str,
    database: Option<&str>,
    schema: Option<&str>,
    alias: Option<&str>,
) -> ResourceRecord {
    ResourceRecord {
        name: name.into(),
        resource_type: "model".into(),
        package_name: "shop".into(),
        original_path: format!("models/{name}.sql"),
        database: database.map(str::to_string),
        schema: schema.map(str::to_string),
        alias: alias.map(str::to_string),
    }
}

#[rstest]
#[case::full(Some("db"), Some("sch"), Some("al"), "db.sch.al")]
#[case::empty_schema_skipped(Some("d"), Some(""), Some("a"), "d.a")]
#[case::name_only(None, None, None, "n")]
#[case::empty_alias_uses_name(Some("db"), Some("sch"), Some(""), "db.sch.n")]
#[case::missing_database(None, Some("sch"), Some("al"), "sch.al")]
fn location_joins_non_empty_parts(
    #[case] database: Option<&str>,
    #[case] schema: Option<&str>,
    #[case] alias: Option<&str>,
    #[case] expected: &str,
) {
    assert_eq!(location(&record("n", database, schema, alias)), expected);
}

#[test]
fn markdown_snippet_for_each_model() {
    let records = vec![
        record("orders", Some("analytics"), Some("staging"), None),
        record("customers", Some("analytics"), Some("marts"), Some("dim_customers")),
    ];
    let out = Renderer::new().unwrap().render_markdown(&records).unwrap();

    let expected = "```sql\n\
                    -- models/orders.sql\n\
                    desc table analytics.staging.orders;\n\
                    select top 10 * from analytics.staging.orders;\n\
                    ```\n\
                    \n\
                    ```sql\n\
                    -- models/customers.sql\n\
                    desc table analytics.marts.dim_customers;\n\
                    select top 10 * from analytics.marts.dim_customers;\n\
                    ```\n";
    assert_eq!(out, expected);
}

#[test]
fn empty_listing_renders_notice() {
    let out = Renderer::new().unwrap().render_markdown(&[]).unwrap();
    assert_eq!(out.trim_end(), NO_MODIFIED_MODELS);
}

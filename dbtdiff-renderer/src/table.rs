//! Tabular and JSON renderings of a modified-resource listing.

use tabled::{settings::Style, Table, Tabled};

use dbtdiff_core::ResourceRecord;

use crate::context::location;
use crate::error::RenderError;

/// Printed instead of an empty table.
pub const NO_MODIFIED_RESOURCES: &str = "No modified resources detected";

#[derive(Tabled)]
struct ResourceRow {
    #[tabled(rename = "name")]
    name: String,
    #[tabled(rename = "type")]
    resource_type: String,
    #[tabled(rename = "location")]
    location: String,
    #[tabled(rename = "path")]
    path: String,
}

impl From<&ResourceRecord> for ResourceRow {
    fn from(record: &ResourceRecord) -> Self {
        ResourceRow {
            name: record.name.clone(),
            resource_type: record.resource_type.clone(),
            location: location(record),
            path: record.original_path.clone(),
        }
    }
}

/// Rounded table, one row per record, in input order.
pub fn render_table(records: &[ResourceRecord]) -> String {
    if records.is_empty() {
        return format!("{NO_MODIFIED_RESOURCES}\n");
    }
    let mut table = Table::new(records.iter().map(ResourceRow::from));
    table.with(Style::rounded());
    format!("{table}\n")
}

/// Pretty-printed JSON array; `[]` when empty.
pub fn render_json(records: &[ResourceRecord]) -> Result<String, RenderError> {
    let mut out = serde_json::to_string_pretty(records)?;
    out.push('\n');
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> ResourceRecord {
        ResourceRecord {
            name: "orders".into(),
            resource_type: "model".into(),
            package_name: "shop".into(),
            original_path: "models/orders.sql".into(),
            database: Some("analytics".into()),
            schema: Some("staging".into()),
            alias: None,
        }
    }

    #[test]
    fn table_lists_each_record() {
        let out = render_table(&[record()]);
        for needle in ["name", "type", "location", "orders", "analytics.staging.orders"] {
            assert!(out.contains(needle), "missing {needle} in:\n{out}");
        }
    }

    #[test]
    fn empty_table_prints_notice() {
        assert_eq!(render_table(&[]), "No modified resources detected\n");
    }

    #[test]
    fn json_uses_manifest_field_names() {
        let out = render_json(&[record()]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[0]["name"], "orders");
        assert_eq!(value[0]["original_file_path"], "models/orders.sql");
        assert_eq!(render_json(&[]).unwrap(), "[]\n");
    }
}

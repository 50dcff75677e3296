//! Template context: serializable rendering payload built from [`ResourceRecord`]s.

use serde::{Deserialize, Serialize};

use dbtdiff_core::ResourceRecord;

use crate::error::RenderError;

/// Dotted warehouse location: `database.schema.alias`.
///
/// Empty or missing parts are skipped; `name` stands in for an empty alias.
pub fn location(record: &ResourceRecord) -> String {
    let leaf = record
        .alias
        .as_deref()
        .filter(|alias| !alias.is_empty())
        .unwrap_or(&record.name);

    [record.database.as_deref(), record.schema.as_deref(), Some(leaf)]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(".")
}

/// One inspection snippet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnippetCtx {
    pub name: String,
    pub original_path: String,
    pub location: String,
}

impl From<&ResourceRecord> for SnippetCtx {
    fn from(record: &ResourceRecord) -> Self {
        Self {
            name: record.name.clone(),
            original_path: record.original_path.clone(),
            location: location(record),
        }
    }
}

/// Payload for `inspect.md.tera`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InspectContext {
    pub models: Vec<SnippetCtx>,
}

impl InspectContext {
    pub fn from_records(records: &[ResourceRecord]) -> Self {
        Self {
            models: records.iter().map(SnippetCtx::from).collect(),
        }
    }

    /// Convert to a [`tera::Context`].
    pub fn to_tera_context(&self) -> Result<tera::Context, RenderError> {
        tera::Context::from_serialize(self).map_err(RenderError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, path: &str) -> ResourceRecord {
        ResourceRecord {
            name: name.into(),
            resource_type: "model".into(),
            package_name: "shop".into(),
            original_path: path.into(),
            database: Some("analytics".into()),
            schema: Some("staging".into()),
            alias: None,
        }
    }

    #[test]
    fn snippet_context_carries_location_and_path() {
        let ctx = InspectContext::from_records(&[record("orders", "models/orders.sql")]);
        assert_eq!(ctx.models.len(), 1);
        assert_eq!(ctx.models[0].location, "analytics.staging.orders");
        assert_eq!(ctx.models[0].original_path, "models/orders.sql");
        ctx.to_tera_context().expect("context conversion");
    }
}

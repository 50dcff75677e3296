//! Tera rendering engine for Markdown inspection snippets.
//!
//! The embedded `inspect.md.tera` can be overridden per project by a file of
//! the same name in a user template directory (`.dbt-diff/templates/`).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tera::Tera;

use dbtdiff_core::ResourceRecord;

use crate::context::InspectContext;
use crate::error::RenderError;

/// Printed instead of an empty snippet list.
pub const NO_MODIFIED_MODELS: &str = "No modified models detected";

const INSPECT_TEMPLATE: &str = "inspect.md.tera";

// ---------------------------------------------------------------------------
// Embedded templates, baked into the binary at compile time via include_str!
// ---------------------------------------------------------------------------

const TPLS: &[(&str, &str)] = &[(INSPECT_TEMPLATE, include_str!("templates/inspect.md.tera"))];

// ---------------------------------------------------------------------------
// Template loading helpers
// ---------------------------------------------------------------------------

fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> RenderError {
    RenderError::Io {
        path: path.into(),
        source,
    }
}

fn normalize_template_name(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/").to_lowercase()
}

fn load_user_templates(dir: &Path) -> Result<Vec<(String, String)>, RenderError> {
    if !dir.is_dir() {
        return Ok(vec![]);
    }
    let mut templates = Vec::new();
    let entries = std::fs::read_dir(dir).map_err(|e| io_err(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| io_err(dir, e))?;
        let path = entry.path();
        if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("tera") {
            continue;
        }
        let rel = path.strip_prefix(dir).unwrap_or(path.as_path());
        let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
        templates.push((normalize_template_name(rel), contents));
    }
    Ok(templates)
}

fn build_tera(user_template_dir: Option<&Path>) -> Result<Tera, RenderError> {
    let mut templates: HashMap<String, String> = HashMap::new();
    for (name, content) in TPLS {
        templates.insert((*name).to_string(), (*content).to_string());
    }
    if let Some(dir) = user_template_dir {
        for (name, content) in load_user_templates(dir)? {
            templates.insert(name, content);
        }
    }

    let mut tera = Tera::default();
    tera.add_raw_templates(templates.into_iter().collect::<Vec<_>>())?;
    Ok(tera)
}

// ---------------------------------------------------------------------------
// TemplateEngine
// ---------------------------------------------------------------------------

/// Tera engine holding embedded templates plus optional user overrides.
pub struct TemplateEngine {
    tera: Tera,
}

impl TemplateEngine {
    pub fn new(user_template_dir: Option<&Path>) -> Result<Self, RenderError> {
        Ok(TemplateEngine {
            tera: build_tera(user_template_dir)?,
        })
    }

    fn render_inspect(&self, ctx: &InspectContext) -> Result<String, RenderError> {
        let rendered = self.tera.render(INSPECT_TEMPLATE, &ctx.to_tera_context()?)?;
        let mut out = rendered.replace("\r\n", "\n").trim().to_string();
        out.push('\n');
        Ok(out)
    }
}

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

/// Stateless report renderer. Create once and reuse.
pub struct Renderer {
    engine: TemplateEngine,
}

impl Renderer {
    /// Renderer with embedded templates only.
    pub fn new() -> Result<Self, RenderError> {
        Ok(Renderer {
            engine: TemplateEngine::new(None)?,
        })
    }

    /// Renderer whose templates may be overridden from `dir`.
    pub fn with_user_templates(dir: &Path) -> Result<Self, RenderError> {
        Ok(Renderer {
            engine: TemplateEngine::new(Some(dir))?,
        })
    }

    /// One fenced SQL block per record, or [`NO_MODIFIED_MODELS`] when empty.
    pub fn render_markdown(&self, records: &[ResourceRecord]) -> Result<String, RenderError> {
        if records.is_empty() {
            return Ok(format!("{NO_MODIFIED_MODELS}\n"));
        }
        self.engine
            .render_inspect(&InspectContext::from_records(records))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

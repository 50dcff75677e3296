//! # dbtdiff-renderer
//!
//! Turns modified-resource listings into operator-facing output: Markdown
//! inspection snippets (Tera templates), tables, and JSON.
//!
//! ```rust,no_run
//! use dbtdiff_renderer::Renderer;
//! use dbtdiff_core::ResourceRecord;
//!
//! fn print(records: &[ResourceRecord]) {
//!     if let Ok(renderer) = Renderer::new() {
//!         if let Ok(markdown) = renderer.render_markdown(records) {
//!             print!("{markdown}");
//!         }
//!     }
//! }
//! ```

pub mod context;
pub mod engine;
pub mod error;
pub mod table;

pub use context::{location, InspectContext, SnippetCtx};
pub use engine::{Renderer, TemplateEngine, NO_MODIFIED_MODELS};
pub use error::RenderError;
pub use table::{render_json, render_table, NO_MODIFIED_RESOURCES};

pub mod build;
pub mod list;
pub mod markdown;
pub mod show;
mod workspace;

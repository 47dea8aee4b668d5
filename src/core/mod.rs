// TextureCatalog - core/mod.rs
//
// Core business logic layer.
// Must NOT depend on: app, platform, or touch the filesystem.

pub mod builder;
pub mod export;
pub mod filter;
pub mod migrate;
pub mod model;
pub mod query;

// TextureCatalog - app/mod.rs
//
// Application layer: catalog session and record persistence.
// Dependencies: core layer, platform::fs for atomic writes.
// Must NOT depend on: the CLI.

pub mod catalog;
pub mod store;

// TextureCatalog - platform/mod.rs
//
// Platform abstraction layer.
// Dependencies: util, standard library, directories, toml.
// Must NOT depend on: core, app.

pub mod config;
pub mod fs;

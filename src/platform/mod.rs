// vacstat - platform/mod.rs
//
// Platform abstraction layer: directory resolution and config.toml.
// Dependencies: standard library, directories crate, core settings types.
// Must NOT depend on: app.

pub mod config;

// vacstat - core/mod.rs
//
// Core business logic layer.
// Must NOT depend on: app, platform, or any file I/O directly.

pub mod currency;
pub mod export;
pub mod field;
pub mod filter;
pub mod listing;
pub mod model;
pub mod sort;
pub mod stats;

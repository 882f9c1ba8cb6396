// vacstat - app/mod.rs
//
// Application layer: dataset loading and the listing/statistics flows.
// Dependencies: core layer.
// Must NOT depend on: platform specifics.

pub mod dataset;
pub mod query;
pub mod report;

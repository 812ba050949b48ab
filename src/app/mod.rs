// Linewright - app/mod.rs
//
// Application layer: profile loading, command-line overrides, batch runs.
// Dependencies: core, platform, util.

pub mod batch;
pub mod overrides;
pub mod profile_mgr;

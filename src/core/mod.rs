// Linewright - core/mod.rs
//
// Core transform layer.
// Dependencies: standard library, serde/toml for profile definitions, tracing.
// Must NOT depend on: app, platform, or touch the filesystem directly.

pub mod affix;
pub mod cache;
pub mod case;
pub mod document;
pub mod model;
pub mod pipeline;
pub mod profile;
pub mod splitter;
pub mod substring;

// Linewright - util/mod.rs
//
// Utility modules: error types, named constants, logging setup, run tracing.
// No dependencies on core, app, or platform layers.

pub mod constants;
pub mod error;
pub mod logging;
pub mod trace;

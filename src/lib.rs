//! Dualfall (workspace facade crate).
//!
//! Exposes the member crates as `dualfall::{core, engine, types}` so hosts,
//! integration tests and benches depend on a single package.

pub use dualfall_core as core;
pub use dualfall_engine as engine;
pub use dualfall_types as types;

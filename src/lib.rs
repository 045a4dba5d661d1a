//! Sumfall (workspace facade crate).
//!
//! Re-exports the engine as `sumfall::{core, engine, types}` while the
//! implementation lives in dedicated crates under `crates/`.

pub use sumfall_core as core;
pub use sumfall_engine as engine;
pub use sumfall_types as types;

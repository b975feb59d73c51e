//! Columns (workspace facade crate).
//!
//! Re-exports the workspace crates as `columns::{core,runtime,types}` and hosts
//! the pieces shared by the binaries: logging setup and the headless simulator.

pub use columns_core as core;
pub use columns_runtime as runtime;
pub use columns_types as types;

pub mod logging;
pub mod sim;

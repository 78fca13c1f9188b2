//! SMELTER State Backends
//!
//! Implementations of the [`smelter_core::StateBackend`] interface. The
//! production backend lives with the surrounding runtime; this crate ships
//! the in-memory backend used by tests and light deployments.

pub mod memory;

pub use memory::*;

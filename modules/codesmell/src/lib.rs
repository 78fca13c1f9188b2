//! Code-smell transaction family for SMELTER
//!
//! Deterministic state-transition logic for the `code-smell` registry:
//! - payload decoding and validation
//! - storage address derivation
//! - request-scoped state access with a per-transaction cache
//! - the `create` transition rule

pub mod addressing;
pub mod handler;
pub mod payload;
pub mod state;

pub use addressing::*;
pub use handler::*;
pub use payload::*;
pub use state::*;

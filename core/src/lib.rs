//! SMELTER Core Library
//!
//! Core types, traits, and abstractions for the SMELTER transaction
//! processing core. This crate provides the foundation shared by the state
//! backends and the transaction family modules.

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use config::*;
pub use error::*;
pub use traits::*;
pub use types::*;

//! Configuration types for SMELTER

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Transaction processor configuration.
///
/// Built once at startup by the embedding runtime and passed by reference
/// into every component; nothing here is mutated after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessorConfig {
    /// Deadline for a single state backend call, in seconds
    pub state_timeout_secs: u64,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            state_timeout_secs: 3,
        }
    }
}

impl ProcessorConfig {
    /// State backend deadline as a [`Duration`]
    pub fn state_timeout(&self) -> Duration {
        Duration::from_secs(self.state_timeout_secs)
    }
}

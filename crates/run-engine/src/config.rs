//! Engine configuration.

use serde::{Deserialize, Serialize};

/// Tunable knobs for one engine instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Intelligent-retry budget per run.
    pub max_retries: u32,

    /// Deadline for any single actuator call.
    pub actuator_timeout_ms: u64,

    /// Deadline for any single perception call.
    pub perception_timeout_ms: u64,

    /// Default timeout for wait actions without an explicit duration.
    pub default_wait_ms: u64,

    /// Pause between plan positions, letting the page settle.
    pub step_pause_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            actuator_timeout_ms: 30_000,
            perception_timeout_ms: 20_000,
            default_wait_ms: 5_000,
            step_pause_ms: 250,
        }
    }
}

impl EngineConfig {
    /// Set the intelligent-retry budget.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the actuator call deadline.
    pub fn with_actuator_timeout_ms(mut self, ms: u64) -> Self {
        self.actuator_timeout_ms = ms;
        self
    }

    /// Set the perception call deadline.
    pub fn with_perception_timeout_ms(mut self, ms: u64) -> Self {
        self.perception_timeout_ms = ms;
        self
    }

    /// Set the pause between plan positions.
    pub fn with_step_pause_ms(mut self, ms: u64) -> Self {
        self.step_pause_ms = ms;
        self
    }
}

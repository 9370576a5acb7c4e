//! Registry configuration.

use serde::{Deserialize, Serialize};

/// Configuration for a symbol [`Registry`](crate::Registry)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Prefix for generated symbols when the caller passes none
    pub fresh_prefix: String,
    /// Number of symbols to reserve space for up front
    pub initial_capacity: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        RegistryConfig {
            fresh_prefix: "G".to_string(),
            initial_capacity: 64,
        }
    }
}

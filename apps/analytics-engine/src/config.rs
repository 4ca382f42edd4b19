//! Engine configuration types.

use serde::{Deserialize, Serialize};

/// Quote lookup configuration for the holdings valuator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteLookupConfig {
    /// Maximum in-flight lookups.
    pub concurrency: usize,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for QuoteLookupConfig {
    fn default() -> Self {
        Self {
            concurrency: 10,
            timeout_secs: 10,
        }
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Quote lookup settings.
    #[serde(default)]
    pub lookup: QuoteLookupConfig,
}

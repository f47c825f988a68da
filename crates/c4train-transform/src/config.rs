//! Preparation settings.
//!
//! Both structs deserialize from partial documents: omitted keys take their
//! defaults, so `{}` is a valid configuration.
//!
//! ```
//! use c4train_transform::config::PrepareConfig;
//!
//! let config: PrepareConfig = serde_json::from_str(r#"{ "balance": { "num_bins": 6 } }"#)?;
//! assert!(config.mirror);
//! assert_eq!(config.balance.num_bins.get(), 6);
//! # Ok::<(), serde_json::Error>(())
//! ```

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::balance::DEFAULT_NUM_BINS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalanceConfig {
    /// Number of equal-width move-count bins. Zero is rejected when deserializing.
    pub num_bins: NonZeroUsize,
}

impl Default for BalanceConfig {
    fn default() -> Self {
        Self {
            num_bins: DEFAULT_NUM_BINS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrepareConfig {
    /// Append the left-right mirror image of every sample before weighting.
    pub mirror: bool,
    pub balance: BalanceConfig,
}

impl Default for PrepareConfig {
    fn default() -> Self {
        Self {
            mirror: true,
            balance: BalanceConfig::default(),
        }
    }
}

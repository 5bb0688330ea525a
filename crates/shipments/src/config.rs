//! Filter configuration for the shipments pipeline.
//!
//! [`FilterConfig`] carries the options that change *which* records a view
//! shows. Layout and appearance options belong to the card configuration in
//! the umbrella crate, which builds a `FilterConfig` from its own fields.
//!
//! ```rust
//! use shipments::FilterConfig;
//!
//! let config = FilterConfig::default();
//! assert_eq!(config.days_back, 7);
//! assert!(!config.cutoff_sent);
//! config.validate().expect("defaults are valid");
//! ```
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Days of delivered history shown when nothing is configured.
pub const DEFAULT_DAYS_BACK: u32 = 7;
/// Smallest configurable history window.
pub const MIN_DAYS_BACK: u32 = 1;
/// Largest configurable history window.
pub const MAX_DAYS_BACK: u32 = 365;

/// Options for [`crate::prepare_feeds`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Delivered parcels older than this many days are hidden.
    ///
    /// Default: `7`
    pub days_back: u32,

    /// Apply the same cutoff to the distribution (sent) feed.
    ///
    /// Default: `false`
    pub cutoff_sent: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            days_back: DEFAULT_DAYS_BACK,
            cutoff_sent: false,
        }
    }
}

impl FilterConfig {
    /// Checks the configured window against the supported range.
    ///
    /// ```rust
    /// use shipments::{ConfigError, FilterConfig};
    ///
    /// let config = FilterConfig { days_back: 400, ..Default::default() };
    /// assert!(matches!(
    ///     config.validate(),
    ///     Err(ConfigError::DaysBackOutOfRange { value: 400, .. })
    /// ));
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_DAYS_BACK..=MAX_DAYS_BACK).contains(&self.days_back) {
            return Err(ConfigError::DaysBackOutOfRange {
                value: self.days_back,
                min: MIN_DAYS_BACK,
                max: MAX_DAYS_BACK,
            });
        }
        Ok(())
    }
}

/// Errors raised when validating a [`FilterConfig`].
///
/// These are configuration-time problems; the pipeline never raises them
/// while processing host snapshots.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("days_back ({value}) must be between {min} and {max}")]
    DaysBackOutOfRange { value: u32, min: u32, max: u32 },
}

//! One-shot initialization phase for the lockdown ratchet.
//!
//! Startup ordering is enforced by the type system rather than by implicit
//! init-hook ordering: [`LockdownState::unconfigured`] yields a staging
//! value that is consumed, exactly once, by
//! [`UnconfiguredLockdown::bootstrap`]. Only the `Arc` it returns is ever
//! handed to the control surface and the gated call sites, so no admin write
//! or authorization check can precede the bootstrap directive.
//!
//! Two inputs feed the initial floor, applied in a fixed order:
//!
//! 1. `forced_floor` — a build/deployment decision that locks the process
//!    down unconditionally.
//! 2. `directive` — the textual one-shot parameter (command line or
//!    equivalent), recognizing exactly `integrity` and `confidentiality`.
//!
//! The directive runs after the floor, so it can raise further but can never
//! lower below the forced floor; monotonicity makes the combination safe.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::level::LockdownLevel;
use crate::state::LockdownState;

/// Startup configuration for the lockdown ratchet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LockdownConfig {
    /// Unconditional floor applied before the directive is parsed.
    /// `none` is accepted and means the same as omitting the field.
    #[serde(default)]
    pub forced_floor: Option<LockdownLevel>,

    /// One-shot textual directive. Recognized values: `integrity`,
    /// `confidentiality`. Any other value is a startup configuration error.
    #[serde(default)]
    pub directive: Option<String>,
}

impl LockdownConfig {
    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid or contains unknown keys.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::Parse)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        Self::from_toml(&content)
    }
}

/// Errors loading a [`LockdownConfig`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read lockdown config: {0}")]
    Io(#[source] std::io::Error),

    /// The configuration content could not be parsed.
    #[error("failed to parse lockdown config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Errors applying the bootstrap directive.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum BootstrapError {
    /// The directive token is not one of the recognized level names. This is
    /// a startup configuration error: the state never leaves the staging
    /// phase and nothing is mutated as far as any later caller can observe.
    #[error("unrecognized lockdown directive '{token}' (expected \"integrity\" or \"confidentiality\")")]
    UnrecognizedDirective {
        /// The offending token, verbatim.
        token: String,
    },
}

/// A ratchet that has not yet been through its bootstrap phase.
///
/// Holds the only reference to the state, so nothing else can read or raise
/// it until [`Self::bootstrap`] consumes this value.
#[derive(Debug)]
pub struct UnconfiguredLockdown {
    state: LockdownState,
}

impl LockdownState {
    /// Begin the initialization phase.
    #[must_use]
    pub fn unconfigured() -> UnconfiguredLockdown {
        UnconfiguredLockdown {
            state: Self::new(),
        }
    }
}

impl UnconfiguredLockdown {
    /// Apply the startup configuration and hand out the shared state.
    ///
    /// The directive token is validated before anything is applied, so a
    /// configuration error cannot leave a half-configured ratchet behind.
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError::UnrecognizedDirective`] for any directive
    /// token other than `integrity` or `confidentiality`.
    pub fn bootstrap(self, config: &LockdownConfig) -> Result<Arc<LockdownState>, BootstrapError> {
        let directive = match config.directive.as_deref() {
            None => None,
            Some("integrity") => Some(LockdownLevel::Integrity),
            Some("confidentiality") => Some(LockdownLevel::Confidentiality),
            Some(token) => {
                return Err(BootstrapError::UnrecognizedDirective {
                    token: token.to_owned(),
                });
            }
        };

        if let Some(floor) = config.forced_floor {
            // A floor of `none` is a no-op on a fresh ratchet.
            let _ = self.state.raise(floor, "build configuration");
        }
        if let Some(level) = directive {
            // A directive at or below the forced floor is a no-op by
            // monotonicity; the floor never lowers.
            let _ = self.state.raise(level, "command line");
        }
        Ok(Arc::new(self.state))
    }
}

// =============================================================================
// Tests
// =============================================================================

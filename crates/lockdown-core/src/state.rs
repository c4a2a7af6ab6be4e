//! The ratchet state and its two decision paths.
//!
//! [`LockdownState`] owns the single piece of shared mutable state in this
//! crate: the active lockdown level, stored as one atomic byte. It is an
//! explicit, injectable object — the host constructs it once through the
//! bootstrap phase (see [`crate::bootstrap`]) and hands an `Arc` to every
//! collaborator; there is no hidden global.
//!
//! # Security Model
//!
//! - **Fail-closed**: an out-of-contract reason passed to the authorization
//!   check is treated as restricted, never as allowed.
//! - **Monotone**: [`LockdownState::raise`] only moves the level strictly
//!   upward. The sole exception is the presence-gated lift trigger
//!   (`emergency-lift` feature), which cannot be reached from the control
//!   surface.
//! - **Linearizable**: raises go through a compare-and-swap loop; of two
//!   concurrent raises the higher target wins and the lower fails cleanly.
//!   Readers never observe a torn or decreasing value (outside a lift).
//!
//! # Invariants
//!
//! - [INV-RATCHET-001] The stored level is non-decreasing across the process
//!   lifetime, lift excepted.
//! - [INV-RATCHET-002] A raise to level L succeeds iff current < L, and a
//!   denied raise performs no mutation.
//! - [INV-RATCHET-003] The authorization check is a single atomic load plus
//!   comparison; it allocates only on the restricted branch.

use std::sync::atomic::{AtomicU8, Ordering};

use thiserror::Error;
use tracing::{error, info, warn};

use crate::level::LockdownLevel;
use crate::reason::LockdownReason;

/// Errors from a denied level transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum RaiseError {
    /// The requested level is not strictly above the current one. This is a
    /// designed outcome of the ratchet, not a fault: the state is unchanged.
    #[error("lockdown is already at or above {requested} (current: {current})")]
    AlreadyAtOrAbove {
        /// The level that was active when the raise was denied.
        current: LockdownLevel,
        /// The level the caller asked for.
        requested: LockdownLevel,
    },
}

/// Process-wide lockdown ratchet.
///
/// Constructed once via [`crate::bootstrap::UnconfiguredLockdown`], then
/// shared as `Arc<LockdownState>` for the rest of the run. Never persisted;
/// every process starts back at [`LockdownLevel::None`].
#[derive(Debug)]
pub struct LockdownState {
    /// Raw discriminant of the active [`LockdownLevel`].
    level: AtomicU8,
    /// Acting principal named in audit notices, captured at construction.
    principal: String,
}

impl LockdownState {
    /// Fresh state at [`LockdownLevel::None`]. Crate-private: hosts go
    /// through the bootstrap phase so no writer can exist before it.
    pub(crate) fn new() -> Self {
        Self {
            level: AtomicU8::new(LockdownLevel::None as u8),
            principal: current_principal(),
        }
    }

    /// The currently active level.
    #[must_use]
    pub fn current(&self) -> LockdownLevel {
        LockdownLevel::from_raw(self.level.load(Ordering::Acquire))
    }

    /// Attempt to raise the ratchet to `requested`.
    ///
    /// `source` is a free-text provenance tag recorded in the success
    /// notice ("command line", "control surface", ...); it does not affect
    /// the decision.
    ///
    /// Safe under concurrent invocation: the compare-and-swap loop
    /// guarantees that of two simultaneous raises the higher target becomes
    /// the final value and the lower receives [`RaiseError::AlreadyAtOrAbove`].
    ///
    /// # Errors
    ///
    /// Returns [`RaiseError::AlreadyAtOrAbove`] when the current level is at
    /// or above `requested`; the state is not mutated and no notice is
    /// emitted.
    pub fn raise(&self, requested: LockdownLevel, source: &str) -> Result<(), RaiseError> {
        let target = requested as u8;
        match self
            .level
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                (current < target).then_some(target)
            }) {
            Ok(_) => {
                info!(level = %requested, source, "lockdown level raised");
                Ok(())
            }
            Err(current) => Err(RaiseError::AlreadyAtOrAbove {
                current: LockdownLevel::from_raw(current),
                requested,
            }),
        }
    }

    /// Whether `reason` is restricted under the active level.
    ///
    /// This is the hot path: every gated operation in the host calls it
    /// before proceeding. The `false` path is one atomic load and two
    /// comparisons, allocation-free. On the `true` path an audit notice
    /// names the acting principal and the restricted capability.
    ///
    /// `reason` must be strictly below the
    /// [`LockdownReason::ConfidentialityMax`] sentinel. Passing the sentinel
    /// (or anything above it) is caller misuse and fails closed: it is
    /// flagged loudly and reported as restricted so that misuse can never
    /// bypass a lockdown.
    #[must_use]
    pub fn is_restricted(&self, reason: LockdownReason) -> bool {
        if reason >= LockdownReason::ConfidentialityMax {
            debug_assert!(false, "invalid lockdown reason {reason:?}");
            error!(%reason, "invalid reason passed to lockdown authorization check");
            return true;
        }
        if self.current().as_reason().ordinal() >= reason.ordinal() {
            if !reason.label().is_empty() {
                warn!(
                    principal = %self.principal,
                    capability = reason.label(),
                    "lockdown: operation is restricted"
                );
            }
            return true;
        }
        false
    }

    /// Reset the ratchet to [`LockdownLevel::None`], bypassing the monotonic
    /// rule. Only reachable through [`crate::lift::LiftTrigger`].
    #[cfg(feature = "emergency-lift")]
    pub(crate) fn lift(&self) {
        self.level.store(LockdownLevel::None as u8, Ordering::Release);
        info!("lifting lockdown");
    }
}

/// Name of the running process, for audit notices. Falls back to a fixed
/// tag when the executable path is unavailable.
fn current_principal() -> String {
    std::env::current_exe()
        .ok()
        .and_then(|path| path.file_name().map(|name| name.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "unknown".to_owned())
}

// =============================================================================
// Tests
// =============================================================================

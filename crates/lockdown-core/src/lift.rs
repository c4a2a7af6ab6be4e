//! Presence-gated emergency lift: the one deliberate escape from the ratchet.
//!
//! A [`LiftTrigger`] is the handle a host binds to a local, physical input
//! channel (a designated key combination or equivalent). Firing it resets
//! the ratchet to [`LockdownLevel::None`] regardless of the current level —
//! the sole exception to the monotonic transition rule, accepted because the
//! trigger by construction requires local presence and is never reachable
//! from the control surface or any remote-capable interface.
//!
//! The whole module only exists under the `emergency-lift` feature; builds
//! without it have no code path that lowers the level.

use std::sync::Arc;

use crate::level::LockdownLevel;
use crate::state::LockdownState;

/// Handle that lifts the lockdown when fired.
#[derive(Debug, Clone)]
pub struct LiftTrigger {
    state: Arc<LockdownState>,
}

impl LiftTrigger {
    /// Bind a trigger to the given state.
    ///
    /// Returns `None` when the level at registration time is
    /// [`LockdownLevel::None`]: there is nothing to lift, so no handler is
    /// installed. Registration is expected to run once, after bootstrap,
    /// alongside the host's other startup wiring.
    #[must_use]
    pub fn register(state: &Arc<LockdownState>) -> Option<Self> {
        if state.current() == LockdownLevel::None {
            return None;
        }
        Some(Self {
            state: Arc::clone(state),
        })
    }

    /// Reset the ratchet to [`LockdownLevel::None`] and emit a notice.
    ///
    /// Unconditional: firing at any level, including `None`, leaves the
    /// level at `None`. An authorization check in flight while the lift
    /// lands may observe either the pre- or post-lift level, never a torn
    /// value.
    pub fn fire(&self) {
        self.state.lift();
    }
}

// =============================================================================
// Tests
// =============================================================================

//! lockdown-core - One-way security ratchet for a host process.
//!
//! This crate holds a process-wide confidentiality/integrity state that can
//! only ever increase, and gates sensitive operations behind a required
//! minimum level. Once the host decides it no longer trusts a class of
//! operations, nothing in the running session may undo that decision.
//!
//! # Lifecycle
//!
//! 1. Construct the ratchet and run its one-shot bootstrap:
//!    [`state::LockdownState::unconfigured`] →
//!    [`bootstrap::UnconfiguredLockdown::bootstrap`]. The bootstrap
//!    directive (`integrity` / `confidentiality`) and any build-time forced
//!    floor are applied here, before anything else can touch the state.
//! 2. Share the returned `Arc<LockdownState>` with every collaborator.
//!    Gated call sites call [`state::LockdownState::is_restricted`] with
//!    their reason constant before proceeding; the mapping of operation to
//!    reason belongs to the call sites, not to this crate.
//! 3. Wire the operator's control node to [`control::read_levels`] and
//!    [`control::write_levels`]. Writes can only raise the level.
//! 4. Optionally (feature `emergency-lift`), bind a
//!    [`lift::LiftTrigger`] to a physical input channel. Firing it is the
//!    single sanctioned way back down to `none`.
//!
//! # Security Model
//!
//! - **Monotone**: [`state::LockdownState::raise`] moves strictly upward;
//!   a raise to the current level or below fails without mutation.
//! - **Fail-closed**: an out-of-contract reason passed to the check is
//!   reported as restricted, never as allowed.
//! - **Lock-free hot path**: the authorization check is one atomic load and
//!   a comparison; raises linearize on a compare-and-swap loop.
//! - **No hidden global**: the state is an explicit object the host owns
//!   and injects, so tests construct isolated instances per case.
//!
//! Every successful raise, every denied gated operation, and every lift
//! emits one human-readable `tracing` event; the host owns the subscriber.

pub mod bootstrap;
pub mod control;
pub mod level;
#[cfg(feature = "emergency-lift")]
pub mod lift;
pub mod reason;
pub mod state;

pub use bootstrap::{BootstrapError, ConfigError, LockdownConfig, UnconfiguredLockdown};
pub use control::{ControlError, MAX_WRITE_LEN, read_levels, write_levels};
pub use level::LockdownLevel;
#[cfg(feature = "emergency-lift")]
pub use lift::LiftTrigger;
pub use reason::LockdownReason;
pub use state::{LockdownState, RaiseError};

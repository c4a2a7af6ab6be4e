//! Text encoding for the administrative control surface.
//!
//! The host exposes the ratchet to an operator through a permissioned,
//! file-like node. The transport is the host's problem; this module owns the
//! payload format: a stable one-line level enumeration on read, and an exact
//! label match driving a raise on write. Reads carry no side effect; a
//! successful write goes through [`LockdownState::raise`] and can therefore
//! only move the ratchet upward.
//!
//! The three failure classes an end user can provoke stay distinguishable to
//! the caller (malformed payload, unknown level name, already satisfied), so
//! a host can map them onto distinct error codes for its transport.

use thiserror::Error;

use crate::level::LockdownLevel;
use crate::state::{LockdownState, RaiseError};

/// Source tag recorded in notices for raises that arrive via this surface.
const CONTROL_SOURCE: &str = "control surface";

/// Upper bound on accepted write payloads. The longest valid payload is
/// `confidentiality\n`; anything past this bound cannot name a level.
pub const MAX_WRITE_LEN: usize = 64;

/// Errors from the write side of the control surface.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ControlError {
    /// The payload is not text this surface can interpret.
    #[error("malformed control payload: {reason}")]
    InvalidPayload {
        /// Why the payload was rejected before any matching was attempted.
        reason: String,
    },

    /// The payload named no labeled lockdown level.
    #[error("no valid lockdown level requested")]
    UnknownLevel,

    /// The named level is not strictly above the current one.
    #[error(transparent)]
    AlreadySatisfied(#[from] RaiseError),
}

/// Render the level enumeration line.
///
/// Every labeled level appears in the fixed increasing order, space
/// separated, with exactly the active level's token wrapped in brackets and
/// a trailing newline in place of the final space:
///
/// ```text
/// none [integrity] confidentiality
/// ```
///
/// The shape is independent of how many raises have occurred, so operators
/// and scripts can parse it.
#[must_use]
pub fn read_levels(state: &LockdownState) -> String {
    let current = state.current();
    let mut line = String::new();
    for level in LockdownLevel::ALL {
        if level == current {
            line.push('[');
            line.push_str(level.label());
            line.push(']');
        } else {
            line.push_str(level.label());
        }
        line.push(' ');
    }
    line.pop();
    line.push('\n');
    line
}

/// Interpret a write payload as a raise request.
///
/// The payload must be UTF-8 of at most [`MAX_WRITE_LEN`] bytes. One
/// trailing newline is stripped; the remainder must exactly match a level
/// label, case sensitive, no surrounding whitespace. Labels are scanned in
/// the fixed level order and the first exact match wins. On success the
/// number of consumed payload bytes is returned.
///
/// # Errors
///
/// - [`ControlError::InvalidPayload`] for non-UTF-8 or oversized payloads.
/// - [`ControlError::UnknownLevel`] when no label matches (including the
///   empty string and near-misses with extra whitespace or wrong case).
/// - [`ControlError::AlreadySatisfied`] when the named level is not strictly
///   above the current one; the state is unchanged.
pub fn write_levels(state: &LockdownState, payload: &[u8]) -> Result<usize, ControlError> {
    if payload.len() > MAX_WRITE_LEN {
        return Err(ControlError::InvalidPayload {
            reason: format!("payload of {} bytes exceeds {MAX_WRITE_LEN}", payload.len()),
        });
    }
    let text = std::str::from_utf8(payload).map_err(|_| ControlError::InvalidPayload {
        reason: "payload is not valid UTF-8".to_owned(),
    })?;
    let token = text.strip_suffix('\n').unwrap_or(text);

    for level in LockdownLevel::ALL {
        if token == level.label() {
            state.raise(level, CONTROL_SOURCE)?;
            return Ok(payload.len());
        }
    }
    Err(ControlError::UnknownLevel)
}

// =============================================================================
// Tests
// =============================================================================

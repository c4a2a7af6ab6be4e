//! Coarse lockdown levels: the operator-selectable milestones.
//!
//! A level is the only granularity the ratchet actually stores. Raising to
//! [`LockdownLevel::Integrity`] denies every reason in the integrity range;
//! raising to [`LockdownLevel::Confidentiality`] denies the full reason set.
//! `None < Integrity < Confidentiality` and transitions are strictly upward
//! (see [`crate::state::LockdownState`]).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::reason::LockdownReason;

/// An operator-selectable lockdown milestone.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum LockdownLevel {
    /// No lockdown in effect.
    #[default]
    None            = 0,
    /// Integrity lockdown: userspace may not modify the running core.
    Integrity       = 1,
    /// Confidentiality lockdown: userspace may additionally not extract
    /// confidential information from the running core.
    Confidentiality = 2,
}

impl LockdownLevel {
    /// Every level, in strictly increasing order. This is the fixed
    /// enumeration order used by the control surface.
    pub const ALL: [Self; 3] = [Self::None, Self::Integrity, Self::Confidentiality];

    /// The milestone reason marking the top of this level's denied range.
    #[must_use]
    pub const fn as_reason(self) -> LockdownReason {
        match self {
            Self::None => LockdownReason::None,
            Self::Integrity => LockdownReason::IntegrityMax,
            Self::Confidentiality => LockdownReason::ConfidentialityMax,
        }
    }

    /// Human-readable label (`none`, `integrity`, `confidentiality`).
    #[must_use]
    pub const fn label(self) -> &'static str {
        self.as_reason().label()
    }

    /// Exact, case-sensitive label lookup scanning [`Self::ALL`] in order;
    /// the first exact match wins.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|level| level.label() == label)
    }

    /// Total mapping from a stored raw value back to a level. Values above
    /// the topmost level clamp to `Confidentiality`, so a reader can never
    /// manufacture an out-of-range level from in-memory state.
    #[must_use]
    pub(crate) const fn from_raw(v: u8) -> Self {
        match v {
            0 => Self::None,
            1 => Self::Integrity,
            _ => Self::Confidentiality,
        }
    }
}

impl fmt::Display for LockdownLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Tests
// =============================================================================

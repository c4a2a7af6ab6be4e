//! Cross-module ratchet scenarios: bootstrap ordering, control surface
//! round-trips, and thread-based linearizability of concurrent raises.
//!
//! The unit tests in each module cover the local contracts; this file
//! exercises the paths a host actually wires together, end to end:
//!
//! - Bootstrap happens-before the control surface: a directive applied at
//!   bootstrap makes a later, lower admin write fail as already satisfied.
//! - Concurrent raises resolve to the higher target with the lower failing
//!   cleanly, across many interleavings.
//! - Concurrent readers never observe the level move downward.

use std::sync::Arc;
use std::sync::Barrier;
use std::thread;

use lockdown_core::{
    ControlError, LockdownConfig, LockdownLevel, LockdownReason, LockdownState, RaiseError,
    read_levels, write_levels,
};

fn bootstrapped(config: &LockdownConfig) -> Arc<LockdownState> {
    LockdownState::unconfigured().bootstrap(config).unwrap()
}

// =============================================================================
// Bootstrap ordering
// =============================================================================

#[test]
fn bootstrap_directive_precedes_admin_writes() {
    let state = bootstrapped(&LockdownConfig {
        directive: Some("confidentiality".to_owned()),
        ..LockdownConfig::default()
    });

    // The bootstrap raise committed before the control surface existed, so
    // a lower admin request must be denied as already satisfied.
    let err = write_levels(&state, b"integrity\n").unwrap_err();
    assert_eq!(
        err,
        ControlError::AlreadySatisfied(RaiseError::AlreadyAtOrAbove {
            current: LockdownLevel::Confidentiality,
            requested: LockdownLevel::Integrity,
        })
    );
    assert_eq!(read_levels(&state), "none integrity [confidentiality]\n");
}

#[test]
fn forced_floor_then_admin_raise_end_to_end() {
    let config = LockdownConfig::from_toml("forced_floor = \"integrity\"").unwrap();
    let state = bootstrapped(&config);

    assert!(state.is_restricted(LockdownReason::Msr));
    assert!(!state.is_restricted(LockdownReason::Kcore));
    assert_eq!(read_levels(&state), "none [integrity] confidentiality\n");

    let consumed = write_levels(&state, b"confidentiality\n").unwrap();
    assert_eq!(consumed, b"confidentiality\n".len());
    assert!(state.is_restricted(LockdownReason::Kcore));
    assert_eq!(read_levels(&state), "none integrity [confidentiality]\n");
}

// =============================================================================
// Monotonicity over raise sequences
// =============================================================================

#[test]
fn observed_level_is_nondecreasing_over_any_raise_sequence() {
    let requests = [
        LockdownLevel::None,
        LockdownLevel::Integrity,
        LockdownLevel::None,
        LockdownLevel::Integrity,
        LockdownLevel::Confidentiality,
        LockdownLevel::Integrity,
        LockdownLevel::Confidentiality,
    ];
    let state = bootstrapped(&LockdownConfig::default());
    let mut previous = state.current();

    for requested in requests {
        let result = state.raise(requested, "sequence test");
        let observed = state.current();
        assert!(observed >= previous, "level decreased: {previous} -> {observed}");
        if requested > previous {
            result.unwrap();
            assert_eq!(observed, requested);
        } else {
            assert_eq!(
                result.unwrap_err(),
                RaiseError::AlreadyAtOrAbove {
                    current: previous,
                    requested,
                }
            );
            assert_eq!(observed, previous);
        }
        previous = observed;
    }
}

// =============================================================================
// Linearizability under concurrency
// =============================================================================

#[test]
fn concurrent_raises_resolve_to_the_higher_target() {
    // Repeat to shake out interleavings; each iteration uses a fresh state.
    for _ in 0..200 {
        let state = bootstrapped(&LockdownConfig::default());
        let barrier = Arc::new(Barrier::new(2));

        let results: Vec<Result<(), RaiseError>> =
            [LockdownLevel::Integrity, LockdownLevel::Confidentiality]
                .into_iter()
                .map(|target| {
                    let state = Arc::clone(&state);
                    let barrier = Arc::clone(&barrier);
                    thread::spawn(move || {
                        barrier.wait();
                        state.raise(target, "race test")
                    })
                })
                .collect::<Vec<_>>()
                .into_iter()
                .map(|handle| handle.join().unwrap())
                .collect();

        assert_eq!(state.current(), LockdownLevel::Confidentiality);
        // The confidentiality raise always wins; the integrity raise either
        // committed first (None -> Integrity -> Confidentiality) or lost the
        // race and failed cleanly (None -> Confidentiality).
        assert!(results[1].is_ok());
        if let Err(err) = results[0] {
            assert_eq!(
                err,
                RaiseError::AlreadyAtOrAbove {
                    current: LockdownLevel::Confidentiality,
                    requested: LockdownLevel::Integrity,
                }
            );
        }
    }
}

#[test]
fn readers_never_observe_a_decrease_during_raises() {
    let state = bootstrapped(&LockdownConfig::default());
    let barrier = Arc::new(Barrier::new(4));

    let writers: Vec<_> = [LockdownLevel::Integrity, LockdownLevel::Confidentiality]
        .into_iter()
        .map(|target| {
            let state = Arc::clone(&state);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                let _ = state.raise(target, "reader test");
            })
        })
        .collect();

    let readers: Vec<_> = (0..2)
        .map(|_| {
            let state = Arc::clone(&state);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                let mut previous = LockdownLevel::None;
                for _ in 0..10_000 {
                    let observed = state.current();
                    assert!(observed >= previous, "level decreased under a reader");
                    previous = observed;
                }
            })
        })
        .collect();

    for handle in writers.into_iter().chain(readers) {
        handle.join().unwrap();
    }
    assert_eq!(state.current(), LockdownLevel::Confidentiality);
}

#[test]
fn concurrent_admin_writes_settle_on_the_higher_level() {
    for _ in 0..100 {
        let state = bootstrapped(&LockdownConfig::default());
        let barrier = Arc::new(Barrier::new(2));

        let handles: Vec<_> = [&b"integrity\n"[..], b"confidentiality\n"]
            .into_iter()
            .map(|payload| {
                let state = Arc::clone(&state);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    write_levels(&state, payload)
                })
            })
            .collect();
        for handle in handles {
            let _ = handle.join().unwrap();
        }

        assert_eq!(read_levels(&state), "none integrity [confidentiality]\n");
    }
}

// =============================================================================
// Authorization threshold, end to end
// =============================================================================

#[test]
fn restriction_flips_exactly_at_the_milestone() {
    let state = bootstrapped(&LockdownConfig::default());

    assert!(!state.is_restricted(LockdownReason::Hibernation));
    write_levels(&state, b"integrity\n").unwrap();
    assert!(state.is_restricted(LockdownReason::Hibernation));
    assert!(!state.is_restricted(LockdownReason::BpfRead));
    write_levels(&state, b"confidentiality\n").unwrap();
    assert!(state.is_restricted(LockdownReason::BpfRead));
}

// =============================================================================
// Emergency lift (feature-gated)
// =============================================================================

#[cfg(feature = "emergency-lift")]
mod lift {
    use lockdown_core::LiftTrigger;

    use super::*;

    #[test]
    fn lift_resets_and_unrestricts_immediately() {
        let state = bootstrapped(&LockdownConfig {
            directive: Some("confidentiality".to_owned()),
            ..LockdownConfig::default()
        });
        let trigger = LiftTrigger::register(&state).expect("level is above none");

        assert!(state.is_restricted(LockdownReason::Msr));
        trigger.fire();
        assert_eq!(state.current(), LockdownLevel::None);
        assert!(!state.is_restricted(LockdownReason::Msr));
        assert!(!state.is_restricted(LockdownReason::Tracefs));
        assert_eq!(read_levels(&state), "[none] integrity confidentiality\n");
    }

    #[test]
    fn no_trigger_is_installed_when_nothing_is_locked() {
        let state = bootstrapped(&LockdownConfig::default());
        assert!(LiftTrigger::register(&state).is_none());
    }
}

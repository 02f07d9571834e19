//! Backend health state machine.
//!
//! # States
//! - Unknown: initial state, never re-entered once Up or Down is observed
//! - Up: backend is a member of the LVS real-server set
//! - Down: backend excluded from forwarding
//!
//! # State Transitions
//! ```text
//! {Unknown, Up}   → Down: average loss >= threshold
//! {Unknown, Down} → Up:   average loss <  threshold
//! ```
//!
//! # Design Decisions
//! - Single threshold, no hysteresis: one tick crossing the boundary flips
//!   the state immediately; a borderline target may flap every tick
//! - The boundary is inclusive on the Down side (avg == threshold is Down)
//! - Pure function; never touches the network

use std::fmt;

/// Health classification for one backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthState {
    Unknown,
    Up,
    Down,
}

impl fmt::Display for HealthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            HealthState::Unknown => "UNKNOWN",
            HealthState::Up => "UP",
            HealthState::Down => "DOWN",
        };
        f.write_str(label)
    }
}

/// Apply the transition policy to a smoothed loss reading.
///
/// Returns the next state and whether a transition occurred. A target in
/// `Unknown` below the threshold transitions to `Up`, triggering the
/// bootstrap add; one at or above it goes straight to `Down` without ever
/// having been added.
pub fn evaluate(average_loss: u8, current: HealthState, loss_threshold: u8) -> (HealthState, bool) {
    if average_loss >= loss_threshold && current != HealthState::Down {
        (HealthState::Down, true)
    } else if average_loss < loss_threshold && current != HealthState::Up {
        (HealthState::Up, true)
    } else {
        (current, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THRESHOLD: u8 = 5;

    #[test]
    fn unknown_below_threshold_bootstraps_to_up() {
        assert_eq!(
            evaluate(0, HealthState::Unknown, THRESHOLD),
            (HealthState::Up, true)
        );
    }

    #[test]
    fn unknown_at_threshold_goes_straight_down() {
        assert_eq!(
            evaluate(THRESHOLD, HealthState::Unknown, THRESHOLD),
            (HealthState::Down, true)
        );
    }

    #[test]
    fn boundary_is_inclusive_on_the_down_side() {
        assert_eq!(
            evaluate(THRESHOLD, HealthState::Up, THRESHOLD),
            (HealthState::Down, true)
        );
        assert_eq!(
            evaluate(THRESHOLD - 1, HealthState::Down, THRESHOLD),
            (HealthState::Up, true)
        );
    }

    #[test]
    fn steady_states_do_not_retransition() {
        assert_eq!(
            evaluate(0, HealthState::Up, THRESHOLD),
            (HealthState::Up, false)
        );
        assert_eq!(
            evaluate(100, HealthState::Down, THRESHOLD),
            (HealthState::Down, false)
        );
    }

    #[test]
    fn up_to_down_and_back() {
        let (state, transitioned) = evaluate(80, HealthState::Up, THRESHOLD);
        assert!(transitioned);
        let (state, transitioned) = evaluate(2, state, THRESHOLD);
        assert_eq!(state, HealthState::Up);
        assert!(transitioned);
    }

    #[test]
    fn unknown_is_never_re_entered() {
        // evaluate only ever returns Up or Down as the next state.
        for avg in [0, THRESHOLD, 100] {
            for current in [HealthState::Unknown, HealthState::Up, HealthState::Down] {
                let (next, _) = evaluate(avg, current, THRESHOLD);
                if current != HealthState::Unknown {
                    assert_ne!(next, HealthState::Unknown);
                }
            }
        }
    }
}

/*!
 * Initialization State
 * Lifecycle state machine shared by every singleton cell
 */

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

/// Lifecycle of a single instance slot
///
/// # Transitions
///
/// - `Unconstructed -> UnderConstruction`: first access observing an empty slot
/// - `UnderConstruction -> Ready`: constructor returned and the instance was published
/// - `UnderConstruction -> Unconstructed`: constructor failed, a later call may retry
/// - `Ready -> Destroyed`: teardown ran (terminal)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum InitState {
    Unconstructed = 0,
    UnderConstruction = 1,
    Ready = 2,
    Destroyed = 3,
}

impl InitState {
    #[inline]
    const fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Self::Unconstructed,
            1 => Self::UnderConstruction,
            2 => Self::Ready,
            _ => Self::Destroyed,
        }
    }

    /// Whether `self -> next` is an edge of the state machine
    pub const fn can_transition_to(self, next: InitState) -> bool {
        matches!(
            (self, next),
            (Self::Unconstructed, Self::UnderConstruction)
                | (Self::UnderConstruction, Self::Ready)
                | (Self::UnderConstruction, Self::Unconstructed)
                | (Self::Ready, Self::Destroyed)
        )
    }

    #[inline]
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Ready)
    }

    #[inline]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Destroyed)
    }
}

impl fmt::Display for InitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unconstructed => "unconstructed",
            Self::UnderConstruction => "under_construction",
            Self::Ready => "ready",
            Self::Destroyed => "destroyed",
        };
        f.write_str(name)
    }
}

/// Atomic holder for an [`InitState`]
///
/// Informational only: the instance pointer (or the one-time cell) stays the
/// source of truth for whether an instance exists. State changes use
/// acquire/release so a reader seeing `Ready` also sees the published slot.
#[derive(Debug)]
pub struct AtomicInitState(AtomicU8);

impl AtomicInitState {
    pub const fn new(state: InitState) -> Self {
        Self(AtomicU8::new(state as u8))
    }

    #[inline]
    pub fn load(&self) -> InitState {
        InitState::from_u8(self.0.load(Ordering::Acquire))
    }

    /// Move from `current` to `next` if the slot is still in `current`
    ///
    /// Returns the observed state on failure. Edges outside the state
    /// machine are rejected without touching the slot.
    pub fn transition(&self, current: InitState, next: InitState) -> Result<InitState, InitState> {
        if !current.can_transition_to(next) {
            return Err(self.load());
        }
        self.0
            .compare_exchange(current as u8, next as u8, Ordering::AcqRel, Ordering::Acquire)
            .map(InitState::from_u8)
            .map_err(InitState::from_u8)
    }
}

impl Default for AtomicInitState {
    fn default() -> Self {
        Self::new(InitState::Unconstructed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_transitions() {
        let state = AtomicInitState::default();
        assert_eq!(state.load(), InitState::Unconstructed);

        assert!(state
            .transition(InitState::Unconstructed, InitState::UnderConstruction)
            .is_ok());
        assert!(state
            .transition(InitState::UnderConstruction, InitState::Ready)
            .is_ok());
        assert!(state.load().is_ready());

        assert!(state.transition(InitState::Ready, InitState::Destroyed).is_ok());
        assert!(state.load().is_terminal());
    }

    #[test]
    fn test_failed_construction_rolls_back() {
        let state = AtomicInitState::new(InitState::UnderConstruction);
        assert!(state
            .transition(InitState::UnderConstruction, InitState::Unconstructed)
            .is_ok());
        assert_eq!(state.load(), InitState::Unconstructed);
    }

    #[test]
    fn test_illegal_edges_rejected() {
        let state = AtomicInitState::new(InitState::Destroyed);
        assert_eq!(
            state.transition(InitState::Destroyed, InitState::Ready),
            Err(InitState::Destroyed)
        );

        let state = AtomicInitState::default();
        assert_eq!(
            state.transition(InitState::Unconstructed, InitState::Ready),
            Err(InitState::Unconstructed)
        );
    }

    #[test]
    fn test_stale_current_rejected() {
        let state = AtomicInitState::new(InitState::Ready);
        assert_eq!(
            state.transition(InitState::Unconstructed, InitState::UnderConstruction),
            Err(InitState::Ready)
        );
    }

    #[test]
    fn test_display_and_serde() {
        assert_eq!(InitState::UnderConstruction.to_string(), "under_construction");
        let json = serde_json::to_string(&InitState::Ready).unwrap();
        assert_eq!(json, "\"ready\"");
    }
}

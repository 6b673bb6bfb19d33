//! Lifecycle state definitions for a frontier
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

/// Represents the current phase of a frontier
///
/// A frontier moves strictly forward:
/// `Idle -> Running -> Draining -> Terminated`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrontierState {
    /// Created, accepting seeds, workers not launched
    Idle,

    /// Workers are pulling from the queue
    Running,

    /// No outstanding work or the run ceiling was hit; workers are exiting
    Draining,

    /// Every worker has stopped; the visited set is final
    Terminated,
}

impl FrontierState {
    /// Returns true once the run has fully stopped
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminated)
    }

    /// Returns true if new addresses may still be scheduled
    pub fn accepts_work(&self) -> bool {
        matches!(self, Self::Idle | Self::Running)
    }

    /// Returns true if `next` is a legal successor of this state
    pub fn can_transition_to(&self, next: FrontierState) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Running)
                | (Self::Running, Self::Draining)
                | (Self::Draining, Self::Terminated)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Draining => "draining",
            Self::Terminated => "terminated",
        }
    }

    fn to_u8(self) -> u8 {
        match self {
            Self::Idle => 0,
            Self::Running => 1,
            Self::Draining => 2,
            Self::Terminated => 3,
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Idle,
            1 => Self::Running,
            2 => Self::Draining,
            _ => Self::Terminated,
        }
    }
}

impl fmt::Display for FrontierState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Atomic holder for a `FrontierState`
#[derive(Debug)]
pub struct SharedFrontierState {
    inner: AtomicU8,
}

impl SharedFrontierState {
    pub fn new() -> Self {
        Self {
            inner: AtomicU8::new(FrontierState::Idle.to_u8()),
        }
    }

    pub fn get(&self) -> FrontierState {
        FrontierState::from_u8(self.inner.load(Ordering::Acquire))
    }

    /// Moves from `from` to `to` if the current state is exactly `from`
    ///
    /// Returns false when another caller already moved the state, or when
    /// the transition is not legal.
    pub fn advance(&self, from: FrontierState, to: FrontierState) -> bool {
        if !from.can_transition_to(to) {
            return false;
        }

        let moved = self
            .inner
            .compare_exchange(from.to_u8(), to.to_u8(), Ordering::AcqRel, Ordering::Acquire)
            .is_ok();

        if moved {
            tracing::debug!("Frontier state {} -> {}", from, to);
        }
        moved
    }
}

impl Default for SharedFrontierState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_transitions() {
        assert!(FrontierState::Idle.can_transition_to(FrontierState::Running));
        assert!(FrontierState::Running.can_transition_to(FrontierState::Draining));
        assert!(FrontierState::Draining.can_transition_to(FrontierState::Terminated));
    }

    #[test]
    fn test_no_backward_or_skipping_transitions() {
        assert!(!FrontierState::Running.can_transition_to(FrontierState::Idle));
        assert!(!FrontierState::Idle.can_transition_to(FrontierState::Terminated));
        assert!(!FrontierState::Terminated.can_transition_to(FrontierState::Running));
        assert!(!FrontierState::Idle.can_transition_to(FrontierState::Idle));
    }

    #[test]
    fn test_accepts_work() {
        assert!(FrontierState::Idle.accepts_work());
        assert!(FrontierState::Running.accepts_work());
        assert!(!FrontierState::Draining.accepts_work());
        assert!(!FrontierState::Terminated.accepts_work());
    }

    #[test]
    fn test_is_terminal() {
        assert!(FrontierState::Terminated.is_terminal());
        assert!(!FrontierState::Draining.is_terminal());
    }

    #[test]
    fn test_display() {
        assert_eq!(FrontierState::Idle.to_string(), "idle");
        assert_eq!(FrontierState::Terminated.to_string(), "terminated");
    }

    #[test]
    fn test_shared_state_advance_once() {
        let state = SharedFrontierState::new();
        assert_eq!(state.get(), FrontierState::Idle);

        assert!(state.advance(FrontierState::Idle, FrontierState::Running));
        assert!(!state.advance(FrontierState::Idle, FrontierState::Running));
        assert_eq!(state.get(), FrontierState::Running);
    }

    #[test]
    fn test_shared_state_rejects_illegal_jump() {
        let state = SharedFrontierState::new();
        assert!(!state.advance(FrontierState::Idle, FrontierState::Terminated));
        assert_eq!(state.get(), FrontierState::Idle);
    }
}

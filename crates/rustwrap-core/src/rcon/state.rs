//! RCON connection states.

use std::fmt;

/// Lifecycle of the RCON client.
///
/// `Connecting` is re-entered from `Connected` when a live session fails;
/// `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RconState {
    Idle,
    Connecting,
    Connected,
    Closed,
}

impl RconState {
    /// Whether moving from `self` to `next` is a legal transition.
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Idle | Self::Connected, Self::Connecting)
                | (Self::Connecting, Self::Connecting | Self::Connected | Self::Closed)
                | (Self::Connected, Self::Closed)
        )
    }
}

impl fmt::Display for RconState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Closed => "closed",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::RconState::{Closed, Connected, Connecting, Idle};

    #[test]
    fn transitions() {
        assert!(Idle.can_transition_to(Connecting));
        assert!(Connecting.can_transition_to(Connected));
        assert!(Connecting.can_transition_to(Connecting));
        assert!(Connected.can_transition_to(Connecting));
        assert!(Connected.can_transition_to(Closed));
        assert!(Connecting.can_transition_to(Closed));

        assert!(!Idle.can_transition_to(Connected));
        assert!(!Closed.can_transition_to(Connecting));
        assert!(!Connected.can_transition_to(Idle));
        assert!(!Closed.can_transition_to(Closed));
    }
}

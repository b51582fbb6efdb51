//! Decision states and the tags queued events carry.

use std::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DecisionState {
    Idle,
    RequestingMaps,
    Deciding,
    ConvertedToRelay,
    RemainedParked,
    /// A reply could not be decoded.
    Failed,
}

impl DecisionState {
    /// End of a cycle; only re-arming leaves these.
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            DecisionState::ConvertedToRelay | DecisionState::RemainedParked | DecisionState::Failed
        )
    }
}

impl fmt::Display for DecisionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// What a queued `Trigger`/`Decide` event expects to find when it runs.
///
/// `epoch` changes every time a vehicle is armed, so an event queued for an
/// earlier parking stint never matches a later one even if the state does.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Ticket {
    pub epoch: u32,
    pub state: DecisionState,
}

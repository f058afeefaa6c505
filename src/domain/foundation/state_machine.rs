//! State machine trait for step enums.
//!
//! Gives the discovery step enum (and anything shaped like it) one place to
//! declare its legal edges, with checked transitions derived from that table.

use super::ValidationError;

/// Trait for enums whose values form a finite state machine.
///
/// Implementors list their legal edges; `transition_to` and `is_terminal`
/// come for free.
///
/// ```ignore
/// let next = DiscoveryStep::AskRequired.transition_to(DiscoveryStep::AskTheme)?;
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Returns true if the edge `self -> target` is legal.
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Returns every legal target from the current state.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Performs a checked transition.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(ValidationError::invalid_format(
                "state_transition",
                format!("Cannot transition from {:?} to {:?}", self, target),
            ))
        }
    }

    /// A state with no outgoing edges is terminal.
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}

//! Result of a player action.
//!
//! Actions never fail loudly: an unknown id, a missing resource or an unmet
//! precondition hands the input state back untouched. `applied` lets callers
//! tell the two cases apart without diffing states.

use crate::state::GameState;

#[derive(Clone, Debug, PartialEq)]
pub struct Outcome {
    pub state: GameState,
    pub applied: bool,
}

impl Outcome {
    pub fn applied(state: GameState) -> Self {
        Self {
            state,
            applied: true,
        }
    }

    /// The action was rejected; carry the input forward unchanged.
    pub fn unchanged(state: &GameState) -> Self {
        Self {
            state: state.clone(),
            applied: false,
        }
    }

    pub fn into_state(self) -> GameState {
        self.state
    }
}

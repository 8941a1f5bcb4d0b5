use super::intent::Intent;
use super::state::ViewState;

/// Reducer advances a state machine by one intent.
///
/// Must be a pure function: (State, Intent) -> State.
pub trait Reducer {
    type State: ViewState;
    type Intent: Intent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State;
}

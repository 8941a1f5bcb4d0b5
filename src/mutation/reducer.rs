use crate::mvi::Reducer;

use super::intent::MutationIntent;
use super::state::MutationState;

pub struct MutationReducer;

impl Reducer for MutationReducer {
    type State = MutationState;
    type Intent = MutationIntent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            // A new write may start from any state, including after a failure.
            MutationIntent::Started { operation } => MutationState::Pending { operation },

            MutationIntent::Completed { operation } => match state {
                MutationState::Pending { .. } => MutationState::Succeeded { operation },
                other => other,
            },

            MutationIntent::Rejected { operation, error } => match state {
                MutationState::Pending { .. } => MutationState::Failed { operation, error },
                other => other,
            },

            MutationIntent::Acknowledge => match state {
                MutationState::Pending { .. } => state,
                _ => MutationState::Idle,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use crate::mutation::state::Operation;

    #[test]
    fn success_path() {
        let state = MutationReducer::reduce(
            MutationState::Idle,
            MutationIntent::Started {
                operation: Operation::Update,
            },
        );
        assert!(state.is_pending());

        let state = MutationReducer::reduce(
            state,
            MutationIntent::Completed {
                operation: Operation::Update,
            },
        );
        assert_eq!(
            state,
            MutationState::Succeeded {
                operation: Operation::Update
            }
        );

        let state = MutationReducer::reduce(state, MutationIntent::Acknowledge);
        assert_eq!(state, MutationState::Idle);
    }

    #[test]
    fn failure_is_kept_until_acknowledged() {
        let pending = MutationState::Pending {
            operation: Operation::Delete,
        };
        let state = MutationReducer::reduce(
            pending,
            MutationIntent::Rejected {
                operation: Operation::Delete,
                error: ClientError::network("offline"),
            },
        );
        assert_eq!(state.error(), Some(&ClientError::network("offline")));

        let state = MutationReducer::reduce(state, MutationIntent::Acknowledge);
        assert_eq!(state, MutationState::Idle);
    }

    #[test]
    fn resubmit_after_failure() {
        let failed = MutationState::Failed {
            operation: Operation::Create,
            error: ClientError::from_status(500, String::new()),
        };
        let state = MutationReducer::reduce(
            failed,
            MutationIntent::Started {
                operation: Operation::Create,
            },
        );
        assert!(state.is_pending());
    }

    #[test]
    fn completion_without_pending_is_ignored() {
        let state = MutationReducer::reduce(
            MutationState::Idle,
            MutationIntent::Completed {
                operation: Operation::Create,
            },
        );
        assert_eq!(state, MutationState::Idle);
    }

    #[test]
    fn acknowledge_does_not_hide_pending_write() {
        let pending = MutationState::Pending {
            operation: Operation::Update,
        };
        let state = MutationReducer::reduce(pending.clone(), MutationIntent::Acknowledge);
        assert_eq!(state, pending);
    }
}

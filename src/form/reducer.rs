use crate::mvi::Reducer;

use super::intent::FormIntent;
use super::state::{FormPhase, FormState};

pub struct FormReducer;

impl Reducer for FormReducer {
    type State = FormState;
    type Intent = FormIntent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            FormIntent::Edit { field, value } => {
                let FormState {
                    mut values,
                    mut errors,
                    phase,
                } = state;
                errors.remove(&field);
                values.insert(field, value);
                let phase = match phase {
                    // Edits do not interrupt an in-flight submission
                    FormPhase::Submitting => FormPhase::Submitting,
                    _ => FormPhase::Editing,
                };
                FormState {
                    values,
                    errors,
                    phase,
                }
            }

            FormIntent::Validated { errors } => {
                let phase = if errors.is_empty() {
                    FormPhase::Submitting
                } else {
                    FormPhase::Blocked
                };
                FormState {
                    values: state.values,
                    errors,
                    phase,
                }
            }

            FormIntent::Succeeded { at } => {
                let values = state
                    .values
                    .into_keys()
                    .map(|field| (field, String::new()))
                    .collect();
                FormState {
                    values,
                    errors: Default::default(),
                    phase: FormPhase::Succeeded { shown_at: at },
                }
            }

            FormIntent::Failed { message } => FormState {
                phase: FormPhase::Failed { message },
                ..state
            },

            FormIntent::DismissSuccess => match state.phase {
                FormPhase::Succeeded { .. } => FormState {
                    phase: FormPhase::Editing,
                    ..state
                },
                _ => state,
            },

            FormIntent::Load { values } => FormState::with_values(values),
        }
    }
}

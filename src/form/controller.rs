//! Drives a form through validation and submission.

use std::future::Future;
use std::time::{Duration, Instant};

use crate::error::ClientError;
use crate::mvi::Reducer;

use super::intent::FormIntent;
use super::reducer::FormReducer;
use super::rules::{FormSchema, FormValues, ValidationErrors};
use super::state::{FormPhase, FormState};

/// Owns a form's schema and state and runs the submit lifecycle.
///
/// Resubmission is unrestricted: no attempt counter and no debounce.
pub struct FormController {
    schema: FormSchema,
    state: FormState,
    success_display: Duration,
    failure_message: Option<String>,
}

impl FormController {
    pub fn new(schema: FormSchema, success_display: Duration) -> Self {
        let state = FormState::with_values(schema.blank_values());
        Self {
            schema,
            state,
            success_display,
            failure_message: None,
        }
    }

    /// Fixed text for failed submissions instead of the server's message.
    pub fn with_failure_message(mut self, message: impl Into<String>) -> Self {
        self.failure_message = Some(message.into());
        self
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn set(&mut self, field: &str, value: impl Into<String>) {
        self.dispatch(FormIntent::Edit {
            field: field.to_string(),
            value: value.into(),
        });
    }

    pub fn load(&mut self, values: FormValues) {
        self.dispatch(FormIntent::Load { values });
    }

    /// Revert the success indicator once its display time has passed.
    pub fn tick(&mut self, now: Instant) {
        if let FormPhase::Succeeded { shown_at } = self.state.phase {
            if now.saturating_duration_since(shown_at) >= self.success_display {
                self.dispatch(FormIntent::DismissSuccess);
            }
        }
    }

    /// Validate, then hand the values to `send`.
    ///
    /// Validation failures never reach `send` and come back as
    /// `ClientError::Validation`. On success the form is cleared; on
    /// failure the entered values stay.
    pub async fn submit<F, Fut, T>(&mut self, send: F) -> Result<T, ClientError>
    where
        F: FnOnce(FormValues) -> Fut,
        Fut: Future<Output = Result<T, ClientError>>,
    {
        let errors = match self.schema.validate(&self.state.values) {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };

        if !errors.is_empty() {
            tracing::debug!(fields = %errors, "Form submission blocked");
            self.dispatch(FormIntent::Validated {
                errors: errors.clone(),
            });
            return Err(ClientError::Validation(errors));
        }

        self.dispatch(FormIntent::Validated { errors });

        match send(self.state.values.clone()).await {
            Ok(output) => {
                self.dispatch(FormIntent::Succeeded { at: Instant::now() });
                Ok(output)
            }
            Err(err) => {
                let message = self
                    .failure_message
                    .clone()
                    .unwrap_or_else(|| err.user_message());
                tracing::warn!(error = %err, "Form submission failed");
                self.dispatch(FormIntent::Failed { message });
                Err(err)
            }
        }
    }

    fn dispatch(&mut self, intent: FormIntent) {
        let state = std::mem::take(&mut self.state);
        self.state = FormReducer::reduce(state, intent);
    }
}

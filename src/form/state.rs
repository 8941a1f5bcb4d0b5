//! State of a form submission lifecycle.

use std::time::Instant;

use crate::mvi::ViewState;

use super::rules::{FormValues, ValidationErrors};

/// Where the form is in its submit lifecycle.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FormPhase {
    /// The user is entering values.
    #[default]
    Editing,
    /// A submit attempt failed validation; errors are shown.
    Blocked,
    /// Values passed validation and are on the wire.
    Submitting,
    /// The server accepted the submission; values were cleared.
    Succeeded {
        /// When the success indicator went up.
        shown_at: Instant,
    },
    /// The server or network failed; values are preserved.
    Failed {
        /// Notification text for the failure.
        message: String,
    },
}

/// Form values, field errors and lifecycle phase.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormState {
    pub values: FormValues,
    pub errors: ValidationErrors,
    pub phase: FormPhase,
}

impl ViewState for FormState {}

impl FormState {
    pub fn with_values(values: FormValues) -> Self {
        Self {
            values,
            ..Self::default()
        }
    }

    pub fn value(&self, field: &str) -> &str {
        self.values.get(field).map(String::as_str).unwrap_or("")
    }

    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field)
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.phase, FormPhase::Submitting)
    }

    pub fn is_success_shown(&self) -> bool {
        matches!(self.phase, FormPhase::Succeeded { .. })
    }

    /// Failure notification, if the last submission failed.
    pub fn failure(&self) -> Option<&str> {
        match &self.phase {
            FormPhase::Failed { message } => Some(message),
            _ => None,
        }
    }
}

use std::time::Instant;

use crate::mvi::Intent;

use super::rules::{FormValues, ValidationErrors};

#[derive(Debug, Clone)]
pub enum FormIntent {
    /// User changed a field.
    Edit { field: String, value: String },
    /// A submit attempt was validated. Empty errors means it may proceed.
    Validated { errors: ValidationErrors },
    /// The server accepted the submission.
    Succeeded { at: Instant },
    /// The submission failed; values stay as entered.
    Failed { message: String },
    /// The success indicator's display time elapsed.
    DismissSuccess,
    /// Replace every value (e.g., loading a record for editing).
    Load { values: FormValues },
}

impl Intent for FormIntent {}

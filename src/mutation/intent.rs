use crate::error::ClientError;
use crate::mvi::Intent;

use super::state::Operation;

#[derive(Debug, Clone)]
pub enum MutationIntent {
    /// The request was handed to the API.
    Started { operation: Operation },
    /// The server accepted the write and affected keys were invalidated.
    Completed { operation: Operation },
    Rejected {
        operation: Operation,
        error: ClientError,
    },
    /// The view has shown the outcome.
    Acknowledge,
}

impl Intent for MutationIntent {}

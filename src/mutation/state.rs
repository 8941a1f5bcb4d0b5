use crate::error::ClientError;
use crate::mvi::ViewState;

/// Kind of write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }
}

/// Lifecycle of the most recent write issued through a coordinator.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum MutationState {
    #[default]
    Idle,
    Pending {
        operation: Operation,
    },
    Succeeded {
        operation: Operation,
    },
    /// Kept until acknowledged so the view can show the error.
    Failed {
        operation: Operation,
        error: ClientError,
    },
}

impl ViewState for MutationState {}

impl MutationState {
    pub fn is_pending(&self) -> bool {
        matches!(self, MutationState::Pending { .. })
    }

    pub fn error(&self) -> Option<&ClientError> {
        match self {
            MutationState::Failed { error, .. } => Some(error),
            _ => None,
        }
    }
}

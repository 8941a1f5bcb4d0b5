use crate::error::ClientError;

/// Lifecycle of one cache key.
///
/// ```text
/// absent ──→ loading ──→ ready
///   ↑           │
///   │           └──────→ error ──(fetch)──→ loading
///   └── invalidate (from ready or error)
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum EntryState<V> {
    /// Never fetched, or invalidated since.
    Absent,
    /// A request is in flight; further readers join it.
    Loading,
    Ready(V),
    /// The last request failed; kept until the next fetch.
    Error(ClientError),
}

impl<V> Default for EntryState<V> {
    fn default() -> Self {
        Self::Absent
    }
}

impl<V> EntryState<V> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    pub fn value(&self) -> Option<&V> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ClientError> {
        match self {
            Self::Error(err) => Some(err),
            _ => None,
        }
    }

    /// Short label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Absent => "absent",
            Self::Loading => "loading",
            Self::Ready(_) => "ready",
            Self::Error(_) => "error",
        }
    }
}

//! At-most-once page view counting per session.

use std::sync::Arc;

use crate::api::Api;
use crate::session::KeyValueStore;

/// Session-scoped flag set once the view has been counted.
pub const VIEW_FLAG_KEY: &str = "viewIncremented";

/// Gate around the view counter endpoint.
///
/// The flag is set before the request goes out, so re-entrant calls
/// (several views mounting at once) never double count. A failed request
/// is logged and not retried; the visit is simply lost.
#[derive(Clone)]
pub struct ViewCounter {
    api: Api,
    flags: Arc<dyn KeyValueStore>,
}

impl ViewCounter {
    pub fn new(api: Api, flags: Arc<dyn KeyValueStore>) -> Self {
        Self { api, flags }
    }

    /// Count this session's visit if nothing has yet.
    ///
    /// Returns true when this call issued the request, whether or not the
    /// server accepted it.
    pub async fn increment_once(&self) -> bool {
        match self.flags.set_if_absent(VIEW_FLAG_KEY, "true") {
            Ok(true) => {}
            Ok(false) => {
                tracing::trace!("View already counted this session");
                return false;
            }
            Err(err) => {
                tracing::warn!(error = %err, "View flag unavailable, skipping increment");
                return false;
            }
        }

        if let Err(err) = self.api.increment_views().await {
            tracing::warn!(
                error_type = err.error_type(),
                error = %err,
                "View increment failed"
            );
        }
        true
    }

    pub fn has_fired(&self) -> bool {
        matches!(self.flags.get(VIEW_FLAG_KEY), Ok(Some(_)))
    }
}

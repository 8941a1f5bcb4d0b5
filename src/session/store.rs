//! Single-slot holder for the admin bearer credential.

use std::sync::Arc;

use crate::config::SecureString;
use crate::error::ClientError;

use super::storage::KeyValueStore;

/// Durable storage key for the credential.
pub const TOKEN_KEY: &str = "adminToken";

/// Holds the bearer credential in durable storage.
///
/// The credential is opaque: it is never parsed or checked for expiry
/// here. An expired token is discovered when the server rejects it.
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    /// Current credential, `None` when signed out.
    ///
    /// Unreadable storage counts as signed out.
    pub fn get(&self) -> Option<SecureString> {
        match self.storage.get(TOKEN_KEY) {
            Ok(Some(token)) if !token.is_empty() => Some(SecureString::new(token)),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read session credential");
                None
            }
        }
    }

    /// Replace the credential.
    pub fn set(&self, credential: &SecureString) -> Result<(), ClientError> {
        self.storage.set(TOKEN_KEY, credential.expose())?;
        tracing::debug!("Session credential stored");
        Ok(())
    }

    pub fn clear(&self) -> Result<(), ClientError> {
        self.storage.remove(TOKEN_KEY)?;
        tracing::debug!("Session credential cleared");
        Ok(())
    }

    pub fn is_authenticated(&self) -> bool {
        self.get().is_some()
    }
}

//! Authorization header building for outbound requests.

use crate::config::SecureString;
use crate::session::SessionStore;

/// Header name and value for authentication.
pub type AuthHeader = (String, String);

/// Build the `Authorization: Bearer` header for a credential.
pub fn bearer_header(credential: &SecureString) -> AuthHeader {
    (
        "Authorization".to_string(),
        format!("Bearer {}", credential.expose()),
    )
}

/// Header for whatever credential the session currently holds.
///
/// Returns `None` when signed out; the request then goes without one.
pub fn session_auth_header(session: &SessionStore) -> Option<AuthHeader> {
    session.get().map(|credential| bearer_header(&credential))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::session::MemoryStore;

    #[test]
    fn test_bearer_header() {
        let (name, value) = bearer_header(&SecureString::new("bearer-token-456"));
        assert_eq!(name, "Authorization");
        assert_eq!(value, "Bearer bearer-token-456");
    }

    #[test]
    fn test_no_credential_no_header() {
        let session = SessionStore::new(Arc::new(MemoryStore::new()));
        assert!(session_auth_header(&session).is_none());
    }

    #[test]
    fn test_session_credential_header() {
        let session = SessionStore::new(Arc::new(MemoryStore::new()));
        session.set(&SecureString::new("abc")).unwrap();
        let (_, value) = session_auth_header(&session).unwrap();
        assert_eq!(value, "Bearer abc");
    }
}

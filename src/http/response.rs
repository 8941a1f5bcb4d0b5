use serde::de::DeserializeOwned;

use crate::error::ClientError;

/// A successful response with its body fully read.
#[derive(Debug, Clone)]
pub struct ResponseBody {
    label: String,
    status: u16,
    bytes: Vec<u8>,
}

impl ResponseBody {
    pub(crate) fn new(label: String, status: u16, bytes: Vec<u8>) -> Self {
        Self {
            label,
            status,
            bytes,
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Decode the body into a typed record.
    ///
    /// A shape mismatch is a `Decode` error naming the request.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ClientError> {
        serde_json::from_slice(&self.bytes)
            .map_err(|e| ClientError::decode(format!("{}: {}", self.label, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_error_names_request() {
        let body = ResponseBody::new("GET profile".into(), 200, b"[1,2]".to_vec());
        let err = body.json::<std::collections::BTreeMap<String, String>>().unwrap_err();
        match err {
            ClientError::Decode { message } => assert!(message.starts_with("GET profile")),
            other => panic!("expected Decode, got {:?}", other),
        }
    }
}

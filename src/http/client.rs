use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::{ApiConfig, ConfigError};
use crate::error::ClientError;
use crate::session::SessionStore;

use super::auth::session_auth_header;
use super::base::ApiBase;
use super::response::ResponseBody;

/// HTTP adapter for the portfolio API.
///
/// Resolves paths against the API root, attaches the session credential
/// when one is present, and turns every failure into a typed
/// `ClientError`. Single attempt: no retries at this layer.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    base: ApiBase,
    session: SessionStore,
}

impl HttpClient {
    pub fn new(config: &ApiConfig, session: SessionStore) -> Result<Self, ConfigError> {
        let base = ApiBase::new(&config.base_url, &config.api_prefix)?;
        let client = Client::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.timeout())
            .build()
            .map_err(|source| ConfigError::ClientBuild { source })?;

        Ok(Self {
            client,
            base,
            session,
        })
    }

    pub fn base(&self) -> &ApiBase {
        &self.base
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Send a request and return the raw successful response.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<ResponseBody, ClientError> {
        let mut builder = self.request(method.clone(), path)?;
        if let Some(body) = body {
            builder = builder.json(body);
        }
        self.dispatch(method, path, builder).await
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let builder = self.request(Method::GET, path)?;
        self.dispatch(Method::GET, path, builder).await?.json()
    }

    /// Send a JSON body and decode the JSON reply.
    pub async fn send_json<B, T>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.request(method.clone(), path)?.json(body);
        self.dispatch(method, path, builder).await?.json()
    }

    /// Send an optional JSON body and ignore whatever the server replies
    /// with on success.
    pub async fn execute<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<(), ClientError>
    where
        B: Serialize + ?Sized,
    {
        let mut builder = self.request(method.clone(), path)?;
        if let Some(body) = body {
            builder = builder.json(body);
        }
        self.dispatch(method, path, builder).await.map(|_| ())
    }

    /// Multipart upload of one file under `field`.
    pub async fn upload<T: DeserializeOwned>(
        &self,
        path: &str,
        field: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<T, ClientError> {
        let part = Part::bytes(bytes).file_name(file_name.to_string());
        let form = Form::new().part(field.to_string(), part);
        let builder = self.request(Method::POST, path)?.multipart(form);
        self.dispatch(Method::POST, path, builder).await?.json()
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ClientError> {
        let url = self
            .base
            .endpoint(path)
            .map_err(|e| ClientError::network(format!("invalid path '{}': {}", path, e)))?;

        let mut builder = self.client.request(method, url);
        if let Some((name, value)) = session_auth_header(&self.session) {
            builder = builder.header(name, value);
        }
        Ok(builder)
    }

    async fn dispatch(
        &self,
        method: Method,
        path: &str,
        builder: RequestBuilder,
    ) -> Result<ResponseBody, ClientError> {
        tracing::debug!(method = %method, path = %path, "Dispatching request");

        let response = builder.send().await.map_err(|e| {
            tracing::debug!(method = %method, path = %path, error = %e, "Request failed");
            ClientError::from(e)
        })?;

        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let body = String::from_utf8_lossy(&bytes).into_owned();
            tracing::debug!(
                method = %method,
                path = %path,
                status = status.as_u16(),
                "Request rejected"
            );
            return Err(ClientError::from_status(status.as_u16(), body));
        }

        Ok(ResponseBody::new(
            format!("{} {}", method, path),
            status.as_u16(),
            bytes.to_vec(),
        ))
    }
}

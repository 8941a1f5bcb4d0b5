//! Typed wrappers for every endpoint of the portfolio API.
//!
//! Paths are relative to the API root; the HTTP adapter resolves them and
//! attaches the session credential.

use crate::config::SecureString;
use crate::error::ClientError;
use crate::form::ValidationErrors;
use crate::http::{path_segment, HttpClient, Method};
use crate::models::{
    ContactMessage, DashboardStats, EntityId, LoginRequest, LoginResponse, NewContactMessage,
    Profile, Project, ProjectInput, Service, UploadResponse,
};

mod paths {
    pub const LOGIN: &str = "auth/login";
    pub const PROFILE: &str = "profile";
    pub const PROJECTS: &str = "projects";
    pub const SERVICES: &str = "services";
    pub const CONTACT: &str = "contact";
    pub const UPLOAD: &str = "upload";
    pub const STATS_INCREMENT: &str = "stats/increment";
    pub const STATS_DASHBOARD: &str = "stats/dashboard";
}

/// Multipart field name the upload endpoint expects.
pub const UPLOAD_FIELD: &str = "image";

#[derive(Clone)]
pub struct Api {
    http: HttpClient,
}

impl Api {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// Exchange admin credentials for a bearer token.
    ///
    /// An empty token in a 2xx reply is a decode failure.
    pub async fn login(
        &self,
        email: &str,
        password: SecureString,
    ) -> Result<SecureString, ClientError> {
        let request = LoginRequest {
            email: email.to_string(),
            password,
        };
        let response: LoginResponse = self
            .http
            .send_json(Method::POST, paths::LOGIN, &request)
            .await?;
        if response.token.is_empty() {
            return Err(ClientError::decode("login response carried an empty token"));
        }
        Ok(SecureString::new(response.token))
    }

    pub async fn profile(&self) -> Result<Profile, ClientError> {
        self.http.get(paths::PROFILE).await
    }

    pub async fn update_profile(&self, profile: &Profile) -> Result<(), ClientError> {
        self.http
            .execute(Method::PUT, paths::PROFILE, Some(profile))
            .await
    }

    pub async fn projects(&self) -> Result<Vec<Project>, ClientError> {
        self.http.get(paths::PROJECTS).await
    }

    pub async fn create_project(&self, input: &ProjectInput) -> Result<(), ClientError> {
        self.http
            .execute(Method::POST, paths::PROJECTS, Some(input))
            .await
    }

    pub async fn update_project(
        &self,
        id: &EntityId,
        input: &ProjectInput,
    ) -> Result<(), ClientError> {
        self.http
            .execute(Method::PUT, &item_path(paths::PROJECTS, id)?, Some(input))
            .await
    }

    pub async fn delete_project(&self, id: &EntityId) -> Result<(), ClientError> {
        self.delete(&item_path(paths::PROJECTS, id)?).await
    }

    pub async fn services(&self) -> Result<Vec<Service>, ClientError> {
        self.http.get(paths::SERVICES).await
    }

    /// Replace the whole services list.
    pub async fn replace_services(&self, services: &[Service]) -> Result<(), ClientError> {
        self.http
            .execute(Method::PUT, paths::SERVICES, Some(services))
            .await
    }

    pub async fn send_contact(&self, message: &NewContactMessage) -> Result<(), ClientError> {
        self.http
            .execute(Method::POST, paths::CONTACT, Some(message))
            .await
    }

    pub async fn messages(&self) -> Result<Vec<ContactMessage>, ClientError> {
        self.http.get(paths::CONTACT).await
    }

    pub async fn delete_message(&self, id: &EntityId) -> Result<(), ClientError> {
        self.delete(&item_path(paths::CONTACT, id)?).await
    }

    /// Upload an image; returns the URL the server stored it under.
    pub async fn upload_image(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<String, ClientError> {
        let response: UploadResponse = self
            .http
            .upload(paths::UPLOAD, UPLOAD_FIELD, file_name, bytes)
            .await?;
        Ok(response.url)
    }

    pub async fn increment_views(&self) -> Result<(), ClientError> {
        self.http
            .execute::<()>(Method::POST, paths::STATS_INCREMENT, None)
            .await
    }

    pub async fn dashboard_stats(&self) -> Result<DashboardStats, ClientError> {
        self.http.get(paths::STATS_DASHBOARD).await
    }

    async fn delete(&self, path: &str) -> Result<(), ClientError> {
        self.http.execute::<()>(Method::DELETE, path, None).await
    }
}

/// Path of one record. The id is always a single escaped segment, so no id
/// can address a different endpoint.
fn item_path(collection: &str, id: &EntityId) -> Result<String, ClientError> {
    match path_segment(id.as_str()) {
        Some(segment) => Ok(format!("{}/{}", collection, segment)),
        None => {
            let mut errors = ValidationErrors::new();
            errors.insert("id", format!("'{}' is not a valid record id", id));
            Err(errors.into())
        }
    }
}

//! The client context: every shared piece of client state, constructed
//! once and passed to whatever needs it.
//!
//! Signing out does not mutate a shared singleton. `logout` consumes the
//! context and hands back a fresh one with an empty cache, so no data read
//! under the old credential can leak into the next session.

use std::sync::Arc;

use crate::api::Api;
use crate::config::{Config, ConfigError, SecureString};
use crate::error::ClientError;
use crate::form::{FormController, FormSchema};
use crate::http::HttpClient;
use crate::models::NewContactMessage;
use crate::mutation::MutationCoordinator;
use crate::queries::{Cache, Queries};
use crate::session::{FileStore, KeyValueStore, MemoryStore, SessionStore, ThemePreference};
use crate::views::ViewCounter;

/// Notification shown when the contact form could not be delivered.
pub const CONTACT_FAILURE_MESSAGE: &str = "Failed to send message.";
/// Notification shown for any failed sign-in.
pub const LOGIN_FAILURE_MESSAGE: &str = "Invalid credentials";

pub struct ClientContext {
    config: Config,
    durable: Arc<dyn KeyValueStore>,
    /// Lives for the process, like a browser tab's session storage.
    session_flags: Arc<dyn KeyValueStore>,
    http: HttpClient,
    session: SessionStore,
    theme: ThemePreference,
    api: Api,
    queries: Queries,
    views: ViewCounter,
}

impl ClientContext {
    /// Build a context over the given durable storage.
    pub fn new(config: Config, durable: Arc<dyn KeyValueStore>) -> Result<Self, ConfigError> {
        let session = SessionStore::new(Arc::clone(&durable));
        let http = HttpClient::new(&config.api, session)?;
        let session_flags: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        Ok(Self::assemble(config, durable, session_flags, http))
    }

    /// Build a context persisting to the configured storage directory.
    pub fn from_config(config: Config) -> Result<Self, ConfigError> {
        let dir = config.storage.resolve_dir();
        tracing::debug!(dir = %dir.display(), "Using durable storage");
        let durable: Arc<dyn KeyValueStore> = Arc::new(FileStore::in_dir(&dir));
        Self::new(config, durable)
    }

    fn assemble(
        config: Config,
        durable: Arc<dyn KeyValueStore>,
        session_flags: Arc<dyn KeyValueStore>,
        http: HttpClient,
    ) -> Self {
        let session = http.session().clone();
        let api = Api::new(http.clone());
        let queries = Queries::new(api.clone(), Cache::new(), &config.cache);
        let views = ViewCounter::new(api.clone(), Arc::clone(&session_flags));
        let theme = ThemePreference::new(Arc::clone(&durable));

        Self {
            config,
            durable,
            session_flags,
            http,
            session,
            theme,
            api,
            queries,
            views,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn theme(&self) -> &ThemePreference {
        &self.theme
    }

    pub fn api(&self) -> &Api {
        &self.api
    }

    pub fn queries(&self) -> &Queries {
        &self.queries
    }

    pub fn cache(&self) -> &Cache {
        self.queries.cache()
    }

    pub fn views(&self) -> &ViewCounter {
        &self.views
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// Exchange credentials for a token and store it.
    ///
    /// On failure the stored credential is left as it was.
    pub async fn login(&self, email: &str, password: SecureString) -> Result<(), ClientError> {
        match self.api.login(email, password).await {
            Ok(token) => {
                self.session.set(&token)?;
                tracing::info!("Signed in");
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error_type = err.error_type(), "Sign-in failed");
                Err(err)
            }
        }
    }

    /// Clear the credential and start over with a fresh context.
    ///
    /// The HTTP connection pool, durable storage and session-scoped flags
    /// carry over; the cache and everything derived from it do not.
    pub fn logout(self) -> Result<Self, ClientError> {
        self.session.clear()?;
        tracing::info!("Signed out");

        let Self {
            config,
            durable,
            session_flags,
            http,
            ..
        } = self;
        Ok(Self::assemble(config, durable, session_flags, http))
    }

    /// Pass `result` through, clearing the session and cache first if the
    /// server rejected the credential.
    pub fn check_auth<T>(&self, result: Result<T, ClientError>) -> Result<T, ClientError> {
        if let Err(err) = &result {
            if err.is_auth() {
                tracing::warn!(status = ?err.status(), "Credential rejected, signing out");
                if let Err(clear_err) = self.session.clear() {
                    tracing::warn!(error = %clear_err, "Failed to clear session credential");
                }
                self.cache().clear();
            }
        }
        result
    }

    /// A coordinator for one view's writes.
    pub fn mutations(&self) -> MutationCoordinator {
        MutationCoordinator::new(self.api.clone(), self.cache().clone())
    }

    pub fn contact_form(&self) -> FormController {
        FormController::new(FormSchema::contact(), self.config.form.success_display())
            .with_failure_message(CONTACT_FAILURE_MESSAGE)
    }

    pub fn login_form(&self) -> FormController {
        FormController::new(FormSchema::login(), self.config.form.success_display())
            .with_failure_message(LOGIN_FAILURE_MESSAGE)
    }

    /// Validate and send the public contact form.
    pub async fn submit_contact(&self, form: &mut FormController) -> Result<(), ClientError> {
        let api = self.api.clone();
        form.submit(|values| async move {
            api.send_contact(&NewContactMessage::from_values(&values)).await
        })
        .await
    }

    /// Validate the sign-in form and log in with its values.
    pub async fn submit_login(&self, form: &mut FormController) -> Result<(), ClientError> {
        form.submit(|values| async move {
            let email = values.get("email").cloned().unwrap_or_default();
            let password = SecureString::new(values.get("password").cloned().unwrap_or_default());
            self.login(&email, password).await
        })
        .await
    }

    /// Upload an image and return the URL as the server stored it.
    ///
    /// That value goes into the project draft; use [`asset_url`](Self::asset_url)
    /// to display it.
    pub async fn upload_image(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<String, ClientError> {
        self.check_auth(self.api.upload_image(file_name, bytes).await)
    }

    /// Resolve an image reference from the API against the API origin.
    pub fn asset_url(&self, reference: &str) -> String {
        self.http.base().resolve_asset(reference)
    }
}

//! Client for a RecipeHub server.
//!
//! One HTTP request per operation, no retries.

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use url::Url;

use super::RecipeHubAccess;
use crate::error::{HubError, Result};
use crate::library::RecipeLibrary;
use crate::profile::Profile;
use crate::recipe::Recipe;

/// Path segment every resource lives under.
pub const API_PREFIX: &str = "recipehub/";

const JSON: &str = "application/json";

/// Configuration for RemoteAccess.
#[derive(Debug, Clone)]
pub struct RemoteAccessBuilder {
    base_url: String,
    timeout: Option<Duration>,
    user_agent: String,
}

impl Default for RemoteAccessBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RemoteAccessBuilder {
    /// Create a builder with default settings.
    ///
    /// Environment variables:
    /// - `RECIPEHUB_SERVER_URL`: server base URL (default: http://localhost:8080)
    pub fn new() -> Self {
        let base_url = std::env::var("RECIPEHUB_SERVER_URL")
            .unwrap_or_else(|_| "http://localhost:8080".to_string());

        Self {
            base_url,
            timeout: None,
            user_agent: format!("recipehub/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Server base URL; resources are requested under `{base}/recipehub/`.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set a request timeout. None leaves reqwest's default.
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn build(self) -> Result<RemoteAccess> {
        let mut base = Url::parse(&self.base_url)
            .map_err(|e| HubError::Argument(format!("Invalid server URL: {}", e)))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let api_root = base
            .join(API_PREFIX)
            .map_err(|e| HubError::Argument(format!("Invalid server URL: {}", e)))?;

        let mut client = reqwest::Client::builder().user_agent(&self.user_agent);
        if let Some(timeout) = self.timeout {
            client = client.timeout(timeout);
        }
        let client = client.build()?;

        Ok(RemoteAccess { client, api_root })
    }
}

pub struct RemoteAccess {
    client: reqwest::Client,
    api_root: Url,
}

impl RemoteAccess {
    pub fn new(base_url: &str) -> Result<Self> {
        RemoteAccessBuilder::new().base_url(base_url).build()
    }

    pub fn builder() -> RemoteAccessBuilder {
        RemoteAccessBuilder::new()
    }

    pub fn api_root(&self) -> &Url {
        &self.api_root
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.api_root
            .join(path)
            .map_err(|e| HubError::Argument(format!("Invalid path {}: {}", path, e)))
    }

    fn profile_url(&self, username: &str) -> Result<Url> {
        let mut url = self.endpoint("profiles")?;
        url.path_segments_mut()
            .map_err(|_| HubError::Argument("Server URL cannot have a path".to_string()))?
            .push(username);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        tracing::debug!(%url, "network: GET");
        let response = self
            .client
            .get(url)
            .header(ACCEPT, JSON)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    async fn send_json<B>(&self, method: Method, path: &str, body: &B) -> Result<bool>
    where
        B: Serialize + ?Sized + Sync,
    {
        let url = self.endpoint(path)?;
        tracing::debug!(%url, %method, "network: write");
        let response = self
            .client
            .request(method, url)
            .header(ACCEPT, JSON)
            .json(body)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    /// Writes never fail loudly: errors are logged and reported as false.
    async fn write<B>(&self, method: Method, path: &str, body: &B) -> bool
    where
        B: Serialize + ?Sized + Sync,
    {
        match self.send_json(method.clone(), path, body).await {
            Ok(accepted) => accepted,
            Err(e) => {
                tracing::warn!(path, %method, error = %e, "write failed");
                false
            }
        }
    }
}

#[async_trait]
impl RecipeHubAccess for RemoteAccess {
    async fn recipe_library(&self) -> Result<RecipeLibrary> {
        self.get_json(self.endpoint("recipelibrary")?).await
    }

    async fn save_recipe(&self, recipe: &Recipe) -> bool {
        self.write(Method::PUT, "recipelibrary", recipe).await
    }

    async fn remove_recipe(&self, recipe: &Recipe) -> bool {
        self.write(Method::DELETE, "recipelibrary", recipe).await
    }

    async fn save_profile(&self, profile: &Profile) -> bool {
        self.write(Method::PUT, "profiles", profile).await
    }

    async fn profiles(&self) -> Result<Vec<Profile>> {
        self.get_json(self.endpoint("profiles")?).await
    }

    async fn load_profile(&self, username: &str) -> Result<Option<Profile>> {
        let url = self.profile_url(username)?;
        tracing::debug!(%url, "network: GET");
        let response = self.client.get(url).header(ACCEPT, JSON).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = response.error_for_status()?;
        Ok(Some(response.json().await?))
    }

    /// The API has no bulk endpoint, so each profile is saved in turn.
    /// Profiles missing from `profiles` are left on the server.
    async fn save_profiles(&self, profiles: &[Profile]) -> bool {
        let mut all_saved = true;
        for profile in profiles {
            all_saved &= self.save_profile(profile).await;
        }
        all_saved
    }
}

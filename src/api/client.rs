//! Authenticated API client.
//!
//! Every call attaches the current access credential. A 401 triggers one
//! coordinated refresh and exactly one retry; if that cannot succeed the
//! session is terminated and the call fails with
//! [`ApiError::Unauthorized`].

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

use super::request::{PendingCall, RequestOptions};
use crate::adapters::{FileCredentialStore, ReqwestHttpClient, SignInNavigator};
use crate::auth::{RefreshCoordinator, SessionTerminator};
use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult, ConfigError};
use crate::traits::{
    CredentialKind, CredentialStore, FormData, HttpClient, Method, Navigator, Response,
};

/// Client for the console API.
///
/// Cheap to clone; clones share credentials, the refresh slot, and the
/// logout state.
///
/// ```ignore
/// let client = ApiClient::from_config(&ClientConfig::from_env())?;
/// let agents = client.get("/api/agents").await?;
/// ```
#[derive(Clone)]
pub struct ApiClient {
    config: Arc<ClientConfig>,
    http: Arc<dyn HttpClient>,
    store: Arc<dyn CredentialStore>,
    refresher: RefreshCoordinator,
    terminator: Arc<SessionTerminator>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.config.base_url)
            .field("refresher", &self.refresher)
            .field("terminator", &self.terminator)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Build a client from injected collaborators.
    pub fn new(
        config: ClientConfig,
        http: Arc<dyn HttpClient>,
        store: Arc<dyn CredentialStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let refresher =
            RefreshCoordinator::new(Arc::clone(&http), Arc::clone(&store), config.refresh_url());
        let terminator = Arc::new(SessionTerminator::new(
            Arc::clone(&store),
            navigator,
            config.sign_in_url(),
        ));
        Self {
            config: Arc::new(config),
            http,
            store,
            refresher,
            terminator,
        }
    }

    /// Production wiring: reqwest transport, file-backed credentials, and
    /// the terminal sign-in navigator.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ConfigError> {
        let path = config
            .credentials_path
            .clone()
            .ok_or(ConfigError::NoCredentialsPath)?;
        let http = ReqwestHttpClient::with_timeout(config.request_timeout)?;
        let store = FileCredentialStore::open(path);
        let navigator = SignInNavigator::new(config.open_browser);

        Ok(Self::new(
            config.clone(),
            Arc::new(http),
            Arc::new(store),
            Arc::new(navigator),
        ))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Perform one logical call and return the parsed JSON body.
    ///
    /// An empty success body yields `Value::Null`.
    pub async fn call(&self, path: &str, options: RequestOptions) -> ApiResult<Value> {
        self.dispatch(PendingCall::json(path, options)).await
    }

    /// Like [`call`](Self::call), deserializing into `T`.
    pub async fn call_json<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> ApiResult<T> {
        let value = self.call(path, options).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Send a multipart form with the same authorization handling as
    /// [`call`](Self::call).
    pub async fn upload(&self, path: &str, form: FormData) -> ApiResult<Value> {
        self.dispatch(PendingCall::upload(path, form)).await
    }

    pub async fn get(&self, path: &str) -> ApiResult<Value> {
        self.call(path, RequestOptions::new()).await
    }

    pub async fn post(&self, path: &str, body: Value) -> ApiResult<Value> {
        self.call(path, RequestOptions::new().method(Method::Post).json(body))
            .await
    }

    pub async fn put(&self, path: &str, body: Value) -> ApiResult<Value> {
        self.call(path, RequestOptions::new().method(Method::Put).json(body))
            .await
    }

    pub async fn patch(&self, path: &str, body: Value) -> ApiResult<Value> {
        self.call(path, RequestOptions::new().method(Method::Patch).json(body))
            .await
    }

    pub async fn delete(&self, path: &str) -> ApiResult<Value> {
        self.call(path, RequestOptions::new().method(Method::Delete))
            .await
    }

    /// Store credentials obtained from sign-in.
    pub fn sign_in(&self, access_token: &str, refresh_token: &str) {
        self.store.set(CredentialKind::Access, access_token);
        self.store.set(CredentialKind::Refresh, refresh_token);
        debug!("Credentials stored");
    }

    /// Clear credentials without redirecting.
    pub fn sign_out(&self) {
        self.store.clear();
        debug!("Credentials cleared");
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token().is_some()
    }

    /// Current access token, if any. An empty stored value counts as none.
    pub fn access_token(&self) -> Option<String> {
        self.store
            .get(CredentialKind::Access)
            .filter(|token| !token.is_empty())
    }

    pub fn is_refreshing(&self) -> bool {
        self.refresher.is_refreshing()
    }

    async fn dispatch(&self, call: PendingCall) -> ApiResult<Value> {
        let url = self.config.url_for(call.path());
        let generation = self.terminator.generation();

        let response = self.attempt(&call, &url).await?;
        if !response.is_unauthorized() {
            return Self::finish(response);
        }

        debug!(method = %call.method(), path = call.path(), "Credential rejected, refreshing");
        if let Err(e) = self.refresher.ensure_refreshed().await {
            self.terminator.force_logout(generation);
            return Err(ApiError::from_refresh(&e));
        }

        let retried = self.attempt(&call, &url).await?;
        if retried.is_unauthorized() {
            warn!(method = %call.method(), path = call.path(), "Request rejected again after refresh");
            self.terminator.force_logout(generation);
            return Err(ApiError::unauthorized(
                "Request rejected after refreshing credentials",
            ));
        }
        Self::finish(retried)
    }

    /// One network exchange with the credential current right now.
    async fn attempt(&self, call: &PendingCall, url: &str) -> ApiResult<Response> {
        let access_token = self.access_token();
        let request = call.to_request(url.to_string(), access_token.as_deref());
        debug!(
            method = %call.method(),
            path = call.path(),
            authenticated = access_token.is_some(),
            "Sending request"
        );
        Ok(self.http.send(&request).await?)
    }

    fn finish(response: Response) -> ApiResult<Value> {
        if !response.is_success() {
            return Err(ApiError::from_response(response.status, &response.body));
        }
        if response.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        Ok(response.json()?)
    }
}

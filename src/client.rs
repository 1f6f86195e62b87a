//! HTTP transport for the Taskboard API.
//!
//! [`ApiClient`] owns the reqwest client, attaches the bearer token,
//! and runs the 401 recovery loop: one refresh attempt per request,
//! coordinated through the [`SessionManager`] so concurrent failures
//! produce a single refresh call. The refresh exchange itself goes
//! through a dedicated code path that never re-enters the recovery
//! loop.
//!
//! [`TaskboardClient`] is the handle applications hold: transport plus
//! the typed endpoint groups.

use std::sync::Arc;

use reqwest::{header, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error, warn};

use crate::api::types::{RefreshRequest, RefreshResponse};
use crate::api::{AuthApi, ProjectsApi, TasksApi};
use crate::config::ClientConfig;
use crate::error::{self, ApiError};
use crate::session::SessionManager;
use crate::storage::{FileTokenStore, TokenStore};

const REFRESH_PATH: &str = "/api/auth/token/refresh/";

/// Authenticated JSON transport with 401 recovery.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    refresh_timeout: std::time::Duration,
    session: Arc<SessionManager>,
}

impl ApiClient {
    pub fn new(config: &ClientConfig, session: Arc<SessionManager>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        let mut base_url = config.base_url.to_string();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Ok(Self {
            http,
            base_url,
            refresh_timeout: config.refresh_timeout,
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let text = self.perform::<()>(Method::GET, &self.endpoint(path), None).await?;
        decode(&text)
    }

    pub async fn get_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let mut url = self.endpoint(path);
        let mut separator = '?';
        for (key, value) in query {
            url.push(separator);
            separator = '&';
            url.push_str(key);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }
        let text = self.perform::<()>(Method::GET, &url, None).await?;
        decode(&text)
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let text = self
            .perform(Method::POST, &self.endpoint(path), Some(body))
            .await?;
        decode(&text)
    }

    /// POST without a body, for action endpoints that still answer with
    /// the updated resource.
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let text = self.perform::<()>(Method::POST, &self.endpoint(path), None).await?;
        decode(&text)
    }

    /// POST where the caller does not care about the response body.
    pub async fn post_unit<B: Serialize>(&self, path: &str, body: &B) -> Result<(), ApiError> {
        self.perform(Method::POST, &self.endpoint(path), Some(body))
            .await?;
        Ok(())
    }

    pub async fn post_empty_unit(&self, path: &str) -> Result<(), ApiError> {
        self.perform::<()>(Method::POST, &self.endpoint(path), None)
            .await?;
        Ok(())
    }

    pub async fn patch<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let text = self
            .perform(Method::PATCH, &self.endpoint(path), Some(body))
            .await?;
        decode(&text)
    }

    /// PATCH where the response body carries nothing the caller can
    /// use (thin field echoes).
    pub async fn patch_unit<B: Serialize>(&self, path: &str, body: &B) -> Result<(), ApiError> {
        self.perform(Method::PATCH, &self.endpoint(path), Some(body))
            .await?;
        Ok(())
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.perform::<()>(Method::DELETE, &self.endpoint(path), None)
            .await?;
        Ok(())
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request, recovering from 401 by refreshing the access
    /// token at most once. Returns the raw success body.
    async fn perform<B: Serialize>(
        &self,
        method: Method,
        url: &str,
        body: Option<&B>,
    ) -> Result<String, ApiError> {
        let mut attempted_refresh = false;
        loop {
            let token = self.session.access_token().await;
            let mut request = self.http.request(method.clone(), url);
            if let Some(access) = token.as_deref() {
                request = request.header(header::AUTHORIZATION, format!("Bearer {}", access));
            }
            if let Some(payload) = body {
                request = request.json(payload);
            }

            // Transport failures propagate as-is. They are never an
            // authorization problem, so no refresh is attempted.
            let response = request.send().await?;
            let status = response.status();

            if status == StatusCode::UNAUTHORIZED && !attempted_refresh {
                attempted_refresh = true;
                debug!("{} {} returned 401, attempting token refresh", method, url);
                self.refresh_session(token.as_deref()).await?;
                continue;
            }

            let text = response.text().await?;
            if !status.is_success() {
                warn!("{} {} failed: {}", method, url, status);
                return Err(error::classify_response(status.as_u16(), &text));
            }
            return Ok(text);
        }
    }

    async fn refresh_session(&self, stale_access: Option<&str>) -> Result<(), ApiError> {
        self.session
            .refresh_access_token(stale_access, |refresh| self.exchange_refresh_token(refresh))
            .await?;
        Ok(())
    }

    /// Call the refresh endpoint directly, outside the recovery loop,
    /// with its own tighter timeout.
    async fn exchange_refresh_token(&self, refresh: String) -> Result<String, ApiError> {
        let url = self.endpoint(REFRESH_PATH);
        let response = self
            .http
            .post(&url)
            .timeout(self.refresh_timeout)
            .json(&RefreshRequest { refresh })
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            warn!("Refresh endpoint rejected the session: {}", status);
            return Err(error::classify_response(status.as_u16(), &text));
        }
        let refreshed: RefreshResponse = serde_json::from_str(&text)?;
        Ok(refreshed.access)
    }
}

fn decode<T: DeserializeOwned>(text: &str) -> Result<T, ApiError> {
    serde_json::from_str(text).map_err(|e| {
        error!("Failed to decode response body: {}", e);
        ApiError::Decode(e)
    })
}

/// Top-level client handle: transport plus typed endpoint groups.
#[derive(Clone)]
pub struct TaskboardClient {
    transport: ApiClient,
}

impl TaskboardClient {
    /// Client with the default file-backed token store from the config.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let store = Arc::new(FileTokenStore::new(config.token_file.clone()));
        Self::with_store(config, store)
    }

    /// Client with a custom token store.
    pub fn with_store(
        config: &ClientConfig,
        store: Arc<dyn TokenStore>,
    ) -> Result<Self, ApiError> {
        Self::with_session(config, Arc::new(SessionManager::new(store)))
    }

    /// Client sharing an externally constructed session, e.g. one with
    /// lifecycle listeners attached.
    pub fn with_session(
        config: &ClientConfig,
        session: Arc<SessionManager>,
    ) -> Result<Self, ApiError> {
        Ok(Self {
            transport: ApiClient::new(config, session)?,
        })
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        self.transport.session()
    }

    /// Raw transport, for endpoints this crate does not wrap (manual
    /// pagination URLs, mostly).
    pub fn transport(&self) -> &ApiClient {
        &self.transport
    }

    pub fn auth(&self) -> AuthApi {
        AuthApi::new(self.transport.clone())
    }

    pub fn projects(&self) -> ProjectsApi {
        ProjectsApi::new(self.transport.clone())
    }

    pub fn tasks(&self) -> TasksApi {
        TasksApi::new(self.transport.clone())
    }
}

// ==================== Tests ====================

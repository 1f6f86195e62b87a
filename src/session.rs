//! Session state and single-flight token refresh.
//!
//! The [`SessionManager`] owns the access/refresh token pair and the
//! logged-in/logged-out transitions. Its one tricky job is refresh
//! coordination: when several requests hit 401 at the same time, only
//! the first may call the refresh endpoint. Everyone else waits on the
//! same lock and, once inside, notices the token already changed and
//! reuses it. The refresh endpoints of JWT backends rotate tokens, so
//! a second concurrent refresh with the same refresh token would get
//! the whole session revoked.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info, warn};

use crate::error::ApiError;
use crate::storage::TokenStore;

/// The access/refresh pair of a logged-in session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionTokens {
    pub access: String,
    pub refresh: String,
}

impl SessionTokens {
    pub fn new(access: impl Into<String>, refresh: impl Into<String>) -> Self {
        Self {
            access: access.into(),
            refresh: refresh.into(),
        }
    }
}

/// Hooks for session lifecycle notifications.
#[async_trait]
pub trait SessionEvents: Send + Sync {
    /// Called once per expiry episode, after the stored tokens are
    /// cleared. The typical reaction is navigating to the login view.
    async fn on_session_expired(&self);
}

/// Owns the token pair and serializes refreshes.
pub struct SessionManager {
    store: Arc<dyn TokenStore>,
    tokens: RwLock<Option<SessionTokens>>,
    /// Held for the whole refresh round trip. Waiters re-check the
    /// current token under the lock before refreshing again.
    refresh_flight: Mutex<()>,
    events: Option<Arc<dyn SessionEvents>>,
    /// True once listeners were told the session expired. Re-armed on
    /// login so the next expiry notifies again, and disarmed on
    /// deliberate logout.
    expiry_notified: AtomicBool,
}

impl SessionManager {
    /// Create a manager backed by the given store, resuming a persisted
    /// session when one exists. An unreadable store is logged and
    /// treated as logged out rather than failing construction.
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        let tokens = match store.load() {
            Ok(tokens) => tokens,
            Err(e) => {
                warn!("Failed to load stored session, starting logged out: {}", e);
                None
            }
        };
        let expiry_notified = AtomicBool::new(tokens.is_none());
        Self {
            store,
            tokens: RwLock::new(tokens),
            refresh_flight: Mutex::new(()),
            events: None,
            expiry_notified,
        }
    }

    /// Attach lifecycle listeners.
    pub fn with_events(mut self, events: Arc<dyn SessionEvents>) -> Self {
        self.events = Some(events);
        self
    }

    pub async fn access_token(&self) -> Option<String> {
        self.tokens.read().await.as_ref().map(|t| t.access.clone())
    }

    pub async fn refresh_token(&self) -> Option<String> {
        self.tokens.read().await.as_ref().map(|t| t.refresh.clone())
    }

    /// Snapshot of the current pair.
    pub async fn tokens(&self) -> Option<SessionTokens> {
        self.tokens.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.tokens.read().await.is_some()
    }

    /// Install a freshly issued pair (login or register) and re-arm the
    /// expiry notification.
    pub async fn set_session(&self, tokens: SessionTokens) {
        if let Err(e) = self.store.save(&tokens) {
            error!("Failed to persist session tokens: {}", e);
        }
        *self.tokens.write().await = Some(tokens);
        self.expiry_notified.store(false, Ordering::SeqCst);
        info!("Session established");
    }

    /// Drop the session without firing the expiry notification. This is
    /// the deliberate-logout path.
    pub async fn clear(&self) {
        self.tokens.write().await.take();
        if let Err(e) = self.store.clear() {
            error!("Failed to clear stored tokens: {}", e);
        }
        self.expiry_notified.store(true, Ordering::SeqCst);
        info!("Session cleared");
    }

    /// Obtain a usable access token after a request was rejected with
    /// 401, refreshing at most once across all concurrent callers.
    ///
    /// `stale_access` is the token the failed request carried. If the
    /// stored token differs by the time this caller holds the flight
    /// lock, another request already refreshed and the stored token is
    /// returned without touching the network. Otherwise `exchange` is
    /// invoked with the refresh token and must return the new access
    /// token.
    ///
    /// Any exchange failure ends the session: tokens are cleared,
    /// listeners are notified once, and every caller gets
    /// [`ApiError::SessionExpired`].
    pub async fn refresh_access_token<F, Fut>(
        &self,
        stale_access: Option<&str>,
        exchange: F,
    ) -> Result<String, ApiError>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Result<String, ApiError>>,
    {
        let _flight = self.refresh_flight.lock().await;

        if let Some(current) = self.access_token().await {
            if stale_access != Some(current.as_str()) {
                debug!("Access token already refreshed by a concurrent request");
                return Ok(current);
            }
        }

        let Some(refresh) = self.refresh_token().await else {
            self.expire().await;
            return Err(ApiError::SessionExpired);
        };

        match exchange(refresh).await {
            Ok(access) => {
                self.store_refreshed_access(access.clone()).await;
                info!("Access token refreshed");
                Ok(access)
            }
            Err(err) => {
                warn!("Token refresh failed, ending session: {}", err);
                self.expire().await;
                Err(ApiError::SessionExpired)
            }
        }
    }

    async fn store_refreshed_access(&self, access: String) {
        let mut guard = self.tokens.write().await;
        match guard.as_mut() {
            Some(tokens) => {
                tokens.access = access;
                if let Err(e) = self.store.save(tokens) {
                    error!("Failed to persist refreshed access token: {}", e);
                }
            }
            // A logout raced the refresh. Stay logged out.
            None => debug!("Refresh finished after logout, dropping new access token"),
        }
    }

    /// Forced logout: clear the pair and notify listeners at most once
    /// per episode.
    async fn expire(&self) {
        let had_session = self.tokens.write().await.take().is_some();
        if had_session {
            if let Err(e) = self.store.clear() {
                error!("Failed to clear stored tokens: {}", e);
            }
        }
        if !self.expiry_notified.swap(true, Ordering::SeqCst) {
            warn!("Session expired, login required");
            if let Some(events) = &self.events {
                events.on_session_expired().await;
            }
        }
    }
}

// ==================== Tests ====================

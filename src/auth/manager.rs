//! Session lifecycle management.
//!
//! `SessionManager` owns the current user, issues signup/login requests,
//! persists the session record, and schedules the one-shot expiry logout.
//! Downstream components observe session changes through a watch channel
//! rather than any shared global state.

use std::sync::{Arc, Mutex};

use anyhow::Result;
use chrono::{Duration, Utc};
use serde_json::json;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::api::HttpClient;
use crate::config::Config;
use crate::models::{AuthResult, User, ADMIN_ROLE};

use super::{AuthError, SessionStore};

/// Navigation capability invoked when a session ends.
///
/// Decouples the manager from whatever routing scheme the embedding UI
/// uses; implementors typically route back to the login screen.
pub trait Navigator: Send + Sync {
    /// Send the UI back to the authentication entry point.
    fn to_auth(&self);
}

/// Owns session state and its lifecycle transitions.
///
/// Clone is cheap and clones share the same session: the UI typically keeps
/// one clone per component that needs to trigger auth operations.
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<Inner>,
}

struct Inner {
    http: HttpClient,
    store: SessionStore,
    current_user: watch::Sender<Option<User>>,
    expiry_timer: Mutex<TimerSlot>,
    navigator: Mutex<Option<Arc<dyn Navigator>>>,
}

/// At most one armed expiry timer exists per manager. The generation
/// counter lets a timer that already woke up detect that a newer session
/// replaced the one it was armed for.
#[derive(Default)]
struct TimerSlot {
    handle: Option<JoinHandle<()>>,
    generation: u64,
}

impl SessionManager {
    pub fn new(http: HttpClient, store: SessionStore) -> Self {
        let (current_user, _) = watch::channel(None);
        Self {
            inner: Arc::new(Inner {
                http,
                store,
                current_user,
                expiry_timer: Mutex::new(TimerSlot::default()),
                navigator: Mutex::new(None),
            }),
        }
    }

    /// Build a manager from the loaded configuration, storing the session
    /// record in the per-user cache directory.
    pub fn from_config(config: &Config) -> Result<Self> {
        let http = HttpClient::new(config.base_url.clone())?;
        let store = SessionStore::new(Config::session_dir()?);
        Ok(Self::new(http, store))
    }

    pub fn set_navigator(&self, navigator: Arc<dyn Navigator>) {
        *self.inner.navigator.lock().expect("navigator lock poisoned") = Some(navigator);
    }

    /// Subscribe to "current user changed" notifications.
    ///
    /// The receiver yields `None` while logged out and the full `User`
    /// record while logged in.
    pub fn subscribe(&self) -> watch::Receiver<Option<User>> {
        self.inner.current_user.subscribe()
    }

    /// Snapshot of the current user, if logged in.
    pub fn current_user(&self) -> Option<User> {
        self.inner.current_user.borrow().clone()
    }

    /// Whether the current user may administer the catalog.
    /// False when logged out.
    pub fn is_admin(&self) -> bool {
        self.inner
            .current_user
            .borrow()
            .as_ref()
            .map(|user| user.has_role(ADMIN_ROLE))
            .unwrap_or(false)
    }

    /// Create an account and start a session from the response.
    ///
    /// On failure the session state is left untouched and the error carries
    /// the user-facing message.
    pub async fn signup(&self, email: &str, password: &str) -> Result<AuthResult, AuthError> {
        self.authenticate("users/signup", email, password).await
    }

    /// Log in and start a session from the response. Same contract as
    /// [`signup`](Self::signup) against the login endpoint.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResult, AuthError> {
        self.authenticate("login", email, password).await
    }

    async fn authenticate(
        &self,
        endpoint: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResult, AuthError> {
        let body = json!({
            "email": email,
            "password": password,
            "returnSecureToken": true,
        });

        let response = match self.inner.http.post_response(endpoint, &body).await {
            Ok(response) => response,
            Err(err) => {
                warn!(endpoint, error = %err, "authentication request failed");
                return Err(AuthError::Unknown);
            }
        };

        if !response.status().is_success() {
            let status = response.status();
            let payload = response.text().await.unwrap_or_default();
            debug!(endpoint, status = %status, "authentication rejected");
            return Err(AuthError::from_response_body(&payload));
        }

        let result: AuthResult = match response.json().await {
            Ok(result) => result,
            Err(err) => {
                warn!(endpoint, error = %err, "failed to parse authentication response");
                return Err(AuthError::Unknown);
            }
        };

        self.handle_authentication(&result);
        Ok(result)
    }

    /// Start a session from a successful auth response.
    ///
    /// The stored expiry timestamp and the armed timer both derive from the
    /// same millisecond value, so the persisted record and the actual
    /// logout moment cannot drift apart.
    fn handle_authentication(&self, result: &AuthResult) {
        let lifetime_ms = result.expires_in * 1000;
        let user = User {
            email: result.email.clone(),
            id: result.id.clone(),
            token: result.token.clone(),
            roles: result.roles.clone(),
            expires_at: Utc::now() + Duration::milliseconds(lifetime_ms),
        };

        debug!(email = %user.email, lifetime_ms, "session started");
        self.inner.current_user.send_replace(Some(user.clone()));
        self.inner.arm_expiry_timer(lifetime_ms);
        if let Err(err) = self.inner.store.save(&user) {
            warn!(error = %err, "failed to persist session record");
        }
    }

    /// Rehydrate the session from the store without a network call.
    ///
    /// Must run once at application startup, before any UI depends on
    /// session state. A stored record whose expiry has already passed still
    /// becomes current, but its timer fires immediately and logs out.
    pub fn auto_login(&self) {
        let stored = match self.inner.store.load() {
            Ok(Some(user)) => user,
            Ok(None) => return,
            Err(err) => {
                warn!(error = %err, "ignoring unreadable session record");
                return;
            }
        };

        if !stored.is_active() {
            return;
        }

        let remaining_ms = stored.time_until_expiry().num_milliseconds();
        debug!(email = %stored.email, remaining_ms, "session restored from store");
        self.inner.current_user.send_replace(Some(stored));
        self.inner.arm_expiry_timer(remaining_ms);
    }

    /// End the session: emit logged-out, cancel the expiry timer, drop the
    /// persisted record, and signal navigation back to the auth entry
    /// point. Safe to call when already logged out.
    pub fn logout(&self) {
        self.inner.logout();
    }
}

impl Inner {
    /// Arm the one-shot expiry timer, cancelling any previously armed one.
    /// A non-positive delay fires the timer immediately.
    fn arm_expiry_timer(self: &Arc<Self>, delay_ms: i64) {
        let delay = std::time::Duration::from_millis(delay_ms.max(0) as u64);
        let mut slot = self.expiry_timer.lock().expect("expiry timer lock poisoned");
        slot.generation += 1;
        let generation = slot.generation;

        // Weak reference: the timer must not keep a dropped manager alive.
        let weak = Arc::downgrade(self);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(inner) = weak.upgrade() {
                inner.expire(generation);
            }
        });

        if let Some(previous) = slot.handle.replace(handle) {
            previous.abort();
        }
    }

    /// Timer callback. A timer that woke up after being superseded (abort
    /// can only take effect at an await point) finds a newer generation
    /// here and backs off instead of logging out the replacement session.
    fn expire(&self, generation: u64) {
        {
            let slot = self.expiry_timer.lock().expect("expiry timer lock poisoned");
            if slot.generation != generation {
                return;
            }
        }
        debug!("session token expired");
        self.logout();
    }

    fn logout(&self) {
        self.current_user.send_replace(None);
        if let Some(timer) = self.expiry_timer.lock().expect("expiry timer lock poisoned").handle.take() {
            timer.abort();
        }
        if let Err(err) = self.store.clear() {
            warn!(error = %err, "failed to clear session record");
        }
        let navigator = self.navigator.lock().expect("navigator lock poisoned").clone();
        if let Some(navigator) = navigator {
            navigator.to_auth();
        }
    }
}

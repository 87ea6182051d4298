//! Authentication session management for deptstock.
//!
//! Sessions live in memory and are keyed by an opaque token handed to the
//! browser in a cookie. A [`LoginLimiter`] locks out a username after
//! repeated failed logins.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::auth::verify_password;
use crate::config::SessionConfig;
use crate::db::User;

/// Session-related errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Unknown username or wrong password. Deliberately does not say which.
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Too many failed attempts for this username.
    #[error("Too many failed login attempts. Try again in {0} seconds")]
    AccountLocked(u64),

    /// Session has expired.
    #[error("session expired")]
    SessionExpired,

    /// Session not found.
    #[error("session not found")]
    SessionNotFound,
}

/// An authenticated session.
#[derive(Debug, Clone)]
pub struct AuthSession {
    /// Opaque session token (UUID v4).
    pub token: String,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    /// Absolute expiry.
    pub expires_at: DateTime<Utc>,
    last_activity: Instant,
}

impl AuthSession {
    /// Create a session for `user_id` lasting at most `duration`.
    pub fn new(user_id: i64, duration: Duration) -> Self {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::from_std(duration).unwrap_or_default();

        Self {
            token: Uuid::new_v4().to_string(),
            user_id,
            created_at: now,
            expires_at,
            last_activity: Instant::now(),
        }
    }

    /// Check if the session is past its absolute expiry.
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Check if the session has been idle for at least `idle_timeout`.
    pub fn is_idle(&self, idle_timeout: Duration) -> bool {
        self.last_activity.elapsed() >= idle_timeout
    }

    /// Neither expired nor idle.
    pub fn is_valid(&self, idle_timeout: Duration) -> bool {
        !self.is_expired() && !self.is_idle(idle_timeout)
    }

    /// Record activity now.
    pub fn touch(&mut self) {
        self.last_activity = Instant::now();
    }
}

/// Result of a login attempt rate limit check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LimitResult {
    Allowed,
    /// Locked for the remaining duration.
    Locked(Duration),
}

/// Tracks failed login attempts per username (case-insensitive).
#[derive(Debug)]
pub struct LoginLimiter {
    attempts: HashMap<String, Vec<Instant>>,
    max_attempts: u32,
    lockout: Duration,
}

impl LoginLimiter {
    /// Allow `max_attempts` failures within `lockout_secs`; the next attempt
    /// is refused until the oldest failure ages out.
    pub fn new(max_attempts: u32, lockout_secs: u64) -> Self {
        Self {
            attempts: HashMap::new(),
            max_attempts,
            lockout: Duration::from_secs(lockout_secs),
        }
    }

    fn prune(&mut self, key: &str, now: Instant) -> usize {
        let lockout = self.lockout;
        match self.attempts.get_mut(key) {
            Some(list) => {
                list.retain(|t| now.duration_since(*t) < lockout);
                list.len()
            }
            None => 0,
        }
    }

    /// Check whether `username` may attempt a login now.
    pub fn check(&mut self, username: &str) -> LimitResult {
        let now = Instant::now();
        let key = username.to_lowercase();

        if self.prune(&key, now) < self.max_attempts as usize {
            return LimitResult::Allowed;
        }

        let oldest = self
            .attempts
            .get(&key)
            .and_then(|list| list.first())
            .copied()
            .unwrap_or(now);
        LimitResult::Locked(self.lockout.saturating_sub(now.duration_since(oldest)))
    }

    /// Record a failed login attempt.
    pub fn record_failure(&mut self, username: &str) {
        let now = Instant::now();
        let key = username.to_lowercase();
        self.prune(&key, now);

        let list = self.attempts.entry(key).or_default();
        list.push(now);
        debug!(username = %username, attempt_count = list.len(), "Recorded failed login attempt");
    }

    /// Forget all failures for `username`.
    pub fn clear(&mut self, username: &str) {
        self.attempts.remove(&username.to_lowercase());
    }

    /// Failed attempts currently counted against `username`.
    pub fn attempt_count(&mut self, username: &str) -> usize {
        self.prune(&username.to_lowercase(), Instant::now())
    }

    /// Drop usernames whose failures have all aged out.
    pub fn cleanup(&mut self) {
        let now = Instant::now();
        let lockout = self.lockout;
        self.attempts.retain(|_, list| {
            list.retain(|t| now.duration_since(*t) < lockout);
            !list.is_empty()
        });
    }
}

/// Session manager: the single source of "who is logged in".
#[derive(Debug)]
pub struct SessionManager {
    sessions: HashMap<String, AuthSession>,
    limiter: LoginLimiter,
    session_duration: Duration,
    idle_timeout: Duration,
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionManager {
    /// Create a session manager with default settings.
    pub fn new() -> Self {
        Self::from_config(&SessionConfig::default())
    }

    /// Create a session manager from configuration.
    pub fn from_config(config: &SessionConfig) -> Self {
        Self {
            sessions: HashMap::new(),
            limiter: LoginLimiter::new(config.max_login_attempts, config.lockout_secs),
            session_duration: Duration::from_secs(config.duration_secs),
            idle_timeout: Duration::from_secs(config.idle_timeout_secs),
        }
    }

    /// Refuse a login attempt while `username` is locked out.
    pub fn check_login(&mut self, username: &str) -> Result<(), SessionError> {
        if let LimitResult::Locked(remaining) = self.limiter.check(username) {
            warn!(
                username = %username,
                remaining_secs = remaining.as_secs(),
                "Login attempt blocked: account locked"
            );
            return Err(SessionError::AccountLocked(remaining.as_secs().max(1)));
        }
        Ok(())
    }

    /// Apply the outcome of a credential check.
    ///
    /// `user_id` is the verified account, or `None` when the username is
    /// unknown or the password was wrong. A failure counts toward the
    /// lockout; a success clears it and opens a session.
    pub fn finish_login(
        &mut self,
        username: &str,
        user_id: Option<i64>,
    ) -> Result<AuthSession, SessionError> {
        let Some(user_id) = user_id else {
            self.limiter.record_failure(username);
            return Err(SessionError::InvalidCredentials);
        };

        self.limiter.clear(username);
        let session = self.start(user_id);
        info!(username = %username, user_id, "Login successful");
        Ok(session)
    }

    /// Open a session for an already authenticated user.
    pub fn start(&mut self, user_id: i64) -> AuthSession {
        let session = AuthSession::new(user_id, self.session_duration);
        self.sessions
            .insert(session.token.clone(), session.clone());
        debug!(user_id, "Session started");
        session
    }

    /// Close a session. Returns the user ID it belonged to, if any.
    pub fn logout(&mut self, token: &str) -> Option<i64> {
        match self.sessions.remove(token) {
            Some(session) => {
                info!(user_id = session.user_id, "Session logged out");
                Some(session.user_id)
            }
            None => {
                debug!("Logout: session not found");
                None
            }
        }
    }

    /// Look up a live session and record activity on it.
    ///
    /// Expired or idle sessions are removed and reported as
    /// [`SessionError::SessionExpired`].
    pub fn touch_session(&mut self, token: &str) -> Result<&AuthSession, SessionError> {
        let valid = match self.sessions.get(token) {
            Some(session) => session.is_valid(self.idle_timeout),
            None => return Err(SessionError::SessionNotFound),
        };
        if !valid {
            self.sessions.remove(token);
            return Err(SessionError::SessionExpired);
        }

        let session = self
            .sessions
            .get_mut(token)
            .ok_or(SessionError::SessionNotFound)?;
        session.touch();
        Ok(&*session)
    }

    /// Remove expired sessions and aged-out login failures.
    pub fn cleanup(&mut self) -> usize {
        let before = self.sessions.len();
        let idle_timeout = self.idle_timeout;
        self.sessions.retain(|_, s| s.is_valid(idle_timeout));
        self.limiter.cleanup();

        let removed = before - self.sessions.len();
        if removed > 0 {
            debug!(removed, "Cleaned up expired sessions");
        }
        removed
    }

    /// Number of sessions currently held.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

/// Authenticate `username` and open a session.
///
/// `user` is the account looked up by username, if any. Unknown users and
/// wrong passwords produce the same error and both count toward the
/// lockout. The manager is locked only around the lockout bookkeeping;
/// Argon2 runs on the blocking pool so other requests can reach their
/// sessions meanwhile.
pub async fn authenticate(
    sessions: &Mutex<SessionManager>,
    username: &str,
    password: &str,
    user: Option<&User>,
) -> Result<AuthSession, SessionError> {
    sessions.lock().await.check_login(username)?;

    let verified = match user {
        Some(user) => {
            let password = password.to_string();
            let hash = user.password.clone();
            match tokio::task::spawn_blocking(move || verify_password(&password, &hash).is_ok())
                .await
            {
                Ok(true) => Some(user.id),
                Ok(false) => {
                    warn!(username = %username, "Login failed: wrong password");
                    None
                }
                Err(e) => {
                    error!(username = %username, error = %e, "Password verification task failed");
                    None
                }
            }
        }
        None => {
            warn!(username = %username, "Login failed: user not found");
            None
        }
    };

    sessions.lock().await.finish_login(username, verified)
}

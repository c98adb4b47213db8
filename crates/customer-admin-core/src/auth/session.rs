use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{AuthenticationResponse, Customer};

/// Session file name in cache directory
const SESSION_FILE: &str = "session.json";

/// Default token lifetime in minutes. The server rejects stale tokens with a
/// 401 regardless, this only lets the client fail before dispatch.
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 24 * 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    pub token: String,
    pub customer: Customer,
    pub created_at: DateTime<Utc>,
}

impl SessionData {
    pub fn from_login(response: AuthenticationResponse) -> Self {
        Self {
            token: response.token,
            customer: response.customer,
            created_at: Utc::now(),
        }
    }

    /// A TTL that runs past the representable date range never expires.
    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.expires_at(ttl).is_some_and(|expiry| Utc::now() > expiry)
    }

    /// Get minutes remaining until expiry (for display)
    pub fn minutes_until_expiry(&self, ttl: Duration) -> i64 {
        self.expires_at(ttl)
            .map_or(i64::MAX, |expiry| (expiry - Utc::now()).num_minutes().max(0))
    }

    fn expires_at(&self, ttl: Duration) -> Option<DateTime<Utc>> {
        self.created_at.checked_add_signed(ttl)
    }
}

/// The credential context handed to every authenticated client call.
///
/// Only the login and logout flows mutate it. `ApiClient` borrows it
/// immutably and reads the token through [`Session::token`].
#[derive(Debug, Clone)]
pub struct Session {
    cache_dir: Option<PathBuf>,
    ttl: Duration,
    pub data: Option<SessionData>,
}

impl Session {
    /// A session persisted under `cache_dir`.
    pub fn new(cache_dir: PathBuf) -> Self {
        Self {
            cache_dir: Some(cache_dir),
            ttl: Duration::minutes(DEFAULT_TOKEN_TTL_MINUTES),
            data: None,
        }
    }

    /// A session that lives only in memory; `load` and `save` are no-ops.
    pub fn ephemeral() -> Self {
        Self {
            cache_dir: None,
            ttl: Duration::minutes(DEFAULT_TOKEN_TTL_MINUTES),
            data: None,
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Load session from disk. Returns true when a live session was found.
    pub fn load(&mut self) -> Result<bool> {
        let Some(path) = self.session_path() else {
            return Ok(false);
        };
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .context("Failed to read session file")?;
            let data: SessionData = serde_json::from_str(&contents)
                .context("Failed to parse session file")?;

            if !data.is_expired(self.ttl) {
                debug!(customer_id = %data.customer.id, "Session restored");
                self.data = Some(data);
                return Ok(true);
            }
            debug!("Stored session has expired");
        }
        Ok(false)
    }

    /// Save session to disk
    pub fn save(&self) -> Result<()> {
        let (Some(data), Some(path)) = (self.data.as_ref(), self.session_path()) else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .context("Failed to create session directory")?;
        }
        let contents = serde_json::to_string_pretty(data)?;
        std::fs::write(&path, contents).context("Failed to write session file")?;
        Ok(())
    }

    /// Clear session data, on disk as well
    pub fn clear(&mut self) -> Result<()> {
        self.data = None;
        if let Some(path) = self.session_path() {
            if path.exists() {
                std::fs::remove_file(path).context("Failed to remove session file")?;
            }
        }
        Ok(())
    }

    /// Update session with new data
    pub fn update(&mut self, data: SessionData) {
        self.data = Some(data);
    }

    /// Get the bearer token if the session is valid
    pub fn token(&self) -> Option<&str> {
        self.live().map(|d| d.token.as_str())
    }

    /// Get the signed-in customer if the session is valid
    pub fn customer(&self) -> Option<&Customer> {
        self.live().map(|d| &d.customer)
    }

    /// Check if session is valid (exists and not expired)
    pub fn is_valid(&self) -> bool {
        self.live().is_some()
    }

    fn live(&self) -> Option<&SessionData> {
        self.data.as_ref().filter(|d| !d.is_expired(self.ttl))
    }

    fn session_path(&self) -> Option<PathBuf> {
        self.cache_dir.as_ref().map(|dir| dir.join(SESSION_FILE))
    }
}

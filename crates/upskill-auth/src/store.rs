//! Persistence of the bearer token and user profile.
//!
//! Every operation is best-effort: backend failures are logged and
//! swallowed, and unreadable profile data reads as "no stored user".

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;
use upskill_core::storage::KeyValueStore;

use crate::config::AuthConfig;
use crate::token;

pub struct TokenStore<S: KeyValueStore> {
    backend: S,
    token_key: String,
    user_key: String,
}

impl<S: KeyValueStore> TokenStore<S> {
    pub fn new(backend: S, config: &AuthConfig) -> Self {
        Self {
            backend,
            token_key: config.token_key.clone(),
            user_key: config.user_key.clone(),
        }
    }

    pub fn set_token(&self, token: &str) {
        if let Err(e) = self.backend.set(&self.token_key, token) {
            warn!(error = %e, "Failed to persist auth token");
        }
    }

    pub fn get_token(&self) -> Option<String> {
        self.backend
            .get(&self.token_key)
            .unwrap_or_else(|e| {
                warn!(error = %e, "Failed to read auth token");
                None
            })
            .filter(|t| !t.is_empty())
    }

    pub fn remove_token(&self) {
        if let Err(e) = self.backend.remove(&self.token_key) {
            warn!(error = %e, "Failed to remove auth token");
        }
    }

    pub fn set_stored_user<T: Serialize>(&self, user: &T) {
        let json = match serde_json::to_string(user) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "Failed to serialize user profile");
                return;
            }
        };
        if let Err(e) = self.backend.set(&self.user_key, &json) {
            warn!(error = %e, "Failed to persist user profile");
        }
    }

    /// `None` when nothing is stored or the stored JSON does not parse
    /// as `T`.
    pub fn get_stored_user<T: DeserializeOwned>(&self) -> Option<T> {
        let raw = match self.backend.get(&self.user_key) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(error = %e, "Failed to read user profile");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!(error = %e, "Discarding unreadable user profile");
                None
            }
        }
    }

    pub fn remove_stored_user(&self) {
        if let Err(e) = self.backend.remove(&self.user_key) {
            warn!(error = %e, "Failed to remove user profile");
        }
    }

    /// Remove both the token and the user profile.
    pub fn clear_auth_data(&self) {
        self.remove_token();
        self.remove_stored_user();
    }

    /// Expiry check of the given token, or of the stored one when `None`.
    pub fn is_token_expired(&self, token: Option<&str>) -> bool {
        match token {
            Some(token) => token::is_token_expired(Some(token)),
            None => token::is_token_expired(self.get_token().as_deref()),
        }
    }
}

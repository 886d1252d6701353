//! Client-side auth state: a process-wide bearer token holder, hydrated from
//! a single JSON file in the app config directory and persisted on every
//! change. No expiry tracking and no refresh flow; an expired token fails
//! server-side as 401 and surfaces like any other unauthorized error.

use std::path::PathBuf;
use std::sync::RwLock;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

pub mod validation;

/// File name of the persisted auth state inside the app config directory.
pub const AUTH_STORAGE_FILE: &str = "auth-storage.json";

#[derive(Debug, Default, Serialize, Deserialize)]
struct PersistedAuth {
    token: Option<String>,
}

pub struct AuthStore {
    path: PathBuf,
    token: RwLock<Option<String>>,
}

impl AuthStore {
    /// Loads the persisted auth state. A missing or corrupt file hydrates to
    /// logged-out rather than failing startup.
    pub fn hydrate(path: PathBuf) -> Self {
        let token = match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<PersistedAuth>(&raw) {
                Ok(persisted) => persisted.token,
                Err(e) => {
                    warn!("Ignoring corrupt auth storage at {}: {e}", path.display());
                    None
                }
            },
            Err(_) => None,
        };

        AuthStore {
            path,
            token: RwLock::new(token),
        }
    }

    pub fn token(&self) -> Option<String> {
        self.token.read().expect("auth lock poisoned").clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.read().expect("auth lock poisoned").is_some()
    }

    /// Replaces the token and persists it.
    pub fn set(&self, token: String) -> Result<()> {
        let mut guard = self.token.write().expect("auth lock poisoned");
        *guard = Some(token);
        self.persist(&guard)
    }

    /// Clears the token and persists the logged-out state.
    pub fn clear(&self) -> Result<()> {
        let mut guard = self.token.write().expect("auth lock poisoned");
        *guard = None;
        self.persist(&guard)
    }

    fn persist(&self, token: &Option<String>) -> Result<()> {
        let raw = serde_json::to_string(&PersistedAuth {
            token: token.clone(),
        })?;
        std::fs::write(&self.path, raw)
            .with_context(|| format!("Failed to persist auth state to {}", self.path.display()))
    }
}

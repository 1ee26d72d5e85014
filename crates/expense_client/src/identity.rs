//! Who is signed in, read from the host's key/value session storage.

use std::{
    collections::HashMap,
    sync::{PoisonError, RwLock},
};

use serde::{Deserialize, Serialize};
use tracing::warn;

pub const SESSION_USER_KEY: &str = "user";

pub trait IdentityProvider: Send + Sync {
    fn current_user_email(&self) -> Option<String>;
}

/// `getItem`/`setItem` storage owned by the host.
pub trait SessionStore: Send + Sync {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: String);
}

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    items: RwLock<HashMap<String, String>>,
}

impl SessionStore for MemorySessionStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set_item(&self, key: &str, value: String) {
        self.items
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub user_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl SessionUser {
    pub fn employee(email: Option<String>) -> Self {
        Self {
            user_type: Some("Employee".to_string()),
            email,
        }
    }
}

/// Reads the JSON `user` entry of a [`SessionStore`].
pub struct SessionIdentity<S> {
    session: S,
}

impl<S: SessionStore> SessionIdentity<S> {
    pub fn new(session: S) -> Self {
        Self { session }
    }

    pub fn sign_in(&self, user: &SessionUser) -> serde_json::Result<()> {
        self.session
            .set_item(SESSION_USER_KEY, serde_json::to_string(user)?);
        Ok(())
    }

    pub fn user(&self) -> Option<SessionUser> {
        let raw = self.session.get_item(SESSION_USER_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(err) => {
                warn!(error = %err, "ignoring malformed session user entry");
                None
            }
        }
    }
}

impl<S: SessionStore> IdentityProvider for SessionIdentity<S> {
    fn current_user_email(&self) -> Option<String> {
        self.user()?.email.filter(|email| !email.trim().is_empty())
    }
}

/// Fixed identity, for hosts that already know the user.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity(pub Option<String>);

impl IdentityProvider for StaticIdentity {
    fn current_user_email(&self) -> Option<String> {
        self.0.clone()
    }
}

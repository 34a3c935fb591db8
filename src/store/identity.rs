//! Identity store: the current session plus the roster of registered
//! users, persisted as one JSON blob under a single namespaced key.
//!
//! Credentials are compared in plaintext by a linear roster scan; there is
//! no lockout or rate limiting. A failed login does not reveal whether the
//! email was unknown or the password wrong.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Role, User};
use crate::sim::Clock;
use crate::store::events::{EventHub, StoreEvent};
use crate::store::persist::{LocalStore, PersistError};

/// Single key holding the whole identity blob.
pub const IDENTITY_KEY: &str = "learnhub:identity";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("email already registered")]
    EmailTaken,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("not authenticated")]
    NotAuthenticated,
    #[error("persistence error: {0}")]
    Persist(#[from] PersistError),
}

pub type AuthResult<T> = Result<T, AuthError>;

// ========== Persisted blob ==========

/// Roster entry: the public user record plus its plaintext password, the
/// way the client kept it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredUser {
    #[serde(flatten)]
    pub user: User,
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IdentitySnapshot {
    user: Option<User>,
    is_authenticated: bool,
    users: Vec<StoredUser>,
}

// ========== Requests ==========

/// Partial profile update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub avatar: Option<String>,
}

// ========== Store ==========

pub struct IdentityStore {
    storage: Arc<LocalStore>,
    clock: Arc<dyn Clock>,
    hub: EventHub,
    state: parking_lot::RwLock<IdentitySnapshot>,
}

impl IdentityStore {
    /// Load the persisted snapshot (empty on first run or after a corrupt
    /// file was discarded).
    pub fn open(storage: Arc<LocalStore>, clock: Arc<dyn Clock>, hub: EventHub) -> Self {
        let snapshot: IdentitySnapshot = storage.get_json(IDENTITY_KEY).unwrap_or_default();
        Self {
            storage,
            clock,
            hub,
            state: parking_lot::RwLock::new(snapshot),
        }
    }

    // ========== Getters ==========

    pub fn current_user(&self) -> Option<User> {
        self.state.read().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.read().is_authenticated
    }

    pub fn registered_count(&self) -> usize {
        self.state.read().users.len()
    }

    /// Public record of a registered user, looked up by email.
    pub fn find_by_email(&self, email: &str) -> Option<User> {
        self.state
            .read()
            .users
            .iter()
            .find(|stored| stored.user.email == email)
            .map(|stored| stored.user.clone())
    }

    // ========== Mutations ==========

    /// Linear scan for a matching email + password pair. On success the
    /// matched user becomes the session user.
    pub fn login(&self, email: &str, password: &str) -> AuthResult<User> {
        let mut state = self.state.write();

        let matched = state
            .users
            .iter()
            .find(|stored| stored.user.email == email && stored.password == password)
            .map(|stored| stored.user.clone())
            .ok_or(AuthError::InvalidCredentials)?;

        state.user = Some(matched.clone());
        state.is_authenticated = true;
        self.persist(&state)?;
        drop(state);

        tracing::info!(user_id = %matched.id, "login succeeded");
        self.hub.publish(StoreEvent::SessionChanged {
            user_id: Some(matched.id.clone()),
        });
        Ok(matched)
    }

    /// Append a new roster entry and immediately authenticate as it.
    /// Fails without mutating anything if the email is already present.
    pub fn register(&self, name: &str, email: &str, password: &str, role: Role) -> AuthResult<User> {
        let mut state = self.state.write();

        if state.users.iter().any(|stored| stored.user.email == email) {
            return Err(AuthError::EmailTaken);
        }

        let user = User {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            name: name.to_string(),
            role,
            avatar: None,
            created_at: self.clock.now(),
        };

        state.users.push(StoredUser {
            user: user.clone(),
            password: password.to_string(),
        });
        state.user = Some(user.clone());
        state.is_authenticated = true;
        self.persist(&state)?;
        drop(state);

        tracing::info!(user_id = %user.id, ?role, "registered new user");
        self.hub.publish(StoreEvent::SessionChanged {
            user_id: Some(user.id.clone()),
        });
        Ok(user)
    }

    /// Clear the session; the roster is kept.
    pub fn logout(&self) -> AuthResult<()> {
        let mut state = self.state.write();
        state.user = None;
        state.is_authenticated = false;
        self.persist(&state)?;
        drop(state);

        self.hub.publish(StoreEvent::SessionChanged { user_id: None });
        Ok(())
    }

    /// Apply a partial update to the session user and its roster entry.
    pub fn update_profile(&self, update: ProfileUpdate) -> AuthResult<User> {
        let mut state = self.state.write();

        let Some(current) = state.user.clone() else {
            return Err(AuthError::NotAuthenticated);
        };

        let mut updated = current;
        if let Some(name) = update.name {
            updated.name = name;
        }
        if let Some(avatar) = update.avatar {
            updated.avatar = Some(avatar);
        }

        if let Some(stored) = state
            .users
            .iter_mut()
            .find(|stored| stored.user.id == updated.id)
        {
            stored.user = updated.clone();
        }
        state.user = Some(updated.clone());
        self.persist(&state)?;
        drop(state);

        self.hub.publish(StoreEvent::SessionChanged {
            user_id: Some(updated.id.clone()),
        });
        Ok(updated)
    }

    fn persist(&self, state: &IdentitySnapshot) -> Result<(), PersistError> {
        self.storage.set_json(IDENTITY_KEY, state)
    }
}

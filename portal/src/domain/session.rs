//! Session store: identity registration, login, logout, and restoration.
//!
//! The store keeps two durable slots behind a [`KeyValueStore`]:
//! - [`SESSION_KEY`] holds the public view of the signed-in identity;
//! - [`IDENTITIES_KEY`] holds every registered identity, passwords included.
//!
//! The in-memory session is the source of truth while the process runs.
//! Writes to the session slot are best-effort: a failed write is logged and
//! the in-memory change still takes effect. The identity set is never
//! rewritten unless it was decoded first.

use std::fmt;
use std::sync::Arc;

use mockable::Clock;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::auth::LoginCredentials;
use crate::domain::identity::{Identity, IdentityId, NewIdentity, PublicIdentity};
use crate::domain::ports::{KeyValueStore, StorageError};

/// Slot holding the active session's public identity.
pub const SESSION_KEY: &str = "user";
/// Slot holding the ordered set of registered identities.
pub const IDENTITIES_KEY: &str = "app_users";

/// User-facing failures of [`SessionStore::register`] and [`SessionStore::login`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Another identity already uses this email, ignoring case.
    #[error("an account with email {email} already exists")]
    DuplicateEmail {
        /// Email as submitted.
        email: String,
    },
    /// Unknown email or wrong password.
    #[error("invalid email or password")]
    InvalidCredentials,
    /// The identity set could not be read or written.
    #[error("account storage is unavailable: {0}")]
    Storage(#[from] StorageError),
}

/// A persisted slot held text that does not decode into its record type.
///
/// Never leaves this module: a bad session slot is discarded, a bad identity
/// set becomes [`StorageError::Corrupt`].
#[derive(Debug, Error)]
#[error("malformed persisted state under {key}: {message}")]
struct MalformedPersistedState {
    key: &'static str,
    message: String,
}

fn decode<T: DeserializeOwned>(key: &'static str, raw: &str) -> Result<T, MalformedPersistedState> {
    serde_json::from_str(raw).map_err(|err| MalformedPersistedState {
        key,
        message: err.to_string(),
    })
}

fn encode<T: serde::Serialize>(value: &T) -> Result<String, StorageError> {
    serde_json::to_string(value).map_err(|err| StorageError::encoding(err.to_string()))
}

/// Authentication state for one running portal.
///
/// ## Invariants
/// - `current` is `Some` iff a login succeeded (or a session was restored)
///   and logout has not been called since.
/// - `last_error` describes the most recent failed register or login and is
///   reset at the start of each of those calls.
pub struct SessionStore<S> {
    storage: Arc<S>,
    clock: Arc<dyn Clock>,
    current: Option<PublicIdentity>,
    last_error: Option<String>,
}

impl<S> fmt::Debug for SessionStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("current", &self.current)
            .field("last_error", &self.last_error)
            .finish_non_exhaustive()
    }
}

impl<S> SessionStore<S> {
    /// Create a store with an empty session.
    ///
    /// Call [`SessionStore::restore_session`] (or use
    /// [`SessionStore::restore`]) to pick up a persisted session.
    pub fn new(storage: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self {
            storage,
            clock,
            current: None,
            last_error: None,
        }
    }

    /// Public identity of the signed-in user, if any.
    #[must_use]
    pub fn current(&self) -> Option<&PublicIdentity> {
        self.current.as_ref()
    }

    /// Whether a session is active.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    /// Message of the most recent failed register or login.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Storage adapter backing this store.
    #[must_use]
    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }
}

impl<S: KeyValueStore> SessionStore<S> {
    /// Create a store and rehydrate the session from storage.
    pub fn restore(storage: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        let mut store = Self::new(storage, clock);
        store.restore_session();
        store
    }

    /// Register a new identity.
    ///
    /// Fails with [`AuthError::DuplicateEmail`] when the email is taken,
    /// ignoring case. Fails with [`AuthError::Storage`] when the identity set
    /// cannot be read, decoded, or written; an undecodable set is never
    /// overwritten. Does not sign the new identity in.
    pub fn register(&mut self, new: NewIdentity) -> Result<PublicIdentity, AuthError> {
        self.last_error = None;
        let outcome = self.append_identity(new);
        self.record_failure(outcome)
    }

    /// Sign in with `credentials`.
    ///
    /// On failure the existing session, if any, is left untouched. An
    /// undecodable identity set answers [`AuthError::InvalidCredentials`].
    pub fn login(&mut self, credentials: &LoginCredentials) -> Result<PublicIdentity, AuthError> {
        self.last_error = None;
        let outcome = self.authenticate(credentials);
        let public = self.record_failure(outcome)?;

        self.persist_session(&public);
        info!(identity_id = %public.id(), "login succeeded");
        self.current = Some(public.clone());
        Ok(public)
    }

    /// Clear the session and its slot. Never fails.
    pub fn logout(&mut self) {
        let previous = self.current.take();
        if let Err(err) = self.storage.remove(SESSION_KEY) {
            warn!(error = %err, "failed to clear persisted session; continuing");
        }
        match previous {
            Some(identity) => info!(identity_id = %identity.id(), "logged out"),
            None => debug!("logout without an active session"),
        }
    }

    /// Rehydrate the session from its slot. Never fails.
    ///
    /// An absent slot or a storage failure leaves the session empty. A slot
    /// that does not decode is removed and the session stays empty.
    pub fn restore_session(&mut self) {
        self.current = None;
        let raw = match self.storage.get(SESSION_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("no persisted session");
                return;
            }
            Err(err) => {
                warn!(error = %err, "persisted session unreadable; starting signed out");
                return;
            }
        };

        match decode::<PublicIdentity>(SESSION_KEY, &raw) {
            Ok(identity) => {
                info!(identity_id = %identity.id(), "session restored");
                self.current = Some(identity);
            }
            Err(err) => {
                warn!(error = %err, "discarding persisted session");
                if let Err(remove_err) = self.storage.remove(SESSION_KEY) {
                    warn!(error = %remove_err, "failed to remove malformed session slot");
                }
            }
        }
    }

    /// Public views of every registered identity, in registration order.
    ///
    /// Fails with [`StorageError::Corrupt`] when the persisted set does not
    /// decode.
    pub fn identities(&self) -> Result<Vec<PublicIdentity>, StorageError> {
        Ok(self
            .load_identities()?
            .iter()
            .map(Identity::to_public)
            .collect())
    }

    fn append_identity(&self, new: NewIdentity) -> Result<PublicIdentity, AuthError> {
        let mut identities = self.load_identities()?;
        if identities
            .iter()
            .any(|existing| existing.email().matches(new.email().as_ref()))
        {
            return Err(AuthError::DuplicateEmail {
                email: new.email().to_string(),
            });
        }

        let identity = Identity::from_registration(IdentityId::random(), new, self.clock.utc());
        let public = identity.to_public();
        identities.push(identity);
        self.storage.set(IDENTITIES_KEY, &encode(&identities)?)?;

        info!(
            identity_id = %public.id(),
            registered = identities.len(),
            "identity registered"
        );
        Ok(public)
    }

    fn authenticate(&self, credentials: &LoginCredentials) -> Result<PublicIdentity, AuthError> {
        let identities = match self.load_identities() {
            Ok(identities) => identities,
            Err(StorageError::Corrupt { .. }) => return Err(AuthError::InvalidCredentials),
            Err(err) => return Err(err.into()),
        };
        identities
            .iter()
            .find(|identity| identity.email().matches(credentials.email()))
            .filter(|identity| identity.password_matches(credentials.password()))
            .map(Identity::to_public)
            .ok_or(AuthError::InvalidCredentials)
    }

    /// Read the identity set; an undecodable set is an error so callers
    /// never write over accounts they could not read.
    fn load_identities(&self) -> Result<Vec<Identity>, StorageError> {
        let Some(raw) = self.storage.get(IDENTITIES_KEY)? else {
            return Ok(Vec::new());
        };
        decode(IDENTITIES_KEY, &raw).map_err(|err| {
            warn!(error = %err, "identity set is unreadable; leaving it untouched");
            StorageError::corrupt(IDENTITIES_KEY, err.message)
        })
    }

    fn persist_session(&self, public: &PublicIdentity) {
        let written = encode(public).and_then(|text| self.storage.set(SESSION_KEY, &text));
        if let Err(err) = written {
            warn!(error = %err, "failed to persist session; keeping it in memory");
        }
    }

    fn record_failure<T>(&mut self, outcome: Result<T, AuthError>) -> Result<T, AuthError> {
        if let Err(err) = &outcome {
            debug!(error = %err, "authentication request rejected");
            self.last_error = Some(err.to_string());
        }
        outcome
    }
}

//! Explicitly constructed owner of the portal's two stores.
//!
//! Views receive a [`PortalContext`] by reference instead of reaching for
//! process-wide globals, so each test can build its own.

use std::sync::Arc;

use mockable::Clock;

use crate::config::PortalSettings;
use crate::domain::ports::{KeyValueStore, StorageError};
use crate::domain::{SelectionStore, SessionStore};
use crate::outbound::FileKeyValueStore;

/// Session and selection state for one running portal.
#[derive(Debug)]
pub struct PortalContext<S> {
    session: SessionStore<S>,
    selection: SelectionStore,
}

impl<S: KeyValueStore> PortalContext<S> {
    /// Build both stores and restore any persisted session.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use mockable::DefaultClock;
    /// use portal::PortalContext;
    /// use portal::outbound::InMemoryKeyValueStore;
    ///
    /// let context = PortalContext::start(
    ///     Arc::new(InMemoryKeyValueStore::default()),
    ///     Arc::new(DefaultClock),
    /// );
    /// assert!(!context.session().is_authenticated());
    /// assert!(context.selection().selected().is_empty());
    /// ```
    pub fn start(storage: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self {
            session: SessionStore::restore(storage, clock),
            selection: SelectionStore::new(),
        }
    }
}

impl PortalContext<FileKeyValueStore> {
    /// Open the configured storage directory and start the portal.
    pub fn from_settings(
        settings: &PortalSettings,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, StorageError> {
        let storage = FileKeyValueStore::open(&settings.storage_dir())?;
        Ok(Self::start(Arc::new(storage), clock))
    }
}

impl<S> PortalContext<S> {
    /// Authentication state.
    #[must_use]
    pub const fn session(&self) -> &SessionStore<S> {
        &self.session
    }

    /// Mutable authentication state for register, login, and logout.
    pub const fn session_mut(&mut self) -> &mut SessionStore<S> {
        &mut self.session
    }

    /// Course cart and enrollment.
    #[must_use]
    pub const fn selection(&self) -> &SelectionStore {
        &self.selection
    }

    /// Mutable course cart and enrollment.
    pub const fn selection_mut(&mut self) -> &mut SelectionStore {
        &mut self.selection
    }
}

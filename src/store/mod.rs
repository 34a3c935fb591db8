//! The application's two data stores and their supporting pieces.
//!
//! - [`identity::IdentityStore`]: session user + registered roster,
//!   persisted through [`persist::LocalStore`].
//! - [`catalog::CatalogStore`]: courses, enrollments, progress, quizzes,
//!   certificates, notes; in-memory only.
//!
//! Mutations publish [`events::StoreEvent`]s on a shared hub.

pub mod catalog;
pub mod events;
pub mod identity;
pub mod persist;

pub use catalog::{CatalogError, CatalogStore};
pub use events::{EventHub, StoreEvent};
pub use identity::{AuthError, IdentityStore};
pub use persist::{LocalStore, PersistError};

use std::path::Path;
use std::sync::Arc;

use crate::sim::clock::{system_clock, Clock};

/// Bundle of both stores sharing one clock and one event hub. This is the
/// application's composition root; tests build their own with pinned
/// clocks and in-memory persistence.
pub struct Stores {
    pub identity: IdentityStore,
    pub catalog: CatalogStore,
    pub hub: EventHub,
    pub clock: Arc<dyn Clock>,
}

impl Stores {
    /// Open against the on-disk session file.
    pub fn open<P: AsRef<Path>>(session_file: P) -> Result<Self, PersistError> {
        let storage = Arc::new(LocalStore::open(session_file)?);
        Ok(Self::with_parts(storage, system_clock()))
    }

    /// Fully in-memory stores (nothing survives a drop).
    pub fn in_memory() -> Self {
        Self::with_parts(Arc::new(LocalStore::in_memory()), system_clock())
    }

    pub fn with_parts(storage: Arc<LocalStore>, clock: Arc<dyn Clock>) -> Self {
        let hub = EventHub::new();
        let identity = IdentityStore::open(storage, Arc::clone(&clock), hub.clone());
        let catalog = CatalogStore::new(Arc::clone(&clock), hub.clone());
        Self {
            identity,
            catalog,
            hub,
            clock,
        }
    }
}

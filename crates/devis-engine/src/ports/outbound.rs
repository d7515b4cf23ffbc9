//! Outbound Ports (Driven Ports / SPI)
//!
//! The engine's only collaborators: the record store behind the CRUD
//! backend. It hands over document snapshots and receives computed
//! breakdowns; persistence mechanics stay on its side of the boundary.

use crate::domain::entities::{Devis, PricingBreakdown};
use crate::domain::errors::RepositoryError;
use crate::domain::value_objects::DevisId;
use async_trait::async_trait;

/// Quote record store
#[async_trait]
pub trait DevisRepository: Send + Sync {
    /// Load the stored snapshot of a devis.
    ///
    /// The snapshot carries base references as path descriptors only; the
    /// engine reconstructs every total from the tree itself.
    async fn load_devis(&self, id: DevisId) -> Result<Devis, RepositoryError>;

    /// Persist a computed breakdown for rendering collaborators.
    async fn store_breakdown(
        &self,
        id: DevisId,
        breakdown: &PricingBreakdown,
    ) -> Result<(), RepositoryError>;
}

/// In-memory implementations for tests and local tooling
pub mod mocks {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Repository backed by in-process maps
    #[derive(Default)]
    pub struct InMemoryDevisRepository {
        devis: Mutex<HashMap<DevisId, Devis>>,
        breakdowns: Mutex<HashMap<DevisId, PricingBreakdown>>,
    }

    impl InMemoryDevisRepository {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn insert_devis(&self, devis: Devis) {
            if let Ok(mut map) = self.devis.lock() {
                map.insert(devis.id, devis);
            }
        }

        pub fn stored_breakdown(&self, id: DevisId) -> Option<PricingBreakdown> {
            self.breakdowns.lock().ok()?.get(&id).cloned()
        }
    }

    #[async_trait]
    impl DevisRepository for InMemoryDevisRepository {
        async fn load_devis(&self, id: DevisId) -> Result<Devis, RepositoryError> {
            let map = self
                .devis
                .lock()
                .map_err(|_| RepositoryError::Backend("poisoned lock".into()))?;
            map.get(&id)
                .cloned()
                .ok_or_else(|| RepositoryError::NotFound(id.to_string()))
        }

        async fn store_breakdown(
            &self,
            id: DevisId,
            breakdown: &PricingBreakdown,
        ) -> Result<(), RepositoryError> {
            let mut map = self
                .breakdowns
                .lock()
                .map_err(|_| RepositoryError::Backend("poisoned lock".into()))?;
            map.insert(id, breakdown.clone());
            Ok(())
        }
    }
}

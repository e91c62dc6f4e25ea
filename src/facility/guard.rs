use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::domain::{BuildingId, FloorId};
use super::repository::{FacilityRepository, RepositoryError};

/// Subtree a demotion or deletion would affect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeletionScope {
    Building(BuildingId),
    Floor(FloorId),
}

/// Outcome of a deletion-guard check.
///
/// A blocked check is a business decision, not an error: `allowed` is false
/// and `blocking_contracts` carries the count the caller should surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeletionCheck {
    pub allowed: bool,
    pub blocking_contracts: u32,
}

/// Pure predicate over active leases beneath a building or floor.
///
/// Consulted before any maintenance demotion or hard deletion; performs no
/// mutation of its own.
pub struct DeletionGuard<R> {
    repository: Arc<R>,
}

impl<R> DeletionGuard<R>
where
    R: FacilityRepository,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub fn check(&self, scope: DeletionScope) -> Result<DeletionCheck, RepositoryError> {
        let blocking_contracts = self.repository.active_contract_count(scope)?;
        Ok(DeletionCheck {
            allowed: blocking_contracts == 0,
            blocking_contracts,
        })
    }
}

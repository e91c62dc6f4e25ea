use std::sync::Arc;

use serde::Serialize;

use super::domain::BuildingId;
use super::guard::{DeletionGuard, DeletionScope};
use super::repository::{FacilityRepository, RepositoryError};
use crate::context::OperationContext;

/// Result of a building deletion attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeletionOutcome {
    Deleted,
    Blocked { blocking_contracts: u32 },
}

/// Building deletion path, guarded by active leases in the subtree.
pub struct BuildingService<R> {
    repository: Arc<R>,
    guard: DeletionGuard<R>,
}

impl<R> BuildingService<R>
where
    R: FacilityRepository,
{
    pub fn new(repository: Arc<R>) -> Self {
        let guard = DeletionGuard::new(repository.clone());
        Self { repository, guard }
    }

    /// Delete a building unless any apartment beneath it holds an active
    /// contract. Blocked attempts mutate nothing.
    pub fn delete(
        &self,
        building_id: BuildingId,
        ctx: &OperationContext,
    ) -> Result<DeletionOutcome, RepositoryError> {
        let check = self.guard.check(DeletionScope::Building(building_id))?;
        if !check.allowed {
            tracing::info!(
                building = building_id.0,
                actor = %ctx.actor,
                blocking_contracts = check.blocking_contracts,
                "building deletion blocked by active contracts"
            );
            return Ok(DeletionOutcome::Blocked {
                blocking_contracts: check.blocking_contracts,
            });
        }

        self.repository.delete_building(building_id)?;
        tracing::info!(building = building_id.0, actor = %ctx.actor, "building deleted");
        Ok(DeletionOutcome::Deleted)
    }
}

use std::sync::Arc;

use serde::Serialize;

use super::domain::{ApartmentId, ApartmentStatus, FloorId, FloorStatus};
use super::guard::{DeletionGuard, DeletionScope};
use super::repository::{FacilityRepository, RepositoryError};

/// Result of a floor status change.
///
/// `Blocked` is an expected business outcome that callers branch on; only
/// validation and persistence problems surface as [`CascadeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CascadeOutcome {
    Applied { apartments_updated: u32 },
    Blocked { blocking_contracts: u32 },
}

#[derive(Debug, thiserror::Error)]
pub enum CascadeError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Propagates a floor's operational status to its apartments.
///
/// The floor update and every derived apartment update are handed to the
/// repository as one call so the cascade commits atomically.
pub struct StatusCascadeEngine<R> {
    repository: Arc<R>,
    guard: DeletionGuard<R>,
}

impl<R> StatusCascadeEngine<R>
where
    R: FacilityRepository,
{
    pub fn new(repository: Arc<R>) -> Self {
        let guard = DeletionGuard::new(repository.clone());
        Self { repository, guard }
    }

    /// Move a floor to `target`, cascading apartment statuses.
    ///
    /// Demotion to maintenance is refused while any apartment beneath the
    /// floor carries an active contract; the guard runs before any mutation.
    /// Reactivation resets maintenance apartments to available. `Owned`
    /// apartments are never cascaded in either direction.
    pub fn set_floor_status(
        &self,
        floor_id: FloorId,
        target: FloorStatus,
    ) -> Result<CascadeOutcome, CascadeError> {
        let floor = self
            .repository
            .floor(floor_id)?
            .ok_or(RepositoryError::NotFound)?;

        if target == FloorStatus::Maintenance {
            let check = self.guard.check(DeletionScope::Floor(floor_id))?;
            if !check.allowed {
                tracing::info!(
                    floor = floor.id.0,
                    blocking_contracts = check.blocking_contracts,
                    "maintenance demotion blocked by active contracts"
                );
                return Ok(CascadeOutcome::Blocked {
                    blocking_contracts: check.blocking_contracts,
                });
            }
        }

        let apartments = self.repository.apartments_by_floor(floor_id)?;
        let transitions: Vec<(ApartmentId, ApartmentStatus)> = match target {
            FloorStatus::Maintenance => apartments
                .iter()
                .filter(|apartment| apartment.status == ApartmentStatus::Available)
                .map(|apartment| (apartment.id, ApartmentStatus::Maintenance))
                .collect(),
            FloorStatus::Active => apartments
                .iter()
                .filter(|apartment| apartment.status == ApartmentStatus::Maintenance)
                .map(|apartment| (apartment.id, ApartmentStatus::Available))
                .collect(),
        };

        self.repository
            .apply_floor_cascade(floor_id, target, &transitions)?;

        tracing::info!(
            floor = floor.id.0,
            status = target.label(),
            apartments_updated = transitions.len(),
            "floor status cascade applied"
        );

        Ok(CascadeOutcome::Applied {
            apartments_updated: transitions.len() as u32,
        })
    }
}

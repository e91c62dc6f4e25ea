use std::sync::Arc;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use super::domain::BuildingId;
use super::repository::{FacilityRepository, RepositoryError};

/// Per-building occupancy figures for dashboard cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BuildingStats {
    pub total_floors: u32,
    pub total_apartments: u32,
    pub rented_apartments: u32,
    /// Rented share as a whole percentage, rounded to nearest; 0 for an
    /// empty building.
    pub occupancy_rate: u32,
}

#[derive(Debug, thiserror::Error)]
pub enum OccupancyError {
    #[error("month {0} is outside 1..=12")]
    InvalidMonth(u32),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Computes occupancy and revenue statistics for reporting.
///
/// Every query hits the repository directly; nothing is cached in-core.
pub struct OccupancyAggregator<R> {
    repository: Arc<R>,
}

impl<R> OccupancyAggregator<R>
where
    R: FacilityRepository,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub fn stats_for(&self, building_id: BuildingId) -> Result<BuildingStats, RepositoryError> {
        let total_floors = self.repository.count_floors(building_id)?;
        let total_apartments = self.repository.count_apartments(building_id)?;
        let rented_apartments = self.repository.count_rented(building_id)?;

        let occupancy_rate = if total_apartments == 0 {
            0
        } else {
            let rate = Decimal::from(rented_apartments) / Decimal::from(total_apartments)
                * Decimal::from(100);
            rate.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                .to_u32()
                .unwrap_or(0)
        };

        Ok(BuildingStats {
            total_floors,
            total_apartments,
            rented_apartments,
            occupancy_rate,
        })
    }

    /// Total invoiced revenue for a month, optionally scoped to a building.
    pub fn monthly_revenue(
        &self,
        month: u32,
        year: i32,
        building_id: Option<BuildingId>,
    ) -> Result<Decimal, OccupancyError> {
        if !(1..=12).contains(&month) {
            return Err(OccupancyError::InvalidMonth(month));
        }
        Ok(self.repository.monthly_revenue(month, year, building_id)?)
    }
}

use std::sync::Arc;

use serde::Serialize;

use super::domain::{BuildingId, FloorStatus, NewFloor};
use super::repository::{FacilityRepository, RepositoryError};

/// Default cap on the floor-number span one batch call may cover (inclusive
/// ends, so at most 101 floors).
pub const MAX_BATCH_SPAN: i32 = 100;

/// Per-range creation tally; skipped rows cover duplicates and failed inserts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BatchOutcome {
    pub success_count: u32,
    pub skip_count: u32,
}

/// Validation failures, all raised before any persistence call.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("floor range start {from} exceeds end {to}")]
    InvalidRange { from: i32, to: i32 },
    #[error("range covers {span} floors, limit is {limit}")]
    RangeTooLarge { span: i64, limit: i64 },
}

/// Bulk-inserts a numbered range of floors with duplicate-skip semantics.
pub struct BatchFloorCreator<R> {
    repository: Arc<R>,
    max_span: i32,
}

impl<R> BatchFloorCreator<R>
where
    R: FacilityRepository,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self::with_span_limit(repository, MAX_BATCH_SPAN)
    }

    /// Same creator with an operator-configured span cap.
    pub fn with_span_limit(repository: Arc<R>, max_span: i32) -> Self {
        Self {
            repository,
            max_span,
        }
    }

    /// Create floors named `"{name_prefix} {i}"` for every `i` in `[from, to]`.
    ///
    /// Rows are independent: a duplicate name or number, or a row-level
    /// persistence failure, increments `skip_count` and the range continues.
    /// Partial completion is a reported outcome, not a violation.
    pub fn create_range(
        &self,
        building_id: BuildingId,
        from: i32,
        to: i32,
        name_prefix: &str,
    ) -> Result<BatchOutcome, BatchError> {
        if from > to {
            return Err(BatchError::InvalidRange { from, to });
        }
        // Widened arithmetic: extreme bounds must be rejected, not iterated.
        let span = i64::from(to) - i64::from(from);
        if span > i64::from(self.max_span) {
            return Err(BatchError::RangeTooLarge {
                span: span + 1,
                limit: i64::from(self.max_span) + 1,
            });
        }

        let mut outcome = BatchOutcome {
            success_count: 0,
            skip_count: 0,
        };

        for number in from..=to {
            let name = format!("{name_prefix} {number}");

            match self.row_is_taken(building_id, number, &name) {
                Ok(false) => {}
                Ok(true) => {
                    outcome.skip_count += 1;
                    continue;
                }
                Err(err) => {
                    tracing::warn!(building = building_id.0, floor = %name, error = %err,
                        "duplicate check failed, skipping row");
                    outcome.skip_count += 1;
                    continue;
                }
            }

            let floor = NewFloor {
                building_id,
                floor_number: number,
                name: name.clone(),
                status: FloorStatus::Active,
            };
            match self.repository.insert_floor(floor) {
                Ok(_) => outcome.success_count += 1,
                Err(err) => {
                    tracing::warn!(building = building_id.0, floor = %name, error = %err,
                        "insert failed, skipping row");
                    outcome.skip_count += 1;
                }
            }
        }

        tracing::info!(
            building = building_id.0,
            success = outcome.success_count,
            skipped = outcome.skip_count,
            "floor batch completed"
        );

        Ok(outcome)
    }

    fn row_is_taken(
        &self,
        building_id: BuildingId,
        number: i32,
        name: &str,
    ) -> Result<bool, RepositoryError> {
        Ok(self.repository.floor_name_exists(building_id, name)?
            || self.repository.floor_number_exists(building_id, number)?)
    }
}

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};

use super::domain::{
    ApartmentStatus, BuildingId, Contract, ContractAction, ContractHistory, ContractId,
    ContractStatus, HouseholdMember,
};
use super::expiry::{self, ContractExpiryView, EXPIRY_WINDOW_DAYS};
use super::repository::{FacilityRepository, RepositoryError};
use crate::context::OperationContext;

#[derive(Debug, thiserror::Error)]
pub enum ContractError {
    #[error("contract is not active")]
    NotActive,
    #[error("new end date {proposed} does not extend current end date {current}")]
    EndDateNotExtended {
        proposed: NaiveDate,
        current: NaiveDate,
    },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Contract lifecycle mutations, each appending exactly one audit row.
///
/// Every mutation lands the contract, any apartment release, and its audit
/// row through a single [`FacilityRepository::apply_contract_change`] call;
/// a failed write leaves all three untouched.
pub struct ContractService<R> {
    repository: Arc<R>,
    expiry_window: i64,
}

impl<R> ContractService<R>
where
    R: FacilityRepository,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self::with_expiry_window(repository, EXPIRY_WINDOW_DAYS)
    }

    /// Same service with an operator-configured alert window.
    pub fn with_expiry_window(repository: Arc<R>, window_days: i64) -> Self {
        Self {
            repository,
            expiry_window: window_days,
        }
    }

    /// Extend an active contract's end date without changing its status.
    pub fn renew(
        &self,
        contract_id: ContractId,
        new_end_date: NaiveDate,
        reason: &str,
        ctx: &OperationContext,
        now: DateTime<Utc>,
    ) -> Result<Contract, ContractError> {
        let mut contract = self
            .repository
            .contract(contract_id)?
            .ok_or(RepositoryError::NotFound)?;

        if contract.status != ContractStatus::Active {
            return Err(ContractError::NotActive);
        }
        if new_end_date <= contract.end_date {
            return Err(ContractError::EndDateNotExtended {
                proposed: new_end_date,
                current: contract.end_date,
            });
        }

        let old_end_date = contract.end_date;
        contract.end_date = new_end_date;
        self.repository.apply_contract_change(
            &contract,
            None,
            ContractHistory {
                contract_id,
                action: ContractAction::Renewed,
                old_end_date: Some(old_end_date),
                new_end_date: Some(new_end_date),
                reason: reason.to_owned(),
                created_by: ctx.actor.clone(),
                created_at: now,
            },
        )?;

        tracing::info!(
            contract = contract.id.0,
            actor = %ctx.actor,
            %new_end_date,
            "contract renewed"
        );

        Ok(contract)
    }

    /// Terminate an active contract and free its apartment.
    ///
    /// Terminated is terminal; the apartment returns to available so the
    /// rented-implies-active-contract invariant holds.
    pub fn terminate(
        &self,
        contract_id: ContractId,
        reason: &str,
        ctx: &OperationContext,
        now: DateTime<Utc>,
    ) -> Result<Contract, ContractError> {
        let mut contract = self
            .repository
            .contract(contract_id)?
            .ok_or(RepositoryError::NotFound)?;

        if contract.status != ContractStatus::Active {
            return Err(ContractError::NotActive);
        }

        contract.status = ContractStatus::Terminated;
        self.repository.apply_contract_change(
            &contract,
            Some((contract.apartment_id, ApartmentStatus::Available)),
            ContractHistory {
                contract_id,
                action: ContractAction::Terminated,
                old_end_date: Some(contract.end_date),
                new_end_date: None,
                reason: reason.to_owned(),
                created_by: ctx.actor.clone(),
                created_at: now,
            },
        )?;

        tracing::info!(
            contract = contract.id.0,
            actor = %ctx.actor,
            "contract terminated"
        );

        Ok(contract)
    }

    /// Contracts that are overdue or inside the expiring-soon window,
    /// most urgent first.
    pub fn expiry_alerts(
        &self,
        today: NaiveDate,
        building_id: Option<BuildingId>,
    ) -> Result<Vec<ContractExpiryView>, RepositoryError> {
        let cutoff = today + Duration::days(self.expiry_window + 1);
        let contracts = self
            .repository
            .contracts_ending_before(cutoff, building_id)?;
        Ok(expiry::flag_contracts_within(
            &contracts,
            today,
            self.expiry_window,
        ))
    }

    /// Informational household listing for a contract.
    pub fn household(
        &self,
        contract_id: ContractId,
    ) -> Result<Vec<HouseholdMember>, RepositoryError> {
        self.repository.household_members(contract_id)
    }
}

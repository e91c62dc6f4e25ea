use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::domain::{
    Apartment, ApartmentId, ApartmentStatus, BuildingId, Contract, ContractHistory, ContractId,
    Floor, FloorId, FloorStatus, HouseholdMember, Invoice, InvoiceDetail, InvoiceId, NewFloor,
};
use super::guard::DeletionScope;

/// Persistence collaborator consumed by the facility services.
///
/// Implementations own transaction handling: [`apply_floor_cascade`] and
/// [`apply_contract_change`] must land all of their updates as one atomic
/// unit, so a partial cascade or a terminated contract with a still-rented
/// apartment is never observable to readers. Contract history is append-only
/// by construction; the only way to write a row is alongside the contract
/// update that caused it.
///
/// [`apply_floor_cascade`]: FacilityRepository::apply_floor_cascade
/// [`apply_contract_change`]: FacilityRepository::apply_contract_change
pub trait FacilityRepository: Send + Sync {
    fn active_contract_count(&self, scope: DeletionScope) -> Result<u32, RepositoryError>;

    fn floor(&self, id: FloorId) -> Result<Option<Floor>, RepositoryError>;
    fn apartments_by_floor(&self, floor_id: FloorId) -> Result<Vec<Apartment>, RepositoryError>;
    fn apply_floor_cascade(
        &self,
        floor_id: FloorId,
        status: FloorStatus,
        apartments: &[(ApartmentId, ApartmentStatus)],
    ) -> Result<(), RepositoryError>;

    fn floor_name_exists(
        &self,
        building_id: BuildingId,
        name: &str,
    ) -> Result<bool, RepositoryError>;
    fn floor_number_exists(
        &self,
        building_id: BuildingId,
        number: i32,
    ) -> Result<bool, RepositoryError>;
    fn insert_floor(&self, floor: NewFloor) -> Result<FloorId, RepositoryError>;

    fn count_floors(&self, building_id: BuildingId) -> Result<u32, RepositoryError>;
    fn count_apartments(&self, building_id: BuildingId) -> Result<u32, RepositoryError>;
    fn count_rented(&self, building_id: BuildingId) -> Result<u32, RepositoryError>;
    fn monthly_revenue(
        &self,
        month: u32,
        year: i32,
        building_id: Option<BuildingId>,
    ) -> Result<Decimal, RepositoryError>;

    fn invoice(&self, id: InvoiceId) -> Result<Option<Invoice>, RepositoryError>;
    fn invoice_details(&self, id: InvoiceId) -> Result<Vec<InvoiceDetail>, RepositoryError>;
    fn update_invoice(&self, invoice: &Invoice) -> Result<(), RepositoryError>;

    fn contract(&self, id: ContractId) -> Result<Option<Contract>, RepositoryError>;
    fn contracts_ending_before(
        &self,
        cutoff: NaiveDate,
        building_id: Option<BuildingId>,
    ) -> Result<Vec<Contract>, RepositoryError>;
    fn apply_contract_change(
        &self,
        contract: &Contract,
        apartment: Option<(ApartmentId, ApartmentStatus)>,
        history: ContractHistory,
    ) -> Result<(), RepositoryError>;
    fn household_members(
        &self,
        contract_id: ContractId,
    ) -> Result<Vec<HouseholdMember>, RepositoryError>;

    fn delete_building(&self, id: BuildingId) -> Result<(), RepositoryError>;
}

/// Error enumeration for persistence failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

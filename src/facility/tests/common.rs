use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::Value;

use crate::facility::domain::{
    Apartment, ApartmentId, ApartmentStatus, Building, BuildingId, BuildingStatus, Contract,
    ContractHistory, ContractId, ContractStatus, Floor, FloorId, FloorStatus, HouseholdMember,
    Invoice, InvoiceDetail, InvoiceId, InvoiceStatus, NewFloor,
};
use crate::facility::guard::DeletionScope;
use crate::facility::repository::{FacilityRepository, RepositoryError};

#[derive(Default)]
struct Inner {
    buildings: HashMap<i64, Building>,
    floors: HashMap<i64, Floor>,
    apartments: HashMap<i64, Apartment>,
    contracts: HashMap<i64, Contract>,
    invoices: HashMap<i64, Invoice>,
    invoice_details: HashMap<i64, Vec<InvoiceDetail>>,
    households: HashMap<i64, Vec<HouseholdMember>>,
    history: Vec<ContractHistory>,
    next_floor_id: i64,
    fail_contract_change: bool,
}

/// In-memory facility store so services can be exercised in isolation.
#[derive(Default, Clone)]
pub(super) struct MemoryFacility {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryFacility {
    pub(super) fn add_building(&self, id: i64, name: &str) -> BuildingId {
        let mut inner = self.inner.lock().expect("facility mutex poisoned");
        inner.buildings.insert(
            id,
            Building {
                id: BuildingId(id),
                name: name.to_string(),
                address: "12 Riverside Road".to_string(),
                status: BuildingStatus::Active,
                manager_id: Some(7),
            },
        );
        BuildingId(id)
    }

    pub(super) fn add_floor(
        &self,
        id: i64,
        building_id: BuildingId,
        floor_number: i32,
        name: &str,
        status: FloorStatus,
    ) -> FloorId {
        let mut inner = self.inner.lock().expect("facility mutex poisoned");
        inner.floors.insert(
            id,
            Floor {
                id: FloorId(id),
                building_id,
                floor_number,
                name: name.to_string(),
                status,
            },
        );
        if id >= inner.next_floor_id {
            inner.next_floor_id = id + 1;
        }
        FloorId(id)
    }

    pub(super) fn add_apartment(
        &self,
        id: i64,
        floor_id: FloorId,
        room_number: &str,
        status: ApartmentStatus,
    ) -> ApartmentId {
        let mut inner = self.inner.lock().expect("facility mutex poisoned");
        inner.apartments.insert(
            id,
            Apartment {
                id: ApartmentId(id),
                floor_id,
                room_number: room_number.to_string(),
                status,
                area: Decimal::new(652, 1),
                bedroom_count: 2,
                bathroom_count: 1,
            },
        );
        ApartmentId(id)
    }

    pub(super) fn add_contract(
        &self,
        id: i64,
        apartment_id: ApartmentId,
        end_date: NaiveDate,
        status: ContractStatus,
    ) -> ContractId {
        let mut inner = self.inner.lock().expect("facility mutex poisoned");
        inner.contracts.insert(
            id,
            Contract {
                id: ContractId(id),
                apartment_id,
                resident_id: 100 + id,
                start_date: end_date - chrono::Duration::days(365),
                end_date,
                status,
                contract_number: format!("HD-{id:04}"),
                kind: "rental".to_string(),
            },
        );
        ContractId(id)
    }

    pub(super) fn add_invoice(
        &self,
        id: i64,
        contract_id: ContractId,
        month: u32,
        year: i32,
        total_amount: Decimal,
        status: InvoiceStatus,
    ) -> InvoiceId {
        let mut inner = self.inner.lock().expect("facility mutex poisoned");
        inner.invoices.insert(
            id,
            Invoice {
                id: InvoiceId(id),
                contract_id,
                month,
                year,
                total_amount,
                status,
                payment_date: None,
            },
        );
        InvoiceId(id)
    }

    pub(super) fn add_invoice_detail(
        &self,
        invoice_id: InvoiceId,
        service_name: &str,
        unit_price: Decimal,
        quantity: Decimal,
    ) {
        let mut inner = self.inner.lock().expect("facility mutex poisoned");
        inner
            .invoice_details
            .entry(invoice_id.0)
            .or_default()
            .push(InvoiceDetail {
                invoice_id,
                service_name: service_name.to_string(),
                unit_price,
                quantity,
            });
    }

    pub(super) fn add_household_member(&self, contract_id: ContractId, full_name: &str) {
        let mut inner = self.inner.lock().expect("facility mutex poisoned");
        inner
            .households
            .entry(contract_id.0)
            .or_default()
            .push(HouseholdMember {
                contract_id,
                full_name: full_name.to_string(),
                relationship: "spouse".to_string(),
                active: true,
            });
    }

    /// Makes the next contract write fail as if the store went offline.
    pub(super) fn fail_next_contract_change(&self) {
        let mut inner = self.inner.lock().expect("facility mutex poisoned");
        inner.fail_contract_change = true;
    }

    pub(super) fn floor_status(&self, id: FloorId) -> FloorStatus {
        let inner = self.inner.lock().expect("facility mutex poisoned");
        inner.floors.get(&id.0).expect("floor present").status
    }

    pub(super) fn apartment_status(&self, id: ApartmentId) -> ApartmentStatus {
        let inner = self.inner.lock().expect("facility mutex poisoned");
        inner.apartments.get(&id.0).expect("apartment present").status
    }

    pub(super) fn building_exists(&self, id: BuildingId) -> bool {
        let inner = self.inner.lock().expect("facility mutex poisoned");
        inner.buildings.contains_key(&id.0)
    }

    pub(super) fn stored_contract(&self, id: ContractId) -> Contract {
        let inner = self.inner.lock().expect("facility mutex poisoned");
        inner.contracts.get(&id.0).expect("contract present").clone()
    }

    pub(super) fn stored_invoice(&self, id: InvoiceId) -> Invoice {
        let inner = self.inner.lock().expect("facility mutex poisoned");
        inner.invoices.get(&id.0).expect("invoice present").clone()
    }

    pub(super) fn history(&self) -> Vec<ContractHistory> {
        let inner = self.inner.lock().expect("facility mutex poisoned");
        inner.history.clone()
    }

    pub(super) fn floor_names(&self, building_id: BuildingId) -> Vec<String> {
        let inner = self.inner.lock().expect("facility mutex poisoned");
        let mut names: Vec<String> = inner
            .floors
            .values()
            .filter(|floor| floor.building_id == building_id)
            .map(|floor| floor.name.clone())
            .collect();
        names.sort();
        names
    }

    fn apartment_ids_in_scope(inner: &Inner, scope: DeletionScope) -> HashSet<i64> {
        match scope {
            DeletionScope::Floor(floor_id) => inner
                .apartments
                .values()
                .filter(|apartment| apartment.floor_id == floor_id)
                .map(|apartment| apartment.id.0)
                .collect(),
            DeletionScope::Building(building_id) => {
                let floor_ids: HashSet<i64> = inner
                    .floors
                    .values()
                    .filter(|floor| floor.building_id == building_id)
                    .map(|floor| floor.id.0)
                    .collect();
                inner
                    .apartments
                    .values()
                    .filter(|apartment| floor_ids.contains(&apartment.floor_id.0))
                    .map(|apartment| apartment.id.0)
                    .collect()
            }
        }
    }

    fn building_of_contract(inner: &Inner, contract: &Contract) -> Option<BuildingId> {
        let apartment = inner.apartments.get(&contract.apartment_id.0)?;
        let floor = inner.floors.get(&apartment.floor_id.0)?;
        Some(floor.building_id)
    }
}

impl FacilityRepository for MemoryFacility {
    fn active_contract_count(&self, scope: DeletionScope) -> Result<u32, RepositoryError> {
        let inner = self.inner.lock().expect("facility mutex poisoned");
        let apartments = Self::apartment_ids_in_scope(&inner, scope);
        let count = inner
            .contracts
            .values()
            .filter(|contract| {
                contract.status == ContractStatus::Active
                    && apartments.contains(&contract.apartment_id.0)
            })
            .count();
        Ok(count as u32)
    }

    fn floor(&self, id: FloorId) -> Result<Option<Floor>, RepositoryError> {
        let inner = self.inner.lock().expect("facility mutex poisoned");
        Ok(inner.floors.get(&id.0).cloned())
    }

    fn apartments_by_floor(&self, floor_id: FloorId) -> Result<Vec<Apartment>, RepositoryError> {
        let inner = self.inner.lock().expect("facility mutex poisoned");
        let mut apartments: Vec<Apartment> = inner
            .apartments
            .values()
            .filter(|apartment| apartment.floor_id == floor_id)
            .cloned()
            .collect();
        apartments.sort_by_key(|apartment| apartment.id);
        Ok(apartments)
    }

    fn apply_floor_cascade(
        &self,
        floor_id: FloorId,
        status: FloorStatus,
        apartments: &[(ApartmentId, ApartmentStatus)],
    ) -> Result<(), RepositoryError> {
        // Single lock scope stands in for the transactional boundary.
        let mut inner = self.inner.lock().expect("facility mutex poisoned");
        let floor = inner
            .floors
            .get_mut(&floor_id.0)
            .ok_or(RepositoryError::NotFound)?;
        floor.status = status;
        for (apartment_id, target) in apartments {
            let apartment = inner
                .apartments
                .get_mut(&apartment_id.0)
                .ok_or(RepositoryError::NotFound)?;
            apartment.status = *target;
        }
        Ok(())
    }

    fn floor_name_exists(
        &self,
        building_id: BuildingId,
        name: &str,
    ) -> Result<bool, RepositoryError> {
        let inner = self.inner.lock().expect("facility mutex poisoned");
        Ok(inner
            .floors
            .values()
            .any(|floor| floor.building_id == building_id && floor.name == name))
    }

    fn floor_number_exists(
        &self,
        building_id: BuildingId,
        number: i32,
    ) -> Result<bool, RepositoryError> {
        let inner = self.inner.lock().expect("facility mutex poisoned");
        Ok(inner
            .floors
            .values()
            .any(|floor| floor.building_id == building_id && floor.floor_number == number))
    }

    fn insert_floor(&self, floor: NewFloor) -> Result<FloorId, RepositoryError> {
        let mut inner = self.inner.lock().expect("facility mutex poisoned");
        let duplicate = inner.floors.values().any(|existing| {
            existing.building_id == floor.building_id
                && (existing.name == floor.name || existing.floor_number == floor.floor_number)
        });
        if duplicate {
            return Err(RepositoryError::Conflict);
        }
        let id = inner.next_floor_id.max(1);
        inner.next_floor_id = id + 1;
        inner.floors.insert(
            id,
            Floor {
                id: FloorId(id),
                building_id: floor.building_id,
                floor_number: floor.floor_number,
                name: floor.name,
                status: floor.status,
            },
        );
        Ok(FloorId(id))
    }

    fn count_floors(&self, building_id: BuildingId) -> Result<u32, RepositoryError> {
        let inner = self.inner.lock().expect("facility mutex poisoned");
        Ok(inner
            .floors
            .values()
            .filter(|floor| floor.building_id == building_id)
            .count() as u32)
    }

    fn count_apartments(&self, building_id: BuildingId) -> Result<u32, RepositoryError> {
        let inner = self.inner.lock().expect("facility mutex poisoned");
        let apartments =
            Self::apartment_ids_in_scope(&inner, DeletionScope::Building(building_id));
        Ok(apartments.len() as u32)
    }

    fn count_rented(&self, building_id: BuildingId) -> Result<u32, RepositoryError> {
        let inner = self.inner.lock().expect("facility mutex poisoned");
        let apartments =
            Self::apartment_ids_in_scope(&inner, DeletionScope::Building(building_id));
        Ok(inner
            .apartments
            .values()
            .filter(|apartment| {
                apartments.contains(&apartment.id.0)
                    && apartment.status == ApartmentStatus::Rented
            })
            .count() as u32)
    }

    fn monthly_revenue(
        &self,
        month: u32,
        year: i32,
        building_id: Option<BuildingId>,
    ) -> Result<Decimal, RepositoryError> {
        let inner = self.inner.lock().expect("facility mutex poisoned");
        let total = inner
            .invoices
            .values()
            .filter(|invoice| {
                invoice.month == month
                    && invoice.year == year
                    && invoice.status == InvoiceStatus::Paid
            })
            .filter(|invoice| match building_id {
                None => true,
                Some(wanted) => inner
                    .contracts
                    .get(&invoice.contract_id.0)
                    .and_then(|contract| Self::building_of_contract(&inner, contract))
                    .map(|building| building == wanted)
                    .unwrap_or(false),
            })
            .map(|invoice| invoice.total_amount)
            .sum();
        Ok(total)
    }

    fn invoice(&self, id: InvoiceId) -> Result<Option<Invoice>, RepositoryError> {
        let inner = self.inner.lock().expect("facility mutex poisoned");
        Ok(inner.invoices.get(&id.0).cloned())
    }

    fn invoice_details(&self, id: InvoiceId) -> Result<Vec<InvoiceDetail>, RepositoryError> {
        let inner = self.inner.lock().expect("facility mutex poisoned");
        Ok(inner.invoice_details.get(&id.0).cloned().unwrap_or_default())
    }

    fn update_invoice(&self, invoice: &Invoice) -> Result<(), RepositoryError> {
        let mut inner = self.inner.lock().expect("facility mutex poisoned");
        if !inner.invoices.contains_key(&invoice.id.0) {
            return Err(RepositoryError::NotFound);
        }
        inner.invoices.insert(invoice.id.0, invoice.clone());
        Ok(())
    }

    fn contract(&self, id: ContractId) -> Result<Option<Contract>, RepositoryError> {
        let inner = self.inner.lock().expect("facility mutex poisoned");
        Ok(inner.contracts.get(&id.0).cloned())
    }

    fn contracts_ending_before(
        &self,
        cutoff: NaiveDate,
        building_id: Option<BuildingId>,
    ) -> Result<Vec<Contract>, RepositoryError> {
        let inner = self.inner.lock().expect("facility mutex poisoned");
        let mut contracts: Vec<Contract> = inner
            .contracts
            .values()
            .filter(|contract| {
                contract.status == ContractStatus::Active && contract.end_date < cutoff
            })
            .filter(|contract| match building_id {
                None => true,
                Some(wanted) => Self::building_of_contract(&inner, contract)
                    .map(|building| building == wanted)
                    .unwrap_or(false),
            })
            .cloned()
            .collect();
        contracts.sort_by_key(|contract| contract.id);
        Ok(contracts)
    }

    fn apply_contract_change(
        &self,
        contract: &Contract,
        apartment: Option<(ApartmentId, ApartmentStatus)>,
        history: ContractHistory,
    ) -> Result<(), RepositoryError> {
        // Single lock scope stands in for the transactional boundary.
        let mut inner = self.inner.lock().expect("facility mutex poisoned");
        if inner.fail_contract_change {
            inner.fail_contract_change = false;
            return Err(RepositoryError::Unavailable("database offline".to_string()));
        }
        if !inner.contracts.contains_key(&contract.id.0) {
            return Err(RepositoryError::NotFound);
        }
        if let Some((apartment_id, _)) = apartment {
            if !inner.apartments.contains_key(&apartment_id.0) {
                return Err(RepositoryError::NotFound);
            }
        }
        inner.contracts.insert(contract.id.0, contract.clone());
        if let Some((apartment_id, status)) = apartment {
            if let Some(stored) = inner.apartments.get_mut(&apartment_id.0) {
                stored.status = status;
            }
        }
        inner.history.push(history);
        Ok(())
    }

    fn household_members(
        &self,
        contract_id: ContractId,
    ) -> Result<Vec<HouseholdMember>, RepositoryError> {
        let inner = self.inner.lock().expect("facility mutex poisoned");
        Ok(inner.households.get(&contract_id.0).cloned().unwrap_or_default())
    }

    fn delete_building(&self, id: BuildingId) -> Result<(), RepositoryError> {
        let mut inner = self.inner.lock().expect("facility mutex poisoned");
        if inner.buildings.remove(&id.0).is_none() {
            return Err(RepositoryError::NotFound);
        }
        let floor_ids: Vec<i64> = inner
            .floors
            .values()
            .filter(|floor| floor.building_id == id)
            .map(|floor| floor.id.0)
            .collect();
        inner
            .apartments
            .retain(|_, apartment| !floor_ids.contains(&apartment.floor_id.0));
        inner.floors.retain(|_, floor| floor.building_id != id);
        Ok(())
    }
}

/// Repository double that fails every call, for persistence-failure paths.
pub(super) struct UnavailableFacility;

impl UnavailableFacility {
    fn offline<T>() -> Result<T, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

impl FacilityRepository for UnavailableFacility {
    fn active_contract_count(&self, _scope: DeletionScope) -> Result<u32, RepositoryError> {
        Self::offline()
    }

    fn floor(&self, _id: FloorId) -> Result<Option<Floor>, RepositoryError> {
        Self::offline()
    }

    fn apartments_by_floor(&self, _floor_id: FloorId) -> Result<Vec<Apartment>, RepositoryError> {
        Self::offline()
    }

    fn apply_floor_cascade(
        &self,
        _floor_id: FloorId,
        _status: FloorStatus,
        _apartments: &[(ApartmentId, ApartmentStatus)],
    ) -> Result<(), RepositoryError> {
        Self::offline()
    }

    fn floor_name_exists(
        &self,
        _building_id: BuildingId,
        _name: &str,
    ) -> Result<bool, RepositoryError> {
        Self::offline()
    }

    fn floor_number_exists(
        &self,
        _building_id: BuildingId,
        _number: i32,
    ) -> Result<bool, RepositoryError> {
        Self::offline()
    }

    fn insert_floor(&self, _floor: NewFloor) -> Result<FloorId, RepositoryError> {
        Self::offline()
    }

    fn count_floors(&self, _building_id: BuildingId) -> Result<u32, RepositoryError> {
        Self::offline()
    }

    fn count_apartments(&self, _building_id: BuildingId) -> Result<u32, RepositoryError> {
        Self::offline()
    }

    fn count_rented(&self, _building_id: BuildingId) -> Result<u32, RepositoryError> {
        Self::offline()
    }

    fn monthly_revenue(
        &self,
        _month: u32,
        _year: i32,
        _building_id: Option<BuildingId>,
    ) -> Result<Decimal, RepositoryError> {
        Self::offline()
    }

    fn invoice(&self, _id: InvoiceId) -> Result<Option<Invoice>, RepositoryError> {
        Self::offline()
    }

    fn invoice_details(&self, _id: InvoiceId) -> Result<Vec<InvoiceDetail>, RepositoryError> {
        Self::offline()
    }

    fn update_invoice(&self, _invoice: &Invoice) -> Result<(), RepositoryError> {
        Self::offline()
    }

    fn contract(&self, _id: ContractId) -> Result<Option<Contract>, RepositoryError> {
        Self::offline()
    }

    fn contracts_ending_before(
        &self,
        _cutoff: NaiveDate,
        _building_id: Option<BuildingId>,
    ) -> Result<Vec<Contract>, RepositoryError> {
        Self::offline()
    }

    fn apply_contract_change(
        &self,
        _contract: &Contract,
        _apartment: Option<(ApartmentId, ApartmentStatus)>,
        _history: ContractHistory,
    ) -> Result<(), RepositoryError> {
        Self::offline()
    }

    fn household_members(
        &self,
        _contract_id: ContractId,
    ) -> Result<Vec<HouseholdMember>, RepositoryError> {
        Self::offline()
    }

    fn delete_building(&self, _id: BuildingId) -> Result<(), RepositoryError> {
        Self::offline()
    }
}

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

/// Building 1 with two floors; floor 10 has one available and one rented
/// apartment (active contract 500), floor 11 one available apartment.
pub(super) fn occupied_building(store: &MemoryFacility) -> (BuildingId, FloorId, FloorId) {
    let building = store.add_building(1, "Riverside Tower");
    let floor_a = store.add_floor(10, building, 1, "Tầng 1", FloorStatus::Active);
    let floor_b = store.add_floor(11, building, 2, "Tầng 2", FloorStatus::Active);
    store.add_apartment(100, floor_a, "101", ApartmentStatus::Available);
    let rented = store.add_apartment(101, floor_a, "102", ApartmentStatus::Rented);
    store.add_apartment(110, floor_b, "201", ApartmentStatus::Available);
    store.add_contract(500, rented, date(2026, 12, 31), ContractStatus::Active);
    (building, floor_a, floor_b)
}

pub(super) async fn read_json_body(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

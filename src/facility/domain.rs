use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuildingId(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FloorId(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApartmentId(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContractId(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvoiceId(pub i64);

/// Operational state of a building.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildingStatus {
    Active,
    Maintenance,
}

impl BuildingStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Maintenance => "Maintenance",
        }
    }
}

/// Operational state of a floor; transitions are guarded by the cascade engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FloorStatus {
    Active,
    Maintenance,
}

impl FloorStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Maintenance => "Maintenance",
        }
    }
}

/// Occupancy state of an apartment.
///
/// `Rented` is driven by the contract lifecycle, `Maintenance` by the floor
/// cascade. `Owned` is a direct-edit classification that no cascade touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApartmentStatus {
    Available,
    Rented,
    Owned,
    Maintenance,
}

impl ApartmentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::Rented => "Rented",
            Self::Owned => "Owned",
            Self::Maintenance => "Maintenance",
        }
    }
}

/// Contract lifecycle state; `Terminated` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractStatus {
    Active,
    Terminated,
}

impl ContractStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Terminated => "Terminated",
        }
    }
}

/// Invoice settlement state; `Paid` is terminal with no in-core reversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Unpaid,
    Paid,
}

impl InvoiceStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Unpaid => "Unpaid",
            Self::Paid => "Paid",
        }
    }
}

/// Mutating contract action captured in the append-only audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractAction {
    Created,
    Renewed,
    Updated,
    Terminated,
    StatusChanged,
}

impl ContractAction {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Created => "Created",
            Self::Renewed => "Renewed",
            Self::Updated => "Updated",
            Self::Terminated => "Terminated",
            Self::StatusChanged => "Status Changed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    pub id: BuildingId,
    pub name: String,
    pub address: String,
    pub status: BuildingStatus,
    pub manager_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Floor {
    pub id: FloorId,
    pub building_id: BuildingId,
    /// Unique within the building, alongside `name`.
    pub floor_number: i32,
    pub name: String,
    pub status: FloorStatus,
}

/// Insert payload for a floor; persistence assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewFloor {
    pub building_id: BuildingId,
    pub floor_number: i32,
    pub name: String,
    pub status: FloorStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Apartment {
    pub id: ApartmentId,
    pub floor_id: FloorId,
    pub room_number: String,
    pub status: ApartmentStatus,
    pub area: Decimal,
    pub bedroom_count: u8,
    pub bathroom_count: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    pub id: ContractId,
    pub apartment_id: ApartmentId,
    pub resident_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: ContractStatus,
    pub contract_number: String,
    pub kind: String,
}

/// Append-only audit row; persistence assigns the id and never edits rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractHistory {
    pub contract_id: ContractId,
    pub action: ContractAction,
    pub old_end_date: Option<NaiveDate>,
    pub new_end_date: Option<NaiveDate>,
    pub reason: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: InvoiceId,
    pub contract_id: ContractId,
    pub month: u32,
    pub year: i32,
    pub total_amount: Decimal,
    pub status: InvoiceStatus,
    pub payment_date: Option<DateTime<Utc>>,
}

/// A single service charge line; `amount` is always derived, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceDetail {
    pub invoice_id: InvoiceId,
    pub service_name: String,
    pub unit_price: Decimal,
    pub quantity: Decimal,
}

/// Informational household listing; no lifecycle coupling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseholdMember {
    pub contract_id: ContractId,
    pub full_name: String,
    pub relationship: String,
    pub active: bool,
}

//! Facility lifecycle and occupancy core.
//!
//! Services validate first, consult the deletion guard where a demotion or
//! removal could strand an active lease, and mutate through the injected
//! [`FacilityRepository`]. Expected business outcomes (blocked, skipped,
//! already paid) are typed values the presentation layer branches on.

pub mod batch;
pub mod buildings;
pub mod cascade;
pub mod contracts;
pub mod domain;
pub mod expiry;
pub mod guard;
pub mod ledger;
pub mod occupancy;
pub mod repository;
pub mod router;


pub use batch::{BatchError, BatchFloorCreator, BatchOutcome, MAX_BATCH_SPAN};
pub use buildings::{BuildingService, DeletionOutcome};
pub use cascade::{CascadeError, CascadeOutcome, StatusCascadeEngine};
pub use contracts::{ContractError, ContractService};
pub use domain::{
    Apartment, ApartmentId, ApartmentStatus, Building, BuildingId, BuildingStatus, Contract,
    ContractAction, ContractHistory, ContractId, ContractStatus, Floor, FloorId, FloorStatus,
    HouseholdMember, Invoice, InvoiceDetail, InvoiceId, InvoiceStatus, NewFloor,
};
pub use expiry::{
    classify, classify_within, flag_contracts, flag_contracts_within, ContractExpiryView,
    ExpiryTier, EXPIRY_WINDOW_DAYS,
};
pub use guard::{DeletionCheck, DeletionGuard, DeletionScope};
pub use ledger::{compute_total, line_amount, InvoiceLedger, LedgerError};
pub use occupancy::{BuildingStats, OccupancyAggregator, OccupancyError};
pub use repository::{FacilityRepository, RepositoryError};
pub use router::{facility_router, FacilityState};

//! Domain services for rental-property operations.
//!
//! The crate keeps Building → Floor → Apartment → Contract → Invoice statuses
//! mutually consistent: deletion guards over active leases, the floor/apartment
//! status cascade, contract-expiry classification, the one-way invoice payment
//! transition, occupancy reporting, and bulk floor creation. Persistence is an
//! injected collaborator ([`facility::FacilityRepository`]); presentation sits
//! behind the axum boundary in [`facility::router`].

pub mod config;
pub mod context;
pub mod facility;

pub use context::OperationContext;

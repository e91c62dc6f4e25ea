use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Router,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;

use super::batch::{BatchError, BatchFloorCreator};
use super::buildings::{BuildingService, DeletionOutcome};
use super::cascade::{CascadeError, CascadeOutcome, StatusCascadeEngine};
use super::contracts::{ContractError, ContractService};
use super::domain::{BuildingId, ContractId, FloorId, FloorStatus, InvoiceId};
use super::ledger::{InvoiceLedger, LedgerError};
use super::occupancy::OccupancyAggregator;
use super::repository::{FacilityRepository, RepositoryError};
use crate::config::FacilityLimits;
use crate::context::OperationContext;

/// Shared handler state bundling every facility service over one repository.
pub struct FacilityState<R> {
    pub cascade: StatusCascadeEngine<R>,
    pub batch: BatchFloorCreator<R>,
    pub ledger: InvoiceLedger<R>,
    pub occupancy: OccupancyAggregator<R>,
    pub contracts: ContractService<R>,
    pub buildings: BuildingService<R>,
}

impl<R> FacilityState<R>
where
    R: FacilityRepository,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self::with_limits(repository, FacilityLimits::default())
    }

    /// State with operator-configured limits, typically taken from
    /// [`crate::config::AppConfig`].
    pub fn with_limits(repository: Arc<R>, limits: FacilityLimits) -> Self {
        Self {
            cascade: StatusCascadeEngine::new(repository.clone()),
            batch: BatchFloorCreator::with_span_limit(
                repository.clone(),
                limits.batch_floor_span,
            ),
            ledger: InvoiceLedger::new(repository.clone()),
            occupancy: OccupancyAggregator::new(repository.clone()),
            contracts: ContractService::with_expiry_window(
                repository.clone(),
                limits.expiry_window_days,
            ),
            buildings: BuildingService::new(repository),
        }
    }
}

/// Router builder exposing the facility services to the presentation layer.
///
/// Confirmation prompts belong to the caller; every destructive endpoint here
/// executes immediately and reports a typed outcome.
pub fn facility_router<R>(state: Arc<FacilityState<R>>) -> Router
where
    R: FacilityRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/floors/:floor_id/status",
            put(floor_status_handler::<R>),
        )
        .route(
            "/api/v1/buildings/:building_id/floors",
            post(batch_floors_handler::<R>),
        )
        .route(
            "/api/v1/invoices/:invoice_id/payment",
            post(invoice_payment_handler::<R>),
        )
        .route(
            "/api/v1/buildings/:building_id/stats",
            get(building_stats_handler::<R>),
        )
        .route(
            "/api/v1/contracts/expiring",
            get(expiring_contracts_handler::<R>),
        )
        .route(
            "/api/v1/contracts/:contract_id/renewal",
            post(contract_renewal_handler::<R>),
        )
        .route(
            "/api/v1/contracts/:contract_id/termination",
            post(contract_termination_handler::<R>),
        )
        .route(
            "/api/v1/buildings/:building_id",
            delete(building_delete_handler::<R>),
        )
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct FloorStatusRequest {
    pub target: FloorStatus,
}

#[derive(Debug, Deserialize)]
pub struct BatchFloorsRequest {
    pub from: i32,
    pub to: i32,
    pub name_prefix: String,
}

#[derive(Debug, Deserialize)]
pub struct RenewalRequest {
    pub new_end_date: NaiveDate,
    pub reason: String,
    pub actor: String,
}

#[derive(Debug, Deserialize)]
pub struct TerminationRequest {
    pub reason: String,
    pub actor: String,
}

#[derive(Debug, Deserialize)]
pub struct ActorRequest {
    pub actor: String,
}

#[derive(Debug, Deserialize)]
pub struct ExpiryQuery {
    pub today: Option<NaiveDate>,
    pub building_id: Option<i64>,
}

fn repository_response(error: &RepositoryError) -> Response {
    let status = match error {
        RepositoryError::NotFound => StatusCode::NOT_FOUND,
        RepositoryError::Conflict => StatusCode::CONFLICT,
        RepositoryError::Unavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, axum::Json(json!({ "error": error.to_string() }))).into_response()
}

pub(crate) async fn floor_status_handler<R>(
    State(state): State<Arc<FacilityState<R>>>,
    Path(floor_id): Path<i64>,
    axum::Json(request): axum::Json<FloorStatusRequest>,
) -> Response
where
    R: FacilityRepository + 'static,
{
    match state
        .cascade
        .set_floor_status(FloorId(floor_id), request.target)
    {
        Ok(outcome @ CascadeOutcome::Applied { .. }) => {
            (StatusCode::OK, axum::Json(outcome)).into_response()
        }
        Ok(CascadeOutcome::Blocked { blocking_contracts }) => {
            let payload = json!({
                "error": "blocked by active contracts",
                "blocking_contracts": blocking_contracts,
            });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(CascadeError::Repository(err)) => repository_response(&err),
    }
}

pub(crate) async fn batch_floors_handler<R>(
    State(state): State<Arc<FacilityState<R>>>,
    Path(building_id): Path<i64>,
    axum::Json(request): axum::Json<BatchFloorsRequest>,
) -> Response
where
    R: FacilityRepository + 'static,
{
    match state.batch.create_range(
        BuildingId(building_id),
        request.from,
        request.to,
        &request.name_prefix,
    ) {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(err @ (BatchError::InvalidRange { .. } | BatchError::RangeTooLarge { .. })) => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn invoice_payment_handler<R>(
    State(state): State<Arc<FacilityState<R>>>,
    Path(invoice_id): Path<i64>,
) -> Response
where
    R: FacilityRepository + 'static,
{
    match state.ledger.mark_paid(InvoiceId(invoice_id), Utc::now()) {
        Ok(invoice) => (StatusCode::OK, axum::Json(invoice)).into_response(),
        Err(LedgerError::AlreadyPaid) => {
            let payload = json!({ "error": "invoice is already paid" });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(LedgerError::Repository(err)) => repository_response(&err),
    }
}

pub(crate) async fn building_stats_handler<R>(
    State(state): State<Arc<FacilityState<R>>>,
    Path(building_id): Path<i64>,
) -> Response
where
    R: FacilityRepository + 'static,
{
    match state.occupancy.stats_for(BuildingId(building_id)) {
        Ok(stats) => (StatusCode::OK, axum::Json(stats)).into_response(),
        Err(err) => repository_response(&err),
    }
}

pub(crate) async fn expiring_contracts_handler<R>(
    State(state): State<Arc<FacilityState<R>>>,
    Query(query): Query<ExpiryQuery>,
) -> Response
where
    R: FacilityRepository + 'static,
{
    let today = query.today.unwrap_or_else(|| Utc::now().date_naive());
    let building_id = query.building_id.map(BuildingId);
    match state.contracts.expiry_alerts(today, building_id) {
        Ok(views) => (StatusCode::OK, axum::Json(views)).into_response(),
        Err(err) => repository_response(&err),
    }
}

pub(crate) async fn contract_renewal_handler<R>(
    State(state): State<Arc<FacilityState<R>>>,
    Path(contract_id): Path<i64>,
    axum::Json(request): axum::Json<RenewalRequest>,
) -> Response
where
    R: FacilityRepository + 'static,
{
    let ctx = OperationContext::new(request.actor);
    match state.contracts.renew(
        ContractId(contract_id),
        request.new_end_date,
        &request.reason,
        &ctx,
        Utc::now(),
    ) {
        Ok(contract) => (StatusCode::OK, axum::Json(contract)).into_response(),
        Err(err @ (ContractError::NotActive | ContractError::EndDateNotExtended { .. })) => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(ContractError::Repository(err)) => repository_response(&err),
    }
}

pub(crate) async fn contract_termination_handler<R>(
    State(state): State<Arc<FacilityState<R>>>,
    Path(contract_id): Path<i64>,
    axum::Json(request): axum::Json<TerminationRequest>,
) -> Response
where
    R: FacilityRepository + 'static,
{
    let ctx = OperationContext::new(request.actor);
    match state
        .contracts
        .terminate(ContractId(contract_id), &request.reason, &ctx, Utc::now())
    {
        Ok(contract) => (StatusCode::OK, axum::Json(contract)).into_response(),
        Err(ContractError::Repository(err)) => repository_response(&err),
        Err(err) => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn building_delete_handler<R>(
    State(state): State<Arc<FacilityState<R>>>,
    Path(building_id): Path<i64>,
    axum::Json(request): axum::Json<ActorRequest>,
) -> Response
where
    R: FacilityRepository + 'static,
{
    let ctx = OperationContext::new(request.actor);
    match state.buildings.delete(BuildingId(building_id), &ctx) {
        Ok(DeletionOutcome::Deleted) => {
            (StatusCode::OK, axum::Json(json!({ "deleted": true }))).into_response()
        }
        Ok(DeletionOutcome::Blocked { blocking_contracts }) => {
            let payload = json!({
                "error": "blocked by active contracts",
                "blocking_contracts": blocking_contracts,
            });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(err) => repository_response(&err),
    }
}

//! HTTP handlers for subscription plan endpoints.
//!
//! The admin edit path is what keeps pricing pages live: after a plan is
//! saved, a `plan_update` broadcast goes out to every connected client from
//! a deferred task.

use std::sync::Arc;

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::adapters::realtime::EventHub;
use crate::domain::billing::SubscriptionPlan;
use crate::domain::foundation::{DomainError, ErrorCode, PlanId};
use crate::ports::PlanReader;

use super::super::{AuthenticatedUser, ErrorResponse};
use super::dto::{CreatePlanRequest, PlanResponse, UpdatePlanRequest};

/// Plan API error that implements IntoResponse.
#[derive(Debug)]
pub enum PlanApiError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl IntoResponse for PlanApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            PlanApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ErrorResponse::bad_request(msg))
            }
            PlanApiError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorResponse::not_found(msg)),
            PlanApiError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorResponse::internal(msg))
            }
        };
        (status, Json(error)).into_response()
    }
}

impl From<DomainError> for PlanApiError {
    fn from(error: DomainError) -> Self {
        match error.code {
            ErrorCode::PlanNotFound => PlanApiError::NotFound(error.message),
            ErrorCode::ValidationFailed | ErrorCode::EmptyField | ErrorCode::InvalidFormat => {
                PlanApiError::BadRequest(error.message)
            }
            _ => PlanApiError::Internal(error.message),
        }
    }
}

/// Shared state for plan handlers.
#[derive(Clone)]
pub struct PlanAppState {
    pub plans: Arc<dyn PlanReader>,
    pub hub: Arc<EventHub>,
}

/// `GET /plans` - list every plan.
pub async fn list_plans(
    State(state): State<PlanAppState>,
) -> Result<Json<Vec<PlanResponse>>, PlanApiError> {
    let plans = state.plans.list_plans().await?;
    Ok(Json(plans.iter().map(PlanResponse::from).collect()))
}

/// `POST /plans` - create a plan and broadcast the refreshed pricing data.
pub async fn create_plan(
    State(state): State<PlanAppState>,
    _admin: AuthenticatedUser,
    Json(request): Json<CreatePlanRequest>,
) -> Result<(StatusCode, Json<PlanResponse>), PlanApiError> {
    let plan = SubscriptionPlan::new(
        request.name,
        request.price_cents,
        request.currency,
        request.billing_interval,
        request.features,
    )
    .map_err(DomainError::from)?;

    state.plans.save_plan(&plan).await?;
    let response = PlanResponse::from(&plan);

    // Refresh every connected pricing viewer with the full list.
    let hub = state.hub.clone();
    let reader = state.plans.clone();
    tokio::spawn(async move {
        match reader.list_plans().await {
            Ok(plans) => hub.pricing_data_updated(plans).await,
            Err(e) => tracing::warn!("skipping pricing broadcast, plan read failed: {}", e),
        }
    });

    Ok((StatusCode::CREATED, Json(response)))
}

/// `PUT /plans/:id` - apply an admin edit and broadcast `plan_update`.
pub async fn update_plan(
    State(state): State<PlanAppState>,
    _admin: AuthenticatedUser,
    Path(id): Path<String>,
    Json(request): Json<UpdatePlanRequest>,
) -> Result<Json<PlanResponse>, PlanApiError> {
    let id: PlanId = id
        .parse()
        .map_err(|_| PlanApiError::BadRequest("Invalid plan ID".to_string()))?;

    let mut plan = state
        .plans
        .get_plan(&id)
        .await?
        .ok_or_else(|| PlanApiError::from(DomainError::plan_not_found(id)))?;

    plan.apply_edit(request.name, request.price_cents, request.active)
        .map_err(DomainError::from)?;
    state.plans.save_plan(&plan).await?;

    let response = PlanResponse::from(&plan);

    let hub = state.hub.clone();
    let edited = plan.clone();
    tokio::spawn(async move {
        hub.plan_updated(edited).await;
    });

    Ok(Json(response))
}

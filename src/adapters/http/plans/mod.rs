//! Subscription plan HTTP module: dto, handlers, and routes.

mod dto;
mod handlers;
mod routes;

pub use dto::{CreatePlanRequest, PlanResponse, UpdatePlanRequest};
pub use handlers::{PlanApiError, PlanAppState};
pub use routes::plan_routes;

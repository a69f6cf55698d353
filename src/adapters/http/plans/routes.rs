//! Axum router configuration for subscription plan endpoints.

use axum::{
    routing::{get, put},
    Router,
};

use super::handlers::{create_plan, list_plans, update_plan, PlanAppState};

/// Create the plan API router.
///
/// # Routes
///
/// - `GET /` - List every plan (public pricing data)
/// - `POST /` - Create a plan (admin)
/// - `PUT /:id` - Edit a plan (admin); broadcasts `plan_update`
pub fn plan_routes() -> Router<PlanAppState> {
    Router::new()
        .route("/", get(list_plans).post(create_plan))
        .route("/:id", put(update_plan))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_router_creates_routes() {
        let _router = plan_routes();
    }
}

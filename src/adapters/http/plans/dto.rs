//! HTTP DTOs for subscription plan endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::billing::{BillingInterval, SubscriptionPlan};

/// Request to create a plan.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePlanRequest {
    pub name: String,
    pub price_cents: i64,
    pub currency: String,
    pub billing_interval: BillingInterval,
    #[serde(default)]
    pub features: Vec<String>,
}

/// Request to edit a plan. Absent fields are left unchanged.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePlanRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price_cents: Option<i64>,
    #[serde(default)]
    pub active: Option<bool>,
}

/// Plan details for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct PlanResponse {
    pub id: String,
    pub name: String,
    pub price_cents: i64,
    pub currency: String,
    pub billing_interval: BillingInterval,
    pub features: Vec<String>,
    pub active: bool,
    pub updated_at: String,
}

impl From<&SubscriptionPlan> for PlanResponse {
    fn from(plan: &SubscriptionPlan) -> Self {
        Self {
            id: plan.id.to_string(),
            name: plan.name.clone(),
            price_cents: plan.price_cents,
            currency: plan.currency.clone(),
            billing_interval: plan.billing_interval,
            features: plan.features.clone(),
            active: plan.active,
            updated_at: plan.updated_at.to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_response_mirrors_entity() {
        let plan = SubscriptionPlan::new(
            "Starter",
            4900,
            "USD",
            BillingInterval::Monthly,
            vec!["10 bookings/month".to_string()],
        )
        .unwrap();

        let response = PlanResponse::from(&plan);
        assert_eq!(response.name, "Starter");
        assert_eq!(response.price_cents, 4900);
        assert!(response.active);
    }

    #[test]
    fn update_request_fields_default_to_none() {
        let request: UpdatePlanRequest = serde_json::from_str("{}").unwrap();
        assert!(request.name.is_none());
        assert!(request.price_cents.is_none());
        assert!(request.active.is_none());
    }
}

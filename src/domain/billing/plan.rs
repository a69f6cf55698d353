//! Subscription plan entity.
//!
//! Plans are what the pricing page renders; the realtime layer reads the full
//! list on demand (`request_pricing_data`) and broadcasts `plan_update` when
//! an admin edits one so every connected viewer refreshes live.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{PlanId, Timestamp, ValidationError};

/// Billing cadence of a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingInterval {
    Monthly,
    Annual,
}

/// A purchasable subscription tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionPlan {
    pub id: PlanId,
    pub name: String,
    pub price_cents: i64,
    pub currency: String,
    pub billing_interval: BillingInterval,
    pub features: Vec<String>,
    pub active: bool,
    pub updated_at: Timestamp,
}

impl SubscriptionPlan {
    /// Creates a new plan, validating name and price.
    pub fn new(
        name: impl Into<String>,
        price_cents: i64,
        currency: impl Into<String>,
        billing_interval: BillingInterval,
        features: Vec<String>,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        if price_cents < 0 {
            return Err(ValidationError::out_of_range(
                "price_cents",
                0,
                i64::MAX,
                price_cents,
            ));
        }
        Ok(Self {
            id: PlanId::new(),
            name,
            price_cents,
            currency: currency.into(),
            billing_interval,
            features,
            active: true,
            updated_at: Timestamp::now(),
        })
    }

    /// Applies an admin edit, bumping `updated_at`.
    pub fn apply_edit(
        &mut self,
        name: Option<String>,
        price_cents: Option<i64>,
        active: Option<bool>,
    ) -> Result<(), ValidationError> {
        if let Some(name) = name {
            if name.trim().is_empty() {
                return Err(ValidationError::empty_field("name"));
            }
            self.name = name;
        }
        if let Some(price) = price_cents {
            if price < 0 {
                return Err(ValidationError::out_of_range(
                    "price_cents",
                    0,
                    i64::MAX,
                    price,
                ));
            }
            self.price_cents = price;
        }
        if let Some(active) = active {
            self.active = active;
        }
        self.updated_at = Timestamp::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn starter_plan() -> SubscriptionPlan {
        SubscriptionPlan::new(
            "Starter",
            4900,
            "USD",
            BillingInterval::Monthly,
            vec!["10 bookings/month".to_string()],
        )
        .unwrap()
    }

    #[test]
    fn new_plan_is_active() {
        assert!(starter_plan().active);
    }

    #[test]
    fn rejects_empty_name() {
        let result = SubscriptionPlan::new("  ", 100, "USD", BillingInterval::Monthly, vec![]);
        assert!(result.is_err());
    }

    #[test]
    fn rejects_negative_price() {
        let result = SubscriptionPlan::new("Pro", -1, "USD", BillingInterval::Annual, vec![]);
        assert!(result.is_err());
    }

    #[test]
    fn apply_edit_updates_fields_and_timestamp() {
        let mut plan = starter_plan();
        let before = plan.updated_at;
        plan.apply_edit(Some("Starter+".to_string()), Some(5900), Some(false))
            .unwrap();
        assert_eq!(plan.name, "Starter+");
        assert_eq!(plan.price_cents, 5900);
        assert!(!plan.active);
        assert!(!plan.updated_at.is_before(&before));
    }

    #[test]
    fn apply_edit_rejects_invalid_price_without_mutating() {
        let mut plan = starter_plan();
        assert!(plan.apply_edit(None, Some(-5), None).is_err());
        assert_eq!(plan.price_cents, 4900);
    }
}

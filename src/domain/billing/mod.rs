//! Billing domain: subscription plans.

mod plan;

pub use plan::{BillingInterval, SubscriptionPlan};

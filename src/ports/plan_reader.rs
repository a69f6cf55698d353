//! PlanReader port - Interface to the subscription plan store.
//!
//! The realtime layer reads the full plan list on demand when a client sends
//! `request_pricing_data`; the admin edit endpoint writes through the same
//! port. Reads must hit the store at call time — pricing responses are never
//! served from a cache, so an admin edit is visible to the very next request.

use async_trait::async_trait;

use crate::domain::billing::SubscriptionPlan;
use crate::domain::foundation::{DomainError, PlanId};

/// Port for subscription plan persistence.
///
/// Implementations back this with the relational store in production; tests
/// use the in-memory adapter.
#[async_trait]
pub trait PlanReader: Send + Sync {
    /// Returns every plan, active or not, read at call time.
    async fn list_plans(&self) -> Result<Vec<SubscriptionPlan>, DomainError>;

    /// Returns a single plan by id.
    ///
    /// Returns `None` if the plan does not exist.
    async fn get_plan(&self, id: &PlanId) -> Result<Option<SubscriptionPlan>, DomainError>;

    /// Inserts or replaces a plan.
    async fn save_plan(&self, plan: &SubscriptionPlan) -> Result<(), DomainError>;
}

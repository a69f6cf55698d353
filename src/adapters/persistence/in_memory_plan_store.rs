//! In-memory subscription plan store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::billing::SubscriptionPlan;
use crate::domain::foundation::{DomainError, PlanId};
use crate::ports::PlanReader;

/// RwLock-backed plan store.
///
/// Reads return a fresh snapshot on every call, matching the contract that
/// pricing responses are never cached.
pub struct InMemoryPlanStore {
    plans: RwLock<HashMap<PlanId, SubscriptionPlan>>,
}

impl InMemoryPlanStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            plans: RwLock::new(HashMap::new()),
        }
    }

    /// Creates a store seeded with the given plans.
    pub fn with_plans(plans: Vec<SubscriptionPlan>) -> Self {
        Self {
            plans: RwLock::new(plans.into_iter().map(|p| (p.id, p)).collect()),
        }
    }
}

impl Default for InMemoryPlanStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PlanReader for InMemoryPlanStore {
    async fn list_plans(&self) -> Result<Vec<SubscriptionPlan>, DomainError> {
        let plans = self.plans.read().await;
        let mut list: Vec<SubscriptionPlan> = plans.values().cloned().collect();
        // Stable order for clients rendering a pricing page.
        list.sort_by(|a, b| a.price_cents.cmp(&b.price_cents).then(a.name.cmp(&b.name)));
        Ok(list)
    }

    async fn get_plan(&self, id: &PlanId) -> Result<Option<SubscriptionPlan>, DomainError> {
        Ok(self.plans.read().await.get(id).cloned())
    }

    async fn save_plan(&self, plan: &SubscriptionPlan) -> Result<(), DomainError> {
        self.plans.write().await.insert(plan.id, plan.clone());
        Ok(())
    }
}

//! In-memory persistence adapters.
//!
//! Back the `PlanReader` and `BookingRepository` ports with process-local
//! maps. Production deployments substitute SQL-backed adapters behind the
//! same ports; these keep the crate runnable and the tests hermetic.

mod in_memory_booking_store;
mod in_memory_plan_store;

pub use in_memory_booking_store::InMemoryBookingStore;
pub use in_memory_plan_store::InMemoryPlanStore;

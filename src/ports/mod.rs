//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `PlanReader` - subscription plan persistence (read at call time)
//! - `BookingRepository` - booking persistence

mod booking_repository;
mod plan_reader;

pub use booking_repository::BookingRepository;
pub use plan_reader::PlanReader;

//! Domain layer: entities and value objects, free of I/O.

pub mod billing;
pub mod booking;
pub mod foundation;

//! Orchestration layer: actor startup, dependency wiring, and shutdown.

pub mod system;
pub mod tracing;

pub use system::BookingSystem;
pub use tracing::setup_tracing;

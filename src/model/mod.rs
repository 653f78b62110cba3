//! Pure data structures for the booking domain.

pub mod booking;

pub use booking::*;

//! Type-safe clients for talking to the store actor.
//!
//! The rest of the application never touches channels or oneshots directly;
//! it goes through [`BookingClient`], which hides the message passing and
//! surfaces plain `Result`s.

pub mod booking_client;

pub use booking_client::BookingClient;

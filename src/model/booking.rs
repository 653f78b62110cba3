//! The Booking record and its creation payload.
//!
//! # Actor Framework
//! [`Booking`] is the single entity managed by the
//! [`BookingStore`](crate::store::BookingStore) actor. It tracks one
//! reservation's payment lifecycle from order placement to confirmation.

use serde::{Deserialize, Serialize};
use std::fmt::Display;
use uuid::Uuid;

/// Type-safe identifier for Bookings, assigned by the store at creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookingId(pub Uuid);

impl BookingId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for BookingId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for BookingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier assigned by the payment gateway at order-creation time.
///
/// This is the sole correlation key between the gateway-side order and our
/// booking record: exactly one [`Booking`] exists per `OrderId`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(pub String);

impl From<&str> for OrderId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Payment lifecycle state of a booking.
///
/// There is no failed/cancelled terminal state: a booking whose order never
/// receives a confirmation simply stays `Created`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Created,
    Paid,
}

/// A reservation and its payment lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: BookingId,
    /// Amount in major currency units (rupees, not paise).
    pub amount: f64,
    pub checkin: String,
    pub checkout: String,
    pub guests: u32,
    pub order_id: OrderId,
    /// Set by the paid transition; absent until then.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<String>,
    pub status: BookingStatus,
}

/// Payload for creating a new booking.
///
/// The order id is not part of the payload: it comes from the gateway and is
/// passed to the store alongside these fields.
#[derive(Debug, Clone)]
pub struct BookingCreate {
    pub amount: f64,
    pub checkin: String,
    pub checkout: String,
    pub guests: u32,
}

impl Booking {
    /// Creates a booking in the initial `Created` state for a gateway order.
    pub fn new(id: BookingId, params: BookingCreate, order_id: OrderId) -> Self {
        Self {
            id,
            amount: params.amount,
            checkin: params.checkin,
            checkout: params.checkout,
            guests: params.guests,
            order_id,
            payment_id: None,
            status: BookingStatus::Created,
        }
    }
}

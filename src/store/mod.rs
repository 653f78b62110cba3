//! # The Booking Store Actor
//!
//! This module owns all booking state. A single [`BookingStore`] task receives
//! requests over an mpsc channel and processes them **sequentially**, so every
//! find-and-update on a booking is atomic without a `Mutex` or a transaction:
//! the actor model gives us read-modify-write granularity per `order_id` for
//! free.
//!
//! ## Key Types
//!
//! - [`BookingStore`]: the actor that owns the records.
//! - [`BookingRequest`]: the message protocol (create, find, mark-paid, list).
//! - [`StoreError`]: store-level failures, mapped to API errors at the client
//!   boundary.

use crate::model::{Booking, BookingCreate, BookingId, OrderId};
use std::collections::HashMap;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

/// Errors that can occur inside the booking store.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum StoreError {
    /// The actor's channel is closed; the system is shutting down.
    #[error("Booking store closed")]
    Closed,

    /// The actor dropped the response channel without answering.
    #[error("Booking store dropped response channel")]
    Dropped,

    /// No booking exists for the given order id.
    #[error("No booking for order: {0}")]
    UnknownOrder(String),

    /// A booking already exists for the given order id.
    #[error("Duplicate booking for order: {0}")]
    DuplicateOrder(String),

    /// The booking is already paid with a different payment id.
    #[error("Booking for order {0} already paid with a different payment id")]
    PaymentConflict(String),
}

/// Type alias for the one-shot response channel used by the store.
pub type Respond<T> = oneshot::Sender<Result<T, StoreError>>;

/// Message protocol for the booking store.
///
/// The variants mirror the booking lifecycle rather than generic CRUD:
/// bookings are only ever created, looked up by their gateway order id,
/// transitioned to paid, or listed. There is deliberately no delete.
#[derive(Debug)]
pub enum BookingRequest {
    Create {
        params: BookingCreate,
        order_id: OrderId,
        respond_to: Respond<Booking>,
    },
    FindByOrder {
        order_id: OrderId,
        respond_to: Respond<Option<Booking>>,
    },
    /// One-way compare-and-swap from `Created` to `Paid`.
    ///
    /// Repeating the transition with the identical payment id is idempotent;
    /// a different payment id on an already-paid booking is a
    /// [`StoreError::PaymentConflict`], never a silent overwrite.
    MarkPaid {
        order_id: OrderId,
        payment_id: String,
        respond_to: Respond<Booking>,
    },
    List {
        respond_to: Respond<Vec<Booking>>,
    },
}

/// The actor that owns every booking record.
///
/// State lives in two maps: the records themselves keyed by [`BookingId`],
/// and a secondary index from [`OrderId`] to booking id, since the gateway
/// order id is the sole correlation key for payment confirmations.
pub struct BookingStore {
    receiver: mpsc::Receiver<BookingRequest>,
    bookings: HashMap<BookingId, Booking>,
    by_order: HashMap<OrderId, BookingId>,
}

impl BookingStore {
    pub fn new(buffer_size: usize) -> (Self, mpsc::Sender<BookingRequest>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let store = Self {
            receiver,
            bookings: HashMap::new(),
            by_order: HashMap::new(),
        };
        (store, sender)
    }

    /// Runs the store's event loop, processing messages until the channel
    /// closes. Dropping every client sender shuts the store down.
    pub async fn run(mut self) {
        info!("Booking store started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                BookingRequest::Create { params, order_id, respond_to } => {
                    debug!(?params, %order_id, "Create");
                    let _ = respond_to.send(self.create(params, order_id));
                }
                BookingRequest::FindByOrder { order_id, respond_to } => {
                    let found = self.find_by_order(&order_id);
                    debug!(%order_id, found = found.is_some(), "FindByOrder");
                    let _ = respond_to.send(Ok(found));
                }
                BookingRequest::MarkPaid { order_id, payment_id, respond_to } => {
                    debug!(%order_id, %payment_id, "MarkPaid");
                    let _ = respond_to.send(self.mark_paid(&order_id, payment_id));
                }
                BookingRequest::List { respond_to } => {
                    let mut all: Vec<Booking> = self.bookings.values().cloned().collect();
                    // HashMap iteration order is arbitrary; listings sort by id.
                    all.sort_by(|a, b| a.id.0.cmp(&b.id.0));
                    debug!(count = all.len(), "List");
                    let _ = respond_to.send(Ok(all));
                }
            }
        }

        info!(size = self.bookings.len(), "Booking store shutdown");
    }

    fn create(&mut self, params: BookingCreate, order_id: OrderId) -> Result<Booking, StoreError> {
        if self.by_order.contains_key(&order_id) {
            warn!(%order_id, "Duplicate order id");
            return Err(StoreError::DuplicateOrder(order_id.to_string()));
        }
        let id = BookingId::new();
        let booking = Booking::new(id, params, order_id.clone());
        self.by_order.insert(order_id.clone(), id);
        self.bookings.insert(id, booking.clone());
        info!(%id, %order_id, size = self.bookings.len(), "Booking created");
        Ok(booking)
    }

    fn find_by_order(&self, order_id: &OrderId) -> Option<Booking> {
        self.by_order
            .get(order_id)
            .and_then(|id| self.bookings.get(id))
            .cloned()
    }

    fn mark_paid(&mut self, order_id: &OrderId, payment_id: String) -> Result<Booking, StoreError> {
        let Some(&id) = self.by_order.get(order_id) else {
            warn!(%order_id, "Not found");
            return Err(StoreError::UnknownOrder(order_id.to_string()));
        };
        let booking = self
            .bookings
            .get_mut(&id)
            .ok_or_else(|| StoreError::UnknownOrder(order_id.to_string()))?;

        match &booking.payment_id {
            // First confirmation wins the transition.
            None => {
                booking.payment_id = Some(payment_id);
                booking.status = crate::model::BookingStatus::Paid;
                info!(%order_id, "Booking paid");
                Ok(booking.clone())
            }
            // Replaying the same confirmation is harmless.
            Some(existing) if *existing == payment_id => Ok(booking.clone()),
            Some(_) => {
                warn!(%order_id, %payment_id, "Conflicting payment id for paid booking");
                Err(StoreError::PaymentConflict(order_id.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::BookingClient;
    use crate::model::BookingStatus;

    fn params() -> BookingCreate {
        BookingCreate {
            amount: 500.0,
            checkin: "2024-06-01".into(),
            checkout: "2024-06-03".into(),
            guests: 2,
        }
    }

    fn spawn_store() -> BookingClient {
        let (store, sender) = BookingStore::new(16);
        tokio::spawn(store.run());
        BookingClient::new(sender)
    }

    #[tokio::test]
    async fn create_then_find_by_order() {
        let client = spawn_store();

        let booking = client.create(params(), "order_1".into()).await.unwrap();
        assert_eq!(booking.status, BookingStatus::Created);
        assert_eq!(booking.payment_id, None);

        let found = client.find_by_order("order_1".into()).await.unwrap();
        assert_eq!(found.unwrap().id, booking.id);

        let missing = client.find_by_order("order_2".into()).await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn duplicate_order_id_is_rejected() {
        let client = spawn_store();

        client.create(params(), "order_1".into()).await.unwrap();
        let err = client.create(params(), "order_1".into()).await.unwrap_err();
        assert_eq!(err, StoreError::DuplicateOrder("order_1".into()));
    }

    #[tokio::test]
    async fn mark_paid_transitions_once() {
        let client = spawn_store();
        client.create(params(), "order_1".into()).await.unwrap();

        let paid = client
            .mark_paid("order_1".into(), "pay_test123".into())
            .await
            .unwrap();
        assert_eq!(paid.status, BookingStatus::Paid);
        assert_eq!(paid.payment_id.as_deref(), Some("pay_test123"));

        // Idempotent replay with the same payment id.
        let replay = client
            .mark_paid("order_1".into(), "pay_test123".into())
            .await
            .unwrap();
        assert_eq!(replay.payment_id.as_deref(), Some("pay_test123"));

        // A different payment id is a conflict, not an overwrite.
        let err = client
            .mark_paid("order_1".into(), "pay_other".into())
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::PaymentConflict("order_1".into()));

        let kept = client.find_by_order("order_1".into()).await.unwrap().unwrap();
        assert_eq!(kept.payment_id.as_deref(), Some("pay_test123"));
    }

    #[tokio::test]
    async fn mark_paid_unknown_order() {
        let client = spawn_store();
        let err = client
            .mark_paid("does-not-exist".into(), "x".into())
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::UnknownOrder("does-not-exist".into()));
    }

    #[tokio::test]
    async fn list_returns_all_bookings() {
        let client = spawn_store();
        client.create(params(), "order_1".into()).await.unwrap();
        client.create(params(), "order_2".into()).await.unwrap();

        let all = client.list().await.unwrap();
        assert_eq!(all.len(), 2);
    }
}

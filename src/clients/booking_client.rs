use crate::model::{Booking, BookingCreate, OrderId};
use crate::store::{BookingRequest, StoreError};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, instrument};

/// Client for interacting with the [`BookingStore`](crate::store::BookingStore)
/// actor.
///
/// Cloning is cheap (it clones an mpsc sender); every handler holds one.
#[derive(Clone)]
pub struct BookingClient {
    sender: mpsc::Sender<BookingRequest>,
}

impl BookingClient {
    pub fn new(sender: mpsc::Sender<BookingRequest>) -> Self {
        Self { sender }
    }

    #[instrument(skip(self, params))]
    pub async fn create(
        &self,
        params: BookingCreate,
        order_id: OrderId,
    ) -> Result<Booking, StoreError> {
        debug!(?params, "create booking");
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(BookingRequest::Create { params, order_id, respond_to })
            .await
            .map_err(|_| StoreError::Closed)?;
        response.await.map_err(|_| StoreError::Dropped)?
    }

    pub async fn find_by_order(&self, order_id: OrderId) -> Result<Option<Booking>, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(BookingRequest::FindByOrder { order_id, respond_to })
            .await
            .map_err(|_| StoreError::Closed)?;
        response.await.map_err(|_| StoreError::Dropped)?
    }

    #[instrument(skip(self))]
    pub async fn mark_paid(
        &self,
        order_id: OrderId,
        payment_id: String,
    ) -> Result<Booking, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(BookingRequest::MarkPaid { order_id, payment_id, respond_to })
            .await
            .map_err(|_| StoreError::Closed)?;
        response.await.map_err(|_| StoreError::Dropped)?
    }

    pub async fn list(&self) -> Result<Vec<Booking>, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(BookingRequest::List { respond_to })
            .await
            .map_err(|_| StoreError::Closed)?;
        response.await.map_err(|_| StoreError::Dropped)?
    }
}

//! HTTP surface of the booking service.
//!
//! Three routes carry the whole payment flow:
//!
//! | Method & path         | Auth    | Purpose                               |
//! |-----------------------|---------|---------------------------------------|
//! | POST /create-order    | session | gateway order + booking in `created`  |
//! | POST /update-booking  | signed  | paid transition for a confirmed order |
//! | GET  /orders          | session | booking list as JSON                  |
//!
//! Everything else falls through to a 404.

pub mod error;
pub mod handlers;

pub use error::ApiError;

use crate::clients::BookingClient;
use crate::gateway::PaymentGateway;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

/// Shared state handed to every handler.
///
/// All members are cheap clones; the real state sits behind the booking
/// client's channel and inside the injected gateway.
#[derive(Clone)]
pub struct AppState {
    pub bookings: BookingClient,
    pub gateway: Arc<dyn PaymentGateway>,
    pub session_token: String,
}

/// Builds the application router around the injected collaborators.
pub fn router(
    bookings: BookingClient,
    gateway: Arc<dyn PaymentGateway>,
    session_token: String,
) -> Router {
    let state = AppState { bookings, gateway, session_token };

    Router::new()
        .route("/create-order", post(handlers::create_order))
        .route("/update-booking", post(handlers::update_booking))
        .route("/orders", get(handlers::list_orders))
        .fallback(handlers::page_not_found)
        .with_state(state)
}

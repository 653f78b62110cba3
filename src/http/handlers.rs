//! Request handlers for the booking API.
//!
//! Handlers stay thin: translate the request, call the injected
//! collaborators (gateway, booking client), translate the result. All
//! booking state lives behind the store actor, so there is no shared
//! mutable state here.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};
use uuid::Uuid;

use super::error::ApiError;
use super::AppState;
use crate::gateway::{OrderRequest, CURRENCY};
use crate::model::{Booking, BookingCreate, OrderId};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponse {
    pub order_id: String,
    pub booking_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookingRequest {
    pub payment_id: Option<String>,
    pub order_id: Option<String>,
    pub signature: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UpdateBookingResponse {
    pub message: String,
    pub booking: Booking,
}

/// The session gate the external auth middleware would normally supply.
///
/// Callers present `Authorization: Bearer <token>`; anything else is turned
/// away before a handler does real work.
fn require_session(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let presented = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    match presented {
        Some(token) if token == state.session_token => Ok(()),
        _ => Err(ApiError::Unauthorized("You must be logged in.".to_string())),
    }
}

/// Pulls the booking fields out of the raw JSON body.
///
/// Validation is deliberately shallow: amount must be a positive number,
/// guests a positive integer, dates merely present. Date ordering and
/// overlap are not checked.
fn parse_create_order(body: &Value) -> Result<BookingCreate, ApiError> {
    let invalid = || ApiError::InvalidRequest("Missing required fields".to_string());

    let amount = body
        .get("amount")
        .and_then(Value::as_f64)
        .filter(|a| a.is_finite() && *a > 0.0)
        .ok_or_else(invalid)?;
    let checkin = body
        .get("checkin")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or_else(invalid)?;
    let checkout = body
        .get("checkout")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or_else(invalid)?;
    let guests = body
        .get("guests")
        .and_then(Value::as_u64)
        .filter(|g| *g > 0)
        .ok_or_else(invalid)?;

    Ok(BookingCreate {
        amount,
        checkin: checkin.to_string(),
        checkout: checkout.to_string(),
        guests: guests as u32,
    })
}

/// POST /create-order
///
/// Creates a gateway-side order for the requested amount, then persists a
/// booking in `created` state. If the gateway call fails no booking record
/// is left behind.
pub async fn create_order(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<CreateOrderResponse>, ApiError> {
    require_session(&state, &headers)?;
    debug!(?body, "create-order request");

    let params = parse_create_order(&body)?;

    // The gateway charges in minor currency units.
    let amount_minor = (params.amount * 100.0).round() as i64;
    let receipt = format!("receipt_{}", Uuid::new_v4().simple());

    let order = state
        .gateway
        .create_order(OrderRequest {
            amount_minor,
            currency: CURRENCY.to_string(),
            receipt,
        })
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "gateway order creation failed");
            ApiError::Gateway("Failed to create payment order".to_string())
        })?;

    let booking = state
        .bookings
        .create(params, OrderId(order.id.clone()))
        .await?;

    info!(order_id = %booking.order_id, booking_id = %booking.id, "order created");

    Ok(Json(CreateOrderResponse {
        order_id: order.id,
        booking_id: booking.id.to_string(),
    }))
}

/// POST /update-booking
///
/// Payment confirmation from the client-side checkout flow. The gateway
/// signature must verify before the store is touched; the paid transition
/// itself is a compare-and-swap inside the store actor.
pub async fn update_booking(
    State(state): State<AppState>,
    Json(body): Json<UpdateBookingRequest>,
) -> Result<Json<UpdateBookingResponse>, ApiError> {
    debug!(?body, "update-booking request");

    let (Some(payment_id), Some(order_id)) = (
        body.payment_id.filter(|p| !p.is_empty()),
        body.order_id.filter(|o| !o.is_empty()),
    ) else {
        return Err(ApiError::InvalidRequest(
            "Invalid data. Payment ID and Order ID are required.".to_string(),
        ));
    };

    let signature = body.signature.unwrap_or_default();
    if !state.gateway.verify_signature(&order_id, &payment_id, &signature) {
        return Err(ApiError::Unauthorized(
            "Payment signature verification failed.".to_string(),
        ));
    }

    let booking = state
        .bookings
        .mark_paid(OrderId(order_id), payment_id)
        .await?;

    info!(order_id = %booking.order_id, booking_id = %booking.id, "booking paid");

    Ok(Json(UpdateBookingResponse {
        message: "Booking updated successfully".to_string(),
        booking,
    }))
}

/// GET /orders
///
/// All bookings as JSON; page rendering lives with the view layer, the data
/// contract is the list itself.
pub async fn list_orders(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Booking>>, ApiError> {
    require_session(&state, &headers)?;
    let bookings = state.bookings.list().await?;
    Ok(Json(bookings))
}

/// Catch-all for unmatched paths.
pub async fn page_not_found() -> ApiError {
    ApiError::NotFound("Page Not Found!".to_string())
}

//! # The Checkout Flow
//!
//! The browser-side payment initiator, modeled as an explicit state machine:
//!
//! ```text
//! Idle -> OrderRequested -> GatewayOpened -> Paid
//!                                        \-> Failed
//! ```
//!
//! One flow instance is one checkout attempt; nothing is persisted, and a
//! fresh attempt starts from `Idle` again.
//!
//! The gateway's payment widget is behind the [`PaymentWidget`] trait so the
//! flow can be driven end-to-end in tests with scripted outcomes. On widget
//! success the flow **must** notify the server (`POST /update-booking`)
//! before it may report `Paid` — the confirmation call is a mandatory edge
//! of the machine, not a best-effort follow-up. On widget failure the flow
//! records the reason and makes no server call.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Merchant metadata shown in the payment widget.
pub const MERCHANT_NAME: &str = "High Heaven";
pub const MERCHANT_DESCRIPTION: &str = "Room Reservation";
pub const THEME_COLOR: &str = "#3399cc";

/// State of one checkout attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckoutState {
    Idle,
    OrderRequested,
    GatewayOpened,
    Paid { payment_id: String },
    Failed { reason: String },
}

/// Configuration handed to the gateway's payment widget.
#[derive(Debug, Clone)]
pub struct CheckoutOptions {
    pub key: String,
    /// Amount in minor currency units.
    pub amount_minor: i64,
    pub currency: String,
    pub order_id: String,
    pub name: String,
    pub description: String,
    pub prefill_email: String,
    pub prefill_contact: String,
    pub theme_color: String,
}

/// Outcome reported by the payment widget.
#[derive(Debug, Clone)]
pub enum WidgetOutcome {
    Success { payment_id: String, signature: String },
    Failed { reason: String },
}

/// The gateway's browser widget, seen from the flow's side.
#[async_trait]
pub trait PaymentWidget: Send + Sync {
    async fn open(&self, options: CheckoutOptions) -> WidgetOutcome;
}

/// Details of the stay being booked, read from the page alongside the price.
#[derive(Debug, Clone)]
pub struct StayDetails {
    pub checkin: String,
    pub checkout: String,
    pub guests: u32,
}

#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The displayed price was not a positive number; no network call made.
    #[error("Invalid price: {0}")]
    InvalidAmount(f64),

    /// Order creation against the server failed.
    #[error("Could not create order: {0}")]
    OrderRequest(String),

    /// The widget reported success but the server confirmation failed.
    #[error("Could not confirm payment: {0}")]
    Confirm(String),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateOrderReply {
    order_id: String,
    #[allow(dead_code)]
    booking_id: String,
}

/// Drives one checkout attempt against the booking service.
pub struct CheckoutFlow {
    http: reqwest::Client,
    base_url: String,
    session_token: String,
    gateway_key: String,
    state: CheckoutState,
}

impl CheckoutFlow {
    pub fn new(base_url: String, session_token: String, gateway_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            session_token,
            gateway_key,
            state: CheckoutState::Idle,
        }
    }

    pub fn state(&self) -> &CheckoutState {
        &self.state
    }

    /// Runs the whole attempt: validate the amount, request an order, open
    /// the widget, and on success confirm with the server.
    pub async fn pay(
        &mut self,
        widget: &dyn PaymentWidget,
        amount: f64,
        stay: StayDetails,
    ) -> Result<&CheckoutState, CheckoutError> {
        if !amount.is_finite() || amount <= 0.0 {
            // Rejected before any network traffic; the attempt stays Idle.
            warn!(amount, "invalid display amount");
            return Err(CheckoutError::InvalidAmount(amount));
        }

        self.state = CheckoutState::OrderRequested;
        let reply = match self.request_order(amount, &stay).await {
            Ok(reply) => reply,
            Err(e) => {
                self.state = CheckoutState::Failed { reason: e.clone() };
                return Err(CheckoutError::OrderRequest(e));
            }
        };
        debug!(order_id = %reply.order_id, "order created, opening widget");

        self.state = CheckoutState::GatewayOpened;
        let options = CheckoutOptions {
            key: self.gateway_key.clone(),
            amount_minor: (amount * 100.0).round() as i64,
            currency: crate::gateway::CURRENCY.to_string(),
            order_id: reply.order_id.clone(),
            name: MERCHANT_NAME.to_string(),
            description: MERCHANT_DESCRIPTION.to_string(),
            prefill_email: "johndoe@example.com".to_string(),
            prefill_contact: "9999999999".to_string(),
            theme_color: THEME_COLOR.to_string(),
        };

        match widget.open(options).await {
            WidgetOutcome::Success { payment_id, signature } => {
                // Mandatory edge: the server must hear about the payment
                // before this attempt counts as paid.
                if let Err(e) = self
                    .notify_server(&reply.order_id, &payment_id, &signature)
                    .await
                {
                    self.state = CheckoutState::Failed { reason: e.clone() };
                    return Err(CheckoutError::Confirm(e));
                }
                info!(order_id = %reply.order_id, %payment_id, "payment confirmed");
                self.state = CheckoutState::Paid { payment_id };
            }
            WidgetOutcome::Failed { reason } => {
                warn!(order_id = %reply.order_id, %reason, "payment failed");
                self.state = CheckoutState::Failed { reason };
            }
        }

        Ok(&self.state)
    }

    async fn request_order(
        &self,
        amount: f64,
        stay: &StayDetails,
    ) -> Result<CreateOrderReply, String> {
        let response = self
            .http
            .post(format!("{}/create-order", self.base_url))
            .bearer_auth(&self.session_token)
            .json(&json!({
                "amount": amount,
                "checkin": stay.checkin,
                "checkout": stay.checkout,
                "guests": stay.guests,
            }))
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !response.status().is_success() {
            return Err(format!("server returned {}", response.status()));
        }
        response.json().await.map_err(|e| e.to_string())
    }

    async fn notify_server(
        &self,
        order_id: &str,
        payment_id: &str,
        signature: &str,
    ) -> Result<(), String> {
        let response = self
            .http
            .post(format!("{}/update-booking", self.base_url))
            .json(&json!({
                "paymentId": payment_id,
                "orderId": order_id,
                "signature": signature,
            }))
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !response.status().is_success() {
            return Err(format!("server returned {}", response.status()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct UnreachableWidget;

    #[async_trait]
    impl PaymentWidget for UnreachableWidget {
        async fn open(&self, _options: CheckoutOptions) -> WidgetOutcome {
            panic!("widget must not open for an invalid amount");
        }
    }

    fn stay() -> StayDetails {
        StayDetails {
            checkin: "2024-06-01".into(),
            checkout: "2024-06-03".into(),
            guests: 2,
        }
    }

    #[tokio::test]
    async fn invalid_amount_fails_locally() {
        // A bogus base url proves no network call happens.
        let mut flow = CheckoutFlow::new(
            "http://127.0.0.1:1".into(),
            "token".into(),
            "rzp_test".into(),
        );

        for amount in [0.0, -10.0, f64::NAN] {
            let err = flow.pay(&UnreachableWidget, amount, stay()).await.unwrap_err();
            assert!(matches!(err, CheckoutError::InvalidAmount(_)));
            assert_eq!(*flow.state(), CheckoutState::Idle);
        }
    }
}

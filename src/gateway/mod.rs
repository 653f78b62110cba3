//! Payment gateway abstraction.
//!
//! The hosted payment service is an external collaborator: we only consume
//! its contract. [`PaymentGateway`] captures the two calls the booking flow
//! needs (order creation, confirmation-signature verification), so handlers
//! depend on the trait and the concrete gateway is injected at startup.
//!
//! - [`razorpay::RazorpayGateway`] is the production implementation.
//! - [`mock::MockGateway`] is a scriptable in-memory stand-in for tests.

pub mod mock;
pub mod razorpay;

pub use mock::MockGateway;
pub use razorpay::RazorpayGateway;

use async_trait::async_trait;

/// Currency the merchant charges in. The gateway's amount field is always in
/// minor units of this currency (paise).
pub const CURRENCY: &str = "INR";

/// Request to create a gateway-side order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRequest {
    /// Amount in minor currency units (paise).
    pub amount_minor: i64,
    pub currency: String,
    /// Merchant-side receipt identifier; unique per request.
    pub receipt: String,
}

/// Gateway-side order as returned by order creation.
#[derive(Debug, Clone)]
pub struct GatewayOrder {
    pub id: String,
}

/// Errors from the payment gateway boundary.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GatewayError {
    /// Transport-level failure (connect, timeout, body decode).
    #[error("Gateway request failed: {0}")]
    Http(String),

    /// The gateway answered with a non-success status.
    #[error("Gateway rejected order creation: status {status}")]
    Rejected { status: u16 },

    /// The gateway answered 2xx but the response carried no order id.
    #[error("Gateway response contained no order id")]
    MissingOrderId,
}

/// Contract consumed from the hosted payment service.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    fn name(&self) -> &'static str;

    /// Public key id, used by the browser-side widget configuration.
    fn key_id(&self) -> &str;

    /// Creates a gateway-side order for the given amount.
    async fn create_order(&self, request: OrderRequest) -> Result<GatewayOrder, GatewayError>;

    /// Verifies the signature the gateway attached to a payment confirmation.
    ///
    /// Confirmations arrive via the browser, so this check is the only thing
    /// standing between an unauthenticated caller and a paid booking. The
    /// scheme is `HMAC-SHA256(order_id + "|" + payment_id, key_secret)`,
    /// hex-encoded.
    fn verify_signature(&self, order_id: &str, payment_id: &str, signature: &str) -> bool;
}

pub(crate) fn payment_signature(secret: &str, order_id: &str, payment_id: &str) -> String {
    use hmac::{Hmac, Mac};
    use sha2::Sha256;

    type HmacSha256 = Hmac<Sha256>;

    let msg = format!("{order_id}|{payment_id}");
    // HMAC accepts keys of any length.
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).expect("hmac key");
    mac.update(msg.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_is_stable_and_tamper_evident() {
        let sig = payment_signature("secret", "order_1", "pay_1");
        assert_eq!(sig, payment_signature("secret", "order_1", "pay_1"));
        assert_ne!(sig, payment_signature("secret", "order_1", "pay_2"));
        assert_ne!(sig, payment_signature("other", "order_1", "pay_1"));
    }
}

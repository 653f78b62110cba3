//! Razorpay implementation of the [`PaymentGateway`] contract.

use super::{payment_signature, GatewayError, GatewayOrder, OrderRequest, PaymentGateway};
use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, warn};

/// Client for Razorpay's hosted order API.
///
/// Constructed once at startup from [`AppConfig`](crate::config::AppConfig)
/// and injected into the handlers; there is no module-level singleton.
pub struct RazorpayGateway {
    base_url: String,
    key_id: String,
    key_secret: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl RazorpayGateway {
    pub fn new(base_url: String, key_id: String, key_secret: String, timeout: Duration) -> Self {
        Self {
            base_url,
            key_id,
            key_secret,
            timeout,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl PaymentGateway for RazorpayGateway {
    fn name(&self) -> &'static str {
        "razorpay"
    }

    fn key_id(&self) -> &str {
        &self.key_id
    }

    async fn create_order(&self, request: OrderRequest) -> Result<GatewayOrder, GatewayError> {
        let url = format!("{}/v1/orders", self.base_url);
        let body = json!({
            "amount": request.amount_minor,
            "currency": request.currency,
            "receipt": request.receipt,
            "payment_capture": 1,
        });

        debug!(url, amount_minor = request.amount_minor, "creating gateway order");

        let response = self
            .client
            .post(url)
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| GatewayError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "gateway rejected order creation");
            return Err(GatewayError::Rejected { status: status.as_u16() });
        }

        let value: serde_json::Value = response
            .json()
            .await
            .map_err(|e| GatewayError::Http(e.to_string()))?;

        value
            .get("id")
            .and_then(|id| id.as_str())
            .filter(|id| !id.is_empty())
            .map(|id| GatewayOrder { id: id.to_string() })
            .ok_or(GatewayError::MissingOrderId)
    }

    fn verify_signature(&self, order_id: &str, payment_id: &str, signature: &str) -> bool {
        payment_signature(&self.key_secret, order_id, payment_id) == signature
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_signature_accepts_own_scheme() {
        let gateway = RazorpayGateway::new(
            "https://api.razorpay.test".into(),
            "rzp_test_key".into(),
            "rzp_test_secret".into(),
            Duration::from_secs(5),
        );

        let sig = payment_signature("rzp_test_secret", "order_9", "pay_9");
        assert!(gateway.verify_signature("order_9", "pay_9", &sig));
        assert!(!gateway.verify_signature("order_9", "pay_9", "forged"));
        assert!(!gateway.verify_signature("order_9", "pay_other", &sig));
    }
}

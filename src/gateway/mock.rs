//! # Mock Gateway & Testing Guide
//!
//! [`MockGateway`] implements the same [`PaymentGateway`] API as the Razorpay
//! client but operates entirely in-memory. Tests script the responses to
//! `create_order` up front and inspect the recorded requests afterwards,
//! which makes gateway failures (timeouts, rejected orders, responses with
//! no order id) trivial to reproduce.
//!
//! Signatures use the same HMAC scheme as production, so a test can mint a
//! valid confirmation with [`MockGateway::sign`] and a forged one by simply
//! making a string up.

use super::{payment_signature, GatewayError, GatewayOrder, OrderRequest, PaymentGateway};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Scriptable in-memory payment gateway.
///
/// With no scripted responses, `create_order` succeeds with sequential order
/// ids (`order_mock_1`, `order_mock_2`, ...).
pub struct MockGateway {
    key_secret: String,
    scripted: Mutex<VecDeque<Result<GatewayOrder, GatewayError>>>,
    calls: Mutex<Vec<OrderRequest>>,
    counter: AtomicU64,
}

impl MockGateway {
    pub fn new() -> Self {
        Self {
            key_secret: "mock_secret".to_string(),
            scripted: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
            counter: AtomicU64::new(1),
        }
    }

    /// Queues a successful order creation with the given id.
    pub fn enqueue_order(&self, id: &str) {
        self.scripted
            .lock()
            .expect("mock lock")
            .push_back(Ok(GatewayOrder { id: id.to_string() }));
    }

    /// Queues a failed order creation.
    pub fn enqueue_failure(&self, error: GatewayError) {
        self.scripted.lock().expect("mock lock").push_back(Err(error));
    }

    /// Every `create_order` request seen so far, in order.
    pub fn calls(&self) -> Vec<OrderRequest> {
        self.calls.lock().expect("mock lock").clone()
    }

    /// Mints a valid confirmation signature for an order/payment pair.
    pub fn sign(&self, order_id: &str, payment_id: &str) -> String {
        payment_signature(&self.key_secret, order_id, payment_id)
    }
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PaymentGateway for MockGateway {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn key_id(&self) -> &str {
        "rzp_test_mock"
    }

    async fn create_order(&self, request: OrderRequest) -> Result<GatewayOrder, GatewayError> {
        self.calls.lock().expect("mock lock").push(request);

        if let Some(scripted) = self.scripted.lock().expect("mock lock").pop_front() {
            return scripted;
        }
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        Ok(GatewayOrder { id: format!("order_mock_{n}") })
    }

    fn verify_signature(&self, order_id: &str, payment_id: &str, signature: &str) -> bool {
        payment_signature(&self.key_secret, order_id, payment_id) == signature
    }
}

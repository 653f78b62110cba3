//! Full-flow tests for the client-side checkout state machine: real server,
//! real store actor, mocked gateway, scripted payment widget.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use stayflow::checkout::{
    CheckoutError, CheckoutFlow, CheckoutOptions, CheckoutState, PaymentWidget, StayDetails,
    WidgetOutcome, MERCHANT_NAME,
};
use stayflow::gateway::MockGateway;
use stayflow::lifecycle::BookingSystem;
use stayflow::model::BookingStatus;
use tokio::net::TcpListener;

const SESSION_TOKEN: &str = "session_test_token";

struct TestApp {
    base_url: String,
    gateway: Arc<MockGateway>,
    system: BookingSystem,
}

async fn spawn_app() -> TestApp {
    let gateway = Arc::new(MockGateway::new());
    let system = BookingSystem::new();
    let app = stayflow::http::router(
        system.bookings.clone(),
        gateway.clone(),
        SESSION_TOKEN.to_string(),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp {
        base_url: format!("http://{addr}"),
        gateway,
        system,
    }
}

/// Widget that completes the payment and signs the confirmation with the
/// mock gateway's secret, like the real widget would.
struct PayingWidget {
    gateway: Arc<MockGateway>,
    payment_id: String,
    seen_options: Mutex<Option<CheckoutOptions>>,
}

#[async_trait]
impl PaymentWidget for PayingWidget {
    async fn open(&self, options: CheckoutOptions) -> WidgetOutcome {
        let signature = self.gateway.sign(&options.order_id, &self.payment_id);
        *self.seen_options.lock().unwrap() = Some(options);
        WidgetOutcome::Success {
            payment_id: self.payment_id.clone(),
            signature,
        }
    }
}

/// Widget whose payment attempt fails.
struct DecliningWidget;

#[async_trait]
impl PaymentWidget for DecliningWidget {
    async fn open(&self, _options: CheckoutOptions) -> WidgetOutcome {
        WidgetOutcome::Failed {
            reason: "Card declined".to_string(),
        }
    }
}

/// Widget that reports success with a signature the gateway never issued.
struct ForgingWidget;

#[async_trait]
impl PaymentWidget for ForgingWidget {
    async fn open(&self, _options: CheckoutOptions) -> WidgetOutcome {
        WidgetOutcome::Success {
            payment_id: "pay_forged".to_string(),
            signature: "not-a-real-signature".to_string(),
        }
    }
}

fn stay() -> StayDetails {
    StayDetails {
        checkin: "2024-06-01".into(),
        checkout: "2024-06-03".into(),
        guests: 2,
    }
}

fn flow_for(app: &TestApp) -> CheckoutFlow {
    CheckoutFlow::new(
        app.base_url.clone(),
        SESSION_TOKEN.to_string(),
        "rzp_test_mock".to_string(),
    )
}

#[tokio::test]
async fn successful_checkout_confirms_the_booking() {
    let app = spawn_app().await;
    app.gateway.enqueue_order("order_flow_1");

    let widget = PayingWidget {
        gateway: app.gateway.clone(),
        payment_id: "pay_flow_1".to_string(),
        seen_options: Mutex::new(None),
    };

    let mut flow = flow_for(&app);
    let state = flow.pay(&widget, 500.0, stay()).await.unwrap();
    assert_eq!(
        *state,
        CheckoutState::Paid { payment_id: "pay_flow_1".to_string() }
    );

    // The widget was configured from the created order.
    let options = widget.seen_options.lock().unwrap().clone().unwrap();
    assert_eq!(options.order_id, "order_flow_1");
    assert_eq!(options.amount_minor, 50_000);
    assert_eq!(options.name, MERCHANT_NAME);

    // The mandatory notify-server edge ran: the booking is paid.
    let booking = app
        .system
        .bookings
        .find_by_order("order_flow_1".into())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(booking.status, BookingStatus::Paid);
    assert_eq!(booking.payment_id.as_deref(), Some("pay_flow_1"));
}

#[tokio::test]
async fn declined_payment_leaves_booking_in_created_state() {
    let app = spawn_app().await;
    app.gateway.enqueue_order("order_flow_2");

    let mut flow = flow_for(&app);
    let state = flow.pay(&DecliningWidget, 500.0, stay()).await.unwrap();
    assert_eq!(
        *state,
        CheckoutState::Failed { reason: "Card declined".to_string() }
    );

    // The abandoned order stays in its initial state forever.
    let booking = app
        .system
        .bookings
        .find_by_order("order_flow_2".into())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(booking.status, BookingStatus::Created);
    assert_eq!(booking.payment_id, None);
}

#[tokio::test]
async fn forged_confirmation_cannot_reach_paid() {
    let app = spawn_app().await;
    app.gateway.enqueue_order("order_flow_3");

    let mut flow = flow_for(&app);
    let err = flow.pay(&ForgingWidget, 500.0, stay()).await.unwrap_err();
    assert!(matches!(err, CheckoutError::Confirm(_)));
    assert!(matches!(flow.state(), CheckoutState::Failed { .. }));

    let booking = app
        .system
        .bookings
        .find_by_order("order_flow_3".into())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(booking.status, BookingStatus::Created);
}

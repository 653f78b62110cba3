//! Process entry point.
//!
//! Owns the lifecycle of every dependency: tracing first, then config, then
//! the gateway client and the store actor, then the HTTP server. Handlers
//! receive everything by injection; nothing here is a global.

use std::sync::Arc;
use std::time::Duration;

use stayflow::config::AppConfig;
use stayflow::gateway::RazorpayGateway;
use stayflow::lifecycle::{setup_tracing, BookingSystem};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_tracing();

    let config = AppConfig::from_env()?;

    let gateway = Arc::new(RazorpayGateway::new(
        config.razorpay_base_url.clone(),
        config.razorpay_key_id.clone(),
        config.razorpay_key_secret.clone(),
        Duration::from_millis(config.gateway_timeout_ms),
    ));

    let system = BookingSystem::new();
    let app = stayflow::http::router(
        system.bookings.clone(),
        gateway,
        config.session_token.clone(),
    );

    let listener = TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %config.bind_addr, "server listening");
    axum::serve(listener, app).await?;

    system.shutdown().await?;
    Ok(())
}

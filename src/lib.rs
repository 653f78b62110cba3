//! # Stayflow
//!
//! > **A lodging booking service with a gateway-backed payment flow.**
//!
//! Users reserve a stay, pay through a hosted payment gateway (Razorpay),
//! and the service reconciles the gateway-side order with its own booking
//! record. The flow has real multi-step state — order created, payment
//! attempted, booking confirmed — and this crate is built around making
//! those transitions explicit and safe.
//!
//! ## Architecture Notes
//!
//! ### 1. One actor owns the bookings
//! All booking state lives inside a single [`store::BookingStore`] task that
//! processes requests sequentially from a channel. No locks, no shared
//! mutable state between requests, and every find-and-update on an order id
//! is atomic because nothing can interleave with it.
//!
//! ### 2. Injected collaborators, no singletons
//! The payment gateway and the store client are constructed by the process
//! entry point and injected into the router. Swapping the real gateway for
//! the [`gateway::MockGateway`] is how the whole flow is tested.
//!
//! ### 3. One-way paid transition
//! `created -> paid` is a compare-and-swap keyed on current status. A replay
//! of the same confirmation is idempotent; a different payment id for an
//! already-paid booking is rejected as a conflict rather than silently
//! overwriting the record.
//!
//! ### 4. Signed confirmations
//! A payment confirmation is only trusted if its gateway signature verifies
//! (`HMAC-SHA256(order_id|payment_id, secret)`). Knowing an order id is not
//! enough to mark a booking paid.
//!
//! ## Module Tour
//!
//! - [`model`] — the Booking record and its lifecycle states.
//! - [`store`] — the booking store actor and its message protocol.
//! - [`clients`] — typed client over the store channel.
//! - [`gateway`] — the payment gateway contract, Razorpay client, and mock.
//! - [`http`] — axum router, handlers, and the API error taxonomy.
//! - [`checkout`] — the client-side payment initiator as a state machine.
//! - [`lifecycle`] — system startup/shutdown and tracing setup.
//! - [`config`] — environment-driven process configuration.
//!
//! ## Running
//!
//! ```bash
//! RAZORPAY_KEY_ID=... RAZORPAY_KEY_SECRET=... SESSION_TOKEN=... \
//!     RUST_LOG=info cargo run
//! ```

pub mod checkout;
pub mod clients;
pub mod config;
pub mod gateway;
pub mod http;
pub mod lifecycle;
pub mod model;
pub mod store;

use crate::clients::BookingClient;
use crate::store::BookingStore;
use tracing::{error, info};

/// The runtime orchestrator for the booking service.
///
/// `BookingSystem` owns actor startup and shutdown. Handlers and tests get a
/// [`BookingClient`]; the store task itself stays private here. The payment
/// gateway is deliberately *not* part of the system: it is constructed by
/// the process entry point and injected into the router, so there is no
/// global client state anywhere.
pub struct BookingSystem {
    /// Client for interacting with the booking store actor.
    pub bookings: BookingClient,

    /// Task handle for the running store (used for graceful shutdown).
    handle: tokio::task::JoinHandle<()>,
}

impl BookingSystem {
    /// Spawns the booking store actor and returns a system holding its
    /// client and task handle.
    pub fn new() -> Self {
        let (store, sender) = BookingStore::new(32);
        let handle = tokio::spawn(store.run());
        Self {
            bookings: BookingClient::new(sender),
            handle,
        }
    }

    /// Gracefully shuts down the system.
    ///
    /// Dropping the client closes the store's channel; the actor drains its
    /// mailbox and exits its loop. An `Err` means the store task panicked.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down system...");
        drop(self.bookings);

        if let Err(e) = self.handle.await {
            error!("Store task failed: {:?}", e);
            return Err(format!("Store task failed: {:?}", e));
        }

        info!("System shutdown complete.");
        Ok(())
    }
}

impl Default for BookingSystem {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BookingCreate;

    #[tokio::test]
    async fn system_starts_and_shuts_down_cleanly() {
        let system = BookingSystem::new();

        let booking = system
            .bookings
            .create(
                BookingCreate {
                    amount: 100.0,
                    checkin: "2024-06-01".into(),
                    checkout: "2024-06-02".into(),
                    guests: 1,
                },
                "order_sys".into(),
            )
            .await
            .unwrap();
        assert_eq!(booking.order_id, "order_sys".into());

        system.shutdown().await.unwrap();
    }
}

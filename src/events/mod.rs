//! In-process domain events.
//!
//! Services emit an [`Event`] after each committed mutation; a background
//! consumer logs them. Delivery is fire-and-forget: there is no retry and
//! no outbox, matching the single-request/response model of the domain.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    // Production pointing events
    PointingCreated(Uuid),
    PointingClosed(Uuid),
    PointingVoided(Uuid),

    // Reservation events
    ReservationOpened {
        reservation_id: Uuid,
        production_pointing_id: Uuid,
        reserved_kg: Decimal,
    },
    ReservationConsumed {
        reservation_id: Uuid,
        quantity_kg: Decimal,
        consumed_total_kg: Decimal,
    },
    ReservationClosed(Uuid),
    ReservationCanceled(Uuid),

    // Movement ledger events
    MovementRecorded {
        movement_id: Uuid,
        direction: String,
        quantity: Decimal,
    },

    // Production yield events
    BlockProductionRecorded(Uuid),
    MoldedProductionRecorded(Uuid),

    // Machine events
    MachineDowntimeLogged {
        machine_id: Uuid,
        downtime_id: Uuid,
    },

    // Admin events
    OrderCreated(Uuid),
    OrderStatusChanged {
        order_id: Uuid,
        old_status: String,
        new_status: String,
    },
    OrderDeleted(Uuid),
    ClientCreated(Uuid),
    ProductCreated(Uuid),
    UserDeactivated(Uuid),
    LeadCreated(Uuid),
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

/// Creates a connected sender/receiver pair with a bounded buffer.
pub fn channel(buffer: usize) -> (EventSender, mpsc::Receiver<Event>) {
    let (tx, rx) = mpsc::channel(buffer);
    (EventSender::new(tx), rx)
}

/// Background consumer draining the event channel.
///
/// Events are observability signals only; processing never feeds back into
/// request handling.
pub async fn process_events(mut receiver: mpsc::Receiver<Event>) {
    while let Some(event) = receiver.recv().await {
        match serde_json::to_string(&event) {
            Ok(payload) => info!(event = %payload, "domain event"),
            Err(e) => warn!(error = %e, "failed to serialize domain event"),
        }
    }
    info!("event channel closed; consumer exiting");
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn events_round_trip_through_channel() {
        let (sender, mut rx) = channel(8);
        sender
            .send(Event::ReservationConsumed {
                reservation_id: Uuid::new_v4(),
                quantity_kg: dec!(12.5),
                consumed_total_kg: dec!(40.0),
            })
            .await
            .unwrap();

        match rx.recv().await {
            Some(Event::ReservationConsumed { quantity_kg, .. }) => {
                assert_eq!(quantity_kg, dec!(12.5));
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn send_fails_after_receiver_drop() {
        let (sender, rx) = channel(1);
        drop(rx);
        assert!(sender.send(Event::PointingCreated(Uuid::new_v4())).await.is_err());
    }
}

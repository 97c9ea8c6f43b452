// src/services/events.rs

use chrono::Utc;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::models::events::{ChangeAction, ChangeEvent};

const CHANNEL_CAPACITY: usize = 256;

// Feed de alterações em memória. Quem assina recebe apenas o que chegar depois.
#[derive(Clone)]
pub struct EventHub {
    update_tx: broadcast::Sender<ChangeEvent>,
}

impl Default for EventHub {
    fn default() -> Self {
        Self::new()
    }
}

impl EventHub {
    pub fn new() -> Self {
        let (update_tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { update_tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.update_tx.subscribe()
    }

    pub fn publish(
        &self,
        collection: &'static str,
        record_id: Uuid,
        hotel_ids: &[Uuid],
        action: ChangeAction,
    ) {
        let event = ChangeEvent {
            collection,
            record_id,
            hotel_ids: hotel_ids.to_vec(),
            action,
            at: Utc::now(),
        };
        // Sem assinantes o send falha, e tudo bem
        let _ = self.update_tx.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_published_events() {
        let hub = EventHub::new();
        let mut rx = hub.subscribe();
        let id = Uuid::new_v4();

        hub.publish("incidents", id, &[], ChangeAction::Created);

        let event = rx.recv().await.unwrap();
        assert_eq!(event.record_id, id);
        assert_eq!(event.collection, "incidents");
        assert_eq!(event.action, ChangeAction::Created);
    }

    #[test]
    fn publishing_without_subscribers_is_harmless() {
        EventHub::new().publish("hotels", Uuid::new_v4(), &[], ChangeAction::Deleted);
    }
}

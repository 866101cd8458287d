//! # Real-time Notifier
//!
//! Fans out committed slot changes to every connected push subscriber.
//! Delivery is best-effort and at-most-once: publishing never blocks the
//! mutation path, and a subscriber that falls more than the channel capacity
//! behind skips the events it missed. Clients recover by re-fetching.

use slotbook_core::models::slot::{Slot, SlotEvent};
use tokio::sync::broadcast;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct Notifier {
    sender: broadcast::Sender<SlotEvent>,
}

impl Notifier {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Broadcasts a `slotUpdated` event and returns how many subscribers received it.
    pub fn publish(&self, slot: Slot) -> usize {
        let slot_id = slot.id;
        // An error only means nobody is listening right now.
        let delivered = self.sender.send(SlotEvent::SlotUpdated(slot)).unwrap_or(0);
        debug!(slot_id, delivered, "Published slotUpdated");
        delivered
    }

    pub fn publish_all(&self, slots: impl IntoIterator<Item = Slot>) {
        for slot in slots {
            self.publish(slot);
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SlotEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(256)
    }
}

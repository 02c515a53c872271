// SPDX-License-Identifier: MPL-2.0
//! Notifications published by the photo capture controller.

use super::CroppedArtifact;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Something the capture controller wants its observers to know.
#[derive(Debug, Clone)]
pub enum CaptureEvent {
    /// A new image was decoded and the crop surface is ready.
    Loaded { width: u32, height: u32 },
    /// The crop was applied; the artifact is ready for submission.
    Cropped(Arc<CroppedArtifact>),
    /// The image and any artifact were discarded.
    Cleared,
    /// The selected file could not be processed.
    Error { message: String },
}

/// Fan-out of [`CaptureEvent`]s to any number of subscribers.
///
/// Receivers that were dropped are pruned on the next publish.
#[derive(Debug, Default)]
pub struct EventBus {
    subscribers: Vec<mpsc::UnboundedSender<CaptureEvent>>,
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new subscriber.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<CaptureEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    /// Delivers `event` to every live subscriber.
    pub fn publish(&mut self, event: CaptureEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    /// Number of live subscribers as of the last publish.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publish_reaches_every_subscriber() {
        let mut bus = EventBus::new();
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();

        bus.publish(CaptureEvent::Cleared);

        assert!(matches!(first.try_recv(), Ok(CaptureEvent::Cleared)));
        assert!(matches!(second.try_recv(), Ok(CaptureEvent::Cleared)));
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let mut bus = EventBus::new();
        let kept = bus.subscribe();
        drop(bus.subscribe());
        assert_eq!(bus.subscriber_count(), 2);

        bus.publish(CaptureEvent::Cleared);
        assert_eq!(bus.subscriber_count(), 1);
        drop(kept);
    }
}

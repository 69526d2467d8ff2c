//! Change events and the per-watch delivery stream

use bluekit_api::BluezObject;
use bluekit_bus::ObjectPath;
use tokio::sync::mpsc;

/// One registry update, fanned out to matching subscribers.
///
/// Fire-and-forget: events are not persisted, and `object` is the snapshot
/// installed by the update that produced the event.
#[derive(Clone, Debug)]
pub struct ChangeEvent {
    /// Path of the object the signal concerned
    pub path: ObjectPath,
    /// The freshly installed snapshot
    pub object: BluezObject,
    /// Raw name of the signal that triggered the update
    pub signal: String,
}

/// Receiver half of one subscription's bounded delivery queue
///
/// The stream ends (`recv` returns `None`) when the watch is unsubscribed
/// or the client shuts down.
pub struct WatchStream {
    rx: mpsc::Receiver<ChangeEvent>,
}

impl WatchStream {
    pub(crate) fn new(rx: mpsc::Receiver<ChangeEvent>) -> Self {
        Self { rx }
    }

    /// Wait for the next change event
    pub async fn recv(&mut self) -> Option<ChangeEvent> {
        self.rx.recv().await
    }

    /// Non-blocking poll for a pending event
    pub fn try_recv(&mut self) -> Option<ChangeEvent> {
        self.rx.try_recv().ok()
    }
}

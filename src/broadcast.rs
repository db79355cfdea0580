//! Fan-out of [`ServerEvent`]s to connected viewers
mod registry;

pub use self::registry::*;

use crate::event::{ServerEvent, ViewerIdRef};
use parking_lot::{Mutex, MutexGuard};
use std::sync::Arc;

pub trait EventBroadcaster {
    /// Deliver `event` once to every viewer connected right now
    fn broadcast(&self, event: ServerEvent);

    /// Deliver `event` to a single viewer, if still connected
    fn notify(&self, viewer: ViewerIdRef, event: ServerEvent);
}

pub type SharedBroadcaster = Arc<dyn EventBroadcaster + Send + Sync + 'static>;

/// Held from a store change until its broadcast is queued
///
/// Every path that commits a change viewers must see (accepted bids,
/// round resets) goes through the same gate, so viewers receive those
/// events in commit order. Broadcasting only enqueues, so the gate is
/// never held across I/O.
#[derive(Clone, Default)]
pub struct PublishGate(Arc<Mutex<()>>);

impl PublishGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lock(&self) -> MutexGuard<'_, ()> {
        self.0.lock()
    }
}

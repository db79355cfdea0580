use super::*;
use crate::event::{ViewerId, Welcome};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use tokio::sync::mpsc;
use tracing::debug;

pub type ViewerReceiver = mpsc::UnboundedReceiver<ServerEvent>;

/// Registry of connected viewers, each reachable through its own queue
///
/// Per-viewer delivery order is the publish order. A viewer whose queue
/// is gone (connection task finished) is dropped on the next send.
#[derive(Default)]
pub struct ViewerRegistry {
    viewers: Mutex<BTreeMap<ViewerId, mpsc::UnboundedSender<ServerEvent>>>,
}

impl ViewerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Add a viewer; its queue starts with a `CONNECTED` event
    pub fn register(&self) -> (ViewerId, ViewerReceiver) {
        let id = uuid::Uuid::new_v4().to_string();
        let (tx, rx) = mpsc::unbounded_channel();
        // queued before the viewer becomes visible to broadcasts
        let _ = tx.send(ServerEvent::Connected(Welcome {
            viewer_id: id.clone(),
        }));
        self.viewers.lock().insert(id.clone(), tx);
        debug!(viewer = %id, "viewer registered");
        (id, rx)
    }

    pub fn unregister(&self, viewer: ViewerIdRef) {
        if self.viewers.lock().remove(viewer).is_some() {
            debug!(viewer, "viewer unregistered");
        }
    }

    pub fn len(&self) -> usize {
        self.viewers.lock().len()
    }
}

impl EventBroadcaster for ViewerRegistry {
    fn broadcast(&self, event: ServerEvent) {
        let mut viewers = self.viewers.lock();
        viewers.retain(|id, tx| {
            let delivered = tx.send(event.clone()).is_ok();
            if !delivered {
                debug!(viewer = %id, "dropping disconnected viewer");
            }
            delivered
        });
    }

    fn notify(&self, viewer: ViewerIdRef, event: ServerEvent) {
        let mut viewers = self.viewers.lock();
        let Some(tx) = viewers.get(viewer) else {
            debug!(viewer, "notification for unknown viewer dropped");
            return;
        };
        if tx.send(event).is_err() {
            viewers.remove(viewer);
        }
    }
}

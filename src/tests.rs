mod time_sync;

use crate::{
    auction::{ItemTemplate, Millis},
    broadcast::{PublishGate, ViewerReceiver, ViewerRegistry},
    clock::Clock,
    event::{ServerEvent, ViewerId},
    service::BidHandler,
    store::{InMemoryAuctionStore, SharedAuctionStore},
};
use anyhow::{bail, Result};
use std::{
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

pub const T0: Millis = 1_700_000_000_000;
pub const ROUND: Duration = Duration::from_secs(300);

/// Clock that only moves when told to, and can be made to fail
#[derive(Default)]
pub struct ManualClock {
    now: AtomicU64,
    broken: AtomicBool,
}

impl ManualClock {
    pub fn new_shared(now: Millis) -> Arc<Self> {
        Arc::new(Self {
            now: AtomicU64::new(now),
            broken: AtomicBool::new(false),
        })
    }

    pub fn advance(&self, by: Duration) {
        self.now
            .fetch_add(u64::try_from(by.as_millis()).expect("small"), Ordering::SeqCst);
    }

    pub fn set(&self, now: Millis) {
        self.now.store(now, Ordering::SeqCst);
    }

    pub fn set_broken(&self, broken: bool) {
        self.broken.store(broken, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Result<Millis> {
        if self.broken.load(Ordering::SeqCst) {
            bail!("clock is broken");
        }
        Ok(self.now.load(Ordering::SeqCst))
    }
}

pub fn templates() -> Vec<ItemTemplate> {
    vec![
        ItemTemplate {
            id: "1".to_owned(),
            title: "MacBook Pro".to_owned(),
            opening_bid: 50000,
        },
        ItemTemplate {
            id: "2".to_owned(),
            title: "iPhone 15".to_owned(),
            opening_bid: 30000,
        },
    ]
}

/// A store with an open round at `T0`, plus a registry and handler on top
pub struct Fixture {
    pub clock: Arc<ManualClock>,
    pub store: SharedAuctionStore,
    pub registry: Arc<ViewerRegistry>,
    pub gate: PublishGate,
    pub handler: BidHandler,
}

impl Fixture {
    pub fn new() -> Result<Self> {
        let clock = ManualClock::new_shared(T0);
        let store = InMemoryAuctionStore::new_shared(clock.clone());
        store.reset_all(&templates(), ROUND)?;
        let registry = ViewerRegistry::new_shared();
        let gate = PublishGate::new();
        let handler = BidHandler::new(store.clone(), registry.clone(), gate.clone());
        Ok(Self {
            clock,
            store,
            registry,
            gate,
            handler,
        })
    }

    /// Register a viewer, consuming its `CONNECTED` greeting
    pub fn connect(&self) -> (ViewerId, ViewerReceiver) {
        let (id, mut rx) = self.registry.register();
        assert_eq!(drain(&mut rx).len(), 1);
        (id, rx)
    }
}

/// Everything queued for a viewer so far
pub fn drain(rx: &mut ViewerReceiver) -> Vec<ServerEvent> {
    let mut events = vec![];
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

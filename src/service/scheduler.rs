//! Round resets on a fixed cadence
use super::LoopService;
use crate::{
    auction::{AuctionItem, ItemTemplate},
    broadcast::{PublishGate, SharedBroadcaster},
    event::ServerEvent,
    store::SharedAuctionStore,
};
use anyhow::Result;
use std::time::{Duration, Instant};
use tracing::{error, info};

// upper bound on a single sleep, keeps shutdown responsive
const POLL_SLICE: Duration = Duration::from_millis(100);

pub struct RoundScheduler {
    store: SharedAuctionStore,
    broadcaster: SharedBroadcaster,
    gate: PublishGate,
    templates: Vec<ItemTemplate>,
    round_duration: Duration,
    interval: Duration,
    next_tick: Instant,
}

impl RoundScheduler {
    /// First tick fires `interval` from now; the opening round is
    /// expected to be created at startup.
    pub fn new(
        store: SharedAuctionStore,
        broadcaster: SharedBroadcaster,
        gate: PublishGate,
        templates: Vec<ItemTemplate>,
        round_duration: Duration,
        interval: Duration,
    ) -> Self {
        Self {
            store,
            broadcaster,
            gate,
            templates,
            round_duration,
            interval,
            next_tick: Instant::now() + interval,
        }
    }

    /// Reset every item and tell all viewers to start over
    pub fn tick(&self) -> Result<Vec<AuctionItem>> {
        let items = {
            let _publishing = self.gate.lock();
            let items = self.store.reset_all(&self.templates, self.round_duration)?;
            self.broadcaster
                .broadcast(ServerEvent::ItemsReset(items.clone()));
            items
        };
        info!(
            round = self.store.round(),
            items = items.len(),
            "auctions reset"
        );
        Ok(items)
    }
}

impl LoopService for RoundScheduler {
    fn name(&self) -> &'static str {
        "round-scheduler"
    }

    fn run_iteration(&mut self) -> Result<()> {
        let now = Instant::now();
        if now < self.next_tick {
            std::thread::sleep(POLL_SLICE.min(self.next_tick - now));
            return Ok(());
        }

        // no catching up on missed ticks
        self.next_tick = now + self.interval;

        if let Err(e) = self.tick() {
            error!(error = %e, "round reset failed, retrying next tick");
        }
        Ok(())
    }
}

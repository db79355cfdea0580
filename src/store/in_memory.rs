use super::*;
use crate::{
    auction::{ensure_valid_bid, ItemId},
    clock::SharedClock,
};
use anyhow::format_err;
use parking_lot::Mutex;
use std::collections::BTreeMap;

#[derive(Default)]
struct Round {
    number: u64,
    items: Vec<AuctionItem>,
    index: BTreeMap<ItemId, usize>,
}

impl Round {
    fn get_mut(&mut self, item_id: ItemIdRef) -> Option<&mut AuctionItem> {
        let i = *self.index.get(item_id)?;
        self.items.get_mut(i)
    }
}

/// Store keeping the current round in memory behind one mutex
pub struct InMemoryAuctionStore {
    round: Mutex<Round>,
    clock: SharedClock,
}

impl InMemoryAuctionStore {
    /// An empty store; call [`AuctionStore::reset_all`] to open the first round
    pub fn new(clock: SharedClock) -> Self {
        Self {
            round: Mutex::new(Round::default()),
            clock,
        }
    }

    pub fn new_shared(clock: SharedClock) -> SharedAuctionStore {
        Arc::new(Self::new(clock))
    }
}

impl AuctionStore for InMemoryAuctionStore {
    fn snapshot(&self) -> Vec<AuctionItem> {
        self.round.lock().items.clone()
    }

    fn apply_bid(
        &self,
        item_id: ItemIdRef,
        amount: Amount,
        bidder: BidderIdRef,
    ) -> Result<BidOutcome> {
        let mut round = self.round.lock();

        let Some(item) = round.get_mut(item_id) else {
            return Ok(BidOutcome::ItemNotFound);
        };

        let now = self.clock.now()?;
        if let Err(rejection) = ensure_valid_bid(item, amount, now) {
            return Ok(BidOutcome::Rejected(rejection));
        }

        item.accept_bid(amount, bidder);
        Ok(BidOutcome::Accepted(item.clone()))
    }

    fn reset_all(
        &self,
        templates: &[ItemTemplate],
        round_duration: Duration,
    ) -> Result<Vec<AuctionItem>> {
        let mut round = self.round.lock();

        let now = self.clock.now()?;
        let end_time = now
            .checked_add(u64::try_from(round_duration.as_millis())?)
            .ok_or_else(|| format_err!("round end time overflows"))?;

        let mut fresh = Round {
            number: round.number + 1,
            ..Default::default()
        };
        for template in templates {
            if fresh
                .index
                .insert(template.id.clone(), fresh.items.len())
                .is_some()
            {
                return Err(format_err!("duplicate item id: {}", template.id));
            }
            fresh.items.push(AuctionItem::open(template, end_time));
        }

        *round = fresh;
        Ok(round.items.clone())
    }

    fn round(&self) -> u64 {
        self.round.lock().number
    }
}

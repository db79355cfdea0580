//! Auction state store
//!
//! The store is the only owner of the live [`AuctionItem`]s. Bids and
//! round resets are mutually exclusive: implementations serialize
//! them through a single critical section covering every item, so a
//! bid always validates against the same state it mutates.
//!
//! Nothing in here notifies viewers. Callers forward whatever the
//! store returns to the broadcaster themselves.
mod in_memory;

pub use self::in_memory::*;

use crate::auction::{AuctionItem, Amount, BidRejection, BidderIdRef, ItemIdRef, ItemTemplate};
use anyhow::Result;
use std::{sync::Arc, time::Duration};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BidOutcome {
    /// Bid became the new highest bid; carries the item after the change
    Accepted(AuctionItem),
    Rejected(BidRejection),
    ItemNotFound,
}

pub trait AuctionStore {
    /// Point-in-time copy of every item, in catalog order
    fn snapshot(&self) -> Vec<AuctionItem>;

    /// Validate and apply a bid in one step
    ///
    /// `Err` is reserved for unexpected failures, in which case no item
    /// was modified.
    fn apply_bid(
        &self,
        item_id: ItemIdRef,
        amount: Amount,
        bidder: BidderIdRef,
    ) -> Result<BidOutcome>;

    /// Replace every item with a fresh one built from `templates`,
    /// ending `round_duration` from now
    fn reset_all(
        &self,
        templates: &[ItemTemplate],
        round_duration: Duration,
    ) -> Result<Vec<AuctionItem>>;

    /// Number of resets performed so far
    fn round(&self) -> u64;
}

pub type SharedAuctionStore = Arc<dyn AuctionStore + Send + Sync + 'static>;

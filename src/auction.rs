use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type ItemId = String;
pub type ItemIdRef<'s> = &'s str;
pub type BidderId = String;
pub type BidderIdRef<'s> = &'s str;
pub type Amount = u64;
/// Milliseconds since the unix epoch
pub type Millis = u64;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum BidRejection {
    #[error("Auction ended")]
    Ended,
    #[error("Bid is too low")]
    Outbid,
}

/// What a round starts an item with
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemTemplate {
    pub id: ItemId,
    pub title: String,
    pub opening_bid: Amount,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuctionItem {
    pub id: ItemId,
    pub title: String,
    pub current_bid: Amount,
    pub end_time: Millis,
    pub highest_bidder: Option<BidderId>,
}

impl AuctionItem {
    pub fn open(template: &ItemTemplate, end_time: Millis) -> Self {
        Self {
            id: template.id.clone(),
            title: template.title.clone(),
            current_bid: template.opening_bid,
            end_time,
            highest_bidder: None,
        }
    }

    pub fn is_ended(&self, now: Millis) -> bool {
        self.end_time < now
    }

    /// Record a bid that already passed [`ensure_valid_bid`]
    pub fn accept_bid(&mut self, amount: Amount, bidder: BidderIdRef) {
        self.current_bid = amount;
        self.highest_bidder = Some(bidder.to_owned());
    }
}

/// Decide whether `amount` may become the new highest bid on `item` at `now`
///
/// The deadline is checked first: a late bid is `Ended` no matter how
/// high it is.
pub fn ensure_valid_bid(
    item: &AuctionItem,
    amount: Amount,
    now: Millis,
) -> Result<(), BidRejection> {
    use BidRejection::*;

    if item.is_ended(now) {
        return Err(Ended);
    }
    if amount <= item.current_bid {
        return Err(Outbid);
    }
    Ok(())
}

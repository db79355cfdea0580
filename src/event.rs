//! Messages exchanged with viewers
//!
//! Every frame on the viewer connection is a JSON object
//! `{"event": NAME, "data": PAYLOAD}`, `data` being omitted for
//! events without a payload.
use crate::auction::{Amount, AuctionItem, ItemId, Millis};
use serde::{Deserialize, Serialize};

pub type ViewerId = String;
pub type ViewerIdRef<'a> = &'a str;

pub const REASON_ITEM_NOT_FOUND: &str = "Item not found";
pub const REASON_AUCTION_ENDED: &str = "Auction ended";
pub const REASON_UNEXPECTED: &str = "Something went wrong";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ServerEvent {
    /// First frame on every connection, carrying the handle that will
    /// show up as `highestBidder` for this viewer's bids
    #[serde(rename = "CONNECTED")]
    Connected(Welcome),
    #[serde(rename = "UPDATE_BID")]
    ItemUpdated(AuctionItem),
    #[serde(rename = "RESET_ITEMS")]
    ItemsReset(Vec<AuctionItem>),
    #[serde(rename = "OUTBID")]
    OutbidNotice,
    #[serde(rename = "BID_ERROR")]
    BidError(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Welcome {
    pub viewer_id: ViewerId,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ClientEvent {
    #[serde(rename = "BID_PLACED")]
    BidPlaced(BidPlaced),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BidPlaced {
    pub item_id: ItemId,
    pub bid_amount: Amount,
}

/// Response of the one-shot bootstrap retrieval
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bootstrap {
    pub server_time: Millis,
    pub items: Vec<AuctionItem>,
    /// Step used by the quick-bid affordance
    pub bid_increment: Amount,
}

//! Bid request handling
//!
//! Turns a viewer's `BID_PLACED` into a store call and routes the
//! outcome: accepted bids go to everyone, rejections only back to the
//! bidder.
use crate::{
    auction::BidRejection,
    broadcast::{PublishGate, SharedBroadcaster},
    event::{self, BidPlaced, ClientEvent, ServerEvent, ViewerIdRef},
    store::{BidOutcome, SharedAuctionStore},
};
use tracing::{debug, error, info, warn};

#[derive(Clone)]
pub struct BidHandler {
    store: SharedAuctionStore,
    broadcaster: SharedBroadcaster,
    gate: PublishGate,
}

impl BidHandler {
    pub fn new(
        store: SharedAuctionStore,
        broadcaster: SharedBroadcaster,
        gate: PublishGate,
    ) -> Self {
        Self {
            store,
            broadcaster,
            gate,
        }
    }

    /// Handle one raw text frame received from `viewer`
    pub fn handle_message(&self, viewer: ViewerIdRef, text: &str) {
        match serde_json::from_str::<ClientEvent>(text) {
            Ok(ClientEvent::BidPlaced(bid)) => self.handle_bid(viewer, bid),
            Err(e) => {
                warn!(viewer, error = %e, "malformed message");
                self.broadcaster.notify(
                    viewer,
                    ServerEvent::BidError(event::REASON_UNEXPECTED.to_owned()),
                );
            }
        }
    }

    pub fn handle_bid(&self, viewer: ViewerIdRef, bid: BidPlaced) {
        debug!(viewer, item_id = %bid.item_id, amount = bid.bid_amount, "bid received");

        let outcome = {
            let _publishing = self.gate.lock();
            let outcome = self.store.apply_bid(&bid.item_id, bid.bid_amount, viewer);
            if let Ok(BidOutcome::Accepted(item)) = &outcome {
                self.broadcaster
                    .broadcast(ServerEvent::ItemUpdated(item.clone()));
            }
            outcome
        };

        let outcome = match outcome {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(viewer, item_id = %bid.item_id, error = %e, "bid failed");
                self.broadcaster.notify(
                    viewer,
                    ServerEvent::BidError(event::REASON_UNEXPECTED.to_owned()),
                );
                return;
            }
        };

        match outcome {
            BidOutcome::Accepted(item) => {
                info!(
                    item_id = %item.id,
                    title = %item.title,
                    amount = item.current_bid,
                    bidder = viewer,
                    "new highest bid"
                );
            }
            BidOutcome::Rejected(BidRejection::Outbid) => {
                debug!(viewer, item_id = %bid.item_id, "outbid");
                self.broadcaster.notify(viewer, ServerEvent::OutbidNotice);
            }
            BidOutcome::Rejected(BidRejection::Ended) => {
                debug!(viewer, item_id = %bid.item_id, "auction already ended");
                self.broadcaster.notify(
                    viewer,
                    ServerEvent::BidError(event::REASON_AUCTION_ENDED.to_owned()),
                );
            }
            BidOutcome::ItemNotFound => {
                debug!(viewer, item_id = %bid.item_id, "unknown item");
                self.broadcaster.notify(
                    viewer,
                    ServerEvent::BidError(event::REASON_ITEM_NOT_FOUND.to_owned()),
                );
            }
        }
    }
}

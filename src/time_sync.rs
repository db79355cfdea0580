//! Viewer-side countdown arithmetic
//!
//! A viewer's clock is not trusted. On bootstrap it records how far it
//! is from `serverTime` and shifts every later reading by that offset,
//! so all viewers count down to the same `endTime`.
use crate::auction::{Amount, AuctionItem, Millis};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ClockOffset {
    millis: i64,
}

impl ClockOffset {
    /// `offset = serverTime - localNow`
    pub fn from_bootstrap(server_time: Millis, local_now: Millis) -> Self {
        Self {
            millis: signed(server_time).saturating_sub(signed(local_now)),
        }
    }

    pub fn millis(self) -> i64 {
        self.millis
    }

    /// `localNow + offset`, clamped at the epoch
    pub fn effective_now(self, local_now: Millis) -> Millis {
        let now = signed(local_now).saturating_add(self.millis);
        Millis::try_from(now).unwrap_or(0)
    }

    /// Whole seconds left until `end_time`, never negative
    pub fn remaining_secs(self, end_time: Millis, local_now: Millis) -> u64 {
        end_time.saturating_sub(self.effective_now(local_now)) / 1000
    }

    /// The countdown reads zero; quick bids should be disabled
    pub fn is_closed(self, end_time: Millis, local_now: Millis) -> bool {
        self.remaining_secs(end_time, local_now) == 0
    }
}

/// Amount a quick bid proposes for `item`
pub fn quick_bid(item: &AuctionItem, increment: Amount) -> Amount {
    item.current_bid.saturating_add(increment)
}

fn signed(millis: Millis) -> i64 {
    i64::try_from(millis).unwrap_or(i64::MAX)
}

use crate::{
    auction::AuctionItem,
    time_sync::{quick_bid, ClockOffset},
};

#[test]
fn slow_viewer_clock_is_shifted_forward() {
    // viewer is 2.5s behind the server
    let offset = ClockOffset::from_bootstrap(10_000, 7_500);
    assert_eq!(offset.millis(), 2_500);
    assert_eq!(offset.effective_now(8_000), 10_500);
    assert_eq!(offset.remaining_secs(20_000, 8_000), 9);
}

#[test]
fn fast_viewer_clock_is_shifted_back() {
    let offset = ClockOffset::from_bootstrap(10_000, 13_000);
    assert_eq!(offset.millis(), -3_000);
    assert_eq!(offset.effective_now(13_000), 10_000);
    assert_eq!(offset.effective_now(1_000), 0);
}

#[test]
fn countdown_stops_at_zero() {
    let offset = ClockOffset::default();
    assert_eq!(offset.remaining_secs(5_000, 4_001), 0);
    assert!(offset.is_closed(5_000, 4_001));
    assert!(offset.is_closed(5_000, 9_000));
    assert!(!offset.is_closed(5_000, 4_000));
}

#[test]
fn quick_bid_adds_the_increment() {
    let item = AuctionItem {
        id: "1".to_owned(),
        title: "MacBook Pro".to_owned(),
        current_bid: 50000,
        end_time: 0,
        highest_bidder: None,
    };
    assert_eq!(quick_bid(&item, 1000), 51000);
    assert_eq!(quick_bid(&AuctionItem { current_bid: u64::MAX, ..item }, 1000), u64::MAX);
}

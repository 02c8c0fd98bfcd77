use orderbook_core::prelude::*;

fn book() -> MatchingEngine<RingBufferSink, StepClock> {
    MatchingEngine::with_clock(
        InstrumentId(1),
        RingBufferSink::new(1024),
        StepClock::new(1, 1),
        BookConfig::default(),
    )
}

fn limit(id: u64, side: Side, price: i64, qty: u32) -> OrderIdentity {
    OrderIdentity {
        id: OrderId(id),
        owner: "trader".into(),
        instrument: InstrumentId(1),
        side,
        price: Price(price),
        initial_quantity: Quantity(qty),
        time_in_force: TimeInForce::Day,
    }
}

#[test]
fn scenario_1_equal_quantity_cross() {
    let mut b = book();
    b.submit_limit(limit(1, Side::Buy, 51, 20)).unwrap();
    let fills = b.submit_limit(limit(2, Side::Sell, 49, 20)).unwrap();

    assert_eq!(b.count(), 0);
    assert_eq!(b.best_bid_price(), None);
    assert_eq!(b.best_ask_price(), None);
    assert_eq!(b.matched_quantity_total(), 20);
    assert_eq!(fills.len(), 1);
    assert_eq!(fills[0].trade_price, Price(51));
    assert_eq!(fills[0].trade_quantity, Quantity(20));
    assert_eq!(fills[0].aggressor_side, Side::Sell);
}

#[test]
fn scenario_2_aggressive_bid_partial_fill_by_thin_book() {
    let mut b = book();
    b.submit_limit(limit(1, Side::Sell, 49, 15)).unwrap();
    b.submit_limit(limit(2, Side::Buy, 51, 20)).unwrap();

    assert_eq!(b.count(), 1);
    assert_eq!(b.bid_quantities(), vec![(Price(51), 5)]);
    assert!(b.ask_quantities().is_empty());
    assert_eq!(b.matched_quantity_total(), 15);
}

#[test]
fn scenario_3_two_bids_same_level_fifo() {
    let mut b = book();
    b.submit_limit(limit(1, Side::Buy, 45, 3)).unwrap();
    b.submit_limit(limit(2, Side::Buy, 45, 5)).unwrap();
    let fills = b.submit_limit(limit(3, Side::Sell, 45, 4)).unwrap();

    assert_eq!(fills.len(), 2);
    assert_eq!(fills[0].resting_order_id, OrderId(1));
    assert_eq!(fills[0].trade_quantity, Quantity(3));
    assert_eq!(fills[1].resting_order_id, OrderId(2));
    assert_eq!(fills[1].trade_quantity, Quantity(1));
    assert_eq!(b.bid_quantities(), vec![(Price(45), 4)]);
    assert_eq!(b.count(), 1);
}

#[test]
fn scenario_4_cancel_restores_pre_state() {
    let mut b = book();
    b.submit_limit(limit(1, Side::Buy, 50, 20)).unwrap();
    b.cancel(OrderId(1)).unwrap();

    assert_eq!(b.count(), 0);
    assert_eq!(b.best_bid_price(), None);

    let msgs: Vec<_> = b.adapter_mut().sink_mut().drain().collect();
    assert_eq!(msgs.len(), 2);
    let (_, new_body) =
        orderbook_core::wire::decode_price_level_update(msgs[0].clone()).unwrap();
    assert_eq!(new_body.action, 1); // NEW
    let mut delete_hdr = msgs[1].clone();
    let hdr = orderbook_core::wire::MessageHeader::read(&mut delete_hdr).unwrap();
    assert_eq!(hdr.message_type, orderbook_core::wire::MessageType::PriceLevelDelete as u16);
}

#[test]
fn scenario_5_market_order_on_empty_side_is_noop() {
    let mut b = book();
    let fills = b.submit_market(Side::Buy, Quantity(100)).unwrap();

    assert!(fills.is_empty());
    assert_eq!(b.count(), 0);
    assert_eq!(b.matched_quantity_total(), 0);
    assert!(b.adapter_mut().sink_mut().drain().next().is_none());
}

#[test]
fn scenario_6_spread() {
    let mut b = book();
    b.submit_limit(limit(1, Side::Buy, 48, 15)).unwrap();
    b.submit_limit(limit(2, Side::Buy, 47, 10)).unwrap();
    b.submit_limit(limit(3, Side::Sell, 50, 5)).unwrap();
    b.submit_limit(limit(4, Side::Sell, 51, 20)).unwrap();

    assert_eq!(b.spread(), Some(Price(2)));
    assert_eq!(b.count(), 4);
    assert_eq!(b.best_bid_price(), Some(Price(48)));
    assert_eq!(b.best_ask_price(), Some(Price(50)));
}

#[test]
fn snapshot_emits_begin_entries_end_in_order() {
    let mut b = book();
    b.submit_limit(limit(1, Side::Buy, 48, 15)).unwrap();
    b.submit_limit(limit(2, Side::Sell, 50, 5)).unwrap();
    b.snapshot();

    let msgs: Vec<_> = b.adapter_mut().sink_mut().drain().collect();
    // 2 NEW updates from the two submits, then BEGIN, ENTRY, ENTRY, END.
    assert_eq!(msgs.len(), 6);
    let types: Vec<u16> = msgs
        .iter()
        .map(|m| {
            let mut m = m.clone();
            orderbook_core::wire::MessageHeader::read(&mut m).unwrap().message_type
        })
        .collect();
    assert_eq!(
        &types[2..],
        &[
            orderbook_core::wire::MessageType::SnapshotBegin as u16,
            orderbook_core::wire::MessageType::SnapshotEntry as u16,
            orderbook_core::wire::MessageType::SnapshotEntry as u16,
            orderbook_core::wire::MessageType::SnapshotEnd as u16,
        ]
    );
}

#[test]
fn clear_emits_book_clear_and_empties_book() {
    let mut b = book();
    b.submit_limit(limit(1, Side::Buy, 48, 15)).unwrap();
    b.clear(1);

    assert_eq!(b.count(), 0);
    assert_eq!(b.best_bid_price(), None);
    let msgs: Vec<_> = b.adapter_mut().sink_mut().drain().collect();
    let last = msgs.last().unwrap().clone();
    let mut last = last;
    let hdr = orderbook_core::wire::MessageHeader::read(&mut last).unwrap();
    assert_eq!(hdr.message_type, orderbook_core::wire::MessageType::BookClear as u16);
}

#[test]
fn amend_loses_priority_law() {
    let mut b = book();
    b.submit_limit(limit(1, Side::Buy, 45, 5)).unwrap();
    b.submit_limit(limit(2, Side::Buy, 45, 5)).unwrap();
    b.amend(OrderId(1), limit(1, Side::Buy, 45, 5)).unwrap();

    let fills = b.submit_limit(limit(3, Side::Sell, 45, 5)).unwrap();
    assert_eq!(fills[0].resting_order_id, OrderId(2));
}

#[test]
fn market_order_never_rests_law() {
    let mut b = book();
    b.submit_limit(limit(1, Side::Sell, 50, 5)).unwrap();
    b.submit_market(Side::Buy, Quantity(20)).unwrap();

    assert_eq!(b.count(), 0);
    assert!(!b.contains(OrderId(1)));
}

#[test]
fn trade_price_is_always_the_resting_price_law() {
    let mut b = book();
    b.submit_limit(limit(1, Side::Sell, 49, 20)).unwrap();
    let fills = b.submit_limit(limit(2, Side::Buy, 55, 20)).unwrap();
    assert_eq!(fills[0].trade_price, Price(49));
}

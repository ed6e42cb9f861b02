// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Debit card and room public API integration tests.

use guesthouse_ledger_rs::{CardId, DebitCard, LedgerError, Room, RoomId};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;
use std::thread;

// === Helper Functions ===

fn make_card(balance: Decimal) -> DebitCard {
    DebitCard::new(CardId(1), "4111111111111111", balance)
}

fn make_room(price: Decimal) -> Room {
    Room::new(RoomId(1), "101", price)
}

// === Basic Card Tests ===

#[test]
fn new_card_holds_initial_balance() {
    let card = make_card(dec!(500.00));
    assert_eq!(card.balance(), dec!(500.00));
    assert_eq!(card.card_number(), "4111111111111111");
}

#[test]
fn credit_increases_balance() {
    let card = make_card(dec!(100.00));
    let balance = card.credit(dec!(50.00)).unwrap();
    assert_eq!(balance, dec!(150.00));
    assert_eq!(card.balance(), dec!(150.00));
}

#[test]
fn multiple_credits_accumulate() {
    let card = make_card(Decimal::ZERO);
    card.credit(dec!(100.00)).unwrap();
    card.credit(dec!(50.00)).unwrap();
    card.credit(dec!(25.50)).unwrap();
    assert_eq!(card.balance(), dec!(175.50));
}

#[test]
fn debit_decreases_balance() {
    let card = make_card(dec!(100.00));
    let balance = card.debit(dec!(30.00)).unwrap();
    assert_eq!(balance, dec!(70.00));
}

// === Error Cases ===

#[test]
fn credit_zero_returns_invalid_amount() {
    let card = make_card(dec!(100.00));
    assert_eq!(card.credit(Decimal::ZERO), Err(LedgerError::InvalidAmount));
}

#[test]
fn credit_negative_returns_invalid_amount() {
    let card = make_card(dec!(100.00));
    assert_eq!(card.credit(dec!(-10.00)), Err(LedgerError::InvalidAmount));
    assert_eq!(card.balance(), dec!(100.00));
}

#[test]
fn debit_more_than_balance_returns_insufficient_funds() {
    let card = make_card(dec!(50.00));
    let result = card.debit(dec!(100.00));
    assert_eq!(result, Err(LedgerError::InsufficientFunds));
    // Balance unchanged
    assert_eq!(card.balance(), dec!(50.00));
}

#[test]
fn debit_zero_returns_invalid_amount() {
    let card = make_card(dec!(100.00));
    assert_eq!(card.debit(Decimal::ZERO), Err(LedgerError::InvalidAmount));
}

// === Edge Cases ===

#[test]
fn debit_exact_balance_succeeds() {
    let card = make_card(dec!(100.00));
    card.debit(dec!(100.00)).unwrap();
    assert_eq!(card.balance(), Decimal::ZERO);
}

#[test]
fn small_decimal_precision() {
    let card = make_card(Decimal::ZERO);
    card.credit(dec!(0.01)).unwrap();
    card.credit(dec!(0.02)).unwrap();
    assert_eq!(card.balance(), dec!(0.03));
}

#[test]
fn large_amounts() {
    let large = dec!(999999999999.99);
    let card = make_card(Decimal::ZERO);
    card.credit(large).unwrap();
    assert_eq!(card.balance(), large);
}

#[test]
fn update_replaces_number_and_balance() {
    let card = make_card(dec!(100.00));
    card.update("5555666677778888", dec!(42.00));
    assert_eq!(card.card_number(), "5555666677778888");
    assert_eq!(card.balance(), dec!(42.00));
}

// === Room Tests ===

#[test]
fn reserve_returns_price_and_flips_availability() {
    let room = make_room(dec!(50.00));
    assert!(room.is_available());
    assert_eq!(room.reserve().unwrap(), dec!(50.00));
    assert!(!room.is_available());
}

#[test]
fn reserve_unavailable_room_fails() {
    let room = make_room(dec!(50.00));
    room.reserve().unwrap();
    assert_eq!(room.reserve(), Err(LedgerError::RoomUnavailable(RoomId(1))));
}

#[test]
fn release_reopens_the_room() {
    let room = make_room(dec!(50.00));
    room.reserve().unwrap();
    room.release();
    assert!(room.is_available());
    assert!(room.reserve().is_ok());
}

#[test]
fn reserve_captures_price_before_update() {
    let room = make_room(dec!(50.00));
    let price = room.reserve().unwrap();
    // Later price changes don't affect the price the booking was won at.
    room.update("101", dec!(80.00), false);
    assert_eq!(price, dec!(50.00));
}

// === Serialization Tests ===

#[test]
fn card_serializes_with_two_decimal_balance() {
    let card = make_card(dec!(500));
    let json = serde_json::to_value(&card).unwrap();
    assert_eq!(json["balance"].as_str().unwrap(), "500.00");
    assert_eq!(json["card_number"], "4111111111111111");
}

#[test]
fn room_serializes_with_two_decimal_price() {
    let room = make_room(dec!(75.5));
    let json = serde_json::to_value(&room).unwrap();
    assert_eq!(json["price_per_night"].as_str().unwrap(), "75.50");
    assert_eq!(json["is_available"], true);
}

// === Multi-threading Tests ===

#[test]
fn concurrent_credits_are_atomic() {
    let card = Arc::new(make_card(Decimal::ZERO));
    let mut handles = vec![];

    for _ in 0..100 {
        let card = Arc::clone(&card);
        handles.push(thread::spawn(move || {
            card.credit(dec!(1.00)).unwrap();
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(card.balance(), dec!(100.00));
}

#[test]
fn concurrent_mixed_operations_maintain_balance() {
    let card = Arc::new(make_card(dec!(1000.00)));
    let mut handles = vec![];

    // 50 credits of 10.00
    for _ in 0..50 {
        let card = Arc::clone(&card);
        handles.push(thread::spawn(move || {
            card.credit(dec!(10.00)).unwrap();
        }));
    }

    // 50 debits of 10.00
    for _ in 0..50 {
        let card = Arc::clone(&card);
        handles.push(thread::spawn(move || {
            card.debit(dec!(10.00)).unwrap();
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    // Net effect: 1000 + 500 - 500 = 1000
    assert_eq!(card.balance(), dec!(1000.00));
}

// === Race Condition Tests ===

#[test]
fn no_double_spend_race_condition() {
    // Concurrent debits must not overdraw the card.
    for _ in 0..10 {
        let card = Arc::new(make_card(dec!(100.00)));
        let mut handles = vec![];

        // Try 10 concurrent debits of 100 each
        for _ in 0..10 {
            let card = Arc::clone(&card);
            handles.push(thread::spawn(move || card.debit(dec!(100.00)).is_ok()));
        }

        let successes = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|&ok| ok)
            .count();

        // Only ONE debit should succeed
        assert_eq!(successes, 1, "Expected exactly 1 successful debit");
        assert_eq!(card.balance(), Decimal::ZERO);
    }
}

#[test]
fn balance_never_goes_negative() {
    for _ in 0..10 {
        let card = Arc::new(make_card(dec!(50.00)));
        let mut handles = vec![];

        // Many concurrent debits trying to overdraw
        for _ in 0..20 {
            let card = Arc::clone(&card);
            handles.push(thread::spawn(move || {
                let _ = card.debit(dec!(10.00));
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert!(card.balance() >= Decimal::ZERO, "Balance went negative!");
    }
}

#[test]
fn exactly_one_concurrent_booking_wins() {
    for _ in 0..10 {
        let room = Arc::new(make_room(dec!(50.00)));
        let mut handles = vec![];

        for _ in 0..10 {
            let room = Arc::clone(&room);
            handles.push(thread::spawn(move || room.reserve().is_ok()));
        }

        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|&ok| ok)
            .count();

        assert_eq!(winners, 1, "Expected exactly 1 successful booking");
        assert!(!room.is_available());
    }
}

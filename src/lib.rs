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

//! # Guest-House Ledger
//!
//! This library provides a booking and payment ledger for a guest house:
//! room and meal inventory, guest records, reservations, and debit-card
//! transactions with a complete audit trail.
//!
//! ## Core Components
//!
//! - [`Engine`]: Reservation creation, payment processing, and deposits
//! - [`LedgerStore`]: Per-entity repositories holding all state
//! - [`Reservation`]: A booking with computed cost and payment status
//! - [`Transaction`]: Append-only audit record of every balance-affecting
//!   attempt
//! - [`LedgerError`]: Error types for booking and payment failures
//!
//! ## Example
//!
//! ```
//! use chrono::NaiveDate;
//! use guesthouse_ledger_rs::{Engine, PaymentRequest, ReservationRequest};
//! use rust_decimal_macros::dec;
//!
//! let engine = Engine::new();
//! let room = engine.store().rooms().create("101", dec!(50.00));
//! engine.store().cards().create("4111111111111111", dec!(500.00)).unwrap();
//!
//! // Book the room for two nights
//! let reservation = engine
//!     .create_reservation(ReservationRequest {
//!         guest_name: Some("Jane Doe".into()),
//!         guest_email: Some("jane@example.com".into()),
//!         room_id: Some(room.id()),
//!         meal_id: None,
//!         check_in_date: NaiveDate::from_ymd_opt(2025, 4, 28),
//!         check_out_date: NaiveDate::from_ymd_opt(2025, 4, 30),
//!     })
//!     .unwrap();
//! assert_eq!(reservation.total_cost, dec!(100.00));
//!
//! // Pay for it
//! let receipt = engine
//!     .process_payment(PaymentRequest {
//!         card_number: Some("4111111111111111".into()),
//!         amount: Some(reservation.total_cost),
//!         reservation_id: Some(reservation.id),
//!     })
//!     .unwrap();
//! assert_eq!(receipt.balance, dec!(400.00));
//! ```
//!
//! ## Thread Safety
//!
//! The engine handles concurrent access to rooms and cards: of two
//! concurrent bookings for the same room exactly one succeeds, and
//! concurrent payments against one card serialize so its balance never goes
//! negative.

pub mod base;
mod card;
mod engine;
pub mod error;
mod guest;
mod meal;
pub mod money;
mod reservation;
mod room;
pub mod store;
mod transaction;
mod transaction_log;

pub use base::{CardId, GuestId, MealId, ReservationId, RoomId, TransactionId};
pub use card::DebitCard;
pub use engine::{
    DepositReceipt, DepositRequest, Engine, PaymentReceipt, PaymentRequest, ReservationRequest,
    format_amount,
};
pub use error::LedgerError;
pub use guest::Guest;
pub use meal::Meal;
pub use reservation::{PaymentStatus, Reservation};
pub use room::Room;
pub use store::LedgerStore;
pub use transaction::{Transaction, TransactionKind, TransactionStatus};
pub use transaction_log::TransactionLog;

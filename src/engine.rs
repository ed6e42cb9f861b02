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

//! Booking and payment engine.
//!
//! The [`Engine`] implements the three business operations over an injected
//! [`LedgerStore`]:
//!
//! - **Reservation creation**: resolves or creates the guest, claims the
//!   room (atomic availability flip), accumulates cost, persists an unpaid
//!   reservation.
//! - **Payment processing**: validates the card against the reservation,
//!   debits the balance, and records a [`Transaction`] on every attempt,
//!   successful or not.
//! - **Deposits**: credits a card and records the deposit.
//!
//! Requests arrive as explicit structs with optional fields and are
//! validated before any business logic runs.
//!
//! # Thread Safety
//!
//! All operations take `&self` and are safe to call concurrently. Room
//! booking and card debits are per-entity critical sections; of two
//! concurrent bookings for one room exactly one succeeds, and concurrent
//! payments against one card serialize so the balance never goes negative.

use crate::base::{CardId, MealId, ReservationId, RoomId};
use crate::error::LedgerError;
use crate::money;
use crate::reservation::{PaymentStatus, Reservation};
use crate::room::Room;
use crate::store::LedgerStore;
use crate::transaction::{Transaction, TransactionKind, TransactionStatus};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::sync::Arc;

/// Request to create a reservation.
///
/// All fields are optional so that deserialized requests can be validated
/// here rather than at the transport layer; at least one of `room_id` /
/// `meal_id` must resolve for the reservation to be accepted.
#[derive(Debug, Clone, Default)]
pub struct ReservationRequest {
    pub guest_name: Option<String>,
    pub guest_email: Option<String>,
    pub room_id: Option<RoomId>,
    pub meal_id: Option<MealId>,
    pub check_in_date: Option<NaiveDate>,
    pub check_out_date: Option<NaiveDate>,
}

impl ReservationRequest {
    fn validate(&self) -> Result<(String, String, NaiveDate, NaiveDate), LedgerError> {
        match (
            &self.guest_name,
            &self.guest_email,
            self.check_in_date,
            self.check_out_date,
        ) {
            (Some(name), Some(email), Some(check_in), Some(check_out)) => {
                Ok((name.clone(), email.clone(), check_in, check_out))
            }
            _ => Err(LedgerError::MissingFields(
                "guest name, guest email, check-in date, and check-out date",
            )),
        }
    }
}

/// Request to pay for a reservation with a debit card.
#[derive(Debug, Clone, Default)]
pub struct PaymentRequest {
    pub card_number: Option<String>,
    pub amount: Option<Decimal>,
    pub reservation_id: Option<ReservationId>,
}

impl PaymentRequest {
    fn validate(&self) -> Result<(String, Decimal, ReservationId), LedgerError> {
        let (card_number, amount, reservation_id) =
            match (&self.card_number, self.amount, self.reservation_id) {
                (Some(card_number), Some(amount), Some(reservation_id)) => {
                    (card_number.clone(), amount, reservation_id)
                }
                _ => {
                    return Err(LedgerError::MissingFields(
                        "card number, amount, and reservation ID",
                    ));
                }
            };
        if amount <= Decimal::ZERO {
            return Err(LedgerError::InvalidAmount);
        }
        Ok((card_number, amount, reservation_id))
    }
}

/// Request to deposit funds onto a debit card.
#[derive(Debug, Clone, Default)]
pub struct DepositRequest {
    pub card_number: Option<String>,
    pub amount: Option<Decimal>,
}

impl DepositRequest {
    fn validate(&self) -> Result<(String, Decimal), LedgerError> {
        let (card_number, amount) = match (&self.card_number, self.amount) {
            (Some(card_number), Some(amount)) => (card_number.clone(), amount),
            _ => return Err(LedgerError::MissingFields("card number and amount")),
        };
        if amount <= Decimal::ZERO {
            return Err(LedgerError::InvalidAmount);
        }
        Ok((card_number, amount))
    }
}

/// Outcome of a successful payment.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentReceipt {
    pub transaction: Arc<Transaction>,
    pub amount: Decimal,
    /// Card balance after the debit.
    pub balance: Decimal,
}

/// Outcome of a successful deposit.
#[derive(Debug, Clone, PartialEq)]
pub struct DepositReceipt {
    pub transaction: Arc<Transaction>,
    pub amount: Decimal,
    /// Card balance after the credit.
    pub balance: Decimal,
}

/// Booking and payment engine over a shared ledger store.
///
/// # Invariants
///
/// - A room referenced by a live reservation is unavailable; a failed
///   reservation attempt never leaves a room flipped.
/// - Card balances never go negative.
/// - Every payment attempt with a resolvable reservation writes exactly one
///   transaction record; unknown reservations write none.
pub struct Engine {
    store: Arc<LedgerStore>,
}

impl Engine {
    /// Creates an engine with a fresh, empty store.
    pub fn new() -> Self {
        Self::with_store(Arc::new(LedgerStore::new()))
    }

    /// Creates an engine over an existing store.
    pub fn with_store(store: Arc<LedgerStore>) -> Self {
        Engine { store }
    }

    /// The underlying store, for CRUD access alongside the engine.
    pub fn store(&self) -> &LedgerStore {
        &self.store
    }

    /// Creates a reservation, reserving the room and computing the cost.
    ///
    /// The guest is resolved by email first (get-or-create; the name is only
    /// used when creating). With a `room_id`, the room must exist and be
    /// available, the stay must be at least one night, and the availability
    /// flip is a compare-and-set: under concurrent requests for the same
    /// room exactly one wins. With a `meal_id`, the meal must exist. A
    /// failure after the room was claimed releases it again.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::MissingFields`] - Guest identity or dates absent.
    /// - [`LedgerError::RoomUnavailable`] - Room id given but no available
    ///   room matches it.
    /// - [`LedgerError::InvalidDateRange`] - Stay shorter than one night.
    /// - [`LedgerError::MealNotFound`] - Meal id given but unknown.
    /// - [`LedgerError::EmptyReservation`] - Nothing contributed cost.
    pub fn create_reservation(
        &self,
        request: ReservationRequest,
    ) -> Result<Reservation, LedgerError> {
        let (guest_name, guest_email, check_in, check_out) = request.validate()?;

        let guest = self.store.guests().get_or_create(&guest_email, &guest_name);

        let mut total_cost = Decimal::ZERO;
        let mut reserved_room = None;

        if let Some(room_id) = request.room_id {
            let room = self
                .store
                .rooms()
                .get_available(room_id)
                .ok_or(LedgerError::RoomUnavailable(room_id))?;

            let nights = (check_out - check_in).num_days();
            if nights < 1 {
                return Err(LedgerError::InvalidDateRange);
            }

            // Re-checks availability and flips it under the room lock; a
            // concurrent booking that got there first surfaces here.
            let price_per_night = room.reserve()?;
            total_cost += price_per_night * Decimal::from(nights);
            reserved_room = Some(room);
        }

        if let Some(meal_id) = request.meal_id {
            match self.store.meals().get(meal_id) {
                Some(meal) => total_cost += meal.price,
                None => {
                    self.rollback_room(&reserved_room);
                    return Err(LedgerError::MealNotFound(meal_id));
                }
            }
        }

        if total_cost.is_zero() {
            self.rollback_room(&reserved_room);
            return Err(LedgerError::EmptyReservation);
        }

        Ok(self.store.reservations().create(
            guest.id,
            reserved_room.map(|room| room.id()),
            request.meal_id,
            check_in,
            check_out,
            total_cost,
        ))
    }

    /// Pays for a reservation with a debit card.
    ///
    /// Every attempt against a resolvable reservation is recorded as a
    /// [`Transaction`], failures included; amounts are stored positive and
    /// the withdrawal kind carries the direction. The balance check and the
    /// debit run under the card lock, so concurrent payments against one
    /// card serialize.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::MissingFields`] / [`LedgerError::InvalidAmount`] -
    ///   Request invalid; nothing recorded.
    /// - [`LedgerError::ReservationNotFound`] - Unknown reservation; nothing
    ///   recorded.
    /// - [`LedgerError::CardNotFound`] - Unknown card number; a card-less
    ///   failed transaction is recorded and the reservation is marked
    ///   failed.
    /// - [`LedgerError::InsufficientFunds`] - Balance too low; a failed
    ///   transaction is recorded, the reservation is marked failed, and the
    ///   balance is untouched.
    pub fn process_payment(&self, request: PaymentRequest) -> Result<PaymentReceipt, LedgerError> {
        let (card_number, amount, reservation_id) = request.validate()?;

        if self.store.reservations().get(reservation_id).is_none() {
            return Err(LedgerError::ReservationNotFound(reservation_id));
        }

        let Some(card) = self.store.cards().find_by_number(&card_number) else {
            self.record_failed_attempt(None, amount, reservation_id)?;
            return Err(LedgerError::CardNotFound);
        };

        match card.debit(amount) {
            Ok(balance) => {
                let transaction = self.store.transactions().record(
                    Some(card.id()),
                    amount,
                    TransactionKind::Withdrawal,
                    Some(reservation_id),
                    TransactionStatus::Success,
                );
                self.store
                    .reservations()
                    .set_payment_status(reservation_id, PaymentStatus::Paid)?;
                Ok(PaymentReceipt {
                    transaction,
                    amount,
                    balance,
                })
            }
            Err(error @ LedgerError::InsufficientFunds) => {
                self.record_failed_attempt(Some(card.id()), amount, reservation_id)?;
                Err(error)
            }
            Err(error) => Err(error),
        }
    }

    /// Deposits funds onto a debit card.
    ///
    /// Unlike payments, a deposit to an unknown card leaves no transaction
    /// record; only successful deposits are written to the audit log.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::MissingFields`] / [`LedgerError::InvalidAmount`] -
    ///   Request invalid.
    /// - [`LedgerError::CardNotFound`] - Unknown card number.
    pub fn deposit_funds(&self, request: DepositRequest) -> Result<DepositReceipt, LedgerError> {
        let (card_number, amount) = request.validate()?;

        let card = self
            .store
            .cards()
            .find_by_number(&card_number)
            .ok_or(LedgerError::CardNotFound)?;

        let balance = card.credit(amount)?;
        let transaction = self.store.transactions().record(
            Some(card.id()),
            amount,
            TransactionKind::Deposit,
            None,
            TransactionStatus::Success,
        );

        Ok(DepositReceipt {
            transaction,
            amount,
            balance,
        })
    }

    /// Records a failed payment attempt and marks the reservation failed.
    fn record_failed_attempt(
        &self,
        card: Option<CardId>,
        amount: Decimal,
        reservation_id: ReservationId,
    ) -> Result<(), LedgerError> {
        self.store.transactions().record(
            card,
            amount,
            TransactionKind::Withdrawal,
            Some(reservation_id),
            TransactionStatus::Failed,
        );
        self.store
            .reservations()
            .set_payment_status(reservation_id, PaymentStatus::Failed)
    }

    fn rollback_room(&self, reserved_room: &Option<Arc<Room>>) {
        if let Some(room) = reserved_room {
            room.release();
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

/// Formats an amount for user-facing messages (two fraction digits).
pub fn format_amount(amount: Decimal) -> String {
    money::to_fixed(amount).to_string()
}

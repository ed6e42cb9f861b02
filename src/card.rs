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

//! Debit card management.
//!
//! The balance check and mutation happen under one lock, so concurrent
//! payments against the same card serialize and the balance can never go
//! negative.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use guesthouse_ledger_rs::{CardId, DebitCard};
//!
//! let card = DebitCard::new(CardId(1), "4111111111111111", dec!(500.00));
//! assert_eq!(card.balance(), dec!(500.00));
//! ```

use crate::base::CardId;
use crate::error::LedgerError;
use crate::money;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use serde::ser::{Serialize, SerializeStruct, Serializer};

#[derive(Debug)]
struct CardData {
    id: CardId,
    card_number: String,
    balance: Decimal,
}

impl CardData {
    fn assert_invariants(&self) {
        debug_assert!(
            self.balance >= Decimal::ZERO,
            "Invariant violated: card balance went negative: {}",
            self.balance
        );
    }

    /// Increases the balance.
    fn credit(&mut self, amount: Decimal) -> Result<Decimal, LedgerError> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::InvalidAmount);
        }
        self.balance += amount;
        self.assert_invariants();
        Ok(self.balance)
    }

    /// Decreases the balance, rejecting overdrafts.
    fn debit(&mut self, amount: Decimal) -> Result<Decimal, LedgerError> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::InvalidAmount);
        }
        if self.balance < amount {
            return Err(LedgerError::InsufficientFunds);
        }
        self.balance -= amount;
        self.assert_invariants();
        Ok(self.balance)
    }
}

/// A debit card with a non-negative balance.
#[derive(Debug)]
pub struct DebitCard {
    inner: Mutex<CardData>,
}

impl DebitCard {
    pub fn new(id: CardId, card_number: impl Into<String>, balance: Decimal) -> Self {
        Self {
            inner: Mutex::new(CardData {
                id,
                card_number: card_number.into(),
                balance,
            }),
        }
    }

    pub fn id(&self) -> CardId {
        self.inner.lock().id
    }

    pub fn card_number(&self) -> String {
        self.inner.lock().card_number.clone()
    }

    pub fn balance(&self) -> Decimal {
        self.inner.lock().balance
    }

    /// Credits the card, returning the new balance.
    ///
    /// # Errors
    ///
    /// [`LedgerError::InvalidAmount`] if `amount` is zero or negative.
    pub fn credit(&self, amount: Decimal) -> Result<Decimal, LedgerError> {
        self.inner.lock().credit(amount)
    }

    /// Debits the card, returning the new balance.
    ///
    /// The check and the deduction run under the card lock as a single
    /// atomic unit.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::InvalidAmount`] if `amount` is zero or negative.
    /// - [`LedgerError::InsufficientFunds`] if the balance is lower than
    ///   `amount`. The balance is left untouched.
    pub fn debit(&self, amount: Decimal) -> Result<Decimal, LedgerError> {
        self.inner.lock().debit(amount)
    }

    /// Replaces the card's mutable fields (CRUD update).
    pub fn update(&self, card_number: impl Into<String>, balance: Decimal) {
        let mut data = self.inner.lock();
        data.card_number = card_number.into();
        data.balance = balance;
        data.assert_invariants();
    }
}

impl Serialize for DebitCard {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let data = self.inner.lock();
        let mut state = serializer.serialize_struct("DebitCard", 3)?;
        state.serialize_field("id", &data.id)?;
        state.serialize_field("card_number", &data.card_number)?;
        state.serialize_field("balance", &money::to_fixed(data.balance))?;
        state.end()
    }
}

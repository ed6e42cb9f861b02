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

//! Reservations.
//!
//! A reservation links a guest to an optional room and/or meal for a date
//! range. Payment status follows a one-step machine:
//! `Unpaid` → `Paid` (successful payment) or `Failed` (rejected attempt).
//! A failed reservation can still be paid later, flipping it to `Paid`.

use crate::base::{GuestId, MealId, ReservationId, RoomId};
use crate::money;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Payment state of a reservation. Mutated only by the payment processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Unpaid,
    Paid,
    Failed,
}

/// A booking with a computed total cost.
///
/// `room` and `meal` are optional both at creation time (a meal-only booking
/// has no room) and afterwards: deleting a room or meal detaches it from the
/// reservations referencing it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reservation {
    pub id: ReservationId,
    pub guest: GuestId,
    pub room: Option<RoomId>,
    pub meal: Option<MealId>,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    #[serde(serialize_with = "money::serialize")]
    pub total_cost: Decimal,
    pub payment_status: PaymentStatus,
}

impl Reservation {
    /// Number of nights between check-in and check-out.
    pub fn nights(&self) -> i64 {
        (self.check_out_date - self.check_in_date).num_days()
    }
}

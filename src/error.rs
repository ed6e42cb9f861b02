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

//! Error types for booking and payment processing.

use crate::base::{GuestId, MealId, ReservationId, RoomId, TransactionId};
use thiserror::Error;

/// Booking and payment processing errors.
///
/// Every variant carries a human-readable message suitable for a 400-style
/// error response body.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// A required request field was omitted
    #[error("{0} are required")]
    MissingFields(&'static str),

    /// Amount is zero or negative
    #[error("invalid amount (must be positive)")]
    InvalidAmount,

    /// Check-out is not strictly after check-in
    #[error("check-out date must be after check-in date")]
    InvalidDateRange,

    /// Reservation has neither a room nor a meal contributing cost
    #[error("reservation must include at least a room or a meal")]
    EmptyReservation,

    /// Room id was supplied but no available room matches it
    #[error("room {0} is not available or does not exist")]
    RoomUnavailable(RoomId),

    /// Room id does not exist (CRUD access)
    #[error("room {0} does not exist")]
    RoomNotFound(RoomId),

    /// Meal id was supplied but does not exist
    #[error("meal {0} does not exist")]
    MealNotFound(MealId),

    /// Guest id does not exist (CRUD access)
    #[error("guest {0} does not exist")]
    GuestNotFound(GuestId),

    /// No debit card matches the supplied card number or id
    #[error("invalid card number")]
    CardNotFound,

    /// Reservation id does not exist
    #[error("reservation {0} does not exist")]
    ReservationNotFound(ReservationId),

    /// Transaction id does not exist
    #[error("transaction {0} does not exist")]
    TransactionNotFound(TransactionId),

    /// Payment would exceed the card balance
    #[error("insufficient funds")]
    InsufficientFunds,

    /// Guest email is already registered
    #[error("guest email is already registered")]
    DuplicateEmail,

    /// Card number is already registered
    #[error("card number is already registered")]
    DuplicateCardNumber,
}

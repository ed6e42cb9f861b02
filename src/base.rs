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

//! Core identifier types for ledger entities.
//!
//! Each entity gets its own `u32` newtype so room ids, card ids, and so on
//! cannot be mixed up at call sites. Ids are allocated by the repositories
//! starting at 1.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! id_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type! {
    /// Unique identifier for a room.
    RoomId
}

id_type! {
    /// Unique identifier for a meal.
    MealId
}

id_type! {
    /// Unique identifier for a guest.
    GuestId
}

id_type! {
    /// Unique identifier for a debit card.
    ///
    /// Cards are also addressable by their unique card number string;
    /// the id is the internal key.
    CardId
}

id_type! {
    /// Unique identifier for a reservation.
    ReservationId
}

id_type! {
    /// Unique identifier for a transaction.
    ///
    /// Allocated monotonically by the transaction log, so id order is
    /// insertion order.
    TransactionId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_display_as_plain_numbers() {
        assert_eq!(RoomId(7).to_string(), "7");
        assert_eq!(ReservationId(42).to_string(), "42");
    }

    #[test]
    fn ids_serialize_transparently() {
        let json = serde_json::to_string(&CardId(3)).unwrap();
        assert_eq!(json, "3");
    }
}

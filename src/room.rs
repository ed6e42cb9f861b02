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

//! Room inventory.
//!
//! Booking a room is a compare-and-set on `is_available`: the availability
//! check and the flip happen under one lock, so of two concurrent bookings
//! for the same room exactly one wins.

use crate::base::RoomId;
use crate::error::LedgerError;
use crate::money;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use serde::ser::{Serialize, SerializeStruct, Serializer};

#[derive(Debug)]
struct RoomData {
    id: RoomId,
    name: String,
    price_per_night: Decimal,
    is_available: bool,
}

/// A bookable room.
#[derive(Debug)]
pub struct Room {
    inner: Mutex<RoomData>,
}

impl Room {
    /// Creates a room, available by default.
    pub fn new(id: RoomId, name: impl Into<String>, price_per_night: Decimal) -> Self {
        Self {
            inner: Mutex::new(RoomData {
                id,
                name: name.into(),
                price_per_night,
                is_available: true,
            }),
        }
    }

    pub fn id(&self) -> RoomId {
        self.inner.lock().id
    }

    pub fn name(&self) -> String {
        self.inner.lock().name.clone()
    }

    pub fn price_per_night(&self) -> Decimal {
        self.inner.lock().price_per_night
    }

    pub fn is_available(&self) -> bool {
        self.inner.lock().is_available
    }

    /// Atomically claims the room for a booking.
    ///
    /// Checks availability, flips the room to unavailable, and returns the
    /// nightly price, all under one lock. The returned price is the one the
    /// booking was won at, immune to concurrent updates.
    ///
    /// # Errors
    ///
    /// [`LedgerError::RoomUnavailable`] if the room is already booked.
    pub fn reserve(&self) -> Result<Decimal, LedgerError> {
        let mut data = self.inner.lock();
        if !data.is_available {
            return Err(LedgerError::RoomUnavailable(data.id));
        }
        data.is_available = false;
        Ok(data.price_per_night)
    }

    /// Makes the room available again.
    ///
    /// Used to roll back a failed reservation and when a reservation holding
    /// the room is deleted.
    pub fn release(&self) {
        self.inner.lock().is_available = true;
    }

    /// Replaces the room's mutable fields (CRUD update).
    pub fn update(&self, name: impl Into<String>, price_per_night: Decimal, is_available: bool) {
        let mut data = self.inner.lock();
        data.name = name.into();
        data.price_per_night = price_per_night;
        data.is_available = is_available;
    }
}

impl Serialize for Room {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let data = self.inner.lock();
        let mut state = serializer.serialize_struct("Room", 4)?;
        state.serialize_field("id", &data.id)?;
        state.serialize_field("name", &data.name)?;
        state.serialize_field("price_per_night", &money::to_fixed(data.price_per_night))?;
        state.serialize_field("is_available", &data.is_available)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn new_room_is_available() {
        let room = Room::new(RoomId(1), "101", dec!(50.00));
        assert!(room.is_available());
    }

    #[test]
    fn reserve_flips_availability_and_returns_price() {
        let room = Room::new(RoomId(1), "101", dec!(50.00));
        assert_eq!(room.reserve().unwrap(), dec!(50.00));
        assert!(!room.is_available());
    }

    #[test]
    fn reserving_twice_fails() {
        let room = Room::new(RoomId(2), "102", dec!(75.00));
        room.reserve().unwrap();
        assert_eq!(room.reserve(), Err(LedgerError::RoomUnavailable(RoomId(2))));
    }

    #[test]
    fn release_makes_room_bookable_again() {
        let room = Room::new(RoomId(1), "101", dec!(50.00));
        room.reserve().unwrap();
        room.release();
        assert!(room.reserve().is_ok());
    }

    #[test]
    fn serializer_pads_price_to_two_decimal_places() {
        let room = Room::new(RoomId(1), "Garden Suite", dec!(75));
        let json = serde_json::to_string(&room).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["id"], 1);
        assert_eq!(parsed["name"], "Garden Suite");
        assert_eq!(parsed["price_per_night"].as_str().unwrap(), "75.00");
        assert_eq!(parsed["is_available"], true);
    }
}

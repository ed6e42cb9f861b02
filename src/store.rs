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

//! The ledger store: one repository per entity, aggregated in
//! [`LedgerStore`].
//!
//! Repositories expose typed create/get/list/update access; deletes go
//! through [`LedgerStore`] so cross-entity policies (detaching rooms and
//! meals from reservations, cascading a guest's reservations) are applied
//! in one place.
//!
//! All repositories are safe for concurrent use. Lookups that feed the
//! booking and payment engines (`get_or_create` for guests, card-number
//! resolution) use the map entry API so check-and-insert is atomic.

use crate::base::{CardId, GuestId, MealId, ReservationId, RoomId};
use crate::card::DebitCard;
use crate::error::LedgerError;
use crate::guest::Guest;
use crate::meal::Meal;
use crate::reservation::{PaymentStatus, Reservation};
use crate::room::Room;
use crate::transaction_log::TransactionLog;
use chrono::NaiveDate;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

/// Room inventory repository.
#[derive(Debug, Default)]
pub struct RoomRepo {
    rooms: DashMap<RoomId, Arc<Room>>,
    next_id: AtomicU32,
}

impl RoomRepo {
    pub fn create(&self, name: impl Into<String>, price_per_night: Decimal) -> Arc<Room> {
        let id = RoomId(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        let room = Arc::new(Room::new(id, name, price_per_night));
        self.rooms.insert(id, Arc::clone(&room));
        room
    }

    pub fn get(&self, id: RoomId) -> Option<Arc<Room>> {
        self.rooms.get(&id).map(|entry| Arc::clone(&entry))
    }

    /// Fetches a room only if it is currently available.
    pub fn get_available(&self, id: RoomId) -> Option<Arc<Room>> {
        self.get(id).filter(|room| room.is_available())
    }

    pub fn list(&self) -> Vec<Arc<Room>> {
        let mut rooms: Vec<_> = self
            .rooms
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        rooms.sort_by_key(|room| room.id().0);
        rooms
    }

    pub fn update(
        &self,
        id: RoomId,
        name: impl Into<String>,
        price_per_night: Decimal,
        is_available: bool,
    ) -> Result<Arc<Room>, LedgerError> {
        let room = self.get(id).ok_or(LedgerError::RoomNotFound(id))?;
        room.update(name, price_per_night, is_available);
        Ok(room)
    }

    pub(crate) fn remove(&self, id: RoomId) -> Result<Arc<Room>, LedgerError> {
        self.rooms
            .remove(&id)
            .map(|(_, room)| room)
            .ok_or(LedgerError::RoomNotFound(id))
    }
}

/// Meal catalog repository.
#[derive(Debug, Default)]
pub struct MealRepo {
    meals: DashMap<MealId, Meal>,
    next_id: AtomicU32,
}

impl MealRepo {
    pub fn create(&self, name: impl Into<String>, price: Decimal) -> Meal {
        let id = MealId(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        let meal = Meal {
            id,
            name: name.into(),
            price,
        };
        self.meals.insert(id, meal.clone());
        meal
    }

    pub fn get(&self, id: MealId) -> Option<Meal> {
        self.meals.get(&id).map(|entry| entry.clone())
    }

    pub fn list(&self) -> Vec<Meal> {
        let mut meals: Vec<_> = self.meals.iter().map(|entry| entry.clone()).collect();
        meals.sort_by_key(|meal| meal.id.0);
        meals
    }

    pub fn update(
        &self,
        id: MealId,
        name: impl Into<String>,
        price: Decimal,
    ) -> Result<Meal, LedgerError> {
        let mut entry = self
            .meals
            .get_mut(&id)
            .ok_or(LedgerError::MealNotFound(id))?;
        entry.name = name.into();
        entry.price = price;
        Ok(entry.clone())
    }

    pub(crate) fn remove(&self, id: MealId) -> Result<Meal, LedgerError> {
        self.meals
            .remove(&id)
            .map(|(_, meal)| meal)
            .ok_or(LedgerError::MealNotFound(id))
    }
}

/// Guest repository with a unique-email index.
#[derive(Debug, Default)]
pub struct GuestRepo {
    guests: DashMap<GuestId, Guest>,
    by_email: DashMap<String, GuestId>,
    next_id: AtomicU32,
}

impl GuestRepo {
    fn allocate(&self, name: &str, email: &str) -> Guest {
        let id = GuestId(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        let guest = Guest {
            id,
            name: name.to_string(),
            email: email.to_string(),
        };
        self.guests.insert(id, guest.clone());
        guest
    }

    /// Looks a guest up by email, creating one with the supplied name only
    /// when absent. The check-and-insert runs on the email index entry, so
    /// two concurrent calls for the same email resolve to one guest.
    pub fn get_or_create(&self, email: &str, name: &str) -> Guest {
        match self.by_email.entry(email.to_string()) {
            Entry::Occupied(entry) => {
                let id = *entry.get();
                // The index only holds ids of stored guests.
                self.guests.get(&id).map(|g| g.clone()).unwrap()
            }
            Entry::Vacant(entry) => {
                let guest = self.allocate(name, email);
                entry.insert(guest.id);
                guest
            }
        }
    }

    /// Explicit create; fails on a duplicate email instead of reusing it.
    pub fn create(&self, name: &str, email: &str) -> Result<Guest, LedgerError> {
        match self.by_email.entry(email.to_string()) {
            Entry::Occupied(_) => Err(LedgerError::DuplicateEmail),
            Entry::Vacant(entry) => {
                let guest = self.allocate(name, email);
                entry.insert(guest.id);
                Ok(guest)
            }
        }
    }

    pub fn get(&self, id: GuestId) -> Option<Guest> {
        self.guests.get(&id).map(|entry| entry.clone())
    }

    pub fn find_by_email(&self, email: &str) -> Option<Guest> {
        let id = *self.by_email.get(email)?;
        self.get(id)
    }

    pub fn list(&self) -> Vec<Guest> {
        let mut guests: Vec<_> = self.guests.iter().map(|entry| entry.clone()).collect();
        guests.sort_by_key(|guest| guest.id.0);
        guests
    }

    pub fn update(&self, id: GuestId, name: &str, email: &str) -> Result<Guest, LedgerError> {
        let old_email = self
            .get(id)
            .ok_or(LedgerError::GuestNotFound(id))?
            .email;
        if old_email != email {
            match self.by_email.entry(email.to_string()) {
                Entry::Occupied(_) => return Err(LedgerError::DuplicateEmail),
                Entry::Vacant(entry) => {
                    entry.insert(id);
                }
            }
            self.by_email.remove(&old_email);
        }
        let mut entry = self
            .guests
            .get_mut(&id)
            .ok_or(LedgerError::GuestNotFound(id))?;
        entry.name = name.to_string();
        entry.email = email.to_string();
        Ok(entry.clone())
    }

    pub(crate) fn remove(&self, id: GuestId) -> Result<Guest, LedgerError> {
        let guest = self.get(id).ok_or(LedgerError::GuestNotFound(id))?;
        // Index first: `get_or_create` trusts that an indexed id is stored.
        self.by_email.remove(&guest.email);
        self.guests
            .remove(&id)
            .map(|(_, guest)| guest)
            .ok_or(LedgerError::GuestNotFound(id))
    }
}

/// Debit card repository with a unique-card-number index.
#[derive(Debug, Default)]
pub struct CardRepo {
    cards: DashMap<CardId, Arc<DebitCard>>,
    by_number: DashMap<String, CardId>,
    next_id: AtomicU32,
}

impl CardRepo {
    pub fn create(
        &self,
        card_number: &str,
        balance: Decimal,
    ) -> Result<Arc<DebitCard>, LedgerError> {
        match self.by_number.entry(card_number.to_string()) {
            Entry::Occupied(_) => Err(LedgerError::DuplicateCardNumber),
            Entry::Vacant(entry) => {
                let id = CardId(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
                let card = Arc::new(DebitCard::new(id, card_number, balance));
                self.cards.insert(id, Arc::clone(&card));
                entry.insert(id);
                Ok(card)
            }
        }
    }

    pub fn get(&self, id: CardId) -> Option<Arc<DebitCard>> {
        self.cards.get(&id).map(|entry| Arc::clone(&entry))
    }

    pub fn find_by_number(&self, card_number: &str) -> Option<Arc<DebitCard>> {
        let id = *self.by_number.get(card_number)?;
        self.get(id)
    }

    pub fn list(&self) -> Vec<Arc<DebitCard>> {
        let mut cards: Vec<_> = self
            .cards
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        cards.sort_by_key(|card| card.id().0);
        cards
    }

    pub fn update(
        &self,
        id: CardId,
        card_number: &str,
        balance: Decimal,
    ) -> Result<Arc<DebitCard>, LedgerError> {
        let card = self.get(id).ok_or(LedgerError::CardNotFound)?;
        let old_number = card.card_number();
        if old_number != card_number {
            match self.by_number.entry(card_number.to_string()) {
                Entry::Occupied(_) => return Err(LedgerError::DuplicateCardNumber),
                Entry::Vacant(entry) => {
                    entry.insert(id);
                }
            }
            self.by_number.remove(&old_number);
        }
        card.update(card_number, balance);
        Ok(card)
    }

    pub(crate) fn remove(&self, id: CardId) -> Result<Arc<DebitCard>, LedgerError> {
        let card = self
            .cards
            .remove(&id)
            .map(|(_, card)| card)
            .ok_or(LedgerError::CardNotFound)?;
        self.by_number.remove(&card.card_number());
        Ok(card)
    }
}

/// Reservation repository.
#[derive(Debug, Default)]
pub struct ReservationRepo {
    reservations: DashMap<ReservationId, Reservation>,
    next_id: AtomicU32,
}

impl ReservationRepo {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn create(
        &self,
        guest: GuestId,
        room: Option<RoomId>,
        meal: Option<MealId>,
        check_in_date: NaiveDate,
        check_out_date: NaiveDate,
        total_cost: Decimal,
    ) -> Reservation {
        let id = ReservationId(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        let reservation = Reservation {
            id,
            guest,
            room,
            meal,
            check_in_date,
            check_out_date,
            total_cost,
            payment_status: PaymentStatus::Unpaid,
        };
        self.reservations.insert(id, reservation.clone());
        reservation
    }

    pub fn get(&self, id: ReservationId) -> Option<Reservation> {
        self.reservations.get(&id).map(|entry| entry.clone())
    }

    pub fn list(&self) -> Vec<Reservation> {
        let mut reservations: Vec<_> = self
            .reservations
            .iter()
            .map(|entry| entry.clone())
            .collect();
        reservations.sort_by_key(|reservation| reservation.id.0);
        reservations
    }

    /// Moves a reservation's stay window (CRUD update). Cost is not
    /// recomputed; rebooking goes through the engine.
    pub fn update_dates(
        &self,
        id: ReservationId,
        check_in_date: NaiveDate,
        check_out_date: NaiveDate,
    ) -> Result<Reservation, LedgerError> {
        let mut entry = self
            .reservations
            .get_mut(&id)
            .ok_or(LedgerError::ReservationNotFound(id))?;
        entry.check_in_date = check_in_date;
        entry.check_out_date = check_out_date;
        Ok(entry.clone())
    }

    pub(crate) fn set_payment_status(
        &self,
        id: ReservationId,
        status: PaymentStatus,
    ) -> Result<(), LedgerError> {
        let mut entry = self
            .reservations
            .get_mut(&id)
            .ok_or(LedgerError::ReservationNotFound(id))?;
        entry.payment_status = status;
        Ok(())
    }

    pub(crate) fn detach_room(&self, room: RoomId) {
        for mut entry in self.reservations.iter_mut() {
            if entry.room == Some(room) {
                entry.room = None;
            }
        }
    }

    pub(crate) fn detach_meal(&self, meal: MealId) {
        for mut entry in self.reservations.iter_mut() {
            if entry.meal == Some(meal) {
                entry.meal = None;
            }
        }
    }

    pub(crate) fn remove(&self, id: ReservationId) -> Result<Reservation, LedgerError> {
        self.reservations
            .remove(&id)
            .map(|(_, reservation)| reservation)
            .ok_or(LedgerError::ReservationNotFound(id))
    }

    pub(crate) fn remove_by_guest(&self, guest: GuestId) -> Vec<Reservation> {
        let ids: Vec<_> = self
            .reservations
            .iter()
            .filter(|entry| entry.guest == guest)
            .map(|entry| entry.id)
            .collect();
        ids.into_iter()
            .filter_map(|id| self.reservations.remove(&id).map(|(_, r)| r))
            .collect()
    }
}

/// All persisted state, one repository per entity plus the audit log.
#[derive(Debug, Default)]
pub struct LedgerStore {
    rooms: RoomRepo,
    meals: MealRepo,
    guests: GuestRepo,
    cards: CardRepo,
    reservations: ReservationRepo,
    transactions: TransactionLog,
}

impl LedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rooms(&self) -> &RoomRepo {
        &self.rooms
    }

    pub fn meals(&self) -> &MealRepo {
        &self.meals
    }

    pub fn guests(&self) -> &GuestRepo {
        &self.guests
    }

    pub fn cards(&self) -> &CardRepo {
        &self.cards
    }

    pub fn reservations(&self) -> &ReservationRepo {
        &self.reservations
    }

    pub fn transactions(&self) -> &TransactionLog {
        &self.transactions
    }

    /// Deletes a room and detaches it from any reservation referencing it.
    pub fn delete_room(&self, id: RoomId) -> Result<(), LedgerError> {
        self.rooms.remove(id)?;
        self.reservations.detach_room(id);
        Ok(())
    }

    /// Deletes a meal and detaches it from any reservation referencing it.
    pub fn delete_meal(&self, id: MealId) -> Result<(), LedgerError> {
        self.meals.remove(id)?;
        self.reservations.detach_meal(id);
        Ok(())
    }

    /// Deletes a guest together with their reservations, releasing any rooms
    /// those reservations held.
    pub fn delete_guest(&self, id: GuestId) -> Result<(), LedgerError> {
        self.guests.remove(id)?;
        for reservation in self.reservations.remove_by_guest(id) {
            self.release_room_of(&reservation);
        }
        Ok(())
    }

    /// Deletes a card. Past transactions keep their recorded card id; the
    /// audit log is never rewritten.
    pub fn delete_card(&self, id: CardId) -> Result<(), LedgerError> {
        self.cards.remove(id)?;
        Ok(())
    }

    /// Cancels a reservation, releasing its room.
    pub fn delete_reservation(&self, id: ReservationId) -> Result<(), LedgerError> {
        let reservation = self.reservations.remove(id)?;
        self.release_room_of(&reservation);
        Ok(())
    }

    fn release_room_of(&self, reservation: &Reservation) {
        if let Some(room_id) = reservation.room {
            if let Some(room) = self.rooms.get(room_id) {
                room.release();
            }
        }
    }
}

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

//! Thread-safe append-only transaction log.
//!
//! Records are created by the payment and deposit processors and never
//! updated or removed. Ids are allocated from an atomic counter, so listing
//! by id gives insertion order.

use crate::base::{CardId, ReservationId, TransactionId};
use crate::transaction::{Transaction, TransactionKind, TransactionStatus};
use chrono::Utc;
use dashmap::DashMap;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

/// Append-only audit log of balance-affecting attempts.
#[derive(Debug, Default)]
pub struct TransactionLog {
    /// Records indexed by transaction ID.
    transactions: DashMap<TransactionId, Arc<Transaction>>,

    /// Next transaction ID minus one.
    next_id: AtomicU32,
}

impl TransactionLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record, stamping it with a fresh id and the current time.
    pub fn record(
        &self,
        card: Option<CardId>,
        amount: Decimal,
        transaction_type: TransactionKind,
        reservation: Option<ReservationId>,
        status: TransactionStatus,
    ) -> Arc<Transaction> {
        let id = TransactionId(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        let transaction = Arc::new(Transaction {
            id,
            card,
            amount,
            transaction_type,
            reservation,
            status,
            timestamp: Utc::now(),
        });
        self.transactions.insert(id, Arc::clone(&transaction));
        transaction
    }

    pub fn get(&self, id: TransactionId) -> Option<Arc<Transaction>> {
        self.transactions.get(&id).map(|entry| Arc::clone(&entry))
    }

    /// All records in insertion order.
    pub fn list(&self) -> Vec<Arc<Transaction>> {
        let mut transactions: Vec<_> = self
            .transactions
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        transactions.sort_by_key(|tx| tx.id.0);
        transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn record_allocates_sequential_ids() {
        let log = TransactionLog::new();
        let first = log.record(
            Some(CardId(1)),
            dec!(10.00),
            TransactionKind::Deposit,
            None,
            TransactionStatus::Success,
        );
        let second = log.record(
            Some(CardId(1)),
            dec!(20.00),
            TransactionKind::Withdrawal,
            Some(ReservationId(1)),
            TransactionStatus::Failed,
        );
        assert_eq!(first.id, TransactionId(1));
        assert_eq!(second.id, TransactionId(2));
    }

    #[test]
    fn list_returns_insertion_order() {
        let log = TransactionLog::new();
        for amount in [dec!(1.00), dec!(2.00), dec!(3.00)] {
            log.record(
                None,
                amount,
                TransactionKind::Deposit,
                None,
                TransactionStatus::Success,
            );
        }
        let amounts: Vec<_> = log.list().iter().map(|tx| tx.amount).collect();
        assert_eq!(amounts, vec![dec!(1.00), dec!(2.00), dec!(3.00)]);
    }

    #[test]
    fn get_unknown_id_returns_none() {
        let log = TransactionLog::new();
        assert!(log.get(TransactionId(99)).is_none());
        assert!(log.is_empty());
    }

    #[test]
    fn ids_stay_unique_across_threads() {
        use std::thread;

        let log = Arc::new(TransactionLog::new());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let log = Arc::clone(&log);
            handles.push(thread::spawn(move || {
                for _ in 0..100 {
                    log.record(
                        None,
                        dec!(1.00),
                        TransactionKind::Deposit,
                        None,
                        TransactionStatus::Success,
                    );
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(log.len(), 800);
        let ids: std::collections::HashSet<_> = log.list().iter().map(|tx| tx.id.0).collect();
        assert_eq!(ids.len(), 800);
    }
}

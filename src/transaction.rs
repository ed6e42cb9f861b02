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

//! Transaction audit records.
//!
//! A [`Transaction`] is written for every balance-affecting attempt, failed
//! ones included, and is never mutated afterwards. Amounts are stored
//! positive; [`TransactionKind`] carries the direction.

use crate::base::{CardId, ReservationId, TransactionId};
use crate::money;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Direction of a balance-affecting event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
}

/// Outcome of the attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Success,
    Failed,
}

/// An immutable audit record.
///
/// `card` is `None` when a payment was attempted with an unknown card
/// number; the failed attempt is still recorded against the reservation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub card: Option<CardId>,
    #[serde(serialize_with = "money::serialize")]
    pub amount: Decimal,
    pub transaction_type: TransactionKind,
    pub reservation: Option<ReservationId>,
    pub status: TransactionStatus,
    /// Set at creation, never updated.
    pub timestamp: DateTime<Utc>,
}

impl Transaction {
    pub fn succeeded(&self) -> bool {
        self.status == TransactionStatus::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn kinds_and_statuses_serialize_lowercase() {
        assert_eq!(
            serde_json::to_string(&TransactionKind::Withdrawal).unwrap(),
            "\"withdrawal\""
        );
        assert_eq!(
            serde_json::to_string(&TransactionStatus::Failed).unwrap(),
            "\"failed\""
        );
    }

    #[test]
    fn cardless_transaction_serializes_null_card() {
        let tx = Transaction {
            id: TransactionId(1),
            card: None,
            amount: dec!(200.00),
            transaction_type: TransactionKind::Withdrawal,
            reservation: Some(ReservationId(1)),
            status: TransactionStatus::Failed,
            timestamp: Utc::now(),
        };
        let parsed: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&tx).unwrap()).unwrap();
        assert_eq!(parsed["card"], serde_json::Value::Null);
        assert_eq!(parsed["amount"].as_str().unwrap(), "200.00");
        assert_eq!(parsed["status"], "failed");
    }
}

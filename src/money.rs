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

//! Money serialization helpers.
//!
//! All monetary amounts serialize as fixed-point strings with exactly two
//! fraction digits (`"100.00"`, not `"100"` or `"100.0000"`).

use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

/// Number of fraction digits on the wire.
pub const DECIMAL_PRECISION: u32 = 2;

/// Rounds to two fraction digits and pads the scale so whole numbers still
/// carry `.00`.
pub fn to_fixed(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp(DECIMAL_PRECISION);
    rounded.rescale(DECIMAL_PRECISION);
    rounded
}

/// Serde `serialize_with` adapter for money fields.
pub fn serialize<S>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    Serialize::serialize(&to_fixed(*value), serializer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn whole_numbers_gain_two_fraction_digits() {
        assert_eq!(to_fixed(dec!(100)).to_string(), "100.00");
    }

    #[test]
    fn excess_precision_is_rounded() {
        // Decimal uses banker's rounding: 0.005 rounds to the even digit.
        assert_eq!(to_fixed(dec!(12.345)).to_string(), "12.34");
        assert_eq!(to_fixed(dec!(12.346)).to_string(), "12.35");
    }

    #[test]
    fn two_digit_values_pass_through() {
        assert_eq!(to_fixed(dec!(50.25)).to_string(), "50.25");
    }
}

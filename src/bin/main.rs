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

use chrono::NaiveDate;
use clap::Parser;
use csv::{ReaderBuilder, Trim, Writer};
use guesthouse_ledger_rs::{
    CardId, DepositRequest, Engine, MealId, PaymentRequest, ReservationId, ReservationRequest,
    RoomId,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::PathBuf;
use std::process;

/// Guest-House Ledger - Process booking scenario CSV files
///
/// Reads a scenario of inventory setup and booking/payment operations from
/// a CSV file and outputs final card states to stdout.
#[derive(Parser, Debug)]
#[command(name = "guesthouse-ledger-rs")]
#[command(about = "A booking ledger that processes guest-house scenario CSVs", long_about = None)]
struct Args {
    /// Path to CSV file with scenario operations
    ///
    /// Expected format: op,name,email,price,room,meal,check_in,check_out,card,amount,reservation
    /// Example: cargo run -- scenario.csv > cards.csv
    #[arg(value_name = "FILE")]
    input: PathBuf,
}

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // Open input file
    let file = match File::open(&args.input) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error opening file '{}': {}", args.input.display(), e);
            process::exit(1);
        }
    };

    // Process scenario operations from CSV
    let engine = match process_scenario(BufReader::new(file)) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("Error processing scenario: {}", e);
            process::exit(1);
        }
    };

    // Write results to stdout
    if let Err(e) = write_cards(&engine, std::io::stdout()) {
        eprintln!("Error writing output: {}", e);
        process::exit(1);
    }
}

/// Raw CSV record matching the scenario format.
///
/// Fields: `op, name, email, price, room, meal, check_in, check_out, card,
/// amount, reservation` — each op uses the subset it needs, the rest stay
/// empty.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    op: String,
    name: Option<String>,
    email: Option<String>,
    #[serde(deserialize_with = "csv::invalid_option")]
    price: Option<Decimal>,
    room: Option<u32>,
    meal: Option<u32>,
    check_in: Option<NaiveDate>,
    check_out: Option<NaiveDate>,
    card: Option<String>,
    #[serde(deserialize_with = "csv::invalid_option")]
    amount: Option<Decimal>,
    reservation: Option<u32>,
}

/// One scenario operation.
#[derive(Debug)]
enum Operation {
    AddRoom { name: String, price: Decimal },
    AddMeal { name: String, price: Decimal },
    AddCard { number: String, balance: Decimal },
    Reserve(ReservationRequest),
    Pay(PaymentRequest),
    Deposit(DepositRequest),
}

impl CsvRecord {
    /// Converts a CSV record to an operation.
    ///
    /// Returns `None` for unknown ops or missing required fields; optional
    /// reservation fields stay optional and are validated by the engine.
    fn into_operation(self) -> Option<Operation> {
        match self.op.to_lowercase().as_str() {
            "room" => Some(Operation::AddRoom {
                name: self.name?,
                price: self.price?,
            }),
            "meal" => Some(Operation::AddMeal {
                name: self.name?,
                price: self.price?,
            }),
            "card" => Some(Operation::AddCard {
                number: self.card?,
                balance: self.amount?,
            }),
            "reserve" => Some(Operation::Reserve(ReservationRequest {
                guest_name: self.name,
                guest_email: self.email,
                room_id: self.room.map(RoomId),
                meal_id: self.meal.map(MealId),
                check_in_date: self.check_in,
                check_out_date: self.check_out,
            })),
            "pay" => Some(Operation::Pay(PaymentRequest {
                card_number: self.card,
                amount: self.amount,
                reservation_id: self.reservation.map(ReservationId),
            })),
            "deposit" => Some(Operation::Deposit(DepositRequest {
                card_number: self.card,
                amount: self.amount,
            })),
            _ => None,
        }
    }
}

/// Process scenario operations from a CSV reader.
///
/// Streaming parse; malformed rows and failed operations are skipped so one
/// bad booking does not abort the run (a failed payment still leaves its
/// audit transaction behind, exactly as over the API).
///
/// # CSV Format
///
/// Expected columns: `op, name, email, price, room, meal, check_in,
/// check_out, card, amount, reservation`
/// - `op`: room | meal | card | reserve | pay | deposit
/// - setup ops take `name`/`price` (rooms, meals) or `card`/`amount` (cards)
/// - `reserve` takes guest `name`/`email`, optional `room`/`meal` ids, and
///   ISO-8601 `check_in`/`check_out` dates
/// - `pay` takes `card`, `amount`, `reservation`; `deposit` takes `card`,
///   `amount`
///
/// # Example
///
/// ```csv
/// op,name,email,price,room,meal,check_in,check_out,card,amount,reservation
/// room,101,,50.00,,,,,,,
/// card,,,,,,,,4111111111111111,500.00,
/// reserve,Jane Doe,jane@example.com,,1,,2025-04-28,2025-04-30,,,
/// pay,,,,,,,,4111111111111111,100.00,1
/// ```
///
/// # Errors
///
/// Returns a CSV error if the reader fails or the CSV structure is invalid.
/// Individual operation errors are logged in debug mode but don't stop
/// processing.
pub fn process_scenario<R: Read>(reader: R) -> Result<Engine, csv::Error> {
    let engine = Engine::new();

    let mut rdr = ReaderBuilder::new()
        .trim(Trim::All) // Handle whitespace in fields like " reserve "
        .flexible(true) // Allow trailing empty fields
        .has_headers(true) // Skip first row as header
        .from_reader(reader);

    for result in rdr.deserialize::<CsvRecord>() {
        match result {
            Ok(record) => {
                let Some(op) = record.into_operation() else {
                    #[cfg(debug_assertions)]
                    eprintln!("Skipping invalid scenario record");
                    continue;
                };

                if let Err(_e) = apply(&engine, op) {
                    #[cfg(debug_assertions)]
                    eprintln!("Skipping failed operation: {}", _e);
                }
            }
            Err(e) => {
                // Skip malformed rows
                #[cfg(debug_assertions)]
                eprintln!("Skipping malformed row: {}", e);
                continue;
            }
        }
    }

    Ok(engine)
}

/// Applies one operation to the engine.
fn apply(engine: &Engine, op: Operation) -> Result<(), guesthouse_ledger_rs::LedgerError> {
    match op {
        Operation::AddRoom { name, price } => {
            engine.store().rooms().create(name, price);
        }
        Operation::AddMeal { name, price } => {
            engine.store().meals().create(name, price);
        }
        Operation::AddCard { number, balance } => {
            engine.store().cards().create(&number, balance)?;
        }
        Operation::Reserve(request) => {
            engine.create_reservation(request)?;
        }
        Operation::Pay(request) => {
            engine.process_payment(request)?;
        }
        Operation::Deposit(request) => {
            engine.deposit_funds(request)?;
        }
    }
    Ok(())
}

/// Write final card states to a CSV writer
///
/// Outputs all debit cards in CSV format with 2 decimal precision.
///
/// # CSV Format
///
/// Columns: `id, card_number, balance`
///
/// # Example
///
/// ```csv
/// id,card_number,balance
/// 1,4111111111111111,400.00
/// 2,5555666677778888,50.00
/// ```
///
/// # Errors
///
/// Returns a CSV error if writing fails.
pub fn write_cards<W: Write>(engine: &Engine, writer: W) -> Result<(), csv::Error> {
    let mut wtr = Writer::from_writer(writer);

    // Serialize each card snapshot
    for card in engine.store().cards().list() {
        wtr.serialize(card.as_ref())?;
    }

    // Flush to ensure all data is written
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Cursor;

    const HEADER: &str = "op,name,email,price,room,meal,check_in,check_out,card,amount,reservation\n";

    fn scenario(rows: &str) -> Engine {
        let csv = format!("{HEADER}{rows}");
        process_scenario(Cursor::new(csv)).unwrap()
    }

    #[test]
    fn parse_room_and_card_setup() {
        let engine = scenario(
            "room,101,,50.00,,,,,,,\n\
             card,,,,,,,,4111111111111111,500.00,\n",
        );

        assert_eq!(engine.store().rooms().list().len(), 1);
        let card = engine.store().cards().find_by_number("4111111111111111").unwrap();
        assert_eq!(card.balance(), dec!(500.00));
    }

    #[test]
    fn parse_reserve_and_pay_sequence() {
        let engine = scenario(
            "room,101,,50.00,,,,,,,\n\
             card,,,,,,,,4111111111111111,500.00,\n\
             reserve,Jane Doe,jane@example.com,,1,,2025-04-28,2025-04-30,,,\n\
             pay,,,,,,,,4111111111111111,100.00,1\n",
        );

        let card = engine.store().cards().find_by_number("4111111111111111").unwrap();
        assert_eq!(card.balance(), dec!(400.00));

        let reservations = engine.store().reservations().list();
        assert_eq!(reservations.len(), 1);
        assert_eq!(reservations[0].total_cost, dec!(100.00));
    }

    #[test]
    fn parse_deposit() {
        let engine = scenario(
            "card,,,,,,,,4111111111111111,100.00,\n\
             deposit,,,,,,,,4111111111111111,25.50,\n",
        );

        let card = engine.store().cards().find_by_number("4111111111111111").unwrap();
        assert_eq!(card.balance(), dec!(125.50));
        assert_eq!(engine.store().transactions().len(), 1);
    }

    #[test]
    fn failed_payment_is_skipped_but_audited() {
        let engine = scenario(
            "room,101,,50.00,,,,,,,\n\
             card,,,,,,,,4111111111111111,10.00,\n\
             reserve,Jane Doe,jane@example.com,,1,,2025-04-28,2025-04-30,,,\n\
             pay,,,,,,,,4111111111111111,100.00,1\n\
             deposit,,,,,,,,4111111111111111,5.00,\n",
        );

        // The insufficient-funds payment did not stop the deposit after it.
        let card = engine.store().cards().find_by_number("4111111111111111").unwrap();
        assert_eq!(card.balance(), dec!(15.00));

        // One failed withdrawal, one successful deposit.
        assert_eq!(engine.store().transactions().len(), 2);
    }

    #[test]
    fn parse_with_whitespace() {
        let engine = scenario(" room , 101 ,, 50.00 ,,,,,,,\n");
        assert_eq!(engine.store().rooms().list().len(), 1);
    }

    #[test]
    fn skip_malformed_rows() {
        let engine = scenario(
            "room,101,,50.00,,,,,,,\n\
             bogus,row,data,here,,,,,,,\n\
             room,102,,60.00,,,,,,,\n",
        );

        assert_eq!(engine.store().rooms().list().len(), 2); // Two valid rooms
    }

    #[test]
    fn write_cards_to_csv() {
        let engine = scenario(
            "card,,,,,,,,4111111111111111,500.00,\n\
             card,,,,,,,,5555666677778888,50.00,\n",
        );

        let mut output = Vec::new();
        write_cards(&engine, &mut output).unwrap();

        let output_str = String::from_utf8(output).unwrap();
        assert!(output_str.contains("id,card_number,balance"));
        assert!(output_str.contains("4111111111111111,500.00"));
    }
}

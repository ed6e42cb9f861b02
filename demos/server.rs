//! REST API server example for the guest-house ledger.
//!
//! Run with: `cargo run --example server`
//!
//! ## Endpoints
//!
//! - CRUD `/rooms`, `/meals`, `/guests`, `/debitcards`
//! - `POST /reservations` - Create a reservation (reserves the room)
//! - `GET/PUT/DELETE /reservations/{id}` - Standard reservation access
//! - `GET /transactions`, `GET /transactions/{id}` - Read-only audit log
//! - `POST /payments` - Pay for a reservation with a debit card
//! - `POST /deposit_funds` - Deposit funds onto a debit card
//!
//! ## Example Usage
//!
//! ```bash
//! # Create a room and a card
//! curl -X POST http://localhost:3000/rooms \
//!   -H "Content-Type: application/json" \
//!   -d '{"name": "101", "price_per_night": "50.00"}'
//! curl -X POST http://localhost:3000/debitcards \
//!   -H "Content-Type: application/json" \
//!   -d '{"card_number": "4111111111111111", "balance": "500.00"}'
//!
//! # Book the room
//! curl -X POST http://localhost:3000/reservations \
//!   -H "Content-Type: application/json" \
//!   -d '{"guest_name": "Jane Doe", "guest_email": "jane@example.com", "room_id": 1, "check_in_date": "2025-04-28", "check_out_date": "2025-04-30"}'
//!
//! # Pay for it
//! curl -X POST http://localhost:3000/payments \
//!   -H "Content-Type: application/json" \
//!   -d '{"card_number": "4111111111111111", "amount": "100.00", "reservation_id": 1}'
//! ```

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::NaiveDate;
use guesthouse_ledger_rs::{
    CardId, DebitCard, DepositRequest, Engine, Guest, GuestId, LedgerError, Meal, MealId,
    PaymentRequest, Reservation, ReservationId, ReservationRequest, Room, RoomId, Transaction,
    TransactionId, format_amount, money,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;

// === Request/Response DTOs ===

#[derive(Debug, Deserialize)]
pub struct RoomBody {
    pub name: String,
    pub price_per_night: Decimal,
    #[serde(default = "default_available")]
    pub is_available: bool,
}

fn default_available() -> bool {
    true
}

#[derive(Debug, Serialize)]
pub struct RoomResponse {
    pub id: u32,
    pub name: String,
    #[serde(serialize_with = "money::serialize")]
    pub price_per_night: Decimal,
    pub is_available: bool,
}

impl From<&Room> for RoomResponse {
    fn from(room: &Room) -> Self {
        RoomResponse {
            id: room.id().0,
            name: room.name(),
            price_per_night: room.price_per_night(),
            is_available: room.is_available(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct MealBody {
    pub name: String,
    pub price: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct GuestBody {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct CardBody {
    pub card_number: String,
    pub balance: Decimal,
}

#[derive(Debug, Serialize)]
pub struct CardResponse {
    pub id: u32,
    pub card_number: String,
    #[serde(serialize_with = "money::serialize")]
    pub balance: Decimal,
}

impl From<&DebitCard> for CardResponse {
    fn from(card: &DebitCard) -> Self {
        CardResponse {
            id: card.id().0,
            card_number: card.card_number(),
            balance: card.balance(),
        }
    }
}

/// Body for `POST /reservations`. Fields are optional here; the engine
/// validates presence and reports what is missing.
#[derive(Debug, Deserialize)]
pub struct ReservationBody {
    pub guest_name: Option<String>,
    pub guest_email: Option<String>,
    pub room_id: Option<u32>,
    pub meal_id: Option<u32>,
    pub check_in_date: Option<NaiveDate>,
    pub check_out_date: Option<NaiveDate>,
}

impl ReservationBody {
    fn into_request(self) -> ReservationRequest {
        ReservationRequest {
            guest_name: self.guest_name,
            guest_email: self.guest_email,
            room_id: self.room_id.map(RoomId),
            meal_id: self.meal_id.map(MealId),
            check_in_date: self.check_in_date,
            check_out_date: self.check_out_date,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ReservationUpdateBody {
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
}

#[derive(Debug, Serialize)]
pub struct ReservationCreatedResponse {
    pub message: String,
    pub payment_url: String,
    pub reservation_id: u32,
}

#[derive(Debug, Deserialize)]
pub struct PaymentBody {
    pub card_number: Option<String>,
    pub amount: Option<Decimal>,
    pub reservation_id: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct DepositBody {
    pub card_number: Option<String>,
    pub amount: Option<Decimal>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// === Application State ===

/// Shared application state containing the booking engine.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Engine>,
}

// === Error Handling ===

/// Wrapper for converting `LedgerError` into HTTP responses.
///
/// Every business failure (unavailable room, unknown meal or card,
/// insufficient funds, bad dates) is a 400 with a human-readable body.
/// By-id misses on plain CRUD routes are handled in the handlers as 404s.
pub struct AppError(LedgerError);

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        AppError(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

fn not_found(what: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: format!("{what} not found"),
        }),
    )
}

fn bad_request(error: &LedgerError) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
}

// === Room Handlers ===

async fn list_rooms(State(state): State<AppState>) -> Json<Vec<RoomResponse>> {
    let rooms = state.engine.store().rooms().list();
    Json(rooms.iter().map(|room| room.as_ref().into()).collect())
}

async fn create_room(
    State(state): State<AppState>,
    Json(body): Json<RoomBody>,
) -> (StatusCode, Json<RoomResponse>) {
    let room = state
        .engine
        .store()
        .rooms()
        .create(body.name, body.price_per_night);
    (StatusCode::CREATED, Json(room.as_ref().into()))
}

async fn get_room(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Json<RoomResponse>, (StatusCode, Json<ErrorResponse>)> {
    state
        .engine
        .store()
        .rooms()
        .get(RoomId(id))
        .map(|room| Json(room.as_ref().into()))
        .ok_or_else(|| not_found("Room"))
}

async fn update_room(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    Json(body): Json<RoomBody>,
) -> Result<Json<RoomResponse>, (StatusCode, Json<ErrorResponse>)> {
    state
        .engine
        .store()
        .rooms()
        .update(RoomId(id), body.name, body.price_per_night, body.is_available)
        .map(|room| Json(room.as_ref().into()))
        .map_err(|_| not_found("Room"))
}

async fn delete_room(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<StatusCode, (StatusCode, Json<ErrorResponse>)> {
    state
        .engine
        .store()
        .delete_room(RoomId(id))
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(|_| not_found("Room"))
}

// === Meal Handlers ===

async fn list_meals(State(state): State<AppState>) -> Json<Vec<Meal>> {
    Json(state.engine.store().meals().list())
}

async fn create_meal(
    State(state): State<AppState>,
    Json(body): Json<MealBody>,
) -> (StatusCode, Json<Meal>) {
    let meal = state.engine.store().meals().create(body.name, body.price);
    (StatusCode::CREATED, Json(meal))
}

async fn get_meal(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Json<Meal>, (StatusCode, Json<ErrorResponse>)> {
    state
        .engine
        .store()
        .meals()
        .get(MealId(id))
        .map(Json)
        .ok_or_else(|| not_found("Meal"))
}

async fn update_meal(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    Json(body): Json<MealBody>,
) -> Result<Json<Meal>, (StatusCode, Json<ErrorResponse>)> {
    state
        .engine
        .store()
        .meals()
        .update(MealId(id), body.name, body.price)
        .map(Json)
        .map_err(|_| not_found("Meal"))
}

async fn delete_meal(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<StatusCode, (StatusCode, Json<ErrorResponse>)> {
    state
        .engine
        .store()
        .delete_meal(MealId(id))
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(|_| not_found("Meal"))
}

// === Guest Handlers ===

async fn list_guests(State(state): State<AppState>) -> Json<Vec<Guest>> {
    Json(state.engine.store().guests().list())
}

async fn create_guest(
    State(state): State<AppState>,
    Json(body): Json<GuestBody>,
) -> Result<(StatusCode, Json<Guest>), AppError> {
    let guest = state.engine.store().guests().create(&body.name, &body.email)?;
    Ok((StatusCode::CREATED, Json(guest)))
}

async fn get_guest(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Json<Guest>, (StatusCode, Json<ErrorResponse>)> {
    state
        .engine
        .store()
        .guests()
        .get(GuestId(id))
        .map(Json)
        .ok_or_else(|| not_found("Guest"))
}

async fn update_guest(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    Json(body): Json<GuestBody>,
) -> Result<Json<Guest>, (StatusCode, Json<ErrorResponse>)> {
    state
        .engine
        .store()
        .guests()
        .update(GuestId(id), &body.name, &body.email)
        .map(Json)
        .map_err(|error| match error {
            LedgerError::GuestNotFound(_) => not_found("Guest"),
            other => bad_request(&other),
        })
}

async fn delete_guest(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<StatusCode, (StatusCode, Json<ErrorResponse>)> {
    state
        .engine
        .store()
        .delete_guest(GuestId(id))
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(|_| not_found("Guest"))
}

// === Debit Card Handlers ===

async fn list_cards(State(state): State<AppState>) -> Json<Vec<CardResponse>> {
    let cards = state.engine.store().cards().list();
    Json(cards.iter().map(|card| card.as_ref().into()).collect())
}

async fn create_card(
    State(state): State<AppState>,
    Json(body): Json<CardBody>,
) -> Result<(StatusCode, Json<CardResponse>), AppError> {
    let card = state
        .engine
        .store()
        .cards()
        .create(&body.card_number, body.balance)?;
    Ok((StatusCode::CREATED, Json(card.as_ref().into())))
}

async fn get_card(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Json<CardResponse>, (StatusCode, Json<ErrorResponse>)> {
    state
        .engine
        .store()
        .cards()
        .get(CardId(id))
        .map(|card| Json(card.as_ref().into()))
        .ok_or_else(|| not_found("Debit card"))
}

async fn update_card(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    Json(body): Json<CardBody>,
) -> Result<Json<CardResponse>, (StatusCode, Json<ErrorResponse>)> {
    state
        .engine
        .store()
        .cards()
        .update(CardId(id), &body.card_number, body.balance)
        .map(|card| Json(card.as_ref().into()))
        .map_err(|error| match error {
            LedgerError::CardNotFound => not_found("Debit card"),
            other => bad_request(&other),
        })
}

async fn delete_card(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<StatusCode, (StatusCode, Json<ErrorResponse>)> {
    state
        .engine
        .store()
        .delete_card(CardId(id))
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(|_| not_found("Debit card"))
}

// === Reservation Handlers ===

/// POST /reservations - Create a reservation, reserving the room.
async fn create_reservation(
    State(state): State<AppState>,
    Json(body): Json<ReservationBody>,
) -> Result<(StatusCode, Json<ReservationCreatedResponse>), AppError> {
    let reservation = state.engine.create_reservation(body.into_request())?;
    Ok((
        StatusCode::CREATED,
        Json(ReservationCreatedResponse {
            message: "Reservation created. Redirecting to payment...".to_string(),
            payment_url: "/payments".to_string(),
            reservation_id: reservation.id.0,
        }),
    ))
}

async fn list_reservations(State(state): State<AppState>) -> Json<Vec<Reservation>> {
    Json(state.engine.store().reservations().list())
}

async fn get_reservation(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Json<Reservation>, (StatusCode, Json<ErrorResponse>)> {
    state
        .engine
        .store()
        .reservations()
        .get(ReservationId(id))
        .map(Json)
        .ok_or_else(|| not_found("Reservation"))
}

async fn update_reservation(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    Json(body): Json<ReservationUpdateBody>,
) -> Result<Json<Reservation>, (StatusCode, Json<ErrorResponse>)> {
    state
        .engine
        .store()
        .reservations()
        .update_dates(ReservationId(id), body.check_in_date, body.check_out_date)
        .map(Json)
        .map_err(|_| not_found("Reservation"))
}

async fn delete_reservation(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<StatusCode, (StatusCode, Json<ErrorResponse>)> {
    state
        .engine
        .store()
        .delete_reservation(ReservationId(id))
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(|_| not_found("Reservation"))
}

// === Transaction Handlers (read-only audit log) ===

async fn list_transactions(State(state): State<AppState>) -> Json<Vec<Transaction>> {
    let transactions = state.engine.store().transactions().list();
    Json(transactions.iter().map(|tx| tx.as_ref().clone()).collect())
}

async fn get_transaction(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Json<Transaction>, (StatusCode, Json<ErrorResponse>)> {
    state
        .engine
        .store()
        .transactions()
        .get(TransactionId(id))
        .map(|tx| Json(tx.as_ref().clone()))
        .ok_or_else(|| not_found("Transaction"))
}

// === Payment / Deposit Handlers ===

/// POST /payments - Pay for a reservation with a debit card.
async fn process_payment(
    State(state): State<AppState>,
    Json(body): Json<PaymentBody>,
) -> Result<Json<MessageResponse>, AppError> {
    let receipt = state.engine.process_payment(PaymentRequest {
        card_number: body.card_number,
        amount: body.amount,
        reservation_id: body.reservation_id.map(ReservationId),
    })?;
    Ok(Json(MessageResponse {
        message: format!("Payment of {} successful.", format_amount(receipt.amount)),
    }))
}

/// POST /deposit_funds - Deposit funds onto a debit card.
async fn deposit_funds(
    State(state): State<AppState>,
    Json(body): Json<DepositBody>,
) -> Result<Json<MessageResponse>, AppError> {
    let receipt = state.engine.deposit_funds(DepositRequest {
        card_number: body.card_number,
        amount: body.amount,
    })?;
    Ok(Json(MessageResponse {
        message: format!("Deposit of {} successful.", format_amount(receipt.amount)),
    }))
}

// === Router ===

fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/rooms", get(list_rooms).post(create_room))
        .route(
            "/rooms/{id}",
            get(get_room).put(update_room).delete(delete_room),
        )
        .route("/meals", get(list_meals).post(create_meal))
        .route(
            "/meals/{id}",
            get(get_meal).put(update_meal).delete(delete_meal),
        )
        .route("/guests", get(list_guests).post(create_guest))
        .route(
            "/guests/{id}",
            get(get_guest).put(update_guest).delete(delete_guest),
        )
        .route("/debitcards", get(list_cards).post(create_card))
        .route(
            "/debitcards/{id}",
            get(get_card).put(update_card).delete(delete_card),
        )
        .route(
            "/reservations",
            get(list_reservations).post(create_reservation),
        )
        .route(
            "/reservations/{id}",
            get(get_reservation)
                .put(update_reservation)
                .delete(delete_reservation),
        )
        .route("/transactions", get(list_transactions))
        .route("/transactions/{id}", get(get_transaction))
        .route("/payments", post(process_payment))
        .route("/deposit_funds", post(deposit_funds))
        .with_state(state)
}

// === Main ===

#[tokio::main]
async fn main() {
    let state = AppState {
        engine: Arc::new(Engine::new()),
    };

    let app = create_router(state);

    let listener = TcpListener::bind("127.0.0.1:3000").await.unwrap();
    println!("Guest-house ledger API running on http://127.0.0.1:3000");
    println!();
    println!("Endpoints:");
    println!("  CRUD /rooms /meals /guests /debitcards /reservations");
    println!("  GET  /transactions       - Audit log");
    println!("  POST /payments           - Pay for a reservation");
    println!("  POST /deposit_funds      - Deposit onto a card");

    axum::serve(listener, app).await.unwrap();
}

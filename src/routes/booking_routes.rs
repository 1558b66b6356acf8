//! Rutas de reservas
//!
//! El adapter HTTP hace aquí sus precondiciones (fechas bien formadas,
//! ventana no en pasado, query params) antes de invocar al controller;
//! los mensajes de error de binding se devuelven tal cual.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use uuid::Uuid;
use validator::Validate;

use crate::controllers::booking_controller::BookingController;
use crate::dto::booking_dto::{
    AddFeedbackRequest, AddMessageRequest, AvailabilityQuery, AvailableVehicleResponse,
    BookingActionRequest, BookingQuery, BookingResponse, CreateBookingRequest, RateBookingRequest,
};
use crate::services::booking_lifecycle::LifecycleAction;
use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};

pub fn create_booking_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_bookings).post(create_booking))
        .route("/admin", get(get_admin_bookings))
        .route("/available-vehicles", get(get_available_vehicles))
        .route("/message", post(add_message))
        .route("/cancel", patch(cancel_booking))
        .route("/confirm", patch(confirm_booking))
        .route("/finish", patch(finish_booking))
        .route("/feedback", patch(add_feedback))
        .route("/rate", patch(rate_booking))
}

fn parse_rfc3339(value: Option<&str>, label: &str) -> AppResult<DateTime<Utc>> {
    value
        .and_then(|v| DateTime::parse_from_rfc3339(v).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| AppError::BadRequest(format!("invalid {} date", label)))
}

async fn get_available_vehicles(
    State(state): State<AppState>,
    Query(query): Query<AvailabilityQuery>,
) -> AppResult<Json<Vec<AvailableVehicleResponse>>> {
    let from = parse_rfc3339(query.from.as_deref(), "from")?;
    let to = parse_rfc3339(query.to.as_deref(), "to")?;

    let controller = BookingController::new(state.pool.clone());
    let response = controller.available_vehicles(from, to).await?;

    Ok(Json(response))
}

async fn create_booking(
    State(state): State<AppState>,
    Json(request): Json<CreateBookingRequest>,
) -> AppResult<(StatusCode, Json<BookingResponse>)> {
    request.validate()?;

    // Precondiciones del adapter: la ventana no empieza en el pasado ni
    // al revés. La disponibilidad NO se revalida aquí.
    if request.start_date < Utc::now() {
        return Err(AppError::BadRequest(
            "start date cannot be in the past".to_string(),
        ));
    }

    if request.start_date > request.end_date {
        return Err(AppError::BadRequest(
            "start date cannot be after end date".to_string(),
        ));
    }

    let controller = BookingController::new(state.pool.clone());
    let response = controller.create(request).await?;

    Ok((StatusCode::CREATED, Json(response)))
}

async fn cancel_booking(
    State(state): State<AppState>,
    Json(request): Json<BookingActionRequest>,
) -> AppResult<Json<BookingResponse>> {
    let controller = BookingController::new(state.pool.clone());
    let response = controller.transition(LifecycleAction::Cancel, request).await?;

    Ok(Json(response))
}

async fn confirm_booking(
    State(state): State<AppState>,
    Json(request): Json<BookingActionRequest>,
) -> AppResult<Json<BookingResponse>> {
    let controller = BookingController::new(state.pool.clone());
    let response = controller.transition(LifecycleAction::Confirm, request).await?;

    Ok(Json(response))
}

async fn finish_booking(
    State(state): State<AppState>,
    Json(request): Json<BookingActionRequest>,
) -> AppResult<Json<BookingResponse>> {
    let controller = BookingController::new(state.pool.clone());
    let response = controller.transition(LifecycleAction::Finish, request).await?;

    Ok(Json(response))
}

async fn add_feedback(
    State(state): State<AppState>,
    Json(request): Json<AddFeedbackRequest>,
) -> AppResult<Json<BookingResponse>> {
    request.validate()?;

    let controller = BookingController::new(state.pool.clone());
    let response = controller.add_feedback(request).await?;

    Ok(Json(response))
}

async fn rate_booking(
    State(state): State<AppState>,
    Json(request): Json<RateBookingRequest>,
) -> AppResult<Json<BookingResponse>> {
    // El binding original marca rating como required, así que el valor
    // cero del tipo se rechaza
    if request.rating == 0 {
        return Err(AppError::BadRequest("rating is required".to_string()));
    }

    let controller = BookingController::new(state.pool.clone());
    let response = controller.rate(request).await?;

    Ok(Json(response))
}

async fn add_message(
    State(state): State<AppState>,
    Json(request): Json<AddMessageRequest>,
) -> AppResult<Json<BookingResponse>> {
    request.validate()?;

    let controller = BookingController::new(state.pool.clone());
    let response = controller.add_message(request).await?;

    Ok(Json(response))
}

async fn get_bookings(
    State(state): State<AppState>,
    Query(query): Query<BookingQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let controller = BookingController::new(state.pool.clone());

    // La búsqueda por booking_id tiene prioridad sobre user_id
    let booking_id = query.booking_id.as_deref().filter(|s| !s.is_empty());
    let user_id = query.user_id.as_deref().filter(|s| !s.is_empty());

    if booking_id.is_none() && user_id.is_none() {
        return Err(AppError::BadRequest(
            "invalid query params, required booking_id or user_id".to_string(),
        ));
    }

    if let Some(raw) = booking_id {
        let id = Uuid::parse_str(raw)
            .map_err(|_| AppError::BadRequest("invalid booking id".to_string()))?;
        let response = controller.get_by_id(id).await?;
        return Ok(Json(serde_json::to_value(response).map_err(|e| {
            AppError::Internal(e.to_string())
        })?));
    }

    // user_id presente por el chequeo de arriba
    let raw = user_id.unwrap_or_default();
    let id =
        Uuid::parse_str(raw).map_err(|_| AppError::BadRequest("invalid user id".to_string()))?;
    let response = controller.list_by_user(id).await?;

    Ok(Json(serde_json::to_value(response).map_err(|e| {
        AppError::Internal(e.to_string())
    })?))
}

async fn get_admin_bookings(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<BookingResponse>>> {
    let controller = BookingController::new(state.pool.clone());
    let response = controller.list_all().await?;

    Ok(Json(response))
}

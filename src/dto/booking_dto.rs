use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::booking::{BookingDetails, BookingMessage, BookingStatus};
use crate::models::vehicle::{Vehicle, VehicleStatus};

// Request para crear una reserva
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBookingRequest {
    pub user_id: Uuid,
    pub vehicle_id: Uuid,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,

    #[validate(length(min = 1))]
    pub pick_up_location: String,

    #[validate(length(min = 1))]
    pub drop_off_location: String,
}

// Request compartido por cancel/confirm/finish
#[derive(Debug, Deserialize)]
pub struct BookingActionRequest {
    pub id: Uuid,
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddFeedbackRequest {
    pub id: Uuid,
    pub user_id: Uuid,

    #[validate(length(min = 1))]
    pub feedback: String,
}

#[derive(Debug, Deserialize)]
pub struct RateBookingRequest {
    pub id: Uuid,
    pub user_id: Uuid,
    pub rating: i32,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddMessageRequest {
    pub id: Uuid,
    pub user_id: Uuid,

    #[validate(length(min = 1))]
    pub message: String,
}

// Query params de GET /bookings: se aceptan como strings para poder
// devolver los mensajes de error del contrato original
#[derive(Debug, Deserialize)]
pub struct BookingQuery {
    pub booking_id: Option<String>,
    pub user_id: Option<String>,
}

// Query params de GET /bookings/available-vehicles
#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

// Response de vehículo disponible
#[derive(Debug, Serialize)]
pub struct AvailableVehicleResponse {
    pub id: Uuid,
    pub status: VehicleStatus,
    pub brand_model: String,
    pub brand: String,
    pub transmission_type: String,
    pub year: i32,
    #[serde(rename = "type")]
    pub vehicle_type: String,
    pub hourly_fare: f64,
}

impl From<Vehicle> for AvailableVehicleResponse {
    fn from(vehicle: Vehicle) -> Self {
        Self {
            id: vehicle.id,
            status: vehicle.status,
            brand_model: vehicle.brand_model,
            brand: vehicle.brand,
            transmission_type: vehicle.transmission_type,
            year: vehicle.year,
            vehicle_type: vehicle.vehicle_type,
            hourly_fare: vehicle.hourly_fare,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub booking_id: Uuid,
    pub message: String,
}

impl From<BookingMessage> for MessageResponse {
    fn from(message: BookingMessage) -> Self {
        Self {
            id: message.id,
            created_at: message.created_at,
            booking_id: message.booking_id,
            message: message.message,
        }
    }
}

// Response de reserva completa, con vehículo embebido y total calculado
#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub status: BookingStatus,
    pub user_id: Uuid,
    pub vehicle: AvailableVehicleResponse,
    pub observations: Option<String>,
    pub feedback: Option<String>,
    pub rating: Option<i32>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub pick_up_location: String,
    pub drop_off_location: String,
    pub hourly_fare: f64,
    pub total_amount: f64,
    pub messages: Vec<MessageResponse>,
}

impl From<BookingDetails> for BookingResponse {
    fn from(details: BookingDetails) -> Self {
        let booking = details.booking;
        // total_amount se calcula en cada lectura, nunca se almacena
        let total_amount = booking.total_amount();

        Self {
            id: booking.id,
            created_at: booking.created_at,
            updated_at: booking.updated_at,
            status: booking.status,
            user_id: booking.user_id,
            vehicle: details.vehicle.into(),
            observations: booking.observations,
            feedback: booking.feedback,
            rating: booking.rating,
            start_date: booking.start_date,
            end_date: booking.end_date,
            pick_up_location: booking.pick_up_location,
            drop_off_location: booking.drop_off_location,
            hourly_fare: booking.hourly_fare,
            total_amount,
            messages: details.messages.into_iter().map(Into::into).collect(),
        }
    }
}

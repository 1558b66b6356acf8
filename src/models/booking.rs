//! Modelo de Booking
//!
//! Este módulo contiene el booking, su enum de estados y los mensajes
//! asociados. El campo hourly_fare se copia del vehículo al crear la
//! reserva y no cambia nunca después, aunque la tarifa del vehículo
//! cambie más adelante.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

use crate::models::vehicle::Vehicle;

/// Estado de la reserva - mapea al ENUM booking_status
///
/// Estados terminales: Cancelled y Finished. Las transiciones válidas
/// viven en services::booking_lifecycle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "booking_status")]
pub enum BookingStatus {
    #[sqlx(rename = "reservado")]
    #[serde(rename = "reservado")]
    Reserved,
    #[sqlx(rename = "confirmado")]
    #[serde(rename = "confirmado")]
    Confirmed,
    #[sqlx(rename = "cancelado")]
    #[serde(rename = "cancelado")]
    Cancelled,
    #[sqlx(rename = "finalizado")]
    #[serde(rename = "finalizado")]
    Finished,
}

/// Booking - mapea exactamente a la tabla bookings
///
/// Observations es un string de auditoría que el sistema escribe en cada
/// transición ("Booking confirmed by admin", etc.). Mezcla nota libre y
/// log de transiciones; se conserva así a propósito (ver DESIGN.md).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Booking {
    pub id: Uuid,
    pub status: BookingStatus,
    pub user_id: Uuid,
    pub vehicle_id: Uuid,
    pub observations: Option<String>,
    pub rating: Option<i32>,
    pub feedback: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub pick_up_location: String,
    pub drop_off_location: String,
    pub hourly_fare: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Nueva reserva: siempre nace en Reserved con la tarifa del vehículo
    pub fn new(
        user_id: Uuid,
        vehicle_id: Uuid,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
        pick_up_location: String,
        drop_off_location: String,
        hourly_fare: f64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            status: BookingStatus::Reserved,
            user_id,
            vehicle_id,
            observations: None,
            rating: None,
            feedback: None,
            start_date,
            end_date,
            pick_up_location,
            drop_off_location,
            hourly_fare,
            created_at: now,
            updated_at: now,
        }
    }

    /// Importe total: horas fraccionarias de la ventana por la tarifa.
    /// Se calcula en cada lectura, nunca se almacena.
    pub fn total_amount(&self) -> f64 {
        let hours = (self.end_date - self.start_date).num_seconds() as f64 / 3600.0;
        hours * self.hourly_fare
    }
}

/// Mensaje de reserva - mapea exactamente a la tabla booking_messages
///
/// Append-only; el orden es el de inserción (created_at ascendente).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BookingMessage {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Booking con su vehículo y mensajes cargados (equivalente a los
/// preloads del gateway de persistencia)
#[derive(Debug, Clone)]
pub struct BookingDetails {
    pub booking: Booking,
    pub vehicle: Vehicle,
    pub messages: Vec<BookingMessage>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_total_amount_whole_hours() {
        let start = Utc.with_ymd_and_hms(2024, 1, 10, 10, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 1, 10, 14, 0, 0).unwrap();
        let booking = Booking::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            start,
            end,
            "aeropuerto".to_string(),
            "centro".to_string(),
            12.5,
        );

        assert_eq!(booking.total_amount(), 50.0);
    }

    #[test]
    fn test_total_amount_fractional_hours() {
        let start = Utc.with_ymd_and_hms(2024, 1, 10, 10, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 1, 10, 10, 30, 0).unwrap();
        let booking = Booking::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            start,
            end,
            "a".to_string(),
            "b".to_string(),
            10.0,
        );

        assert_eq!(booking.total_amount(), 5.0);
    }

    #[test]
    fn test_new_booking_starts_reserved() {
        let start = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 1, 12, 0, 0, 0).unwrap();
        let booking = Booking::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            start,
            end,
            "a".to_string(),
            "b".to_string(),
            8.0,
        );

        assert_eq!(booking.status, BookingStatus::Reserved);
        assert!(booking.observations.is_none());
        assert!(booking.feedback.is_none());
        assert!(booking.rating.is_none());
    }
}

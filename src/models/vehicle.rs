//! Modelo de Vehicle
//!
//! Mapea exactamente a la tabla vehicles. No existe superficie HTTP de
//! gestión de vehículos; las filas se cargan como fixtures. La
//! disponibilidad para reservas se deriva de los bookings (ver
//! VehicleRepository::find_available), no de este status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Estado del vehículo - mapea al ENUM vehicle_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "vehicle_status")]
pub enum VehicleStatus {
    #[sqlx(rename = "disponible")]
    #[serde(rename = "disponible")]
    Available,
    #[sqlx(rename = "mantenimiento")]
    #[serde(rename = "mantenimiento")]
    Maintenance,
    #[sqlx(rename = "fuera_de_servicio")]
    #[serde(rename = "fuera_de_servicio")]
    OutOfService,
}

/// Vehicle - mapea exactamente a la tabla vehicles
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    pub id: Uuid,
    pub status: VehicleStatus,
    pub brand: String,
    pub brand_model: String,
    pub transmission_type: String,
    pub year: i32,
    pub vehicle_type: String,
    pub hourly_fare: f64,
    pub created_at: DateTime<Utc>,
}

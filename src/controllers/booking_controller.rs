//! Orquestación de reservas
//!
//! Cada operación resuelve usuario/reserva contra los repositorios,
//! delega la decisión en services::booking_lifecycle y persiste el
//! resultado. El fetch-then-update no lleva token de concurrencia
//! optimista: dos transiciones concurrentes sobre la misma reserva
//! pueden pisarse (ver DESIGN.md).

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::booking_dto::{
    AddFeedbackRequest, AddMessageRequest, AvailableVehicleResponse, BookingActionRequest,
    BookingResponse, CreateBookingRequest, RateBookingRequest,
};
use crate::models::booking::{Booking, BookingDetails};
use crate::repositories::booking_repository::BookingRepository;
use crate::repositories::user_repository::UserRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::services::booking_lifecycle::{self, LifecycleAction};
use crate::utils::errors::AppError;

pub struct BookingController {
    users: UserRepository,
    vehicles: VehicleRepository,
    bookings: BookingRepository,
}

impl BookingController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            vehicles: VehicleRepository::new(pool.clone()),
            bookings: BookingRepository::new(pool),
        }
    }

    pub async fn available_vehicles(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<AvailableVehicleResponse>, AppError> {
        let vehicles = self.vehicles.find_available(from, to).await?;
        Ok(vehicles.into_iter().map(Into::into).collect())
    }

    /// Crea la reserva sin revalidar el solape de disponibilidad: eso es
    /// responsabilidad del caller vía available_vehicles (carrera
    /// conocida, ver DESIGN.md)
    pub async fn create(&self, request: CreateBookingRequest) -> Result<BookingResponse, AppError> {
        let user = self
            .users
            .find_by_id(request.user_id)
            .await?
            .ok_or(AppError::UserNotFound)?;

        let vehicle = self
            .vehicles
            .find_by_id(request.vehicle_id)
            .await?
            .ok_or(AppError::VehicleNotFound)?;

        // La tarifa se congela aquí: cambios posteriores en el vehículo
        // no afectan a reservas existentes
        let booking = Booking::new(
            user.id,
            vehicle.id,
            request.start_date,
            request.end_date,
            request.pick_up_location,
            request.drop_off_location,
            vehicle.hourly_fare,
        );

        let saved = self.bookings.create(&booking).await?;

        tracing::info!("Reserva creada: {} (vehículo {})", saved.id, vehicle.id);

        Ok(BookingDetails {
            booking: saved,
            vehicle,
            messages: Vec::new(),
        }
        .into())
    }

    /// Camino compartido por cancel/confirm/finish: autorización
    /// dueño-o-admin y tabla de transiciones
    pub async fn transition(
        &self,
        action: LifecycleAction,
        request: BookingActionRequest,
    ) -> Result<BookingResponse, AppError> {
        // Un user_id desconocido es fallo de credenciales, no un 404
        let user = self
            .users
            .find_by_id(request.user_id)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let details = self
            .bookings
            .find_by_id(request.id)
            .await?
            .ok_or(AppError::BookingNotFound)?;

        if !booking_lifecycle::can_manage(&details.booking, &user) {
            return Err(AppError::InvalidCredentials);
        }

        let next = action.apply(details.booking.status)?;
        let observations = action.observation(user.role);

        let updated = self
            .bookings
            .update_status(details.booking.id, next, &observations)
            .await?;

        tracing::info!("Reserva {}: {:?} -> {:?}", updated.id, details.booking.status, next);

        Ok(BookingDetails {
            booking: updated,
            vehicle: details.vehicle,
            messages: details.messages,
        }
        .into())
    }

    pub async fn add_feedback(
        &self,
        request: AddFeedbackRequest,
    ) -> Result<BookingResponse, AppError> {
        let user = self
            .users
            .find_by_id(request.user_id)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let details = self
            .bookings
            .find_by_id(request.id)
            .await?
            .ok_or(AppError::BookingNotFound)?;

        if !booking_lifecycle::is_owning_client(&details.booking, &user) {
            return Err(AppError::InvalidCredentials);
        }

        booking_lifecycle::require_finished(details.booking.status)?;
        booking_lifecycle::require_no_feedback(&details.booking)?;

        let updated = self
            .bookings
            .set_feedback(details.booking.id, &request.feedback)
            .await?;

        Ok(BookingDetails {
            booking: updated,
            vehicle: details.vehicle,
            messages: details.messages,
        }
        .into())
    }

    /// Mismos guards que add_feedback pero sin control de "ya puntuado":
    /// el rating es sobrescribible tantas veces como se quiera
    pub async fn rate(&self, request: RateBookingRequest) -> Result<BookingResponse, AppError> {
        let user = self
            .users
            .find_by_id(request.user_id)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let details = self
            .bookings
            .find_by_id(request.id)
            .await?
            .ok_or(AppError::BookingNotFound)?;

        if !booking_lifecycle::is_owning_client(&details.booking, &user) {
            return Err(AppError::InvalidCredentials);
        }

        booking_lifecycle::require_finished(details.booking.status)?;

        let updated = self.bookings.set_rating(details.booking.id, request.rating).await?;

        Ok(BookingDetails {
            booking: updated,
            vehicle: details.vehicle,
            messages: details.messages,
        }
        .into())
    }

    /// Los mensajes no tienen guard de estado: se pueden añadir con la
    /// reserva en cualquier estado
    pub async fn add_message(
        &self,
        request: AddMessageRequest,
    ) -> Result<BookingResponse, AppError> {
        let user = self
            .users
            .find_by_id(request.user_id)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let details = self
            .bookings
            .find_by_id(request.id)
            .await?
            .ok_or(AppError::BookingNotFound)?;

        if !booking_lifecycle::is_owning_client(&details.booking, &user) {
            return Err(AppError::InvalidCredentials);
        }

        let (booking, message) = self
            .bookings
            .add_message(details.booking.id, &request.message)
            .await?;

        let mut messages = details.messages;
        messages.push(message);

        Ok(BookingDetails {
            booking,
            vehicle: details.vehicle,
            messages,
        }
        .into())
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<BookingResponse, AppError> {
        let details = self
            .bookings
            .find_by_id(id)
            .await?
            .ok_or(AppError::BookingNotFound)?;

        Ok(details.into())
    }

    pub async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<BookingResponse>, AppError> {
        let details = self.bookings.find_by_user(user_id).await?;
        Ok(details.into_iter().map(Into::into).collect())
    }

    pub async fn list_all(&self) -> Result<Vec<BookingResponse>, AppError> {
        let details = self.bookings.find_all().await?;
        Ok(details.into_iter().map(Into::into).collect())
    }
}

use crate::models::booking::{Booking, BookingDetails, BookingMessage, BookingStatus};
use crate::models::vehicle::Vehicle;
use crate::utils::errors::AppError;
use chrono::Utc;
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, booking: &Booking) -> Result<Booking, AppError> {
        let result = sqlx::query_as::<_, Booking>(
            r#"
            INSERT INTO bookings (
                id, status, user_id, vehicle_id, observations, rating, feedback,
                start_date, end_date, pick_up_location, drop_off_location,
                hourly_fare, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING *
            "#,
        )
        .bind(booking.id)
        .bind(booking.status)
        .bind(booking.user_id)
        .bind(booking.vehicle_id)
        .bind(&booking.observations)
        .bind(booking.rating)
        .bind(&booking.feedback)
        .bind(booking.start_date)
        .bind(booking.end_date)
        .bind(&booking.pick_up_location)
        .bind(&booking.drop_off_location)
        .bind(booking.hourly_fare)
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(result)
    }

    /// Reserva con vehículo y mensajes cargados, o None si no existe
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<BookingDetails>, AppError> {
        let booking = sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        let Some(booking) = booking else {
            return Ok(None);
        };

        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
            .bind(booking.vehicle_id)
            .fetch_one(&self.pool)
            .await?;

        let messages = sqlx::query_as::<_, BookingMessage>(
            "SELECT * FROM booking_messages WHERE booking_id = $1 ORDER BY created_at ASC",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(BookingDetails {
            booking,
            vehicle,
            messages,
        }))
    }

    pub async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<BookingDetails>, AppError> {
        let bookings = sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE user_id = $1 ORDER BY start_date ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        self.attach_details(bookings).await
    }

    /// Vista de admin: todas las reservas, ordenadas por fecha de inicio
    pub async fn find_all(&self) -> Result<Vec<BookingDetails>, AppError> {
        let bookings =
            sqlx::query_as::<_, Booking>("SELECT * FROM bookings ORDER BY start_date ASC")
                .fetch_all(&self.pool)
                .await?;

        self.attach_details(bookings).await
    }

    pub async fn update_status(
        &self,
        id: Uuid,
        status: BookingStatus,
        observations: &str,
    ) -> Result<Booking, AppError> {
        let result = sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings
            SET status = $2, observations = $3, updated_at = $4
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(observations)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(result)
    }

    pub async fn set_feedback(&self, id: Uuid, feedback: &str) -> Result<Booking, AppError> {
        let result = sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings
            SET feedback = $2, updated_at = $3
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(feedback)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(result)
    }

    pub async fn set_rating(&self, id: Uuid, rating: i32) -> Result<Booking, AppError> {
        let result = sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings
            SET rating = $2, updated_at = $3
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(rating)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(result)
    }

    /// Añade un mensaje y toca updated_at de la reserva, igual que el
    /// guardado completo del sistema original. Devuelve la reserva
    /// refrescada junto al mensaje insertado.
    pub async fn add_message(
        &self,
        booking_id: Uuid,
        message: &str,
    ) -> Result<(Booking, BookingMessage), AppError> {
        let message = sqlx::query_as::<_, BookingMessage>(
            r#"
            INSERT INTO booking_messages (id, booking_id, message, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(booking_id)
        .bind(message)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        let booking = sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings
            SET updated_at = $2
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(booking_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok((booking, message))
    }

    /// Carga vehículos y mensajes de un lote de reservas en dos queries
    /// (equivalente a los preloads del cliente gorm original)
    async fn attach_details(
        &self,
        bookings: Vec<Booking>,
    ) -> Result<Vec<BookingDetails>, AppError> {
        if bookings.is_empty() {
            return Ok(Vec::new());
        }

        let vehicle_ids: Vec<Uuid> = bookings.iter().map(|b| b.vehicle_id).collect();
        let booking_ids: Vec<Uuid> = bookings.iter().map(|b| b.id).collect();

        let vehicles = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = ANY($1)")
            .bind(&vehicle_ids)
            .fetch_all(&self.pool)
            .await?;
        let vehicles_by_id: HashMap<Uuid, Vehicle> =
            vehicles.into_iter().map(|v| (v.id, v)).collect();

        let messages = sqlx::query_as::<_, BookingMessage>(
            "SELECT * FROM booking_messages WHERE booking_id = ANY($1) ORDER BY created_at ASC",
        )
        .bind(&booking_ids)
        .fetch_all(&self.pool)
        .await?;
        let mut messages_by_booking: HashMap<Uuid, Vec<BookingMessage>> = HashMap::new();
        for message in messages {
            messages_by_booking
                .entry(message.booking_id)
                .or_default()
                .push(message);
        }

        let mut details = Vec::with_capacity(bookings.len());
        for booking in bookings {
            // Varias reservas pueden apuntar al mismo vehículo
            let vehicle = vehicles_by_id.get(&booking.vehicle_id).cloned().ok_or_else(|| {
                AppError::Internal(format!(
                    "booking {} references missing vehicle {}",
                    booking.id, booking.vehicle_id
                ))
            })?;
            let messages = messages_by_booking.remove(&booking.id).unwrap_or_default();
            details.push(BookingDetails {
                booking,
                vehicle,
                messages,
            });
        }

        Ok(details)
    }
}

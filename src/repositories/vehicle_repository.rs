use crate::models::vehicle::Vehicle;
use crate::utils::errors::AppError;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

pub struct VehicleRepository {
    pool: PgPool,
}

impl VehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Vehicle>, AppError> {
        let result = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(result)
    }

    /// Vehículos sin ninguna reserva activa que solape la ventana
    /// [from, to). La condición de solape es la misma que
    /// `booking_lifecycle::windows_overlap`
    /// (start_date < to AND end_date > from); solo cuentan las reservas
    /// en estado reservado o confirmado. Diferencia de conjuntos contra
    /// todos los vehículos, no un flag almacenado.
    pub async fn find_available(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Vehicle>, AppError> {
        let vehicles = sqlx::query_as::<_, Vehicle>(
            r#"
            SELECT * FROM vehicles
            WHERE id NOT IN (
                SELECT vehicle_id FROM bookings
                WHERE start_date < $1
                  AND end_date > $2
                  AND status IN ('reservado', 'confirmado')
            )
            "#,
        )
        .bind(to)
        .bind(from)
        .fetch_all(&self.pool)
        .await?;

        Ok(vehicles)
    }
}

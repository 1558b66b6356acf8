//! Máquina de estados de la reserva
//!
//! Lógica de decisión pura del ciclo de vida: dado el estado actual, la
//! identidad/rol del usuario que actúa y la operación, decide el estado
//! siguiente, el resultado de autorización y la observación a persistir.
//! No toca la base de datos, así que se puede testear aislada.
//!
//! Grafo de estados permitido:
//!   reservado -> confirmado -> finalizado
//!   reservado -> cancelado
//! Una reserva confirmada no puede cancelarse (política heredada del
//! sistema original, ver DESIGN.md).

use chrono::{DateTime, Utc};

use crate::models::booking::{Booking, BookingStatus};
use crate::models::user::{User, UserRole};
use crate::utils::errors::AppError;

/// Acciones de transición que comparten la regla de autorización
/// dueño-o-admin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleAction {
    Cancel,
    Confirm,
    Finish,
}

impl LifecycleAction {
    /// Aplica la acción sobre el estado actual.
    ///
    /// Los guards se evalúan en orden fijo y gana el primero que aplica:
    /// cancelado y finalizado se rechazan siempre antes de mirar la
    /// acción concreta.
    pub fn apply(&self, status: BookingStatus) -> Result<BookingStatus, AppError> {
        match status {
            BookingStatus::Cancelled => Err(AppError::BookingAlreadyCancelled),
            BookingStatus::Finished => Err(AppError::BookingAlreadyFinished),
            BookingStatus::Confirmed => match self {
                LifecycleAction::Finish => Ok(BookingStatus::Finished),
                // Confirmada equivale a "ya empezó": ni cancelar ni reconfirmar
                LifecycleAction::Cancel | LifecycleAction::Confirm => {
                    Err(AppError::BookingAlreadyStarted)
                }
            },
            BookingStatus::Reserved => match self {
                LifecycleAction::Cancel => Ok(BookingStatus::Cancelled),
                LifecycleAction::Confirm => Ok(BookingStatus::Confirmed),
                LifecycleAction::Finish => Err(AppError::BookingNotStarted),
            },
        }
    }

    /// Observación de auditoría que se escribe al completar la transición.
    /// El admin/user del texto sale del rol de quien actúa, no del dueño.
    pub fn observation(&self, role: UserRole) -> String {
        let verb = match self {
            LifecycleAction::Cancel => "cancelled",
            LifecycleAction::Confirm => "confirmed",
            LifecycleAction::Finish => "finished",
        };
        format!("Booking {} by {}", verb, role.actor_label())
    }
}

/// Solape de la ventana semiabierta [existing_start, existing_end) de
/// una reserva contra la ventana consultada [from, to). Es la misma
/// condición que ejecuta el SQL de disponibilidad
/// (start_date < to AND end_date > from): tocar el borde no solapa.
pub fn windows_overlap(
    existing_start: DateTime<Utc>,
    existing_end: DateTime<Utc>,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> bool {
    existing_start < to && existing_end > from
}

/// Autorización de cancel/confirm/finish: dueño de la reserva o admin
pub fn can_manage(booking: &Booking, user: &User) -> bool {
    booking.user_id == user.id || user.role == UserRole::Admin
}

/// Autorización de feedback/rating/mensajes: tiene que ser el dueño Y
/// tener rol client. Un admin nunca puede, ni sobre reservas ajenas ni
/// sobre las propias.
pub fn is_owning_client(booking: &Booking, user: &User) -> bool {
    booking.user_id == user.id && user.role == UserRole::Client
}

/// Guard de estado compartido por feedback y rating: solo sobre reservas
/// finalizadas, con un error distinto según lo lejos que esté de serlo
pub fn require_finished(status: BookingStatus) -> Result<(), AppError> {
    match status {
        BookingStatus::Reserved => Err(AppError::BookingNotStarted),
        BookingStatus::Confirmed => Err(AppError::BookingNotFinished),
        BookingStatus::Cancelled => Err(AppError::BookingAlreadyCancelled),
        BookingStatus::Finished => Ok(()),
    }
}

/// Guard de feedback único: rechaza si ya hay un feedback no vacío.
/// El rating no tiene guard equivalente y es sobrescribible; asimetría
/// heredada a propósito.
pub fn require_no_feedback(booking: &Booking) -> Result<(), AppError> {
    match booking.feedback.as_deref() {
        Some(feedback) if !feedback.is_empty() => Err(AppError::BookingAlreadyHaveFeedback),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn client(id: Uuid) -> User {
        User::new(
            format!("{}@test.com", id),
            "Cliente Test".to_string(),
            "secret".to_string(),
            id.to_string(),
        )
    }

    fn admin() -> User {
        let mut user = client(Uuid::new_v4());
        user.role = UserRole::Admin;
        user
    }

    fn booking_for(user_id: Uuid, status: BookingStatus) -> Booking {
        let start = Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 6, 1, 18, 0, 0).unwrap();
        let mut booking = Booking::new(
            user_id,
            Uuid::new_v4(),
            start,
            end,
            "aeropuerto".to_string(),
            "centro".to_string(),
            9.5,
        );
        booking.status = status;
        booking
    }

    #[test]
    fn test_cancel_only_from_reserved() {
        let cancel = LifecycleAction::Cancel;

        assert_eq!(cancel.apply(BookingStatus::Reserved).unwrap(), BookingStatus::Cancelled);
        assert!(matches!(
            cancel.apply(BookingStatus::Confirmed),
            Err(AppError::BookingAlreadyStarted)
        ));
        assert!(matches!(
            cancel.apply(BookingStatus::Cancelled),
            Err(AppError::BookingAlreadyCancelled)
        ));
        assert!(matches!(
            cancel.apply(BookingStatus::Finished),
            Err(AppError::BookingAlreadyFinished)
        ));
    }

    #[test]
    fn test_confirm_only_from_reserved() {
        let confirm = LifecycleAction::Confirm;

        assert_eq!(confirm.apply(BookingStatus::Reserved).unwrap(), BookingStatus::Confirmed);
        assert!(matches!(
            confirm.apply(BookingStatus::Confirmed),
            Err(AppError::BookingAlreadyStarted)
        ));
        assert!(matches!(
            confirm.apply(BookingStatus::Cancelled),
            Err(AppError::BookingAlreadyCancelled)
        ));
        assert!(matches!(
            confirm.apply(BookingStatus::Finished),
            Err(AppError::BookingAlreadyFinished)
        ));
    }

    #[test]
    fn test_finish_only_from_confirmed() {
        let finish = LifecycleAction::Finish;

        assert_eq!(finish.apply(BookingStatus::Confirmed).unwrap(), BookingStatus::Finished);
        assert!(matches!(
            finish.apply(BookingStatus::Reserved),
            Err(AppError::BookingNotStarted)
        ));
        assert!(matches!(
            finish.apply(BookingStatus::Cancelled),
            Err(AppError::BookingAlreadyCancelled)
        ));
        assert!(matches!(
            finish.apply(BookingStatus::Finished),
            Err(AppError::BookingAlreadyFinished)
        ));
    }

    #[test]
    fn test_no_other_edges_exist() {
        // Barrido completo: de cada estado solo salen las aristas
        // reservado->{confirmado,cancelado} y confirmado->finalizado
        let all = [
            BookingStatus::Reserved,
            BookingStatus::Confirmed,
            BookingStatus::Cancelled,
            BookingStatus::Finished,
        ];
        let actions = [
            LifecycleAction::Cancel,
            LifecycleAction::Confirm,
            LifecycleAction::Finish,
        ];

        for status in all {
            for action in actions {
                if let Ok(next) = action.apply(status) {
                    let valid = matches!(
                        (status, next),
                        (BookingStatus::Reserved, BookingStatus::Confirmed)
                            | (BookingStatus::Reserved, BookingStatus::Cancelled)
                            | (BookingStatus::Confirmed, BookingStatus::Finished)
                    );
                    assert!(valid, "transición inesperada {:?} -> {:?}", status, next);
                }
            }
        }
    }

    #[test]
    fn test_observation_follows_acting_role() {
        assert_eq!(
            LifecycleAction::Confirm.observation(UserRole::Admin),
            "Booking confirmed by admin"
        );
        assert_eq!(
            LifecycleAction::Cancel.observation(UserRole::Client),
            "Booking cancelled by user"
        );
        assert_eq!(
            LifecycleAction::Finish.observation(UserRole::Admin),
            "Booking finished by admin"
        );
    }

    #[test]
    fn test_owner_or_admin_can_manage() {
        let owner = client(Uuid::new_v4());
        let stranger = client(Uuid::new_v4());
        let admin = admin();
        let booking = booking_for(owner.id, BookingStatus::Reserved);

        assert!(can_manage(&booking, &owner));
        assert!(can_manage(&booking, &admin));
        assert!(!can_manage(&booking, &stranger));
    }

    #[test]
    fn test_feedback_requires_owning_client() {
        let owner = client(Uuid::new_v4());
        let stranger = client(Uuid::new_v4());
        let admin = admin();
        let booking = booking_for(owner.id, BookingStatus::Finished);

        assert!(is_owning_client(&booking, &owner));
        assert!(!is_owning_client(&booking, &stranger));
        // Un admin no puede dejar feedback, ni siquiera en reservas ajenas
        assert!(!is_owning_client(&booking, &admin));

        // Tampoco un admin dueño de su propia reserva
        let own_booking = booking_for(admin.id, BookingStatus::Finished);
        assert!(!is_owning_client(&own_booking, &admin));
    }

    #[test]
    fn test_require_finished_guard_order() {
        assert!(matches!(
            require_finished(BookingStatus::Reserved),
            Err(AppError::BookingNotStarted)
        ));
        assert!(matches!(
            require_finished(BookingStatus::Confirmed),
            Err(AppError::BookingNotFinished)
        ));
        assert!(matches!(
            require_finished(BookingStatus::Cancelled),
            Err(AppError::BookingAlreadyCancelled)
        ));
        assert!(require_finished(BookingStatus::Finished).is_ok());
    }

    #[test]
    fn test_windows_overlap_boundaries() {
        let start = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 1, 12, 0, 0, 0).unwrap();

        // Ventana que cae dentro de la reserva: solapa
        let from = Utc.with_ymd_and_hms(2024, 1, 11, 0, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2024, 1, 13, 0, 0, 0).unwrap();
        assert!(windows_overlap(start, end, from, to));

        // Ventana que empieza justo cuando termina la reserva: el borde
        // compartido no cuenta como solape
        let from = Utc.with_ymd_and_hms(2024, 1, 12, 0, 0, 0).unwrap();
        assert!(!windows_overlap(start, end, from, to));

        // Simétrico: ventana que termina justo cuando empieza la reserva
        let from = Utc.with_ymd_and_hms(2024, 1, 8, 0, 0, 0).unwrap();
        assert!(!windows_overlap(start, end, from, start));
    }

    #[test]
    fn test_rating_overwritable_unlike_feedback() {
        let owner = client(Uuid::new_v4());
        let mut booking = booking_for(owner.id, BookingStatus::Finished);
        booking.rating = Some(4);
        booking.feedback = Some("great".to_string());

        // Los guards de puntuar son dueño-client + reserva finalizada;
        // un rating ya presente no bloquea repuntuar
        assert!(is_owning_client(&booking, &owner));
        assert!(require_finished(booking.status).is_ok());

        // El feedback de la misma reserva sí queda bloqueado
        assert!(matches!(
            require_no_feedback(&booking),
            Err(AppError::BookingAlreadyHaveFeedback)
        ));
    }

    #[test]
    fn test_feedback_settable_once() {
        let owner = client(Uuid::new_v4());
        let mut booking = booking_for(owner.id, BookingStatus::Finished);

        assert!(require_no_feedback(&booking).is_ok());

        // Un feedback vacío no cuenta como existente
        booking.feedback = Some(String::new());
        assert!(require_no_feedback(&booking).is_ok());

        booking.feedback = Some("great".to_string());
        assert!(matches!(
            require_no_feedback(&booking),
            Err(AppError::BookingAlreadyHaveFeedback)
        ));
    }
}

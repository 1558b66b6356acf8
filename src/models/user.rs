//! Modelo de User
//!
//! Mapea exactamente a la tabla users. El rol es un enum cerrado
//! (client/admin) en vez de comparaciones de strings sueltas.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Rol del usuario - mapea al ENUM user_role
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Client,
    Admin,
}

impl UserRole {
    /// Palabra usada en las observaciones de transición
    pub fn actor_label(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Client => "user",
        }
    }
}

/// User - mapea exactamente a la tabla users
///
/// El password se guarda en claro y se compara byte a byte en login;
/// debilidad heredada del sistema original, documentada en DESIGN.md.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub password: String,
    pub dni: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Nuevo usuario de registro: siempre con rol client
    pub fn new(email: String, name: String, password: String, dni: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            name,
            password,
            dni,
            role: UserRole::Client,
            created_at: now,
            updated_at: now,
        }
    }
}

//! Staff account model.

use chrono::{DateTime, Utc};
use serde::Serialize;

use tavola_core::{AdminId, Email};

/// A staff account, as stored.
///
/// The password hash never leaves this type; everything exposed to callers
/// goes through [`AdminProfile`].
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Admin {
    pub id: AdminId,
    pub email: Email,
    pub name: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The public view of a staff account: id, email, and display name only.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminProfile {
    pub id: AdminId,
    pub email: Email,
    pub name: String,
}

impl From<&Admin> for AdminProfile {
    fn from(admin: &Admin) -> Self {
        Self {
            id: admin.id,
            email: admin.email.clone(),
            name: admin.name.clone(),
        }
    }
}

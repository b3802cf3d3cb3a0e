//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::schema::{required, Schema};
use crate::config::{STATUS_ADMIN, STATUS_DELIVERY_MAN, STATUS_USER};
use crate::errors::AppResult;

/// User status enumeration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    Admin,
    DeliveryMan,
    #[default]
    User,
}

impl UserStatus {
    /// Stored representation
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Admin => STATUS_ADMIN,
            UserStatus::DeliveryMan => STATUS_DELIVERY_MAN,
            UserStatus::User => STATUS_USER,
        }
    }
}

impl From<&str> for UserStatus {
    fn from(s: &str) -> Self {
        match s {
            STATUS_ADMIN => UserStatus::Admin,
            STATUS_DELIVERY_MAN => UserStatus::DeliveryMan,
            _ => UserStatus::User,
        }
    }
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User domain entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    #[schema(example = "Jane Doe")]
    pub name: String,
    #[schema(example = "jane@example.com")]
    pub email: String,
    pub status: UserStatus,
    #[schema(example = "555-1111")]
    pub phone: String,
    pub photo: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn is_delivery_man(&self) -> bool {
        self.status == UserStatus::DeliveryMan
    }
}

/// Candidate record for user creation
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UserCandidate {
    #[validate(required, length(min = 1, message = "cannot be empty"))]
    #[schema(example = "Jane Doe")]
    pub name: Option<String>,
    #[validate(required, email(message = "is not a valid email address"))]
    #[schema(example = "jane@example.com")]
    pub email: Option<String>,
    /// Defaults to `user`
    pub status: Option<UserStatus>,
    pub phone: Option<String>,
    pub photo: Option<String>,
}

impl Schema for UserCandidate {
    const FIELDS: &'static [&'static str] = &["name", "email", "status", "phone", "photo"];
}

/// Normalized user ready for insertion (defaults applied)
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub status: UserStatus,
    pub phone: String,
    pub photo: String,
}

impl UserCandidate {
    /// Validate the candidate and apply defaults.
    pub fn normalize(self) -> AppResult<NewUser> {
        self.check()?;

        Ok(NewUser {
            name: required(self.name, "name")?,
            email: required(self.email, "email")?.trim().to_lowercase(),
            status: self.status.unwrap_or_default(),
            phone: self.phone.unwrap_or_default(),
            photo: self.photo.unwrap_or_default(),
        })
    }
}

/// Fields a user update may touch; anything else in the request is ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Validate, ToSchema)]
pub struct UserChanges {
    #[validate(length(min = 1, message = "cannot be empty"))]
    #[schema(example = "Jane Doe")]
    pub name: Option<String>,
    #[schema(example = "555-1111")]
    pub phone: Option<String>,
    pub status: Option<UserStatus>,
    pub photo: Option<String>,
}

impl Schema for UserChanges {
    const FIELDS: &'static [&'static str] = &["name", "phone", "status", "photo"];
}

impl UserChanges {
    /// Contact update issued alongside a parcel write
    pub fn phone(phone: impl Into<String>) -> Self {
        Self {
            phone: Some(phone.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.phone.is_none() && self.status.is_none() && self.photo.is_none()
    }
}

/// Optional filters for user listings
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserFilter {
    /// Only users with this status
    pub status: Option<UserStatus>,
    /// Exact email match
    pub email: Option<String>,
}

use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use time::{Date, OffsetDateTime};
use validator::Validate;

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    /// Business key used at login; unique and stable.
    pub registration: String,
    pub job_title: Option<String>,
    pub admission_date: Option<Date>,
    pub avatar_url: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl User {
    /// A fresh directory entry: profile fields are filled in later via
    /// profile edit.
    pub fn new(name: &str, registration: &str) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
            email: None,
            registration: registration.trim().to_string(),
            job_title: None,
            admission_date: None,
            avatar_url: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Name is required."))]
    pub name: String,
    #[validate(length(min = 1, message = "Registration is required."))]
    pub registration: String,
}

/// Partial profile update; unset fields keep their prior value.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProfile {
    #[validate(length(min = 3, message = "Name must be at least 3 characters."))]
    pub name: Option<String>,
    #[validate(email(message = "Invalid email address."))]
    pub email: Option<String>,
    #[validate(length(min = 3, message = "Job title must be at least 3 characters."))]
    pub job_title: Option<String>,
    pub admission_date: Option<Date>,
    #[validate(url(message = "Avatar must be a valid URL."))]
    pub avatar_url: Option<String>,
}

impl UpdateProfile {
    pub fn avatar_only(url: String) -> Self {
        Self {
            avatar_url: Some(url),
            ..Self::default()
        }
    }
}

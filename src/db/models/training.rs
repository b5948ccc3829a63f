use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use time::{Date, OffsetDateTime};
use validator::Validate;

/// Cover image assigned when a training is created without one.
pub const DEFAULT_COVER_IMAGE_ID: &str = "technical-onboarding";

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "training_category", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TrainingCategory {
    Leadership,
    Technical,
    Compliance,
    SoftSkills,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Training {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub trainer_name: String,
    pub training_date: Date,
    pub training_hours: i32,
    pub category: TrainingCategory,
    pub cover_image_id: Option<String>,
    pub content_url: Option<String>,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewTraining {
    #[validate(length(min = 3, message = "Title must be at least 3 characters."))]
    pub title: String,
    #[validate(length(min = 10, message = "Description must be at least 10 characters."))]
    pub description: String,
    #[validate(length(min = 1, message = "Trainer name is required."))]
    pub trainer_name: String,
    pub training_date: Date,
    #[validate(range(min = 1, message = "Training hours must be at least 1."))]
    pub training_hours: i32,
    pub category: TrainingCategory,
    pub cover_image_id: Option<String>,
    pub content_url: Option<String>,
}

impl Training {
    pub fn from_new(attrs: NewTraining) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: attrs.title,
            description: attrs.description,
            trainer_name: attrs.trainer_name,
            training_date: attrs.training_date,
            training_hours: attrs.training_hours,
            category: attrs.category,
            cover_image_id: attrs
                .cover_image_id
                .or_else(|| Some(DEFAULT_COVER_IMAGE_ID.to_string())),
            content_url: attrs.content_url.or_else(|| Some("#".to_string())),
            created_at: OffsetDateTime::now_utc(),
        }
    }
}

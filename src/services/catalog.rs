use uuid::Uuid;
use validator::Validate;

use crate::db::models::{NewTraining, Training};
use crate::db::repositories::Stores;
use crate::error::{AppError, AppResult};

/// The training module definitions. Entries are created and read; no update
/// operation is exposed.
pub struct TrainingCatalog {
    stores: Stores,
}

impl TrainingCatalog {
    pub fn new(stores: Stores) -> Self {
        Self { stores }
    }

    pub async fn create(&self, attrs: NewTraining) -> AppResult<Training> {
        attrs.validate()?;
        let training = Training::from_new(attrs);
        Ok(self.stores.trainings.insert(&training).await?)
    }

    pub async fn get(&self, training_id: Uuid) -> AppResult<Training> {
        self.stores
            .trainings
            .find_by_id(training_id)
            .await?
            .ok_or(AppError::NotFound("training"))
    }

    pub async fn list(&self) -> AppResult<Vec<Training>> {
        Ok(self.stores.trainings.list().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{TrainingCategory, DEFAULT_COVER_IMAGE_ID};
    use time::macros::date;

    fn attrs() -> NewTraining {
        NewTraining {
            title: "Padrões Avançados de React".to_string(),
            description: "Descreva o módulo de treinamento em detalhes.".to_string(),
            trainer_name: "Fernanda Lima".to_string(),
            training_date: date!(2024 - 06 - 10),
            training_hours: 16,
            category: TrainingCategory::Technical,
            cover_image_id: None,
            content_url: None,
        }
    }

    #[tokio::test]
    async fn create_applies_defaults_and_is_listed() {
        let stores = Stores::in_memory();
        let catalog = TrainingCatalog::new(stores);

        let training = catalog.create(attrs()).await.unwrap();
        assert_eq!(training.cover_image_id.as_deref(), Some(DEFAULT_COVER_IMAGE_ID));
        assert_eq!(training.content_url.as_deref(), Some("#"));

        let listed = catalog.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(catalog.get(training.id).await.unwrap().id, training.id);
    }

    #[tokio::test]
    async fn short_description_is_rejected() {
        let stores = Stores::in_memory();
        let catalog = TrainingCatalog::new(stores);
        let mut bad = attrs();
        bad.description = "curta".to_string();

        let err = catalog.create(bad).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let stores = Stores::in_memory();
        let catalog = TrainingCatalog::new(stores);

        let err = catalog.get(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound("training")));
    }
}

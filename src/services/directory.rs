use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::db::models::{UpdateProfile, User};
use crate::db::repositories::Stores;
use crate::error::{AppError, AppResult};
use crate::storage::BlobStorage;

/// Identity and profile records, keyed by registration number at login.
pub struct UserDirectory {
    stores: Stores,
    blobs: Arc<dyn BlobStorage>,
}

impl UserDirectory {
    pub fn new(stores: Stores, blobs: Arc<dyn BlobStorage>) -> Self {
        Self { stores, blobs }
    }

    /// Login entry point. The registration is the lookup key; an existing
    /// record must carry the same name (case-insensitively) or the attempt
    /// is rejected as `NameMismatch`.
    pub async fn find_or_create_by_registration(
        &self,
        name: &str,
        registration: &str,
    ) -> AppResult<User> {
        let registration = registration.trim();
        match self.stores.users.find_by_registration(registration).await? {
            Some(user) => {
                if user.name.to_lowercase() != name.trim().to_lowercase() {
                    return Err(AppError::NameMismatch);
                }
                Ok(user)
            }
            None => {
                let user = User::new(name, registration);
                Ok(self.stores.users.insert(&user).await?)
            }
        }
    }

    pub async fn get(&self, user_id: Uuid) -> AppResult<User> {
        self.stores
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::NotFound("user"))
    }

    pub async fn list(&self) -> AppResult<Vec<User>> {
        Ok(self.stores.users.list().await?)
    }

    pub async fn update_profile(&self, user_id: Uuid, changes: UpdateProfile) -> AppResult<User> {
        changes.validate()?;
        self.stores
            .users
            .update_profile(user_id, &changes)
            .await?
            .ok_or(AppError::NotFound("user"))
    }

    /// Stores the avatar bytes through the blob seam and records the
    /// returned URL; no other profile field is touched.
    pub async fn attach_avatar(
        &self,
        user_id: Uuid,
        bytes: &[u8],
        extension: &str,
    ) -> AppResult<User> {
        if bytes.is_empty() {
            return Err(AppError::BadRequest("avatar file is empty".to_string()));
        }
        let path = format!("avatars/{}.{}", Uuid::new_v4(), extension);
        let url = self.blobs.upload(bytes, &path).await?;
        self.stores
            .users
            .update_profile(user_id, &UpdateProfile::avatar_only(url))
            .await?
            .ok_or(AppError::NotFound("user"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::LocalBlobStorage;
    use time::macros::date;

    fn directory(stores: &Stores) -> UserDirectory {
        let dir = std::env::temp_dir().join("skillscribe-test-blobs");
        UserDirectory::new(
            stores.clone(),
            Arc::new(LocalBlobStorage::new(&dir.to_string_lossy(), "/static")),
        )
    }

    #[tokio::test]
    async fn first_login_creates_the_user() {
        let stores = Stores::in_memory();
        let dir = directory(&stores);

        let user = dir
            .find_or_create_by_registration("Ana Silva", "123")
            .await
            .unwrap();
        assert_eq!(user.name, "Ana Silva");
        assert_eq!(user.registration, "123");
        assert_eq!(user.job_title, None);

        let again = dir
            .find_or_create_by_registration("Ana Silva", "123")
            .await
            .unwrap();
        assert_eq!(again.id, user.id);
    }

    #[tokio::test]
    async fn different_name_for_same_registration_is_rejected() {
        let stores = Stores::in_memory();
        let dir = directory(&stores);

        dir.find_or_create_by_registration("Ana Silva", "123")
            .await
            .unwrap();
        let err = dir
            .find_or_create_by_registration("Ana Diferente", "123")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NameMismatch));
    }

    #[tokio::test]
    async fn name_check_ignores_case() {
        let stores = Stores::in_memory();
        let dir = directory(&stores);

        let user = dir
            .find_or_create_by_registration("Ana Silva", "123")
            .await
            .unwrap();
        let again = dir
            .find_or_create_by_registration("ANA SILVA", "123")
            .await
            .unwrap();
        assert_eq!(again.id, user.id);
    }

    #[tokio::test]
    async fn profile_update_merges_onto_the_prior_record() {
        let stores = Stores::in_memory();
        let dir = directory(&stores);
        let user = dir
            .find_or_create_by_registration("Ana Silva", "123")
            .await
            .unwrap();

        let updated = dir
            .update_profile(
                user.id,
                UpdateProfile {
                    job_title: Some("Engenheira de Software".to_string()),
                    admission_date: Some(date!(2022 - 01 - 10)),
                    ..UpdateProfile::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Ana Silva");
        assert_eq!(updated.job_title.as_deref(), Some("Engenheira de Software"));
        assert_eq!(updated.admission_date, Some(date!(2022 - 01 - 10)));

        let read_back = dir.get(user.id).await.unwrap();
        assert_eq!(read_back.job_title.as_deref(), Some("Engenheira de Software"));
        assert_eq!(read_back.registration, "123");
    }

    #[tokio::test]
    async fn short_job_title_fails_validation() {
        let stores = Stores::in_memory();
        let dir = directory(&stores);
        let user = dir
            .find_or_create_by_registration("Ana Silva", "123")
            .await
            .unwrap();

        let err = dir
            .update_profile(
                user.id,
                UpdateProfile {
                    job_title: Some("QA".to_string()),
                    ..UpdateProfile::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn attach_avatar_stores_a_url() {
        let stores = Stores::in_memory();
        let dir = directory(&stores);
        let user = dir
            .find_or_create_by_registration("Ana Silva", "123")
            .await
            .unwrap();

        let updated = dir
            .attach_avatar(user.id, b"\x89PNG fake bytes", "png")
            .await
            .unwrap();
        let url = updated.avatar_url.expect("avatar url set");
        assert!(url.starts_with("/static/avatars/"));
        assert!(url.ends_with(".png"));
    }
}

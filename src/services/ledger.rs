use time::{Date, OffsetDateTime};
use uuid::Uuid;
use validator::Validate;

use crate::db::models::{Enrollment, EnrollmentStatus, NewTraining, Training};
use crate::db::repositories::Stores;
use crate::error::{AppError, AppResult};

/// Single source of truth for who is enrolled in what, and their progress.
///
/// Status and completion date form one transition: a record is Completed
/// exactly when it carries a completion date, and both are written in a
/// single store call so no caller can observe them out of step.
pub struct EnrollmentLedger {
    stores: Stores,
    /// Expected QR registration token for the self-service flow; None
    /// disables the check.
    registration_token: Option<String>,
}

impl EnrollmentLedger {
    pub fn new(stores: Stores, registration_token: Option<String>) -> Self {
        Self {
            stores,
            registration_token,
        }
    }

    /// Creates a NotStarted record for the pair. `AlreadyEnrolled` if one
    /// exists, including when a concurrent enroll wins the race.
    pub async fn enroll(&self, user_id: Uuid, training_id: Uuid) -> AppResult<Enrollment> {
        self.ensure_user(user_id).await?;
        self.ensure_training(training_id).await?;
        match self.stores.enrollments.try_insert(user_id, training_id).await? {
            Some(enrollment) => Ok(enrollment),
            None => Err(AppError::AlreadyEnrolled),
        }
    }

    /// Removes the record if present; absent is not an error.
    pub async fn unenroll(&self, user_id: Uuid, training_id: Uuid) -> AppResult<()> {
        self.stores.enrollments.delete(user_id, training_id).await?;
        Ok(())
    }

    /// Moves the pair to `status`, creating the record if it does not exist.
    /// Completed sets today's completion date; any other status clears it.
    /// Idempotent: repeating a transition leaves the same observable state.
    pub async fn set_status(
        &self,
        user_id: Uuid,
        training_id: Uuid,
        status: EnrollmentStatus,
    ) -> AppResult<Enrollment> {
        self.ensure_user(user_id).await?;
        self.ensure_training(training_id).await?;
        let completion_date = match status {
            EnrollmentStatus::Completed => Some(today()),
            _ => None,
        };
        let enrollment = self
            .stores
            .enrollments
            .upsert_status(user_id, training_id, status, completion_date)
            .await?;
        Ok(enrollment)
    }

    /// Self-service registration: atomically creates the training and a
    /// Completed enrollment for the acting user, dated today.
    pub async fn register_and_auto_complete(
        &self,
        attrs: NewTraining,
        acting_user_id: Uuid,
        validation_token: Option<&str>,
    ) -> AppResult<(Training, Enrollment)> {
        attrs.validate()?;
        if let Some(expected) = &self.registration_token {
            if validation_token != Some(expected.as_str()) {
                return Err(AppError::ValidationTokenMismatch);
            }
        }
        self.ensure_user(acting_user_id).await?;
        let training = Training::from_new(attrs);
        let created = self
            .stores
            .enrollments
            .insert_training_completed(&training, acting_user_id, today())
            .await?;
        Ok(created)
    }

    /// Removes exactly one record; `NotFound` if absent.
    pub async fn delete_enrollment(&self, user_id: Uuid, training_id: Uuid) -> AppResult<()> {
        if self.stores.enrollments.delete(user_id, training_id).await? {
            Ok(())
        } else {
            Err(AppError::NotFound("enrollment"))
        }
    }

    /// Bulk-removes every Completed record for the user. The confirmation
    /// step guarding this lives at the UI boundary, not here.
    pub async fn delete_all_completed_for_user(&self, user_id: Uuid) -> AppResult<u64> {
        Ok(self
            .stores
            .enrollments
            .delete_completed_for_user(user_id)
            .await?)
    }

    pub async fn find(&self, user_id: Uuid, training_id: Uuid) -> AppResult<Option<Enrollment>> {
        Ok(self.stores.enrollments.find(user_id, training_id).await?)
    }

    pub async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<Enrollment>> {
        Ok(self.stores.enrollments.list_by_user(user_id).await?)
    }

    pub async fn list_by_training(&self, training_id: Uuid) -> AppResult<Vec<Enrollment>> {
        Ok(self.stores.enrollments.list_by_training(training_id).await?)
    }

    pub async fn list_all(&self) -> AppResult<Vec<Enrollment>> {
        Ok(self.stores.enrollments.list_all().await?)
    }

    async fn ensure_user(&self, user_id: Uuid) -> AppResult<()> {
        self.stores
            .users
            .find_by_id(user_id)
            .await?
            .map(|_| ())
            .ok_or(AppError::NotFound("user"))
    }

    async fn ensure_training(&self, training_id: Uuid) -> AppResult<()> {
        self.stores
            .trainings
            .find_by_id(training_id)
            .await?
            .map(|_| ())
            .ok_or(AppError::NotFound("training"))
    }
}

fn today() -> Date {
    OffsetDateTime::now_utc().date()
}

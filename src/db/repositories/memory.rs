use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::db::models::{Enrollment, EnrollmentStatus, Session, Training, UpdateProfile, User};

use super::{EnrollmentStore, SessionStore, StoreResult, TrainingStore, UserStore};

/// In-memory fake of the four collections, used by tests and as the
/// reference behavior for the Postgres store. One mutex guards all
/// collections so check-then-act sequences observe a consistent snapshot.
#[derive(Default)]
pub struct InMemoryStore {
    inner: Mutex<Collections>,
}

#[derive(Default)]
struct Collections {
    users: Vec<User>,
    trainings: Vec<Training>,
    enrollments: Vec<Enrollment>,
    sessions: Vec<Session>,
}

impl InMemoryStore {
    fn lock(&self) -> MutexGuard<'_, Collections> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn insert(&self, user: &User) -> StoreResult<User> {
        let mut inner = self.lock();
        inner.users.push(user.clone());
        Ok(user.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let inner = self.lock();
        Ok(inner.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_registration(&self, registration: &str) -> StoreResult<Option<User>> {
        let inner = self.lock();
        Ok(inner
            .users
            .iter()
            .find(|u| u.registration == registration)
            .cloned())
    }

    async fn update_profile(&self, id: Uuid, changes: &UpdateProfile) -> StoreResult<Option<User>> {
        let mut inner = self.lock();
        let Some(user) = inner.users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        if let Some(name) = &changes.name {
            user.name = name.clone();
        }
        if let Some(email) = &changes.email {
            user.email = Some(email.clone());
        }
        if let Some(job_title) = &changes.job_title {
            user.job_title = Some(job_title.clone());
        }
        if let Some(admission_date) = changes.admission_date {
            user.admission_date = Some(admission_date);
        }
        if let Some(avatar_url) = &changes.avatar_url {
            user.avatar_url = Some(avatar_url.clone());
        }
        user.updated_at = OffsetDateTime::now_utc();
        Ok(Some(user.clone()))
    }

    async fn list(&self) -> StoreResult<Vec<User>> {
        let inner = self.lock();
        let mut users = inner.users.clone();
        users.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(users)
    }
}

#[async_trait]
impl TrainingStore for InMemoryStore {
    async fn insert(&self, training: &Training) -> StoreResult<Training> {
        let mut inner = self.lock();
        inner.trainings.push(training.clone());
        Ok(training.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Training>> {
        let inner = self.lock();
        Ok(inner.trainings.iter().find(|t| t.id == id).cloned())
    }

    async fn list(&self) -> StoreResult<Vec<Training>> {
        let inner = self.lock();
        let mut trainings = inner.trainings.clone();
        trainings.sort_by_key(|t| t.training_date);
        Ok(trainings)
    }
}

#[async_trait]
impl EnrollmentStore for InMemoryStore {
    async fn try_insert(
        &self,
        user_id: Uuid,
        training_id: Uuid,
    ) -> StoreResult<Option<Enrollment>> {
        let mut inner = self.lock();
        if inner
            .enrollments
            .iter()
            .any(|e| e.user_id == user_id && e.training_id == training_id)
        {
            return Ok(None);
        }
        let now = OffsetDateTime::now_utc();
        let enrollment = Enrollment {
            id: Uuid::new_v4(),
            user_id,
            training_id,
            status: EnrollmentStatus::NotStarted,
            completion_date: None,
            created_at: now,
            updated_at: now,
        };
        inner.enrollments.push(enrollment.clone());
        Ok(Some(enrollment))
    }

    async fn find(&self, user_id: Uuid, training_id: Uuid) -> StoreResult<Option<Enrollment>> {
        let inner = self.lock();
        Ok(inner
            .enrollments
            .iter()
            .find(|e| e.user_id == user_id && e.training_id == training_id)
            .cloned())
    }

    async fn upsert_status(
        &self,
        user_id: Uuid,
        training_id: Uuid,
        status: EnrollmentStatus,
        completion_date: Option<Date>,
    ) -> StoreResult<Enrollment> {
        let mut inner = self.lock();
        let now = OffsetDateTime::now_utc();
        if let Some(enrollment) = inner
            .enrollments
            .iter_mut()
            .find(|e| e.user_id == user_id && e.training_id == training_id)
        {
            enrollment.status = status;
            enrollment.completion_date = completion_date;
            enrollment.updated_at = now;
            return Ok(enrollment.clone());
        }
        let enrollment = Enrollment {
            id: Uuid::new_v4(),
            user_id,
            training_id,
            status,
            completion_date,
            created_at: now,
            updated_at: now,
        };
        inner.enrollments.push(enrollment.clone());
        Ok(enrollment)
    }

    async fn delete(&self, user_id: Uuid, training_id: Uuid) -> StoreResult<bool> {
        let mut inner = self.lock();
        let before = inner.enrollments.len();
        inner
            .enrollments
            .retain(|e| !(e.user_id == user_id && e.training_id == training_id));
        Ok(inner.enrollments.len() < before)
    }

    async fn delete_completed_for_user(&self, user_id: Uuid) -> StoreResult<u64> {
        let mut inner = self.lock();
        let before = inner.enrollments.len();
        inner
            .enrollments
            .retain(|e| !(e.user_id == user_id && e.status == EnrollmentStatus::Completed));
        Ok((before - inner.enrollments.len()) as u64)
    }

    async fn list_by_user(&self, user_id: Uuid) -> StoreResult<Vec<Enrollment>> {
        let inner = self.lock();
        Ok(inner
            .enrollments
            .iter()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn list_by_training(&self, training_id: Uuid) -> StoreResult<Vec<Enrollment>> {
        let inner = self.lock();
        Ok(inner
            .enrollments
            .iter()
            .filter(|e| e.training_id == training_id)
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> StoreResult<Vec<Enrollment>> {
        let inner = self.lock();
        Ok(inner.enrollments.clone())
    }

    async fn insert_training_completed(
        &self,
        training: &Training,
        user_id: Uuid,
        completion_date: Date,
    ) -> StoreResult<(Training, Enrollment)> {
        let mut inner = self.lock();
        let now = OffsetDateTime::now_utc();
        inner.trainings.push(training.clone());
        let enrollment = Enrollment {
            id: Uuid::new_v4(),
            user_id,
            training_id: training.id,
            status: EnrollmentStatus::Completed,
            completion_date: Some(completion_date),
            created_at: now,
            updated_at: now,
        };
        inner.enrollments.push(enrollment.clone());
        Ok((training.clone(), enrollment))
    }
}

#[async_trait]
impl SessionStore for InMemoryStore {
    async fn insert(&self, session: &Session) -> StoreResult<()> {
        let mut inner = self.lock();
        inner.sessions.push(session.clone());
        Ok(())
    }

    async fn find(&self, token: Uuid) -> StoreResult<Option<Session>> {
        let inner = self.lock();
        Ok(inner.sessions.iter().find(|s| s.token == token).cloned())
    }

    async fn delete(&self, token: Uuid) -> StoreResult<()> {
        let mut inner = self.lock();
        inner.sessions.retain(|s| s.token != token);
        Ok(())
    }
}

mod memory;
mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use time::Date;
use uuid::Uuid;

use crate::db::error::DatabaseError;
use crate::db::models::{Enrollment, EnrollmentStatus, Session, Training, UpdateProfile, User};

pub use memory::InMemoryStore;
pub use postgres::PgStore;

pub type StoreResult<T> = Result<T, DatabaseError>;

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn insert(&self, user: &User) -> StoreResult<User>;
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;
    async fn find_by_registration(&self, registration: &str) -> StoreResult<Option<User>>;
    /// Merges set fields onto the existing record; returns None when the user
    /// does not exist.
    async fn update_profile(&self, id: Uuid, changes: &UpdateProfile) -> StoreResult<Option<User>>;
    async fn list(&self) -> StoreResult<Vec<User>>;
}

#[async_trait]
pub trait TrainingStore: Send + Sync {
    async fn insert(&self, training: &Training) -> StoreResult<Training>;
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Training>>;
    async fn list(&self) -> StoreResult<Vec<Training>>;
}

#[async_trait]
pub trait EnrollmentStore: Send + Sync {
    /// Creates a NotStarted record unless one already exists for the pair;
    /// returns None on conflict so concurrent enrolls cannot duplicate.
    async fn try_insert(&self, user_id: Uuid, training_id: Uuid) -> StoreResult<Option<Enrollment>>;
    async fn find(&self, user_id: Uuid, training_id: Uuid) -> StoreResult<Option<Enrollment>>;
    /// Creates or updates the record for the pair. The status and
    /// completion_date are written together in one statement so the
    /// completion invariant is never observable half-applied.
    async fn upsert_status(
        &self,
        user_id: Uuid,
        training_id: Uuid,
        status: EnrollmentStatus,
        completion_date: Option<Date>,
    ) -> StoreResult<Enrollment>;
    /// Returns whether a record was removed.
    async fn delete(&self, user_id: Uuid, training_id: Uuid) -> StoreResult<bool>;
    async fn delete_completed_for_user(&self, user_id: Uuid) -> StoreResult<u64>;
    async fn list_by_user(&self, user_id: Uuid) -> StoreResult<Vec<Enrollment>>;
    async fn list_by_training(&self, training_id: Uuid) -> StoreResult<Vec<Enrollment>>;
    async fn list_all(&self) -> StoreResult<Vec<Enrollment>>;
    /// Atomically creates the training and a Completed enrollment for the
    /// acting user (self-service registration flow).
    async fn insert_training_completed(
        &self,
        training: &Training,
        user_id: Uuid,
        completion_date: Date,
    ) -> StoreResult<(Training, Enrollment)>;
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn insert(&self, session: &Session) -> StoreResult<()>;
    async fn find(&self, token: Uuid) -> StoreResult<Option<Session>>;
    async fn delete(&self, token: Uuid) -> StoreResult<()>;
}

/// Handle bundle for the four collections; cheap to clone, swappable between
/// Postgres and the in-memory fake used by tests.
#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn UserStore>,
    pub trainings: Arc<dyn TrainingStore>,
    pub enrollments: Arc<dyn EnrollmentStore>,
    pub sessions: Arc<dyn SessionStore>,
}

impl Stores {
    pub fn postgres(pool: PgPool) -> Self {
        let store = Arc::new(PgStore::new(pool));
        Self {
            users: store.clone(),
            trainings: store.clone(),
            enrollments: store.clone(),
            sessions: store,
        }
    }

    pub fn in_memory() -> Self {
        let store = Arc::new(InMemoryStore::default());
        Self {
            users: store.clone(),
            trainings: store.clone(),
            enrollments: store.clone(),
            sessions: store,
        }
    }
}

use async_trait::async_trait;
use sqlx::PgPool;
use time::Date;
use uuid::Uuid;

use crate::db::error::DatabaseError;
use crate::db::models::{Enrollment, EnrollmentStatus, Session, Training, UpdateProfile, User};

use super::{EnrollmentStore, SessionStore, StoreResult, TrainingStore, UserStore};

const USER_COLUMNS: &str =
    "id, name, email, registration, job_title, admission_date, avatar_url, created_at, updated_at";
const TRAINING_COLUMNS: &str = "id, title, description, trainer_name, training_date, \
     training_hours, category, cover_image_id, content_url, created_at";
const ENROLLMENT_COLUMNS: &str =
    "id, user_id, training_id, status, completion_date, created_at, updated_at";

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn insert(&self, user: &User) -> StoreResult<User> {
        let sql = format!(
            "INSERT INTO users (id, name, email, registration, job_title, admission_date, avatar_url) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {USER_COLUMNS}"
        );
        let created = sqlx::query_as::<_, User>(&sql)
            .bind(user.id)
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.registration)
            .bind(&user.job_title)
            .bind(user.admission_date)
            .bind(&user.avatar_url)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_by_registration(&self, registration: &str) -> StoreResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE registration = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(registration)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn update_profile(&self, id: Uuid, changes: &UpdateProfile) -> StoreResult<Option<User>> {
        let sql = format!(
            "UPDATE users SET \
                name = COALESCE($1, name), \
                email = COALESCE($2, email), \
                job_title = COALESCE($3, job_title), \
                admission_date = COALESCE($4, admission_date), \
                avatar_url = COALESCE($5, avatar_url), \
                updated_at = NOW() \
             WHERE id = $6 \
             RETURNING {USER_COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(&changes.name)
            .bind(&changes.email)
            .bind(&changes.job_title)
            .bind(changes.admission_date)
            .bind(&changes.avatar_url)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn list(&self) -> StoreResult<Vec<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY name");
        let users = sqlx::query_as::<_, User>(&sql).fetch_all(&self.pool).await?;
        Ok(users)
    }
}

#[async_trait]
impl TrainingStore for PgStore {
    async fn insert(&self, training: &Training) -> StoreResult<Training> {
        let sql = format!(
            "INSERT INTO trainings (id, title, description, trainer_name, training_date, \
                 training_hours, category, cover_image_id, content_url) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {TRAINING_COLUMNS}"
        );
        let created = sqlx::query_as::<_, Training>(&sql)
            .bind(training.id)
            .bind(&training.title)
            .bind(&training.description)
            .bind(&training.trainer_name)
            .bind(training.training_date)
            .bind(training.training_hours)
            .bind(training.category)
            .bind(&training.cover_image_id)
            .bind(&training.content_url)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Training>> {
        let sql = format!("SELECT {TRAINING_COLUMNS} FROM trainings WHERE id = $1");
        let training = sqlx::query_as::<_, Training>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(training)
    }

    async fn list(&self) -> StoreResult<Vec<Training>> {
        let sql = format!("SELECT {TRAINING_COLUMNS} FROM trainings ORDER BY training_date");
        let trainings = sqlx::query_as::<_, Training>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(trainings)
    }
}

#[async_trait]
impl EnrollmentStore for PgStore {
    async fn try_insert(
        &self,
        user_id: Uuid,
        training_id: Uuid,
    ) -> StoreResult<Option<Enrollment>> {
        // ON CONFLICT DO NOTHING keeps the (user, training) uniqueness
        // race-tolerant: the loser of a concurrent enroll sees no row back.
        let sql = format!(
            "INSERT INTO enrollments (id, user_id, training_id, status, completion_date) \
             VALUES ($1, $2, $3, $4, NULL) \
             ON CONFLICT (user_id, training_id) DO NOTHING \
             RETURNING {ENROLLMENT_COLUMNS}"
        );
        let enrollment = sqlx::query_as::<_, Enrollment>(&sql)
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(training_id)
            .bind(EnrollmentStatus::NotStarted)
            .fetch_optional(&self.pool)
            .await?;
        Ok(enrollment)
    }

    async fn find(&self, user_id: Uuid, training_id: Uuid) -> StoreResult<Option<Enrollment>> {
        let sql = format!(
            "SELECT {ENROLLMENT_COLUMNS} FROM enrollments \
             WHERE user_id = $1 AND training_id = $2"
        );
        let enrollment = sqlx::query_as::<_, Enrollment>(&sql)
            .bind(user_id)
            .bind(training_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(enrollment)
    }

    async fn upsert_status(
        &self,
        user_id: Uuid,
        training_id: Uuid,
        status: EnrollmentStatus,
        completion_date: Option<Date>,
    ) -> StoreResult<Enrollment> {
        let sql = format!(
            "INSERT INTO enrollments (id, user_id, training_id, status, completion_date) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (user_id, training_id) DO UPDATE SET \
                status = EXCLUDED.status, \
                completion_date = EXCLUDED.completion_date, \
                updated_at = NOW() \
             RETURNING {ENROLLMENT_COLUMNS}"
        );
        let enrollment = sqlx::query_as::<_, Enrollment>(&sql)
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(training_id)
            .bind(status)
            .bind(completion_date)
            .fetch_one(&self.pool)
            .await?;
        Ok(enrollment)
    }

    async fn delete(&self, user_id: Uuid, training_id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM enrollments WHERE user_id = $1 AND training_id = $2")
            .bind(user_id)
            .bind(training_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_completed_for_user(&self, user_id: Uuid) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM enrollments WHERE user_id = $1 AND status = $2")
            .bind(user_id)
            .bind(EnrollmentStatus::Completed)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn list_by_user(&self, user_id: Uuid) -> StoreResult<Vec<Enrollment>> {
        let sql = format!(
            "SELECT {ENROLLMENT_COLUMNS} FROM enrollments \
             WHERE user_id = $1 ORDER BY created_at"
        );
        let enrollments = sqlx::query_as::<_, Enrollment>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(enrollments)
    }

    async fn list_by_training(&self, training_id: Uuid) -> StoreResult<Vec<Enrollment>> {
        let sql = format!(
            "SELECT {ENROLLMENT_COLUMNS} FROM enrollments \
             WHERE training_id = $1 ORDER BY created_at"
        );
        let enrollments = sqlx::query_as::<_, Enrollment>(&sql)
            .bind(training_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(enrollments)
    }

    async fn list_all(&self) -> StoreResult<Vec<Enrollment>> {
        let sql = format!("SELECT {ENROLLMENT_COLUMNS} FROM enrollments ORDER BY created_at");
        let enrollments = sqlx::query_as::<_, Enrollment>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(enrollments)
    }

    async fn insert_training_completed(
        &self,
        training: &Training,
        user_id: Uuid,
        completion_date: Date,
    ) -> StoreResult<(Training, Enrollment)> {
        let mut tx = self.pool.begin().await?;

        let insert_training = format!(
            "INSERT INTO trainings (id, title, description, trainer_name, training_date, \
                 training_hours, category, cover_image_id, content_url) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {TRAINING_COLUMNS}"
        );
        let created = sqlx::query_as::<_, Training>(&insert_training)
            .bind(training.id)
            .bind(&training.title)
            .bind(&training.description)
            .bind(&training.trainer_name)
            .bind(training.training_date)
            .bind(training.training_hours)
            .bind(training.category)
            .bind(&training.cover_image_id)
            .bind(&training.content_url)
            .fetch_one(&mut *tx)
            .await?;

        let insert_enrollment = format!(
            "INSERT INTO enrollments (id, user_id, training_id, status, completion_date) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {ENROLLMENT_COLUMNS}"
        );
        let enrollment = sqlx::query_as::<_, Enrollment>(&insert_enrollment)
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(created.id)
            .bind(EnrollmentStatus::Completed)
            .bind(completion_date)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok((created, enrollment))
    }
}

#[async_trait]
impl SessionStore for PgStore {
    async fn insert(&self, session: &Session) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO sessions (token, user_id, expires_at, created_at) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(session.token)
        .bind(session.user_id)
        .bind(session.expires_at)
        .bind(session.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find(&self, token: Uuid) -> StoreResult<Option<Session>> {
        let session = sqlx::query_as::<_, Session>(
            "SELECT token, user_id, expires_at, created_at FROM sessions WHERE token = $1",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        Ok(session)
    }

    async fn delete(&self, token: Uuid) -> StoreResult<()> {
        sqlx::query("DELETE FROM sessions WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

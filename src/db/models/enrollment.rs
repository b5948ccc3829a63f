use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use time::{Date, OffsetDateTime};

/// Progress of one user through one training. Canonical internally;
/// localized labels are applied only at the presentation boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "enrollment_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EnrollmentStatus {
    NotStarted,
    InProgress,
    Completed,
}

/// One row of the enrollment ledger.
///
/// Invariants (held by `EnrollmentLedger` and the stores):
/// - at most one row per (user_id, training_id),
/// - completion_date is non-null exactly when status is Completed.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub training_id: Uuid,
    pub status: EnrollmentStatus,
    pub completion_date: Option<Date>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SetStatusRequest {
    pub status: EnrollmentStatus,
}

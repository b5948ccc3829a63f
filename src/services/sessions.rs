use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::db::models::Session;
use crate::db::repositories::Stores;
use crate::error::AppResult;

/// Resolves the acting user for a request. The cookie only ever carries an
/// opaque random token; the user id lives server-side with an expiry.
pub struct SessionGate {
    stores: Stores,
    ttl: Duration,
}

impl SessionGate {
    pub fn new(stores: Stores, ttl_hours: i64) -> Self {
        Self {
            stores,
            ttl: Duration::hours(ttl_hours),
        }
    }

    pub async fn create_session(&self, user_id: Uuid) -> AppResult<Session> {
        let session = Session::new(user_id, self.ttl);
        self.stores.sessions.insert(&session).await?;
        Ok(session)
    }

    /// Returns the user id behind a token, reaping the record if it has
    /// expired.
    pub async fn authenticate(&self, token: Uuid) -> AppResult<Option<Uuid>> {
        match self.stores.sessions.find(token).await? {
            Some(session) if session.is_expired(OffsetDateTime::now_utc()) => {
                self.stores.sessions.delete(token).await?;
                Ok(None)
            }
            Some(session) => Ok(Some(session.user_id)),
            None => Ok(None),
        }
    }

    pub async fn destroy_session(&self, token: Uuid) -> AppResult<()> {
        self.stores.sessions.delete(token).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn round_trip_resolves_the_user() {
        let stores = Stores::in_memory();
        let gate = SessionGate::new(stores, 24);
        let user_id = Uuid::new_v4();

        let session = gate.create_session(user_id).await.unwrap();
        assert_eq!(gate.authenticate(session.token).await.unwrap(), Some(user_id));
    }

    #[tokio::test]
    async fn unknown_token_resolves_to_none() {
        let stores = Stores::in_memory();
        let gate = SessionGate::new(stores, 24);

        assert_eq!(gate.authenticate(Uuid::new_v4()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn expired_session_is_rejected_and_reaped() {
        let stores = Stores::in_memory();
        let gate = SessionGate::new(stores.clone(), 0);
        let session = gate.create_session(Uuid::new_v4()).await.unwrap();

        assert_eq!(gate.authenticate(session.token).await.unwrap(), None);
        assert!(stores.sessions.find(session.token).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn destroyed_session_no_longer_authenticates() {
        let stores = Stores::in_memory();
        let gate = SessionGate::new(stores, 24);
        let session = gate.create_session(Uuid::new_v4()).await.unwrap();

        gate.destroy_session(session.token).await.unwrap();
        assert_eq!(gate.authenticate(session.token).await.unwrap(), None);
    }
}

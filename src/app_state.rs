use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::db::repositories::Stores;
use crate::storage::BlobStorage;

#[derive(Clone)]
pub struct AppState {
    /// Present when running against Postgres; the in-memory stores used by
    /// tests carry no pool.
    pub db: Option<PgPool>,
    pub env: Config,
    pub stores: Stores,
    pub blobs: Arc<dyn BlobStorage>,
}

impl AppState {
    pub fn new(
        db: Option<PgPool>,
        env: Config,
        stores: Stores,
        blobs: Arc<dyn BlobStorage>,
    ) -> Self {
        Self {
            db,
            env,
            stores,
            blobs,
        }
    }
}

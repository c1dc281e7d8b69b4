use crate::domain::{models::offer::Offer, ports::OfferRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteOfferRepo {
    pool: SqlitePool,
}

impl SqliteOfferRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OfferRepository for SqliteOfferRepo {
    async fn find_by_id(&self, id: i64) -> Result<Option<Offer>, AppError> {
        sqlx::query_as::<_, Offer>("SELECT * FROM offers WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}

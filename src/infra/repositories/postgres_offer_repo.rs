use crate::domain::{models::offer::Offer, ports::OfferRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresOfferRepo {
    pool: PgPool,
}

impl PostgresOfferRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OfferRepository for PostgresOfferRepo {
    async fn find_by_id(&self, id: i64) -> Result<Option<Offer>, AppError> {
        sqlx::query_as::<_, Offer>("SELECT * FROM offers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}

use crate::domain::{models::rule::AvailabilityRule, ports::AvailabilityRuleRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresRuleRepo {
    pool: PgPool,
}

impl PostgresRuleRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AvailabilityRuleRepository for PostgresRuleRepo {
    async fn replace_for_offer(
        &self,
        offer_id: i64,
        rules: &[AvailabilityRule],
    ) -> Result<Vec<AvailabilityRule>, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        sqlx::query("DELETE FROM availability_rules WHERE offer_id = $1")
            .bind(offer_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        let mut stored = Vec::with_capacity(rules.len());
        for rule in rules {
            let row = sqlx::query_as::<_, AvailabilityRule>(
                "INSERT INTO availability_rules (id, offer_id, weekday, start_hour, end_hour, slot_minutes, max_bookings, active, exceptions_json, created_at)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                 RETURNING *",
            )
                .bind(&rule.id).bind(rule.offer_id).bind(rule.weekday)
                .bind(rule.start_hour).bind(rule.end_hour).bind(rule.slot_minutes)
                .bind(rule.max_bookings).bind(rule.active).bind(&rule.exceptions_json)
                .bind(rule.created_at)
                .fetch_one(&mut *tx)
                .await
                .map_err(AppError::Database)?;
            stored.push(row);
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(stored)
    }

    async fn list_for_offer(&self, offer_id: i64) -> Result<Vec<AvailabilityRule>, AppError> {
        sqlx::query_as::<_, AvailabilityRule>(
            "SELECT * FROM availability_rules WHERE offer_id = $1 ORDER BY weekday ASC, start_hour ASC",
        )
            .bind(offer_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}

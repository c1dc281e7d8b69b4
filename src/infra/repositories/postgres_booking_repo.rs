use crate::domain::{
    models::booking::{Booking, BookingStatus},
    ports::BookingRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use sqlx::PgPool;

pub struct PostgresBookingRepo {
    pool: PgPool,
}

impl PostgresBookingRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for PostgresBookingRepo {
    async fn create_in_slot(&self, booking: &Booking, capacity: i32) -> Result<Booking, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        // Advisory transaction lock on the slot key serializes concurrent
        // count-then-insert attempts for the same (offer, date, time).
        let key = format!("{}:{}:{}", booking.offer_id, booking.date, booking.start_time);
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1)::bigint)")
            .bind(&key)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        let active: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM bookings WHERE offer_id = $1 AND date = $2 AND start_time = $3 AND status IN (0, 1)",
        )
            .bind(booking.offer_id)
            .bind(booking.date)
            .bind(booking.start_time)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        if active >= capacity as i64 {
            return Err(AppError::SlotFull);
        }

        let created = sqlx::query_as::<_, Booking>(
            "INSERT INTO bookings (id, offer_id, shop_id, customer_id, date, start_time, status, first_name, last_name, email, mobile, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING *",
        )
            .bind(&booking.id).bind(booking.offer_id).bind(booking.shop_id)
            .bind(booking.customer_id).bind(booking.date).bind(booking.start_time)
            .bind(booking.status).bind(&booking.first_name).bind(&booking.last_name)
            .bind(&booking.email).bind(&booking.mobile).bind(booking.created_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn count_active(
        &self,
        offer_id: i64,
        date: NaiveDate,
        start_time: NaiveTime,
    ) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM bookings WHERE offer_id = $1 AND date = $2 AND start_time = $3 AND status IN (0, 1)",
        )
            .bind(offer_id)
            .bind(date)
            .bind(start_time)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update_status(&self, id: &str, status: BookingStatus) -> Result<Booking, AppError> {
        sqlx::query_as::<_, Booking>("UPDATE bookings SET status = $1 WHERE id = $2 RETURNING *")
            .bind(status)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or_else(|| AppError::NotFound("Booking not found".into()))
    }

    async fn list_for_customer(&self, customer_id: i64) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE customer_id = $1 ORDER BY date ASC, start_time ASC",
        )
            .bind(customer_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_for_shop(&self, shop_id: i64) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE shop_id = $1 ORDER BY date ASC, start_time ASC",
        )
            .bind(shop_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_active_in_range(
        &self,
        offer_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE offer_id = $1 AND date >= $2 AND date <= $3 AND status IN (0, 1)",
        )
            .bind(offer_id)
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}

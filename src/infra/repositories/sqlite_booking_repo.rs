use crate::domain::{
    models::booking::{Booking, BookingStatus},
    ports::BookingRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use sqlx::SqlitePool;

pub struct SqliteBookingRepo {
    pool: SqlitePool,
}

impl SqliteBookingRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for SqliteBookingRepo {
    async fn create_in_slot(&self, booking: &Booking, capacity: i32) -> Result<Booking, AppError> {
        // Count and insert are one statement, so SQLite's single-writer
        // model serializes concurrent attempts on the same slot. Zero rows
        // inserted means the slot was already at capacity.
        let created = sqlx::query_as::<_, Booking>(
            "INSERT INTO bookings (id, offer_id, shop_id, customer_id, date, start_time, status, first_name, last_name, email, mobile, created_at)
             SELECT ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?
             WHERE (SELECT COUNT(*) FROM bookings
                    WHERE offer_id = ? AND date = ? AND start_time = ? AND status IN (0, 1)) < ?
             RETURNING *",
        )
            .bind(&booking.id).bind(booking.offer_id).bind(booking.shop_id)
            .bind(booking.customer_id).bind(booking.date).bind(booking.start_time)
            .bind(booking.status).bind(&booking.first_name).bind(&booking.last_name)
            .bind(&booking.email).bind(&booking.mobile).bind(booking.created_at)
            .bind(booking.offer_id).bind(booking.date).bind(booking.start_time)
            .bind(capacity)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?;

        created.ok_or(AppError::SlotFull)
    }

    async fn count_active(
        &self,
        offer_id: i64,
        date: NaiveDate,
        start_time: NaiveTime,
    ) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM bookings WHERE offer_id = ? AND date = ? AND start_time = ? AND status IN (0, 1)",
        )
            .bind(offer_id)
            .bind(date)
            .bind(start_time)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update_status(&self, id: &str, status: BookingStatus) -> Result<Booking, AppError> {
        sqlx::query_as::<_, Booking>("UPDATE bookings SET status = ? WHERE id = ? RETURNING *")
            .bind(status)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or_else(|| AppError::NotFound("Booking not found".into()))
    }

    async fn list_for_customer(&self, customer_id: i64) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE customer_id = ? ORDER BY date ASC, start_time ASC",
        )
            .bind(customer_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_for_shop(&self, shop_id: i64) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE shop_id = ? ORDER BY date ASC, start_time ASC",
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
            "SELECT * FROM bookings WHERE offer_id = ? AND date >= ? AND date <= ? AND status IN (0, 1)",
        )
            .bind(offer_id)
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}

use crate::domain::models::{
    booking::{Booking, BookingStatus},
    offer::Offer,
    rule::AvailabilityRule,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};

/// Read-only view of the catalog store. Offers are owned by the catalog
/// service; this core never writes them.
#[async_trait]
pub trait OfferRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Offer>, AppError>;
}

#[async_trait]
pub trait AvailabilityRuleRepository: Send + Sync {
    /// Replaces the full rule set for an offer atomically: delete then bulk
    /// insert in one transaction. Readers observe the old set or the new
    /// set, never a mixture and never an empty interim state.
    async fn replace_for_offer(
        &self,
        offer_id: i64,
        rules: &[AvailabilityRule],
    ) -> Result<Vec<AvailabilityRule>, AppError>;

    /// The current rule set ordered by weekday, then start hour. Empty for
    /// offers with no configured pattern.
    async fn list_for_offer(&self, offer_id: i64) -> Result<Vec<AvailabilityRule>, AppError>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Inserts a Pending booking if and only if fewer than `capacity` active
    /// (Pending or Confirmed) bookings hold the same (offer, date, time)
    /// slot. Count and insert execute as one atomic unit serialized against
    /// concurrent attempts on the same slot; `SlotFull` otherwise. The
    /// effective capacity is supplied by the caller; the ledger does not
    /// consult the pattern store.
    async fn create_in_slot(&self, booking: &Booking, capacity: i32) -> Result<Booking, AppError>;

    async fn count_active(
        &self,
        offer_id: i64,
        date: NaiveDate,
        start_time: NaiveTime,
    ) -> Result<i64, AppError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError>;

    /// Writes the new status. Transition legality is the caller's concern.
    async fn update_status(&self, id: &str, status: BookingStatus) -> Result<Booking, AppError>;

    async fn list_for_customer(&self, customer_id: i64) -> Result<Vec<Booking>, AppError>;
    async fn list_for_shop(&self, shop_id: i64) -> Result<Vec<Booking>, AppError>;

    /// Active bookings for an offer within [start, end] inclusive, used by
    /// the calendar read path.
    async fn list_active_in_range(
        &self,
        offer_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Booking>, AppError>;
}

/// Fire-and-forget side channel. Invoked only after a successful commit;
/// failures are logged and never affect the booking outcome.
#[async_trait]
pub trait BookingNotifier: Send + Sync {
    async fn booking_created(&self, booking: &Booking) -> Result<(), AppError>;
    async fn booking_status_changed(&self, booking: &Booking) -> Result<(), AppError>;
}

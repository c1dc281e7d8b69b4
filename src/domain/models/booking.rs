use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize_repr, Deserialize_repr, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum BookingStatus {
    Pending = 0,
    Confirmed = 1,
    Completed = 2,
    Cancelled = 3,
}

impl BookingStatus {
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Pending),
            1 => Some(Self::Confirmed),
            2 => Some(Self::Completed),
            3 => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Pending and Confirmed bookings hold a seat; terminal states free it.
    pub fn counts_against_capacity(self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }

    /// Forward-only state machine: confirm, then complete; any non-terminal
    /// state may be cancelled. Completed and Cancelled have no exits.
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Confirmed)
                | (Self::Confirmed, Self::Completed)
                | (Self::Pending, Self::Cancelled)
                | (Self::Confirmed, Self::Cancelled)
        )
    }
}

/// One reservation of a slot. Customer details are captured at booking time
/// and never updated afterwards; rows are status-transitioned, not deleted.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub offer_id: i64,
    pub shop_id: i64,
    pub customer_id: i64,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub status: BookingStatus,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub mobile: String,
    pub created_at: DateTime<Utc>,
}

pub struct NewBookingParams {
    pub offer_id: i64,
    pub shop_id: i64,
    pub customer_id: i64,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub mobile: String,
}

impl Booking {
    pub fn new(params: NewBookingParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            offer_id: params.offer_id,
            shop_id: params.shop_id,
            customer_id: params.customer_id,
            date: params.date,
            start_time: params.start_time,
            status: BookingStatus::Pending,
            first_name: params.first_name,
            last_name: params.last_name,
            email: params.email,
            mobile: params.mobile,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::BookingStatus::*;

    #[test]
    fn forward_transitions_allowed() {
        assert!(Pending.can_transition_to(Confirmed));
        assert!(Confirmed.can_transition_to(Completed));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Confirmed.can_transition_to(Cancelled));
    }

    #[test]
    fn skipping_and_backward_transitions_rejected() {
        assert!(!Pending.can_transition_to(Completed));
        assert!(!Confirmed.can_transition_to(Pending));
        assert!(!Completed.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Pending));
        assert!(!Cancelled.can_transition_to(Confirmed));
    }

    #[test]
    fn self_transitions_rejected() {
        for s in [Pending, Confirmed, Completed, Cancelled] {
            assert!(!s.can_transition_to(s));
        }
    }

    #[test]
    fn only_pending_and_confirmed_hold_capacity() {
        assert!(Pending.counts_against_capacity());
        assert!(Confirmed.counts_against_capacity());
        assert!(!Completed.counts_against_capacity());
        assert!(!Cancelled.counts_against_capacity());
    }
}

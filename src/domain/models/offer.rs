use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};
use sqlx::FromRow;

/// Offer lifecycle as published by the catalog service.
#[derive(Debug, Serialize_repr, Deserialize_repr, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum OfferState {
    Active = 0,
    Disabled = 1,
    Cancelled = 2,
}

/// Read model of the catalog's offer record. The booking core never writes
/// to it; it only needs identity, ownership and lifecycle state.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    pub id: i64,
    pub shop_id: i64,
    pub description: String,
    pub state: OfferState,
    pub created_at: DateTime<Utc>,
}

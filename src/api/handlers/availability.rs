use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use chrono::{Duration, NaiveDate, Utc};
use std::collections::HashMap;
use std::sync::Arc;

use crate::api::dtos::{requests::AvailabilityQuery, responses::AvailabilityResponse};
use crate::domain::models::offer::OfferState;
use crate::domain::services::availability::materialize;
use crate::domain::services::calendar::{build_calendar, working_hours};
use crate::error::AppError;
use crate::state::AppState;

fn parse_date(value: &str, param: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("Invalid {} (YYYY-MM-DD)", param)))
}

/// Public calendar view: materialized slots merged with active-booking
/// counts, one entry per non-Sunday day in the requested range. Safe to call
/// with zero bookings and with no configured pattern.
pub async fn get_availability(
    State(state): State<Arc<AppState>>,
    Path(offer_id): Path<i64>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<impl IntoResponse, AppError> {
    let offer = state
        .offer_repo
        .find_by_id(offer_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Offer not found".into()))?;

    if offer.state == OfferState::Cancelled {
        return Err(AppError::NotFound("Offer not found".into()));
    }

    let start = match &query.start_date {
        Some(raw) => parse_date(raw, "startDate")?,
        None => Utc::now().date_naive(),
    };
    let end = match &query.end_date {
        Some(raw) => parse_date(raw, "endDate")?,
        None => start + Duration::days(state.config.booking_window_days),
    };

    let rules = state.rule_repo.list_for_offer(offer_id).await?;
    let slots = materialize(&rules, start, end);
    let hours = working_hours(&rules, &slots);

    let mut active_counts: HashMap<_, i64> = HashMap::new();
    if end >= start {
        for booking in state
            .booking_repo
            .list_active_in_range(offer_id, start, end)
            .await?
        {
            *active_counts
                .entry((booking.date, booking.start_time))
                .or_default() += 1;
        }
    }

    let availability = build_calendar(&slots, &active_counts, start, end, &hours);

    Ok(Json(AvailabilityResponse {
        availability,
        working_hours: hours,
    }))
}

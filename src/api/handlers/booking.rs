use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::{NaiveDate, NaiveTime};
use std::sync::Arc;
use tracing::{info, warn};
use validator::Validate;

use crate::api::dtos::requests::{CreateBookingRequest, UpdateBookingStatusRequest};
use crate::api::extractors::auth::AuthPrincipal;
use crate::domain::models::booking::{Booking, BookingStatus, NewBookingParams};
use crate::domain::models::offer::OfferState;
use crate::domain::services::availability::find_slot;
use crate::error::AppError;
use crate::state::AppState;

/// Booking creation: validate the request, check the slot is genuinely
/// offered, then let the ledger perform the capacity check and insert as one
/// atomic unit. Validation failures never open a transaction.
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    AuthPrincipal(principal): AuthPrincipal,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let date = NaiveDate::parse_from_str(&payload.date, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid date format (YYYY-MM-DD)".into()))?;

    let time = NaiveTime::parse_from_str(&payload.time, "%H:%M")
        .map_err(|_| AppError::Validation("Invalid time format (HH:MM)".into()))?;

    payload
        .customer
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let offer = state
        .offer_repo
        .find_by_id(payload.offer_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Offer not found".into()))?;

    match offer.state {
        OfferState::Active => {}
        OfferState::Cancelled => return Err(AppError::NotFound("Offer not found".into())),
        // The shop switched the offer off, so no slot is on offer.
        OfferState::Disabled => return Err(AppError::SlotNotOffered),
    }

    let rules = state.rule_repo.list_for_offer(offer.id).await?;
    let slot = find_slot(&rules, date, time).ok_or_else(|| {
        warn!(
            "Booking rejected: no offered slot at {} {} for offer {}",
            date, payload.time, offer.id
        );
        AppError::SlotNotOffered
    })?;

    let booking = Booking::new(NewBookingParams {
        offer_id: offer.id,
        shop_id: offer.shop_id,
        customer_id: principal.user_id,
        date,
        start_time: time,
        first_name: payload.customer.first_name,
        last_name: payload.customer.last_name,
        email: payload.customer.email,
        mobile: payload.customer.mobile,
    });

    let created = state.booking_repo.create_in_slot(&booking, slot.capacity).await?;
    info!("Booking created: {} for offer {}", created.id, offer.id);

    let notifier = state.notifier.clone();
    let notify_copy = created.clone();
    tokio::spawn(async move {
        if let Err(e) = notifier.booking_created(&notify_copy).await {
            warn!("Booking notification failed: {}", e);
        }
    });

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_booking_status(
    State(state): State<Arc<AppState>>,
    AuthPrincipal(principal): AuthPrincipal,
    Json(payload): Json<UpdateBookingStatusRequest>,
) -> Result<impl IntoResponse, AppError> {
    let new_status = BookingStatus::from_code(payload.new_status)
        .ok_or_else(|| AppError::Validation(format!("Unknown status {}", payload.new_status)))?;

    let booking = state
        .booking_repo
        .find_by_id(&payload.booking_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".into()))?;

    if booking.customer_id != principal.user_id && booking.shop_id != principal.user_id {
        return Err(AppError::Forbidden("Not your booking".into()));
    }

    if !booking.status.can_transition_to(new_status) {
        return Err(AppError::InvalidTransition(format!(
            "cannot move booking from status {} to {}",
            booking.status as i32, new_status as i32
        )));
    }

    let updated = state
        .booking_repo
        .update_status(&booking.id, new_status)
        .await?;
    info!(
        "Booking {} status changed: {} -> {}",
        updated.id, booking.status as i32, new_status as i32
    );

    let notifier = state.notifier.clone();
    let notify_copy = updated.clone();
    tokio::spawn(async move {
        if let Err(e) = notifier.booking_status_changed(&notify_copy).await {
            warn!("Status-change notification failed: {}", e);
        }
    });

    Ok(Json(updated))
}

pub async fn list_my_bookings(
    State(state): State<Arc<AppState>>,
    AuthPrincipal(principal): AuthPrincipal,
) -> Result<impl IntoResponse, AppError> {
    let bookings = state.booking_repo.list_for_customer(principal.user_id).await?;
    Ok(Json(bookings))
}

pub async fn list_shop_bookings(
    State(state): State<Arc<AppState>>,
    AuthPrincipal(principal): AuthPrincipal,
) -> Result<impl IntoResponse, AppError> {
    if !principal.is_shop() {
        return Err(AppError::Forbidden("Only shops can list shop bookings".into()));
    }

    let bookings = state.booking_repo.list_for_shop(principal.user_id).await?;
    Ok(Json(bookings))
}

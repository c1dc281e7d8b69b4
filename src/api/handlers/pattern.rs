use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::{requests::SetAvailabilityRequest, responses::RuleView};
use crate::api::extractors::auth::AuthPrincipal;
use crate::domain::models::offer::{Offer, OfferState};
use crate::domain::models::rule::{validate_definitions, AvailabilityRule};
use crate::error::AppError;
use crate::state::AppState;

async fn load_offer(state: &AppState, offer_id: i64) -> Result<Offer, AppError> {
    let offer = state
        .offer_repo
        .find_by_id(offer_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Offer not found".into()))?;

    if offer.state == OfferState::Cancelled {
        return Err(AppError::NotFound("Offer not found".into()));
    }
    Ok(offer)
}

pub async fn set_pattern(
    State(state): State<Arc<AppState>>,
    AuthPrincipal(principal): AuthPrincipal,
    Path(offer_id): Path<i64>,
    Json(payload): Json<SetAvailabilityRequest>,
) -> Result<impl IntoResponse, AppError> {
    if !principal.is_shop() {
        return Err(AppError::Forbidden("Only shops can manage availability".into()));
    }

    let offer = load_offer(&state, offer_id).await?;
    if offer.shop_id != principal.user_id {
        return Err(AppError::Forbidden(
            "You do not have permission to modify this offer".into(),
        ));
    }

    validate_definitions(&payload.availability).map_err(AppError::Validation)?;

    let rules: Vec<AvailabilityRule> = payload
        .availability
        .iter()
        .map(|def| AvailabilityRule::from_definition(offer_id, def))
        .collect();

    let stored = state.rule_repo.replace_for_offer(offer_id, &rules).await?;

    info!(
        "Availability pattern replaced for offer {}: {} rules",
        offer_id,
        stored.len()
    );

    Ok(Json(stored.iter().map(RuleView::from).collect::<Vec<_>>()))
}

pub async fn get_pattern(
    State(state): State<Arc<AppState>>,
    AuthPrincipal(principal): AuthPrincipal,
    Path(offer_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    if !principal.is_shop() {
        return Err(AppError::Forbidden("Only shops can read availability patterns".into()));
    }

    load_offer(&state, offer_id).await?;

    // Empty set, not an error, for offers with no configured pattern.
    let rules = state.rule_repo.list_for_offer(offer_id).await?;
    Ok(Json(rules.iter().map(RuleView::from).collect::<Vec<_>>()))
}

use std::sync::Arc;

use crate::config::Config;
use crate::domain::ports::{
    AvailabilityRuleRepository, BookingNotifier, BookingRepository, OfferRepository,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub offer_repo: Arc<dyn OfferRepository>,
    pub rule_repo: Arc<dyn AvailabilityRuleRepository>,
    pub booking_repo: Arc<dyn BookingRepository>,
    pub notifier: Arc<dyn BookingNotifier>,
}

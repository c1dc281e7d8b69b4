use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use validator::Validate;

use crate::domain::models::rule::RuleDefinition;

lazy_static! {
    // Optional leading +, then 6-15 digits. Mirrors the mobile check the
    // booking form enforces client-side.
    static ref MOBILE_RE: Regex = Regex::new(r"^\+?[0-9]{6,15}$").unwrap();
}

/// Customer contact details captured at booking time.
#[derive(Debug, Deserialize, Validate, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDetails {
    #[validate(length(min = 1, message = "firstName is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "lastName is required"))]
    pub last_name: String,
    #[validate(email(message = "email is not valid"))]
    pub email: String,
    #[validate(regex(path = *MOBILE_RE, message = "mobile is not a valid number"))]
    pub mobile: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub offer_id: i64,
    pub date: String,
    pub time: String,
    pub customer: CustomerDetails,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookingStatusRequest {
    pub booking_id: String,
    pub new_status: i32,
}

#[derive(Deserialize)]
pub struct SetAvailabilityRequest {
    pub availability: Vec<RuleDefinition>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

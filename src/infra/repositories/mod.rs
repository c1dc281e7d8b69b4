pub mod postgres_booking_repo;
pub mod postgres_offer_repo;
pub mod postgres_rule_repo;
pub mod sqlite_booking_repo;
pub mod sqlite_offer_repo;
pub mod sqlite_rule_repo;

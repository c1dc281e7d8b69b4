use officina_booking_backend::{
    api::router::create_router,
    config::Config,
    domain::models::{auth::Claims, booking::Booking},
    domain::ports::BookingNotifier,
    error::AppError,
    infra::repositories::{
        sqlite_booking_repo::SqliteBookingRepo, sqlite_offer_repo::SqliteOfferRepo,
        sqlite_rule_repo::SqliteRuleRepo,
    },
    state::AppState,
};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request},
    Router,
};
use chrono::{Datelike, Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

pub const JWT_SECRET: &str = "test-secret";
pub const ROLE_CUSTOMER: i32 = 1;
pub const ROLE_SHOP: i32 = 2;

pub struct MockNotifier;

#[async_trait]
impl BookingNotifier for MockNotifier {
    async fn booking_created(&self, _booking: &Booking) -> Result<(), AppError> {
        Ok(())
    }

    async fn booking_status_changed(&self, _booking: &Booking) -> Result<(), AppError> {
        Ok(())
    }
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(std::time::Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            jwt_secret: JWT_SECRET.to_string(),
            notify_service_url: "http://localhost".to_string(),
            notify_service_token: "token".to_string(),
            booking_window_days: 30,
        };

        let state = Arc::new(AppState {
            config,
            offer_repo: Arc::new(SqliteOfferRepo::new(pool.clone())),
            rule_repo: Arc::new(SqliteRuleRepo::new(pool.clone())),
            booking_repo: Arc::new(SqliteBookingRepo::new(pool.clone())),
            notifier: Arc::new(MockNotifier),
        });

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }

    pub fn bearer(&self, user_id: i64, role: i32) -> String {
        let claims = Claims {
            sub: user_id.to_string(),
            role,
            exp: (Utc::now() + Duration::hours(1)).timestamp() as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
        )
        .unwrap();
        format!("Bearer {}", token)
    }

    pub async fn seed_offer(&self, offer_id: i64, shop_id: i64, state: i32) {
        sqlx::query(
            "INSERT INTO offers (id, shop_id, description, state, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(offer_id)
        .bind(shop_id)
        .bind("Tagliando completo")
        .bind(state)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .expect("Failed to seed offer");
    }

    pub async fn put_pattern(
        &self,
        auth: &str,
        offer_id: i64,
        availability: Value,
    ) -> axum::response::Response {
        self.router
            .clone()
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri(format!("/api/v1/offers/{}/pattern", offer_id))
                    .header(header::AUTHORIZATION, auth)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        serde_json::json!({ "availability": availability }).to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    pub async fn book(
        &self,
        auth: &str,
        offer_id: i64,
        date: &str,
        time: &str,
    ) -> axum::response::Response {
        let payload = serde_json::json!({
            "offerId": offer_id,
            "date": date,
            "time": time,
            "customer": {
                "firstName": "Mario",
                "lastName": "Rossi",
                "email": "mario.rossi@example.com",
                "mobile": "+393331234567"
            }
        });

        self.router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/bookings")
                    .header(header::AUTHORIZATION, auth)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}

pub async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// First Monday at least a week out, so every test date is in the future.
pub fn next_monday() -> chrono::NaiveDate {
    let mut date = Utc::now().date_naive() + Duration::days(7);
    while date.weekday().number_from_monday() != 1 {
        date = date.succ_opt().unwrap();
    }
    date
}

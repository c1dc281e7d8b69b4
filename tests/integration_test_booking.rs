mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::{next_monday, parse_body, TestApp, ROLE_CUSTOMER, ROLE_SHOP};
use serde_json::json;
use tower::ServiceExt;

async fn seed_monday_pattern(app: &TestApp, offer_id: i64, shop_id: i64, max_bookings: i64) {
    let shop = app.bearer(shop_id, ROLE_SHOP);
    let res = app
        .put_pattern(
            &shop,
            offer_id,
            json!([{
                "dayOfWeek": 1,
                "startHour": 8.0,
                "endHour": 10.0,
                "intervalMinutes": 60,
                "maxBookings": max_bookings
            }]),
        )
        .await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn successful_booking_is_created_pending() {
    let app = TestApp::new().await;
    app.seed_offer(1, 10, 0).await;
    seed_monday_pattern(&app, 1, 10, 1).await;
    let customer = app.bearer(20, ROLE_CUSTOMER);

    let monday = next_monday().format("%Y-%m-%d").to_string();
    let res = app.book(&customer, 1, &monday, "08:00").await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let body = parse_body(res).await;
    assert_eq!(body["status"], 0);
    assert_eq!(body["offerId"], 1);
    assert_eq!(body["shopId"], 10);
    assert_eq!(body["customerId"], 20);
    assert_eq!(body["date"], monday);
    assert_eq!(body["firstName"], "Mario");
    assert_eq!(body["lastName"], "Rossi");
    assert_eq!(body["email"], "mario.rossi@example.com");
    assert!(body["id"].as_str().is_some());

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bookings")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn rebooking_a_full_slot_is_rejected() {
    let app = TestApp::new().await;
    app.seed_offer(1, 10, 0).await;
    seed_monday_pattern(&app, 1, 10, 1).await;
    let customer = app.bearer(20, ROLE_CUSTOMER);

    let monday = next_monday().format("%Y-%m-%d").to_string();
    let res = app.book(&customer, 1, &monday, "08:00").await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = app.book(&customer, 1, &monday, "08:00").await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    assert_eq!(parse_body(res).await["kind"], "SLOT_FULL");

    // The other hour is unaffected.
    let res = app.book(&customer, 1, &monday, "09:00").await;
    assert_eq!(res.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn uncovered_day_is_slot_not_offered() {
    let app = TestApp::new().await;
    app.seed_offer(1, 10, 0).await;
    seed_monday_pattern(&app, 1, 10, 1).await;
    let customer = app.bearer(20, ROLE_CUSTOMER);

    let tuesday = (next_monday() + chrono::Duration::days(1)).format("%Y-%m-%d").to_string();
    let res = app.book(&customer, 1, &tuesday, "08:00").await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    assert_eq!(parse_body(res).await["kind"], "SLOT_NOT_OFFERED");
}

#[tokio::test]
async fn off_grid_time_is_slot_not_offered() {
    let app = TestApp::new().await;
    app.seed_offer(1, 10, 0).await;
    seed_monday_pattern(&app, 1, 10, 1).await;
    let customer = app.bearer(20, ROLE_CUSTOMER);

    let monday = next_monday().format("%Y-%m-%d").to_string();
    // 08:30 is not a generated start for a 60-minute grid.
    let res = app.book(&customer, 1, &monday, "08:30").await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    assert_eq!(parse_body(res).await["kind"], "SLOT_NOT_OFFERED");

    // Past the end of the window.
    let res = app.book(&customer, 1, &monday, "10:00").await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn malformed_customer_details_fail_before_any_write() {
    let app = TestApp::new().await;
    app.seed_offer(1, 10, 0).await;
    seed_monday_pattern(&app, 1, 10, 1).await;
    let customer = app.bearer(20, ROLE_CUSTOMER);

    let monday = next_monday().format("%Y-%m-%d").to_string();
    let payload = json!({
        "offerId": 1,
        "date": monday,
        "time": "08:00",
        "customer": {
            "firstName": "Mario",
            "lastName": "Rossi",
            "email": "not-an-email",
            "mobile": "+393331234567"
        }
    });

    let res = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/bookings")
                .header(header::AUTHORIZATION, &customer)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(parse_body(res).await["kind"], "VALIDATION");

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bookings")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn malformed_date_and_time_are_validation_errors() {
    let app = TestApp::new().await;
    app.seed_offer(1, 10, 0).await;
    seed_monday_pattern(&app, 1, 10, 1).await;
    let customer = app.bearer(20, ROLE_CUSTOMER);

    let res = app.book(&customer, 1, "10-08-2026", "08:00").await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app.book(&customer, 1, "2026-02-30", "08:00").await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let monday = next_monday().format("%Y-%m-%d").to_string();
    let res = app.book(&customer, 1, &monday, "8 o'clock").await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app.book(&customer, 1, &monday, "25:00").await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn booking_requires_authentication() {
    let app = TestApp::new().await;
    app.seed_offer(1, 10, 0).await;

    let res = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/bookings")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({
                        "offerId": 1,
                        "date": "2026-08-10",
                        "time": "08:00",
                        "customer": {
                            "firstName": "Mario",
                            "lastName": "Rossi",
                            "email": "mario.rossi@example.com",
                            "mobile": "+393331234567"
                        }
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn cancelled_offer_is_not_bookable() {
    let app = TestApp::new().await;
    app.seed_offer(1, 10, 2).await; // Cancelled
    let customer = app.bearer(20, ROLE_CUSTOMER);

    let monday = next_monday().format("%Y-%m-%d").to_string();
    let res = app.book(&customer, 1, &monday, "08:00").await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn disabled_offer_offers_no_slots() {
    let app = TestApp::new().await;
    app.seed_offer(1, 10, 1).await; // Disabled
    let customer = app.bearer(20, ROLE_CUSTOMER);

    let monday = next_monday().format("%Y-%m-%d").to_string();
    let res = app.book(&customer, 1, &monday, "08:00").await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    assert_eq!(parse_body(res).await["kind"], "SLOT_NOT_OFFERED");
}

#[tokio::test]
async fn capacity_override_exception_applies_for_that_date_only() {
    let app = TestApp::new().await;
    app.seed_offer(1, 10, 0).await;
    let shop = app.bearer(10, ROLE_SHOP);
    let monday = next_monday();
    let monday_str = monday.format("%Y-%m-%d").to_string();

    app.put_pattern(
        &shop,
        1,
        json!([{
            "dayOfWeek": 1,
            "startHour": 8.0,
            "endHour": 10.0,
            "maxBookings": 1,
            "exceptions": [{ "date": monday_str, "maxBookings": 2 }]
        }]),
    )
    .await;

    let customer = app.bearer(20, ROLE_CUSTOMER);

    // Two seats on the overridden date.
    assert_eq!(app.book(&customer, 1, &monday_str, "08:00").await.status(), StatusCode::CREATED);
    assert_eq!(app.book(&customer, 1, &monday_str, "08:00").await.status(), StatusCode::CREATED);
    let res = app.book(&customer, 1, &monday_str, "08:00").await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    assert_eq!(parse_body(res).await["kind"], "SLOT_FULL");

    // Base capacity on the following Monday.
    let next = (monday + chrono::Duration::days(7)).format("%Y-%m-%d").to_string();
    assert_eq!(app.book(&customer, 1, &next, "08:00").await.status(), StatusCode::CREATED);
    assert_eq!(app.book(&customer, 1, &next, "08:00").await.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn listings_are_ordered_by_date() {
    let app = TestApp::new().await;
    app.seed_offer(1, 10, 0).await;
    seed_monday_pattern(&app, 1, 10, 2).await;
    let customer = app.bearer(20, ROLE_CUSTOMER);
    let shop = app.bearer(10, ROLE_SHOP);

    let monday = next_monday();
    let later = (monday + chrono::Duration::days(7)).format("%Y-%m-%d").to_string();
    let sooner = monday.format("%Y-%m-%d").to_string();

    // Booked out of date order.
    app.book(&customer, 1, &later, "08:00").await;
    app.book(&customer, 1, &sooner, "09:00").await;

    let res = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/v1/bookings/me")
                .header(header::AUTHORIZATION, &customer)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let mine = parse_body(res).await;
    let mine = mine.as_array().unwrap().clone();
    assert_eq!(mine.len(), 2);
    assert_eq!(mine[0]["date"], sooner);
    assert_eq!(mine[1]["date"], later);

    let res = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/v1/bookings/shop")
                .header(header::AUTHORIZATION, &shop)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(parse_body(res).await.as_array().unwrap().len(), 2);

    // Customers cannot use the shop listing.
    let res = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/v1/bookings/shop")
                .header(header::AUTHORIZATION, &customer)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

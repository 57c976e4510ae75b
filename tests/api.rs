use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, web, App, Error};
use serde_json::{json, Value};
use sqlx::SqlitePool;

use stayhub::db::memory_pool;
use stayhub::handlers;

async fn service(
    pool: &SqlitePool,
) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = Error> {
    test::init_service(
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .configure(handlers::routes),
    )
    .await
}

async fn insert_user(pool: &SqlitePool, username: &str) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO users (username, first_name, last_name, email) VALUES (?, '', '', ?) RETURNING id",
    )
    .bind(username)
    .bind(format!("{}@example.com", username))
    .fetch_one(pool)
    .await
    .expect("insert user")
}

fn listing_payload(host_id: i64) -> Value {
    json!({
        "host_id": host_id,
        "title": "Cozy Downtown Apartment",
        "description": "Modern apartment in the city center.",
        "location": "New York, NY",
        "price_per_night": 100.0,
        "amenities": ["WiFi", "Kitchen"],
        "property_type": "apartment",
        "max_guests": 4,
        "bedrooms": 2,
        "bathrooms": 1,
        "availability": true
    })
}

async fn create_listing(
    app: &impl Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>,
    as_user: i64,
    payload: Value,
) -> Value {
    let req = test::TestRequest::post()
        .uri("/listings")
        .insert_header(("X-User-Id", as_user.to_string()))
        .set_json(&payload)
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), 201, "listing creation should succeed");
    test::read_body_json(resp).await
}

#[actix_web::test]
async fn requests_without_credentials_are_rejected() {
    let pool = memory_pool().await;
    let app = service(&pool).await;

    let req = test::TestRequest::get().uri("/listings").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);

    // An id that resolves to no stored user is just as unauthenticated
    let req = test::TestRequest::get()
        .uri("/listings")
        .insert_header(("X-User-Id", "999"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
}

#[actix_web::test]
async fn listing_create_and_retrieve_round_trip() {
    let pool = memory_pool().await;
    let app = service(&pool).await;
    let host = insert_user(&pool, "hostuser").await;

    let created = create_listing(&app, host, listing_payload(host)).await;
    assert_eq!(created["title"], "Cozy Downtown Apartment");
    assert_eq!(created["host"]["username"], "hostuser");
    assert_eq!(created["average_rating"], 0.0);
    assert_eq!(created["review_count"], 0);

    let id = created["listing_id"].as_str().expect("listing id");
    let req = test::TestRequest::get()
        .uri(&format!("/listings/{}", id))
        .insert_header(("X-User-Id", host.to_string()))
        .to_request();
    let detail: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(detail["listing_id"], created["listing_id"]);
    assert_eq!(detail["amenities"], json!(["WiFi", "Kitchen"]));
}

#[actix_web::test]
async fn listing_rejects_invalid_price_and_guests() {
    let pool = memory_pool().await;
    let app = service(&pool).await;
    let host = insert_user(&pool, "hostuser").await;

    let mut payload = listing_payload(host);
    payload["price_per_night"] = json!(0.0);
    let req = test::TestRequest::post()
        .uri("/listings")
        .insert_header(("X-User-Id", host.to_string()))
        .set_json(&payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["field"], "price_per_night");

    let mut payload = listing_payload(host);
    payload["max_guests"] = json!(0);
    let req = test::TestRequest::post()
        .uri("/listings")
        .insert_header(("X-User-Id", host.to_string()))
        .set_json(&payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["field"], "max_guests");
}

#[actix_web::test]
async fn listing_list_supports_filters() {
    let pool = memory_pool().await;
    let app = service(&pool).await;
    let host = insert_user(&pool, "hostuser").await;

    create_listing(&app, host, listing_payload(host)).await;
    let mut other = listing_payload(host);
    other["title"] = json!("Beachfront Villa Paradise");
    other["location"] = json!("Miami, FL");
    other["property_type"] = json!("villa");
    create_listing(&app, host, other).await;
    let mut closed = listing_payload(host);
    closed["title"] = json!("Mountain Cabin Retreat");
    closed["location"] = json!("Aspen, CO");
    closed["property_type"] = json!("cabin");
    closed["availability"] = json!(false);
    create_listing(&app, host, closed).await;

    let req = test::TestRequest::get()
        .uri("/listings?location=Miami")
        .insert_header(("X-User-Id", host.to_string()))
        .to_request();
    let listings: Value = test::call_and_read_body_json(&app, req).await;
    let listings = listings.as_array().expect("array");
    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0]["property_type"], "villa");

    let req = test::TestRequest::get()
        .uri("/listings?property_type=apartment")
        .insert_header(("X-User-Id", host.to_string()))
        .to_request();
    let listings: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listings.as_array().expect("array").len(), 1);

    let req = test::TestRequest::get()
        .uri("/listings?available=false")
        .insert_header(("X-User-Id", host.to_string()))
        .to_request();
    let listings: Value = test::call_and_read_body_json(&app, req).await;
    let listings = listings.as_array().expect("array");
    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0]["title"], "Mountain Cabin Retreat");
    assert_eq!(listings[0]["availability"], false);

    let req = test::TestRequest::get()
        .uri("/listings?available=true")
        .insert_header(("X-User-Id", host.to_string()))
        .to_request();
    let listings: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listings.as_array().expect("array").len(), 2);
}

#[actix_web::test]
async fn booking_price_is_derived_from_nightly_rate() {
    let pool = memory_pool().await;
    let app = service(&pool).await;
    let host = insert_user(&pool, "hostuser").await;
    let guest = insert_user(&pool, "guestuser").await;

    let listing = create_listing(&app, host, listing_payload(host)).await;

    let req = test::TestRequest::post()
        .uri("/bookings")
        .insert_header(("X-User-Id", guest.to_string()))
        .set_json(&json!({
            "property_id": listing["listing_id"],
            "user_id": guest,
            "check_in": "2024-01-01",
            "check_out": "2024-01-04",
            "guests": 2
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);
    let booking: Value = test::read_body_json(resp).await;
    assert_eq!(booking["total_price"], 300.0);
    assert_eq!(booking["duration_days"], 3);
    assert_eq!(booking["status"], "pending");
    assert_eq!(booking["property"]["listing_id"], listing["listing_id"]);
    assert_eq!(booking["user"]["username"], "guestuser");
}

#[actix_web::test]
async fn booking_rejects_bad_dates_capacity_and_unavailable_listing() {
    let pool = memory_pool().await;
    let app = service(&pool).await;
    let host = insert_user(&pool, "hostuser").await;
    let guest = insert_user(&pool, "guestuser").await;

    let listing = create_listing(&app, host, listing_payload(host)).await;
    let mut closed = listing_payload(host);
    closed["availability"] = json!(false);
    let closed = create_listing(&app, host, closed).await;

    let cases = [
        // check_out == check_in
        (
            json!({
                "property_id": listing["listing_id"], "user_id": guest,
                "check_in": "2024-01-04", "check_out": "2024-01-04", "guests": 2
            }),
            "check_out",
        ),
        // one more guest than the listing allows
        (
            json!({
                "property_id": listing["listing_id"], "user_id": guest,
                "check_in": "2024-01-01", "check_out": "2024-01-04", "guests": 5
            }),
            "guests",
        ),
        // listing flagged unavailable
        (
            json!({
                "property_id": closed["listing_id"], "user_id": guest,
                "check_in": "2024-01-01", "check_out": "2024-01-04", "guests": 2
            }),
            "property",
        ),
    ];

    for (payload, field) in cases {
        let req = test::TestRequest::post()
            .uri("/bookings")
            .insert_header(("X-User-Id", guest.to_string()))
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["field"], field);
    }
}

#[actix_web::test]
async fn booking_update_revalidates_and_changes_status() {
    let pool = memory_pool().await;
    let app = service(&pool).await;
    let host = insert_user(&pool, "hostuser").await;
    let guest = insert_user(&pool, "guestuser").await;

    let listing = create_listing(&app, host, listing_payload(host)).await;
    let req = test::TestRequest::post()
        .uri("/bookings")
        .insert_header(("X-User-Id", guest.to_string()))
        .set_json(&json!({
            "property_id": listing["listing_id"], "user_id": guest,
            "check_in": "2024-01-01", "check_out": "2024-01-04", "guests": 2
        }))
        .to_request();
    let booking: Value = test::call_and_read_body_json(&app, req).await;
    let id = booking["booking_id"].as_str().expect("booking id");

    let req = test::TestRequest::put()
        .uri(&format!("/bookings/{}", id))
        .insert_header(("X-User-Id", guest.to_string()))
        .set_json(&json!({
            "check_in": "2024-01-01", "check_out": "2024-01-06",
            "guests": 3, "status": "confirmed"
        }))
        .to_request();
    let updated: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(updated["status"], "confirmed");
    assert_eq!(updated["total_price"], 500.0);
    assert_eq!(updated["duration_days"], 5);

    // inverted dates still rejected on update
    let req = test::TestRequest::put()
        .uri(&format!("/bookings/{}", id))
        .insert_header(("X-User-Id", guest.to_string()))
        .set_json(&json!({
            "check_in": "2024-01-06", "check_out": "2024-01-01",
            "guests": 3, "status": "confirmed"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn review_rating_bounds_are_inclusive() {
    let pool = memory_pool().await;
    let app = service(&pool).await;
    let host = insert_user(&pool, "hostuser").await;
    let guest = insert_user(&pool, "guestuser").await;

    let listing = create_listing(&app, host, listing_payload(host)).await;

    // rating checks run before the uniqueness check, so the out-of-range
    // attempts after the accepted one still come back 400, not 409
    for (rating, expected) in [(0, 400), (1, 201), (6, 400)] {
        let req = test::TestRequest::post()
            .uri("/reviews")
            .insert_header(("X-User-Id", guest.to_string()))
            .set_json(&json!({
                "property_id": listing["listing_id"],
                "user_id": guest,
                "rating": rating,
                "comment": "Great value for money."
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), expected, "rating {}", rating);
    }
}

#[actix_web::test]
async fn one_review_per_user_and_no_self_review() {
    let pool = memory_pool().await;
    let app = service(&pool).await;
    let host = insert_user(&pool, "hostuser").await;
    let guest = insert_user(&pool, "guestuser").await;

    let listing = create_listing(&app, host, listing_payload(host)).await;

    let payload = json!({
        "property_id": listing["listing_id"],
        "user_id": guest,
        "rating": 5,
        "comment": "Lovely place with character."
    });
    let req = test::TestRequest::post()
        .uri("/reviews")
        .insert_header(("X-User-Id", guest.to_string()))
        .set_json(&payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);

    // second attempt by the same user on the same listing
    let req = test::TestRequest::post()
        .uri("/reviews")
        .insert_header(("X-User-Id", guest.to_string()))
        .set_json(&payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 409);

    // hosts cannot review their own property
    let req = test::TestRequest::post()
        .uri("/reviews")
        .insert_header(("X-User-Id", host.to_string()))
        .set_json(&json!({
            "property_id": listing["listing_id"],
            "user_id": host,
            "rating": 5,
            "comment": "It is my own place and it is great."
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn listing_detail_embeds_reviews_and_average() {
    let pool = memory_pool().await;
    let app = service(&pool).await;
    let host = insert_user(&pool, "hostuser").await;
    let alice = insert_user(&pool, "alice").await;
    let bob = insert_user(&pool, "bob").await;

    let listing = create_listing(&app, host, listing_payload(host)).await;

    for (user, rating) in [(alice, 5), (bob, 4)] {
        let req = test::TestRequest::post()
            .uri("/reviews")
            .insert_header(("X-User-Id", user.to_string()))
            .set_json(&json!({
                "property_id": listing["listing_id"],
                "user_id": user,
                "rating": rating,
                "comment": "Everything was as described."
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 201);
    }

    let id = listing["listing_id"].as_str().expect("listing id");
    let req = test::TestRequest::get()
        .uri(&format!("/listings/{}", id))
        .insert_header(("X-User-Id", host.to_string()))
        .to_request();
    let detail: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(detail["review_count"], 2);
    assert_eq!(detail["average_rating"], 4.5);
    assert_eq!(detail["reviews"].as_array().expect("reviews").len(), 2);
}

#[actix_web::test]
async fn deleting_a_listing_cascades_to_dependents() {
    let pool = memory_pool().await;
    let app = service(&pool).await;
    let host = insert_user(&pool, "hostuser").await;
    let guest = insert_user(&pool, "guestuser").await;

    let listing = create_listing(&app, host, listing_payload(host)).await;
    let id = listing["listing_id"].as_str().expect("listing id");

    let req = test::TestRequest::post()
        .uri("/bookings")
        .insert_header(("X-User-Id", guest.to_string()))
        .set_json(&json!({
            "property_id": listing["listing_id"], "user_id": guest,
            "check_in": "2024-01-01", "check_out": "2024-01-04", "guests": 2
        }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 201);

    let req = test::TestRequest::post()
        .uri("/reviews")
        .insert_header(("X-User-Id", guest.to_string()))
        .set_json(&json!({
            "property_id": listing["listing_id"], "user_id": guest,
            "rating": 4, "comment": "Great stay."
        }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 201);

    let req = test::TestRequest::delete()
        .uri(&format!("/listings/{}", id))
        .insert_header(("X-User-Id", host.to_string()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 204);

    let bookings: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bookings")
        .fetch_one(&pool)
        .await
        .expect("count bookings");
    let reviews: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reviews")
        .fetch_one(&pool)
        .await
        .expect("count reviews");
    assert_eq!((bookings, reviews), (0, 0));
}

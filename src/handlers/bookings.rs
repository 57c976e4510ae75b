use actix_web::{web, HttpRequest, HttpResponse};
use sqlx::SqlitePool;
use uuid::Uuid;
use validator::Validate;

use crate::auth::require_user;
use crate::errors::ApiError;
use crate::models::{Booking, CreateBooking, Listing, UpdateBooking, User};
use crate::validation::{
    booking_total, validate_booking, validate_booking_dates, validate_booking_guests, FieldError,
};

use super::{booking_out, fetch_listing};

pub async fn list_bookings(
    pool: web::Data<SqlitePool>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    require_user(&pool, &req).await?;

    let bookings = sqlx::query_as::<_, Booking>("SELECT * FROM bookings ORDER BY created_at DESC")
        .fetch_all(pool.get_ref())
        .await?;

    let mut out = Vec::with_capacity(bookings.len());
    for booking in bookings {
        out.push(booking_out(&pool, booking).await?);
    }
    Ok(HttpResponse::Ok().json(out))
}

pub async fn get_booking(
    pool: web::Data<SqlitePool>,
    path: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    require_user(&pool, &req).await?;

    let booking = sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE booking_id = ?")
        .bind(path.into_inner())
        .fetch_optional(pool.get_ref())
        .await?
        .ok_or(ApiError::NotFound("Booking"))?;

    Ok(HttpResponse::Ok().json(booking_out(&pool, booking).await?))
}

pub async fn create_booking(
    pool: web::Data<SqlitePool>,
    body: web::Json<CreateBooking>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    require_user(&pool, &req).await?;
    body.validate()?;

    // Validate against the listing and insert within one transaction so the
    // availability check and the write see the same state.
    let mut tx = pool.begin().await?;

    let listing = sqlx::query_as::<_, Listing>("SELECT * FROM listings WHERE listing_id = ?")
        .bind(body.property_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(ApiError::NotFound("Property"))?;

    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(body.user_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| ApiError::Validation(FieldError::new("user_id", "User not found.")))?;

    validate_booking(body.check_in, body.check_out, body.guests, &listing)?;
    let total_price = booking_total(
        listing.price_per_night,
        body.check_in,
        body.check_out,
        body.total_price,
    )?;

    let booking = sqlx::query_as::<_, Booking>(
        r#"
        INSERT INTO bookings (booking_id, listing_id, user_id, check_in,
            check_out, guests, total_price, status)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(body.property_id)
    .bind(body.user_id)
    .bind(body.check_in)
    .bind(body.check_out)
    .bind(body.guests)
    .bind(total_price)
    .bind(body.status)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(HttpResponse::Created().json(booking_out(&pool, booking).await?))
}

pub async fn update_booking(
    pool: web::Data<SqlitePool>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateBooking>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    require_user(&pool, &req).await?;
    body.validate()?;

    let id = path.into_inner();
    let existing = sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE booking_id = ?")
        .bind(id)
        .fetch_optional(pool.get_ref())
        .await?
        .ok_or(ApiError::NotFound("Booking"))?;

    let listing = fetch_listing(&pool, existing.listing_id)
        .await?
        .ok_or(ApiError::NotFound("Property"))?;

    // Full re-validation; availability only gates creation.
    validate_booking_dates(body.check_in, body.check_out)?;
    validate_booking_guests(body.guests, &listing)?;
    let total_price = booking_total(
        listing.price_per_night,
        body.check_in,
        body.check_out,
        body.total_price,
    )?;

    let booking = sqlx::query_as::<_, Booking>(
        r#"
        UPDATE bookings
        SET check_in = ?, check_out = ?, guests = ?, total_price = ?,
            status = ?, updated_at = CURRENT_TIMESTAMP
        WHERE booking_id = ?
        RETURNING *
        "#,
    )
    .bind(body.check_in)
    .bind(body.check_out)
    .bind(body.guests)
    .bind(total_price)
    .bind(body.status)
    .bind(id)
    .fetch_one(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(booking_out(&pool, booking).await?))
}

pub async fn delete_booking(
    pool: web::Data<SqlitePool>,
    path: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    require_user(&pool, &req).await?;

    let result = sqlx::query("DELETE FROM bookings WHERE booking_id = ?")
        .bind(path.into_inner())
        .execute(pool.get_ref())
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("Booking"));
    }
    Ok(HttpResponse::NoContent().finish())
}

use actix_web::{web, HttpRequest, HttpResponse};
use sqlx::SqlitePool;
use uuid::Uuid;
use validator::Validate;

use crate::auth::require_user;
use crate::errors::{conflict_on_unique, ApiError};
use crate::models::{CreateReview, Review};
use crate::validation::{validate_review, FieldError};

use super::{fetch_listing, fetch_user, review_out, reviews_for};

pub async fn list_reviews(
    pool: web::Data<SqlitePool>,
    path: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    require_user(&pool, &req).await?;

    let listing = fetch_listing(&pool, path.into_inner())
        .await?
        .ok_or(ApiError::NotFound("Listing"))?;

    Ok(HttpResponse::Ok().json(reviews_for(&pool, listing.listing_id).await?))
}

pub async fn create_review(
    pool: web::Data<SqlitePool>,
    body: web::Json<CreateReview>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    require_user(&pool, &req).await?;
    body.validate()?;

    let listing = fetch_listing(&pool, body.property_id)
        .await?
        .ok_or(ApiError::NotFound("Property"))?;

    fetch_user(&pool, body.user_id)
        .await?
        .ok_or_else(|| ApiError::Validation(FieldError::new("user_id", "User not found.")))?;

    let already_reviewed = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM reviews WHERE listing_id = ? AND user_id = ?",
    )
    .bind(body.property_id)
    .bind(body.user_id)
    .fetch_one(pool.get_ref())
    .await?
        > 0;

    validate_review(body.rating, body.user_id, &listing, already_reviewed)?;

    // The unique (listing, user) index backs the check above under
    // concurrent requests; a losing racer gets the same 409.
    let review = sqlx::query_as::<_, Review>(
        r#"
        INSERT INTO reviews (review_id, listing_id, user_id, rating, comment)
        VALUES (?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(body.property_id)
    .bind(body.user_id)
    .bind(body.rating)
    .bind(&body.comment)
    .fetch_one(pool.get_ref())
    .await
    .map_err(|e| {
        conflict_on_unique(
            e,
            FieldError::new("user_id", "This user has already reviewed this property."),
        )
    })?;

    Ok(HttpResponse::Created().json(review_out(&pool, review).await?))
}

pub async fn delete_review(
    pool: web::Data<SqlitePool>,
    path: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    require_user(&pool, &req).await?;

    let result = sqlx::query("DELETE FROM reviews WHERE review_id = ?")
        .bind(path.into_inner())
        .execute(pool.get_ref())
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("Review"));
    }
    Ok(HttpResponse::NoContent().finish())
}

use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;
use validator::Validate;

use crate::auth::require_user;
use crate::errors::ApiError;
use crate::models::{CreateListing, Listing, PropertyType, UpdateListing};
use crate::validation::{validate_listing, FieldError};

use super::{fetch_listing, fetch_user, listing_detail, listing_summary};

#[derive(Debug, Deserialize)]
pub struct ListingFilter {
    pub location: Option<String>,
    pub property_type: Option<PropertyType>,
    pub available: Option<bool>,
}

pub async fn list_listings(
    pool: web::Data<SqlitePool>,
    params: web::Query<ListingFilter>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    require_user(&pool, &req).await?;

    let mut query: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT * FROM listings WHERE 1=1");
    if let Some(location) = &params.location {
        query.push(" AND location LIKE ");
        query.push_bind(format!("%{}%", location));
    }
    if let Some(property_type) = params.property_type {
        query.push(" AND property_type = ");
        query.push_bind(property_type);
    }
    if let Some(available) = params.available {
        query.push(" AND availability = ");
        query.push_bind(available);
    }
    query.push(" ORDER BY created_at DESC");

    let listings = query
        .build_query_as::<Listing>()
        .fetch_all(pool.get_ref())
        .await?;

    let mut out = Vec::with_capacity(listings.len());
    for listing in listings {
        out.push(listing_summary(&pool, listing).await?);
    }
    Ok(HttpResponse::Ok().json(out))
}

pub async fn get_listing(
    pool: web::Data<SqlitePool>,
    path: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    require_user(&pool, &req).await?;

    let listing = fetch_listing(&pool, path.into_inner())
        .await?
        .ok_or(ApiError::NotFound("Listing"))?;
    let detail = listing_detail(&pool, listing).await?;
    Ok(HttpResponse::Ok().json(detail))
}

pub async fn create_listing(
    pool: web::Data<SqlitePool>,
    body: web::Json<CreateListing>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    require_user(&pool, &req).await?;
    body.validate()?;
    validate_listing(body.price_per_night, body.max_guests)?;

    fetch_user(&pool, body.host_id)
        .await?
        .ok_or_else(|| ApiError::Validation(FieldError::new("host_id", "Host user not found.")))?;

    let listing = sqlx::query_as::<_, Listing>(
        r#"
        INSERT INTO listings (listing_id, host_id, title, description, location,
            price_per_night, amenities, property_type, max_guests, bedrooms,
            bathrooms, availability)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(body.host_id)
    .bind(&body.title)
    .bind(&body.description)
    .bind(&body.location)
    .bind(body.price_per_night)
    .bind(sqlx::types::Json(&body.amenities))
    .bind(body.property_type)
    .bind(body.max_guests)
    .bind(body.bedrooms)
    .bind(body.bathrooms)
    .bind(body.availability)
    .fetch_one(pool.get_ref())
    .await?;

    let detail = listing_detail(&pool, listing).await?;
    Ok(HttpResponse::Created().json(detail))
}

pub async fn update_listing(
    pool: web::Data<SqlitePool>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateListing>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    require_user(&pool, &req).await?;
    body.validate()?;
    validate_listing(body.price_per_night, body.max_guests)?;

    let listing = sqlx::query_as::<_, Listing>(
        r#"
        UPDATE listings
        SET title = ?, description = ?, location = ?, price_per_night = ?,
            amenities = ?, property_type = ?, max_guests = ?, bedrooms = ?,
            bathrooms = ?, availability = ?, updated_at = CURRENT_TIMESTAMP
        WHERE listing_id = ?
        RETURNING *
        "#,
    )
    .bind(&body.title)
    .bind(&body.description)
    .bind(&body.location)
    .bind(body.price_per_night)
    .bind(sqlx::types::Json(&body.amenities))
    .bind(body.property_type)
    .bind(body.max_guests)
    .bind(body.bedrooms)
    .bind(body.bathrooms)
    .bind(body.availability)
    .bind(path.into_inner())
    .fetch_optional(pool.get_ref())
    .await?
    .ok_or(ApiError::NotFound("Listing"))?;

    let detail = listing_detail(&pool, listing).await?;
    Ok(HttpResponse::Ok().json(detail))
}

pub async fn delete_listing(
    pool: web::Data<SqlitePool>,
    path: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    require_user(&pool, &req).await?;

    let result = sqlx::query("DELETE FROM listings WHERE listing_id = ?")
        .bind(path.into_inner())
        .execute(pool.get_ref())
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("Listing"));
    }
    Ok(HttpResponse::NoContent().finish())
}

pub mod bookings;
pub mod listings;
pub mod reviews;

use actix_web::web;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::errors::ApiError;
use crate::models::{
    Booking, BookingOut, Listing, ListingDetail, ListingSummary, Review, ReviewOut, User,
};
use crate::validation::{average_rating, review_count};

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/listings")
            .route("", web::get().to(listings::list_listings))
            .route("", web::post().to(listings::create_listing))
            .route("/{id}", web::get().to(listings::get_listing))
            .route("/{id}", web::put().to(listings::update_listing))
            .route("/{id}", web::delete().to(listings::delete_listing))
            .route("/{id}/reviews", web::get().to(reviews::list_reviews)),
    )
    .service(
        web::scope("/bookings")
            .route("", web::get().to(bookings::list_bookings))
            .route("", web::post().to(bookings::create_booking))
            .route("/{id}", web::get().to(bookings::get_booking))
            .route("/{id}", web::put().to(bookings::update_booking))
            .route("/{id}", web::delete().to(bookings::delete_booking)),
    )
    .service(
        web::scope("/reviews")
            .route("", web::post().to(reviews::create_review))
            .route("/{id}", web::delete().to(reviews::delete_review)),
    );
}

pub(crate) async fn fetch_user(pool: &SqlitePool, id: i64) -> Result<Option<User>, ApiError> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub(crate) async fn fetch_listing(
    pool: &SqlitePool,
    id: Uuid,
) -> Result<Option<Listing>, ApiError> {
    let listing = sqlx::query_as::<_, Listing>("SELECT * FROM listings WHERE listing_id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(listing)
}

pub(crate) async fn ratings_for(pool: &SqlitePool, listing_id: Uuid) -> Result<Vec<i64>, ApiError> {
    let ratings = sqlx::query_scalar::<_, i64>(
        "SELECT rating FROM reviews WHERE listing_id = ? ORDER BY created_at DESC",
    )
    .bind(listing_id)
    .fetch_all(pool)
    .await?;
    Ok(ratings)
}

pub(crate) async fn listing_summary(
    pool: &SqlitePool,
    listing: Listing,
) -> Result<ListingSummary, ApiError> {
    let host = fetch_user(pool, listing.host_id)
        .await?
        .ok_or(ApiError::NotFound("Host"))?;
    let ratings = ratings_for(pool, listing.listing_id).await?;

    Ok(ListingSummary {
        listing_id: listing.listing_id,
        host: host.into(),
        title: listing.title,
        location: listing.location,
        price_per_night: listing.price_per_night,
        property_type: listing.property_type,
        max_guests: listing.max_guests,
        bedrooms: listing.bedrooms,
        bathrooms: listing.bathrooms,
        availability: listing.availability,
        average_rating: average_rating(&ratings),
        review_count: review_count(&ratings),
    })
}

pub(crate) async fn listing_detail(
    pool: &SqlitePool,
    listing: Listing,
) -> Result<ListingDetail, ApiError> {
    let host = fetch_user(pool, listing.host_id)
        .await?
        .ok_or(ApiError::NotFound("Host"))?;
    let reviews = reviews_for(pool, listing.listing_id).await?;
    let ratings: Vec<i64> = reviews.iter().map(|r| r.rating).collect();

    Ok(ListingDetail {
        listing_id: listing.listing_id,
        host: host.into(),
        title: listing.title,
        description: listing.description,
        location: listing.location,
        price_per_night: listing.price_per_night,
        amenities: listing.amenities.0,
        property_type: listing.property_type,
        max_guests: listing.max_guests,
        bedrooms: listing.bedrooms,
        bathrooms: listing.bathrooms,
        availability: listing.availability,
        average_rating: average_rating(&ratings),
        review_count: review_count(&ratings),
        reviews,
        created_at: listing.created_at,
        updated_at: listing.updated_at,
    })
}

pub(crate) async fn reviews_for(
    pool: &SqlitePool,
    listing_id: Uuid,
) -> Result<Vec<ReviewOut>, ApiError> {
    let rows = sqlx::query_as::<_, Review>(
        "SELECT * FROM reviews WHERE listing_id = ? ORDER BY created_at DESC",
    )
    .bind(listing_id)
    .fetch_all(pool)
    .await?;

    let mut out = Vec::with_capacity(rows.len());
    for review in rows {
        out.push(review_out(pool, review).await?);
    }
    Ok(out)
}

pub(crate) async fn review_out(pool: &SqlitePool, review: Review) -> Result<ReviewOut, ApiError> {
    let user = fetch_user(pool, review.user_id)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    Ok(ReviewOut {
        review_id: review.review_id,
        listing_id: review.listing_id,
        user: user.into(),
        rating: review.rating,
        comment: review.comment,
        created_at: review.created_at,
        updated_at: review.updated_at,
    })
}

pub(crate) async fn booking_out(pool: &SqlitePool, booking: Booking) -> Result<BookingOut, ApiError> {
    let listing = fetch_listing(pool, booking.listing_id)
        .await?
        .ok_or(ApiError::NotFound("Property"))?;
    let property = listing_summary(pool, listing).await?;
    let user = fetch_user(pool, booking.user_id)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    Ok(BookingOut {
        booking_id: booking.booking_id,
        property,
        user: user.into(),
        check_in: booking.check_in,
        check_out: booking.check_out,
        guests: booking.guests,
        total_price: booking.total_price,
        status: booking.status,
        duration_days: booking.duration_days(),
        created_at: booking.created_at,
        updated_at: booking.updated_at,
    })
}

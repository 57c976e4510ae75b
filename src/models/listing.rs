use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::review::ReviewOut;
use super::user::UserSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, Default)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum PropertyType {
    #[default]
    Apartment,
    House,
    Villa,
    Condo,
    Cabin,
    Hotel,
    Resort,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Listing {
    pub listing_id: Uuid,
    pub host_id: i64,
    pub title: String,
    pub description: String,
    pub location: String,
    pub price_per_night: f64,
    pub amenities: Json<Vec<String>>,
    pub property_type: PropertyType,
    pub max_guests: i64,
    pub bedrooms: i64,
    pub bathrooms: i64,
    pub availability: bool,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateListing {
    pub host_id: i64,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[validate(length(min = 1, max = 200))]
    pub location: String,
    pub price_per_night: f64,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub property_type: PropertyType,
    #[serde(default = "one")]
    pub max_guests: i64,
    #[serde(default = "one")]
    #[validate(range(min = 0))]
    pub bedrooms: i64,
    #[serde(default = "one")]
    #[validate(range(min = 0))]
    pub bathrooms: i64,
    #[serde(default = "truthy")]
    pub availability: bool,
}

/// Updates re-send the full record; partial patches are not supported.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateListing {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[validate(length(min = 1, max = 200))]
    pub location: String,
    pub price_per_night: f64,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub property_type: PropertyType,
    pub max_guests: i64,
    #[validate(range(min = 0))]
    pub bedrooms: i64,
    #[validate(range(min = 0))]
    pub bathrooms: i64,
    pub availability: bool,
}

fn one() -> i64 {
    1
}

fn truthy() -> bool {
    true
}

/// Compact shape used by list endpoints and booking responses.
#[derive(Debug, Serialize)]
pub struct ListingSummary {
    pub listing_id: Uuid,
    pub host: UserSummary,
    pub title: String,
    pub location: String,
    pub price_per_night: f64,
    pub property_type: PropertyType,
    pub max_guests: i64,
    pub bedrooms: i64,
    pub bathrooms: i64,
    pub availability: bool,
    pub average_rating: f64,
    pub review_count: i64,
}

/// Full shape for retrieve responses, with embedded reviews.
#[derive(Debug, Serialize)]
pub struct ListingDetail {
    pub listing_id: Uuid,
    pub host: UserSummary,
    pub title: String,
    pub description: String,
    pub location: String,
    pub price_per_night: f64,
    pub amenities: Vec<String>,
    pub property_type: PropertyType,
    pub max_guests: i64,
    pub bedrooms: i64,
    pub bathrooms: i64,
    pub availability: bool,
    pub average_rating: f64,
    pub review_count: i64,
    pub reviews: Vec<ReviewOut>,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

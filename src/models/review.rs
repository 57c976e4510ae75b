use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::user::UserSummary;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Review {
    pub review_id: Uuid,
    pub listing_id: Uuid,
    pub user_id: i64,
    pub rating: i64,
    pub comment: String,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateReview {
    pub property_id: Uuid,
    pub user_id: i64,
    pub rating: i64,
    #[serde(default)]
    #[validate(length(max = 5000))]
    pub comment: String,
}

#[derive(Debug, Serialize)]
pub struct ReviewOut {
    pub review_id: Uuid,
    pub listing_id: Uuid,
    pub user: UserSummary,
    pub rating: i64,
    pub comment: String,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

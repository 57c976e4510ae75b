use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::listing::ListingSummary;
use super::user::UserSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, Default)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Booking {
    pub booking_id: Uuid,
    pub listing_id: Uuid,
    pub user_id: i64,
    pub check_in: chrono::NaiveDate,
    pub check_out: chrono::NaiveDate,
    pub guests: i64,
    pub total_price: f64,
    pub status: BookingStatus,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

impl Booking {
    pub fn duration_days(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateBooking {
    pub property_id: Uuid,
    pub user_id: i64,
    pub check_in: chrono::NaiveDate,
    pub check_out: chrono::NaiveDate,
    #[validate(range(min = 1))]
    pub guests: i64,
    /// Derived from the nightly price when absent.
    pub total_price: Option<f64>,
    #[serde(default)]
    pub status: BookingStatus,
}

/// Full re-validated update; status may move to any value (transition
/// legality is deliberately not enforced).
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateBooking {
    pub check_in: chrono::NaiveDate,
    pub check_out: chrono::NaiveDate,
    #[validate(range(min = 1))]
    pub guests: i64,
    pub total_price: Option<f64>,
    pub status: BookingStatus,
}

#[derive(Debug, Serialize)]
pub struct BookingOut {
    pub booking_id: Uuid,
    pub property: ListingSummary,
    pub user: UserSummary,
    pub check_in: chrono::NaiveDate,
    pub check_out: chrono::NaiveDate,
    pub guests: i64,
    pub total_price: f64,
    pub status: BookingStatus,
    pub duration_days: i64,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

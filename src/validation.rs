//! Cross-field booking and review invariants, applied before any write.
//!
//! These are pure functions over already-fetched records so they can be
//! exercised without a database. Field-scoped failures carry the offending
//! field name and a human-readable message.

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::Listing;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        FieldError {
            field,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

pub fn validate_listing(price_per_night: f64, max_guests: i64) -> Result<(), FieldError> {
    if price_per_night <= 0.0 {
        return Err(FieldError::new(
            "price_per_night",
            "Price per night must be greater than 0.",
        ));
    }
    if max_guests < 1 {
        return Err(FieldError::new(
            "max_guests",
            "Maximum guests must be at least 1.",
        ));
    }
    Ok(())
}

pub fn validate_booking_dates(check_in: NaiveDate, check_out: NaiveDate) -> Result<(), FieldError> {
    if check_out <= check_in {
        return Err(FieldError::new(
            "check_out",
            "Check-out date must be after check-in date.",
        ));
    }
    Ok(())
}

pub fn validate_booking_guests(guests: i64, listing: &Listing) -> Result<(), FieldError> {
    if guests > listing.max_guests {
        return Err(FieldError::new(
            "guests",
            format!(
                "Number of guests ({}) exceeds maximum allowed ({}).",
                guests, listing.max_guests
            ),
        ));
    }
    Ok(())
}

/// Booking-creation rules that need the target listing: date order, guest
/// capacity, and listing availability. Updates re-check dates and guests but
/// not availability, which only applies at booking time.
pub fn validate_booking(
    check_in: NaiveDate,
    check_out: NaiveDate,
    guests: i64,
    listing: &Listing,
) -> Result<(), FieldError> {
    validate_booking_dates(check_in, check_out)?;
    validate_booking_guests(guests, listing)?;
    if !listing.availability {
        return Err(FieldError::new(
            "property",
            "This property is not currently available for booking.",
        ));
    }
    Ok(())
}

/// Total price for a stay: the explicit override when given, otherwise
/// nightly price times the number of nights. Either way it must be positive.
pub fn booking_total(
    price_per_night: f64,
    check_in: NaiveDate,
    check_out: NaiveDate,
    explicit: Option<f64>,
) -> Result<f64, FieldError> {
    let nights = (check_out - check_in).num_days();
    let total = match explicit {
        Some(t) => t,
        None => price_per_night * nights as f64,
    };
    if total <= 0.0 {
        return Err(FieldError::new(
            "total_price",
            "Total price must be greater than 0.",
        ));
    }
    Ok(total)
}

pub fn validate_review(
    rating: i64,
    user_id: i64,
    listing: &Listing,
    already_reviewed: bool,
) -> Result<(), FieldError> {
    if !(1..=5).contains(&rating) {
        return Err(FieldError::new(
            "rating",
            "Rating must be between 1 and 5.",
        ));
    }
    if user_id == listing.host_id {
        return Err(FieldError::new(
            "user_id",
            "Hosts may not review their own property.",
        ));
    }
    if already_reviewed {
        return Err(FieldError::new(
            "user_id",
            "This user has already reviewed this property.",
        ));
    }
    Ok(())
}

/// Mean rating rounded to one decimal place; 0.0 when there are no reviews.
pub fn average_rating(ratings: &[i64]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }
    let sum: i64 = ratings.iter().sum();
    let mean = sum as f64 / ratings.len() as f64;
    (mean * 10.0).round() / 10.0
}

pub fn review_count(ratings: &[i64]) -> i64 {
    ratings.len() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PropertyType;
    use sqlx::types::Json;

    fn listing(max_guests: i64, availability: bool) -> Listing {
        let now = chrono::NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        Listing {
            listing_id: uuid::Uuid::new_v4(),
            host_id: 1,
            title: "Cozy Downtown Apartment".into(),
            description: String::new(),
            location: "New York, NY".into(),
            price_per_night: 100.0,
            amenities: Json(vec!["WiFi".into()]),
            property_type: PropertyType::Apartment,
            max_guests,
            bedrooms: 1,
            bathrooms: 1,
            availability,
            created_at: now,
            updated_at: now,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn check_out_must_follow_check_in() {
        let l = listing(4, true);
        let err = validate_booking(date(2024, 1, 4), date(2024, 1, 4), 2, &l).unwrap_err();
        assert_eq!(err.field, "check_out");
        let err = validate_booking(date(2024, 1, 4), date(2024, 1, 1), 2, &l).unwrap_err();
        assert_eq!(err.field, "check_out");
        assert!(validate_booking(date(2024, 1, 1), date(2024, 1, 2), 2, &l).is_ok());
    }

    #[test]
    fn guests_capped_by_listing() {
        let l = listing(4, true);
        assert!(validate_booking(date(2024, 1, 1), date(2024, 1, 4), 4, &l).is_ok());
        let err = validate_booking(date(2024, 1, 1), date(2024, 1, 4), 5, &l).unwrap_err();
        assert_eq!(err.field, "guests");
    }

    #[test]
    fn unavailable_listing_rejected() {
        let l = listing(4, false);
        let err = validate_booking(date(2024, 1, 1), date(2024, 1, 4), 2, &l).unwrap_err();
        assert_eq!(err.field, "property");
    }

    #[test]
    fn total_derived_from_nightly_price() {
        let total = booking_total(100.0, date(2024, 1, 1), date(2024, 1, 4), None).unwrap();
        assert_eq!(total, 300.0);
    }

    #[test]
    fn explicit_total_wins_but_must_be_positive() {
        let total = booking_total(100.0, date(2024, 1, 1), date(2024, 1, 4), Some(250.0)).unwrap();
        assert_eq!(total, 250.0);
        let err = booking_total(100.0, date(2024, 1, 1), date(2024, 1, 4), Some(0.0)).unwrap_err();
        assert_eq!(err.field, "total_price");
    }

    #[test]
    fn rating_bounds_inclusive() {
        let l = listing(4, true);
        for rating in 1..=5 {
            assert!(validate_review(rating, 2, &l, false).is_ok());
        }
        assert_eq!(validate_review(0, 2, &l, false).unwrap_err().field, "rating");
        assert_eq!(validate_review(6, 2, &l, false).unwrap_err().field, "rating");
    }

    #[test]
    fn host_cannot_review_own_listing() {
        let l = listing(4, true);
        let err = validate_review(5, l.host_id, &l, false).unwrap_err();
        assert_eq!(err.field, "user_id");
    }

    #[test]
    fn second_review_for_same_pair_rejected() {
        let l = listing(4, true);
        let err = validate_review(4, 2, &l, true).unwrap_err();
        assert_eq!(err.field, "user_id");
        assert!(err.message.contains("already reviewed"));
    }

    #[test]
    fn listing_field_rules() {
        assert!(validate_listing(0.01, 1).is_ok());
        assert_eq!(
            validate_listing(0.0, 1).unwrap_err().field,
            "price_per_night"
        );
        assert_eq!(validate_listing(50.0, 0).unwrap_err().field, "max_guests");
    }

    #[test]
    fn average_rating_rounds_to_one_decimal() {
        assert_eq!(average_rating(&[]), 0.0);
        assert_eq!(average_rating(&[5, 4, 4]), 4.3);
        assert_eq!(average_rating(&[1, 2]), 1.5);
        assert_eq!(review_count(&[5, 4, 4]), 3);
    }
}

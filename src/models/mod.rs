pub mod booking;
pub mod listing;
pub mod review;
pub mod user;

pub use booking::{Booking, BookingOut, BookingStatus, CreateBooking, UpdateBooking};
pub use listing::{
    CreateListing, Listing, ListingDetail, ListingSummary, PropertyType, UpdateListing,
};
pub use review::{CreateReview, Review, ReviewOut};
pub use user::{User, UserSummary};

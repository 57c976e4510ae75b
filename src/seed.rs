//! Synthetic fixture generation for development and test databases.
//!
//! Counts and the RNG seed are explicit configuration; there is no global
//! random state. Generated bookings and reviews satisfy the same invariants
//! the API enforces (date order, guest capacity, no self-review, one review
//! per user/listing pair).

use std::collections::HashSet;

use chrono::{Duration, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::{BookingStatus, Listing, PropertyType, User};

#[derive(Debug, Clone)]
pub struct SeedOpts {
    pub users: u32,
    pub listings: u32,
    pub bookings: u32,
    pub reviews: u32,
    pub clear: bool,
    pub seed: u64,
}

impl Default for SeedOpts {
    fn default() -> Self {
        SeedOpts {
            users: 10,
            listings: 20,
            bookings: 30,
            reviews: 50,
            clear: false,
            seed: 42,
        }
    }
}

#[derive(Debug, Default)]
pub struct SeedReport {
    pub users: usize,
    pub listings: usize,
    pub bookings: usize,
    pub reviews: usize,
}

const FIRST_NAMES: &[&str] = &[
    "John", "Jane", "Michael", "Sarah", "David", "Emma", "Chris", "Lisa", "Robert", "Maria",
    "James", "Anna", "William", "Emily",
];

const LAST_NAMES: &[&str] = &[
    "Smith",
    "Johnson",
    "Williams",
    "Brown",
    "Jones",
    "Garcia",
    "Miller",
    "Davis",
    "Rodriguez",
    "Martinez",
    "Hernandez",
    "Lopez",
];

const CITIES: &[&str] = &[
    "New York, NY",
    "Los Angeles, CA",
    "Chicago, IL",
    "Houston, TX",
    "Phoenix, AZ",
    "Philadelphia, PA",
    "San Antonio, TX",
    "San Diego, CA",
    "Dallas, TX",
    "San Jose, CA",
    "Austin, TX",
    "Jacksonville, FL",
    "Miami, FL",
    "Seattle, WA",
    "Denver, CO",
    "Boston, MA",
];

const AMENITIES: &[&str] = &[
    "WiFi",
    "Kitchen",
    "Air Conditioning",
    "Heating",
    "Pool",
    "Gym",
    "Parking",
    "Balcony",
    "Garden",
    "Hot Tub",
    "Fireplace",
    "BBQ Grill",
];

const COMMENTS: &[&str] = &[
    "Absolutely loved this place! The host was incredibly welcoming and the location was perfect.",
    "Great value for money. Clean, comfortable, and well-equipped. Would definitely stay again.",
    "The property exceeded our expectations. Beautiful views and excellent amenities.",
    "Perfect for our family vacation. Kids loved the pool and we enjoyed the peaceful atmosphere.",
    "Convenient location with easy access to public transport. Highly recommended!",
    "Cozy and comfortable accommodation. The host provided excellent local recommendations.",
    "Everything was as described. Clean, modern, and in a great neighborhood.",
    "Outstanding hospitality! The property was immaculate and had everything we needed.",
    "Lovely place with character. Great for a romantic getaway. Will be back!",
    "Excellent communication from the host. The property was exactly what we were looking for.",
];

struct SampleListing {
    title: &'static str,
    description: &'static str,
    location: &'static str,
    price_per_night: f64,
    property_type: PropertyType,
    amenities: &'static [&'static str],
}

const SAMPLE_LISTINGS: &[SampleListing] = &[
    SampleListing {
        title: "Cozy Downtown Apartment",
        description: "Beautiful apartment in the heart of the city with modern amenities and stunning views.",
        location: "New York, NY",
        price_per_night: 120.0,
        property_type: PropertyType::Apartment,
        amenities: &["WiFi", "Kitchen", "Air Conditioning", "Parking"],
    },
    SampleListing {
        title: "Beachfront Villa Paradise",
        description: "Luxurious villa with private beach access and ocean views. Perfect for family vacations.",
        location: "Miami, FL",
        price_per_night: 350.0,
        property_type: PropertyType::Villa,
        amenities: &["Pool", "Beach Access", "WiFi", "Kitchen", "BBQ Grill"],
    },
    SampleListing {
        title: "Mountain Cabin Retreat",
        description: "Rustic cabin nestled in the mountains. Great for hiking and outdoor activities.",
        location: "Aspen, CO",
        price_per_night: 200.0,
        property_type: PropertyType::Cabin,
        amenities: &["Fireplace", "Hot Tub", "WiFi", "Kitchen"],
    },
    SampleListing {
        title: "Modern City Loft",
        description: "Stylish loft in trendy neighborhood with exposed brick and high ceilings.",
        location: "San Francisco, CA",
        price_per_night: 180.0,
        property_type: PropertyType::Apartment,
        amenities: &["WiFi", "Kitchen", "Workspace", "Gym Access"],
    },
    SampleListing {
        title: "Historic Townhouse",
        description: "Charming historic home with period features and modern conveniences.",
        location: "Boston, MA",
        price_per_night: 160.0,
        property_type: PropertyType::House,
        amenities: &["WiFi", "Kitchen", "Garden", "Parking"],
    },
];

const GENERIC_TYPES: &[PropertyType] = &[
    PropertyType::Apartment,
    PropertyType::House,
    PropertyType::Villa,
    PropertyType::Condo,
    PropertyType::Cabin,
];

const STATUSES: &[BookingStatus] = &[
    BookingStatus::Pending,
    BookingStatus::Confirmed,
    BookingStatus::Cancelled,
    BookingStatus::Completed,
];

pub async fn run(pool: &SqlitePool, opts: &SeedOpts) -> Result<SeedReport, sqlx::Error> {
    let mut rng = StdRng::seed_from_u64(opts.seed);
    let mut report = SeedReport::default();

    if opts.clear {
        clear(pool).await?;
    }

    let users = create_users(pool, &mut rng, opts.users).await?;
    report.users = users.len();

    let listings = create_listings(pool, &mut rng, &users, opts.listings).await?;
    report.listings = listings.len();

    report.bookings = create_bookings(pool, &mut rng, &users, &listings, opts.bookings).await?;
    report.reviews = create_reviews(pool, &mut rng, &users, &listings, opts.reviews).await?;

    Ok(report)
}

/// Deletes dependents before their parents; admin users are spared.
pub async fn clear(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM reviews").execute(pool).await?;
    sqlx::query("DELETE FROM bookings").execute(pool).await?;
    sqlx::query("DELETE FROM listings").execute(pool).await?;
    sqlx::query("DELETE FROM users WHERE is_admin = FALSE")
        .execute(pool)
        .await?;
    Ok(())
}

async fn create_users(
    pool: &SqlitePool,
    rng: &mut StdRng,
    count: u32,
) -> Result<Vec<User>, sqlx::Error> {
    let mut users = Vec::with_capacity(count as usize);

    for i in 0..count {
        let first = FIRST_NAMES.choose(rng).copied().unwrap_or("John");
        let last = LAST_NAMES.choose(rng).copied().unwrap_or("Smith");
        let username = format!("{}{}{}", first.to_lowercase(), last.to_lowercase(), i + 1);
        let email = format!("{}@example.com", username);

        // Get-or-create on username so re-seeding without --clear reuses
        // existing users instead of tripping the unique constraint.
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, first_name, last_name, email)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(username) DO UPDATE SET username = username
            RETURNING *
            "#,
        )
        .bind(&username)
        .bind(first)
        .bind(last)
        .bind(&email)
        .fetch_one(pool)
        .await?;
        users.push(user);
    }

    Ok(users)
}

async fn create_listings(
    pool: &SqlitePool,
    rng: &mut StdRng,
    users: &[User],
    count: u32,
) -> Result<Vec<Listing>, sqlx::Error> {
    let mut listings = Vec::with_capacity(count as usize);
    if users.is_empty() {
        return Ok(listings);
    }

    for i in 0..count as usize {
        let host = &users[rng.gen_range(0..users.len())];

        let (title, description, location, price, property_type, amenities) =
            if let Some(sample) = SAMPLE_LISTINGS.get(i) {
                (
                    sample.title.to_string(),
                    sample.description.to_string(),
                    sample.location.to_string(),
                    sample.price_per_night,
                    sample.property_type,
                    sample.amenities.iter().map(|a| a.to_string()).collect(),
                )
            } else {
                let amenity_count = rng.gen_range(2..=6);
                let picked: Vec<String> = AMENITIES
                    .choose_multiple(rng, amenity_count)
                    .map(|a| a.to_string())
                    .collect();
                (
                    format!("Sample Property {}", i + 1),
                    format!(
                        "A wonderful place to stay in a great location. Property {} offers comfort and convenience.",
                        i + 1
                    ),
                    CITIES.choose(rng).copied().unwrap_or("Denver, CO").to_string(),
                    rng.gen_range(50..=400) as f64,
                    *GENERIC_TYPES.choose(rng).unwrap_or(&PropertyType::Apartment),
                    picked,
                )
            };

        // 75% available, matching the fixture mix the API tests expect
        let availability = rng.gen_range(0..4) < 3;

        let listing = sqlx::query_as::<_, Listing>(
            r#"
            INSERT INTO listings (listing_id, host_id, title, description,
                location, price_per_night, amenities, property_type,
                max_guests, bedrooms, bathrooms, availability)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(host.id)
        .bind(&title)
        .bind(&description)
        .bind(&location)
        .bind(price)
        .bind(sqlx::types::Json(&amenities))
        .bind(property_type)
        .bind(rng.gen_range(1..=8i64))
        .bind(rng.gen_range(1..=4i64))
        .bind(rng.gen_range(1..=3i64))
        .bind(availability)
        .fetch_one(pool)
        .await?;
        listings.push(listing);
    }

    Ok(listings)
}

async fn create_bookings(
    pool: &SqlitePool,
    rng: &mut StdRng,
    users: &[User],
    listings: &[Listing],
    count: u32,
) -> Result<usize, sqlx::Error> {
    let mut created = 0;
    if listings.is_empty() {
        return Ok(created);
    }

    for _ in 0..count {
        let listing = &listings[rng.gen_range(0..listings.len())];
        let guests: Vec<&User> = users.iter().filter(|u| u.id != listing.host_id).collect();
        let Some(user) = guests.choose(rng) else {
            continue;
        };

        let check_in = Utc::now().date_naive() + Duration::days(rng.gen_range(-30..=60));
        let duration = rng.gen_range(1..=14i64);
        let check_out = check_in + Duration::days(duration);
        let guest_count = rng.gen_range(1..=listing.max_guests.min(6).max(1));
        let total_price = listing.price_per_night * duration as f64;
        let status = *STATUSES.choose(rng).unwrap_or(&BookingStatus::Pending);

        sqlx::query(
            r#"
            INSERT INTO bookings (booking_id, listing_id, user_id, check_in,
                check_out, guests, total_price, status)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(listing.listing_id)
        .bind(user.id)
        .bind(check_in)
        .bind(check_out)
        .bind(guest_count)
        .bind(total_price)
        .bind(status)
        .execute(pool)
        .await?;
        created += 1;
    }

    Ok(created)
}

async fn create_reviews(
    pool: &SqlitePool,
    rng: &mut StdRng,
    users: &[User],
    listings: &[Listing],
    count: u32,
) -> Result<usize, sqlx::Error> {
    let mut created = 0;
    let mut taken: HashSet<(i64, Uuid)> = HashSet::new();

    if users.is_empty() || listings.is_empty() {
        return Ok(created);
    }

    for _ in 0..count {
        // Bounded retry for a fresh non-host (user, listing) pair; give up
        // once the combination space looks exhausted.
        let mut pair = None;
        for _ in 0..50 {
            let user = &users[rng.gen_range(0..users.len())];
            let listing = &listings[rng.gen_range(0..listings.len())];
            if user.id == listing.host_id {
                continue;
            }
            if taken.insert((user.id, listing.listing_id)) {
                pair = Some((user, listing));
                break;
            }
        }
        let Some((user, listing)) = pair else {
            continue;
        };

        // Weighted towards higher ratings: 1-5 at 5/10/15/35/35 percent
        let rating = match rng.gen_range(0..100) {
            0..=4 => 1,
            5..=14 => 2,
            15..=29 => 3,
            30..=64 => 4,
            _ => 5,
        };

        sqlx::query(
            r#"
            INSERT INTO reviews (review_id, listing_id, user_id, rating, comment)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(listing.listing_id)
        .bind(user.id)
        .bind(rating)
        .bind(COMMENTS.choose(rng).copied().unwrap_or_default())
        .execute(pool)
        .await?;
        created += 1;
    }

    Ok(created)
}

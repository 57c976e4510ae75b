use clap::Parser;
use dotenv::dotenv;
use env_logger::Env;

use stayhub::db;
use stayhub::seed::{self, SeedOpts};

#[derive(Parser)]
#[command(name = "seed")]
#[command(about = "Seed the database with sample listings, bookings, and reviews")]
struct Args {
    /// Number of users to create
    #[arg(long, default_value_t = 10)]
    users: u32,

    /// Number of listings to create
    #[arg(long, default_value_t = 20)]
    listings: u32,

    /// Number of bookings to create
    #[arg(long, default_value_t = 30)]
    bookings: u32,

    /// Number of reviews to create
    #[arg(long, default_value_t = 50)]
    reviews: u32,

    /// Clear existing data before seeding (admin users are kept)
    #[arg(long)]
    clear: bool,

    /// RNG seed for reproducible fixtures
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let args = Args::parse();

    let pool = db::get_db_pool().await;
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    if args.clear {
        log::warn!("Clearing existing data...");
    }

    let opts = SeedOpts {
        users: args.users,
        listings: args.listings,
        bookings: args.bookings,
        reviews: args.reviews,
        clear: args.clear,
        seed: args.seed,
    };

    log::info!("Creating sample data...");
    let report = seed::run(&pool, &opts).await.expect("Seeding failed");

    log::info!("Created {} users", report.users);
    log::info!("Created {} listings", report.listings);
    log::info!("Created {} bookings", report.bookings);
    log::info!("Created {} reviews", report.reviews);
    log::info!("Database seeding completed successfully!");

    Ok(())
}

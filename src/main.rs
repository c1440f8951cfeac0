//! Command-line interface for rental-populate.
//!
//! # Usage Examples
//!
//! ```bash
//! # Generate 40000 bookings against an in-memory demo fleet
//! rental-populate --dry-run
//!
//! # Smaller deterministic run with a tighter date window
//! rental-populate --dry-run \
//!   --sample-count 500 \
//!   --base-start 2019-01-01 --base-end 2019-06-30 \
//!   --seed 7
//!
//! # Abort instead of skipping when a sample cannot find a free car
//! rental-populate --dry-run --on-exhausted abort
//! ```
//!
//! Only the in-memory dry-run backend ships with the binary. A remote
//! backend is wired in by implementing the `DataStore` trait and linking the
//! library; connection setup and authentication live with that backend, not
//! here.

use clap::Parser;
use rental_populate::memory::{seed_fixture, MemoryStore};
use rental_populate::{populate, PopulateArgs};

/// Demo fleet seeded for dry-run executions.
const DRY_RUN_CLASSES: usize = 5;
const DRY_RUN_CARS_PER_CLASS: usize = 4;
const DRY_RUN_CUSTOMERS: usize = 50;

#[derive(Parser)]
#[command(
    name = "rental-populate",
    about = "Populate a rental store with constrained synthetic bookings",
    version
)]
struct Cli {
    #[command(flatten)]
    args: PopulateArgs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = cli.args.to_config();

    if !cli.args.dry_run {
        anyhow::bail!(
            "no remote store backend is linked into this binary; \
             run with --dry-run or embed the library with your DataStore implementation"
        );
    }

    let store = MemoryStore::new();
    seed_fixture(
        &store,
        DRY_RUN_CLASSES,
        DRY_RUN_CARS_PER_CLASS,
        DRY_RUN_CUSTOMERS,
    )
    .await?;

    let metrics = populate(&store, &config).await?;

    println!(
        "Done: {} bookings, {} transfer reports, {} skipped, {:.1} bookings/sec",
        metrics.bookings_inserted,
        metrics.reports_created,
        metrics.samples_skipped,
        metrics.bookings_per_second()
    );

    Ok(())
}

//! Synthetic rental-booking populator.
//!
//! Fills a remote transactional store with randomized but plausible rental
//! records: weighted lifecycle statuses, realistic payment and damage rates,
//! and a per-car non-overlap guarantee on reserved date ranges, enforced by
//! rejection sampling against the store's current contents. Accepted
//! bookings in Renting or Returned status get linked pickup/return transfer
//! reports.
//!
//! The store itself is abstract: implement [`DataStore`] for your backend,
//! or use the bundled in-memory [`MemoryStore`] (tests, `--dry-run`).
//!
//! ```no_run
//! use rental_populate::{populate, MemoryStore, PopulateConfig};
//!
//! # async fn run() -> Result<(), rental_populate::PopulateError> {
//! let store = MemoryStore::new();
//! rental_populate::memory::seed_fixture(&store, 5, 4, 50).await?;
//!
//! let config = PopulateConfig {
//!     sample_count: 100,
//!     ..PopulateConfig::default()
//! };
//! let metrics = populate(&store, &config).await?;
//! println!("{} bookings inserted", metrics.bookings_inserted);
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod memory;
pub mod model;
pub mod overlap;
pub mod populate;
pub mod query;
pub mod reference;
pub mod report;
pub mod sampler;
pub mod store;

pub use config::{OnExhausted, PopulateArgs, PopulateConfig};
pub use error::PopulateError;
pub use memory::MemoryStore;
pub use populate::{populate, PopulateMetrics};
pub use query::{fetch_all, Condition, PageInfo, QueryPage, QueryRequest};
pub use reference::ReferenceCache;
pub use store::{DataStore, FieldValue, OptionValue, Record, StoreError};

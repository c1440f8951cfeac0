//! Run configuration and its CLI argument surface.

use crate::error::PopulateError;
use chrono::NaiveDate;
use clap::{Args, ValueEnum};

/// What to do with a sample whose rejection sampling hit the attempt cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OnExhausted {
    /// Log a warning and move on to the next sample.
    Skip,
    /// Abort the whole run.
    Abort,
}

/// Everything a populate run needs to know. All of the original tool's
/// literals (sample count, date window, page size) are inputs here.
#[derive(Debug, Clone)]
pub struct PopulateConfig {
    /// Number of bookings to generate.
    pub sample_count: u64,
    /// Earliest reserved pickup date.
    pub base_start: NaiveDate,
    /// Latest reserved handover date.
    pub base_end: NaiveDate,
    /// Page size for bulk fetches.
    pub page_size: u32,
    /// Attempt cap per sample for rejection sampling.
    pub max_attempts: u32,
    /// RNG seed; same seed and store state give the same run.
    pub seed: u64,
    /// Policy when a sample exhausts its attempts.
    pub on_exhausted: OnExhausted,
}

impl PopulateConfig {
    pub fn validate(&self) -> Result<(), PopulateError> {
        if self.base_end <= self.base_start {
            return Err(PopulateError::Config(format!(
                "date window is empty: {} .. {}",
                self.base_start, self.base_end
            )));
        }
        if self.page_size == 0 {
            return Err(PopulateError::Config("page size must be positive".into()));
        }
        if self.max_attempts == 0 {
            return Err(PopulateError::Config(
                "attempt cap must be positive".into(),
            ));
        }
        Ok(())
    }
}

impl Default for PopulateConfig {
    fn default() -> Self {
        Self {
            sample_count: 40_000,
            base_start: NaiveDate::from_ymd_opt(2019, 1, 1).unwrap(),
            base_end: NaiveDate::from_ymd_opt(2020, 12, 31).unwrap(),
            page_size: 5000,
            max_attempts: 1000,
            seed: 42,
            on_exhausted: OnExhausted::Skip,
        }
    }
}

/// CLI arguments for a populate run.
#[derive(Args, Clone, Debug)]
pub struct PopulateArgs {
    /// Number of bookings to generate
    #[arg(long, default_value = "40000")]
    pub sample_count: u64,

    /// Earliest reserved pickup date (YYYY-MM-DD)
    #[arg(long, default_value = "2019-01-01")]
    pub base_start: NaiveDate,

    /// Latest reserved handover date (YYYY-MM-DD)
    #[arg(long, default_value = "2020-12-31")]
    pub base_end: NaiveDate,

    /// Page size for bulk fetches against the store
    #[arg(long, default_value = "5000")]
    pub page_size: u32,

    /// Attempt cap per sample before giving up on it
    #[arg(long, default_value = "1000")]
    pub max_attempts: u32,

    /// Random seed for deterministic generation (same seed = same data)
    #[arg(long, default_value = "42")]
    pub seed: u64,

    /// Policy when a sample exhausts its attempt cap
    #[arg(long, value_enum, default_value = "skip")]
    pub on_exhausted: OnExhausted,

    /// Dry-run mode: populate an in-memory store seeded with a demo fleet
    /// instead of a remote backend
    #[arg(long)]
    pub dry_run: bool,
}

impl PopulateArgs {
    pub fn to_config(&self) -> PopulateConfig {
        PopulateConfig {
            sample_count: self.sample_count,
            base_start: self.base_start,
            base_end: self.base_end,
            page_size: self.page_size,
            max_attempts: self.max_attempts,
            seed: self.seed,
            on_exhausted: self.on_exhausted,
        }
    }
}

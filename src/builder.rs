//! Candidate assembly and the rejection-sampling retry loop.
//!
//! Each attempt drafts a complete candidate (status, dates, class, car) and
//! throws the whole draft away if the chosen car is not free over the drawn
//! range. Everything is redrawn together on the next attempt, not just the
//! car, so accepted records keep the intended joint distribution.

use crate::config::PopulateConfig;
use crate::error::PopulateError;
use crate::model::{entity, Booking, Resource, StatusCategory, TransferType, STATE_ACTIVE};
use crate::overlap;
use crate::query::{fetch_all, Condition, QueryRequest};
use crate::reference::ReferenceCache;
use crate::report;
use crate::sampler;
use crate::store::{DataStore, FieldValue};
use chrono::Duration;
use rand::Rng;
use tracing::debug;

/// Rental duration bounds in days, inclusive.
const MIN_DURATION_DAYS: i64 = 1;
const MAX_DURATION_DAYS: i64 = 30;

/// One accepted sample plus how many attempts it took.
#[derive(Debug)]
pub struct Built {
    pub booking: Booking,
    pub attempts: u32,
}

/// Assembles one valid booking at a time from the reference cache and live
/// car availability.
pub struct RecordBuilder<'a, S: DataStore + ?Sized> {
    store: &'a S,
    cache: &'a ReferenceCache,
    config: &'a PopulateConfig,
}

impl<'a, S: DataStore + ?Sized> RecordBuilder<'a, S> {
    pub fn new(store: &'a S, cache: &'a ReferenceCache, config: &'a PopulateConfig) -> Self {
        Self {
            store,
            cache,
            config,
        }
    }

    /// Draft candidates until one passes the availability check, up to the
    /// configured attempt cap. Transfer reports for the accepted candidate
    /// are committed here; the booking itself is returned uncommitted.
    pub async fn build_one<R: Rng>(
        &self,
        rng: &mut R,
        sample_index: u64,
    ) -> Result<Built, PopulateError> {
        let window_days = (self.config.base_end - self.config.base_start).num_days();

        for attempt in 1..=self.config.max_attempts {
            let status = sampler::weighted_status(rng);
            let duration = sampler::uniform_int(rng, MIN_DURATION_DAYS, MAX_DURATION_DAYS);
            if duration > window_days {
                // Window shorter than the drawn duration; redraw.
                continue;
            }

            let offset = sampler::uniform_int(rng, 0, window_days - duration);
            let pickup = self.config.base_start + Duration::days(offset);
            let handover = pickup + Duration::days(duration);

            let class = sampler::uniform_pick(rng, &self.cache.classes);
            let cars = self.active_cars_in_class(class.id).await?;
            if cars.is_empty() {
                debug!(sample = sample_index, class = %class.code, "class has no active cars");
                continue;
            }
            let car = *sampler::uniform_pick(rng, &cars);

            if !overlap::is_available(
                self.store,
                self.config.page_size,
                car.id,
                pickup,
                handover,
            )
            .await?
            {
                debug!(
                    sample = sample_index,
                    attempt,
                    car = %car.id,
                    %pickup,
                    %handover,
                    "car unavailable, redrawing candidate"
                );
                continue;
            }

            let pickup_location = sampler::uniform_pick(rng, &self.cache.locations).code;
            let return_location = sampler::uniform_pick(rng, &self.cache.locations).code;
            let customer = sampler::uniform_pick(rng, &self.cache.customers);
            let paid = sampler::paid_outcome(rng, status);

            let pickup_report_id = if status.has_picked_up() {
                Some(report::create_report(self.store, rng, TransferType::Pickup, pickup, car.id).await?)
            } else {
                None
            };
            let return_report_id = if status == StatusCategory::Returned {
                Some(report::create_report(self.store, rng, TransferType::Return, handover, car.id).await?)
            } else {
                None
            };

            let booking = Booking {
                name: format!("Sample-{sample_index:07}"),
                status,
                reserved_pickup: pickup,
                reserved_handover: handover,
                actual_pickup: status.has_picked_up().then_some(pickup),
                actual_handover: (status == StatusCategory::Returned).then_some(handover),
                class_id: class.id,
                car_id: car.id,
                pickup_location,
                return_location,
                price: class.price_per_day * duration as f64,
                customer_id: customer.id,
                paid,
                pickup_report_id,
                return_report_id,
            };

            return Ok(Built { booking, attempts: attempt });
        }

        Err(PopulateError::ConstraintExhausted {
            sample: sample_index,
            attempts: self.config.max_attempts,
        })
    }

    /// Live query of the active cars in one class; deliberately not cached
    /// so newly retired cars drop out mid-run.
    async fn active_cars_in_class(
        &self,
        class_id: uuid::Uuid,
    ) -> Result<Vec<Resource>, PopulateError> {
        let request = QueryRequest::new(entity::CAR)
            .columns(["car_class_id", "name", "state"])
            .condition(Condition::eq(
                "car_class_id",
                FieldValue::Reference(class_id),
            ))
            .condition(Condition::eq("state", FieldValue::Int64(STATE_ACTIVE)));
        fetch_all(self.store, request, self.config.page_size)
            .await?
            .iter()
            .map(Resource::from_record)
            .collect()
    }
}

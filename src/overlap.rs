//! Per-car date-range availability check against current store state.

use crate::model::{entity, StatusCategory};
use crate::query::{fetch_all, Condition, QueryRequest};
use crate::store::{DataStore, FieldValue, StoreError};
use chrono::NaiveDate;
use uuid::Uuid;

/// Whether the car is free over `[pickup, handover]`.
///
/// Queries existing rentals for this car whose reserved range intersects the
/// candidate range. Canceled rentals do not block the car; every other
/// status does. Two ranges intersect iff the existing pickup is on or before
/// the candidate handover and the existing handover is on or after the
/// candidate pickup, which covers full containment in both directions as
/// well as partial overlaps.
///
/// This is a point-in-time check: nothing is locked or reserved between the
/// check and the eventual insert. A single sequential writer is assumed.
pub async fn is_available<S: DataStore + ?Sized>(
    store: &S,
    page_size: u32,
    car_id: Uuid,
    pickup: NaiveDate,
    handover: NaiveDate,
) -> Result<bool, StoreError> {
    let request = QueryRequest::new(entity::RENTAL)
        .columns(["car_id", "status", "reserved_pickup", "reserved_handover"])
        .condition(Condition::eq("car_id", FieldValue::Reference(car_id)))
        .condition(Condition::ne(
            "status",
            FieldValue::Int64(StatusCategory::Canceled.code()),
        ))
        .condition(Condition::le("reserved_pickup", FieldValue::Date(handover)))
        .condition(Condition::ge("reserved_handover", FieldValue::Date(pickup)));

    let conflicts = fetch_all(store, request, page_size).await?;
    Ok(conflicts.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use crate::model::Booking;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn store_with_rental(
        car_id: Uuid,
        status: StatusCategory,
        pickup: NaiveDate,
        handover: NaiveDate,
    ) -> MemoryStore {
        let store = MemoryStore::new();
        let booking = Booking {
            name: "Sample-0000001".to_string(),
            status,
            reserved_pickup: pickup,
            reserved_handover: handover,
            actual_pickup: None,
            actual_handover: None,
            class_id: Uuid::new_v4(),
            car_id,
            pickup_location: 1,
            return_location: 1,
            price: 100.0,
            customer_id: Uuid::new_v4(),
            paid: false,
            pickup_report_id: None,
            return_report_id: None,
        };
        store
            .create(entity::RENTAL, booking.into_fields())
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn intersecting_candidates_are_rejected() {
        let car_id = Uuid::new_v4();
        let store = store_with_rental(
            car_id,
            StatusCategory::Created,
            date(2019, 5, 1),
            date(2019, 5, 10),
        )
        .await;

        // Partial overlap on each side, exact match, containment both ways.
        let cases = [
            (date(2019, 4, 25), date(2019, 5, 1)),
            (date(2019, 5, 10), date(2019, 5, 20)),
            (date(2019, 5, 1), date(2019, 5, 10)),
            (date(2019, 5, 3), date(2019, 5, 7)),
            (date(2019, 4, 1), date(2019, 6, 1)),
        ];
        for (pickup, handover) in cases {
            assert!(
                !is_available(&store, 5000, car_id, pickup, handover)
                    .await
                    .unwrap(),
                "candidate [{pickup}, {handover}] should conflict"
            );
        }
    }

    #[tokio::test]
    async fn disjoint_candidate_is_accepted() {
        let car_id = Uuid::new_v4();
        let store = store_with_rental(
            car_id,
            StatusCategory::Created,
            date(2019, 5, 1),
            date(2019, 5, 10),
        )
        .await;

        assert!(is_available(&store, 5000, car_id, date(2019, 5, 11), date(2019, 5, 15))
            .await
            .unwrap());
        assert!(is_available(&store, 5000, car_id, date(2019, 4, 20), date(2019, 4, 30))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn canceled_rental_frees_the_car() {
        let car_id = Uuid::new_v4();
        let store = store_with_rental(
            car_id,
            StatusCategory::Canceled,
            date(2019, 5, 1),
            date(2019, 5, 10),
        )
        .await;

        assert!(is_available(&store, 5000, car_id, date(2019, 5, 3), date(2019, 5, 7))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn other_cars_do_not_block() {
        let car_id = Uuid::new_v4();
        let store = store_with_rental(
            Uuid::new_v4(),
            StatusCategory::Renting,
            date(2019, 5, 1),
            date(2019, 5, 10),
        )
        .await;

        assert!(is_available(&store, 5000, car_id, date(2019, 5, 3), date(2019, 5, 7))
            .await
            .unwrap());
    }
}

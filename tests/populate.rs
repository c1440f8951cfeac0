//! End-to-end populate runs against the in-memory store.
//!
//! Each test seeds a fleet fixture, runs the generator with a fixed seed,
//! and then reads every committed record back to check the invariants the
//! generator promises: per-car non-overlap, duration and window bounds,
//! status-derived field consistency, and transfer-report linkage.

use chrono::NaiveDate;
use rental_populate::memory::{seed_fixture, MemoryStore};
use rental_populate::model::{entity, Booking, StatusCategory, TransferType};
use rental_populate::{populate, DataStore, OnExhausted, PopulateConfig, PopulateError};
use std::collections::HashMap;
use uuid::Uuid;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn committed_bookings(store: &MemoryStore) -> Vec<Booking> {
    store
        .records(entity::RENTAL)
        .await
        .iter()
        .map(|record| Booking::from_record(record).expect("committed rental must decode"))
        .collect()
}

#[tokio::test]
async fn bookings_never_overlap_per_car() {
    let store = MemoryStore::new();
    seed_fixture(&store, 2, 2, 30).await.unwrap();

    // A tight window with few cars forces plenty of conflicts.
    let config = PopulateConfig {
        sample_count: 40,
        base_start: date(2019, 1, 1),
        base_end: date(2019, 4, 30),
        seed: 11,
        ..PopulateConfig::default()
    };
    let metrics = populate(&store, &config).await.unwrap();
    assert_eq!(
        metrics.bookings_inserted + metrics.samples_skipped,
        config.sample_count
    );

    let bookings = committed_bookings(&store).await;
    let mut per_car: HashMap<Uuid, Vec<&Booking>> = HashMap::new();
    for booking in &bookings {
        // Canceled bookings are outside the conflict set by design.
        if booking.status != StatusCategory::Canceled {
            per_car.entry(booking.car_id).or_default().push(booking);
        }
    }

    for (car_id, car_bookings) in &per_car {
        for (i, a) in car_bookings.iter().enumerate() {
            for b in &car_bookings[i + 1..] {
                let disjoint = a.reserved_handover < b.reserved_pickup
                    || b.reserved_handover < a.reserved_pickup;
                assert!(
                    disjoint,
                    "car {car_id}: [{}, {}] overlaps [{}, {}]",
                    a.reserved_pickup, a.reserved_handover, b.reserved_pickup, b.reserved_handover
                );
            }
        }
    }
}

#[tokio::test]
async fn durations_windows_and_prices_hold() {
    let store = MemoryStore::new();
    seed_fixture(&store, 5, 4, 50).await.unwrap();

    let config = PopulateConfig {
        sample_count: 200,
        seed: 7,
        ..PopulateConfig::default()
    };
    populate(&store, &config).await.unwrap();

    let classes: HashMap<Uuid, f64> = store
        .records(entity::CAR_CLASS)
        .await
        .iter()
        .map(|r| (r.id, r.get("price_per_day").unwrap().as_f64().unwrap()))
        .collect();

    let bookings = committed_bookings(&store).await;
    assert_eq!(bookings.len(), 200);

    for booking in &bookings {
        let days = (booking.reserved_handover - booking.reserved_pickup).num_days();
        assert!((1..=30).contains(&days), "duration {days} out of bounds");
        assert!(booking.reserved_pickup >= config.base_start);
        assert!(booking.reserved_handover <= config.base_end);

        let price_per_day = classes[&booking.class_id];
        assert!(
            (booking.price - price_per_day * days as f64).abs() < 1e-9,
            "price {} does not match {price_per_day} x {days}",
            booking.price
        );
    }
}

#[tokio::test]
async fn status_fields_and_report_linkage_are_consistent() {
    let store = MemoryStore::new();
    seed_fixture(&store, 3, 3, 40).await.unwrap();

    let config = PopulateConfig {
        sample_count: 300,
        seed: 3,
        ..PopulateConfig::default()
    };
    let metrics = populate(&store, &config).await.unwrap();

    let reports: HashMap<Uuid, (i64, Uuid, String)> = store
        .records(entity::TRANSFER_REPORT)
        .await
        .iter()
        .map(|r| {
            (
                r.id,
                (
                    r.get("transfer_type").unwrap().as_i64().unwrap(),
                    r.get("car_id").unwrap().as_reference().unwrap(),
                    r.get("description").unwrap().as_str().unwrap().to_string(),
                ),
            )
        })
        .collect();
    assert_eq!(reports.len() as u64, metrics.reports_created);

    let mut linked_reports = 0u64;
    for booking in &committed_bookings(&store).await {
        let picked_up = matches!(
            booking.status,
            StatusCategory::Renting | StatusCategory::Returned
        );
        let returned = booking.status == StatusCategory::Returned;

        assert_eq!(booking.actual_pickup.is_some(), picked_up);
        assert_eq!(booking.actual_handover.is_some(), returned);
        assert_eq!(booking.pickup_report_id.is_some(), picked_up);
        assert_eq!(booking.return_report_id.is_some(), returned);
        if booking.return_report_id.is_some() {
            assert!(
                booking.pickup_report_id.is_some(),
                "return report without pickup report"
            );
        }

        if let Some(report_id) = booking.pickup_report_id {
            linked_reports += 1;
            let (transfer_type, car_id, description) = &reports[&report_id];
            assert_eq!(*transfer_type, TransferType::Pickup.code());
            assert_eq!(*car_id, booking.car_id);
            assert_eq!(
                *description,
                format!("Pickup {}", booking.reserved_pickup)
            );
            assert_eq!(booking.actual_pickup, Some(booking.reserved_pickup));
        }
        if let Some(report_id) = booking.return_report_id {
            linked_reports += 1;
            let (transfer_type, car_id, description) = &reports[&report_id];
            assert_eq!(*transfer_type, TransferType::Return.code());
            assert_eq!(*car_id, booking.car_id);
            assert_eq!(
                *description,
                format!("Return {}", booking.reserved_handover)
            );
            assert_eq!(booking.actual_handover, Some(booking.reserved_handover));
        }
    }
    // Every committed report is referenced by exactly one booking.
    assert_eq!(linked_reports, metrics.reports_created);
}

#[tokio::test]
async fn saturated_car_skips_samples_by_default() {
    let store = MemoryStore::new();
    seed_fixture(&store, 1, 1, 5).await.unwrap();

    let config = PopulateConfig {
        sample_count: 5,
        base_start: date(2019, 1, 1),
        base_end: date(2019, 3, 1),
        max_attempts: 20,
        seed: 42,
        ..PopulateConfig::default()
    };

    // Block the only car for the whole window so every candidate fails.
    block_whole_window(&store, &config).await;

    let metrics = populate(&store, &config).await.unwrap();
    assert_eq!(metrics.bookings_inserted, 0);
    assert_eq!(metrics.samples_skipped, config.sample_count);
    assert_eq!(
        metrics.rejected_attempts, 0,
        "exhausted samples count as skips, not rejected attempts"
    );
}

#[tokio::test]
async fn saturated_car_aborts_when_configured() {
    let store = MemoryStore::new();
    seed_fixture(&store, 1, 1, 5).await.unwrap();

    let config = PopulateConfig {
        sample_count: 5,
        base_start: date(2019, 1, 1),
        base_end: date(2019, 3, 1),
        max_attempts: 20,
        on_exhausted: OnExhausted::Abort,
        seed: 42,
        ..PopulateConfig::default()
    };
    block_whole_window(&store, &config).await;

    let err = populate(&store, &config).await.unwrap_err();
    match err {
        PopulateError::ConstraintExhausted { sample, attempts } => {
            assert_eq!(sample, 1);
            assert_eq!(attempts, 20);
        }
        other => panic!("expected ConstraintExhausted, got {other}"),
    }
}

#[tokio::test]
async fn one_day_window_forces_redraws_until_durations_fit() {
    let store = MemoryStore::new();
    seed_fixture(&store, 1, 10, 5).await.unwrap();

    // Only a 1-day duration fits this window, so drafts drawing 2..=30 days
    // burn attempts before any availability check. Ten cars and a window
    // that each booking fills completely leave room for all five samples.
    let config = PopulateConfig {
        sample_count: 5,
        base_start: date(2019, 1, 1),
        base_end: date(2019, 1, 2),
        seed: 5,
        ..PopulateConfig::default()
    };
    let metrics = populate(&store, &config).await.unwrap();

    assert_eq!(metrics.bookings_inserted, 5);
    assert!(
        metrics.rejected_attempts > 0,
        "redraws that never reached the availability check must still be counted"
    );

    for booking in &committed_bookings(&store).await {
        assert_eq!(booking.reserved_pickup, config.base_start);
        assert_eq!(booking.reserved_handover, config.base_end);
    }
}

#[tokio::test]
async fn empty_reference_data_aborts_before_generation() {
    let store = MemoryStore::new();
    let config = PopulateConfig {
        sample_count: 10,
        ..PopulateConfig::default()
    };

    let err = populate(&store, &config).await.unwrap_err();
    assert!(matches!(err, PopulateError::EmptyReferenceSet(_)));
    assert!(store.records(entity::RENTAL).await.is_empty());
}

#[tokio::test]
async fn same_seed_draws_the_same_run_shape() {
    let mut shapes = Vec::new();
    for _ in 0..2 {
        let store = MemoryStore::new();
        seed_fixture(&store, 3, 3, 10).await.unwrap();
        let config = PopulateConfig {
            sample_count: 50,
            seed: 99,
            ..PopulateConfig::default()
        };
        populate(&store, &config).await.unwrap();

        let shape: Vec<(String, StatusCategory, NaiveDate, NaiveDate, bool)> =
            committed_bookings(&store)
                .await
                .iter()
                .map(|b| {
                    (
                        b.name.clone(),
                        b.status,
                        b.reserved_pickup,
                        b.reserved_handover,
                        b.paid,
                    )
                })
                .collect();
        shapes.push(shape);
    }
    assert_eq!(shapes[0], shapes[1]);
}

/// Insert a non-canceled rental spanning the configured window for every
/// car in the store, so no candidate range can ever be available.
async fn block_whole_window(store: &MemoryStore, config: &PopulateConfig) {
    let classes = store.records(entity::CAR_CLASS).await;
    let customers = store.records(entity::CUSTOMER).await;
    for car in store.records(entity::CAR).await {
        let blocker = Booking {
            name: "blocker".to_string(),
            status: StatusCategory::Renting,
            reserved_pickup: config.base_start,
            reserved_handover: config.base_end,
            actual_pickup: Some(config.base_start),
            actual_handover: None,
            class_id: classes[0].id,
            car_id: car.id,
            pickup_location: 1,
            return_location: 1,
            price: 1.0,
            customer_id: customers[0].id,
            paid: true,
            pickup_report_id: None,
            return_report_id: None,
        };
        store
            .create(entity::RENTAL, blocker.into_fields())
            .await
            .unwrap();
    }
}

//! Transfer-report creation, one store write per transfer event.

use crate::error::PopulateError;
use crate::model::{entity, TransferReport, TransferType};
use crate::sampler;
use crate::store::DataStore;
use chrono::NaiveDate;
use rand::Rng;
use tracing::debug;
use uuid::Uuid;

/// Placeholder text carried by reports whose damage flag is set.
const DAMAGE_PLACEHOLDER: &str = "damage";

/// Build and immediately commit a transfer report, returning its reference.
///
/// The damage flag is drawn here (probability 1/19); damaged reports carry a
/// fixed placeholder description.
pub async fn create_report<S: DataStore + ?Sized, R: Rng>(
    store: &S,
    rng: &mut R,
    transfer_type: TransferType,
    date: NaiveDate,
    car_id: Uuid,
) -> Result<Uuid, PopulateError> {
    let damages = sampler::damage_occurs(rng);
    let report = TransferReport {
        date,
        transfer_type,
        car_id,
        description: format!("{} {}", transfer_type.label(), date),
        damages,
        damages_description: damages.then(|| DAMAGE_PLACEHOLDER.to_string()),
    };

    let id = store
        .create(entity::TRANSFER_REPORT, report.into_fields())
        .await?;
    debug!(%id, kind = transfer_type.label(), %date, damages, "transfer report created");
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[tokio::test]
    async fn report_fields_are_committed() {
        let store = MemoryStore::new();
        let mut rng = StdRng::seed_from_u64(42);
        let car_id = Uuid::new_v4();
        let date = NaiveDate::from_ymd_opt(2019, 3, 11).unwrap();

        let id = create_report(&store, &mut rng, TransferType::Return, date, car_id)
            .await
            .unwrap();

        let records = store.records(entity::TRANSFER_REPORT).await;
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.id, id);
        assert_eq!(
            record.get("description").unwrap().as_str(),
            Some("Return 2019-03-11")
        );
        assert_eq!(record.get("car_id").unwrap().as_reference(), Some(car_id));
        assert_eq!(
            record.get("transfer_type").unwrap().as_i64(),
            Some(TransferType::Return.code())
        );
    }

    #[tokio::test]
    async fn damage_description_only_when_flag_set() {
        let store = MemoryStore::new();
        let mut rng = StdRng::seed_from_u64(42);
        let car_id = Uuid::new_v4();
        let date = NaiveDate::from_ymd_opt(2019, 3, 1).unwrap();

        for _ in 0..200 {
            create_report(&store, &mut rng, TransferType::Pickup, date, car_id)
                .await
                .unwrap();
        }

        let records = store.records(entity::TRANSFER_REPORT).await;
        let mut damaged = 0;
        for record in &records {
            let flag = record.get("damages").unwrap().as_bool().unwrap();
            assert_eq!(record.fields.contains_key("damages_description"), flag);
            if flag {
                damaged += 1;
            }
        }
        // 1/19 over 200 draws lands well inside this band.
        assert!(damaged >= 2 && damaged <= 30, "damaged = {damaged}");
    }
}

//! In-memory [`DataStore`] implementation.
//!
//! Backs the integration tests and `--dry-run` executions. It honours the
//! full query contract (AND-combined conditions, cursor-token paging) so the
//! paging and availability logic is exercised exactly as it would be against
//! a remote backend. Column projection is ignored; full records come back,
//! which callers tolerate since they only read the fields they asked for.

use crate::query::{PageInfo, QueryPage, QueryRequest};
use crate::store::{DataStore, FieldValue, OptionValue, Record, StoreError};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Page size used when a query carries no explicit paging state.
const FALLBACK_PAGE_SIZE: u32 = 5000;

#[derive(Default)]
struct Inner {
    entities: HashMap<String, Vec<Record>>,
    option_sets: HashMap<String, Vec<OptionValue>>,
}

/// Volatile store keeping every record in process memory.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an enumerated option set for later metadata lookups.
    pub async fn register_option_set(&self, name: &str, options: Vec<OptionValue>) {
        let mut inner = self.inner.lock().await;
        inner.option_sets.insert(name.to_string(), options);
    }

    /// Snapshot of every record of one entity kind, for test assertions.
    pub async fn records(&self, entity: &str) -> Vec<Record> {
        let inner = self.inner.lock().await;
        inner.entities.get(entity).cloned().unwrap_or_default()
    }
}

#[async_trait]
impl DataStore for MemoryStore {
    async fn query(&self, request: &QueryRequest) -> Result<QueryPage, StoreError> {
        let inner = self.inner.lock().await;
        let matching: Vec<&Record> = inner
            .entities
            .get(&request.entity)
            .map(|records| {
                records
                    .iter()
                    .filter(|record| request.conditions.iter().all(|c| c.matches(record)))
                    .collect()
            })
            .unwrap_or_default();

        let page = request
            .page
            .clone()
            .unwrap_or_else(|| PageInfo::first(FALLBACK_PAGE_SIZE));
        let offset: usize = if page.cursor.is_empty() {
            0
        } else {
            page.cursor
                .parse()
                .map_err(|_| StoreError::InvalidCursor(page.cursor.clone()))?
        };

        let records: Vec<Record> = matching
            .iter()
            .skip(offset)
            .take(page.size as usize)
            .map(|record| (*record).clone())
            .collect();
        let next_offset = offset + records.len();

        Ok(QueryPage {
            records,
            more_records: next_offset < matching.len(),
            cursor: next_offset.to_string(),
        })
    }

    async fn query_option_set(&self, name: &str) -> Result<Vec<OptionValue>, StoreError> {
        let inner = self.inner.lock().await;
        inner
            .option_sets
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::UnknownOptionSet(name.to_string()))
    }

    async fn create(
        &self,
        entity: &str,
        fields: HashMap<String, FieldValue>,
    ) -> Result<Uuid, StoreError> {
        let id = Uuid::new_v4();
        let mut inner = self.inner.lock().await;
        inner
            .entities
            .entry(entity.to_string())
            .or_default()
            .push(Record::new(id, fields));
        Ok(id)
    }
}

/// Seed a small fleet fixture: car classes with their cars, customers, and
/// the transfer-location option set. Used by `--dry-run` and by tests.
pub async fn seed_fixture(
    store: &MemoryStore,
    class_count: usize,
    cars_per_class: usize,
    customer_count: usize,
) -> Result<(), StoreError> {
    use crate::model::{entity, STATE_ACTIVE, TRANSFER_LOCATION_OPTION_SET};

    for class_index in 0..class_count {
        let mut class_fields = HashMap::new();
        class_fields.insert(
            "class_code".to_string(),
            FieldValue::String(format!("C{class_index:02}")),
        );
        class_fields.insert(
            "price_per_day".to_string(),
            FieldValue::Float64(30.0 + class_index as f64 * 15.0),
        );
        class_fields.insert("state".to_string(), FieldValue::Int64(STATE_ACTIVE));
        let class_id = store.create(entity::CAR_CLASS, class_fields).await?;

        for car_index in 0..cars_per_class {
            let mut car_fields = HashMap::new();
            car_fields.insert(
                "name".to_string(),
                FieldValue::String(format!("car-{class_index:02}-{car_index:02}")),
            );
            car_fields.insert("car_class_id".to_string(), FieldValue::Reference(class_id));
            car_fields.insert("state".to_string(), FieldValue::Int64(STATE_ACTIVE));
            store.create(entity::CAR, car_fields).await?;
        }
    }

    for _ in 0..customer_count {
        let mut customer_fields = HashMap::new();
        customer_fields.insert("state".to_string(), FieldValue::Int64(STATE_ACTIVE));
        store.create(entity::CUSTOMER, customer_fields).await?;
    }

    store
        .register_option_set(
            TRANSFER_LOCATION_OPTION_SET,
            vec![
                OptionValue {
                    code: 1,
                    label: "Airport".to_string(),
                },
                OptionValue {
                    code: 2,
                    label: "Downtown office".to_string(),
                },
                OptionValue {
                    code: 3,
                    label: "Train station".to_string(),
                },
            ],
        )
        .await;

    Ok(())
}

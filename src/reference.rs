//! One-time load of the reference data generation draws from.

use crate::error::PopulateError;
use crate::model::{
    entity, Customer, ResourceClass, STATE_ACTIVE, TRANSFER_LOCATION_OPTION_SET,
};
use crate::query::{fetch_all, Condition, QueryRequest};
use crate::store::{DataStore, FieldValue, OptionValue};
use tracing::info;

/// Immutable snapshot of the reference sets used throughout a run.
///
/// Loaded exactly once before generation begins; never refreshed during the
/// run. Staleness over a long run is an accepted non-goal.
#[derive(Debug, Clone)]
pub struct ReferenceCache {
    pub classes: Vec<ResourceClass>,
    pub customers: Vec<Customer>,
    pub locations: Vec<OptionValue>,
}

impl ReferenceCache {
    /// Load active car classes, active customers, and the transfer-location
    /// option set. An empty set is a fatal precondition failure.
    pub async fn load<S: DataStore + ?Sized>(
        store: &S,
        page_size: u32,
    ) -> Result<Self, PopulateError> {
        let class_request = QueryRequest::new(entity::CAR_CLASS)
            .columns(["class_code", "price_per_day", "state"])
            .condition(Condition::eq("state", FieldValue::Int64(STATE_ACTIVE)));
        let classes = fetch_all(store, class_request, page_size)
            .await?
            .iter()
            .map(ResourceClass::from_record)
            .collect::<Result<Vec<_>, _>>()?;
        if classes.is_empty() {
            return Err(PopulateError::EmptyReferenceSet(entity::CAR_CLASS));
        }

        let customer_request = QueryRequest::new(entity::CUSTOMER)
            .columns(["state"])
            .condition(Condition::eq("state", FieldValue::Int64(STATE_ACTIVE)));
        let customers: Vec<Customer> = fetch_all(store, customer_request, page_size)
            .await?
            .iter()
            .map(Customer::from_record)
            .collect();
        if customers.is_empty() {
            return Err(PopulateError::EmptyReferenceSet(entity::CUSTOMER));
        }

        let locations = store.query_option_set(TRANSFER_LOCATION_OPTION_SET).await?;
        if locations.is_empty() {
            return Err(PopulateError::EmptyReferenceSet(
                TRANSFER_LOCATION_OPTION_SET,
            ));
        }

        info!(
            classes = classes.len(),
            customers = customers.len(),
            locations = locations.len(),
            "reference data loaded"
        );

        Ok(Self {
            classes,
            customers,
            locations,
        })
    }
}

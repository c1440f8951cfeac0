//! Domain model: reference data, bookings, and transfer reports, plus their
//! encoding to and from store field bags.

use crate::error::PopulateError;
use crate::store::{FieldValue, Record};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Entity kinds addressed through the store.
pub mod entity {
    pub const CAR_CLASS: &str = "car_class";
    pub const CAR: &str = "car";
    pub const CUSTOMER: &str = "customer";
    pub const RENTAL: &str = "rental";
    pub const TRANSFER_REPORT: &str = "transfer_report";
}

/// Option set holding the transfer location codes.
pub const TRANSFER_LOCATION_OPTION_SET: &str = "transfer_location";

/// Lifecycle state codes shared by all stateful entities.
pub const STATE_ACTIVE: i64 = 0;
pub const STATE_INACTIVE: i64 = 1;

/// Lifecycle status of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusCategory {
    Created,
    Confirmed,
    Renting,
    Returned,
    Canceled,
}

impl StatusCategory {
    /// Option-set code stored on the rental record.
    pub fn code(self) -> i64 {
        match self {
            StatusCategory::Created => 1,
            StatusCategory::Confirmed => 2,
            StatusCategory::Renting => 3,
            StatusCategory::Returned => 4,
            StatusCategory::Canceled => 5,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(StatusCategory::Created),
            2 => Some(StatusCategory::Confirmed),
            3 => Some(StatusCategory::Renting),
            4 => Some(StatusCategory::Returned),
            5 => Some(StatusCategory::Canceled),
            _ => None,
        }
    }

    /// Returned and Canceled bookings are lifecycle-inactive.
    pub fn is_inactive(self) -> bool {
        matches!(self, StatusCategory::Returned | StatusCategory::Canceled)
    }

    /// The booking has physically started (the car left the lot).
    pub fn has_picked_up(self) -> bool {
        matches!(self, StatusCategory::Renting | StatusCategory::Returned)
    }
}

/// Direction of a car transfer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransferType {
    Pickup,
    Return,
}

impl TransferType {
    pub fn code(self) -> i64 {
        match self {
            TransferType::Pickup => 1,
            TransferType::Return => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TransferType::Pickup => "Pickup",
            TransferType::Return => "Return",
        }
    }
}

/// A category of cars sharing a daily price. Cached reference data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceClass {
    pub id: Uuid,
    pub code: String,
    pub price_per_day: f64,
}

impl ResourceClass {
    pub fn from_record(record: &Record) -> Result<Self, PopulateError> {
        Ok(Self {
            id: record.id,
            code: require_str(record, "class_code")?.to_string(),
            price_per_day: require_f64(record, "price_per_day")?,
        })
    }
}

/// A rentable customer account. Cached reference data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: Uuid,
}

impl Customer {
    pub fn from_record(record: &Record) -> Self {
        Self { id: record.id }
    }
}

/// A specific rentable car. Queried live per class, never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub id: Uuid,
    pub class_id: Uuid,
}

impl Resource {
    pub fn from_record(record: &Record) -> Result<Self, PopulateError> {
        Ok(Self {
            id: record.id,
            class_id: require_reference(record, "car_class_id")?,
        })
    }
}

/// One generated rental transaction. Built once, committed once, never
/// mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub name: String,
    pub status: StatusCategory,
    pub reserved_pickup: NaiveDate,
    pub reserved_handover: NaiveDate,
    pub actual_pickup: Option<NaiveDate>,
    pub actual_handover: Option<NaiveDate>,
    pub class_id: Uuid,
    pub car_id: Uuid,
    pub pickup_location: i64,
    pub return_location: i64,
    pub price: f64,
    pub customer_id: Uuid,
    pub paid: bool,
    pub pickup_report_id: Option<Uuid>,
    pub return_report_id: Option<Uuid>,
}

impl Booking {
    /// Encode for a store insert.
    pub fn into_fields(self) -> HashMap<String, FieldValue> {
        let mut fields = HashMap::new();
        fields.insert("state".to_string(), FieldValue::Int64(self.state_code()));
        fields.insert("name".to_string(), FieldValue::String(self.name));
        fields.insert("status".to_string(), FieldValue::Int64(self.status.code()));
        fields.insert(
            "reserved_pickup".to_string(),
            FieldValue::Date(self.reserved_pickup),
        );
        fields.insert(
            "reserved_handover".to_string(),
            FieldValue::Date(self.reserved_handover),
        );
        if let Some(date) = self.actual_pickup {
            fields.insert("actual_pickup".to_string(), FieldValue::Date(date));
        }
        if let Some(date) = self.actual_handover {
            fields.insert("actual_handover".to_string(), FieldValue::Date(date));
        }
        fields.insert(
            "car_class_id".to_string(),
            FieldValue::Reference(self.class_id),
        );
        fields.insert("car_id".to_string(), FieldValue::Reference(self.car_id));
        fields.insert(
            "pickup_location".to_string(),
            FieldValue::Int64(self.pickup_location),
        );
        fields.insert(
            "return_location".to_string(),
            FieldValue::Int64(self.return_location),
        );
        fields.insert("price".to_string(), FieldValue::Float64(self.price));
        fields.insert(
            "customer_id".to_string(),
            FieldValue::Reference(self.customer_id),
        );
        fields.insert("paid".to_string(), FieldValue::Bool(self.paid));
        if let Some(id) = self.pickup_report_id {
            fields.insert("pickup_report_id".to_string(), FieldValue::Reference(id));
        }
        if let Some(id) = self.return_report_id {
            fields.insert("return_report_id".to_string(), FieldValue::Reference(id));
        }
        fields
    }

    /// Decode a rental record fetched back from the store.
    pub fn from_record(record: &Record) -> Result<Self, PopulateError> {
        let status_code = require_i64(record, "status")?;
        let status = StatusCategory::from_code(status_code).ok_or(
            PopulateError::UnexpectedValue {
                id: record.id,
                field: "status",
            },
        )?;
        Ok(Self {
            name: require_str(record, "name")?.to_string(),
            status,
            reserved_pickup: require_date(record, "reserved_pickup")?,
            reserved_handover: require_date(record, "reserved_handover")?,
            actual_pickup: record.get("actual_pickup").and_then(FieldValue::as_date),
            actual_handover: record.get("actual_handover").and_then(FieldValue::as_date),
            class_id: require_reference(record, "car_class_id")?,
            car_id: require_reference(record, "car_id")?,
            pickup_location: require_i64(record, "pickup_location")?,
            return_location: require_i64(record, "return_location")?,
            price: require_f64(record, "price")?,
            customer_id: require_reference(record, "customer_id")?,
            paid: require_bool(record, "paid")?,
            pickup_report_id: record
                .get("pickup_report_id")
                .and_then(FieldValue::as_reference),
            return_report_id: record
                .get("return_report_id")
                .and_then(FieldValue::as_reference),
        })
    }

    /// Lifecycle state code derived from the status.
    pub fn state_code(&self) -> i64 {
        if self.status.is_inactive() {
            STATE_INACTIVE
        } else {
            STATE_ACTIVE
        }
    }
}

/// A record of one physical pickup or return event, optionally noting
/// damage. Write-once side record of a booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferReport {
    pub date: NaiveDate,
    pub transfer_type: TransferType,
    pub car_id: Uuid,
    pub description: String,
    pub damages: bool,
    pub damages_description: Option<String>,
}

impl TransferReport {
    pub fn into_fields(self) -> HashMap<String, FieldValue> {
        let mut fields = HashMap::new();
        fields.insert("date".to_string(), FieldValue::Date(self.date));
        fields.insert(
            "transfer_type".to_string(),
            FieldValue::Int64(self.transfer_type.code()),
        );
        fields.insert("car_id".to_string(), FieldValue::Reference(self.car_id));
        fields.insert(
            "description".to_string(),
            FieldValue::String(self.description),
        );
        fields.insert("damages".to_string(), FieldValue::Bool(self.damages));
        if let Some(text) = self.damages_description {
            fields.insert("damages_description".to_string(), FieldValue::String(text));
        }
        fields
    }
}

fn require<'a>(record: &'a Record, field: &'static str) -> Result<&'a FieldValue, PopulateError> {
    record.get(field).ok_or(PopulateError::MissingField {
        id: record.id,
        field,
    })
}

fn require_str<'a>(record: &'a Record, field: &'static str) -> Result<&'a str, PopulateError> {
    require(record, field)?
        .as_str()
        .ok_or(PopulateError::UnexpectedValue {
            id: record.id,
            field,
        })
}

fn require_i64(record: &Record, field: &'static str) -> Result<i64, PopulateError> {
    require(record, field)?
        .as_i64()
        .ok_or(PopulateError::UnexpectedValue {
            id: record.id,
            field,
        })
}

fn require_f64(record: &Record, field: &'static str) -> Result<f64, PopulateError> {
    require(record, field)?
        .as_f64()
        .ok_or(PopulateError::UnexpectedValue {
            id: record.id,
            field,
        })
}

fn require_bool(record: &Record, field: &'static str) -> Result<bool, PopulateError> {
    require(record, field)?
        .as_bool()
        .ok_or(PopulateError::UnexpectedValue {
            id: record.id,
            field,
        })
}

fn require_date(record: &Record, field: &'static str) -> Result<NaiveDate, PopulateError> {
    require(record, field)?
        .as_date()
        .ok_or(PopulateError::UnexpectedValue {
            id: record.id,
            field,
        })
}

fn require_reference(record: &Record, field: &'static str) -> Result<Uuid, PopulateError> {
    require(record, field)?
        .as_reference()
        .ok_or(PopulateError::UnexpectedValue {
            id: record.id,
            field,
        })
}

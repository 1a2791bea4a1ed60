use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::entity::EntityRef;
use super::lenient::{self, parse_timestamp};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    #[serde(rename = "_id", default, deserialize_with = "lenient::optional_text")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub make: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub model: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub license_plate: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub status: Option<String>,
}

impl Vehicle {
    /// `"<make> <model> (<plate>)"`, the label used on report headers and exports.
    pub fn display_name(&self) -> String {
        let name = [self.make.as_deref(), self.model.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");

        match self.license_plate.as_deref() {
            Some(plate) if name.is_empty() => plate.to_string(),
            Some(plate) => format!("{name} ({plate})"),
            None => name,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceRecord {
    #[serde(rename = "_id", default, deserialize_with = "lenient::optional_text")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::entity_ref")]
    pub vehicle_id: Option<EntityRef>,
    #[serde(default, deserialize_with = "lenient::entity_ref")]
    pub vehicle: Option<EntityRef>,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub service_date: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub service_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub cost: Decimal,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub service_provider: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub next_service_due: Option<String>,
}

impl MaintenanceRecord {
    pub fn serviced_at(&self) -> Option<DateTime<Utc>> {
        self.service_date.as_deref().and_then(parse_timestamp)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogBookEntry {
    #[serde(rename = "_id", default, deserialize_with = "lenient::optional_text")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::entity_ref")]
    pub vehicle_id: Option<EntityRef>,
    #[serde(default, deserialize_with = "lenient::entity_ref")]
    pub vehicle: Option<EntityRef>,
    #[serde(default, deserialize_with = "lenient::entity_ref")]
    pub driver_id: Option<EntityRef>,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub purpose: Option<String>,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub distance_traveled: Decimal,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub fuel_cost: Decimal,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub fuel_consumed: Decimal,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub fuel_efficiency: Decimal,
}

impl LogBookEntry {
    pub fn logged_at(&self) -> Option<DateTime<Utc>> {
        self.date.as_deref().and_then(parse_timestamp)
    }
}

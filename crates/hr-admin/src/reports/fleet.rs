use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::aggregate::{aggregate, ratio, FieldExtractors, ReportRecord};
use super::filter::{EntityScoped, ReportFilterSpec};
use super::range::DateRangeSelector;
use crate::records::{EntityRef, LogBookEntry, MaintenanceRecord, Vehicle};

pub const ALL_VEHICLES: &str = "All Vehicles";

impl EntityScoped for MaintenanceRecord {
    fn entity_ref(&self) -> Option<&EntityRef> {
        self.vehicle_id.as_ref()
    }

    fn populated_entity(&self) -> Option<&EntityRef> {
        self.vehicle.as_ref()
    }
}

impl ReportRecord for MaintenanceRecord {
    fn report_timestamp(&self) -> Option<DateTime<Utc>> {
        self.serviced_at()
    }
}

impl EntityScoped for LogBookEntry {
    fn entity_ref(&self) -> Option<&EntityRef> {
        self.vehicle_id.as_ref()
    }

    fn populated_entity(&self) -> Option<&EntityRef> {
        self.vehicle.as_ref()
    }
}

impl ReportRecord for LogBookEntry {
    fn report_timestamp(&self) -> Option<DateTime<Utc>> {
        self.logged_at()
    }
}

pub fn maintenance_extractors() -> FieldExtractors<MaintenanceRecord> {
    FieldExtractors::<MaintenanceRecord>::new().cost(|record| record.cost)
}

/// Log-book totals: fuel spend is the cost figure.
pub fn log_book_extractors() -> FieldExtractors<LogBookEntry> {
    FieldExtractors::<LogBookEntry>::new()
        .cost(|entry| entry.fuel_cost)
        .distance(|entry| entry.distance_traveled)
        .fuel_consumed(|entry| entry.fuel_consumed)
}

/// The three fleet collections as fetched from the REST layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetDataset {
    #[serde(default)]
    pub vehicles: Vec<Vehicle>,
    #[serde(default, alias = "maintenanceRecords")]
    pub maintenance: Vec<MaintenanceRecord>,
    #[serde(default, alias = "logBookEntries")]
    pub log_book: Vec<LogBookEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FleetReport<'a> {
    pub vehicle_display_name: String,
    pub date_range: DateRangeSelector,
    pub date_range_label: String,
    pub total_maintenance_cost: Decimal,
    pub total_fuel_cost: Decimal,
    pub total_distance: Decimal,
    pub total_fuel_consumed: Decimal,
    /// km per litre, two decimal places.
    pub fuel_efficiency: Decimal,
    pub maintenance_frequency: usize,
    pub avg_maintenance_cost: Decimal,
    pub maintenance: Vec<&'a MaintenanceRecord>,
    pub log_book: Vec<&'a LogBookEntry>,
}

impl FleetDataset {
    pub fn vehicle(&self, id: &str) -> Option<&Vehicle> {
        self.vehicles
            .iter()
            .find(|vehicle| vehicle.id.as_deref() == Some(id))
    }

    /// Header label for `vehicle_id`: the vehicle's display name, the raw id when the vehicle is
    /// not in the dataset, or "All Vehicles" without a filter.
    pub fn vehicle_display_name(&self, vehicle_id: Option<&str>) -> String {
        let Some(id) = vehicle_id else {
            return ALL_VEHICLES.to_string();
        };

        self.vehicle(id)
            .map(Vehicle::display_name)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| id.to_string())
    }

    pub fn report(&self, filter: &ReportFilterSpec, now: DateTime<Utc>) -> FleetReport<'_> {
        let maintenance = aggregate(&self.maintenance, filter, now, &maintenance_extractors());
        let log_book = aggregate(&self.log_book, filter, now, &log_book_extractors());

        let fuel_efficiency = ratio(log_book.total_distance, log_book.total_fuel_consumed)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
            .normalize();

        info!(
            vehicle = filter.entity().unwrap_or("all"),
            range = %filter.date_range,
            maintenance = maintenance.count,
            log_book = log_book.count,
            "built fleet report"
        );

        FleetReport {
            vehicle_display_name: self.vehicle_display_name(filter.entity()),
            date_range: filter.date_range,
            date_range_label: filter.date_range.label(),
            total_maintenance_cost: maintenance.total_cost,
            total_fuel_cost: log_book.total_cost,
            total_distance: log_book.total_distance,
            total_fuel_consumed: log_book.total_fuel_consumed,
            fuel_efficiency,
            maintenance_frequency: maintenance.count,
            avg_maintenance_cost: maintenance.average_cost,
            maintenance: maintenance.filtered_records,
            log_book: log_book.filtered_records,
        }
    }
}

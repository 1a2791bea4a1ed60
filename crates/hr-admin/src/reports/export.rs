//! Spreadsheet export of the fleet report.

use chrono::NaiveDate;

use super::fleet::FleetReport;
use crate::records::{parse_timestamp, EntityRef, LogBookEntry, MaintenanceRecord};

/// Spreadsheet applications need the byte-order mark to detect UTF-8.
pub const CSV_BOM: &str = "\u{feff}";

const MAINTENANCE_HEADER: [&str; 6] = [
    "Vehicle",
    "Date",
    "Service Type",
    "Cost",
    "Provider",
    "Next Service Due",
];

const LOG_BOOK_HEADER: [&str; 7] = [
    "Vehicle",
    "Driver",
    "Date",
    "Purpose",
    "Distance (km)",
    "Fuel Cost",
    "Fuel Efficiency",
];

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write csv row: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush csv buffer: {0}")]
    Flush(String),
    #[error("csv output was not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Render the report as three CSV sections separated by blank lines. No BOM; see [`with_bom`].
pub fn fleet_report_csv(report: &FleetReport<'_>) -> Result<String, ExportError> {
    let summary = write_section(|writer| {
        writer.write_record(["SUMMARY METRICS"])?;
        let metrics = [
            ("Total Maintenance Cost", report.total_maintenance_cost.to_string()),
            ("Total Fuel Cost", report.total_fuel_cost.to_string()),
            ("Total Distance (km)", report.total_distance.to_string()),
            ("Fuel Efficiency (km/L)", report.fuel_efficiency.to_string()),
            ("Maintenance Frequency", report.maintenance_frequency.to_string()),
            ("Average Maintenance Cost", report.avg_maintenance_cost.to_string()),
        ];
        for (label, value) in metrics {
            writer.write_record([label, value.as_str()])?;
        }
        Ok(())
    })?;

    let maintenance = write_section(|writer| {
        writer.write_record(["MAINTENANCE RECORDS"])?;
        writer.write_record(MAINTENANCE_HEADER)?;
        for record in &report.maintenance {
            writer.write_record(maintenance_row(record))?;
        }
        Ok(())
    })?;

    let log_book = write_section(|writer| {
        writer.write_record(["LOG BOOK ENTRIES"])?;
        writer.write_record(LOG_BOOK_HEADER)?;
        for entry in &report.log_book {
            writer.write_record(log_book_row(entry))?;
        }
        Ok(())
    })?;

    Ok([summary, maintenance, log_book].join("\n"))
}

pub fn with_bom(csv: &str) -> String {
    format!("{CSV_BOM}{csv}")
}

/// `vehicle-reports-YYYY-MM-DD.csv`
pub fn export_file_name(date: NaiveDate) -> String {
    format!("vehicle-reports-{}.csv", date.format("%Y-%m-%d"))
}

fn write_section<F>(write: F) -> Result<String, ExportError>
where
    F: FnOnce(&mut csv::Writer<Vec<u8>>) -> Result<(), csv::Error>,
{
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    write(&mut writer)?;

    let bytes = writer
        .into_inner()
        .map_err(|err| ExportError::Flush(err.to_string()))?;
    Ok(String::from_utf8(bytes)?)
}

fn maintenance_row(record: &MaintenanceRecord) -> [String; 6] {
    [
        vehicle_label(record.vehicle_id.as_ref().or(record.vehicle.as_ref())),
        day(record.service_date.as_deref()),
        record.service_type.clone().unwrap_or_default(),
        record.cost.to_string(),
        record.service_provider.clone().unwrap_or_default(),
        day(record.next_service_due.as_deref()),
    ]
}

fn log_book_row(entry: &LogBookEntry) -> [String; 7] {
    [
        vehicle_label(entry.vehicle_id.as_ref().or(entry.vehicle.as_ref())),
        full_name(entry.driver_id.as_ref()),
        day(entry.date.as_deref()),
        entry.purpose.clone().unwrap_or_default(),
        entry.distance_traveled.to_string(),
        entry.fuel_cost.to_string(),
        entry.fuel_efficiency.to_string(),
    ]
}

fn joined(reference: Option<&EntityRef>, first: &str, second: &str) -> String {
    let Some(reference) = reference else {
        return String::new();
    };

    [reference.text(first), reference.text(second)]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ")
}

fn vehicle_label(reference: Option<&EntityRef>) -> String {
    joined(reference, "make", "model")
}

fn full_name(reference: Option<&EntityRef>) -> String {
    joined(reference, "firstName", "lastName")
}

/// Dates render as `YYYY-MM-DD`; unparseable values are passed through untouched.
fn day(raw: Option<&str>) -> String {
    match raw {
        Some(raw) => parse_timestamp(raw)
            .map(|at| at.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| raw.to_string()),
        None => String::new(),
    }
}

use chrono::{DateTime, Utc};
use clap::Args;
use hr_admin::config::{AppConfig, ReportConfig};
use hr_admin::error::AppError;
use hr_admin::reports::export::{fleet_report_csv, with_bom};
use hr_admin::reports::fleet::{FleetDataset, FleetReport};
use hr_admin::reports::talent::{validate_trend_months, TalentDataset, TalentReport};
use hr_admin::reports::{DateRangeSelector, ReportFilterSpec};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub(crate) struct VehicleReportArgs {
    /// JSON file holding `vehicles`, `maintenance` and `logBook` collections
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Restrict the report to one vehicle id
    #[arg(long)]
    pub(crate) vehicle: Option<String>,
    /// Day count or one of lastWeek, lastMonth, lastYear, all (defaults to REPORT_DEFAULT_RANGE)
    #[arg(long)]
    pub(crate) range: Option<String>,
    /// Evaluation instant in RFC 3339 (defaults to now)
    #[arg(long)]
    pub(crate) now: Option<DateTime<Utc>>,
    /// Also write the CSV export to this path
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct TalentReportArgs {
    /// JSON file holding `applications`, `candidates` and `jobPostings` collections
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Restrict applications and postings to one job posting id
    #[arg(long)]
    pub(crate) job_posting: Option<String>,
    /// Number of calendar months in the trend table, 1 to 24 (defaults to REPORT_TREND_MONTHS)
    #[arg(long)]
    pub(crate) trend_months: Option<u32>,
    /// Evaluation instant in RFC 3339 (defaults to now)
    #[arg(long)]
    pub(crate) now: Option<DateTime<Utc>>,
}

fn load_dataset<T: DeserializeOwned>(path: &Path) -> Result<T, AppError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

fn report_defaults() -> Result<ReportConfig, AppError> {
    Ok(AppConfig::load()?.reports)
}

pub(crate) fn run_vehicle_report(args: VehicleReportArgs) -> Result<(), AppError> {
    let VehicleReportArgs {
        input,
        vehicle,
        range,
        now,
        csv,
    } = args;

    let defaults = report_defaults()?;
    let date_range = match range {
        Some(raw) => raw.parse::<DateRangeSelector>()?,
        None => defaults.default_range,
    };
    let now = now.unwrap_or_else(Utc::now);

    let dataset: FleetDataset = load_dataset(&input)?;
    let filter = ReportFilterSpec::new(vehicle, date_range);
    let report = dataset.report(&filter, now);
    render_vehicle_report(&report, now);

    if let Some(path) = csv {
        let body = fleet_report_csv(&report)?;
        std::fs::write(&path, with_bom(&body))?;
        println!("\nCSV export written to {}", path.display());
    }

    Ok(())
}

pub(crate) fn run_talent_report(args: TalentReportArgs) -> Result<(), AppError> {
    let TalentReportArgs {
        input,
        job_posting,
        trend_months,
        now,
    } = args;

    let defaults = report_defaults()?;
    let trend_months = match trend_months {
        Some(months) => validate_trend_months(months)?,
        None => defaults.trend_months,
    };
    let now = now.unwrap_or_else(Utc::now);

    let dataset: TalentDataset = load_dataset(&input)?;
    let report = dataset.report(job_posting.as_deref(), now, trend_months);
    render_talent_report(&report, job_posting.as_deref(), now);

    Ok(())
}

pub(crate) fn render_vehicle_report(report: &FleetReport<'_>, now: DateTime<Utc>) {
    println!("Vehicle report: {}", report.vehicle_display_name);
    println!(
        "Window: {} (evaluated {})",
        report.date_range_label,
        now.format("%Y-%m-%d %H:%M UTC")
    );

    println!("\nSummary");
    println!("- Total maintenance cost: {}", report.total_maintenance_cost);
    println!("- Total fuel cost: {}", report.total_fuel_cost);
    println!("- Total distance: {} km", report.total_distance);
    println!("- Total fuel consumed: {} L", report.total_fuel_consumed);
    println!("- Fuel efficiency: {} km/L", report.fuel_efficiency);
    println!("- Maintenance frequency: {}", report.maintenance_frequency);
    println!("- Average maintenance cost: {}", report.avg_maintenance_cost);

    if report.maintenance.is_empty() {
        println!("\nMaintenance records: none in window");
    } else {
        println!("\nMaintenance records");
        for record in &report.maintenance {
            println!(
                "- {} | {} | {}",
                record.service_date.as_deref().unwrap_or("-"),
                record.service_type.as_deref().unwrap_or("-"),
                record.cost
            );
        }
    }

    if report.log_book.is_empty() {
        println!("\nLog book entries: none in window");
    } else {
        println!("\nLog book entries");
        for entry in &report.log_book {
            println!(
                "- {} | {} km | {} L | {}",
                entry.date.as_deref().unwrap_or("-"),
                entry.distance_traveled,
                entry.fuel_consumed,
                entry.fuel_cost
            );
        }
    }
}

pub(crate) fn render_talent_report(
    report: &TalentReport,
    job_posting: Option<&str>,
    now: DateTime<Utc>,
) {
    println!("Talent acquisition report");
    println!(
        "Scope: {} (evaluated {})",
        job_posting.unwrap_or("all job postings"),
        now.format("%Y-%m-%d")
    );

    println!("\nTotals");
    println!("- Applications: {}", report.total_applications);
    println!("- Candidates: {}", report.total_candidates);
    println!("- Job postings: {}", report.total_job_postings);
    println!(
        "- Last 30 days: {} applications, {} hires",
        report.applications_last_30_days, report.hires_last_30_days
    );
    println!("- Conversion rate: {}%", report.conversion_rate);

    println!("\nStatus breakdown");
    for entry in &report.status_breakdown {
        println!("- {}: {} ({}%)", entry.name, entry.count, entry.percentage);
    }

    if report.top_departments.is_empty() {
        println!("\nTop departments: none");
    } else {
        println!("\nTop departments");
        for department in &report.top_departments {
            println!("- {}: {} postings", department.name, department.count);
        }
    }

    println!("\nCandidate sources");
    for source in &report.candidate_sources {
        println!("- {}: {} ({}%)", source.name, source.count, source.percentage);
    }

    println!("\nMonthly trends");
    for trend in &report.monthly_trends {
        println!(
            "- {}: {} applications, {} hired",
            trend.month, trend.applications, trend.hired
        );
    }
}

use std::collections::HashMap;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::aggregate::{ratio, ReportRecord};
use super::filter::{matches_entity, EntityScoped};
use super::range::{matches_date_range, DateRangeSelector};
use crate::records::{Application, Candidate, EntityRef, JobPosting};

const RECENT_WINDOW: DateRangeSelector = DateRangeSelector::Days(30);
const TOP_DEPARTMENTS: usize = 5;

/// Longest monthly trend table a report will build.
pub const MAX_TREND_MONTHS: u32 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("trend window must be between 1 and {max} months, got {requested}", max = MAX_TREND_MONTHS)]
pub struct TrendWindowError {
    pub requested: u32,
}

/// Accept a caller-supplied trend window only when it lies in `1..=MAX_TREND_MONTHS`.
pub fn validate_trend_months(months: u32) -> Result<u32, TrendWindowError> {
    if (1..=MAX_TREND_MONTHS).contains(&months) {
        Ok(months)
    } else {
        Err(TrendWindowError { requested: months })
    }
}

impl EntityScoped for Application {
    fn entity_ref(&self) -> Option<&EntityRef> {
        self.job_posting.as_ref()
    }
}

impl ReportRecord for Application {
    fn report_timestamp(&self) -> Option<DateTime<Utc>> {
        self.created()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TalentDataset {
    #[serde(default)]
    pub applications: Vec<Application>,
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub job_postings: Vec<JobPosting>,
}

/// A category with its count and share of the whole, in percent to one decimal place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShareEntry {
    pub name: String,
    pub count: usize,
    pub percentage: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartmentCount {
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyTrend {
    /// `"Mon YYYY"`
    pub month: String,
    pub applications: usize,
    pub hired: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct TalentReport {
    pub total_applications: usize,
    pub total_candidates: usize,
    pub total_job_postings: usize,
    pub applications_last_30_days: usize,
    pub hires_last_30_days: usize,
    pub conversion_rate: Decimal,
    pub status_breakdown: Vec<ShareEntry>,
    pub top_departments: Vec<DepartmentCount>,
    pub candidate_sources: Vec<ShareEntry>,
    pub monthly_trends: Vec<MonthlyTrend>,
}

impl TalentDataset {
    /// Build the recruiting dashboard figures. `job_posting_id` narrows applications and postings;
    /// candidates are always counted in full.
    pub fn report(
        &self,
        job_posting_id: Option<&str>,
        now: DateTime<Utc>,
        trend_months: u32,
    ) -> TalentReport {
        let job_posting_id = job_posting_id.map(str::trim).filter(|id| !id.is_empty());

        let applications: Vec<&Application> = self
            .applications
            .iter()
            .filter(|application| matches_entity(*application, job_posting_id))
            .collect();
        let job_postings: Vec<&JobPosting> = self
            .job_postings
            .iter()
            .filter(|posting| match job_posting_id {
                Some(id) => posting.id.as_deref() == Some(id),
                None => true,
            })
            .collect();

        let applications_last_30_days = applications
            .iter()
            .filter(|application| matches_date_range(application.created(), RECENT_WINDOW, now))
            .count();
        let hires_last_30_days = applications
            .iter()
            .filter(|application| {
                application.is_hired() && matches_date_range(application.updated(), RECENT_WINDOW, now)
            })
            .count();

        let total_applications = applications.len();
        let conversion_rate = percentage(hires_last_30_days, total_applications);

        let status_breakdown = shares(
            applications
                .iter()
                .map(|application| application.status.as_deref().unwrap_or("unknown")),
            total_applications,
        );
        let candidate_sources = shares(
            self.candidates
                .iter()
                .map(|candidate| candidate.source.as_deref().unwrap_or("unknown")),
            self.candidates.len(),
        );

        let mut top_departments: Vec<DepartmentCount> = tally(
            job_postings.iter().map(|posting| {
                posting
                    .department
                    .as_ref()
                    .and_then(|department| department.text("name"))
                    .unwrap_or("Unknown")
            }),
        )
        .into_iter()
        .map(|(name, count)| DepartmentCount { name, count })
        .collect();
        top_departments.sort_by(|a, b| b.count.cmp(&a.count));
        top_departments.truncate(TOP_DEPARTMENTS);

        let monthly_trends = monthly_trends(&applications, now, trend_months);

        info!(
            job_posting = job_posting_id.unwrap_or("all"),
            applications = total_applications,
            hires = hires_last_30_days,
            "built talent acquisition report"
        );

        TalentReport {
            total_applications,
            total_candidates: self.candidates.len(),
            total_job_postings: job_postings.len(),
            applications_last_30_days,
            hires_last_30_days,
            conversion_rate,
            status_breakdown,
            top_departments,
            candidate_sources,
            monthly_trends,
        }
    }
}

fn percentage(count: usize, total: usize) -> Decimal {
    ratio(Decimal::from(count) * Decimal::ONE_HUNDRED, Decimal::from(total))
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}

/// Count occurrences, keeping first-seen order.
fn tally<'a>(keys: impl Iterator<Item = &'a str>) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<&'a str, usize> = HashMap::new();

    for key in keys {
        match index.get(key) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                index.insert(key, counts.len());
                counts.push((key.to_string(), 1));
            }
        }
    }

    counts
}

fn shares<'a>(keys: impl Iterator<Item = &'a str>, total: usize) -> Vec<ShareEntry> {
    tally(keys)
        .into_iter()
        .map(|(name, count)| ShareEntry {
            name,
            count,
            percentage: percentage(count, total),
        })
        .collect()
}

/// Whole calendar months ending with the month containing `now`, oldest first. At most
/// [`MAX_TREND_MONTHS`] rows are built.
fn monthly_trends(applications: &[&Application], now: DateTime<Utc>, months: u32) -> Vec<MonthlyTrend> {
    (0..months.min(MAX_TREND_MONTHS))
        .rev()
        .filter_map(|back| month_start(now.date_naive(), back))
        .map(|start| {
            let in_month: Vec<&&Application> = applications
                .iter()
                .filter(|application| {
                    application
                        .created()
                        .is_some_and(|at| at.year() == start.year() && at.month() == start.month())
                })
                .collect();

            MonthlyTrend {
                month: start.format("%b %Y").to_string(),
                applications: in_month.len(),
                hired: in_month.iter().filter(|application| application.is_hired()).count(),
            }
        })
        .collect()
}

fn month_start(today: NaiveDate, months_back: u32) -> Option<NaiveDate> {
    let month0 = i32::try_from(today.month0()).ok()?;
    let back = i32::try_from(months_back).ok()?;
    let index = today
        .year()
        .checked_mul(12)?
        .checked_add(month0)?
        .checked_sub(back)?;
    let month = u32::try_from(index.rem_euclid(12)).ok()?;
    NaiveDate::from_ymd_opt(index.div_euclid(12), month + 1, 1)
}

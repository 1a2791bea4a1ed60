use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use super::filter::{matches_entity, EntityScoped, ReportFilterSpec};
use super::range::matches_date_range;

/// A record that can be windowed by date and scoped to a parent entity.
pub trait ReportRecord: EntityScoped {
    fn report_timestamp(&self) -> Option<DateTime<Utc>>;
}

/// Which numeric fields of `R` feed the cost, distance, and fuel totals. Unset extractors sum to
/// zero.
pub struct FieldExtractors<R> {
    cost: Option<fn(&R) -> Decimal>,
    distance: Option<fn(&R) -> Decimal>,
    fuel_consumed: Option<fn(&R) -> Decimal>,
}

impl<R> FieldExtractors<R> {
    pub const fn new() -> Self {
        Self {
            cost: None,
            distance: None,
            fuel_consumed: None,
        }
    }

    pub fn cost(mut self, extract: fn(&R) -> Decimal) -> Self {
        self.cost = Some(extract);
        self
    }

    pub fn distance(mut self, extract: fn(&R) -> Decimal) -> Self {
        self.distance = Some(extract);
        self
    }

    pub fn fuel_consumed(mut self, extract: fn(&R) -> Decimal) -> Self {
        self.fuel_consumed = Some(extract);
        self
    }
}

impl<R> Default for FieldExtractors<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary<'a, R> {
    pub total_cost: Decimal,
    pub total_distance: Decimal,
    pub total_fuel_consumed: Decimal,
    /// `total_distance / total_fuel_consumed`, zero when nothing was consumed.
    pub fuel_efficiency: Decimal,
    pub count: usize,
    /// `total_cost / count`, zero for an empty selection.
    pub average_cost: Decimal,
    pub filtered_records: Vec<&'a R>,
}

/// Filter `records` by entity and window, then reduce the survivors. Source order is preserved
/// and the input is never modified.
pub fn aggregate<'a, R>(
    records: &'a [R],
    filter: &ReportFilterSpec,
    now: DateTime<Utc>,
    extractors: &FieldExtractors<R>,
) -> ReportSummary<'a, R>
where
    R: ReportRecord,
{
    let entity = filter.entity();
    let filtered_records: Vec<&R> = records
        .iter()
        .filter(|record| {
            matches_entity(*record, entity)
                && matches_date_range(record.report_timestamp(), filter.date_range, now)
        })
        .collect();

    let total_cost = sum(extractors.cost, &filtered_records);
    let total_distance = sum(extractors.distance, &filtered_records);
    let total_fuel_consumed = sum(extractors.fuel_consumed, &filtered_records);
    let count = filtered_records.len();

    debug!(
        matched = count,
        scanned = records.len(),
        entity = entity.unwrap_or("all"),
        range = %filter.date_range,
        "aggregated report records"
    );

    ReportSummary {
        total_cost,
        total_distance,
        total_fuel_consumed,
        fuel_efficiency: ratio(total_distance, total_fuel_consumed),
        count,
        average_cost: ratio(total_cost, Decimal::from(count)),
        filtered_records,
    }
}

fn sum<R>(extract: Option<fn(&R) -> Decimal>, records: &[&R]) -> Decimal {
    let Some(extract) = extract else {
        return Decimal::ZERO;
    };

    records
        .iter()
        .fold(Decimal::ZERO, |total, record| {
            total.saturating_add(extract(record))
        })
}

pub(crate) fn ratio(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator.is_zero() {
        return Decimal::ZERO;
    }
    numerator
        .checked_div(denominator)
        .map(|value| value.normalize())
        .unwrap_or(Decimal::ZERO)
}

use std::collections::HashMap;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::Serialize;

use crate::records::{GroceryItem, TimestampField};

/// Records sharing one calendar month (UTC).
#[derive(Debug, Clone, Serialize)]
pub struct MonthGroup<'a, R> {
    /// `YYYY-MM`
    pub key: String,
    /// `"<MonthName> <Year>"`
    pub label: String,
    pub year: i32,
    pub month: u32,
    pub items: Vec<&'a R>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthGrouping<'a, R> {
    /// Newest month first.
    pub groups: Vec<MonthGroup<'a, R>>,
    /// Records whose timestamps were missing or unparseable, in source order.
    pub undated: Vec<&'a R>,
}

impl<R> MonthGrouping<'_, R> {
    pub fn total_items(&self) -> usize {
        self.groups.iter().map(|group| group.items.len()).sum::<usize>() + self.undated.len()
    }
}

/// Bucket `records` by the month of `timestamp`, keeping source order inside each bucket.
pub fn group_by_month<'a, R, F>(records: &'a [R], timestamp: F) -> MonthGrouping<'a, R>
where
    F: Fn(&R) -> Option<DateTime<Utc>>,
{
    let mut groups: Vec<MonthGroup<'a, R>> = Vec::new();
    let mut index: HashMap<(i32, u32), usize> = HashMap::new();
    let mut undated = Vec::new();

    for record in records {
        let Some(at) = timestamp(record) else {
            undated.push(record);
            continue;
        };

        let bucket = (at.year(), at.month());
        let slot = *index.entry(bucket).or_insert_with(|| {
            groups.push(new_group(bucket.0, bucket.1));
            groups.len() - 1
        });
        groups[slot].items.push(record);
    }

    groups.sort_by(|a, b| (b.year, b.month).cmp(&(a.year, a.month)));

    MonthGrouping { groups, undated }
}

/// Grocery list grouping: `field` first, the other audit timestamp as fallback.
pub fn group_groceries_by_month(
    items: &[GroceryItem],
    field: TimestampField,
) -> MonthGrouping<'_, GroceryItem> {
    group_by_month(items, |item| item.timestamp(field))
}

fn new_group<'a, R>(year: i32, month: u32) -> MonthGroup<'a, R> {
    let label = NaiveDate::from_ymd_opt(year, month, 1)
        .map(|first| first.format("%B %Y").to_string())
        .unwrap_or_else(|| format!("{year}-{month:02}"));

    MonthGroup {
        key: format!("{year:04}-{month:02}"),
        label,
        year,
        month,
        items: Vec::new(),
    }
}

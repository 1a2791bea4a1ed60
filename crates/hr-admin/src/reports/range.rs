use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Named report windows offered next to the explicit day counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedRange {
    LastWeek,
    LastMonth,
    LastYear,
    All,
}

impl NamedRange {
    pub const fn ordered() -> [Self; 4] {
        [Self::LastWeek, Self::LastMonth, Self::LastYear, Self::All]
    }

    /// Window length in days; `None` means unbounded.
    pub const fn days(self) -> Option<i64> {
        match self {
            Self::LastWeek => Some(7),
            Self::LastMonth => Some(30),
            Self::LastYear => Some(365),
            Self::All => None,
        }
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::LastWeek => "lastWeek",
            Self::LastMonth => "lastMonth",
            Self::LastYear => "lastYear",
            Self::All => "all",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::LastWeek => "Last 7 days",
            Self::LastMonth => "Last 30 days",
            Self::LastYear => "Last 365 days",
            Self::All => "All time",
        }
    }
}

/// A report window: an explicit day count or a named bucket, never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateRangeSelector {
    Days(u32),
    Named(NamedRange),
}

impl DateRangeSelector {
    pub fn label(self) -> String {
        match self {
            Self::Days(days) => format!("Last {days} days"),
            Self::Named(named) => named.label().to_string(),
        }
    }
}

impl Default for DateRangeSelector {
    fn default() -> Self {
        Self::Days(30)
    }
}

impl fmt::Display for DateRangeSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Days(days) => write!(f, "{days}"),
            Self::Named(named) => f.write_str(named.key()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is neither a day count nor one of lastWeek, lastMonth, lastYear, all")]
pub struct ParseRangeError(pub String);

impl FromStr for DateRangeSelector {
    type Err = ParseRangeError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if let Ok(days) = trimmed.parse::<u32>() {
            return Ok(Self::Days(days));
        }

        let normalized: String = trimmed
            .chars()
            .filter(|ch| ch.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();

        NamedRange::ordered()
            .into_iter()
            .find(|named| named.key().to_ascii_lowercase() == normalized)
            .map(Self::Named)
            .ok_or_else(|| ParseRangeError(raw.to_string()))
    }
}

impl Serialize for DateRangeSelector {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Days(days) => serializer.serialize_u32(*days),
            Self::Named(named) => serializer.serialize_str(named.key()),
        }
    }
}

impl<'de> Deserialize<'de> for DateRangeSelector {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Number(number) => number
                .as_u64()
                .and_then(|days| u32::try_from(days).ok())
                .map(Self::Days)
                .ok_or_else(|| serde::de::Error::custom("day count must be a non-negative integer")),
            Value::String(raw) => raw.parse().map_err(serde::de::Error::custom),
            other => Err(serde::de::Error::custom(format!(
                "expected a day count or range name, found {other}"
            ))),
        }
    }
}

/// Inclusive window test: `now - window <= timestamp <= now`. Missing timestamps never match,
/// not even for [`NamedRange::All`].
pub fn matches_date_range(
    timestamp: Option<DateTime<Utc>>,
    selector: DateRangeSelector,
    now: DateTime<Utc>,
) -> bool {
    let Some(timestamp) = timestamp else {
        return false;
    };

    let days = match selector {
        DateRangeSelector::Days(days) => i64::from(days),
        DateRangeSelector::Named(named) => match named.days() {
            Some(days) => days,
            None => return true,
        },
    };

    let start = now
        .checked_sub_signed(Duration::days(days))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);

    start <= timestamp && timestamp <= now
}

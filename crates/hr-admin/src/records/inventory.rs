use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::lenient::{self, parse_timestamp};

/// Which audit timestamp drives month bucketing; the other one is the fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimestampField {
    #[default]
    CreatedAt,
    UpdatedAt,
}

impl TimestampField {
    pub const fn fallback(self) -> Self {
        match self {
            Self::CreatedAt => Self::UpdatedAt,
            Self::UpdatedAt => Self::CreatedAt,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroceryItem {
    #[serde(rename = "_id", default, deserialize_with = "lenient::optional_text")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub quantity: Decimal,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub unit: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub updated_at: Option<String>,
}

impl GroceryItem {
    fn raw_timestamp(&self, field: TimestampField) -> Option<DateTime<Utc>> {
        let raw = match field {
            TimestampField::CreatedAt => self.created_at.as_deref(),
            TimestampField::UpdatedAt => self.updated_at.as_deref(),
        };
        raw.and_then(parse_timestamp)
    }

    /// Reads `field`, falling back to the other audit timestamp when it is absent or unparseable.
    pub fn timestamp(&self, field: TimestampField) -> Option<DateTime<Utc>> {
        self.raw_timestamp(field)
            .or_else(|| self.raw_timestamp(field.fallback()))
    }
}

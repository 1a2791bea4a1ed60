use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::entity::EntityRef;
use super::lenient::{self, parse_timestamp};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(rename = "_id", default, deserialize_with = "lenient::optional_text")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub source: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub expected_salary: Decimal,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    #[serde(rename = "_id", default, deserialize_with = "lenient::optional_text")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::entity_ref")]
    pub job_posting: Option<EntityRef>,
    #[serde(default, deserialize_with = "lenient::entity_ref")]
    pub candidate: Option<EntityRef>,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub availability: Option<String>,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub expected_salary: Decimal,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub updated_at: Option<String>,
}

impl Application {
    pub fn created(&self) -> Option<DateTime<Utc>> {
        self.created_at.as_deref().and_then(parse_timestamp)
    }

    pub fn updated(&self) -> Option<DateTime<Utc>> {
        self.updated_at.as_deref().and_then(parse_timestamp)
    }

    pub fn is_hired(&self) -> bool {
        self.status.as_deref() == Some("hired")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPosting {
    #[serde(rename = "_id", default, deserialize_with = "lenient::optional_text")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::entity_ref")]
    pub department: Option<EntityRef>,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub created_at: Option<String>,
}

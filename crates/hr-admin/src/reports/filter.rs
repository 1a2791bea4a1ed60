use serde::{Deserialize, Serialize};

use super::range::DateRangeSelector;
use crate::records::{lenient, EntityRef};

/// Records that point at a parent entity (vehicle, job posting, ...).
pub trait EntityScoped {
    /// The record's own reference field, either a bare id or the populated parent.
    fn entity_ref(&self) -> Option<&EntityRef>;

    /// A second, populated copy of the parent that some endpoints attach.
    fn populated_entity(&self) -> Option<&EntityRef> {
        None
    }
}

/// Which parent entity and time window a report covers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportFilterSpec {
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub entity_id: Option<String>,
    #[serde(default)]
    pub date_range: DateRangeSelector,
}

impl ReportFilterSpec {
    pub fn new(entity_id: Option<String>, date_range: DateRangeSelector) -> Self {
        Self {
            entity_id,
            date_range,
        }
    }

    pub fn all_entities(date_range: DateRangeSelector) -> Self {
        Self::new(None, date_range)
    }

    /// The effective entity filter; blank ids mean "all".
    pub fn entity(&self) -> Option<&str> {
        self.entity_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

/// True when no entity filter is set, or the record references `entity_id` as a bare id, as a
/// populated primary reference, or through its secondary populated parent.
pub fn matches_entity<R>(record: &R, entity_id: Option<&str>) -> bool
where
    R: EntityScoped + ?Sized,
{
    let Some(entity_id) = entity_id.map(str::trim).filter(|id| !id.is_empty()) else {
        return true;
    };

    let primary = record.entity_ref().and_then(EntityRef::id);
    let secondary = record
        .populated_entity()
        .and_then(EntityRef::populated)
        .and_then(|entity| entity.id.as_deref());

    primary == Some(entity_id) || secondary == Some(entity_id)
}

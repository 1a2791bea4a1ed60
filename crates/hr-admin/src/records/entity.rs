use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A reference to a parent entity as the REST layer delivers it: either the bare identifier or
/// the populated document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EntityRef {
    Id(String),
    Populated(PopulatedEntity),
}

/// A populated parent document. Only `_id` is interpreted; everything else is carried as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PopulatedEntity {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl PopulatedEntity {
    pub fn text(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }
}

impl EntityRef {
    pub fn id(&self) -> Option<&str> {
        match self {
            EntityRef::Id(id) => Some(id.as_str()),
            EntityRef::Populated(entity) => entity.id.as_deref(),
        }
    }

    pub fn populated(&self) -> Option<&PopulatedEntity> {
        match self {
            EntityRef::Id(_) => None,
            EntityRef::Populated(entity) => Some(entity),
        }
    }

    /// Read a field of the populated document; bare ids carry no fields.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.populated().and_then(|entity| entity.text(key))
    }

    pub(crate) fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::String(id) if !id.trim().is_empty() => Some(EntityRef::Id(id)),
            Value::Number(id) => Some(EntityRef::Id(id.to_string())),
            Value::Object(mut fields) => {
                let id = fields
                    .remove("_id")
                    .or_else(|| fields.remove("id"))
                    .as_ref()
                    .and_then(super::lenient::text_from_value);
                Some(EntityRef::Populated(PopulatedEntity { id, fields }))
            }
            _ => None,
        }
    }
}

impl From<&str> for EntityRef {
    fn from(id: &str) -> Self {
        EntityRef::Id(id.to_string())
    }
}

impl<'de> Deserialize<'de> for EntityRef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        EntityRef::from_value(value)
            .ok_or_else(|| serde::de::Error::custom("expected an id string or a populated object"))
    }
}

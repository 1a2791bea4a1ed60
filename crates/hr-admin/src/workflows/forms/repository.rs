use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::catalogue::FormKind;
pub use crate::workflows::repository::RepositoryError;
use crate::workflows::wizard::FormValues;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionId(pub String);

/// A completed form as handed to persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub id: SubmissionId,
    pub kind: FormKind,
    pub values: FormValues,
    pub submitted_at: DateTime<Utc>,
}

impl SubmissionRecord {
    pub fn view(&self) -> SubmissionView {
        SubmissionView {
            submission_id: self.id.clone(),
            kind: self.kind,
            kind_label: self.kind.label(),
            submitted_at: self.submitted_at,
            field_count: self.values.len(),
            values: self.values.clone(),
        }
    }
}

/// Storage abstraction so the service can run against memory or a real store.
pub trait SubmissionRepository: Send + Sync {
    fn insert(&self, record: SubmissionRecord) -> Result<SubmissionRecord, RepositoryError>;
    fn fetch(&self, id: &SubmissionId) -> Result<Option<SubmissionRecord>, RepositoryError>;
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmissionView {
    pub submission_id: SubmissionId,
    pub kind: FormKind,
    pub kind_label: &'static str,
    pub submitted_at: DateTime<Utc>,
    pub field_count: usize,
    pub values: FormValues,
}

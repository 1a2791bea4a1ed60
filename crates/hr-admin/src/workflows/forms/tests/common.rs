use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::{json, Value};

use crate::workflows::forms::repository::{
    RepositoryError, SubmissionId, SubmissionRecord, SubmissionRepository,
};
use crate::workflows::forms::{form_router, FormSubmissionService};
use crate::workflows::wizard::FormValues;

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    records: Arc<Mutex<HashMap<SubmissionId, SubmissionRecord>>>,
}

impl MemoryRepository {
    pub(super) fn len(&self) -> usize {
        self.records.lock().expect("repository lock").len()
    }
}

impl SubmissionRepository for MemoryRepository {
    fn insert(&self, record: SubmissionRecord) -> Result<SubmissionRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository lock");
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &SubmissionId) -> Result<Option<SubmissionRecord>, RepositoryError> {
        Ok(self.records.lock().expect("repository lock").get(id).cloned())
    }
}

pub(super) struct UnavailableRepository;

impl SubmissionRepository for UnavailableRepository {
    fn insert(&self, _record: SubmissionRecord) -> Result<SubmissionRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &SubmissionId) -> Result<Option<SubmissionRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn build_service() -> (FormSubmissionService<MemoryRepository>, MemoryRepository) {
    let repository = MemoryRepository::default();
    let service = FormSubmissionService::new(Arc::new(repository.clone()));
    (service, repository)
}

pub(super) fn router_with_service(service: FormSubmissionService<MemoryRepository>) -> axum::Router {
    form_router(Arc::new(service))
}

pub(super) fn candidate_values() -> FormValues {
    [
        ("firstName", json!("Sana")),
        ("lastName", json!("Iqbal")),
        ("email", json!("sana@example.com")),
        ("phone", json!("+92 300 1234567")),
        ("dateOfBirth", json!("1994-02-01")),
        ("gender", json!("female")),
        ("nationality", json!("Pakistani")),
        ("currentPosition", json!("Fleet Coordinator")),
        ("currentCompany", json!("Acme Logistics")),
        ("yearsOfExperience", json!("4")),
        ("source", json!("referral")),
    ]
    .into_iter()
    .collect()
}

pub(super) fn job_posting_values() -> FormValues {
    [
        ("title", json!("Senior Mechanic")),
        ("department", json!("dep-1")),
        ("location", json!("loc-1")),
        ("position", json!("pos-1")),
        ("employmentType", json!("full_time")),
        ("experienceLevel", json!("senior")),
        ("educationLevel", json!("diploma")),
        ("minSalary", json!(80000)),
        ("maxSalary", json!(120000)),
        ("applicationDeadline", json!("2024-09-30")),
    ]
    .into_iter()
    .collect()
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

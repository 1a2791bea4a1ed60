use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use serde_json::Value;

use crate::workflows::approvals::{
    approval_router, ApprovalDecision, ApprovalError, ApprovalId, ApprovalRepository, ApprovalRequest,
    ApprovalService, CandidateApproval,
};
use crate::workflows::repository::RepositoryError;

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    approvals: Arc<Mutex<HashMap<ApprovalId, CandidateApproval>>>,
}

impl MemoryRepository {
    pub(super) fn stored(&self, id: &ApprovalId) -> Option<CandidateApproval> {
        self.approvals.lock().expect("repository lock").get(id).cloned()
    }
}

impl ApprovalRepository for MemoryRepository {
    fn insert(&self, approval: CandidateApproval) -> Result<CandidateApproval, RepositoryError> {
        let mut guard = self.approvals.lock().expect("repository lock");
        if guard.contains_key(&approval.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(approval.id.clone(), approval.clone());
        Ok(approval)
    }

    fn modify<F>(
        &self,
        id: &ApprovalId,
        change: F,
    ) -> Result<Result<CandidateApproval, ApprovalError>, RepositoryError>
    where
        F: FnOnce(&mut CandidateApproval) -> Result<(), ApprovalError>,
    {
        let mut guard = self.approvals.lock().expect("repository lock");
        let stored = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        let mut draft = stored.clone();
        Ok(change(&mut draft).map(|()| {
            *stored = draft.clone();
            draft
        }))
    }

    fn fetch(&self, id: &ApprovalId) -> Result<Option<CandidateApproval>, RepositoryError> {
        Ok(self.approvals.lock().expect("repository lock").get(id).cloned())
    }
}

pub(super) fn build_service() -> (ApprovalService<MemoryRepository>, MemoryRepository) {
    let repository = MemoryRepository::default();
    (ApprovalService::new(Arc::new(repository.clone())), repository)
}

pub(super) fn router_with_service(service: ApprovalService<MemoryRepository>) -> axum::Router {
    approval_router(Arc::new(service))
}

pub(super) const APPROVERS: [&str; 5] = [
    "amhr@example.com",
    "mhr@example.com",
    "hod@example.com",
    "vp@example.com",
    "ceo@example.com",
];

pub(super) fn request() -> ApprovalRequest {
    ApprovalRequest {
        candidate_id: "cand-7".to_string(),
        job_posting_id: "job-3".to_string(),
        application_id: "app-11".to_string(),
        approver_emails: APPROVERS.iter().map(|email| email.to_string()).collect(),
    }
}

pub(super) fn decision(email: &str) -> ApprovalDecision {
    ApprovalDecision {
        approver_email: email.to_string(),
        comments: None,
    }
}

pub(super) fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).expect("serialize body")))
        .expect("request builds")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

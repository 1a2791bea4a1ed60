use hr_admin::config::ReportConfig;
use hr_admin::workflows::approvals::{
    ApprovalError, ApprovalId, ApprovalRepository, CandidateApproval,
};
use hr_admin::workflows::forms::{SubmissionId, SubmissionRecord, SubmissionRepository};
use hr_admin::workflows::RepositoryError;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) reports: ReportConfig,
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, RepositoryError> {
    mutex
        .lock()
        .map_err(|_| RepositoryError::Unavailable("in-memory store poisoned".to_string()))
}

#[derive(Default, Clone)]
pub(crate) struct InMemorySubmissionRepository {
    records: Arc<Mutex<HashMap<SubmissionId, SubmissionRecord>>>,
}

impl SubmissionRepository for InMemorySubmissionRepository {
    fn insert(&self, record: SubmissionRecord) -> Result<SubmissionRecord, RepositoryError> {
        let mut guard = lock(&self.records)?;
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &SubmissionId) -> Result<Option<SubmissionRecord>, RepositoryError> {
        let guard = lock(&self.records)?;
        Ok(guard.get(id).cloned())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryApprovalRepository {
    approvals: Arc<Mutex<HashMap<ApprovalId, CandidateApproval>>>,
}

impl ApprovalRepository for InMemoryApprovalRepository {
    fn insert(&self, approval: CandidateApproval) -> Result<CandidateApproval, RepositoryError> {
        let mut guard = lock(&self.approvals)?;
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
        let mut guard = lock(&self.approvals)?;
        let stored = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        let mut draft = stored.clone();
        Ok(change(&mut draft).map(|()| {
            *stored = draft.clone();
            draft
        }))
    }

    fn fetch(&self, id: &ApprovalId) -> Result<Option<CandidateApproval>, RepositoryError> {
        let guard = lock(&self.approvals)?;
        Ok(guard.get(id).cloned())
    }
}

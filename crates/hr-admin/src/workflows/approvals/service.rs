use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::domain::{
    ApprovalDecision, ApprovalError, ApprovalId, ApprovalRequest, ApprovalStatus,
    CandidateApproval,
};
use super::repository::ApprovalRepository;
use crate::workflows::repository::RepositoryError;

pub struct ApprovalService<R> {
    repository: Arc<R>,
    sequence: AtomicU64,
}

#[derive(Debug, thiserror::Error)]
pub enum ApprovalServiceError {
    #[error(transparent)]
    Approval(#[from] ApprovalError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

#[derive(Debug, Clone, Copy)]
enum Verdict {
    Approve,
    Reject,
}

impl<R> ApprovalService<R>
where
    R: ApprovalRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            sequence: AtomicU64::new(1),
        }
    }

    fn next_approval_id(&self) -> ApprovalId {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed);
        ApprovalId(format!("apr-{id:06}"))
    }

    /// Start a chain; the first level's approver is up next.
    pub fn open(
        &self,
        request: ApprovalRequest,
    ) -> Result<CandidateApproval, ApprovalServiceError> {
        let approval = CandidateApproval::open(self.next_approval_id(), request, Utc::now())?;
        let stored = self.repository.insert(approval)?;

        info!(
            approval = %stored.id.0,
            candidate = %stored.candidate_id,
            "candidate approval opened"
        );
        Ok(stored)
    }

    pub fn approve(
        &self,
        id: &ApprovalId,
        decision: ApprovalDecision,
    ) -> Result<CandidateApproval, ApprovalServiceError> {
        self.decide(id, decision, Verdict::Approve)
    }

    pub fn reject(
        &self,
        id: &ApprovalId,
        decision: ApprovalDecision,
    ) -> Result<CandidateApproval, ApprovalServiceError> {
        self.decide(id, decision, Verdict::Reject)
    }

    pub fn get(&self, id: &ApprovalId) -> Result<CandidateApproval, ApprovalServiceError> {
        let approval = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(approval)
    }

    /// The decision is checked and stored under the repository's write guard, so two callers
    /// racing on the same level cannot both succeed.
    fn decide(
        &self,
        id: &ApprovalId,
        decision: ApprovalDecision,
        verdict: Verdict,
    ) -> Result<CandidateApproval, ApprovalServiceError> {
        let now = Utc::now();
        let mut level = None;
        let approval = self.repository.modify(id, |approval| {
            level = approval.current_level().map(|current| current.level);
            match verdict {
                Verdict::Approve => approval.approve(decision, now),
                Verdict::Reject => approval.reject(decision, now),
            }
            .map(|_| ())
        })??;
        let status = approval.status;

        info!(
            approval = %approval.id.0,
            level = level.unwrap_or_default(),
            verdict = ?verdict,
            status = %status,
            candidate_status = status.candidate_status(),
            "approval decision recorded"
        );
        if status == ApprovalStatus::Approved {
            info!(candidate = %approval.candidate_id, "all approval levels signed off");
        }

        Ok(approval)
    }
}

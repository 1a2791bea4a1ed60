use super::domain::{ApprovalError, ApprovalId, CandidateApproval};
use crate::workflows::repository::RepositoryError;

pub trait ApprovalRepository: Send + Sync {
    fn insert(&self, approval: CandidateApproval) -> Result<CandidateApproval, RepositoryError>;

    /// Run `change` against the stored chain with no other writer interleaving. The stored copy
    /// is replaced only when `change` succeeds; a refused decision leaves it untouched and comes
    /// back as the inner error.
    fn modify<F>(
        &self,
        id: &ApprovalId,
        change: F,
    ) -> Result<Result<CandidateApproval, ApprovalError>, RepositoryError>
    where
        F: FnOnce(&mut CandidateApproval) -> Result<(), ApprovalError>;

    fn fetch(&self, id: &ApprovalId) -> Result<Option<CandidateApproval>, RepositoryError>;
}

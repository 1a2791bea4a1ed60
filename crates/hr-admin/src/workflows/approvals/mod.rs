//! Five-level hiring approval chain for shortlisted candidates.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    ApprovalDecision, ApprovalError, ApprovalId, ApprovalLevel, ApprovalLevelView,
    ApprovalProgressView, ApprovalRequest, ApprovalRole, ApprovalStatus, CandidateApproval,
    LevelStatus,
};
pub use repository::ApprovalRepository;
pub use router::approval_router;
pub use service::{ApprovalService, ApprovalServiceError};

//! Creation forms for candidates, applications, and job postings, plus the service and HTTP
//! routes that drive them server-side.

mod catalogue;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use catalogue::{FormKind, UnknownFormKind};
pub use repository::{
    RepositoryError, SubmissionId, SubmissionRecord, SubmissionRepository, SubmissionView,
};
pub use router::form_router;
pub use service::{FormServiceError, FormSubmissionService, MissingField, StepCheck};

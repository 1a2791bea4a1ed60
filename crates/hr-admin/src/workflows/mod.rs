pub mod approvals;
pub mod forms;
pub mod repository;
pub mod wizard;

pub use repository::RepositoryError;
pub use wizard::{
    BlockReason, FieldRequirement, FieldRule, FormValues, StepWizard, SubmitOutcome, WizardError,
    WizardStep,
};

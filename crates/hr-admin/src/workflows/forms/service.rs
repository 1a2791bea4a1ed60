use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::info;

use super::catalogue::FormKind;
use super::repository::{RepositoryError, SubmissionId, SubmissionRecord, SubmissionRepository};
use crate::workflows::wizard::{
    FieldRequirement, FormValues, StepWizard, SubmitOutcome, WizardError, WizardStep,
};

/// Runs submitted form values through the same step gates the UI uses, then persists them.
pub struct FormSubmissionService<R> {
    repository: Arc<R>,
    sequence: AtomicU64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingField {
    pub field: String,
    pub reason: &'static str,
}

impl From<&FieldRequirement> for MissingField {
    fn from(requirement: &FieldRequirement) -> Self {
        Self {
            field: requirement.field.clone(),
            reason: requirement.rule.label(),
        }
    }
}

/// Validity of one step evaluated against caller-supplied values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepCheck {
    pub kind: FormKind,
    pub step: usize,
    pub step_label: String,
    pub step_count: usize,
    pub valid: bool,
    pub is_last_step: bool,
    pub missing: Vec<MissingField>,
}

#[derive(Debug, thiserror::Error)]
pub enum FormServiceError {
    #[error(transparent)]
    Wizard(#[from] WizardError),
    #[error("the {kind} form has {count} steps; step {step} does not exist")]
    UnknownStep {
        kind: FormKind,
        step: usize,
        count: usize,
    },
    #[error("step '{label}' is incomplete")]
    Incomplete {
        step: usize,
        label: String,
        missing: Vec<MissingField>,
    },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl<R> FormSubmissionService<R>
where
    R: SubmissionRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            sequence: AtomicU64::new(1),
        }
    }

    /// Drawn only once the wizard has cleared its last gate. A repository failure after the draw
    /// still consumes the number.
    fn next_submission_id(&self) -> SubmissionId {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed);
        SubmissionId(format!("sub-{id:06}"))
    }

    /// Evaluate step `step` (zero-based) of `kind` against the defaults merged with `values`.
    pub fn check_step(
        &self,
        kind: FormKind,
        step: usize,
        values: FormValues,
    ) -> Result<StepCheck, FormServiceError> {
        let mut merged = kind.defaults();
        merged.merge(values);

        let steps = kind.steps();
        let count = steps.len();
        let current: &WizardStep = steps
            .get(step)
            .ok_or(FormServiceError::UnknownStep { kind, step, count })?;

        Ok(StepCheck {
            kind,
            step,
            step_label: current.label().to_string(),
            step_count: count,
            valid: current.is_satisfied(&merged),
            is_last_step: step + 1 == count,
            missing: current
                .missing_fields(&merged)
                .into_iter()
                .map(MissingField::from)
                .collect(),
        })
    }

    /// Walk a fresh wizard through every step and persist the result. The first step that
    /// refuses to advance is reported back with its missing fields.
    pub fn submit(
        &self,
        kind: FormKind,
        values: FormValues,
    ) -> Result<SubmissionRecord, FormServiceError> {
        let mut wizard = kind.wizard()?;
        wizard.load(values);

        while !wizard.is_last_step() {
            if !wizard.next() {
                return Err(incomplete(&wizard));
            }
        }

        let outcome = wizard.submit(|values| {
            self.repository.insert(SubmissionRecord {
                id: self.next_submission_id(),
                kind,
                values: values.clone(),
                submitted_at: Utc::now(),
            })
        })?;

        match outcome {
            SubmitOutcome::Submitted(record) => {
                info!(
                    submission = %record.id.0,
                    form = kind.slug(),
                    fields = record.values.len(),
                    "form submission stored"
                );
                Ok(record)
            }
            SubmitOutcome::Blocked(_) => Err(incomplete(&wizard)),
        }
    }

    pub fn get(&self, id: &SubmissionId) -> Result<SubmissionRecord, FormServiceError> {
        let record = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }
}

fn incomplete(wizard: &StepWizard) -> FormServiceError {
    FormServiceError::Incomplete {
        step: wizard.current_step(),
        label: wizard.step().label().to_string(),
        missing: wizard
            .missing_fields()
            .into_iter()
            .map(MissingField::from)
            .collect(),
    }
}

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::workflows::wizard::{FieldRule, FormValues, StepWizard, WizardError, WizardStep};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormKind {
    Candidate,
    Application,
    JobPosting,
}

impl FormKind {
    pub const fn ordered() -> [Self; 3] {
        [Self::Candidate, Self::Application, Self::JobPosting]
    }

    pub const fn slug(self) -> &'static str {
        match self {
            Self::Candidate => "candidate",
            Self::Application => "application",
            Self::JobPosting => "job-posting",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Candidate => "Candidate",
            Self::Application => "Application",
            Self::JobPosting => "Job Posting",
        }
    }

    pub fn steps(self) -> Vec<WizardStep> {
        match self {
            Self::Candidate => vec![
                WizardStep::new("Personal Information").require_text([
                    "firstName",
                    "lastName",
                    "email",
                    "phone",
                    "dateOfBirth",
                    "gender",
                    "nationality",
                ]),
                WizardStep::new("Professional Information")
                    .require_text(["currentPosition", "currentCompany"])
                    .require("yearsOfExperience", FieldRule::NonNegativeNumber),
                WizardStep::new("Education & Skills"),
                WizardStep::new("Work Experience"),
                WizardStep::new("Application Details").require_text([
                    "source",
                    "availability",
                    "preferredWorkType",
                ]),
            ],
            Self::Application => vec![
                WizardStep::new("Basic Information").require_text(["jobPosting", "candidate"]),
                WizardStep::new("Job & Candidate"),
                WizardStep::new("Application Details").require_text(["availability", "status"]),
                WizardStep::new("Documents"),
                WizardStep::new("Review & Submit"),
            ],
            Self::JobPosting => vec![
                WizardStep::new("Basic Information")
                    .require_text(["title", "department", "location", "position"])
                    .require("numberOfPositions", FieldRule::PositiveNumber),
                WizardStep::new("Job Details").require_text([
                    "employmentType",
                    "experienceLevel",
                    "educationLevel",
                ]),
                WizardStep::new("Compensation & Benefits")
                    .require("minSalary", FieldRule::PositiveNumber)
                    .require("maxSalary", FieldRule::PositiveNumber),
                WizardStep::new("Application Details").require_text(["applicationDeadline"]),
            ],
        }
    }

    /// Initial values of a blank create form.
    pub fn defaults(self) -> FormValues {
        match self {
            Self::Candidate => [
                ("yearsOfExperience", json!(0)),
                ("noticePeriod", json!(30)),
                ("education", json!([])),
                ("workExperience", json!([])),
                ("skills", json!([])),
                ("availability", json!("negotiable")),
                ("preferredWorkType", json!("on_site")),
            ]
            .into_iter()
            .collect(),
            Self::Application => [
                ("availability", json!("negotiable")),
                ("status", json!("applied")),
            ]
            .into_iter()
            .collect(),
            Self::JobPosting => [
                ("numberOfPositions", json!(1)),
                ("currency", json!("PKR")),
                ("isRemote", json!(false)),
            ]
            .into_iter()
            .collect(),
        }
    }

    /// A fresh wizard for this form, seeded with [`FormKind::defaults`].
    pub fn wizard(self) -> Result<StepWizard, WizardError> {
        Ok(StepWizard::new(self.steps())?.with_values(self.defaults()))
    }
}

impl fmt::Display for FormKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown form '{0}'; expected candidate, application, or job-posting")]
pub struct UnknownFormKind(pub String);

impl FromStr for FormKind {
    type Err = UnknownFormKind;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized: String = raw
            .chars()
            .filter(|ch| ch.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();

        Self::ordered()
            .into_iter()
            .find(|kind| kind.slug().replace('-', "") == normalized)
            .ok_or_else(|| UnknownFormKind(raw.to_string()))
    }
}

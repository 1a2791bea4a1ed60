use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApprovalId(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalRole {
    AssistantManagerHr,
    ManagerHr,
    HodHr,
    VicePresident,
    Ceo,
}

impl ApprovalRole {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::AssistantManagerHr,
            Self::ManagerHr,
            Self::HodHr,
            Self::VicePresident,
            Self::Ceo,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::AssistantManagerHr => "Assistant Manager HR",
            Self::ManagerHr => "Manager HR",
            Self::HodHr => "HOD HR",
            Self::VicePresident => "Vice President",
            Self::Ceo => "CEO",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelStatus {
    Pending,
    Approved,
    Rejected,
}

impl LevelStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    Pending,
    InProgress,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In Progress",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }

    /// Status mirrored onto the candidate record.
    pub const fn candidate_status(self) -> &'static str {
        match self {
            Self::Pending => "approval_pending",
            Self::InProgress => "approval_in_progress",
            Self::Approved => "hired",
            Self::Rejected => "rejected",
        }
    }

    pub const fn is_final(self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalLevel {
    pub level: u8,
    pub role: ApprovalRole,
    pub approver_email: String,
    pub status: LevelStatus,
    pub decided_at: Option<DateTime<Utc>>,
    pub comments: Option<String>,
}

/// Payload that opens a new chain; one approver email per level, in level order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalRequest {
    pub candidate_id: String,
    pub job_posting_id: String,
    pub application_id: String,
    pub approver_emails: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalDecision {
    pub approver_email: String,
    #[serde(default)]
    pub comments: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApprovalError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("exactly 5 approver emails are required, got {found}")]
    ApproverCount { found: usize },
    #[error("approver email for level {level} is blank")]
    BlankApproverEmail { level: u8 },
    #[error("approval is already {status}")]
    Finalized { status: ApprovalStatus },
    #[error("{email} is not the approver for level {level}")]
    NotCurrentApprover { email: String, level: u8 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateApproval {
    pub id: ApprovalId,
    pub candidate_id: String,
    pub job_posting_id: String,
    pub application_id: String,
    pub levels: Vec<ApprovalLevel>,
    pub status: ApprovalStatus,
    pub created_at: DateTime<Utc>,
}

impl CandidateApproval {
    pub fn open(
        id: ApprovalId,
        request: ApprovalRequest,
        now: DateTime<Utc>,
    ) -> Result<Self, ApprovalError> {
        let candidate_id = required(request.candidate_id, "candidate_id")?;
        let job_posting_id = required(request.job_posting_id, "job_posting_id")?;
        let application_id = required(request.application_id, "application_id")?;

        let roles = ApprovalRole::ordered();
        if request.approver_emails.len() != roles.len() {
            return Err(ApprovalError::ApproverCount {
                found: request.approver_emails.len(),
            });
        }

        let levels = roles
            .into_iter()
            .zip(request.approver_emails)
            .zip(1u8..)
            .map(|((role, email), level)| {
                let approver_email = email.trim().to_string();
                if approver_email.is_empty() {
                    return Err(ApprovalError::BlankApproverEmail { level });
                }
                Ok(ApprovalLevel {
                    level,
                    role,
                    approver_email,
                    status: LevelStatus::Pending,
                    decided_at: None,
                    comments: None,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            id,
            candidate_id,
            job_posting_id,
            application_id,
            levels,
            status: ApprovalStatus::Pending,
            created_at: now,
        })
    }

    /// The first level still waiting for a decision.
    pub fn current_level(&self) -> Option<&ApprovalLevel> {
        if self.status.is_final() {
            return None;
        }
        self.levels
            .iter()
            .find(|level| level.status == LevelStatus::Pending)
    }

    pub fn approved_count(&self) -> usize {
        self.levels
            .iter()
            .filter(|level| level.status == LevelStatus::Approved)
            .count()
    }

    pub fn approve(
        &mut self,
        decision: ApprovalDecision,
        now: DateTime<Utc>,
    ) -> Result<ApprovalStatus, ApprovalError> {
        let index = self.acting_level(&decision.approver_email)?;
        let level = &mut self.levels[index];
        level.status = LevelStatus::Approved;
        level.decided_at = Some(now);
        level.comments = decision.comments;

        self.status = if self.approved_count() == self.levels.len() {
            ApprovalStatus::Approved
        } else {
            ApprovalStatus::InProgress
        };
        Ok(self.status)
    }

    pub fn reject(
        &mut self,
        decision: ApprovalDecision,
        now: DateTime<Utc>,
    ) -> Result<ApprovalStatus, ApprovalError> {
        let index = self.acting_level(&decision.approver_email)?;
        let level = &mut self.levels[index];
        level.status = LevelStatus::Rejected;
        level.decided_at = Some(now);
        level.comments = decision.comments;

        self.status = ApprovalStatus::Rejected;
        Ok(self.status)
    }

    fn acting_level(&self, approver_email: &str) -> Result<usize, ApprovalError> {
        if self.status.is_final() {
            return Err(ApprovalError::Finalized {
                status: self.status,
            });
        }

        let index = self
            .levels
            .iter()
            .position(|level| level.status == LevelStatus::Pending)
            .ok_or(ApprovalError::Finalized {
                status: self.status,
            })?;

        let level = &self.levels[index];
        if !level
            .approver_email
            .eq_ignore_ascii_case(approver_email.trim())
        {
            return Err(ApprovalError::NotCurrentApprover {
                email: approver_email.trim().to_string(),
                level: level.level,
            });
        }
        Ok(index)
    }

    pub fn progress(&self) -> ApprovalProgressView {
        let current = self.current_level();
        ApprovalProgressView {
            approval_id: self.id.clone(),
            candidate_id: self.candidate_id.clone(),
            status: self.status,
            status_label: self.status.label(),
            candidate_status: self.status.candidate_status(),
            current_level: current.map(|level| level.level),
            current_title: current.map(|level| level.role.label()),
            approved_count: self.approved_count(),
            total_levels: self.levels.len(),
            timeline: self.levels.iter().map(ApprovalLevel::to_view).collect(),
        }
    }
}

impl ApprovalLevel {
    fn to_view(&self) -> ApprovalLevelView {
        ApprovalLevelView {
            level: self.level,
            role: self.role,
            role_label: self.role.label(),
            approver_email: self.approver_email.clone(),
            status: self.status,
            status_label: self.status.label(),
            decided_at: self.decided_at,
            comments: self.comments.clone(),
        }
    }
}

fn required(value: String, field: &'static str) -> Result<String, ApprovalError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApprovalError::MissingField(field));
    }
    Ok(trimmed.to_string())
}

#[derive(Debug, Clone, Serialize)]
pub struct ApprovalLevelView {
    pub level: u8,
    pub role: ApprovalRole,
    pub role_label: &'static str,
    pub approver_email: String,
    pub status: LevelStatus,
    pub status_label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decided_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApprovalProgressView {
    pub approval_id: ApprovalId,
    pub candidate_id: String,
    pub status: ApprovalStatus,
    pub status_label: &'static str,
    pub candidate_status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_level: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_title: Option<&'static str>,
    pub approved_count: usize,
    pub total_levels: usize,
    pub timeline: Vec<ApprovalLevelView>,
}

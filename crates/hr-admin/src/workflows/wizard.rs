//! Multi-step form controller.
//!
//! A [`StepWizard`] owns the accumulated field values of one form and a fixed list of steps.
//! Forward navigation is gated by the current step's requirements; blocked transitions are
//! reported as `false`/[`SubmitOutcome::Blocked`] rather than errors.

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::records::lenient::decimal_from_value;

/// Loosely typed field values keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormValues(BTreeMap<String, Value>);

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(field.into(), value.into());
    }

    /// Overwrite with every entry of `other`; fields absent from `other` are kept.
    pub fn merge(&mut self, other: FormValues) {
        self.0.extend(other.0);
    }

    /// Trimmed, non-empty string value.
    pub fn text(&self, field: &str) -> Option<&str> {
        self.get(field)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }

    /// Numeric value; numeric strings are accepted because form inputs send either.
    pub fn number(&self, field: &str) -> Option<Decimal> {
        self.get(field).and_then(decimal_from_value)
    }

    pub fn is_blank(&self, field: &str) -> bool {
        match self.get(field) {
            None | Some(Value::Null) => true,
            Some(Value::String(text)) => text.trim().is_empty(),
            Some(Value::Array(items)) => items.is_empty(),
            Some(_) => false,
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(field, value)| (field.as_str(), value))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for FormValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(field, value)| (field.into(), value.into()))
                .collect(),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldRule {
    NonBlank,
    NonNegativeNumber,
    PositiveNumber,
}

impl FieldRule {
    pub fn is_met(self, values: &FormValues, field: &str) -> bool {
        match self {
            Self::NonBlank => !values.is_blank(field),
            Self::NonNegativeNumber => values
                .number(field)
                .is_some_and(|number| !number.is_sign_negative() || number.is_zero()),
            Self::PositiveNumber => values
                .number(field)
                .is_some_and(|number| number > Decimal::ZERO),
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::NonBlank => "required",
            Self::NonNegativeNumber => "must be a number of at least 0",
            Self::PositiveNumber => "must be a number greater than 0",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldRequirement {
    pub field: String,
    pub rule: FieldRule,
}

type StepValidator = Box<dyn Fn(&FormValues) -> bool + Send + Sync>;

/// One page of a wizard: a label, declared field requirements, and an optional extra check.
pub struct WizardStep {
    label: String,
    requirements: Vec<FieldRequirement>,
    validator: Option<StepValidator>,
}

impl WizardStep {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            requirements: Vec::new(),
            validator: None,
        }
    }

    pub fn require(mut self, field: impl Into<String>, rule: FieldRule) -> Self {
        self.requirements.push(FieldRequirement {
            field: field.into(),
            rule,
        });
        self
    }

    pub fn require_text<I, S>(self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        fields
            .into_iter()
            .fold(self, |step, field| step.require(field, FieldRule::NonBlank))
    }

    pub fn validate_with<F>(mut self, validator: F) -> Self
    where
        F: Fn(&FormValues) -> bool + Send + Sync + 'static,
    {
        self.validator = Some(Box::new(validator));
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn requirements(&self) -> &[FieldRequirement] {
        &self.requirements
    }

    pub fn is_satisfied(&self, values: &FormValues) -> bool {
        self.requirements
            .iter()
            .all(|requirement| requirement.rule.is_met(values, &requirement.field))
            && self.validator.as_ref().map_or(true, |check| check(values))
    }

    pub fn missing_fields<'a>(&'a self, values: &FormValues) -> Vec<&'a FieldRequirement> {
        self.requirements
            .iter()
            .filter(|requirement| !requirement.rule.is_met(values, &requirement.field))
            .collect()
    }
}

impl fmt::Debug for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WizardStep")
            .field("label", &self.label)
            .field("requirements", &self.requirements)
            .field("custom_validator", &self.validator.is_some())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    #[error("a wizard needs at least one step")]
    NoSteps,
}

/// Why a submission did not reach the persistence call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockReason {
    NotOnLastStep,
    StepIncomplete,
    AlreadySubmitted,
}

impl BlockReason {
    pub const fn label(self) -> &'static str {
        match self {
            Self::NotOnLastStep => "not on the last step",
            Self::StepIncomplete => "current step is incomplete",
            Self::AlreadySubmitted => "form was already submitted",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome<T> {
    Submitted(T),
    Blocked(BlockReason),
}

impl<T> SubmitOutcome<T> {
    pub fn is_submitted(&self) -> bool {
        matches!(self, Self::Submitted(_))
    }
}

#[derive(Debug)]
pub struct StepWizard {
    steps: Vec<WizardStep>,
    current: usize,
    values: FormValues,
    completed: bool,
}

impl StepWizard {
    pub fn new(steps: Vec<WizardStep>) -> Result<Self, WizardError> {
        if steps.is_empty() {
            return Err(WizardError::NoSteps);
        }

        Ok(Self {
            steps,
            current: 0,
            values: FormValues::new(),
            completed: false,
        })
    }

    pub fn with_values(mut self, values: FormValues) -> Self {
        self.values = values;
        self
    }

    pub fn current_step(&self) -> usize {
        self.current
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn step(&self) -> &WizardStep {
        &self.steps[self.current]
    }

    pub fn steps(&self) -> &[WizardStep] {
        &self.steps
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn is_last_step(&self) -> bool {
        self.current + 1 == self.steps.len()
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn set_field(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(field, value);
    }

    /// Merge a fetched entity into the form (edit mode). May happen at any step.
    pub fn load(&mut self, values: FormValues) {
        self.values.merge(values);
    }

    pub fn can_advance(&self) -> bool {
        self.step().is_satisfied(&self.values)
    }

    pub fn missing_fields(&self) -> Vec<&FieldRequirement> {
        self.step().missing_fields(&self.values)
    }

    /// Advance one step. Returns `false` without moving on the last step or when the current
    /// step is incomplete.
    pub fn next(&mut self) -> bool {
        if self.is_last_step() || !self.can_advance() {
            return false;
        }
        self.current += 1;
        true
    }

    pub fn back(&mut self) -> bool {
        if self.current == 0 {
            return false;
        }
        self.current -= 1;
        true
    }

    fn submit_gate(&self) -> Option<BlockReason> {
        if self.completed {
            Some(BlockReason::AlreadySubmitted)
        } else if !self.is_last_step() {
            Some(BlockReason::NotOnLastStep)
        } else if !self.can_advance() {
            Some(BlockReason::StepIncomplete)
        } else {
            None
        }
    }

    /// Hand the accumulated values to `persist`. Errors come back unchanged and leave the wizard
    /// where it was so the caller can retry.
    pub fn submit<T, E, F>(&mut self, persist: F) -> Result<SubmitOutcome<T>, E>
    where
        F: FnOnce(&FormValues) -> Result<T, E>,
        E: fmt::Display,
    {
        if let Some(reason) = self.submit_gate() {
            debug!(step = self.current, reason = reason.label(), "wizard submission blocked");
            return Ok(SubmitOutcome::Blocked(reason));
        }

        match persist(&self.values) {
            Ok(saved) => {
                self.completed = true;
                Ok(SubmitOutcome::Submitted(saved))
            }
            Err(err) => {
                warn!(error = %err, "wizard persistence failed");
                Err(err)
            }
        }
    }

    pub async fn submit_async<T, E, F, Fut>(&mut self, persist: F) -> Result<SubmitOutcome<T>, E>
    where
        F: FnOnce(FormValues) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: fmt::Display,
    {
        if let Some(reason) = self.submit_gate() {
            debug!(step = self.current, reason = reason.label(), "wizard submission blocked");
            return Ok(SubmitOutcome::Blocked(reason));
        }

        match persist(self.values.clone()).await {
            Ok(saved) => {
                self.completed = true;
                Ok(SubmitOutcome::Submitted(saved))
            }
            Err(err) => {
                warn!(error = %err, "wizard persistence failed");
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn three_steps() -> Vec<WizardStep> {
        vec![
            WizardStep::new("Account"),
            WizardStep::new("Profile"),
            WizardStep::new("Contact").require("email", FieldRule::NonBlank),
        ]
    }

    fn gated_first_step() -> StepWizard {
        StepWizard::new(vec![
            WizardStep::new("Name").require("name", FieldRule::NonBlank),
            WizardStep::new("Done"),
        ])
        .expect("steps present")
    }

    #[test]
    fn refuses_to_build_without_steps() {
        assert_eq!(StepWizard::new(Vec::new()).unwrap_err(), WizardError::NoSteps);
    }

    #[test]
    fn back_at_first_step_is_a_no_op() {
        let mut wizard = StepWizard::new(three_steps()).expect("steps present");
        assert!(!wizard.back());
        assert_eq!(wizard.current_step(), 0);
    }

    #[test]
    fn next_at_last_step_is_a_no_op() {
        let mut wizard = StepWizard::new(three_steps()).expect("steps present");
        wizard.set_field("email", "a@b.com");
        assert!(wizard.next());
        assert!(wizard.next());
        assert!(wizard.is_last_step());

        assert!(!wizard.next());
        assert_eq!(wizard.current_step(), 2);
    }

    #[test]
    fn invalid_first_step_never_advances() {
        let mut wizard = gated_first_step();
        for _ in 0..5 {
            assert!(!wizard.next());
        }
        assert_eq!(wizard.current_step(), 0);
    }

    #[test]
    fn validity_tracks_latest_values() {
        let mut wizard = gated_first_step();
        assert!(!wizard.can_advance());

        wizard.set_field("name", "Ayesha");
        assert!(wizard.can_advance());

        wizard.set_field("name", "   ");
        assert!(!wizard.can_advance());
    }

    #[test]
    fn progression_halts_at_first_invalid_gate() {
        let mut wizard = StepWizard::new(three_steps()).expect("steps present");

        wizard.next();
        wizard.next();
        assert_eq!(wizard.current_step(), 2);
        assert!(!wizard.can_advance());

        let mut wizard = StepWizard::new(vec![
            WizardStep::new("Account"),
            WizardStep::new("Contact").require("email", FieldRule::NonBlank),
            WizardStep::new("Review"),
        ])
        .expect("steps present");

        wizard.next();
        wizard.next();
        assert_eq!(wizard.current_step(), 1);

        wizard.set_field("email", "a@b.com");
        assert!(wizard.next());
        assert_eq!(wizard.current_step(), 2);
    }

    #[test]
    fn back_is_never_gated() {
        let mut wizard = StepWizard::new(three_steps()).expect("steps present");
        wizard.next();
        wizard.next();
        assert!(!wizard.can_advance());
        assert!(wizard.back());
        assert_eq!(wizard.current_step(), 1);
    }

    #[test]
    fn numeric_rules_accept_numbers_and_numeric_strings() {
        let mut values = FormValues::new();
        values.insert("years", 0);
        values.insert("positions", "3");
        values.insert("salary", "-1");
        values.insert("notes", "n/a");

        assert!(FieldRule::NonNegativeNumber.is_met(&values, "years"));
        assert!(!FieldRule::PositiveNumber.is_met(&values, "years"));
        assert!(FieldRule::PositiveNumber.is_met(&values, "positions"));
        assert!(!FieldRule::NonNegativeNumber.is_met(&values, "salary"));
        assert!(!FieldRule::NonNegativeNumber.is_met(&values, "notes"));
        assert!(!FieldRule::NonNegativeNumber.is_met(&values, "absent"));
    }

    #[test]
    fn blank_detection_covers_each_value_shape() {
        let values: FormValues = [
            ("empty", json!("  ")),
            ("null", Value::Null),
            ("list", json!([])),
            ("zero", json!(0)),
            ("flag", json!(false)),
        ]
        .into_iter()
        .collect();

        assert!(values.is_blank("empty"));
        assert!(values.is_blank("null"));
        assert!(values.is_blank("list"));
        assert!(values.is_blank("missing"));
        assert!(!values.is_blank("zero"));
        assert!(!values.is_blank("flag"));
    }

    #[test]
    fn missing_fields_lists_unmet_requirements_of_current_step() {
        let mut wizard = StepWizard::new(vec![WizardStep::new("Basics")
            .require_text(["title", "location"])
            .require("openings", FieldRule::PositiveNumber)])
        .expect("steps present");
        wizard.set_field("title", "Driver");

        let missing: Vec<&str> = wizard
            .missing_fields()
            .iter()
            .map(|requirement| requirement.field.as_str())
            .collect();
        assert_eq!(missing, vec!["location", "openings"]);
    }

    #[test]
    fn custom_validator_participates_in_gate() {
        let mut wizard = StepWizard::new(vec![
            WizardStep::new("Salary").validate_with(|values| {
                match (values.number("min"), values.number("max")) {
                    (Some(min), Some(max)) => min <= max,
                    _ => false,
                }
            }),
            WizardStep::new("Done"),
        ])
        .expect("steps present");

        wizard.set_field("min", 500);
        wizard.set_field("max", 100);
        assert!(!wizard.can_advance());
        assert!(wizard.missing_fields().is_empty());

        wizard.set_field("max", 900);
        assert!(wizard.next());
    }

    #[test]
    fn load_merges_fetched_values_after_construction() {
        let mut wizard = gated_first_step().with_values([("keep", "me")].into_iter().collect());
        wizard.load([("name", "Bilal")].into_iter().collect());

        assert_eq!(wizard.values().text("keep"), Some("me"));
        assert_eq!(wizard.values().text("name"), Some("Bilal"));
        assert!(wizard.can_advance());
    }

    #[test]
    fn submit_is_blocked_before_last_step_or_when_incomplete() {
        let mut wizard = StepWizard::new(three_steps()).expect("steps present");
        let mut calls = 0;

        let outcome = wizard.submit(|_| {
            calls += 1;
            Ok::<_, String>(())
        });
        assert_eq!(outcome, Ok(SubmitOutcome::Blocked(BlockReason::NotOnLastStep)));

        wizard.next();
        wizard.next();
        let outcome = wizard.submit(|_| {
            calls += 1;
            Ok::<_, String>(())
        });
        assert_eq!(outcome, Ok(SubmitOutcome::Blocked(BlockReason::StepIncomplete)));
        assert_eq!(calls, 0);
        assert!(!wizard.is_completed());
    }

    #[test]
    fn persist_failure_preserves_state_and_message() {
        let mut wizard = StepWizard::new(three_steps()).expect("steps present");
        wizard.set_field("email", "a@b.com");
        wizard.next();
        wizard.next();

        let outcome: Result<SubmitOutcome<()>, String> =
            wizard.submit(|_| Err("email already registered".to_string()));
        assert_eq!(outcome, Err("email already registered".to_string()));
        assert_eq!(wizard.current_step(), 2);
        assert_eq!(wizard.values().text("email"), Some("a@b.com"));
        assert!(!wizard.is_completed());

        let retried = wizard.submit(|values| Ok::<_, String>(values.len()));
        assert_eq!(retried, Ok(SubmitOutcome::Submitted(1)));
        assert!(wizard.is_completed());

        let again = wizard.submit(|_| Ok::<_, String>(0));
        assert_eq!(again, Ok(SubmitOutcome::Blocked(BlockReason::AlreadySubmitted)));
    }

    #[tokio::test]
    async fn async_submission_hands_over_a_snapshot() {
        let mut wizard = StepWizard::new(vec![WizardStep::new("Only")]).expect("steps present");
        wizard.set_field("title", "Mechanic");

        let outcome = wizard
            .submit_async(|values| async move {
                Ok::<_, String>(values.text("title").map(str::to_string))
            })
            .await;

        assert_eq!(outcome, Ok(SubmitOutcome::Submitted(Some("Mechanic".to_string()))));
        assert!(wizard.is_completed());
    }
}

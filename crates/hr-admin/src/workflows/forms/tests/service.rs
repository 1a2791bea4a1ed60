use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::json;

use super::common::*;
use crate::workflows::forms::{
    FormKind, FormServiceError, FormSubmissionService, RepositoryError, SubmissionId,
};

#[test]
fn complete_candidate_is_stored_with_defaults() {
    let (service, repository) = build_service();

    let record = service
        .submit(FormKind::Candidate, candidate_values())
        .expect("submission succeeds");

    assert_eq!(record.id, SubmissionId("sub-000001".to_string()));
    assert_eq!(record.kind, FormKind::Candidate);
    assert_eq!(record.values.text("availability"), Some("negotiable"));
    assert_eq!(record.values.text("preferredWorkType"), Some("on_site"));
    assert_eq!(repository.len(), 1);

    let fetched = service.get(&record.id).expect("record stored");
    assert_eq!(fetched, record);
}

#[test]
fn ids_increase_per_submission() {
    let (service, _) = build_service();
    let first = service
        .submit(FormKind::JobPosting, job_posting_values())
        .expect("first stored");
    let second = service
        .submit(FormKind::JobPosting, job_posting_values())
        .expect("second stored");

    assert_eq!(first.id.0, "sub-000001");
    assert_eq!(second.id.0, "sub-000002");
}

#[test]
fn first_incomplete_step_is_reported() {
    let (service, repository) = build_service();
    let mut values = candidate_values();
    values.insert("currentCompany", "");

    let err = service
        .submit(FormKind::Candidate, values)
        .expect_err("professional step is incomplete");

    match err {
        FormServiceError::Incomplete {
            step,
            label,
            missing,
        } => {
            assert_eq!(step, 1);
            assert_eq!(label, "Professional Information");
            let fields: Vec<&str> = missing.iter().map(|field| field.field.as_str()).collect();
            assert_eq!(fields, vec!["currentCompany"]);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(repository.len(), 0);
}

#[test]
fn last_step_gate_applies_before_persisting() {
    let (service, repository) = build_service();
    let mut values = job_posting_values();
    values.insert("applicationDeadline", json!(null));

    let err = service
        .submit(FormKind::JobPosting, values)
        .expect_err("deadline missing");
    assert!(matches!(err, FormServiceError::Incomplete { step: 3, .. }));
    assert_eq!(repository.len(), 0);
}

#[test]
fn refused_submissions_do_not_consume_ids() {
    let (service, _) = build_service();
    let mut blocked = job_posting_values();
    blocked.insert("applicationDeadline", json!(null));
    let mut incomplete = candidate_values();
    incomplete.insert("email", "");

    service
        .submit(FormKind::JobPosting, blocked)
        .expect_err("last step blocks");
    service
        .submit(FormKind::Candidate, incomplete)
        .expect_err("first step blocks");

    let stored = service
        .submit(FormKind::JobPosting, job_posting_values())
        .expect("stored");
    assert_eq!(stored.id.0, "sub-000001");
}

#[test]
fn repository_failure_is_surfaced() {
    let service = FormSubmissionService::new(Arc::new(UnavailableRepository));
    let err = service
        .submit(FormKind::JobPosting, job_posting_values())
        .expect_err("repository offline");

    assert!(matches!(
        err,
        FormServiceError::Repository(RepositoryError::Unavailable(_))
    ));
}

#[test]
fn step_check_reports_missing_fields_without_navigation() {
    let (service, _) = build_service();

    let check = service
        .check_step(FormKind::JobPosting, 2, job_posting_values())
        .expect("step exists");
    assert!(check.valid);
    assert_eq!(check.step_label, "Compensation & Benefits");
    assert!(!check.is_last_step);

    let check = service
        .check_step(FormKind::JobPosting, 0, [("title", "Driver")].into_iter().collect())
        .expect("step exists");
    assert!(!check.valid);
    let fields: Vec<&str> = check.missing.iter().map(|field| field.field.as_str()).collect();
    assert_eq!(fields, vec!["department", "location", "position"]);
}

#[test]
fn step_check_rejects_out_of_range_steps() {
    let (service, _) = build_service();
    let err = service
        .check_step(FormKind::Application, 5, Default::default())
        .expect_err("application has five steps");
    assert!(matches!(
        err,
        FormServiceError::UnknownStep {
            step: 5,
            count: 5,
            ..
        }
    ));
}

#[test]
fn missing_submission_is_not_found() {
    let (service, _) = build_service();
    let err = service
        .get(&SubmissionId("sub-999999".to_string()))
        .expect_err("nothing stored");
    assert!(matches!(
        err,
        FormServiceError::Repository(RepositoryError::NotFound)
    ));
}

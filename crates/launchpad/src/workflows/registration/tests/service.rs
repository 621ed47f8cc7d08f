use std::sync::Arc;

use super::common::*;
use crate::profiles::{
    EntityKind, ProfileId, ProfileQuery, ProfileRepository, ProfileStatus, RepositoryError,
    ReviewEventKind, ReviewState,
};
use crate::testing::{
    ana, ben, incubator_values, record, startup_values, text, MemoryDrafts, UnavailableProfiles,
};
use crate::workflows::registration::{
    DraftStore, OptionToggle, RegistrationError, RegistrationService, WizardError,
};

#[test]
fn submitting_complete_wizard_creates_one_pending_record() {
    let (service, profiles, drafts) = build_service();
    fill(&service, &ana(), EntityKind::Startup, startup_values("Krishi Cold"));

    let record = service
        .submit(&ana(), EntityKind::Startup)
        .expect("complete draft submits");

    assert_eq!(record.status, ProfileStatus::Pending);
    assert_eq!(record.owner, ana());
    assert!(record.id.0.starts_with("stp-"));
    assert_eq!(profiles.len(), 1);
    assert_eq!(record.history.len(), 1);
    assert_eq!(record.history[0].kind, ReviewEventKind::Submitted);
    assert!(
        drafts
            .load(&ana(), EntityKind::Startup)
            .expect("load succeeds")
            .is_none(),
        "draft is discarded after submit"
    );
}

#[test]
fn draft_survives_between_calls() {
    let (service, _, _) = build_service();
    let mut values = startup_values("Krishi Cold");
    values.retain(|key, _| key == "startup_name");
    fill(&service, &ana(), EntityKind::Startup, values);

    let restored = service
        .draft(&ana(), EntityKind::Startup)
        .expect("draft loads");
    assert_eq!(restored.values.get("startup_name"), Some(&text("Krishi Cold")));

    let untouched = service
        .draft(&ben(), EntityKind::Startup)
        .expect("fresh draft");
    assert!(untouched.values.is_empty());
}

#[test]
fn next_and_back_are_persisted() {
    let (service, _, _) = build_service();
    fill(&service, &ana(), EntityKind::Startup, startup_values("Krishi Cold"));

    let draft = service.next(&ana(), EntityKind::Startup).expect("advances");
    assert_eq!(draft.current_step, 1);
    let draft = service.next(&ana(), EntityKind::Startup).expect("advances");
    assert_eq!(draft.current_step, 2);
    let draft = service.back(&ana(), EntityKind::Startup).expect("goes back");
    assert_eq!(draft.current_step, 1);

    let restored = service.draft(&ana(), EntityKind::Startup).expect("loads");
    assert_eq!(restored.current_step, 1);
}

#[test]
fn next_reports_step_issues() {
    let (service, _, _) = build_service();

    match service.next(&ana(), EntityKind::Incubator) {
        Err(RegistrationError::Wizard(WizardError::StepIncomplete { step, issues })) => {
            assert_eq!(step, "basics");
            assert!(issues.iter().any(|issue| issue.field == "incubator_name"));
        }
        other => panic!("expected incomplete step, got {other:?}"),
    }
}

#[test]
fn patch_toggles_and_clears_values() {
    let (service, _, _) = build_service();
    let mut patch = patch(startup_values("Krishi Cold"));
    patch.toggle.push(OptionToggle {
        field: "sectors".to_string(),
        option: "saas".to_string(),
    });
    patch.clear.push("website".to_string());

    let draft = service
        .update_draft(&ana(), EntityKind::Startup, patch)
        .expect("patch applies");

    assert_eq!(
        draft.values.get("sectors"),
        Some(&crate::testing::list(&["agritech", "logistics", "saas"]))
    );
    // Values are applied after clears, so the website from the values map survives.
    assert!(draft.values.contains_key("website"));

    let mut clear = super::common::patch(Default::default());
    clear.clear.push("website".to_string());
    let draft = service
        .update_draft(&ana(), EntityKind::Startup, clear)
        .expect("clear applies");
    assert!(!draft.values.contains_key("website"));
}

#[test]
fn submit_without_draft_is_rejected() {
    let (service, _, _) = build_service();
    assert!(matches!(
        service.submit(&ana(), EntityKind::Mentor),
        Err(RegistrationError::NoDraft(EntityKind::Mentor))
    ));
}

#[test]
fn submit_reports_first_incomplete_step() {
    let (service, profiles, _) = build_service();
    let mut values = startup_values("Krishi Cold");
    values.remove("stage");
    fill(&service, &ana(), EntityKind::Startup, values);

    match service.submit(&ana(), EntityKind::Startup) {
        Err(RegistrationError::Incomplete { first_step, issues }) => {
            assert_eq!(first_step, 2);
            assert_eq!(issues.len(), 1);
            assert_eq!(issues[0].field, "stage");
        }
        other => panic!("expected incomplete profile, got {other:?}"),
    }
    assert_eq!(profiles.len(), 0);
}

#[test]
fn editing_rejected_profile_resubmits_as_pending() {
    let (service, profiles, _) = build_service();
    let mut rejected = record(
        EntityKind::Startup,
        &ana(),
        startup_values("Krishi Cold"),
        ProfileStatus::Rejected,
        30,
    );
    rejected.review = ReviewState {
        reason: Some("Add a working website".to_string()),
        rating: None,
    };
    let rejected = profiles.seed(rejected);

    let draft = service.edit(&ana(), &rejected.id).expect("owner can edit");
    assert_eq!(draft.editing, Some(rejected.id.clone()));
    assert_eq!(draft.values.get("startup_name"), Some(&text("Krishi Cold")));

    let mut change = startup_values("Krishi Cold");
    change.insert("website".to_string(), text("https://krishicold.example.org"));
    fill(&service, &ana(), EntityKind::Startup, change);

    let stored = service
        .submit(&ana(), EntityKind::Startup)
        .expect("resubmission succeeds");

    assert_eq!(stored.id, rejected.id);
    assert_eq!(stored.status, ProfileStatus::Pending);
    assert_eq!(stored.review, ReviewState::default());
    assert_eq!(profiles.len(), 1);
    let last = stored.history.last().expect("history");
    assert_eq!(last.kind, ReviewEventKind::Resubmitted);
    assert_eq!(last.from, Some(ProfileStatus::Rejected));
}

#[test]
fn edit_checks_ownership_and_pending_lock() {
    let (service, profiles, _) = build_service();
    let pending = profiles.seed(record(
        EntityKind::Mentor,
        &ana(),
        Default::default(),
        ProfileStatus::Pending,
        5,
    ));
    let approved = profiles.seed(record(
        EntityKind::Mentor,
        &ana(),
        Default::default(),
        ProfileStatus::Approved,
        5,
    ));

    assert!(matches!(
        service.edit(&ben(), &approved.id),
        Err(RegistrationError::NotOwner(_))
    ));
    assert!(matches!(
        service.edit(&ana(), &pending.id),
        Err(RegistrationError::LockedForReview(_))
    ));
    assert!(matches!(
        service.edit(&ana(), &ProfileId("mnt-999999".to_string())),
        Err(RegistrationError::NotFound(_))
    ));
}

#[test]
fn second_submission_while_pending_conflicts() {
    let (service, profiles, _) = build_service();
    fill(&service, &ana(), EntityKind::Startup, startup_values("Krishi Cold"));
    service
        .submit(&ana(), EntityKind::Startup)
        .expect("first submission");

    fill(&service, &ana(), EntityKind::Startup, startup_values("Krishi Cold 2"));
    assert!(matches!(
        service.submit(&ana(), EntityKind::Startup),
        Err(RegistrationError::AlreadyUnderReview(_))
    ));
    assert_eq!(profiles.len(), 1);
}

#[test]
fn fresh_submission_updates_owners_existing_profile() {
    let (service, profiles, _) = build_service();
    let approved = profiles.seed(record(
        EntityKind::Startup,
        &ana(),
        startup_values("Krishi Cold"),
        ProfileStatus::Approved,
        60,
    ));

    fill(&service, &ana(), EntityKind::Startup, startup_values("Krishi Cold Chain"));
    let stored = service
        .submit(&ana(), EntityKind::Startup)
        .expect("upsert succeeds");

    assert_eq!(stored.id, approved.id);
    assert_eq!(stored.status, ProfileStatus::Pending);
    assert_eq!(stored.display_name(), "Krishi Cold Chain");
    let owned = profiles
        .select(&ProfileQuery::new().owner(ana()))
        .expect("select succeeds");
    assert_eq!(owned.len(), 1);
}

#[test]
fn referenced_incubator_must_be_listed() {
    let (service, profiles, _) = build_service();
    let listed = profiles.seed(record(
        EntityKind::Incubator,
        &ben(),
        incubator_values("Agri Labs"),
        ProfileStatus::Approved,
        120,
    ));
    let unlisted = profiles.seed(record(
        EntityKind::Incubator,
        &ben(),
        incubator_values("Shadow Labs"),
        ProfileStatus::Pending,
        120,
    ));

    let mut values = startup_values("Krishi Cold");
    values.insert("incubated".to_string(), text("yes"));
    values.insert("incubator_id".to_string(), text(&unlisted.id.0));
    fill(&service, &ana(), EntityKind::Startup, values.clone());
    assert!(matches!(
        service.submit(&ana(), EntityKind::Startup),
        Err(RegistrationError::UnknownIncubator(_))
    ));

    values.insert("incubator_id".to_string(), text(&listed.id.0));
    fill(&service, &ana(), EntityKind::Startup, values);
    let stored = service
        .submit(&ana(), EntityKind::Startup)
        .expect("listed incubator accepted");
    assert_eq!(stored.incubator_id(), Some(listed.id));
}

#[test]
fn repository_failures_propagate() {
    let drafts = Arc::new(MemoryDrafts::default());
    let service = RegistrationService::new(Arc::new(UnavailableProfiles), drafts);
    service
        .update_draft(&ana(), EntityKind::Startup, patch(startup_values("Krishi Cold")))
        .expect("drafts still work");

    assert!(matches!(
        service.submit(&ana(), EntityKind::Startup),
        Err(RegistrationError::Repository(RepositoryError::Unavailable(_)))
    ));
}

use super::build_service;
use crate::profiles::{
    EntityKind, Identity, ProfileId, ProfileRepository, ProfileStatus, ReviewEventKind,
};
use crate::testing::{ana, ben, mentor_values, record, startup_values};
use crate::workflows::approval::{ApprovalError, QueueFilter, ReviewAction, TransitionError};

fn moderator() -> Identity {
    Identity::admin("moderator")
}

#[test]
fn queue_lists_pending_oldest_first() {
    let (service, profiles, _) = build_service();
    let newer = profiles.seed(record(
        EntityKind::Startup,
        &ana(),
        startup_values("Krishi Cold"),
        ProfileStatus::Pending,
        5,
    ));
    let older = profiles.seed(record(
        EntityKind::Mentor,
        &ben(),
        mentor_values("Ravi Menon"),
        ProfileStatus::Pending,
        50,
    ));
    profiles.seed(record(
        EntityKind::Startup,
        &ben(),
        startup_values("Live Co"),
        ProfileStatus::Approved,
        500,
    ));

    let queue = service
        .queue(&QueueFilter::default())
        .expect("queue loads");
    let ids: Vec<_> = queue.iter().map(|record| record.id.clone()).collect();
    assert_eq!(ids, vec![older.id, newer.id.clone()]);

    let startups = service
        .queue(&QueueFilter {
            kind: Some(EntityKind::Startup),
            ..QueueFilter::default()
        })
        .expect("queue loads");
    assert_eq!(startups.len(), 1);
    assert_eq!(startups[0].id, newer.id);
}

#[test]
fn approve_with_rating_updates_record_and_notifies_owner() {
    let (service, profiles, notices) = build_service();
    let pending = profiles.seed(record(
        EntityKind::Startup,
        &ana(),
        startup_values("Krishi Cold"),
        ProfileStatus::Pending,
        5,
    ));

    let reviewed = service
        .review(&moderator(), &pending.id, ReviewAction::Approve { rating: Some(4) })
        .expect("approval succeeds");

    assert_eq!(reviewed.status, ProfileStatus::Approved);
    assert_eq!(reviewed.review.rating, Some(4));
    let stored = profiles
        .fetch(&pending.id)
        .expect("fetch succeeds")
        .expect("record present");
    assert_eq!(stored.status, ProfileStatus::Approved);

    let last = stored.history.last().expect("history entry");
    assert_eq!(last.kind, ReviewEventKind::Approved);
    assert_eq!(last.actor, moderator().user_id);
    assert_eq!(last.from, Some(ProfileStatus::Pending));

    let events = notices.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].template, "profile_approved");
    assert_eq!(events[0].owner, ana());
    assert_eq!(events[0].details.get("rating").map(String::as_str), Some("4"));
}

#[test]
fn request_update_records_reason() {
    let (service, profiles, notices) = build_service();
    let pending = profiles.seed(record(
        EntityKind::Mentor,
        &ana(),
        mentor_values("Ravi Menon"),
        ProfileStatus::Pending,
        5,
    ));

    let reviewed = service
        .review(
            &moderator(),
            &pending.id,
            ReviewAction::RequestUpdate {
                reason: "  Add your LinkedIn profile ".to_string(),
            },
        )
        .expect("request update succeeds");

    assert_eq!(reviewed.status, ProfileStatus::NeedsUpdate);
    assert_eq!(
        reviewed.review.reason.as_deref(),
        Some("Add your LinkedIn profile")
    );
    assert_eq!(notices.events()[0].template, "profile_needs_update");
}

#[test]
fn rating_keeps_approved_status_and_previous_reason() {
    let (service, profiles, _) = build_service();
    let approved = profiles.seed(record(
        EntityKind::Startup,
        &ana(),
        startup_values("Krishi Cold"),
        ProfileStatus::Approved,
        5,
    ));

    let rated = service
        .review(&moderator(), &approved.id, ReviewAction::Rate { rating: 5 })
        .expect("rating succeeds");

    assert_eq!(rated.status, ProfileStatus::Approved);
    assert_eq!(rated.review.rating, Some(5));
    assert_eq!(
        rated.history.last().map(|event| event.kind),
        Some(ReviewEventKind::Rated)
    );
}

#[test]
fn illegal_transitions_leave_record_untouched() {
    let (service, profiles, notices) = build_service();
    let rejected = profiles.seed(record(
        EntityKind::Startup,
        &ana(),
        startup_values("Krishi Cold"),
        ProfileStatus::Rejected,
        5,
    ));

    match service.review(&moderator(), &rejected.id, ReviewAction::Approve { rating: None }) {
        Err(ApprovalError::Transition(TransitionError::NotAllowed { action, from })) => {
            assert_eq!(action, "approve");
            assert_eq!(from, "rejected");
        }
        other => panic!("expected transition error, got {other:?}"),
    }

    let stored = profiles
        .fetch(&rejected.id)
        .expect("fetch succeeds")
        .expect("record present");
    assert_eq!(stored, rejected);
    assert!(notices.events().is_empty());
}

#[test]
fn missing_profile_is_not_found() {
    let (service, _, _) = build_service();
    let missing = ProfileId("stp-404404".to_string());

    assert!(matches!(
        service.review(&moderator(), &missing, ReviewAction::Rate { rating: 3 }),
        Err(ApprovalError::NotFound(_))
    ));
    assert!(matches!(
        service.history(&missing),
        Err(ApprovalError::NotFound(_))
    ));
}

#[test]
fn history_returns_full_trail() {
    let (service, profiles, _) = build_service();
    let pending = profiles.seed(record(
        EntityKind::Startup,
        &ana(),
        startup_values("Krishi Cold"),
        ProfileStatus::Pending,
        5,
    ));
    service
        .review(&moderator(), &pending.id, ReviewAction::Approve { rating: None })
        .expect("approve");
    service
        .review(&moderator(), &pending.id, ReviewAction::Rate { rating: 3 })
        .expect("rate");

    let kinds: Vec<_> = service
        .history(&pending.id)
        .expect("history loads")
        .into_iter()
        .map(|event| event.kind)
        .collect();
    assert_eq!(
        kinds,
        vec![
            ReviewEventKind::Submitted,
            ReviewEventKind::Approved,
            ReviewEventKind::Rated
        ]
    );
}

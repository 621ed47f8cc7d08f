use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use tracing::{info, warn};

use super::notifier::{ReviewNotice, ReviewNotifier};
use super::transition::{next_status, ReviewAction, TransitionError};
use crate::profiles::{
    EntityKind, Identity, ProfileId, ProfileQuery, ProfileRecord, ProfileRepository,
    ProfileStatus, RecordOrder, RepositoryError, ReviewEvent,
};

const DEFAULT_QUEUE_LIMIT: usize = 100;

/// Moderation queue filter; defaults to pending profiles of every kind.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueueFilter {
    #[serde(default)]
    pub status: Option<ProfileStatus>,
    #[serde(default)]
    pub kind: Option<EntityKind>,
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Service applying admin decisions to submitted profiles.
pub struct ApprovalService<R, N> {
    profiles: Arc<R>,
    notifier: Arc<N>,
}

impl<R, N> ApprovalService<R, N>
where
    R: ProfileRepository + 'static,
    N: ReviewNotifier + 'static,
{
    pub fn new(profiles: Arc<R>, notifier: Arc<N>) -> Self {
        Self { profiles, notifier }
    }

    /// Profiles awaiting moderation, oldest submission first.
    pub fn queue(&self, filter: &QueueFilter) -> Result<Vec<ProfileRecord>, ApprovalError> {
        let mut query = ProfileQuery::new()
            .status(filter.status.unwrap_or(ProfileStatus::Pending))
            .order(RecordOrder::OldestFirst)
            .limit(filter.limit.unwrap_or(DEFAULT_QUEUE_LIMIT));
        if let Some(kind) = filter.kind {
            query = query.kind(kind);
        }
        Ok(self.profiles.select(&query)?)
    }

    pub fn review(
        &self,
        reviewer: &Identity,
        id: &ProfileId,
        action: ReviewAction,
    ) -> Result<ProfileRecord, ApprovalError> {
        let mut record = self
            .profiles
            .fetch(id)?
            .ok_or_else(|| ApprovalError::NotFound(id.clone()))?;

        let from = record.status;
        let to = next_status(from, &action)?;
        let now = Utc::now();
        let reason = action.reason().map(str::to_string);
        let rating = action.rating();

        record.status = to;
        match &action {
            ReviewAction::Rate { rating } => record.review.rating = Some(*rating),
            _ => {
                record.review.reason = reason.clone();
                if rating.is_some() {
                    record.review.rating = rating;
                }
            }
        }
        record.updated_at = now;
        record.history.push(ReviewEvent {
            actor: reviewer.user_id.clone(),
            kind: action.event_kind(),
            from: Some(from),
            to,
            reason: reason.clone(),
            rating,
            at: now,
        });

        self.profiles.update(record.clone())?;
        info!(
            profile = %record.id,
            reviewer = %reviewer.user_id,
            action = action.label(),
            from = from.label(),
            to = to.label(),
            "profile reviewed"
        );

        let notice = notice_for(&record, &action, reason, rating);
        if let Err(err) = self.notifier.publish(notice) {
            warn!(profile = %record.id, error = %err, "review notification failed");
        }

        Ok(record)
    }

    pub fn history(&self, id: &ProfileId) -> Result<Vec<ReviewEvent>, ApprovalError> {
        let record = self
            .profiles
            .fetch(id)?
            .ok_or_else(|| ApprovalError::NotFound(id.clone()))?;
        Ok(record.history)
    }
}

fn notice_for(
    record: &ProfileRecord,
    action: &ReviewAction,
    reason: Option<String>,
    rating: Option<u8>,
) -> ReviewNotice {
    let template = match action {
        ReviewAction::Approve { .. } => "profile_approved",
        ReviewAction::Reject { .. } => "profile_rejected",
        ReviewAction::RequestUpdate { .. } => "profile_needs_update",
        ReviewAction::Rate { .. } => "profile_rated",
    };

    let mut details = BTreeMap::new();
    details.insert("kind".to_string(), record.kind.label().to_string());
    details.insert("name".to_string(), record.display_name().to_string());
    details.insert("status".to_string(), record.status.label().to_string());
    if let Some(reason) = reason {
        details.insert("reason".to_string(), reason);
    }
    if let Some(rating) = rating {
        details.insert("rating".to_string(), rating.to_string());
    }

    ReviewNotice {
        template: template.to_string(),
        profile_id: record.id.clone(),
        owner: record.owner.clone(),
        details,
    }
}

/// Error raised by the approval service.
#[derive(Debug, thiserror::Error)]
pub enum ApprovalError {
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error("profile {0} not found")]
    NotFound(ProfileId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

use serde::{Deserialize, Serialize};

use crate::profiles::{ProfileStatus, ReviewEventKind};

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

/// Admin decision on a submitted profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ReviewAction {
    Approve {
        #[serde(default)]
        rating: Option<u8>,
    },
    Reject {
        reason: String,
    },
    RequestUpdate {
        reason: String,
    },
    Rate {
        rating: u8,
    },
}

impl ReviewAction {
    pub fn event_kind(&self) -> ReviewEventKind {
        match self {
            ReviewAction::Approve { .. } => ReviewEventKind::Approved,
            ReviewAction::Reject { .. } => ReviewEventKind::Rejected,
            ReviewAction::RequestUpdate { .. } => ReviewEventKind::UpdateRequested,
            ReviewAction::Rate { .. } => ReviewEventKind::Rated,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReviewAction::Approve { .. } => "approve",
            ReviewAction::Reject { .. } => "reject",
            ReviewAction::RequestUpdate { .. } => "request_update",
            ReviewAction::Rate { .. } => "rate",
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            ReviewAction::Reject { reason } | ReviewAction::RequestUpdate { reason } => {
                Some(reason.trim())
            }
            _ => None,
        }
    }

    pub fn rating(&self) -> Option<u8> {
        match self {
            ReviewAction::Approve { rating } => *rating,
            ReviewAction::Rate { rating } => Some(*rating),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("cannot {action} a profile that is {from}")]
    NotAllowed {
        action: &'static str,
        from: &'static str,
    },
    #[error("a reason is required to {0}")]
    MissingReason(&'static str),
    #[error("rating must be between 1 and 5, got {0}")]
    RatingOutOfRange(u8),
}

/// Resolve the status an action leads to, enforcing the moderation table:
/// decisions apply to `pending` profiles, ratings to `approved` ones.
pub fn next_status(
    from: ProfileStatus,
    action: &ReviewAction,
) -> Result<ProfileStatus, TransitionError> {
    if let Some(rating) = action.rating() {
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(TransitionError::RatingOutOfRange(rating));
        }
    }
    if action.reason().is_some_and(str::is_empty) {
        return Err(TransitionError::MissingReason(action.label()));
    }

    let to = match (from, action) {
        (ProfileStatus::Pending, ReviewAction::Approve { .. }) => ProfileStatus::Approved,
        (ProfileStatus::Pending, ReviewAction::Reject { .. }) => ProfileStatus::Rejected,
        (ProfileStatus::Pending, ReviewAction::RequestUpdate { .. }) => ProfileStatus::NeedsUpdate,
        (ProfileStatus::Approved, ReviewAction::Rate { .. }) => ProfileStatus::Approved,
        _ => {
            return Err(TransitionError::NotAllowed {
                action: action.label(),
                from: from.label(),
            })
        }
    };
    Ok(to)
}

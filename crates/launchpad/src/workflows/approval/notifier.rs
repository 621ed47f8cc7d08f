use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::profiles::{ProfileId, UserId};

/// Outbound hook telling owners about moderation decisions (e-mail, in-app toasts).
pub trait ReviewNotifier: Send + Sync {
    fn publish(&self, notice: ReviewNotice) -> Result<(), NotifyError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewNotice {
    pub template: String,
    pub profile_id: ProfileId,
    pub owner: UserId,
    pub details: BTreeMap<String, String>,
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}

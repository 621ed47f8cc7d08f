use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for submitted profiles.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProfileId(pub String);

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Owner identifier as issued by the auth backend.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

static PROFILE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// The four actor kinds that can register on the marketplace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Startup,
    Incubator,
    Investor,
    Mentor,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Startup,
        EntityKind::Incubator,
        EntityKind::Investor,
        EntityKind::Mentor,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            EntityKind::Startup => "startup",
            EntityKind::Incubator => "incubator",
            EntityKind::Investor => "investor",
            EntityKind::Mentor => "mentor",
        }
    }

    const fn id_prefix(self) -> &'static str {
        match self {
            EntityKind::Startup => "stp",
            EntityKind::Incubator => "inc",
            EntityKind::Investor => "inv",
            EntityKind::Mentor => "mnt",
        }
    }

    /// Attribute holding the public display name for this kind.
    pub const fn name_field(self) -> &'static str {
        match self {
            EntityKind::Startup => "startup_name",
            EntityKind::Incubator => "incubator_name",
            EntityKind::Investor => "investor_name",
            EntityKind::Mentor => "full_name",
        }
    }

    pub fn next_id(self) -> ProfileId {
        let id = PROFILE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        ProfileId(format!("{}-{id:06}", self.id_prefix()))
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown entity kind '{0}'")]
pub struct UnknownEntityKind(pub String);

impl FromStr for EntityKind {
    type Err = UnknownEntityKind;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "startup" | "startups" => Ok(Self::Startup),
            "incubator" | "incubators" => Ok(Self::Incubator),
            "investor" | "investors" => Ok(Self::Investor),
            "mentor" | "mentors" => Ok(Self::Mentor),
            other => Err(UnknownEntityKind(other.to_string())),
        }
    }
}

/// Moderation status controlling visibility and editability of a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileStatus {
    Pending,
    Approved,
    NeedsUpdate,
    Rejected,
}

impl ProfileStatus {
    pub const ALL: [ProfileStatus; 4] = [
        ProfileStatus::Pending,
        ProfileStatus::Approved,
        ProfileStatus::NeedsUpdate,
        ProfileStatus::Rejected,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            ProfileStatus::Pending => "pending",
            ProfileStatus::Approved => "approved",
            ProfileStatus::NeedsUpdate => "needs_update",
            ProfileStatus::Rejected => "rejected",
        }
    }

    /// Owner-facing wording shown on the dashboard.
    pub const fn headline(self) -> &'static str {
        match self {
            ProfileStatus::Pending => "Under review",
            ProfileStatus::Approved => "Live in the directory",
            ProfileStatus::NeedsUpdate => "Changes requested",
            ProfileStatus::Rejected => "Not approved",
        }
    }
}

impl FromStr for ProfileStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "needs_update" | "needs-update" => Ok(Self::NeedsUpdate),
            "rejected" => Ok(Self::Rejected),
            other => Err(format!("unknown profile status '{other}'")),
        }
    }
}

/// A single attribute value: free text or a multi-select list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(value) => Some(value.as_str()),
            FieldValue::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::List(values) => Some(values.as_slice()),
            FieldValue::Text(_) => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Text(value) => value.trim().is_empty(),
            FieldValue::List(values) => values.is_empty(),
        }
    }
}

pub type Attributes = BTreeMap<String, FieldValue>;

/// Latest admin feedback attached to a profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
}

/// What happened to a profile, appended to its history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewEventKind {
    Submitted,
    Resubmitted,
    Approved,
    Rejected,
    UpdateRequested,
    Rated,
}

/// Audit trail entry for a status change or rating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewEvent {
    pub actor: UserId,
    pub kind: ReviewEventKind,
    pub from: Option<ProfileStatus>,
    pub to: ProfileStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    pub at: DateTime<Utc>,
}

/// Stored profile row shared by all four entity kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub id: ProfileId,
    pub owner: UserId,
    pub kind: EntityKind,
    pub attributes: Attributes,
    pub status: ProfileStatus,
    #[serde(default)]
    pub review: ReviewState,
    #[serde(default)]
    pub history: Vec<ReviewEvent>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProfileRecord {
    /// Fresh submission in `pending` state.
    pub fn submitted(
        kind: EntityKind,
        owner: UserId,
        attributes: Attributes,
        at: DateTime<Utc>,
    ) -> Self {
        let history = vec![ReviewEvent {
            actor: owner.clone(),
            kind: ReviewEventKind::Submitted,
            from: None,
            to: ProfileStatus::Pending,
            reason: None,
            rating: None,
            at,
        }];

        Self {
            id: kind.next_id(),
            owner,
            kind,
            attributes,
            status: ProfileStatus::Pending,
            review: ReviewState::default(),
            history,
            created_at: at,
            updated_at: at,
        }
    }

    /// Replace attributes with a resubmitted version and send it back to moderation.
    pub fn resubmit(&mut self, attributes: Attributes, at: DateTime<Utc>) {
        let from = self.status;
        self.attributes = attributes;
        self.status = ProfileStatus::Pending;
        self.review = ReviewState::default();
        self.updated_at = at;
        self.history.push(ReviewEvent {
            actor: self.owner.clone(),
            kind: ReviewEventKind::Resubmitted,
            from: Some(from),
            to: ProfileStatus::Pending,
            reason: None,
            rating: None,
            at,
        });
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.attributes
            .get(key)
            .and_then(FieldValue::as_text)
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    pub fn list(&self, key: &str) -> &[String] {
        self.attributes
            .get(key)
            .and_then(FieldValue::as_list)
            .unwrap_or(&[])
    }

    pub fn display_name(&self) -> &str {
        self.text(self.kind.name_field()).unwrap_or("Untitled profile")
    }

    /// Incubator a startup declared, if any.
    pub fn incubator_id(&self) -> Option<ProfileId> {
        if self.kind != EntityKind::Startup {
            return None;
        }
        self.text("incubator_id")
            .map(|value| ProfileId(value.to_string()))
    }

    pub fn is_public(&self) -> bool {
        self.status == ProfileStatus::Approved
    }
}

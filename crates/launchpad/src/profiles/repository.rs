use chrono::{DateTime, Utc};

use super::domain::{EntityKind, ProfileId, ProfileRecord, ProfileStatus, UserId};

/// Row ordering supported by the storage backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RecordOrder {
    #[default]
    NewestFirst,
    OldestFirst,
}

/// Table-scoped select: equality filters, an `updated_since` range filter, ordering and limit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileQuery {
    pub kind: Option<EntityKind>,
    pub status: Option<ProfileStatus>,
    pub owner: Option<UserId>,
    pub updated_since: Option<DateTime<Utc>>,
    pub order: RecordOrder,
    pub limit: Option<usize>,
}

impl ProfileQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(mut self, kind: EntityKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn status(mut self, status: ProfileStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn owner(mut self, owner: UserId) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn updated_since(mut self, since: DateTime<Utc>) -> Self {
        self.updated_since = Some(since);
        self
    }

    pub fn order(mut self, order: RecordOrder) -> Self {
        self.order = order;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn matches(&self, record: &ProfileRecord) -> bool {
        self.kind.map_or(true, |kind| record.kind == kind)
            && self.status.map_or(true, |status| record.status == status)
            && self
                .owner
                .as_ref()
                .map_or(true, |owner| &record.owner == owner)
            && self
                .updated_since
                .map_or(true, |since| record.updated_at >= since)
    }

    /// Apply filters, ordering and limit to an in-memory row set.
    pub fn apply<'a, I>(&self, rows: I) -> Vec<ProfileRecord>
    where
        I: IntoIterator<Item = &'a ProfileRecord>,
    {
        let mut selected: Vec<ProfileRecord> = rows
            .into_iter()
            .filter(|record| self.matches(record))
            .cloned()
            .collect();

        selected.sort_by(|left, right| {
            let ordering = left
                .created_at
                .cmp(&right.created_at)
                .then_with(|| left.id.cmp(&right.id));
            match self.order {
                RecordOrder::OldestFirst => ordering,
                RecordOrder::NewestFirst => ordering.reverse(),
            }
        });

        if let Some(limit) = self.limit {
            selected.truncate(limit);
        }
        selected
    }
}

/// Storage abstraction over the hosted relational backend.
pub trait ProfileRepository: Send + Sync {
    fn insert(&self, record: ProfileRecord) -> Result<ProfileRecord, RepositoryError>;
    fn update(&self, record: ProfileRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &ProfileId) -> Result<Option<ProfileRecord>, RepositoryError>;
    fn select(&self, query: &ProfileQuery) -> Result<Vec<ProfileRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

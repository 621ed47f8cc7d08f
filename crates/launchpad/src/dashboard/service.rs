use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::profiles::{
    EntityKind, ProfileId, ProfileQuery, ProfileRecord, ProfileRepository, ProfileStatus,
    RecordOrder, RepositoryError, UserId,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardEntry {
    pub id: ProfileId,
    pub kind: EntityKind,
    pub name: String,
    pub status: ProfileStatus,
    pub status_label: &'static str,
    pub reason: Option<String>,
    pub rating: Option<u8>,
    /// Pending submissions are locked until an admin decides.
    pub editable: bool,
    pub updated_at: DateTime<Utc>,
}

impl From<&ProfileRecord> for DashboardEntry {
    fn from(record: &ProfileRecord) -> Self {
        Self {
            id: record.id.clone(),
            kind: record.kind,
            name: record.display_name().to_string(),
            status: record.status,
            status_label: record.status.headline(),
            reason: record.review.reason.clone(),
            rating: record.review.rating,
            editable: record.status != ProfileStatus::Pending,
            updated_at: record.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileDashboard {
    pub owner: UserId,
    pub counts: BTreeMap<&'static str, usize>,
    pub entries: Vec<DashboardEntry>,
}

impl ProfileDashboard {
    /// Builds the view from the owner's records; every status gets a count, zero included.
    pub fn for_owner(owner: UserId, records: &[ProfileRecord]) -> Self {
        let mut counts: BTreeMap<&'static str, usize> = ProfileStatus::ALL
            .iter()
            .map(|status| (status.label(), 0))
            .collect();
        let mut entries = Vec::new();

        for record in records.iter().filter(|record| record.owner == owner) {
            *counts.entry(record.status.label()).or_default() += 1;
            entries.push(DashboardEntry::from(record));
        }
        entries.sort_by(|left, right| {
            right
                .updated_at
                .cmp(&left.updated_at)
                .then_with(|| right.id.cmp(&left.id))
        });

        Self {
            owner,
            counts,
            entries,
        }
    }
}

pub struct DashboardService<R> {
    profiles: Arc<R>,
}

impl<R> DashboardService<R>
where
    R: ProfileRepository + 'static,
{
    pub fn new(profiles: Arc<R>) -> Self {
        Self { profiles }
    }

    pub fn for_owner(&self, owner: &UserId) -> Result<ProfileDashboard, DashboardError> {
        let records = self.profiles.select(
            &ProfileQuery::new()
                .owner(owner.clone())
                .order(RecordOrder::NewestFirst),
        )?;
        Ok(ProfileDashboard::for_owner(owner.clone(), &records))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

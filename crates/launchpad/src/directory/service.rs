use std::sync::Arc;

use serde::Serialize;

use super::export::to_csv_string;
use super::listing::{
    incubator_entries, incubator_page, startup_entries, startup_page, DirectoryEntry,
    DirectoryPage,
};
use super::query::DirectoryQuery;
use crate::profiles::{
    Attributes, EntityKind, ProfileId, ProfileQuery, ProfileRecord, ProfileRepository,
    ProfileStatus, RepositoryError,
};

/// Read-only view over approved profiles.
pub struct DirectoryService<R> {
    profiles: Arc<R>,
    page_size: usize,
}

/// Public detail page for an approved profile. Owner and review history stay private.
#[derive(Debug, Clone, Serialize)]
pub struct PublicProfile {
    #[serde(flatten)]
    pub entry: DirectoryEntry,
    pub attributes: Attributes,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl<R> DirectoryService<R>
where
    R: ProfileRepository + 'static,
{
    pub fn new(profiles: Arc<R>, page_size: usize) -> Self {
        Self {
            profiles,
            page_size,
        }
    }

    pub fn startups(&self, query: &DirectoryQuery) -> Result<DirectoryPage, DirectoryError> {
        let startups = self.approved(EntityKind::Startup)?;
        let incubators = self.approved(EntityKind::Incubator)?;
        Ok(startup_page(&startups, &incubators, query, self.page_size))
    }

    pub fn incubators(&self, query: &DirectoryQuery) -> Result<DirectoryPage, DirectoryError> {
        let incubators = self.approved(EntityKind::Incubator)?;
        let startups = self.approved(EntityKind::Startup)?;
        Ok(incubator_page(&incubators, &startups, query, self.page_size))
    }

    /// CSV of every entry matching `query`, ignoring pagination.
    pub fn export(
        &self,
        kind: EntityKind,
        query: &DirectoryQuery,
    ) -> Result<String, DirectoryError> {
        let startups = self.approved(EntityKind::Startup)?;
        let incubators = self.approved(EntityKind::Incubator)?;
        let entries = match kind {
            EntityKind::Startup => startup_entries(&startups, &incubators, query),
            EntityKind::Incubator => incubator_entries(&incubators, &startups, query),
            other => return Err(DirectoryError::NotListed(other)),
        };
        Ok(to_csv_string(&entries)?)
    }

    /// Approved profile by id; anything else reads as missing.
    pub fn profile(&self, id: &ProfileId) -> Result<PublicProfile, DirectoryError> {
        let record = self
            .profiles
            .fetch(id)?
            .filter(ProfileRecord::is_public)
            .ok_or_else(|| DirectoryError::NotFound(id.clone()))?;

        let mut entry = DirectoryEntry::from_record(&record);
        match record.kind {
            EntityKind::Startup => {
                let incubators = self.approved(EntityKind::Incubator)?;
                entry = startup_entries(
                    std::slice::from_ref(&record),
                    &incubators,
                    &DirectoryQuery::default(),
                )
                .pop()
                .unwrap_or(entry);
            }
            EntityKind::Incubator => {
                let startups = self.approved(EntityKind::Startup)?;
                entry = incubator_entries(
                    std::slice::from_ref(&record),
                    &startups,
                    &DirectoryQuery::default(),
                )
                .pop()
                .unwrap_or(entry);
            }
            EntityKind::Investor | EntityKind::Mentor => {}
        }

        Ok(PublicProfile {
            entry,
            updated_at: record.updated_at,
            attributes: record.attributes,
        })
    }

    fn approved(&self, kind: EntityKind) -> Result<Vec<ProfileRecord>, RepositoryError> {
        self.profiles.select(
            &ProfileQuery::new()
                .kind(kind)
                .status(ProfileStatus::Approved),
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("profile {0} is not listed")]
    NotFound(ProfileId),
    #[error("{} profiles have no public directory", .0.label())]
    NotListed(EntityKind),
    #[error("failed to render export: {0}")]
    Export(#[from] csv::Error),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

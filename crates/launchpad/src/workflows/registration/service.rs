use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use super::catalog::{definition, WizardDefinition};
use super::draft::{WizardDraft, WizardError};
use super::repository::DraftStore;
use super::validation::FieldIssue;
use crate::profiles::{
    EntityKind, FieldValue, ProfileId, ProfileQuery, ProfileRecord, ProfileRepository,
    ProfileStatus, RepositoryError, UserId,
};

/// Batch of edits applied to a draft in one request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DraftPatch {
    #[serde(default)]
    pub values: BTreeMap<String, FieldValue>,
    #[serde(default)]
    pub toggle: Vec<OptionToggle>,
    #[serde(default)]
    pub clear: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OptionToggle {
    pub field: String,
    pub option: String,
}

/// Service driving the four registration wizards against the draft and profile stores.
pub struct RegistrationService<R, D> {
    profiles: Arc<R>,
    drafts: Arc<D>,
}

impl<R, D> RegistrationService<R, D>
where
    R: ProfileRepository + 'static,
    D: DraftStore + 'static,
{
    pub fn new(profiles: Arc<R>, drafts: Arc<D>) -> Self {
        Self { profiles, drafts }
    }

    pub fn definition(&self, kind: EntityKind) -> &'static WizardDefinition {
        definition(kind)
    }

    /// Restore the saved draft, or start a fresh one without persisting it.
    pub fn draft(
        &self,
        owner: &UserId,
        kind: EntityKind,
    ) -> Result<WizardDraft, RegistrationError> {
        let draft = self
            .drafts
            .load(owner, kind)?
            .unwrap_or_else(|| WizardDraft::new(kind, owner.clone()));
        Ok(draft)
    }

    pub fn update_draft(
        &self,
        owner: &UserId,
        kind: EntityKind,
        patch: DraftPatch,
    ) -> Result<WizardDraft, RegistrationError> {
        let definition = definition(kind);
        let mut draft = self.draft(owner, kind)?;

        for key in &patch.clear {
            if definition.field(key).is_none() {
                return Err(WizardError::UnknownField(key.clone()).into());
            }
            draft.values.remove(key);
        }
        for (key, value) in patch.values {
            draft.set_field(definition, &key, value)?;
        }
        for toggle in &patch.toggle {
            draft.toggle_option(definition, &toggle.field, &toggle.option)?;
        }

        self.drafts.save(draft.clone())?;
        Ok(draft)
    }

    pub fn next(&self, owner: &UserId, kind: EntityKind) -> Result<WizardDraft, RegistrationError> {
        let mut draft = self.draft(owner, kind)?;
        draft.advance(definition(kind))?;
        self.drafts.save(draft.clone())?;
        Ok(draft)
    }

    pub fn back(&self, owner: &UserId, kind: EntityKind) -> Result<WizardDraft, RegistrationError> {
        let mut draft = self.draft(owner, kind)?;
        draft.retreat();
        self.drafts.save(draft.clone())?;
        Ok(draft)
    }

    pub fn discard(&self, owner: &UserId, kind: EntityKind) -> Result<(), RegistrationError> {
        self.drafts.discard(owner, kind)?;
        Ok(())
    }

    /// Open an owned profile in the wizard, replacing any in-progress draft of that kind.
    pub fn edit(&self, owner: &UserId, id: &ProfileId) -> Result<WizardDraft, RegistrationError> {
        let record = self
            .profiles
            .fetch(id)?
            .ok_or_else(|| RegistrationError::NotFound(id.clone()))?;
        if &record.owner != owner {
            return Err(RegistrationError::NotOwner(id.clone()));
        }
        if record.status == ProfileStatus::Pending {
            return Err(RegistrationError::LockedForReview(id.clone()));
        }

        let draft = WizardDraft::from_record(&record);
        self.drafts.save(draft.clone())?;
        Ok(draft)
    }

    /// Validate the whole draft and upsert it as a `pending` profile.
    pub fn submit(
        &self,
        owner: &UserId,
        kind: EntityKind,
    ) -> Result<ProfileRecord, RegistrationError> {
        let definition = definition(kind);
        let draft = self
            .drafts
            .load(owner, kind)?
            .ok_or(RegistrationError::NoDraft(kind))?;

        let issues = draft.validate(definition);
        if !issues.is_empty() {
            return Err(RegistrationError::Incomplete {
                first_step: draft.first_incomplete_step(definition).unwrap_or_default(),
                issues,
            });
        }

        let attributes = draft.prune_hidden(definition);
        if let Some(FieldValue::Text(incubator)) = attributes.get("incubator_id") {
            self.ensure_incubator(&ProfileId(incubator.clone()))?;
        }

        let now = Utc::now();
        let stored = match self.existing_record(&draft)? {
            Some(mut record) => {
                if draft.editing.is_none() && record.status == ProfileStatus::Pending {
                    return Err(RegistrationError::AlreadyUnderReview(record.id));
                }
                let previous = record.status;
                record.resubmit(attributes, now);
                self.profiles.update(record.clone())?;
                info!(profile = %record.id, %kind, from = previous.label(), "profile resubmitted");
                record
            }
            None => {
                let record = ProfileRecord::submitted(kind, owner.clone(), attributes, now);
                let record = self.profiles.insert(record)?;
                info!(profile = %record.id, %kind, "profile submitted");
                record
            }
        };

        self.drafts.discard(owner, kind)?;
        Ok(stored)
    }

    fn existing_record(
        &self,
        draft: &WizardDraft,
    ) -> Result<Option<ProfileRecord>, RegistrationError> {
        if let Some(id) = &draft.editing {
            let record = self
                .profiles
                .fetch(id)?
                .ok_or_else(|| RegistrationError::NotFound(id.clone()))?;
            if record.owner != draft.owner {
                return Err(RegistrationError::NotOwner(id.clone()));
            }
            if record.kind != draft.kind {
                return Err(RegistrationError::KindMismatch {
                    id: id.clone(),
                    expected: draft.kind,
                    found: record.kind,
                });
            }
            return Ok(Some(record));
        }

        let query = ProfileQuery::new()
            .owner(draft.owner.clone())
            .kind(draft.kind)
            .limit(1);
        Ok(self.profiles.select(&query)?.into_iter().next())
    }

    fn ensure_incubator(&self, id: &ProfileId) -> Result<(), RegistrationError> {
        match self.profiles.fetch(id)? {
            Some(record) if record.kind == EntityKind::Incubator && record.is_public() => Ok(()),
            _ => Err(RegistrationError::UnknownIncubator(id.clone())),
        }
    }
}

/// Error raised by the registration service.
#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    #[error(transparent)]
    Wizard(#[from] WizardError),
    #[error("profile has {} incomplete field(s)", .issues.len())]
    Incomplete {
        first_step: usize,
        issues: Vec<FieldIssue>,
    },
    #[error("no {0} draft to submit")]
    NoDraft(EntityKind),
    #[error("profile {0} not found")]
    NotFound(ProfileId),
    #[error("profile {0} belongs to another user")]
    NotOwner(ProfileId),
    #[error("profile {0} is under review and cannot be edited")]
    LockedForReview(ProfileId),
    #[error("a profile of this kind ({0}) is already under review")]
    AlreadyUnderReview(ProfileId),
    #[error("profile {id} is a {found}, not a {expected}")]
    KindMismatch {
        id: ProfileId,
        expected: EntityKind,
        found: EntityKind,
    },
    #[error("incubator {0} is not listed in the directory")]
    UnknownIncubator(ProfileId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

//! In-memory adapters and fixtures shared by the unit test modules.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{Duration, Utc};
use serde_json::Value;

use crate::profiles::{
    Attributes, EntityKind, FieldValue, Identity, ProfileId, ProfileQuery, ProfileRecord,
    ProfileRepository, ProfileStatus, RepositoryError, Sessions, StaticSessionResolver, UserId,
};
use crate::media::{Bucket, ObjectStorage, StorageError, StoredObject};
use crate::workflows::approval::{NotifyError, ReviewNotice, ReviewNotifier};
use crate::workflows::registration::{DraftStore, WizardDraft};

pub(crate) const MEMBER_TOKEN: &str = "member-token";
pub(crate) const OTHER_TOKEN: &str = "other-token";
pub(crate) const ADMIN_TOKEN: &str = "admin-token";

#[derive(Default, Clone)]
pub(crate) struct MemoryProfiles {
    pub(crate) records: Arc<Mutex<HashMap<ProfileId, ProfileRecord>>>,
}

impl MemoryProfiles {
    pub(crate) fn seed(&self, record: ProfileRecord) -> ProfileRecord {
        self.records
            .lock()
            .expect("repository mutex poisoned")
            .insert(record.id.clone(), record.clone());
        record
    }

    pub(crate) fn len(&self) -> usize {
        self.records.lock().expect("repository mutex poisoned").len()
    }
}

impl ProfileRepository for MemoryProfiles {
    fn insert(&self, record: ProfileRecord) -> Result<ProfileRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: ProfileRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if !guard.contains_key(&record.id) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(record.id.clone(), record);
        Ok(())
    }

    fn fetch(&self, id: &ProfileId) -> Result<Option<ProfileRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn select(&self, query: &ProfileQuery) -> Result<Vec<ProfileRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(query.apply(guard.values()))
    }
}

pub(crate) struct UnavailableProfiles;

impl ProfileRepository for UnavailableProfiles {
    fn insert(&self, _record: ProfileRecord) -> Result<ProfileRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _record: ProfileRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &ProfileId) -> Result<Option<ProfileRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn select(&self, _query: &ProfileQuery) -> Result<Vec<ProfileRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

#[derive(Default, Clone)]
pub(crate) struct MemoryDrafts {
    drafts: Arc<Mutex<HashMap<(UserId, EntityKind), WizardDraft>>>,
}

impl DraftStore for MemoryDrafts {
    fn load(
        &self,
        owner: &UserId,
        kind: EntityKind,
    ) -> Result<Option<WizardDraft>, RepositoryError> {
        let guard = self.drafts.lock().expect("draft mutex poisoned");
        Ok(guard.get(&(owner.clone(), kind)).cloned())
    }

    fn save(&self, draft: WizardDraft) -> Result<(), RepositoryError> {
        self.drafts
            .lock()
            .expect("draft mutex poisoned")
            .insert((draft.owner.clone(), draft.kind), draft);
        Ok(())
    }

    fn discard(&self, owner: &UserId, kind: EntityKind) -> Result<(), RepositoryError> {
        self.drafts
            .lock()
            .expect("draft mutex poisoned")
            .remove(&(owner.clone(), kind));
        Ok(())
    }
}

#[derive(Default, Clone)]
pub(crate) struct MemoryNotices {
    events: Arc<Mutex<Vec<ReviewNotice>>>,
}

impl MemoryNotices {
    pub(crate) fn events(&self) -> Vec<ReviewNotice> {
        self.events.lock().expect("notice mutex poisoned").clone()
    }
}

impl ReviewNotifier for MemoryNotices {
    fn publish(&self, notice: ReviewNotice) -> Result<(), NotifyError> {
        self.events
            .lock()
            .expect("notice mutex poisoned")
            .push(notice);
        Ok(())
    }
}

#[derive(Default, Clone)]
pub(crate) struct MemoryObjects {
    objects: Arc<Mutex<HashMap<(Bucket, String), StoredObject>>>,
}

impl ObjectStorage for MemoryObjects {
    fn upload(
        &self,
        bucket: Bucket,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError> {
        let object = StoredObject {
            content_type: content_type.to_string(),
            bytes,
        };
        self.objects
            .lock()
            .expect("object mutex poisoned")
            .insert((bucket, path.to_string()), object);
        Ok(format!("http://media.test/{bucket}/{path}"))
    }

    fn fetch(&self, bucket: Bucket, path: &str) -> Result<Option<StoredObject>, StorageError> {
        let guard = self.objects.lock().expect("object mutex poisoned");
        Ok(guard.get(&(bucket, path.to_string())).cloned())
    }
}

pub(crate) fn sessions() -> Sessions {
    let resolver = StaticSessionResolver::default()
        .with_session(MEMBER_TOKEN, Identity::member("ana"))
        .with_session(OTHER_TOKEN, Identity::member("ben"))
        .with_session(ADMIN_TOKEN, Identity::admin("moderator"));
    Sessions(Arc::new(resolver))
}

pub(crate) fn ana() -> UserId {
    UserId("ana".to_string())
}

pub(crate) fn ben() -> UserId {
    UserId("ben".to_string())
}

pub(crate) fn text(value: &str) -> FieldValue {
    FieldValue::Text(value.to_string())
}

pub(crate) fn list(values: &[&str]) -> FieldValue {
    FieldValue::List(values.iter().map(|value| value.to_string()).collect())
}

fn attributes(pairs: Vec<(&str, FieldValue)>) -> Attributes {
    pairs
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

/// A startup that passes every wizard step without an incubator or funding.
pub(crate) fn startup_values(name: &str) -> Attributes {
    attributes(vec![
        ("startup_name", text(name)),
        ("tagline", text("Cold-chain logistics for rural farms")),
        ("founded_year", text("2021")),
        ("location", text("Pune")),
        ("website", text("https://example.org")),
        ("founder_name", text("Asha Rao")),
        ("founder_email", text("asha@example.org")),
        ("founder_phone", text("+91 98765 43210")),
        ("team_size", text("6-10")),
        ("sectors", list(&["agritech", "logistics"])),
        ("stage", text("mvp")),
        ("description", text("Solar-powered cold rooms rented per crate.")),
        ("incubated", text("no")),
        ("has_raised_funding", text("no")),
    ])
}

pub(crate) fn incubator_values(name: &str) -> Attributes {
    attributes(vec![
        ("incubator_name", text(name)),
        ("established_year", text("2015")),
        ("location", text("Bengaluru")),
        ("website", text("https://incubator.example.org")),
        ("sectors", list(&["agritech", "cleantech"])),
        ("program_duration", text("6_months")),
        ("takes_equity", text("no")),
        ("description", text("Hardware-first programme with lab access.")),
        ("startups_supported", text("40")),
        ("contact_email", text("hello@incubator.example.org")),
    ])
}

pub(crate) fn mentor_values(name: &str) -> Attributes {
    attributes(vec![
        ("full_name", text(name)),
        ("headline", text("Former CFO, two exits")),
        ("location", text("Mumbai")),
        ("expertise_areas", list(&["finance", "fundraising"])),
        ("years_of_experience", text("18")),
        ("bio", text("Helps founders prepare for seed rounds.")),
        ("mentoring_mode", text("online")),
        ("paid_mentorship", text("no")),
        ("contact_email", text("mentor@example.org")),
    ])
}

/// Stored record with a chosen status, created `minutes_ago` minutes in the past.
pub(crate) fn record(
    kind: EntityKind,
    owner: &UserId,
    attributes: Attributes,
    status: ProfileStatus,
    minutes_ago: i64,
) -> ProfileRecord {
    let at = Utc::now() - Duration::minutes(minutes_ago);
    let mut record = ProfileRecord::submitted(kind, owner.clone(), attributes, at);
    record.status = status;
    record
}

pub(crate) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

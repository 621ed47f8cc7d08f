use launchpad::media::{Bucket, ObjectStorage, StorageError, StoredObject};
use launchpad::profiles::{
    EntityKind, ProfileId, ProfileQuery, ProfileRecord, ProfileRepository, RepositoryError, UserId,
};
use launchpad::workflows::approval::{NotifyError, ReviewNotice, ReviewNotifier};
use launchpad::workflows::registration::{DraftStore, WizardDraft};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local stand-ins for the hosted backend's tables, buckets and mailer.
#[derive(Clone)]
pub(crate) struct Adapters {
    pub(crate) profiles: Arc<InMemoryProfileRepository>,
    pub(crate) drafts: Arc<InMemoryDraftStore>,
    pub(crate) notifier: Arc<LoggingReviewNotifier>,
    pub(crate) storage: Arc<InMemoryObjectStorage>,
}

impl Adapters {
    pub(crate) fn in_memory(media_base_url: &str) -> Self {
        Self {
            profiles: Arc::new(InMemoryProfileRepository::default()),
            drafts: Arc::new(InMemoryDraftStore::default()),
            notifier: Arc::new(LoggingReviewNotifier::default()),
            storage: Arc::new(InMemoryObjectStorage::new(media_base_url)),
        }
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryProfileRepository {
    records: Arc<Mutex<HashMap<ProfileId, ProfileRecord>>>,
}

impl ProfileRepository for InMemoryProfileRepository {
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
        if guard.contains_key(&record.id) {
            guard.insert(record.id.clone(), record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
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

#[derive(Default, Clone)]
pub(crate) struct InMemoryDraftStore {
    drafts: Arc<Mutex<HashMap<(UserId, EntityKind), WizardDraft>>>,
}

impl DraftStore for InMemoryDraftStore {
    fn load(
        &self,
        owner: &UserId,
        kind: EntityKind,
    ) -> Result<Option<WizardDraft>, RepositoryError> {
        let guard = self.drafts.lock().expect("draft mutex poisoned");
        Ok(guard.get(&(owner.clone(), kind)).cloned())
    }

    fn save(&self, draft: WizardDraft) -> Result<(), RepositoryError> {
        let mut guard = self.drafts.lock().expect("draft mutex poisoned");
        guard.insert((draft.owner.clone(), draft.kind), draft);
        Ok(())
    }

    fn discard(&self, owner: &UserId, kind: EntityKind) -> Result<(), RepositoryError> {
        let mut guard = self.drafts.lock().expect("draft mutex poisoned");
        guard.remove(&(owner.clone(), kind));
        Ok(())
    }
}

/// Logs review notices instead of mailing them and keeps them for inspection.
#[derive(Default, Clone)]
pub(crate) struct LoggingReviewNotifier {
    sent: Arc<Mutex<Vec<ReviewNotice>>>,
}

impl ReviewNotifier for LoggingReviewNotifier {
    fn publish(&self, notice: ReviewNotice) -> Result<(), NotifyError> {
        info!(
            template = %notice.template,
            profile = %notice.profile_id,
            owner = %notice.owner,
            "review notice queued"
        );
        let mut guard = self.sent.lock().expect("notice mutex poisoned");
        guard.push(notice);
        Ok(())
    }
}

impl LoggingReviewNotifier {
    pub(crate) fn sent(&self) -> Vec<ReviewNotice> {
        self.sent.lock().expect("notice mutex poisoned").clone()
    }
}

pub(crate) struct InMemoryObjectStorage {
    base_url: String,
    objects: Mutex<HashMap<(Bucket, String), StoredObject>>,
}

impl InMemoryObjectStorage {
    pub(crate) fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            objects: Mutex::new(HashMap::new()),
        }
    }
}

impl ObjectStorage for InMemoryObjectStorage {
    fn upload(
        &self,
        bucket: Bucket,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError> {
        let mut guard = self.objects.lock().expect("object mutex poisoned");
        guard.insert(
            (bucket, path.to_string()),
            StoredObject {
                content_type: content_type.to_string(),
                bytes,
            },
        );
        Ok(format!("{}/{bucket}/{path}", self.base_url))
    }

    fn fetch(&self, bucket: Bucket, path: &str) -> Result<Option<StoredObject>, StorageError> {
        let guard = self.objects.lock().expect("object mutex poisoned");
        Ok(guard.get(&(bucket, path.to_string())).cloned())
    }
}

mod service;

use std::sync::Arc;

use crate::testing::{MemoryNotices, MemoryProfiles};
use crate::workflows::approval::ApprovalService;

fn build_service() -> (
    ApprovalService<MemoryProfiles, MemoryNotices>,
    Arc<MemoryProfiles>,
    Arc<MemoryNotices>,
) {
    let profiles = Arc::new(MemoryProfiles::default());
    let notices = Arc::new(MemoryNotices::default());
    let service = ApprovalService::new(profiles.clone(), notices.clone());
    (service, profiles, notices)
}

use std::sync::Arc;

use axum::Extension;

use crate::profiles::{Attributes, EntityKind, UserId};
use crate::testing::{sessions, MemoryDrafts, MemoryProfiles};
use crate::workflows::registration::{registration_router, DraftPatch, RegistrationService};

pub(super) type MemoryRegistration = RegistrationService<MemoryProfiles, MemoryDrafts>;

pub(super) fn build_service() -> (MemoryRegistration, Arc<MemoryProfiles>, Arc<MemoryDrafts>) {
    let profiles = Arc::new(MemoryProfiles::default());
    let drafts = Arc::new(MemoryDrafts::default());
    let service = RegistrationService::new(profiles.clone(), drafts.clone());
    (service, profiles, drafts)
}

pub(super) fn patch(values: Attributes) -> DraftPatch {
    DraftPatch {
        values,
        ..DraftPatch::default()
    }
}

/// Save `values` into the owner's draft in one patch.
pub(super) fn fill(
    service: &MemoryRegistration,
    owner: &UserId,
    kind: EntityKind,
    values: Attributes,
) {
    service
        .update_draft(owner, kind, patch(values))
        .expect("draft accepts values");
}

pub(super) fn router_with_service(service: MemoryRegistration) -> axum::Router {
    registration_router(Arc::new(service)).layer(Extension(sessions()))
}

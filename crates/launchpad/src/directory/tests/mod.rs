
use std::sync::Arc;

use crate::directory::{directory_router, DirectoryService};
use crate::profiles::{EntityKind, ProfileRecord, ProfileStatus};
use crate::testing::{
    ana, ben, incubator_values, mentor_values, record, startup_values, text, MemoryProfiles,
};

struct Fixture {
    router: axum::Router,
    incubator: ProfileRecord,
    startup: ProfileRecord,
    pending: ProfileRecord,
    mentor: ProfileRecord,
}

/// Two approved startups (one incubated), one pending startup and one approved mentor.
fn fixture() -> Fixture {
    let profiles = Arc::new(MemoryProfiles::default());
    let incubator = profiles.seed(record(
        EntityKind::Incubator,
        &ben(),
        incubator_values("Agri Labs"),
        ProfileStatus::Approved,
        300,
    ));

    let mut values = startup_values("Krishi Cold");
    values.insert("incubated".to_string(), text("yes"));
    values.insert("incubator_id".to_string(), text(&incubator.id.0));
    let startup = profiles.seed(record(
        EntityKind::Startup,
        &ana(),
        values,
        ProfileStatus::Approved,
        120,
    ));
    profiles.seed(record(
        EntityKind::Startup,
        &ben(),
        startup_values("Solar Sutra"),
        ProfileStatus::Approved,
        60,
    ));
    let pending = profiles.seed(record(
        EntityKind::Startup,
        &ben(),
        startup_values("Draft Works"),
        ProfileStatus::Pending,
        10,
    ));
    let mentor = profiles.seed(record(
        EntityKind::Mentor,
        &ana(),
        mentor_values("Ravi Menon"),
        ProfileStatus::Approved,
        30,
    ));

    let service = DirectoryService::new(profiles, 12);
    Fixture {
        router: directory_router(Arc::new(service)),
        incubator,
        startup,
        pending,
        mentor,
    }
}

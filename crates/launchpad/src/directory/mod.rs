//! Public directory of approved startups and incubators.
//!
//! Filters travel in the query string ([`DirectoryQuery`]) so listings can be bookmarked and
//! shared. Only `approved` profiles are ever visible here.

pub mod export;
pub mod listing;
pub mod query;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use export::{to_csv_string, write_csv};
pub use listing::{
    incubator_entries, incubator_page, startup_entries, startup_page, DirectoryEntry,
    DirectoryPage, IncubatorRef,
};
pub use query::{DirectoryQuery, SortOrder, ViewMode, MAX_PER_PAGE};
pub use router::directory_router;
pub use service::{DirectoryError, DirectoryService, PublicProfile};

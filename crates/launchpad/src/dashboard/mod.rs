//! "My Profiles": every submission a member owns, with its review state.

pub mod router;
pub mod service;

pub use router::dashboard_router;
pub use service::{DashboardEntry, DashboardError, DashboardService, ProfileDashboard};

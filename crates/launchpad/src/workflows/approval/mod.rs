//! Admin moderation of submitted profiles.
//!
//! Decisions (approve, reject, request update) apply to `pending` profiles; ratings apply to
//! approved ones. Every change is appended to the profile history and announced through a
//! [`ReviewNotifier`].

pub mod notifier;
pub mod router;
pub mod service;
pub mod transition;

#[cfg(test)]
mod tests;

pub use notifier::{NotifyError, ReviewNotice, ReviewNotifier};
pub use router::approval_router;
pub use service::{ApprovalError, ApprovalService, QueueFilter};
pub use transition::{next_status, ReviewAction, TransitionError, MAX_RATING, MIN_RATING};

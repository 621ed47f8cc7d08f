//! Multi-step registration wizards for startups, incubators, investors and mentors.
//!
//! Each wizard is a static [`WizardDefinition`]; a [`WizardDraft`] walks its steps with
//! per-step validation and conditional field visibility, and is saved to a [`DraftStore`]
//! after every change. Submitting a complete draft upserts a `pending` profile.

pub mod catalog;
pub mod draft;
pub mod repository;
pub mod router;
pub mod service;
pub mod validation;

#[cfg(test)]
mod tests;

pub use catalog::{definition, Condition, FieldInput, FieldSpec, StepSpec, WizardDefinition};
pub use draft::{DraftProgress, StepMove, WizardDraft, WizardError};
pub use repository::DraftStore;
pub use router::registration_router;
pub use service::{DraftPatch, OptionToggle, RegistrationError, RegistrationService};
pub use validation::FieldIssue;

//! Shared profile records, storage contract and session identity.

pub mod auth;
pub mod domain;
pub mod repository;

pub use auth::{
    AdminIdentity, AuthConfigError, AuthError, Identity, Role, SessionResolver, Sessions,
    StaticSessionResolver,
};
pub use domain::{
    Attributes, EntityKind, FieldValue, ProfileId, ProfileRecord, ProfileStatus, ReviewEvent,
    ReviewEventKind, ReviewState, UnknownEntityKind, UserId,
};
pub use repository::{ProfileQuery, ProfileRepository, RecordOrder, RepositoryError};

//! Session resolution for the hosted auth backend.
//!
//! Handlers take an [`Identity`] (or [`AdminIdentity`]) argument; the extractor reads
//! `Authorization: Bearer <token>` and asks the [`Sessions`] extension to resolve it.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::UserId;

const LOGIN_PATH: &str = "/login";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Member,
    Admin,
}

/// Authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: UserId,
    pub role: Role,
}

impl Identity {
    pub fn member(user_id: impl Into<String>) -> Self {
        Self {
            user_id: UserId(user_id.into()),
            role: Role::Member,
        }
    }

    pub fn admin(user_id: impl Into<String>) -> Self {
        Self {
            user_id: UserId(user_id.into()),
            role: Role::Admin,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// getSession()/getUser() contract of the auth backend.
pub trait SessionResolver: Send + Sync {
    fn resolve(&self, token: &str) -> Option<Identity>;
}

/// Request extension carrying the resolver used by the extractors.
#[derive(Clone)]
pub struct Sessions(pub Arc<dyn SessionResolver>);

/// Fixed token table, parsed from `token=user[:admin]` pairs separated by commas.
#[derive(Debug, Clone, Default)]
pub struct StaticSessionResolver {
    sessions: HashMap<String, Identity>,
}

impl StaticSessionResolver {
    pub fn parse(raw: &str) -> Result<Self, AuthConfigError> {
        let mut sessions = HashMap::new();
        for entry in raw.split(',').map(str::trim).filter(|entry| !entry.is_empty()) {
            let (token, subject) = entry
                .split_once('=')
                .ok_or_else(|| AuthConfigError(entry.to_string()))?;
            let (user, role) = match subject.split_once(':') {
                Some((user, "admin")) => (user, Role::Admin),
                Some((user, "member")) => (user, Role::Member),
                Some(_) => return Err(AuthConfigError(entry.to_string())),
                None => (subject, Role::Member),
            };
            if token.trim().is_empty() || user.trim().is_empty() {
                return Err(AuthConfigError(entry.to_string()));
            }
            sessions.insert(
                token.trim().to_string(),
                Identity {
                    user_id: UserId(user.trim().to_string()),
                    role,
                },
            );
        }
        Ok(Self { sessions })
    }

    pub fn with_session(mut self, token: impl Into<String>, identity: Identity) -> Self {
        self.sessions.insert(token.into(), identity);
        self
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl SessionResolver for StaticSessionResolver {
    fn resolve(&self, token: &str) -> Option<Identity> {
        self.sessions.get(token).cloned()
    }
}

#[derive(Debug, thiserror::Error)]
#[error("malformed session entry '{0}', expected token=user[:admin]")]
pub struct AuthConfigError(pub String);

/// Rejection raised by the identity extractors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("sign in required")]
    MissingSession,
    #[error("session is invalid or expired")]
    InvalidSession,
    #[error("administrator role required")]
    Forbidden,
    #[error("session resolver not configured")]
    Unconfigured,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::MissingSession | AuthError::InvalidSession => {
                let payload = json!({ "error": self.to_string(), "login": LOGIN_PATH });
                (StatusCode::UNAUTHORIZED, Json(payload)).into_response()
            }
            AuthError::Forbidden => {
                (StatusCode::FORBIDDEN, Json(json!({ "error": self.to_string() })))
                    .into_response()
            }
            AuthError::Unconfigured => {
                tracing::error!("identity extractor used without a Sessions extension");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": self.to_string() })),
                )
                    .into_response()
            }
        }
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let sessions = parts
            .extensions
            .get::<Sessions>()
            .cloned()
            .ok_or(AuthError::Unconfigured)?;
        let token = bearer_token(parts).ok_or(AuthError::MissingSession)?;
        sessions.0.resolve(token).ok_or(AuthError::InvalidSession)
    }
}

/// Identity that has been checked for the admin role.
#[derive(Debug, Clone)]
pub struct AdminIdentity(pub Identity);

#[axum::async_trait]
impl<S> FromRequestParts<S> for AdminIdentity
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let identity = Identity::from_request_parts(parts, state).await?;
        if identity.is_admin() {
            Ok(Self(identity))
        } else {
            Err(AuthError::Forbidden)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_member_and_admin_sessions() {
        let resolver =
            StaticSessionResolver::parse("tok-a=ana, tok-b=ben:admin,").expect("valid table");

        assert_eq!(resolver.len(), 2);
        assert_eq!(resolver.resolve("tok-a"), Some(Identity::member("ana")));
        assert_eq!(resolver.resolve("tok-b"), Some(Identity::admin("ben")));
        assert_eq!(resolver.resolve("tok-c"), None);
    }

    #[test]
    fn rejects_malformed_entries() {
        assert!(StaticSessionResolver::parse("no-equals-sign").is_err());
        assert!(StaticSessionResolver::parse("tok=ana:owner").is_err());
        assert!(StaticSessionResolver::parse("=ana").is_err());
    }

    #[test]
    fn empty_table_is_allowed() {
        let resolver = StaticSessionResolver::parse("").expect("empty table");
        assert!(resolver.is_empty());
    }
}

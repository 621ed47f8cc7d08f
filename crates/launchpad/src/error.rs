use crate::config::ConfigError;
use crate::dashboard::DashboardError;
use crate::directory::DirectoryError;
use crate::media::MediaError;
use crate::profiles::AuthConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::approval::ApprovalError;
use crate::workflows::registration::RegistrationError;
use crate::workflows::{approval, registration};
use crate::{dashboard, directory, media};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;
use tracing::error;

/// Process-level failure: startup, serving, or a scripted run against the services.
#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Sessions(AuthConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Registration(RegistrationError),
    Approval(ApprovalError),
    Directory(DirectoryError),
    Dashboard(DashboardError),
    Media(MediaError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Sessions(err) => write!(f, "session table error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Registration(err) => write!(f, "registration failed: {}", err),
            AppError::Approval(err) => write!(f, "review failed: {}", err),
            AppError::Directory(err) => write!(f, "directory read failed: {}", err),
            AppError::Dashboard(err) => write!(f, "dashboard read failed: {}", err),
            AppError::Media(err) => write!(f, "upload failed: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Sessions(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Registration(err) => Some(err),
            AppError::Approval(err) => Some(err),
            AppError::Directory(err) => Some(err),
            AppError::Dashboard(err) => Some(err),
            AppError::Media(err) => Some(err),
        }
    }
}

/// Service errors answer exactly as their own router would; everything else is a 500.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Registration(err) => registration::router::error_response(err),
            AppError::Approval(err) => approval::router::error_response(err),
            AppError::Directory(err) => directory::router::error_response(err),
            AppError::Dashboard(err) => dashboard::router::error_response(err),
            AppError::Media(err) => media::router::error_response(err),
            AppError::Config(_)
            | AppError::Sessions(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_) => {
                error!(error = %self, "unhandled process error");
                let body = Json(json!({ "error": self.to_string() }));
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
        }
    }
}

macro_rules! app_error_from {
    ($($source:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$source> for AppError {
                fn from(value: $source) -> Self {
                    Self::$variant(value)
                }
            }
        )+
    };
}

app_error_from! {
    ConfigError => Config,
    AuthConfigError => Sessions,
    TelemetryError => Telemetry,
    std::io::Error => Io,
    axum::Error => Server,
    RegistrationError => Registration,
    ApprovalError => Approval,
    DirectoryError => Directory,
    DashboardError => Dashboard,
    MediaError => Media,
}

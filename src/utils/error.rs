use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::fmt;

use crate::agenda::{AgendaError, Conflito, RecurrenceError, SlotError};
use crate::services::notificacao::NotificationError;
use crate::store::StoreError;

#[derive(Debug)]
pub enum AppError {
    ValidationError(String),
    NotFound(String),
    Conflict(String),
    /// Horários já ocupados; a resposta lista cada agendamento em conflito
    ScheduleConflict(Vec<Conflito>),
    StoreError(String),
    NotificationError(String),
    ServiceUnavailable(String),
    ConfigError(String),
    JsonError(serde_json::Error),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::ScheduleConflict(conflitos) => write!(
                f,
                "Schedule conflict with {} existing entr{}",
                conflitos.len(),
                if conflitos.len() == 1 { "y" } else { "ies" }
            ),
            AppError::StoreError(msg) => write!(f, "Store error: {}", msg),
            AppError::NotificationError(msg) => write!(f, "Notification error: {}", msg),
            AppError::ServiceUnavailable(msg) => write!(f, "Service unavailable: {}", msg),
            AppError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            AppError::JsonError(err) => write!(f, "JSON error: {}", err),
        }
    }
}

impl std::error::Error for AppError {}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::JsonError(err)
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => AppError::NotFound(err.to_string()),
            StoreError::Duplicado { .. } => AppError::Conflict(err.to_string()),
            StoreError::InvalidRecord { .. } => AppError::ValidationError(err.to_string()),
            StoreError::Remote(ref remote) if remote.is_not_found() => {
                AppError::NotFound(err.to_string())
            }
            StoreError::Remote(::supabase::SupabaseError::ApiError { status: 409, message, .. }) => {
                AppError::Conflict(message)
            }
            StoreError::Remote(remote) => AppError::StoreError(remote.to_string()),
            StoreError::Unavailable(msg) => AppError::StoreError(msg),
        }
    }
}

impl From<SlotError> for AppError {
    fn from(err: SlotError) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

impl From<RecurrenceError> for AppError {
    fn from(err: RecurrenceError) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

impl From<AgendaError> for AppError {
    fn from(err: AgendaError) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

impl From<NotificationError> for AppError {
    fn from(err: NotificationError) -> Self {
        match err {
            NotificationError::NaoConfigurado => AppError::ConfigError(err.to_string()),
            other => AppError::NotificationError(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message, conflitos) = match self {
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg, None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg, None),
            AppError::ScheduleConflict(conflitos) => (
                StatusCode::CONFLICT,
                "Horário já ocupado. Envie sobrescrever: true para substituir.".to_string(),
                Some(conflitos),
            ),
            AppError::StoreError(msg) => (StatusCode::BAD_GATEWAY, msg, None),
            AppError::NotificationError(msg) => (StatusCode::BAD_GATEWAY, msg, None),
            AppError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg, None),
            AppError::ConfigError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg, None),
            AppError::JsonError(err) => (StatusCode::BAD_REQUEST, err.to_string(), None),
        };

        let mut body = json!({
            "error": error_message,
            "status": status.as_u16()
        });
        if let Some(conflitos) = conflitos {
            body["conflitos"] = json!(conflitos);
        }

        (status, axum::Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

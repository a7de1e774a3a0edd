/// Middleware de autenticação para as rotas /admin/*
///
/// As exclusões em massa da agenda ficam atrás de um API key enviado no
/// header X-Admin-Key.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::utils::AppError;

pub const ADMIN_KEY_HEADER: &str = "X-Admin-Key";

/// Chave esperada e ambiente, lidos uma vez na inicialização
#[derive(Debug, Clone, Default)]
pub struct AdminAuth {
    chave: Option<String>,
    producao: bool,
}

impl AdminAuth {
    pub fn new(chave: Option<String>, producao: bool) -> Self {
        Self {
            chave: chave.filter(|c| !c.trim().is_empty()),
            producao,
        }
    }

    /// `ADMIN_API_KEY` e `RUST_ENV=production`
    pub fn from_env() -> Self {
        let producao = std::env::var("RUST_ENV")
            .unwrap_or_else(|_| "development".to_string())
            == "production";
        Self::new(std::env::var("ADMIN_API_KEY").ok(), producao)
    }
}

/// # Respostas
///
/// - chave configurada e correta: segue para o handler
/// - chave configurada e ausente/errada: **401**
/// - sem chave em desenvolvimento: segue, com warning
/// - sem chave em produção: **503**
pub async fn require_admin_key(
    State(auth): State<AdminAuth>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Result<Response, Response> {
    let provided_key = headers
        .get(ADMIN_KEY_HEADER)
        .and_then(|v| v.to_str().ok());

    match (auth.chave.as_deref(), provided_key, auth.producao) {
        (Some(expected), Some(provided), _) if expected == provided => {
            tracing::debug!("✅ Admin access granted");
            Ok(next.run(request).await)
        }

        (Some(_), provided, _) => {
            tracing::warn!(
                "❌ Admin access denied - Invalid or missing X-Admin-Key: {:?}",
                provided.map(|_| "<redacted>")
            );
            Err(unauthorized_response())
        }

        (None, _, false) => {
            tracing::warn!(
                "⚠️  ADMIN_API_KEY not configured - Allowing access in development mode. \
                 Configure ADMIN_API_KEY in production!"
            );
            Ok(next.run(request).await)
        }

        (None, _, true) => {
            tracing::error!(
                "🚨 ADMIN_API_KEY not configured in production! Blocking admin access."
            );
            Err(service_unavailable_response())
        }
    }
}

fn unauthorized_response() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "Unauthorized",
            "status": 401,
            "hint": "Include X-Admin-Key header with valid API key"
        })),
    )
        .into_response()
}

fn service_unavailable_response() -> Response {
    AppError::ServiceUnavailable("ADMIN_API_KEY not configured on server".to_string()).into_response()
}

use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::utils::logging::*;
use crate::AppState;

pub async fn health_check() -> Json<Value> {
    log_health_check();

    Json(json!({
        "status": "healthy",
        "service": "agenda-equipe",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// 503 quando o store não responde
pub async fn ready_check(State(state): State<Arc<AppState>>) -> (StatusCode, Json<Value>) {
    log_readiness_check();

    let (store_status, erro) = match state.store.health().await {
        Ok(()) => ("connected", None),
        Err(e) => {
            log_store_error("health", "ping", &e.to_string());
            ("disconnected", Some(e.to_string()))
        }
    };
    let ready = erro.is_none();

    let mut store = json!({
        "backend": state.store.backend(),
        "status": store_status
    });
    if let Some(erro) = erro {
        store["error"] = json!(erro);
    }

    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(json!({
            "ready": ready,
            "service": "agenda-equipe",
            "version": env!("CARGO_PKG_VERSION"),
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "dependencies": {
                "store": store,
                "notificacao": {
                    "configured": state.settings.notificacao.webhook_url.is_some()
                }
            }
        })),
    )
}

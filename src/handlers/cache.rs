use axum::{extract::State, response::Json};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::AppState;

pub async fn estado(State(state): State<Arc<AppState>>) -> Json<Value> {
    let cache = state.cadastro.cache();
    Json(json!({
        "habilitado": cache.enabled(),
        "entradas": cache.len().await,
        "ttl_seconds": state.settings.cache.ttl_seconds,
        "stats": cache.stats().await
    }))
}

/// Força a releitura de funcionários e tarefas no próximo acesso
pub async fn limpar(State(state): State<Arc<AppState>>) -> Json<Value> {
    let removidas = state.cadastro.cache().clear().await;
    Json(json!({
        "removidas": removidas,
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

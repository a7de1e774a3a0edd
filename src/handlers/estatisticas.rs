use axum::{
    extract::{Query, State},
    response::Json,
};
use std::sync::Arc;

use crate::models::FiltroAgenda;
use crate::services::estatisticas::{self, Estatisticas};
use crate::utils::logging::log_request_received;
use crate::utils::AppResult;
use crate::AppState;

pub async fn painel(
    State(state): State<Arc<AppState>>,
    Query(filtro): Query<FiltroAgenda>,
) -> AppResult<Json<Estatisticas>> {
    log_request_received("/api/estatisticas", "GET");
    Ok(Json(estatisticas::gerar(&state.agenda, &state.cadastro, &filtro).await?))
}

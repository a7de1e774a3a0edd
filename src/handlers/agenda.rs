use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::time::Instant;

use crate::agenda::{interval_label, GRANULARIDADE_MINUTOS};
use crate::models::{
    Agendamento, AgendamentoRecorrente, AlteracaoStatus, CriarAgendamento, EditarAgendamento,
    FiltroAgenda,
};
use crate::services::ResumoLote;
use crate::utils::logging::{log_request_processed, log_request_received};
use crate::utils::AppResult;
use crate::AppState;

/// Agendamento com o intervalo pronto para exibição ("10:00 às 11:30")
#[derive(Debug, Serialize)]
pub struct AgendamentoComIntervalo {
    #[serde(flatten)]
    pub agendamento: Agendamento,
    pub intervalo: Option<String>,
}

impl From<Agendamento> for AgendamentoComIntervalo {
    fn from(agendamento: Agendamento) -> Self {
        Self {
            intervalo: interval_label(&agendamento.horario, agendamento.duracao),
            agendamento,
        }
    }
}

pub async fn grade(State(state): State<Arc<AppState>>) -> Json<Value> {
    let grade = state.agenda.grade();
    Json(json!({
        "hora_inicio": grade.hora_inicio(),
        "hora_fim": grade.hora_fim(),
        "granularidade_minutos": GRANULARIDADE_MINUTOS,
        "fim_do_dia": grade.fim_do_dia(),
        "slots": grade.slots()
    }))
}

pub async fn listar(
    State(state): State<Arc<AppState>>,
    Query(filtro): Query<FiltroAgenda>,
) -> AppResult<Json<Vec<AgendamentoComIntervalo>>> {
    log_request_received("/api/agenda", "GET");
    let agendamentos = state.agenda.listar(&filtro).await?;
    Ok(Json(agendamentos.into_iter().map(Into::into).collect()))
}

pub async fn buscar(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Json<AgendamentoComIntervalo>> {
    Ok(Json(state.agenda.buscar(&id).await?.into()))
}

/// 409 com a lista de conflitos, a menos que `sobrescrever: true`
pub async fn criar(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> AppResult<(StatusCode, Json<AgendamentoComIntervalo>)> {
    let start_time = Instant::now();
    log_request_received("/api/agenda", "POST");

    let CriarAgendamento { agendamento, opcoes } = serde_json::from_value(body)?;
    let criado = state.agenda.criar(agendamento, opcoes).await?;

    log_request_processed("/api/agenda", 201, start_time.elapsed().as_millis() as u64);
    Ok((StatusCode::CREATED, Json(criado.into())))
}

pub async fn editar(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> AppResult<Json<AgendamentoComIntervalo>> {
    log_request_received("/api/agenda/:id", "PUT");
    let EditarAgendamento { alteracao, opcoes } = serde_json::from_value(body)?;
    Ok(Json(state.agenda.editar(&id, alteracao, opcoes).await?.into()))
}

pub async fn excluir(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    log_request_received("/api/agenda/:id", "DELETE");
    state.agenda.excluir(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn alterar_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> AppResult<Json<AgendamentoComIntervalo>> {
    log_request_received("/api/agenda/:id/status", "PATCH");
    let AlteracaoStatus { status } = serde_json::from_value(body)?;
    Ok(Json(state.agenda.alterar_status(&id, status).await?.into()))
}

pub async fn criar_recorrente(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> AppResult<Json<ResumoLote>> {
    let start_time = Instant::now();
    log_request_received("/api/agenda/recorrente", "POST");

    let modelo: AgendamentoRecorrente = serde_json::from_value(body)?;
    let resumo = state.agenda.criar_recorrente(modelo).await?;

    log_request_processed(
        "/api/agenda/recorrente",
        200,
        start_time.elapsed().as_millis() as u64,
    );
    Ok(Json(resumo))
}

#[derive(Debug, Deserialize)]
pub struct ExclusaoLote {
    pub ids: Vec<String>,
}

pub async fn excluir_lote(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> AppResult<Json<ResumoLote>> {
    log_request_received("/admin/agenda/excluir", "POST");
    let ExclusaoLote { ids } = serde_json::from_value(body)?;
    Ok(Json(state.agenda.excluir_lote(&ids).await?))
}

pub async fn excluir_por_filtro(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> AppResult<Json<ResumoLote>> {
    log_request_received("/admin/agenda/excluir-filtro", "POST");
    let filtro: FiltroAgenda = serde_json::from_value(body)?;
    Ok(Json(state.agenda.excluir_por_filtro(&filtro).await?))
}

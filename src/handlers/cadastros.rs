//! CRUD dos cadastros (funcionários, tarefas, metas, processos)
//!
//! Handlers genéricos sobre `Registro`; o router instancia um por tabela.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use crate::services::Registro;
use crate::store::Filtro;
use crate::utils::logging::log_request_received;
use crate::utils::AppResult;
use crate::AppState;

/// Só as colunas de `R::FILTROS` viram filtro; o resto da query é ignorado
pub(crate) fn filtro_da_query<R: Registro>(params: &HashMap<String, String>) -> Filtro {
    R::FILTROS
        .iter()
        .filter_map(|campo| {
            params
                .get(*campo)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(|v| (*campo, v))
        })
        .fold(Filtro::new(), |f, (campo, valor)| f.igual(campo, valor))
}

pub async fn listar<R: Registro>(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> AppResult<Json<Vec<R>>> {
    log_request_received(R::TABELA.nome(), "GET");
    let registros = state.cadastro.listar::<R>(&filtro_da_query::<R>(&params)).await?;
    Ok(Json(registros))
}

pub async fn buscar<R: Registro>(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Json<R>> {
    Ok(Json(state.cadastro.buscar::<R>(&id).await?))
}

pub async fn criar<R: Registro>(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> AppResult<(StatusCode, Json<R>)> {
    log_request_received(R::TABELA.nome(), "POST");
    let novo: R::Novo = serde_json::from_value(body)?;
    let criado = state.cadastro.criar::<R>(novo).await?;
    Ok((StatusCode::CREATED, Json(criado)))
}

pub async fn atualizar<R: Registro>(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> AppResult<Json<R>> {
    log_request_received(R::TABELA.nome(), "PUT");
    let alteracao: R::Alteracao = serde_json::from_value(body)?;
    Ok(Json(state.cadastro.atualizar::<R>(&id, alteracao).await?))
}

pub async fn excluir<R: Registro>(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    log_request_received(R::TABELA.nome(), "DELETE");
    state.cadastro.excluir::<R>(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

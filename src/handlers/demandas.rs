use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use chrono::{Local, NaiveDate};
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

use super::cadastros::filtro_da_query;
use crate::models::{Demanda, Funcionario, StatusPrazo};
use crate::services::Notificacao;
use crate::utils::logging::{log_info, log_request_received};
use crate::utils::{AppError, AppResult};
use crate::AppState;

/// Demanda acompanhada da situação do prazo calculada no dia
#[derive(Debug, Serialize)]
pub struct DemandaComPrazo {
    #[serde(flatten)]
    pub demanda: Demanda,
    pub status_prazo: Option<StatusPrazo>,
}

impl DemandaComPrazo {
    fn new(demanda: Demanda, hoje: NaiveDate) -> Self {
        Self {
            status_prazo: demanda.status_prazo(hoje),
            demanda,
        }
    }
}

pub async fn listar(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> AppResult<Json<Vec<DemandaComPrazo>>> {
    log_request_received("/api/demandas", "GET");
    let hoje = Local::now().date_naive();

    let demandas = state
        .cadastro
        .listar::<Demanda>(&filtro_da_query::<Demanda>(&params))
        .await?;
    Ok(Json(
        demandas
            .into_iter()
            .map(|d| DemandaComPrazo::new(d, hoje))
            .collect(),
    ))
}

pub async fn buscar(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Json<DemandaComPrazo>> {
    let demanda = state.cadastro.buscar::<Demanda>(&id).await?;
    Ok(Json(DemandaComPrazo::new(demanda, Local::now().date_naive())))
}

/// Envia a mensagem de WhatsApp da demanda pelo webhook
pub async fn notificar(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    log_request_received("/api/demandas/:id/notificar", "POST");
    let demanda = state.cadastro.buscar::<Demanda>(&id).await?;

    let funcionario = match demanda.funcionario_id.as_deref() {
        Some(funcionario_id) => match state.cadastro.buscar::<Funcionario>(funcionario_id).await {
            Ok(funcionario) => Some(funcionario),
            Err(AppError::NotFound(_)) => None,
            Err(e) => return Err(e),
        },
        None => None,
    };

    let notificacao = Notificacao::para_demanda(&demanda, funcionario);
    state.notificador.enviar(&notificacao).await?;
    log_info(&format!("📲 Notificação enviada para a demanda {}", demanda.id));

    Ok(Json(json!({
        "enviado": true,
        "mensagem": notificacao.mensagem,
        "timestamp": notificacao.timestamp
    })))
}

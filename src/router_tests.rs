use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::config::Settings;
use crate::middleware::admin_auth::ADMIN_KEY_HEADER;
use crate::middleware::AdminAuth;
use crate::services::notificacao::testing::NotificadorGravador;
use crate::store::{MemoryStore, Tabela};
use crate::{router, AppState};

const CHAVE: &str = "chave-de-teste";

struct Cenario {
    app: Router,
    store: MemoryStore,
    notificador: Arc<NotificadorGravador>,
}

fn cenario() -> Cenario {
    let store = MemoryStore::with_seed().unwrap();
    let notificador = Arc::new(NotificadorGravador::default());
    let state = AppState::new(
        Settings::default(),
        Arc::new(store.clone()),
        notificador.clone(),
        AdminAuth::new(Some(CHAVE.to_string()), true),
    )
    .unwrap();

    Cenario {
        app: router(Arc::new(state)),
        store,
        notificador,
    }
}

async fn enviar(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    enviar_com(app, method, uri, body, None).await
}

async fn enviar_com(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
    chave: Option<&str>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(chave) = chave {
        request = request.header(ADMIN_KEY_HEADER, chave);
    }
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

#[tokio::test]
async fn test_health_and_ready() {
    let c = cenario();

    let (status, body) = enviar(&c.app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = enviar(&c.app, "GET", "/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["dependencies"]["store"]["backend"], "memory");
}

#[tokio::test]
async fn test_grid_endpoint() {
    let c = cenario();
    let (status, body) = enviar(&c.app, "GET", "/api/agenda/grade", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["slots"].as_array().unwrap().len(), 23);
    assert_eq!(body["slots"][0], "08:00");
    assert_eq!(body["fim_do_dia"], "19:30");
}

#[tokio::test]
async fn test_funcionarios_crud() {
    let c = cenario();

    let (status, lista) = enviar(&c.app, "GET", "/api/funcionarios", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(lista.as_array().unwrap().len(), 7);

    let (status, criado) = enviar(
        &c.app,
        "POST",
        "/api/funcionarios",
        Some(json!({"nome": "Lúcia Mendes", "horario_inicio": "09:00", "horario_fim": "18:00"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(criado["id"], "lucia_mendes");

    let (status, body) = enviar(
        &c.app,
        "POST",
        "/api/funcionarios",
        Some(json!({"nome": "Outra", "cor": "azul"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);

    let (status, _) = enviar(&c.app, "DELETE", "/api/funcionarios/lucia_mendes", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = enviar(&c.app, "GET", "/api/funcionarios/lucia_mendes", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], 404);
}

#[tokio::test]
async fn test_tarefas_filter_by_category() {
    let c = cenario();
    let (status, lista) = enviar(&c.app, "GET", "/api/tarefas?categoria=indisponibilidade", None).await;

    assert_eq!(status, StatusCode::OK);
    let lista = lista.as_array().unwrap();
    assert_eq!(lista.len(), 3);
    assert!(lista.iter().all(|t| t["computar_horas"] == false));
}

#[tokio::test]
async fn test_create_conflict_and_overwrite() {
    let c = cenario();
    let entrada = json!({
        "funcionario_id": "guido",
        "tarefa_id": "suporte",
        "data": "2025-08-04",
        "horario": "10:00",
        "duracao": 90
    });

    let (status, primeiro) = enviar(&c.app, "POST", "/api/agenda", Some(entrada)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(primeiro["horarios_ocupados"], json!(["10:00", "10:30", "11:00"]));
    assert_eq!(primeiro["intervalo"], "10:00 às 11:30");

    let uri = format!("/api/agenda/{}", primeiro["id"].as_str().unwrap());
    let (_, lido) = enviar(&c.app, "GET", &uri, None).await;
    assert_eq!(lido["intervalo"], "10:00 às 11:30");
    let (_, lista) = enviar(&c.app, "GET", "/api/agenda?funcionario_id=guido", None).await;
    assert_eq!(lista[0]["intervalo"], "10:00 às 11:30");

    let conflitante = json!({
        "funcionario": "guido",
        "tarefa": "checkins",
        "data": "2025-08-04",
        "horario": "11:00",
        "duracao": 30
    });
    let (status, body) = enviar(&c.app, "POST", "/api/agenda", Some(conflitante.clone())).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["conflitos"][0]["agendamento_id"], primeiro["id"]);
    assert_eq!(body["conflitos"][0]["horarios"], json!(["11:00"]));

    let mut sobrescrever = conflitante;
    sobrescrever["sobrescrever"] = json!(true);
    let (status, _) = enviar(&c.app, "POST", "/api/agenda", Some(sobrescrever)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(c.store.count(Tabela::Agenda).await, 1);
}

#[tokio::test]
async fn test_create_outside_grid_is_bad_request() {
    let c = cenario();
    let (status, body) = enviar(
        &c.app,
        "POST",
        "/api/agenda",
        Some(json!({
            "funcionario_id": "guido",
            "tarefa_id": "suporte",
            "data": "2025-08-04",
            "horario": "19:00",
            "duracao": 60
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("19:00"));
    assert_eq!(c.store.count(Tabela::Agenda).await, 0);
}

#[tokio::test]
async fn test_status_timer() {
    let c = cenario();
    let (_, criado) = enviar(
        &c.app,
        "POST",
        "/api/agenda",
        Some(json!({
            "funcionario_id": "jean",
            "tarefa_id": "reuniao_diaria",
            "data": "2025-08-05",
            "horario": "09:00"
        })),
    )
    .await;
    let uri = format!("/api/agenda/{}/status", criado["id"].as_str().unwrap());

    let (status, body) = enviar(&c.app, "PATCH", &uri, Some(json!({"status": "em_andamento"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["tempo_inicio"].is_string());

    let (_, body) = enviar(&c.app, "PATCH", &uri, Some(json!({"status": "concluida"}))).await;
    assert_eq!(body["status"], "concluida");
    assert!(body["tempo_fim"].is_string());
    assert!(body["tempo_real"].is_u64());

    let (status, _) = enviar(&c.app, "PATCH", &uri, Some(json!({"status": "pausada"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_recurring_creates_cartesian_product() {
    let c = cenario();
    let (status, resumo) = enviar(
        &c.app,
        "POST",
        "/api/agenda/recorrente",
        Some(json!({
            "funcionarios": ["guido", "pedro", "michelle"],
            "tarefa": "checkins",
            "horarios": ["09:00", "14:00"],
            "duracao": 30,
            "data_inicio": "2025-08-04",
            "data_fim": "2025-08-10",
            "dias_semana": [1, 3, 5]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(resumo["solicitados"], 3 * 2 * 3);
    assert_eq!(resumo["sucesso"], 18);
    assert_eq!(resumo["falhas"], json!([]));
    assert_eq!(c.store.count(Tabela::Agenda).await, 18);

    let (_, lista) = enviar(&c.app, "GET", "/api/agenda?funcionario_id=pedro&data=2025-08-06", None).await;
    assert_eq!(lista.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_bulk_delete_requires_admin_key_and_reports_failures() {
    let c = cenario();
    let mut ids = Vec::new();
    for horario in ["09:00", "10:00", "11:00"] {
        let (_, criado) = enviar(
            &c.app,
            "POST",
            "/api/agenda",
            Some(json!({
                "funcionario_id": "dayana",
                "tarefa_id": "suporte",
                "data": "2025-08-04",
                "horario": horario
            })),
        )
        .await;
        ids.push(criado["id"].as_str().unwrap().to_string());
    }
    c.store.simular_falha("horario", "10:00").await;

    let body = json!({"ids": ids});
    let (status, _) = enviar(&c.app, "POST", "/admin/agenda/excluir", Some(body.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, resumo) =
        enviar_com(&c.app, "POST", "/admin/agenda/excluir", Some(body), Some(CHAVE)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resumo["solicitados"], 3);
    assert_eq!(resumo["sucesso"], 2);
    assert_eq!(resumo["falhas"][0]["id"], ids[1].as_str());
    assert_eq!(c.store.count(Tabela::Agenda).await, 1);
}

#[tokio::test]
async fn test_bulk_delete_by_filter_rejects_empty_filter() {
    let c = cenario();
    let (status, _) = enviar_com(
        &c.app,
        "POST",
        "/admin/agenda/excluir-filtro",
        Some(json!({})),
        Some(CHAVE),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_cache_admin_routes() {
    let c = cenario();
    enviar(&c.app, "GET", "/api/funcionarios", None).await;
    enviar(&c.app, "GET", "/api/funcionarios", None).await;

    let (status, _) = enviar(&c.app, "GET", "/admin/cache", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, estado) = enviar_com(&c.app, "GET", "/admin/cache", None, Some(CHAVE)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(estado["entradas"], 1);
    assert_eq!(estado["stats"]["hits"], 1);

    let (status, limpeza) =
        enviar_com(&c.app, "POST", "/admin/cache/limpar", None, Some(CHAVE)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(limpeza["removidas"], 1);

    let (_, estado) = enviar_com(&c.app, "GET", "/admin/cache", None, Some(CHAVE)).await;
    assert_eq!(estado["entradas"], 0);
    assert_eq!(estado["stats"]["invalidations"], 1);
}

#[tokio::test]
async fn test_demand_notification() {
    let c = cenario();
    let (status, demanda) = enviar(
        &c.app,
        "POST",
        "/api/demandas",
        Some(json!({
            "titulo": "Atualizar planilha de alunos",
            "funcionario_id": "thais",
            "prazo": "2030-01-15",
            "importancia": "alta"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, lista) = enviar(&c.app, "GET", "/api/demandas", None).await;
    assert_eq!(lista[0]["status_prazo"]["tipo"], "normal");

    let uri = format!("/api/demandas/{}/notificar", demanda["id"].as_str().unwrap());
    let (status, body) = enviar(&c.app, "POST", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["mensagem"],
        "Olá! Você foi designado para: Atualizar planilha de alunos. Prazo: 15/01/2030"
    );

    let enviadas = c.notificador.enviadas.lock().unwrap();
    assert_eq!(enviadas.len(), 1);
    assert_eq!(enviadas[0].funcionario.as_ref().unwrap().id, "thais");
}

#[tokio::test]
async fn test_statistics_endpoint() {
    let c = cenario();
    for (tarefa, horario) in [("suporte", "09:00"), ("almoco", "12:00")] {
        enviar(
            &c.app,
            "POST",
            "/api/agenda",
            Some(json!({
                "funcionario_id": "guido",
                "tarefa_id": tarefa,
                "data": "2025-08-04",
                "horario": horario,
                "duracao": 60
            })),
        )
        .await;
    }

    let (status, body) = enviar(&c.app, "GET", "/api/estatisticas?funcionario_id=guido", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);
    assert_eq!(body["por_status"]["nao_iniciada"], 2);
    assert_eq!(body["minutos_por_funcionario"]["guido"], 60);
}

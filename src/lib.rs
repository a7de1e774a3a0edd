// Biblioteca da agenda de equipe
// Expõe módulos e o router para uso em testes e no binário

pub mod agenda;
pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod store;
pub mod utils;

use axum::{
    middleware as axum_middleware,
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use agenda::TimeSlotGrid;
use handlers::{agenda as agenda_handlers, cache, cadastros, demandas, estatisticas};
use middleware::{require_admin_key, AdminAuth};
use models::{Demanda, Funcionario, Meta, Processo, Tarefa};
use services::{AgendaService, Cadastro, ListCache, Notifier};
use store::RecordStore;
use utils::AppResult;

// AppState é definido aqui para ser compartilhado
#[derive(Clone)]
pub struct AppState {
    pub settings: config::Settings,
    pub store: Arc<dyn RecordStore>,
    pub notificador: Arc<dyn Notifier>,
    pub cadastro: Cadastro,
    pub agenda: AgendaService,
    pub admin: AdminAuth,
}

impl AppState {
    pub fn new(
        settings: config::Settings,
        store: Arc<dyn RecordStore>,
        notificador: Arc<dyn Notifier>,
        admin: AdminAuth,
    ) -> AppResult<Self> {
        let grade = TimeSlotGrid::new(settings.agenda.hora_inicio, settings.agenda.hora_fim)?;
        let cadastro = Cadastro::new(store.clone(), ListCache::new(settings.cache.ttl_seconds));
        let agenda = AgendaService::new(store.clone(), cadastro.clone(), Arc::new(grade))
            .com_limite_lote(settings.agenda.limite_lote);

        Ok(Self {
            settings,
            store,
            notificador,
            cadastro,
            agenda,
            admin,
        })
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    let app = Router::new()
        // Health checks (públicos)
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::ready_check))
        // Cadastros
        .route(
            "/api/funcionarios",
            get(cadastros::listar::<Funcionario>).post(cadastros::criar::<Funcionario>),
        )
        .route(
            "/api/funcionarios/:id",
            get(cadastros::buscar::<Funcionario>)
                .put(cadastros::atualizar::<Funcionario>)
                .delete(cadastros::excluir::<Funcionario>),
        )
        .route(
            "/api/tarefas",
            get(cadastros::listar::<Tarefa>).post(cadastros::criar::<Tarefa>),
        )
        .route(
            "/api/tarefas/:id",
            get(cadastros::buscar::<Tarefa>)
                .put(cadastros::atualizar::<Tarefa>)
                .delete(cadastros::excluir::<Tarefa>),
        )
        .route(
            "/api/metas",
            get(cadastros::listar::<Meta>).post(cadastros::criar::<Meta>),
        )
        .route(
            "/api/metas/:id",
            get(cadastros::buscar::<Meta>)
                .put(cadastros::atualizar::<Meta>)
                .delete(cadastros::excluir::<Meta>),
        )
        .route(
            "/api/processos",
            get(cadastros::listar::<Processo>).post(cadastros::criar::<Processo>),
        )
        .route(
            "/api/processos/:id",
            get(cadastros::buscar::<Processo>)
                .put(cadastros::atualizar::<Processo>)
                .delete(cadastros::excluir::<Processo>),
        )
        // Demandas
        .route(
            "/api/demandas",
            get(demandas::listar).post(cadastros::criar::<Demanda>),
        )
        .route(
            "/api/demandas/:id",
            get(demandas::buscar)
                .put(cadastros::atualizar::<Demanda>)
                .delete(cadastros::excluir::<Demanda>),
        )
        .route("/api/demandas/:id/notificar", post(demandas::notificar))
        // Agenda
        .route("/api/agenda/grade", get(agenda_handlers::grade))
        .route(
            "/api/agenda",
            get(agenda_handlers::listar).post(agenda_handlers::criar),
        )
        .route("/api/agenda/recorrente", post(agenda_handlers::criar_recorrente))
        .route(
            "/api/agenda/:id",
            get(agenda_handlers::buscar)
                .put(agenda_handlers::editar)
                .delete(agenda_handlers::excluir),
        )
        .route("/api/agenda/:id/status", patch(agenda_handlers::alterar_status))
        .route("/api/estatisticas", get(estatisticas::painel))
        .with_state(state.clone());

    // Rotas administrativas protegidas com API key
    let admin_routes = Router::new()
        .route("/admin/agenda/excluir", post(agenda_handlers::excluir_lote))
        .route(
            "/admin/agenda/excluir-filtro",
            post(agenda_handlers::excluir_por_filtro),
        )
        .route("/admin/cache", get(cache::estado))
        .route("/admin/cache/limpar", post(cache::limpar))
        .layer(axum_middleware::from_fn_with_state(
            state.admin.clone(),
            require_admin_key,
        ))
        .with_state(state);

    app.merge(admin_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[cfg(test)]
mod router_tests;

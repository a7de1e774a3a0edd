/// Agenda de equipe: funcionários, tarefas, agenda em slots de 30 minutos,
/// demandas com notificação por WhatsApp, metas e processos
///
/// Persistência no Supabase (PostgREST); sem SUPABASE_URL/SUPABASE_ANON_KEY
/// o servidor sobe com o store em memória carregado com os dados iniciais.

use anyhow::Context;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use agenda_equipe::config::Settings;
use agenda_equipe::middleware::AdminAuth;
use agenda_equipe::services::WebhookNotifier;
use agenda_equipe::store::{MemoryStore, RecordStore, SupabaseStore};
use agenda_equipe::utils::logging::*;
use agenda_equipe::{router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Carregar variáveis de ambiente do arquivo .env (se existir)
    let dotenv_loaded = dotenvy::dotenv().is_ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if dotenv_loaded {
        tracing::info!("✅ Arquivo .env carregado com sucesso");
    } else {
        tracing::debug!("Arquivo .env não encontrado - usando variáveis de ambiente do sistema");
    }

    let settings = Settings::new().context("Failed to load settings")?;
    log_config_loaded(&std::env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string()));

    let store = build_store(&settings)?;

    let notificador = WebhookNotifier::new(
        settings.notificacao.webhook_url.clone(),
        settings.notificacao.timeout_seconds,
    )
    .context("Failed to build webhook client")?;
    if !notificador.is_configured() {
        log_warning("⚠️  N8N_WEBHOOK_URL não configurado - notificações de demandas desativadas");
    }

    let app_state = Arc::new(
        AppState::new(
            settings.clone(),
            store,
            Arc::new(notificador),
            AdminAuth::from_env(),
        )
        .context("Failed to build application state")?,
    );
    log_info(&format!(
        "🗓️ Grade de {:02}:00 a {} ({} slots)",
        settings.agenda.hora_inicio,
        app_state.agenda.grade().fim_do_dia(),
        app_state.agenda.grade().len()
    ));

    let app = router(app_state);

    let port = settings.server.port;
    log_server_startup(port);
    let listener = TcpListener::bind(format!("{}:{}", settings.server.host, port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;
    log_server_ready(port);

    // Graceful shutdown com signal handling
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log_info("🛑 Server shut down gracefully");
    Ok(())
}

fn build_store(settings: &Settings) -> anyhow::Result<Arc<dyn RecordStore>> {
    let supabase = &settings.supabase;
    match (&supabase.url, &supabase.anon_key) {
        (Some(url), Some(key)) if supabase.is_configured() => {
            let client = supabase::SupabaseClient::with_timeouts(url, key.clone(), supabase.timeout_seconds, 5)
                .context("Failed to build Supabase client")?;
            log_info("✅ Supabase configurado - usando PostgREST");
            Ok(Arc::new(SupabaseStore::new(client)))
        }
        _ => {
            log_warning("⚠️  SUPABASE_URL/SUPABASE_ANON_KEY ausentes - usando store em memória com dados iniciais");
            Ok(Arc::new(MemoryStore::with_seed().context("Failed to load seed data")?))
        }
    }
}

/// Signal handler para graceful shutdown
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log_error(&format!("Failed to install Ctrl+C handler: {}", e));
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                log_error(&format!("Failed to install SIGTERM handler: {}", e));
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            log_info("🛑 Received Ctrl+C, shutting down gracefully...");
        },
        _ = terminate => {
            log_info("🛑 Received SIGTERM, shutting down gracefully...");
        }
    }
}

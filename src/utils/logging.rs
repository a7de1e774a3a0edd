use tracing::{debug, error, info, warn};

pub fn log_request_received(endpoint: &str, method: &str) {
    info!("Request received: {} {}", method, endpoint);
}

pub fn log_request_processed(endpoint: &str, status: u16, duration_ms: u64) {
    info!(
        "Request processed: {} - Status: {} - Duration: {}ms",
        endpoint, status, duration_ms
    );
}

pub fn log_store_error(tabela: &str, operacao: &str, error: &str) {
    error!("Store error: {} ({}) - Error: {}", tabela, operacao, error);
}

pub fn log_schedule_conflict(funcionario_id: &str, data: &str, conflitos: usize) {
    warn!(
        "⚠️ Conflito de horário: {} em {} - {} agendamento(s) existente(s)",
        funcionario_id, data, conflitos
    );
}

pub fn log_bulk_summary(operacao: &str, solicitados: usize, sucesso: usize) {
    let falhas = solicitados - sucesso.min(solicitados);
    if falhas == 0 {
        info!("📦 {}: {}/{} concluídos", operacao, sucesso, solicitados);
    } else {
        warn!(
            "📦 {}: {}/{} concluídos, {} falha(s)",
            operacao, sucesso, solicitados, falhas
        );
    }
}

pub fn log_config_loaded(env: &str) {
    info!("Configuration loaded successfully for environment: {}", env);
}

pub fn log_server_startup(port: u16) {
    info!("🚀 Agenda de equipe server starting on port {}", port);
}

pub fn log_server_ready(port: u16) {
    info!("✅ Server ready and listening on http://0.0.0.0:{}", port);
}

pub fn log_health_check() {
    debug!("Health check requested");
}

pub fn log_readiness_check() {
    debug!("Readiness check requested");
}

pub fn log_validation_error(field: &str, message: &str) {
    warn!("Validation error: {} - {}", field, message);
}

pub fn log_info(message: &str) {
    info!("{}", message);
}

pub fn log_error(message: &str) {
    error!("{}", message);
}

pub fn log_warning(message: &str) {
    warn!("{}", message);
}

//! Tipos de erro para o crate supabase

use thiserror::Error;

/// Erros do cliente PostgREST
#[derive(Debug, Error)]
pub enum SupabaseError {
    /// Erro de requisição HTTP
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Erro retornado pelo PostgREST (status code não-2xx)
    #[error("Supabase API error (status {status}): {message}")]
    ApiError {
        status: u16,
        message: String,
        /// Código PostgREST, e.g. "PGRST116" (nenhuma linha) ou "23505" (unique)
        code: Option<String>,
    },

    /// Erro de parsing JSON
    #[error("JSON parsing failed: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Erro de configuração
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Operação recusada antes de ir para a rede
    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl SupabaseError {
    /// `true` quando o PostgREST respondeu que o registro não existe
    pub fn is_not_found(&self) -> bool {
        match self {
            SupabaseError::ApiError { status, code, .. } => {
                *status == 404 || code.as_deref() == Some("PGRST116")
            }
            _ => false,
        }
    }
}

/// Tipo Result padrão para o crate
pub type Result<T> = std::result::Result<T, SupabaseError>;

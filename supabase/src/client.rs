//! Cliente HTTP para a API REST (PostgREST) do Supabase

use crate::error::{Result, SupabaseError};
use crate::query::Query;
use reqwest::{Client as HttpClient, RequestBuilder, Response};
use serde_json::Value;
use std::time::Duration;

/// Cliente para as tabelas expostas em `{project_url}/rest/v1`
///
/// Usa a chave anônima (ou service role) tanto no header `apikey`
/// quanto em `Authorization: Bearer`, como o supabase-js faz.
#[derive(Clone)]
pub struct SupabaseClient {
    http_client: HttpClient,
    api_key: String,
    rest_url: String,
}

impl SupabaseClient {
    /// Cria um novo cliente
    ///
    /// # Timeouts
    ///
    /// - Total: 30s
    /// - Connect: 5s
    pub fn new(project_url: impl AsRef<str>, api_key: impl Into<String>) -> Result<Self> {
        Self::with_timeouts(project_url, api_key, 30, 5)
    }

    /// Cria um novo cliente com timeouts customizados
    pub fn with_timeouts(
        project_url: impl AsRef<str>,
        api_key: impl Into<String>,
        total_timeout_secs: u64,
        connect_timeout_secs: u64,
    ) -> Result<Self> {
        let project_url = project_url.as_ref().trim_end_matches('/');
        if project_url.is_empty() {
            return Err(SupabaseError::ConfigError("Supabase URL vazia".to_string()));
        }

        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(SupabaseError::ConfigError("Supabase API key vazia".to_string()));
        }

        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(total_timeout_secs))
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .build()
            .map_err(|e| SupabaseError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            api_key,
            rest_url: format!("{}/rest/v1", project_url),
        })
    }

    /// `GET /{table}?filtros` — retorna todas as linhas encontradas
    pub async fn select(&self, table: &str, query: &Query) -> Result<Vec<Value>> {
        let url = self.url(table, query);
        tracing::debug!("GET {}", url);

        let response = self.authorized(self.http_client.get(&url)).send().await?;
        let response = self.handle_response(response).await?;
        Ok(response.json().await?)
    }

    /// `POST /{table}` — insere um registro e retorna a linha criada
    pub async fn insert(&self, table: &str, record: &Value) -> Result<Value> {
        let url = self.url(table, &Query::new());
        tracing::debug!(
            "POST {} with body: {}",
            url,
            serde_json::to_string(record).unwrap_or_default()
        );

        let response = self
            .authorized(self.http_client.post(&url))
            .header("Prefer", "return=representation")
            .json(&Value::Array(vec![record.clone()]))
            .send()
            .await?;
        let response = self.handle_response(response).await?;

        let rows: Vec<Value> = response.json().await?;
        rows.into_iter().next().ok_or_else(|| SupabaseError::ApiError {
            status: 200,
            message: format!("Insert em '{}' não retornou a linha criada", table),
            code: None,
        })
    }

    /// `PATCH /{table}?filtros` — atualiza as linhas que casam com o filtro
    pub async fn update(&self, table: &str, query: &Query, patch: &Value) -> Result<Vec<Value>> {
        if !query.has_filters() {
            return Err(SupabaseError::ValidationError(format!(
                "Update em '{}' sem filtro recusado",
                table
            )));
        }

        let url = self.url(table, query);
        tracing::debug!("PATCH {}", url);

        let response = self
            .authorized(self.http_client.patch(&url))
            .header("Prefer", "return=representation")
            .json(patch)
            .send()
            .await?;
        let response = self.handle_response(response).await?;
        Ok(response.json().await?)
    }

    /// `DELETE /{table}?filtros` — retorna as linhas removidas
    pub async fn delete(&self, table: &str, query: &Query) -> Result<Vec<Value>> {
        if !query.has_filters() {
            return Err(SupabaseError::ValidationError(format!(
                "Delete em '{}' sem filtro recusado",
                table
            )));
        }

        let url = self.url(table, query);
        tracing::debug!("DELETE {}", url);

        let response = self
            .authorized(self.http_client.delete(&url))
            .header("Prefer", "return=representation")
            .send()
            .await?;
        let response = self.handle_response(response).await?;
        Ok(response.json().await?)
    }

    /// Consulta mínima para verificar conectividade e credenciais
    pub async fn ping(&self, table: &str) -> Result<()> {
        self.select(table, &Query::new().select("id").limit(1)).await?;
        Ok(())
    }

    fn url(&self, table: &str, query: &Query) -> String {
        let query_string = query.to_query_string();
        if query_string.is_empty() {
            format!("{}/{}", self.rest_url, table)
        } else {
            format!("{}/{}?{}", self.rest_url, table, query_string)
        }
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
    }

    /// Processa a resposta HTTP e trata erros
    async fn handle_response(&self, response: Response) -> Result<Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let status_code = status.as_u16();
        let error_body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        tracing::error!("Supabase API error ({}): {}", status_code, error_body);

        // PostgREST responde {"code": "...", "message": "...", "details": ..., "hint": ...}
        let (message, code) = match serde_json::from_str::<Value>(&error_body) {
            Ok(json) => {
                let message = json
                    .get("message")
                    .or_else(|| json.get("error"))
                    .and_then(|v| v.as_str())
                    .unwrap_or(&error_body)
                    .to_string();
                let code = json.get("code").and_then(|v| v.as_str()).map(String::from);
                (message, code)
            }
            Err(_) => (error_body, None),
        };

        Err(SupabaseError::ApiError {
            status: status_code,
            message,
            code,
        })
    }

    /// Obtém a URL base REST (`.../rest/v1`)
    pub fn rest_url(&self) -> &str {
        &self.rest_url
    }
}

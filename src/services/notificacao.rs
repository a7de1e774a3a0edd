//! Notificação de demandas por WhatsApp via webhook (n8n + Evolution API)
//!
//! O webhook recebe `{ tarefa, funcionario, mensagem, timestamp }` e cuida
//! do envio; o telefone fica configurado do lado do n8n.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

use crate::models::{Demanda, Funcionario, Prioridade};

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("Webhook de notificação não configurado (N8N_WEBHOOK_URL)")]
    NaoConfigurado,

    #[error("Falha ao chamar o webhook: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Webhook respondeu {status}: {corpo}")]
    Rejeitada { status: u16, corpo: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TarefaNotificada {
    pub id: String,
    pub titulo: String,
    pub descricao: String,
    pub prazo: Option<NaiveDate>,
    pub importancia: Prioridade,
    pub funcionario_responsavel_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notificacao {
    pub tarefa: TarefaNotificada,
    pub funcionario: Option<Funcionario>,
    pub mensagem: String,
    pub timestamp: DateTime<Utc>,
}

impl Notificacao {
    pub fn para_demanda(demanda: &Demanda, funcionario: Option<Funcionario>) -> Self {
        Self {
            tarefa: TarefaNotificada {
                id: demanda.id.clone(),
                titulo: demanda.titulo.clone(),
                descricao: demanda.descricao.clone(),
                prazo: demanda.prazo,
                importancia: demanda.importancia,
                funcionario_responsavel_id: demanda.funcionario_id.clone(),
            },
            funcionario,
            mensagem: demanda.mensagem_whatsapp(),
            timestamp: Utc::now(),
        }
    }
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn enviar(&self, notificacao: &Notificacao) -> Result<(), NotificationError>;
}

/// POST JSON para a URL do webhook; qualquer status fora de 2xx é falha
#[derive(Clone)]
pub struct WebhookNotifier {
    client: Client,
    url: Option<String>,
}

impl WebhookNotifier {
    pub fn new(url: Option<String>, timeout_seconds: u64) -> Result<Self, NotificationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            url: url.filter(|u| !u.trim().is_empty()),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.url.is_some()
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn enviar(&self, notificacao: &Notificacao) -> Result<(), NotificationError> {
        let url = self.url.as_deref().ok_or(NotificationError::NaoConfigurado)?;

        tracing::info!(
            "📤 Enviando notificação da demanda {} para o webhook",
            notificacao.tarefa.id
        );

        let response = self.client.post(url).json(notificacao).send().await?;
        let status = response.status();

        if status.is_success() {
            tracing::info!("✅ Webhook aceitou a notificação ({})", status.as_u16());
            return Ok(());
        }

        let corpo = response.text().await.unwrap_or_default();
        tracing::error!("❌ Webhook respondeu {}: {}", status.as_u16(), corpo);
        Err(NotificationError::Rejeitada {
            status: status.as_u16(),
            corpo,
        })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Mutex;

    /// Guarda as notificações em vez de enviá-las
    #[derive(Default)]
    pub struct NotificadorGravador {
        pub enviadas: Mutex<Vec<Notificacao>>,
    }

    #[async_trait]
    impl Notifier for NotificadorGravador {
        async fn enviar(&self, notificacao: &Notificacao) -> Result<(), NotificationError> {
            self.enviadas.lock().unwrap().push(notificacao.clone());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn demanda() -> Demanda {
        serde_json::from_value(json!({
            "id": "d1",
            "titulo": "Revisar contratos",
            "descricao": "Contratos de renovação",
            "funcionario_id": "guido",
            "importancia": "alta",
            "prazo": "2025-08-15"
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_webhook_receives_payload() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/webhook/zap")
                    .header("content-type", "application/json")
                    .json_body_partial(
                        r#"{
                            "tarefa": {"id": "d1", "titulo": "Revisar contratos", "prazo": "2025-08-15",
                                       "importancia": "alta", "funcionario_responsavel_id": "guido"},
                            "mensagem": "Olá! Você foi designado para: Revisar contratos. Prazo: 15/08/2025"
                        }"#,
                    );
                then.status(200).body("ok");
            })
            .await;

        let notifier = WebhookNotifier::new(Some(server.url("/webhook/zap")), 5).unwrap();
        notifier
            .enviar(&Notificacao::para_demanda(&demanda(), None))
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_success_status_is_an_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/webhook/zap");
                then.status(500).body("instância desconectada");
            })
            .await;

        let notifier = WebhookNotifier::new(Some(server.url("/webhook/zap")), 5).unwrap();
        let err = notifier
            .enviar(&Notificacao::para_demanda(&demanda(), None))
            .await
            .unwrap_err();

        match err {
            NotificationError::Rejeitada { status, corpo } => {
                assert_eq!(status, 500);
                assert_eq!(corpo, "instância desconectada");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_url() {
        let notifier = WebhookNotifier::new(Some("  ".to_string()), 5).unwrap();
        assert!(!notifier.is_configured());
        assert!(matches!(
            notifier.enviar(&Notificacao::para_demanda(&demanda(), None)).await,
            Err(NotificationError::NaoConfigurado)
        ));
    }
}

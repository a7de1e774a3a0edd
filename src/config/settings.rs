use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use crate::agenda::grid::{HORA_FIM_PADRAO, HORA_INICIO_PADRAO};
use crate::services::agenda_service::LIMITE_LOTE_PADRAO;

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub supabase: SupabaseSettings,
    #[serde(default)]
    pub agenda: AgendaSettings,
    #[serde(default)]
    pub notificacao: NotificacaoSettings,
    #[serde(default)]
    pub cache: CacheSettings,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SupabaseSettings {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub anon_key: Option<String>,
    #[serde(default = "timeout_padrao")]
    pub timeout_seconds: u64,
}

impl SupabaseSettings {
    /// URL e chave preenchidas; sem elas o servidor sobe com o store em memória
    pub fn is_configured(&self) -> bool {
        let preenchido = |v: &Option<String>| v.as_deref().map_or(false, |s| !s.trim().is_empty());
        preenchido(&self.url) && preenchido(&self.anon_key)
    }
}

impl Default for SupabaseSettings {
    fn default() -> Self {
        Self {
            url: None,
            anon_key: None,
            timeout_seconds: timeout_padrao(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct AgendaSettings {
    pub hora_inicio: u32,
    pub hora_fim: u32,
    /// Requests simultâneos ao store nas operações em massa
    pub limite_lote: usize,
}

impl Default for AgendaSettings {
    fn default() -> Self {
        Self {
            hora_inicio: HORA_INICIO_PADRAO,
            hora_fim: HORA_FIM_PADRAO,
            limite_lote: LIMITE_LOTE_PADRAO,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NotificacaoSettings {
    /// Webhook do n8n que dispara a mensagem de WhatsApp
    #[serde(default)]
    pub webhook_url: Option<String>,
    #[serde(default = "timeout_padrao")]
    pub timeout_seconds: u64,
}

impl Default for NotificacaoSettings {
    fn default() -> Self {
        Self {
            webhook_url: None,
            timeout_seconds: timeout_padrao(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CacheSettings {
    /// 0 desliga o cache de listagens
    pub ttl_seconds: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self { ttl_seconds: 300 }
    }
}

fn timeout_padrao() -> u64 {
    10
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let mut builder = Config::builder()
            // Arquivo de configuração base
            .add_source(File::with_name("config/default").required(false))
            // Arquivo específico do ambiente
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false));

        // Nomes usados pelo front-end e pelo deploy
        if let Ok(url) = std::env::var("SUPABASE_URL") {
            builder = builder.set_override("supabase.url", url)?;
        }
        if let Ok(key) = std::env::var("SUPABASE_ANON_KEY") {
            builder = builder.set_override("supabase.anon_key", key)?;
        }
        if let Ok(webhook) = std::env::var("N8N_WEBHOOK_URL") {
            builder = builder.set_override("notificacao.webhook_url", webhook)?;
        }
        if let Ok(port) = std::env::var("PORT") {
            builder = builder.set_override("server.port", port)?;
        }

        builder = builder.add_source(Environment::with_prefix("AGENDA").separator("__"));

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.agenda.hora_fim > 23 || self.agenda.hora_inicio > self.agenda.hora_fim {
            return Err(ConfigError::Message(format!(
                "Grade inválida: {}h às {}h",
                self.agenda.hora_inicio, self.agenda.hora_fim
            )));
        }
        if self.agenda.limite_lote == 0 {
            return Err(ConfigError::Message(
                "agenda.limite_lote deve ser maior que zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn from_toml(toml: &str) -> Settings {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_defaults_when_sections_missing() {
        let settings = from_toml("[server]\nhost = \"127.0.0.1\"\nport = 3000\n");

        assert_eq!(settings.server.port, 3000);
        assert_eq!(settings.agenda.hora_inicio, 8);
        assert_eq!(settings.agenda.hora_fim, 19);
        assert_eq!(settings.cache.ttl_seconds, 300);
        assert!(!settings.supabase.is_configured());
        assert!(settings.notificacao.webhook_url.is_none());
    }

    #[test]
    fn test_supabase_configured_requires_url_and_key() {
        let settings = from_toml(
            "[supabase]\nurl = \"https://x.supabase.co\"\nanon_key = \"  \"\n",
        );
        assert!(!settings.supabase.is_configured());

        let settings = from_toml(
            "[supabase]\nurl = \"https://x.supabase.co\"\nanon_key = \"abc\"\ntimeout_seconds = 5\n",
        );
        assert!(settings.supabase.is_configured());
        assert_eq!(settings.supabase.timeout_seconds, 5);
    }

    #[test]
    fn test_grid_ending_at_seven_pm() {
        let settings = from_toml("[agenda]\nhora_fim = 18\n");
        assert!(settings.validate().is_ok());
        assert_eq!(settings.agenda.hora_inicio, 8);
        assert_eq!(settings.agenda.limite_lote, LIMITE_LOTE_PADRAO);

        let grade =
            crate::agenda::TimeSlotGrid::new(settings.agenda.hora_inicio, settings.agenda.hora_fim).unwrap();
        assert_eq!(grade.len(), 21);
        assert_eq!(grade.slots().last().map(String::as_str), Some("18:30"));
        assert_eq!(grade.fim_do_dia(), "19:00");
    }

    #[test]
    fn test_validate_rejects_zero_batch_limit() {
        let settings = from_toml("[agenda]\nlimite_lote = 0\n");
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_inverted_grid() {
        let settings = from_toml("[agenda]\nhora_inicio = 18\nhora_fim = 9\n");
        assert!(settings.validate().is_err());
        assert!(Settings::default().validate().is_ok());
    }
}

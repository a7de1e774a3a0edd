pub mod agendamento;
pub mod demanda;
pub mod funcionario;
pub mod meta;
pub mod processo;
pub mod tarefa;

pub use agendamento::*;
pub use demanda::*;
pub use funcionario::*;
pub use meta::*;
pub use processo::*;
pub use tarefa::*;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

static COR_HEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#[0-9a-fA-F]{6}$").expect("regex de cor válida"));
static HORA_HHMM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([01]\d|2[0-3]):[0-5]\d$").expect("regex de horário válida"));

/// Corpo de criação ou alteração recebido pela API
pub trait Entrada: Serialize + DeserializeOwned + Send + Sync {
    /// Regras checadas antes de qualquer chamada ao banco
    fn validar(&self) -> Result<(), String>;

    /// Completa campos derivados (e.g. id a partir do nome)
    fn normalizar(&mut self) {}
}

/// Usada por tarefas (prioridade) e demandas (importância)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Prioridade {
    Baixa,
    #[default]
    Media,
    Alta,
}

pub fn is_cor_valida(cor: &str) -> bool {
    COR_HEX.is_match(cor)
}

pub fn is_horario_valido(horario: &str) -> bool {
    HORA_HHMM.is_match(horario)
}

pub(crate) fn obrigatorio(campo: &str, valor: &str) -> Result<(), String> {
    if valor.trim().is_empty() {
        Err(format!("Campo obrigatório: {}", campo))
    } else {
        Ok(())
    }
}

/// Aceita `""` e `null` como ausência de data (formulários enviam string vazia)
pub(crate) fn data_opcional<'de, D>(deserializer: D) -> Result<Option<chrono::NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => {
            // timestamps completos também aparecem em registros antigos
            let date_part = s.get(..10).unwrap_or(s);
            chrono::NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
                .map(Some)
                .map_err(serde::de::Error::custom)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cor_valida() {
        assert!(is_cor_valida("#2563eb"));
        assert!(is_cor_valida("#ABCDEF"));
        assert!(!is_cor_valida("2563eb"));
        assert!(!is_cor_valida("#2563e"));
    }

    #[test]
    fn test_horario_valido() {
        assert!(is_horario_valido("09:00"));
        assert!(is_horario_valido("23:30"));
        assert!(!is_horario_valido("24:00"));
        assert!(!is_horario_valido("9:00"));
    }

    #[test]
    fn test_prioridade_ordering() {
        assert!(Prioridade::Alta > Prioridade::Media);
        assert!(Prioridade::Media > Prioridade::Baixa);
    }
}

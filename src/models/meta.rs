use serde::{Deserialize, Serialize};

use super::{obrigatorio, Entrada};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    pub id: String,
    #[serde(default)]
    pub funcionario_id: Option<String>,
    pub tipo: String,
    pub titulo: String,
    pub valor_alvo: f64,
    #[serde(default)]
    pub valor_atual: f64,
    /// e.g. "2025-08"
    pub periodo: String,
}

impl Meta {
    /// Percentual atingido, limitado a 100
    pub fn progresso(&self) -> f64 {
        if self.valor_alvo <= 0.0 {
            return 0.0;
        }
        (self.valor_atual / self.valor_alvo * 100.0).min(100.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NovaMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub funcionario_id: Option<String>,
    pub tipo: String,
    pub titulo: String,
    pub valor_alvo: f64,
    #[serde(default)]
    pub valor_atual: f64,
    pub periodo: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlteracaoMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tipo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub titulo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valor_alvo: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valor_atual: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub periodo: Option<String>,
}

fn validar_alvo(valor: f64) -> Result<(), String> {
    if valor.is_finite() && valor > 0.0 {
        Ok(())
    } else {
        Err("valor_alvo deve ser positivo".to_string())
    }
}

impl Entrada for NovaMeta {
    fn validar(&self) -> Result<(), String> {
        obrigatorio("tipo", &self.tipo)?;
        obrigatorio("titulo", &self.titulo)?;
        obrigatorio("periodo", &self.periodo)?;
        validar_alvo(self.valor_alvo)
    }
}

impl Entrada for AlteracaoMeta {
    fn validar(&self) -> Result<(), String> {
        match self.valor_alvo {
            Some(valor) => validar_alvo(valor),
            None => Ok(()),
        }
    }
}

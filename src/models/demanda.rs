use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{data_opcional, obrigatorio, Entrada, Prioridade};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusDemanda {
    #[default]
    Pendente,
    EmAndamento,
    Concluida,
    Cancelada,
}

/// Situação do prazo de uma demanda em relação a hoje
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "tipo", content = "dias", rename_all = "snake_case")]
pub enum StatusPrazo {
    /// Dias de atraso
    Atrasado(i64),
    Hoje,
    /// Até 2 dias
    Urgente(i64),
    /// Até 7 dias
    Proximo(i64),
    Normal(i64),
}

impl StatusPrazo {
    pub fn calcular(prazo: NaiveDate, hoje: NaiveDate) -> Self {
        let dias = (prazo - hoje).num_days();
        match dias {
            d if d < 0 => StatusPrazo::Atrasado(-d),
            0 => StatusPrazo::Hoje,
            d if d <= 2 => StatusPrazo::Urgente(d),
            d if d <= 7 => StatusPrazo::Proximo(d),
            d => StatusPrazo::Normal(d),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Demanda {
    pub id: String,
    pub titulo: String,
    #[serde(default)]
    pub descricao: String,
    #[serde(default, alias = "funcionario_responsavel_id")]
    pub funcionario_id: Option<String>,
    #[serde(default)]
    pub tarefa_id: Option<String>,
    #[serde(default)]
    pub importancia: Prioridade,
    #[serde(default, deserialize_with = "data_opcional")]
    pub prazo: Option<NaiveDate>,
    #[serde(default)]
    pub status: StatusDemanda,
    #[serde(default)]
    pub observacoes: Option<String>,
    #[serde(default)]
    pub telefone_whatsapp: Option<String>,
    #[serde(default)]
    pub mensagem_whatsapp: Option<String>,
}

impl Demanda {
    /// `None` para demandas sem prazo e para as já concluídas ou canceladas
    pub fn status_prazo(&self, hoje: NaiveDate) -> Option<StatusPrazo> {
        match self.status {
            StatusDemanda::Concluida | StatusDemanda::Cancelada => None,
            _ => self.prazo.map(|prazo| StatusPrazo::calcular(prazo, hoje)),
        }
    }

    /// Mensagem enviada ao responsável quando nenhuma personalizada foi cadastrada
    pub fn mensagem_padrao(&self) -> String {
        let prazo = self
            .prazo
            .map(|p| p.format("%d/%m/%Y").to_string())
            .unwrap_or_else(|| "sem prazo".to_string());
        format!("Olá! Você foi designado para: {}. Prazo: {}", self.titulo, prazo)
    }

    pub fn mensagem_whatsapp(&self) -> String {
        match self.mensagem_whatsapp.as_deref().map(str::trim) {
            Some(m) if !m.is_empty() => m.to_string(),
            _ => self.mensagem_padrao(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NovaDemanda {
    pub titulo: String,
    #[serde(default)]
    pub descricao: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub funcionario_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tarefa_id: Option<String>,
    #[serde(default)]
    pub importancia: Prioridade,
    #[serde(default, deserialize_with = "data_opcional")]
    pub prazo: Option<NaiveDate>,
    #[serde(default)]
    pub status: StatusDemanda,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observacoes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telefone_whatsapp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mensagem_whatsapp: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlteracaoDemanda {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub titulo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descricao: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub funcionario_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tarefa_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub importancia: Option<Prioridade>,
    #[serde(default, deserialize_with = "data_opcional", skip_serializing_if = "Option::is_none")]
    pub prazo: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<StatusDemanda>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observacoes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telefone_whatsapp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mensagem_whatsapp: Option<String>,
}

impl Entrada for NovaDemanda {
    fn validar(&self) -> Result<(), String> {
        obrigatorio("titulo", &self.titulo)
    }

    fn normalizar(&mut self) {
        // selects do formulário mandam "" para "nenhum"
        for campo in [&mut self.funcionario_id, &mut self.tarefa_id] {
            if campo.as_deref().map_or(false, |v| v.trim().is_empty()) {
                *campo = None;
            }
        }
    }
}

impl Entrada for AlteracaoDemanda {
    fn validar(&self) -> Result<(), String> {
        match &self.titulo {
            Some(titulo) => obrigatorio("titulo", titulo),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_deadline_classification() {
        let hoje = date("2025-08-04");
        assert_eq!(StatusPrazo::calcular(date("2025-08-01"), hoje), StatusPrazo::Atrasado(3));
        assert_eq!(StatusPrazo::calcular(hoje, hoje), StatusPrazo::Hoje);
        assert_eq!(StatusPrazo::calcular(date("2025-08-06"), hoje), StatusPrazo::Urgente(2));
        assert_eq!(StatusPrazo::calcular(date("2025-08-11"), hoje), StatusPrazo::Proximo(7));
        assert_eq!(StatusPrazo::calcular(date("2025-08-12"), hoje), StatusPrazo::Normal(8));
    }

    #[test]
    fn test_deadline_serializes_with_type_tag() {
        assert_eq!(
            serde_json::to_value(StatusPrazo::Urgente(1)).unwrap(),
            json!({"tipo": "urgente", "dias": 1})
        );
    }

    #[test]
    fn test_finished_demand_has_no_deadline_status() {
        let demanda: Demanda = serde_json::from_value(json!({
            "id": "1",
            "titulo": "Relatório",
            "prazo": "2025-08-01",
            "status": "concluida"
        }))
        .unwrap();
        assert_eq!(demanda.status_prazo(date("2025-08-04")), None);
    }

    #[test]
    fn test_empty_deadline_is_none() {
        let demanda: Demanda =
            serde_json::from_value(json!({"id": "1", "titulo": "X", "prazo": ""})).unwrap();
        assert_eq!(demanda.prazo, None);
        assert_eq!(demanda.importancia, Prioridade::Media);
        assert_eq!(demanda.status, StatusDemanda::Pendente);
    }

    #[test]
    fn test_default_message() {
        let demanda: Demanda = serde_json::from_value(json!({
            "id": "1",
            "titulo": "Revisar contratos",
            "prazo": "2025-08-15T00:00:00"
        }))
        .unwrap();
        assert_eq!(
            demanda.mensagem_whatsapp(),
            "Olá! Você foi designado para: Revisar contratos. Prazo: 15/08/2025"
        );
    }
}

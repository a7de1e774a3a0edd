use serde::{Deserialize, Serialize};

use super::{is_cor_valida, is_horario_valido, obrigatorio, Entrada};
use crate::utils::normalization::slugify;

pub const CORES_DISPONIVEIS: [&str; 8] = [
    "#2563eb", "#10b981", "#f59e0b", "#ef4444", "#8b5cf6", "#06b6d4", "#ec4899", "#64748b",
];

/// Valor aceito em `horario_inicio`/`horario_fim` para quem não tem expediente fixo
pub const HORARIO_FLEXIVEL: &str = "flexible";

fn cor_padrao() -> String {
    CORES_DISPONIVEIS[0].to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Funcionario {
    pub id: String,
    pub nome: String,
    #[serde(default, alias = "horarioInicio")]
    pub horario_inicio: Option<String>,
    #[serde(default, alias = "horarioFim")]
    pub horario_fim: Option<String>,
    #[serde(default = "cor_padrao")]
    pub cor: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NovoFuncionario {
    /// Derivado do nome quando omitido
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub nome: String,
    #[serde(default, alias = "horarioInicio")]
    pub horario_inicio: Option<String>,
    #[serde(default, alias = "horarioFim")]
    pub horario_fim: Option<String>,
    #[serde(default = "cor_padrao")]
    pub cor: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlteracaoFuncionario {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nome: Option<String>,
    #[serde(default, alias = "horarioInicio", skip_serializing_if = "Option::is_none")]
    pub horario_inicio: Option<String>,
    #[serde(default, alias = "horarioFim", skip_serializing_if = "Option::is_none")]
    pub horario_fim: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cor: Option<String>,
}

fn validar_expediente(campo: &str, horario: Option<&str>) -> Result<(), String> {
    match horario.map(str::trim) {
        None | Some("") => Ok(()),
        Some(HORARIO_FLEXIVEL) => Ok(()),
        Some(h) if is_horario_valido(h) => Ok(()),
        Some(h) => Err(format!("{} inválido: '{}' (use HH:MM)", campo, h)),
    }
}

fn validar_cor(cor: &str) -> Result<(), String> {
    if is_cor_valida(cor) {
        Ok(())
    } else {
        Err(format!("Cor inválida: '{}' (use #RRGGBB)", cor))
    }
}

impl Entrada for NovoFuncionario {
    fn validar(&self) -> Result<(), String> {
        obrigatorio("nome", &self.nome)?;
        validar_expediente("horario_inicio", self.horario_inicio.as_deref())?;
        validar_expediente("horario_fim", self.horario_fim.as_deref())?;
        validar_cor(&self.cor)?;

        if self.id.as_deref().map_or(false, |id| id.trim().is_empty()) || slugify(&self.nome).is_empty() {
            return Err("Não foi possível gerar um id a partir do nome".to_string());
        }
        Ok(())
    }

    fn normalizar(&mut self) {
        self.nome = self.nome.trim().to_string();
        if self.id.is_none() {
            self.id = Some(slugify(&self.nome));
        }
    }
}

impl Entrada for AlteracaoFuncionario {
    fn validar(&self) -> Result<(), String> {
        if let Some(nome) = &self.nome {
            obrigatorio("nome", nome)?;
        }
        validar_expediente("horario_inicio", self.horario_inicio.as_deref())?;
        validar_expediente("horario_fim", self.horario_fim.as_deref())?;
        if let Some(cor) = &self.cor {
            validar_cor(cor)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_id_derived_from_name() {
        let mut novo: NovoFuncionario = serde_json::from_value(json!({
            "nome": " Funcionário de Teste ",
            "horario_inicio": "09:00",
            "horario_fim": "17:30"
        }))
        .unwrap();

        novo.validar().unwrap();
        novo.normalizar();
        assert_eq!(novo.id.as_deref(), Some("funcionario_de_teste"));
        assert_eq!(novo.cor, "#2563eb");
    }

    #[test]
    fn test_flexible_schedule_is_accepted() {
        let novo: NovoFuncionario = serde_json::from_value(json!({
            "nome": "Thais",
            "horario_inicio": "flexible",
            "horario_fim": "flexible",
            "cor": "#ec4899"
        }))
        .unwrap();
        assert!(novo.validar().is_ok());
    }

    #[test]
    fn test_invalid_color_and_time() {
        let mut novo: NovoFuncionario =
            serde_json::from_value(json!({"nome": "Pedro", "cor": "verde"})).unwrap();
        assert!(novo.validar().unwrap_err().contains("Cor"));

        novo.cor = "#10b981".to_string();
        novo.horario_inicio = Some("9h".to_string());
        assert!(novo.validar().unwrap_err().contains("horario_inicio"));
    }

    #[test]
    fn test_update_skips_absent_fields() {
        let alteracao = AlteracaoFuncionario {
            cor: Some("#64748b".to_string()),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&alteracao).unwrap(), json!({"cor": "#64748b"}));
    }
}

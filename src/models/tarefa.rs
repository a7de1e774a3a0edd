use serde::{Deserialize, Serialize};

use super::{obrigatorio, Entrada, Prioridade};
use crate::utils::normalization::slugify;

pub const CATEGORIAS: [&str; 9] = [
    "gestao",
    "atendimento",
    "marketing",
    "engajamento",
    "conteudo",
    "produto",
    "interno",
    "vendas",
    "indisponibilidade",
];

fn categoria_padrao() -> String {
    "gestao".to_string()
}

fn tempo_padrao() -> u32 {
    30
}

fn sim() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tarefa {
    pub id: String,
    pub nome: String,
    #[serde(default = "categoria_padrao")]
    pub categoria: String,
    #[serde(default = "tempo_padrao", alias = "tempoEstimado")]
    pub tempo_estimado: u32,
    #[serde(default)]
    pub descricao: Option<String>,
    #[serde(default)]
    pub prioridade: Prioridade,
    /// `false` para almoço, pausas e indisponibilidade
    #[serde(default = "sim")]
    pub computar_horas: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NovaTarefa {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub nome: String,
    #[serde(default = "categoria_padrao")]
    pub categoria: String,
    #[serde(default = "tempo_padrao", alias = "tempoEstimado")]
    pub tempo_estimado: u32,
    #[serde(default)]
    pub descricao: Option<String>,
    #[serde(default)]
    pub prioridade: Prioridade,
    #[serde(default = "sim")]
    pub computar_horas: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlteracaoTarefa {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nome: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categoria: Option<String>,
    #[serde(default, alias = "tempoEstimado", skip_serializing_if = "Option::is_none")]
    pub tempo_estimado: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descricao: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prioridade: Option<Prioridade>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub computar_horas: Option<bool>,
}

fn validar_tempo(tempo: u32) -> Result<(), String> {
    if tempo == 0 {
        Err("tempo_estimado deve ser maior que zero".to_string())
    } else {
        Ok(())
    }
}

impl Entrada for NovaTarefa {
    fn validar(&self) -> Result<(), String> {
        obrigatorio("nome", &self.nome)?;
        obrigatorio("categoria", &self.categoria)?;
        validar_tempo(self.tempo_estimado)?;
        if slugify(self.id.as_deref().unwrap_or(&self.nome)).is_empty() {
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

impl Entrada for AlteracaoTarefa {
    fn validar(&self) -> Result<(), String> {
        if let Some(nome) = &self.nome {
            obrigatorio("nome", nome)?;
        }
        if let Some(tempo) = self.tempo_estimado {
            validar_tempo(tempo)?;
        }
        Ok(())
    }
}

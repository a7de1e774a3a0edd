use serde::{Deserialize, Serialize};

use super::{obrigatorio, Entrada};

/// Etapa de um processo; `tempo` é texto livre ("5 min")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passo {
    #[serde(default)]
    pub numero: u32,
    pub titulo: String,
    #[serde(default)]
    pub descricao: String,
    #[serde(default)]
    pub tempo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Processo {
    pub id: String,
    #[serde(default)]
    pub tarefa_id: Option<String>,
    pub titulo: String,
    #[serde(default)]
    pub descricao: Option<String>,
    #[serde(default)]
    pub tempo_estimado: Option<String>,
    #[serde(default)]
    pub frequencia: Option<String>,
    #[serde(default)]
    pub passos: Vec<Passo>,
    #[serde(default)]
    pub observacoes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NovoProcesso {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tarefa_id: Option<String>,
    pub titulo: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descricao: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tempo_estimado: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequencia: Option<String>,
    #[serde(default)]
    pub passos: Vec<Passo>,
    #[serde(default)]
    pub observacoes: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlteracaoProcesso {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tarefa_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub titulo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descricao: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tempo_estimado: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequencia: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passos: Option<Vec<Passo>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observacoes: Option<Vec<String>>,
}

/// Numeração sequencial a partir de 1, na ordem recebida
fn renumerar(passos: &mut [Passo]) {
    for (i, passo) in passos.iter_mut().enumerate() {
        passo.numero = i as u32 + 1;
    }
}

fn validar_passos(passos: &[Passo]) -> Result<(), String> {
    match passos.iter().position(|p| p.titulo.trim().is_empty()) {
        Some(i) => Err(format!("Passo {} sem título", i + 1)),
        None => Ok(()),
    }
}

impl Entrada for NovoProcesso {
    fn validar(&self) -> Result<(), String> {
        obrigatorio("titulo", &self.titulo)?;
        validar_passos(&self.passos)
    }

    fn normalizar(&mut self) {
        renumerar(&mut self.passos);
        self.observacoes.retain(|o| !o.trim().is_empty());
    }
}

impl Entrada for AlteracaoProcesso {
    fn validar(&self) -> Result<(), String> {
        if let Some(titulo) = &self.titulo {
            obrigatorio("titulo", titulo)?;
        }
        match &self.passos {
            Some(passos) => validar_passos(passos),
            None => Ok(()),
        }
    }

    fn normalizar(&mut self) {
        if let Some(passos) = self.passos.as_mut() {
            renumerar(passos);
        }
        if let Some(observacoes) = self.observacoes.as_mut() {
            observacoes.retain(|o| !o.trim().is_empty());
        }
    }
}

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::agenda::{recurrence::DiaSemana, GRANULARIDADE_MINUTOS};

pub fn default_duracao() -> u32 {
    GRANULARIDADE_MINUTOS
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusAgendamento {
    #[default]
    NaoIniciada,
    EmAndamento,
    Concluida,
    Atrasada,
}

impl StatusAgendamento {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusAgendamento::NaoIniciada => "nao_iniciada",
            StatusAgendamento::EmAndamento => "em_andamento",
            StatusAgendamento::Concluida => "concluida",
            StatusAgendamento::Atrasada => "atrasada",
        }
    }

    pub fn todos() -> [StatusAgendamento; 4] {
        [
            StatusAgendamento::NaoIniciada,
            StatusAgendamento::EmAndamento,
            StatusAgendamento::Concluida,
            StatusAgendamento::Atrasada,
        ]
    }
}

impl fmt::Display for StatusAgendamento {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Linha da tabela `agenda`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agendamento {
    pub id: String,
    pub funcionario_id: String,
    pub tarefa_id: String,
    pub data: NaiveDate,
    pub horario: String,
    #[serde(default = "default_duracao")]
    pub duracao: u32,
    #[serde(default)]
    pub horarios_ocupados: Vec<String>,
    #[serde(default)]
    pub status: StatusAgendamento,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tempo_inicio: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tempo_fim: Option<DateTime<Utc>>,
    /// Minutos efetivamente trabalhados, preenchido ao concluir
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tempo_real: Option<u32>,
}

/// Corpo de `POST /api/agenda` e também cada item gerado pela recorrência
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NovoAgendamento {
    #[serde(alias = "funcionario")]
    pub funcionario_id: String,
    #[serde(alias = "tarefa")]
    pub tarefa_id: String,
    pub data: NaiveDate,
    pub horario: String,
    #[serde(default = "default_duracao")]
    pub duracao: u32,
    /// Ignorado na entrada; sempre recalculado a partir de horario + duracao
    #[serde(default)]
    pub horarios_ocupados: Vec<String>,
    #[serde(default)]
    pub status: StatusAgendamento,
}

/// Corpo de `PUT /api/agenda/:id`; campos ausentes mantêm o valor atual
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AlteracaoAgendamento {
    #[serde(default, alias = "funcionario")]
    pub funcionario_id: Option<String>,
    #[serde(default, alias = "tarefa")]
    pub tarefa_id: Option<String>,
    #[serde(default)]
    pub data: Option<NaiveDate>,
    #[serde(default)]
    pub horario: Option<String>,
    #[serde(default)]
    pub duracao: Option<u32>,
    #[serde(default)]
    pub status: Option<StatusAgendamento>,
}

/// Opções de escrita que acompanham criação e edição
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct OpcoesEscrita {
    /// Remove agendamentos conflitantes em vez de recusar a operação
    #[serde(default)]
    pub sobrescrever: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CriarAgendamento {
    #[serde(flatten)]
    pub agendamento: NovoAgendamento,
    #[serde(flatten)]
    pub opcoes: OpcoesEscrita,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EditarAgendamento {
    #[serde(flatten)]
    pub alteracao: AlteracaoAgendamento,
    #[serde(flatten)]
    pub opcoes: OpcoesEscrita,
}

/// Atribuição recorrente: pessoas × horários × datas
#[derive(Debug, Clone, Deserialize)]
pub struct AgendamentoRecorrente {
    #[serde(alias = "funcionarios")]
    pub funcionario_ids: Vec<String>,
    #[serde(alias = "tarefa")]
    pub tarefa_id: String,
    pub horarios: Vec<String>,
    #[serde(default = "default_duracao")]
    pub duracao: u32,
    pub data_inicio: NaiveDate,
    pub data_fim: NaiveDate,
    pub dias_semana: BTreeSet<DiaSemana>,
    #[serde(default)]
    pub sobrescrever: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlteracaoStatus {
    pub status: StatusAgendamento,
}

/// Filtros de listagem e de exclusão em massa
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FiltroAgenda {
    #[serde(default)]
    pub funcionario_id: Option<String>,
    #[serde(default)]
    pub data: Option<NaiveDate>,
    #[serde(default)]
    pub data_inicio: Option<NaiveDate>,
    #[serde(default)]
    pub data_fim: Option<NaiveDate>,
    #[serde(default)]
    pub status: Option<StatusAgendamento>,
    /// Texto livre: nome do funcionário, data ou horário
    #[serde(default)]
    pub busca: Option<String>,
}

impl FiltroAgenda {
    pub fn is_empty(&self) -> bool {
        self.funcionario_id.is_none()
            && self.data.is_none()
            && self.data_inicio.is_none()
            && self.data_fim.is_none()
            && self.status.is_none()
            && self.busca.as_deref().map_or(true, |b| b.trim().is_empty())
    }
}

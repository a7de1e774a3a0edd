//! Colisão de horários entre agendamentos do mesmo funcionário no mesmo dia

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashSet;

use crate::models::Agendamento;

/// Agendamento existente que divide pelo menos um horário com o candidato
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conflito {
    pub agendamento_id: String,
    pub funcionario_id: String,
    pub data: NaiveDate,
    /// Horários em comum, na ordem do candidato
    pub horarios: Vec<String>,
}

/// Compara os horários ocupados do candidato com cada agendamento existente
/// do mesmo `funcionario_id` e `data`. `ignorar_id` exclui o próprio
/// agendamento em edições.
pub fn find_conflicts(
    ocupados: &[String],
    funcionario_id: &str,
    data: NaiveDate,
    existentes: &[Agendamento],
    ignorar_id: Option<&str>,
) -> Vec<Conflito> {
    existentes
        .iter()
        .filter(|a| a.funcionario_id == funcionario_id && a.data == data)
        .filter(|a| ignorar_id != Some(a.id.as_str()))
        .filter_map(|a| {
            let deles: HashSet<&str> = a.horarios_ocupados.iter().map(String::as_str).collect();
            let comuns: Vec<String> = ocupados
                .iter()
                .filter(|slot| deles.contains(slot.as_str()))
                .cloned()
                .collect();

            (!comuns.is_empty()).then(|| Conflito {
                agendamento_id: a.id.clone(),
                funcionario_id: a.funcionario_id.clone(),
                data: a.data,
                horarios: comuns,
            })
        })
        .collect()
}

/// `true` se os dois intervalos de horários se sobrepõem
pub fn overlaps(a: &[String], b: &[String]) -> bool {
    a.iter().any(|slot| b.contains(slot))
}

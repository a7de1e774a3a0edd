//! Expansão de agendamentos recorrentes por dia da semana

use chrono::{Datelike, NaiveDate};
use std::collections::BTreeSet;
use thiserror::Error;

/// 0 = domingo … 6 = sábado
pub type DiaSemana = u8;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecurrenceError {
    #[error("Data final {fim} anterior à data inicial {inicio}")]
    InvalidRange { inicio: NaiveDate, fim: NaiveDate },

    #[error("Dia da semana inválido: {0} (use 0 = domingo até 6 = sábado)")]
    InvalidWeekday(DiaSemana),
}

/// Datas em `[inicio, fim]`, em ordem crescente, cujo dia da semana está em
/// `dias_semana`. Conjunto vazio produz lista vazia.
pub fn generate_recurring_dates(
    inicio: NaiveDate,
    fim: NaiveDate,
    dias_semana: &BTreeSet<DiaSemana>,
) -> Result<Vec<NaiveDate>, RecurrenceError> {
    if fim < inicio {
        return Err(RecurrenceError::InvalidRange { inicio, fim });
    }
    if let Some(&dia) = dias_semana.iter().find(|&&d| d > 6) {
        return Err(RecurrenceError::InvalidWeekday(dia));
    }
    if dias_semana.is_empty() {
        return Ok(Vec::new());
    }

    Ok(inicio
        .iter_days()
        .take_while(|data| *data <= fim)
        .filter(|data| dias_semana.contains(&(data.weekday().num_days_from_sunday() as DiaSemana)))
        .collect())
}

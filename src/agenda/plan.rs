//! Plano de um agendamento recorrente: funcionários × horários × datas

use super::conflicts::overlaps;
use super::grid::TimeSlotGrid;
use super::recurrence::generate_recurring_dates;
use super::AgendaError;
use crate::models::{AgendamentoRecorrente, NovoAgendamento, StatusAgendamento};

/// Expande o modelo em `P * S * D` agendamentos, cada um com seus horários
/// ocupados já calculados. Um horário que não cabe na grade falharia em todas
/// as datas, então é recusado antes de gerar qualquer item.
pub fn plan_recurring(
    modelo: &AgendamentoRecorrente,
    grade: &TimeSlotGrid,
) -> Result<Vec<NovoAgendamento>, AgendaError> {
    let funcionarios = dedup(&modelo.funcionario_ids);
    let horarios = dedup(&modelo.horarios);

    if funcionarios.is_empty() {
        return Err(AgendaError::Validacao(
            "Selecione pelo menos um funcionário".to_string(),
        ));
    }
    if modelo.tarefa_id.trim().is_empty() {
        return Err(AgendaError::Validacao("Selecione uma tarefa".to_string()));
    }
    if horarios.is_empty() {
        return Err(AgendaError::Validacao(
            "Selecione pelo menos um horário".to_string(),
        ));
    }
    if modelo.dias_semana.is_empty() {
        return Err(AgendaError::Validacao(
            "Selecione pelo menos um dia da semana".to_string(),
        ));
    }

    let ocupados = horarios
        .iter()
        .map(|h| grade.occupied_slots(h, modelo.duracao))
        .collect::<Result<Vec<_>, _>>()?;

    for (i, a) in ocupados.iter().enumerate() {
        if let Some(b) = ocupados[i + 1..].iter().find(|b| overlaps(a, b)) {
            return Err(AgendaError::Validacao(format!(
                "Horários {} e {} se sobrepõem com duração de {} minutos",
                a[0], b[0], modelo.duracao
            )));
        }
    }

    let datas = generate_recurring_dates(modelo.data_inicio, modelo.data_fim, &modelo.dias_semana)?;

    let mut plano = Vec::with_capacity(datas.len() * funcionarios.len() * horarios.len());
    for data in &datas {
        for funcionario_id in &funcionarios {
            for (horario, horarios_ocupados) in horarios.iter().zip(&ocupados) {
                plano.push(NovoAgendamento {
                    funcionario_id: funcionario_id.clone(),
                    tarefa_id: modelo.tarefa_id.clone(),
                    data: *data,
                    horario: horario.clone(),
                    duracao: modelo.duracao,
                    horarios_ocupados: horarios_ocupados.clone(),
                    status: StatusAgendamento::NaoIniciada,
                });
            }
        }
    }

    Ok(plano)
}

fn dedup(valores: &[String]) -> Vec<String> {
    let mut vistos = Vec::with_capacity(valores.len());
    for v in valores.iter().map(|v| v.trim()).filter(|v| !v.is_empty()) {
        if !vistos.iter().any(|x: &String| x == v) {
            vistos.push(v.to_string());
        }
    }
    vistos
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agenda::{RecurrenceError, SlotError};
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn modelo(funcionarios: &[&str], horarios: &[&str], dias: &[u8]) -> AgendamentoRecorrente {
        AgendamentoRecorrente {
            funcionario_ids: funcionarios.iter().map(|s| s.to_string()).collect(),
            tarefa_id: "checkins".to_string(),
            horarios: horarios.iter().map(|s| s.to_string()).collect(),
            duracao: 30,
            data_inicio: date("2025-08-04"),
            data_fim: date("2025-08-10"),
            dias_semana: dias.iter().copied().collect(),
            sobrescrever: false,
        }
    }

    #[test]
    fn test_plan_size_is_people_times_slots_times_dates() {
        let m = modelo(&["guido", "pedro"], &["09:00", "14:00"], &[1, 3, 5]);
        let plano = plan_recurring(&m, TimeSlotGrid::padrao()).unwrap();

        assert_eq!(plano.len(), 2 * 2 * 3);
        assert!(plano.iter().all(|a| a.horarios_ocupados == vec![a.horario.clone()]));
        assert_eq!(plano[0].data, date("2025-08-04"));
        assert_eq!(plano.last().unwrap().data, date("2025-08-08"));
    }

    #[test]
    fn test_plan_computes_occupied_slots() {
        let mut m = modelo(&["guido"], &["10:00"], &[1]);
        m.duracao = 90;
        let plano = plan_recurring(&m, TimeSlotGrid::padrao()).unwrap();
        assert_eq!(plano.len(), 1);
        assert_eq!(plano[0].horarios_ocupados, vec!["10:00", "10:30", "11:00"]);
    }

    #[test]
    fn test_duplicates_are_ignored() {
        let m = modelo(&["guido", "guido"], &["09:00", "09:00"], &[1]);
        let plano = plan_recurring(&m, TimeSlotGrid::padrao()).unwrap();
        assert_eq!(plano.len(), 1);
    }

    #[test]
    fn test_slot_past_end_of_day_rejected_up_front() {
        let mut m = modelo(&["guido"], &["19:00"], &[1, 2, 3]);
        m.duracao = 60;
        let err = plan_recurring(&m, TimeSlotGrid::padrao()).unwrap_err();
        assert!(matches!(err, AgendaError::Slot(SlotError::ExceedsGrid { .. })));
    }

    #[test]
    fn test_overlapping_start_slots_rejected() {
        let mut m = modelo(&["guido"], &["09:00", "09:30"], &[1]);
        m.duracao = 60;
        assert!(matches!(
            plan_recurring(&m, TimeSlotGrid::padrao()),
            Err(AgendaError::Validacao(_))
        ));
    }

    #[test]
    fn test_empty_selection_rejected() {
        for m in [
            modelo(&[], &["09:00"], &[1]),
            modelo(&["guido"], &[], &[1]),
            modelo(&["guido"], &["09:00"], &[]),
        ] {
            assert!(matches!(
                plan_recurring(&m, TimeSlotGrid::padrao()),
                Err(AgendaError::Validacao(_))
            ));
        }
    }

    #[test]
    fn test_no_matching_date_gives_empty_plan() {
        let mut m = modelo(&["guido"], &["09:00"], &[0]);
        m.data_fim = date("2025-08-08");
        assert!(plan_recurring(&m, TimeSlotGrid::padrao()).unwrap().is_empty());
    }

    #[test]
    fn test_inverted_range() {
        let mut m = modelo(&["guido"], &["09:00"], &[1]);
        m.data_fim = date("2025-08-01");
        assert!(matches!(
            plan_recurring(&m, TimeSlotGrid::padrao()),
            Err(AgendaError::Recurrence(RecurrenceError::InvalidRange { .. }))
        ));
    }
}

//! Grade de horários do dia e cálculo de horários ocupados
//!
//! A grade é a sequência de rótulos "HH:MM" de 30 em 30 minutos entre a hora
//! inicial e a hora final do expediente. O último rótulo (`hora_fim:00`)
//! cobre a meia hora até `hora_fim:30`, então uma grade 08–19 tem 23 horários
//! e o dia termina às 19:30.

use once_cell::sync::Lazy;
use serde::Serialize;
use thiserror::Error;

/// Largura fixa de cada horário da grade
pub const GRANULARIDADE_MINUTOS: u32 = 30;

pub const HORA_INICIO_PADRAO: u32 = 8;
pub const HORA_FIM_PADRAO: u32 = 19;

static GRADE_PADRAO: Lazy<TimeSlotGrid> = Lazy::new(|| TimeSlotGrid {
    hora_inicio: HORA_INICIO_PADRAO,
    hora_fim: HORA_FIM_PADRAO,
    slots: build_labels(HORA_INICIO_PADRAO, HORA_FIM_PADRAO),
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlotError {
    #[error("Horário '{0}' não existe na grade")]
    SlotNotFound(String),

    #[error("Duração inválida: {0} minutos (use múltiplos positivos de 30)")]
    InvalidDuration(u32),

    #[error("{duracao} minutos a partir de {inicio} ultrapassam o fim da grade")]
    ExceedsGrid { inicio: String, duracao: u32 },

    #[error("Grade inválida: {0}")]
    InvalidGrid(String),
}

/// Sequência ordenada de horários válidos para início de um agendamento
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeSlotGrid {
    hora_inicio: u32,
    hora_fim: u32,
    slots: Vec<String>,
}

impl TimeSlotGrid {
    pub fn new(hora_inicio: u32, hora_fim: u32) -> Result<Self, SlotError> {
        if hora_fim > 23 {
            return Err(SlotError::InvalidGrid(format!(
                "hora final {} fora do dia",
                hora_fim
            )));
        }
        if hora_inicio > hora_fim {
            return Err(SlotError::InvalidGrid(format!(
                "hora inicial {} depois da hora final {}",
                hora_inicio, hora_fim
            )));
        }

        Ok(Self {
            hora_inicio,
            hora_fim,
            slots: build_labels(hora_inicio, hora_fim),
        })
    }

    /// Grade padrão (08:00–19:00), construída uma única vez por processo
    pub fn padrao() -> &'static TimeSlotGrid {
        &GRADE_PADRAO
    }

    pub fn slots(&self) -> &[String] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn hora_inicio(&self) -> u32 {
        self.hora_inicio
    }

    pub fn hora_fim(&self) -> u32 {
        self.hora_fim
    }

    /// Horário em que o último slot termina, e.g. "19:30"
    pub fn fim_do_dia(&self) -> String {
        minutes_to_time_string(self.hora_fim * 60 + GRANULARIDADE_MINUTOS)
    }

    pub fn index_of(&self, slot: &str) -> Option<usize> {
        // rótulos zero-padded: ordem lexicográfica == ordem cronológica
        self.slots
            .binary_search_by(|probe| probe.as_str().cmp(slot))
            .ok()
    }

    pub fn contains(&self, slot: &str) -> bool {
        self.index_of(slot).is_some()
    }

    /// Horários consecutivos cobertos por um agendamento de `duracao` minutos
    /// começando em `inicio`.
    pub fn occupied_slots(&self, inicio: &str, duracao: u32) -> Result<Vec<String>, SlotError> {
        let index = self
            .index_of(inicio)
            .ok_or_else(|| SlotError::SlotNotFound(inicio.to_string()))?;
        let needed = slots_needed(duracao)?;

        if index + needed > self.slots.len() {
            return Err(SlotError::ExceedsGrid {
                inicio: inicio.to_string(),
                duracao,
            });
        }

        Ok(self.slots[index..index + needed].to_vec())
    }

    /// `true` somente se todo o intervalo cabe dentro da grade.
    /// Não verifica colisões com outros agendamentos.
    pub fn fits(&self, inicio: &str, duracao: u32) -> bool {
        match (self.index_of(inicio), slots_needed(duracao)) {
            (Some(index), Ok(needed)) => index + needed <= self.slots.len(),
            _ => false,
        }
    }
}

fn build_labels(hora_inicio: u32, hora_fim: u32) -> Vec<String> {
    let mut slots = Vec::with_capacity(((hora_fim - hora_inicio) * 2 + 1) as usize);
    for hora in hora_inicio..=hora_fim {
        slots.push(format!("{:02}:00", hora));
        if hora < hora_fim {
            slots.push(format!("{:02}:30", hora));
        }
    }
    slots
}

/// Quantidade de horários para uma duração; sem arredondamento.
pub fn slots_needed(duracao: u32) -> Result<usize, SlotError> {
    if duracao == 0 || duracao % GRANULARIDADE_MINUTOS != 0 {
        return Err(SlotError::InvalidDuration(duracao));
    }
    Ok((duracao / GRANULARIDADE_MINUTOS) as usize)
}

/// Inverso de `occupied_slots`: a duração representada por uma lista de horários
pub fn duration_of(horarios_ocupados: &[String]) -> u32 {
    horarios_ocupados.len() as u32 * GRANULARIDADE_MINUTOS
}

/// Horários consecutivos por aritmética, sem consultar a grade.
/// Usado para registros antigos cujo horário ficou fora da grade atual.
pub fn consecutive_slots(inicio: &str, duracao: u32) -> Result<Vec<String>, SlotError> {
    let start = parse_time_to_minutes(inicio)
        .ok_or_else(|| SlotError::SlotNotFound(inicio.to_string()))?;
    let needed = slots_needed(duracao)? as u32;

    Ok((0..needed)
        .map(|i| minutes_to_time_string(start + i * GRANULARIDADE_MINUTOS))
        .collect())
}

/// "HH:MM às HH:MM" para exibição
pub fn interval_label(inicio: &str, duracao: u32) -> Option<String> {
    let start = parse_time_to_minutes(inicio)?;
    Some(format!(
        "{} às {}",
        minutes_to_time_string(start),
        minutes_to_time_string(start + duracao)
    ))
}

/// Converte "HH:MM" em minutos desde a meia-noite
pub fn parse_time_to_minutes(time_str: &str) -> Option<u32> {
    let (hours, minutes) = time_str.split_once(':')?;
    let hours: u32 = hours.parse().ok()?;
    let minutes: u32 = minutes.parse().ok()?;
    if hours >= 24 || minutes >= 60 {
        return None;
    }
    Some(hours * 60 + minutes)
}

/// Formata minutos desde a meia-noite como "HH:MM"
pub fn minutes_to_time_string(minutes: u32) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;
    format!("{:02}:{:02}", hours % 24, mins)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_length_and_order() {
        for (inicio, fim) in [(0, 0), (8, 18), (8, 19), (9, 17), (0, 23)] {
            let grid = TimeSlotGrid::new(inicio, fim).unwrap();
            assert_eq!(grid.len(), ((fim - inicio) * 2 + 1) as usize);
            assert!(grid.slots().windows(2).all(|w| w[0] < w[1]));
            assert_eq!(grid.slots()[0], format!("{:02}:00", inicio));
        }
    }

    #[test]
    fn test_grid_is_contiguous() {
        let grid = TimeSlotGrid::new(8, 19).unwrap();
        let minutes: Vec<u32> = grid
            .slots()
            .iter()
            .map(|s| parse_time_to_minutes(s).unwrap())
            .collect();
        assert!(minutes.windows(2).all(|w| w[1] - w[0] == GRANULARIDADE_MINUTOS));
        assert_eq!(grid.slots().last().unwrap(), "19:00");
        assert_eq!(grid.fim_do_dia(), "19:30");
    }

    #[test]
    fn test_invalid_grid() {
        assert!(matches!(TimeSlotGrid::new(10, 9), Err(SlotError::InvalidGrid(_))));
        assert!(matches!(TimeSlotGrid::new(8, 24), Err(SlotError::InvalidGrid(_))));
    }

    #[test]
    fn test_default_grid_is_memoized() {
        let a = TimeSlotGrid::padrao() as *const TimeSlotGrid;
        let b = TimeSlotGrid::padrao() as *const TimeSlotGrid;
        assert_eq!(a, b);
        assert_eq!(TimeSlotGrid::padrao(), &TimeSlotGrid::new(8, 19).unwrap());
    }

    #[test]
    fn test_occupied_slots_ninety_minutes() {
        let grid = TimeSlotGrid::padrao();
        assert_eq!(
            grid.occupied_slots("10:00", 90).unwrap(),
            vec!["10:00", "10:30", "11:00"]
        );
    }

    #[test]
    fn test_occupied_slots_are_consecutive_for_every_fit() {
        let grid = TimeSlotGrid::padrao();
        for start in grid.slots() {
            for duracao in (1..=12).map(|n| n * GRANULARIDADE_MINUTOS) {
                if !grid.fits(start, duracao) {
                    continue;
                }
                let ocupados = grid.occupied_slots(start, duracao).unwrap();
                assert_eq!(ocupados.len() as u32, duracao / GRANULARIDADE_MINUTOS);
                assert_eq!(&ocupados[0], start);

                let first = grid.index_of(start).unwrap();
                for (offset, slot) in ocupados.iter().enumerate() {
                    assert_eq!(slot, &grid.slots()[first + offset]);
                }
                assert_eq!(duration_of(&ocupados), duracao);
            }
        }
    }

    #[test]
    fn test_slot_not_found_is_an_error() {
        let grid = TimeSlotGrid::padrao();
        assert_eq!(
            grid.occupied_slots("07:00", 60),
            Err(SlotError::SlotNotFound("07:00".to_string()))
        );
        assert_eq!(
            grid.occupied_slots("10:15", 30),
            Err(SlotError::SlotNotFound("10:15".to_string()))
        );
    }

    #[test]
    fn test_invalid_duration() {
        let grid = TimeSlotGrid::padrao();
        assert_eq!(grid.occupied_slots("10:00", 0), Err(SlotError::InvalidDuration(0)));
        assert_eq!(grid.occupied_slots("10:00", 45), Err(SlotError::InvalidDuration(45)));
        assert!(!grid.fits("10:00", 45));
    }

    #[test]
    fn test_fits_at_end_of_day() {
        let grid = TimeSlotGrid::padrao();
        assert!(grid.fits("19:00", 30));
        assert!(!grid.fits("19:00", 60));
        assert!(grid.fits("18:30", 60));
        assert!(matches!(
            grid.occupied_slots("19:00", 60),
            Err(SlotError::ExceedsGrid { .. })
        ));
    }

    #[test]
    fn test_fits_matches_index_rule() {
        let grid = TimeSlotGrid::new(9, 12).unwrap();
        for (index, start) in grid.slots().iter().enumerate() {
            for n in 1..=8usize {
                let expected = index + n <= grid.len();
                assert_eq!(grid.fits(start, n as u32 * 30), expected, "{start} x{n}");
            }
        }
    }

    #[test]
    fn test_fits_unknown_slot() {
        assert!(!TimeSlotGrid::padrao().fits("23:00", 30));
    }

    #[test]
    fn test_consecutive_slots_outside_grid() {
        assert_eq!(
            consecutive_slots("07:30", 90).unwrap(),
            vec!["07:30", "08:00", "08:30"]
        );
    }

    #[test]
    fn test_interval_label() {
        assert_eq!(interval_label("09:00", 30).unwrap(), "09:00 às 09:30");
        assert_eq!(interval_label("17:30", 90).unwrap(), "17:30 às 19:00");
        assert!(interval_label("xx", 30).is_none());
    }

    #[test]
    fn test_parse_time_to_minutes() {
        assert_eq!(parse_time_to_minutes("00:00"), Some(0));
        assert_eq!(parse_time_to_minutes("13:45"), Some(825));
        assert_eq!(parse_time_to_minutes("24:00"), None);
        assert_eq!(parse_time_to_minutes("1330"), None);
    }
}

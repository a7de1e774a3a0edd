//! Regras de agenda sem I/O: grade de horários, horários ocupados,
//! colisões e recorrência.

pub mod conflicts;
pub mod grid;
pub mod plan;
pub mod recurrence;

pub use conflicts::{find_conflicts, Conflito};
pub use grid::{
    consecutive_slots, duration_of, interval_label, SlotError, TimeSlotGrid, GRANULARIDADE_MINUTOS,
};
pub use plan::plan_recurring;
pub use recurrence::{generate_recurring_dates, RecurrenceError};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AgendaError {
    #[error(transparent)]
    Slot(#[from] SlotError),

    #[error(transparent)]
    Recurrence(#[from] RecurrenceError),

    #[error("{0}")]
    Validacao(String),
}

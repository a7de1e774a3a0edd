pub mod agenda;
pub mod cache;
pub mod cadastros;
pub mod demandas;
pub mod estatisticas;
pub mod health;

pub use health::{health_check, ready_check};

pub mod agenda_service;
pub mod cache;
pub mod cadastro;
pub mod estatisticas;
pub mod lote;
pub mod notificacao;

pub use agenda_service::AgendaService;
pub use cache::{CacheStats, ListCache};
pub use cadastro::{Cadastro, Registro};
pub use estatisticas::Estatisticas;
pub use lote::{FalhaLote, ItemLote, ResumoLote};
pub use notificacao::{Notificacao, Notifier, NotificationError, WebhookNotifier};

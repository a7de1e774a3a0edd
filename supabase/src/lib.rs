//! Cliente mínimo da API REST do Supabase
//!
//! Cobre apenas o que a agenda precisa do PostgREST:
//!
//! - `select` com filtros (`eq`, `gte`, `lte`, `in`), ordenação e limite
//! - `insert` / `update` / `delete` com `Prefer: return=representation`
//! - `ping` para health checks
//!
//! # Exemplo Básico
//!
//! ```rust,ignore
//! use supabase::{Query, SupabaseClient};
//!
//! #[tokio::main]
//! async fn main() -> supabase::Result<()> {
//!     let url = std::env::var("SUPABASE_URL").expect("SUPABASE_URL não configurado");
//!     let key = std::env::var("SUPABASE_ANON_KEY").expect("SUPABASE_ANON_KEY não configurado");
//!
//!     let client = SupabaseClient::new(url, key)?;
//!     let hoje = client
//!         .select("agenda", &Query::new().eq("data", "2025-08-04").order("horario", true))
//!         .await?;
//!
//!     println!("{} agendamentos", hoje.len());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod query;

pub use client::SupabaseClient;
pub use error::{Result, SupabaseError};
pub use query::Query;

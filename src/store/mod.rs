//! Acesso às tabelas do Supabase atrás de um trait
//!
//! Handlers e serviços só conhecem `Arc<dyn RecordStore>`. Em produção o
//! `SupabaseStore` fala com o PostgREST; em testes e desenvolvimento offline
//! o `MemoryStore` guarda tudo em memória. Toda linha devolvida por qualquer
//! implementação passa por [`normalize::normalizar_registro`].

pub mod memory;
pub mod normalize;
pub mod supabase;

pub use memory::MemoryStore;
pub use supabase::SupabaseStore;

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tabela {
    Funcionarios,
    Tarefas,
    Agenda,
    Metas,
    Demandas,
    Processos,
}

impl Tabela {
    pub fn nome(&self) -> &'static str {
        match self {
            Tabela::Funcionarios => "funcionarios",
            Tabela::Tarefas => "tarefas",
            Tabela::Agenda => "agenda",
            Tabela::Metas => "metas",
            Tabela::Demandas => "demandas",
            Tabela::Processos => "processos",
        }
    }

    /// Ordenação aplicada a toda listagem: `(coluna, ascendente)`
    pub fn ordem_padrao(&self) -> &'static [(&'static str, bool)] {
        match self {
            Tabela::Funcionarios | Tabela::Tarefas => &[("nome", true)],
            Tabela::Agenda => &[("data", false), ("horario", true)],
            Tabela::Metas => &[("periodo", false)],
            Tabela::Demandas => &[("importancia", false), ("prazo", true)],
            Tabela::Processos => &[("titulo", true)],
        }
    }

    pub fn todas() -> [Tabela; 6] {
        [
            Tabela::Funcionarios,
            Tabela::Tarefas,
            Tabela::Agenda,
            Tabela::Metas,
            Tabela::Demandas,
            Tabela::Processos,
        ]
    }
}

impl fmt::Display for Tabela {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.nome())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condicao {
    Igual(String),
    MaiorOuIgual(String),
    MenorOuIgual(String),
    Em(Vec<String>),
}

/// Conjunção de condições por coluna
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filtro {
    condicoes: Vec<(String, Condicao)>,
}

impl Filtro {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn igual(self, campo: &str, valor: impl Into<String>) -> Self {
        self.com(campo, Condicao::Igual(valor.into()))
    }

    pub fn maior_ou_igual(self, campo: &str, valor: impl Into<String>) -> Self {
        self.com(campo, Condicao::MaiorOuIgual(valor.into()))
    }

    pub fn menor_ou_igual(self, campo: &str, valor: impl Into<String>) -> Self {
        self.com(campo, Condicao::MenorOuIgual(valor.into()))
    }

    pub fn em<S: Into<String>>(self, campo: &str, valores: impl IntoIterator<Item = S>) -> Self {
        self.com(campo, Condicao::Em(valores.into_iter().map(Into::into).collect()))
    }

    fn com(mut self, campo: &str, condicao: Condicao) -> Self {
        self.condicoes.push((campo.to_string(), condicao));
        self
    }

    pub fn condicoes(&self) -> &[(String, Condicao)] {
        &self.condicoes
    }

    pub fn is_empty(&self) -> bool {
        self.condicoes.is_empty()
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Registro '{id}' não encontrado em {tabela}")]
    NotFound { tabela: Tabela, id: String },

    #[error("Supabase: {0}")]
    Remote(#[from] ::supabase::SupabaseError),

    #[error("Já existe um registro '{id}' em {tabela}")]
    Duplicado { tabela: Tabela, id: String },

    #[error("Registro inválido em {tabela}: {mensagem}")]
    InvalidRecord { tabela: Tabela, mensagem: String },

    #[error("Banco de dados indisponível: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// CRUD genérico sobre as tabelas da aplicação; linhas trafegam como JSON
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn list(&self, tabela: Tabela, filtro: &Filtro) -> StoreResult<Vec<Value>>;

    async fn get(&self, tabela: Tabela, id: &str) -> StoreResult<Option<Value>>;

    /// Insere e devolve a linha como ficou gravada (com `id`)
    async fn insert(&self, tabela: Tabela, registro: Value) -> StoreResult<Value>;

    /// Aplica os campos presentes em `alteracao`; `NotFound` se o id não existe
    async fn update(&self, tabela: Tabela, id: &str, alteracao: Value) -> StoreResult<Value>;

    async fn delete(&self, tabela: Tabela, id: &str) -> StoreResult<()>;

    /// Remove numa única chamada e devolve os ids efetivamente removidos
    async fn delete_many(&self, tabela: Tabela, ids: &[String]) -> StoreResult<Vec<String>>;

    async fn health(&self) -> StoreResult<()>;

    fn backend(&self) -> &'static str;
}

/// `id` de uma linha como string, aceitando ids numéricos
pub fn id_of(registro: &Value) -> Option<String> {
    match registro.get("id")? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

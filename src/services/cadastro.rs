//! CRUD genérico das tabelas de cadastro

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use super::cache::ListCache;
use crate::models::{
    AlteracaoDemanda, AlteracaoFuncionario, AlteracaoMeta, AlteracaoProcesso, AlteracaoTarefa,
    Demanda, Entrada, Funcionario, Meta, NovaDemanda, NovaMeta, NovaTarefa, NovoFuncionario,
    NovoProcesso, Processo, Tarefa,
};
use crate::store::{Filtro, RecordStore, Tabela};
use crate::utils::logging::{log_store_error, log_validation_error};
use crate::utils::{AppError, AppResult};

/// Modelo persistido numa tabela, com os corpos aceitos para criar e alterar
pub trait Registro: Serialize + DeserializeOwned + Send + Sync + 'static {
    const TABELA: Tabela;
    /// Listagem completa guardada no `ListCache`
    const CACHEAVEL: bool = false;
    /// Colunas aceitas como filtro de igualdade na listagem
    const FILTROS: &'static [&'static str] = &[];

    type Novo: Entrada;
    type Alteracao: Entrada;
}

impl Registro for Funcionario {
    const TABELA: Tabela = Tabela::Funcionarios;
    const CACHEAVEL: bool = true;
    type Novo = NovoFuncionario;
    type Alteracao = AlteracaoFuncionario;
}

impl Registro for Tarefa {
    const TABELA: Tabela = Tabela::Tarefas;
    const CACHEAVEL: bool = true;
    const FILTROS: &'static [&'static str] = &["categoria", "prioridade"];
    type Novo = NovaTarefa;
    type Alteracao = AlteracaoTarefa;
}

impl Registro for Demanda {
    const TABELA: Tabela = Tabela::Demandas;
    const FILTROS: &'static [&'static str] = &["funcionario_id", "status", "importancia"];
    type Novo = NovaDemanda;
    type Alteracao = AlteracaoDemanda;
}

impl Registro for Meta {
    const TABELA: Tabela = Tabela::Metas;
    const FILTROS: &'static [&'static str] = &["funcionario_id", "tipo", "periodo"];
    type Novo = NovaMeta;
    type Alteracao = AlteracaoMeta;
}

impl Registro for Processo {
    const TABELA: Tabela = Tabela::Processos;
    const FILTROS: &'static [&'static str] = &["tarefa_id"];
    type Novo = NovoProcesso;
    type Alteracao = AlteracaoProcesso;
}

pub(crate) fn decodificar<R: DeserializeOwned>(tabela: Tabela, linha: Value) -> AppResult<R> {
    serde_json::from_value(linha).map_err(|e| {
        log_store_error(tabela.nome(), "decode", &e.to_string());
        AppError::StoreError(format!("Registro inesperado em {}: {}", tabela, e))
    })
}

#[derive(Clone)]
pub struct Cadastro {
    store: Arc<dyn RecordStore>,
    cache: ListCache,
}

impl Cadastro {
    pub fn new(store: Arc<dyn RecordStore>, cache: ListCache) -> Self {
        Self { store, cache }
    }

    pub fn cache(&self) -> &ListCache {
        &self.cache
    }

    pub async fn listar<R: Registro>(&self, filtro: &Filtro) -> AppResult<Vec<R>> {
        let tabela = R::TABELA;
        let usar_cache = R::CACHEAVEL && filtro.is_empty();

        let em_cache = match usar_cache {
            true => self.cache.get(tabela.nome()).await,
            false => None,
        };

        let linhas = match em_cache {
            Some(linhas) => linhas,
            None => {
                let linhas = self.store.list(tabela, filtro).await?;
                if usar_cache {
                    self.cache.put(tabela.nome(), linhas.clone()).await;
                }
                linhas
            }
        };

        linhas
            .into_iter()
            .map(|l| decodificar(tabela, l))
            .collect()
    }

    pub async fn buscar<R: Registro>(&self, id: &str) -> AppResult<R> {
        match self.store.get(R::TABELA, id).await? {
            Some(linha) => decodificar(R::TABELA, linha),
            None => Err(AppError::NotFound(format!(
                "Registro '{}' não encontrado em {}",
                id,
                R::TABELA
            ))),
        }
    }

    pub async fn criar<R: Registro>(&self, mut novo: R::Novo) -> AppResult<R> {
        validar(R::TABELA, &novo)?;
        novo.normalizar();

        let linha = self.store.insert(R::TABELA, serde_json::to_value(&novo)?).await?;
        self.invalidar::<R>().await;

        let criado = decodificar(R::TABELA, linha)?;
        tracing::info!("✅ Registro criado em {}", R::TABELA);
        Ok(criado)
    }

    pub async fn atualizar<R: Registro>(&self, id: &str, mut alteracao: R::Alteracao) -> AppResult<R> {
        validar(R::TABELA, &alteracao)?;
        alteracao.normalizar();

        let patch = serde_json::to_value(&alteracao)?;
        if patch.as_object().map_or(true, |campos| campos.is_empty()) {
            // nada a alterar: devolve o registro como está
            return self.buscar(id).await;
        }

        let linha = self.store.update(R::TABELA, id, patch).await?;
        self.invalidar::<R>().await;
        decodificar(R::TABELA, linha)
    }

    pub async fn excluir<R: Registro>(&self, id: &str) -> AppResult<()> {
        self.store.delete(R::TABELA, id).await?;
        self.invalidar::<R>().await;
        tracing::info!("🗑️ Registro '{}' removido de {}", id, R::TABELA);
        Ok(())
    }

    async fn invalidar<R: Registro>(&self) {
        if R::CACHEAVEL {
            self.cache.invalidate(R::TABELA.nome()).await;
        }
    }
}

fn validar<E: Entrada>(tabela: Tabela, entrada: &E) -> AppResult<()> {
    entrada.validar().map_err(|msg| {
        log_validation_error(tabela.nome(), &msg);
        AppError::ValidationError(msg)
    })
}

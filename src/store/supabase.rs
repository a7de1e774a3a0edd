use async_trait::async_trait;
use serde_json::Value;

use super::normalize::normalizar_registro;
use super::{id_of, Condicao, Filtro, RecordStore, StoreError, StoreResult, Tabela};
use ::supabase::{Query, SupabaseClient};

/// `RecordStore` sobre o PostgREST do projeto Supabase
#[derive(Clone)]
pub struct SupabaseStore {
    client: SupabaseClient,
}

impl SupabaseStore {
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }

    fn query(tabela: Tabela, filtro: &Filtro) -> Query {
        let query = filtro
            .condicoes()
            .iter()
            .fold(Query::new().select("*"), |q, (campo, condicao)| match condicao {
                Condicao::Igual(v) => q.eq(campo, v),
                Condicao::MaiorOuIgual(v) => q.gte(campo, v),
                Condicao::MenorOuIgual(v) => q.lte(campo, v),
                Condicao::Em(vs) => q.in_list(campo, vs),
            });

        tabela
            .ordem_padrao()
            .iter()
            .fold(query, |q, (coluna, asc)| q.order(coluna, *asc))
    }

    fn por_id(id: &str) -> Query {
        Query::new().eq("id", id)
    }
}

#[async_trait]
impl RecordStore for SupabaseStore {
    async fn list(&self, tabela: Tabela, filtro: &Filtro) -> StoreResult<Vec<Value>> {
        let linhas = self
            .client
            .select(tabela.nome(), &Self::query(tabela, filtro))
            .await?;

        Ok(linhas
            .into_iter()
            .map(|l| normalizar_registro(tabela, l))
            .collect())
    }

    async fn get(&self, tabela: Tabela, id: &str) -> StoreResult<Option<Value>> {
        let query = Self::por_id(id).limit(1);
        match self.client.select(tabela.nome(), &query).await {
            Ok(linhas) => Ok(linhas
                .into_iter()
                .next()
                .map(|l| normalizar_registro(tabela, l))),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn insert(&self, tabela: Tabela, registro: Value) -> StoreResult<Value> {
        if !registro.is_object() {
            return Err(StoreError::InvalidRecord {
                tabela,
                mensagem: "esperado um objeto JSON".to_string(),
            });
        }

        let criado = self.client.insert(tabela.nome(), &registro).await?;
        tracing::debug!("Inserido em {}: {:?}", tabela, id_of(&criado));
        Ok(normalizar_registro(tabela, criado))
    }

    async fn update(&self, tabela: Tabela, id: &str, alteracao: Value) -> StoreResult<Value> {
        let linhas = self
            .client
            .update(tabela.nome(), &Self::por_id(id), &alteracao)
            .await?;

        linhas
            .into_iter()
            .next()
            .map(|l| normalizar_registro(tabela, l))
            .ok_or_else(|| StoreError::NotFound {
                tabela,
                id: id.to_string(),
            })
    }

    async fn delete(&self, tabela: Tabela, id: &str) -> StoreResult<()> {
        let removidas = self.client.delete(tabela.nome(), &Self::por_id(id)).await?;
        if removidas.is_empty() {
            return Err(StoreError::NotFound {
                tabela,
                id: id.to_string(),
            });
        }
        Ok(())
    }

    async fn delete_many(&self, tabela: Tabela, ids: &[String]) -> StoreResult<Vec<String>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let removidas = self
            .client
            .delete(tabela.nome(), &Query::new().in_list("id", ids))
            .await?;
        Ok(removidas.iter().filter_map(id_of).collect())
    }

    async fn health(&self) -> StoreResult<()> {
        self.client
            .ping(Tabela::Funcionarios.nome())
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }

    fn backend(&self) -> &'static str {
        "supabase"
    }
}

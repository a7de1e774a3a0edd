use async_trait::async_trait;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::normalize::normalizar_registro;
use super::{id_of, Condicao, Filtro, RecordStore, StoreError, StoreResult, Tabela};

const SEED: &str = include_str!("../../data/seed.json");

/// `RecordStore` em memória com a mesma semântica de filtros e ordenação
/// do PostgREST (comparações textuais).
#[derive(Clone, Default)]
pub struct MemoryStore {
    tabelas: Arc<RwLock<HashMap<Tabela, Vec<Value>>>>,
    falhas: Arc<RwLock<Vec<(String, String)>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Funcionários e tarefas padrão da equipe
    pub fn with_seed() -> StoreResult<Self> {
        let seed: HashMap<String, Vec<Value>> =
            serde_json::from_str(SEED).map_err(|e| StoreError::InvalidRecord {
                tabela: Tabela::Funcionarios,
                mensagem: format!("seed inválido: {}", e),
            })?;

        let mut tabelas = HashMap::new();
        for tabela in [Tabela::Funcionarios, Tabela::Tarefas] {
            let linhas = seed.get(tabela.nome()).cloned().unwrap_or_default();
            tabelas.insert(tabela, linhas);
        }

        Ok(Self {
            tabelas: Arc::new(RwLock::new(tabelas)),
            falhas: Arc::default(),
        })
    }

    /// Faz inserções e exclusões de registros com `campo == valor` falharem
    pub async fn simular_falha(&self, campo: &str, valor: &str) {
        self.falhas
            .write()
            .await
            .push((campo.to_string(), valor.to_string()));
    }

    pub async fn count(&self, tabela: Tabela) -> usize {
        self.tabelas
            .read()
            .await
            .get(&tabela)
            .map_or(0, Vec::len)
    }

    async fn verificar_falha(&self, tabela: Tabela, registro: &Value) -> StoreResult<()> {
        let falhas = self.falhas.read().await;
        for (campo, valor) in falhas.iter() {
            if texto(registro.get(campo)).as_deref() == Some(valor.as_str()) {
                return Err(StoreError::Unavailable(format!(
                    "falha simulada em {} ({} = {})",
                    tabela, campo, valor
                )));
            }
        }
        Ok(())
    }
}

fn texto(valor: Option<&Value>) -> Option<String> {
    match valor? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn aceita(registro: &Value, filtro: &Filtro) -> bool {
    filtro.condicoes().iter().all(|(campo, condicao)| {
        let atual = texto(registro.get(campo));
        match (condicao, atual.as_deref()) {
            (_, None) => false,
            (Condicao::Igual(v), Some(a)) => a == v,
            (Condicao::MaiorOuIgual(v), Some(a)) => a >= v.as_str(),
            (Condicao::MenorOuIgual(v), Some(a)) => a <= v.as_str(),
            (Condicao::Em(vs), Some(a)) => vs.iter().any(|v| v == a),
        }
    })
}

fn comparar(tabela: Tabela, a: &Value, b: &Value) -> Ordering {
    for (coluna, ascendente) in tabela.ordem_padrao() {
        // nulos por último, como no PostgREST
        let ordem = match (texto(a.get(*coluna)), texto(b.get(*coluna))) {
            (Some(x), Some(y)) => {
                let o = x.cmp(&y);
                if *ascendente {
                    o
                } else {
                    o.reverse()
                }
            }
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        if ordem != Ordering::Equal {
            return ordem;
        }
    }
    Ordering::Equal
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn list(&self, tabela: Tabela, filtro: &Filtro) -> StoreResult<Vec<Value>> {
        let tabelas = self.tabelas.read().await;
        let mut linhas: Vec<Value> = tabelas
            .get(&tabela)
            .map(|linhas| {
                linhas
                    .iter()
                    .filter(|l| aceita(l, filtro))
                    .cloned()
                    .map(|l| normalizar_registro(tabela, l))
                    .collect()
            })
            .unwrap_or_default();

        linhas.sort_by(|a, b| comparar(tabela, a, b));
        Ok(linhas)
    }

    async fn get(&self, tabela: Tabela, id: &str) -> StoreResult<Option<Value>> {
        let tabelas = self.tabelas.read().await;
        Ok(tabelas
            .get(&tabela)
            .and_then(|linhas| linhas.iter().find(|l| id_of(l).as_deref() == Some(id)))
            .cloned()
            .map(|l| normalizar_registro(tabela, l)))
    }

    async fn insert(&self, tabela: Tabela, registro: Value) -> StoreResult<Value> {
        let Value::Object(mut campos) = registro else {
            return Err(StoreError::InvalidRecord {
                tabela,
                mensagem: "esperado um objeto JSON".to_string(),
            });
        };

        let id = match campos.get("id") {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => uuid::Uuid::new_v4().to_string(),
        };
        campos.insert("id".to_string(), Value::String(id.clone()));
        let registro = Value::Object(campos);

        self.verificar_falha(tabela, &registro).await?;

        let mut tabelas = self.tabelas.write().await;
        let linhas = tabelas.entry(tabela).or_default();
        if linhas.iter().any(|l| id_of(l).as_deref() == Some(id.as_str())) {
            return Err(StoreError::Duplicado { tabela, id });
        }
        linhas.push(registro.clone());

        Ok(normalizar_registro(tabela, registro))
    }

    async fn update(&self, tabela: Tabela, id: &str, alteracao: Value) -> StoreResult<Value> {
        let Value::Object(alteracao) = alteracao else {
            return Err(StoreError::InvalidRecord {
                tabela,
                mensagem: "esperado um objeto JSON".to_string(),
            });
        };

        let mut tabelas = self.tabelas.write().await;
        let linha = tabelas
            .get_mut(&tabela)
            .and_then(|linhas| linhas.iter_mut().find(|l| id_of(l).as_deref() == Some(id)))
            .ok_or_else(|| StoreError::NotFound {
                tabela,
                id: id.to_string(),
            })?;

        if let Value::Object(campos) = linha {
            for (campo, valor) in alteracao {
                if campo != "id" {
                    campos.insert(campo, valor);
                }
            }
        }

        Ok(normalizar_registro(tabela, linha.clone()))
    }

    async fn delete(&self, tabela: Tabela, id: &str) -> StoreResult<()> {
        let atual = self.get(tabela, id).await?.ok_or_else(|| StoreError::NotFound {
            tabela,
            id: id.to_string(),
        })?;
        self.verificar_falha(tabela, &atual).await?;

        let mut tabelas = self.tabelas.write().await;
        if let Some(linhas) = tabelas.get_mut(&tabela) {
            linhas.retain(|l| id_of(l).as_deref() != Some(id));
        }
        Ok(())
    }

    async fn delete_many(&self, tabela: Tabela, ids: &[String]) -> StoreResult<Vec<String>> {
        let alvo = Filtro::new().em("id", ids.iter().cloned());
        for registro in self.list(tabela, &alvo).await? {
            self.verificar_falha(tabela, &registro).await?;
        }

        let mut tabelas = self.tabelas.write().await;
        let mut removidos = Vec::new();
        if let Some(linhas) = tabelas.get_mut(&tabela) {
            linhas.retain(|l| match id_of(l) {
                Some(id) if ids.contains(&id) => {
                    removidos.push(id);
                    false
                }
                _ => true,
            });
        }
        Ok(removidos)
    }

    async fn health(&self) -> StoreResult<()> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Cache das listagens completas de tabelas pequenas (funcionários, tarefas)
///
/// As telas pedem essas listas a todo momento; uma escrita na tabela
/// invalida a chave correspondente. TTL zero desliga o cache.
#[derive(Debug, Clone)]
pub struct ListCache {
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
    stats: Arc<RwLock<CacheStats>>,
    ttl: Duration,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    linhas: Vec<Value>,
    timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub invalidations: u64,
}

impl ListCache {
    pub fn new(ttl_seconds: u64) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            stats: Arc::new(RwLock::new(CacheStats::default())),
            ttl: Duration::seconds(ttl_seconds as i64),
        }
    }

    pub fn enabled(&self) -> bool {
        self.ttl > Duration::zero()
    }

    pub async fn get(&self, chave: &str) -> Option<Vec<Value>> {
        if !self.enabled() {
            return None;
        }

        let hit = {
            let entries = self.entries.read().await;
            entries
                .get(chave)
                .filter(|e| Utc::now() - e.timestamp < self.ttl)
                .map(|e| e.linhas.clone())
        };

        let mut stats = self.stats.write().await;
        if hit.is_some() {
            stats.hits += 1;
        } else {
            stats.misses += 1;
        }
        hit
    }

    pub async fn put(&self, chave: &str, linhas: Vec<Value>) {
        if !self.enabled() {
            return;
        }
        self.entries.write().await.insert(
            chave.to_string(),
            CacheEntry {
                linhas,
                timestamp: Utc::now(),
            },
        );
    }

    pub async fn invalidate(&self, chave: &str) {
        if self.entries.write().await.remove(chave).is_some() {
            self.stats.write().await.invalidations += 1;
            tracing::debug!("🗑️ Cache '{}' invalidado", chave);
        }
    }

    /// Devolve quantas listas foram descartadas
    pub async fn clear(&self) -> usize {
        let mut entries = self.entries.write().await;
        let total = entries.len();
        entries.clear();
        self.stats.write().await.invalidations += total as u64;
        tracing::info!("🧹 Cache de listagens limpo ({} entrada(s))", total);
        total
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn stats(&self) -> CacheStats {
        self.stats.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_hit_and_invalidate() {
        let cache = ListCache::new(300);
        assert!(cache.get("tarefas").await.is_none());

        cache.put("tarefas", vec![json!({"id": "suporte"})]).await;
        assert_eq!(cache.get("tarefas").await.unwrap().len(), 1);

        cache.invalidate("tarefas").await;
        assert!(cache.get("tarefas").await.is_none());

        let stats = cache.stats().await;
        assert_eq!((stats.hits, stats.misses, stats.invalidations), (1, 2, 1));
    }

    #[tokio::test]
    async fn test_zero_ttl_disables_cache() {
        let cache = ListCache::new(0);
        cache.put("funcionarios", vec![json!({"id": "guido"})]).await;
        assert!(cache.get("funcionarios").await.is_none());
    }

    #[tokio::test]
    async fn test_clear() {
        let cache = ListCache::new(60);
        cache.put("a", vec![]).await;
        cache.put("b", vec![]).await;
        assert_eq!(cache.len().await, 2);
        assert_eq!(cache.clear().await, 2);
        assert_eq!(cache.len().await, 0);
        assert!(cache.get("a").await.is_none());
        assert_eq!(cache.stats().await.invalidations, 2);
    }
}

use serde::Serialize;
use std::fmt::Display;

/// Identifica o item que falhou: o id (exclusões) ou a posição no lote (criações)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemLote {
    Id(String),
    Indice(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FalhaLote {
    #[serde(flatten)]
    pub item: ItemLote,
    pub erro: String,
}

/// Resultado agregado de N operações independentes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResumoLote {
    pub solicitados: usize,
    pub sucesso: usize,
    pub falhas: Vec<FalhaLote>,
    /// Ids criados ou removidos com sucesso
    pub ids: Vec<String>,
    /// Agendamentos removidos antes do lote por conflito (`sobrescrever`)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub substituidos: Vec<String>,
}

impl ResumoLote {
    pub fn de_resultados<E: Display>(
        resultados: impl IntoIterator<Item = (ItemLote, Result<String, E>)>,
    ) -> Self {
        let mut resumo = ResumoLote::default();
        for (item, resultado) in resultados {
            resumo.solicitados += 1;
            match resultado {
                Ok(id) => {
                    resumo.sucesso += 1;
                    resumo.ids.push(id);
                }
                Err(e) => resumo.falhas.push(FalhaLote {
                    item,
                    erro: e.to_string(),
                }),
            }
        }
        resumo
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_summary_counts_and_shape() {
        let resumo = ResumoLote::de_resultados(vec![
            (ItemLote::Indice(0), Ok("a".to_string())),
            (ItemLote::Indice(1), Err("timeout")),
            (ItemLote::Indice(2), Ok("c".to_string())),
        ]);

        assert_eq!(resumo.solicitados, 3);
        assert_eq!(resumo.sucesso, 2);
        assert_eq!(
            serde_json::to_value(&resumo).unwrap(),
            json!({
                "solicitados": 3,
                "sucesso": 2,
                "falhas": [{"indice": 1, "erro": "timeout"}],
                "ids": ["a", "c"]
            })
        );
    }

    #[test]
    fn test_failure_by_id() {
        let resumo = ResumoLote::de_resultados(vec![(ItemLote::Id("x".into()), Err::<String, _>("não encontrado"))]);
        assert_eq!(
            serde_json::to_value(&resumo.falhas[0]).unwrap(),
            json!({"id": "x", "erro": "não encontrado"})
        );
    }
}

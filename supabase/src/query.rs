//! Construtor de filtros PostgREST
//!
//! Cada filtro vira um parâmetro de query no formato `coluna=operador.valor`,
//! e.g. `funcionario_id=eq.guido`, `data=gte.2025-08-01`, `id=in.("1","2")`.

/// Filtros, ordenação e limite de uma requisição PostgREST
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    params: Vec<(String, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Colunas retornadas (`select=*` quando omitido)
    pub fn select(mut self, columns: &str) -> Self {
        self.params.push(("select".to_string(), columns.to_string()));
        self
    }

    pub fn eq(self, column: &str, value: impl AsRef<str>) -> Self {
        self.filter(column, "eq", value.as_ref())
    }

    pub fn gte(self, column: &str, value: impl AsRef<str>) -> Self {
        self.filter(column, "gte", value.as_ref())
    }

    pub fn lte(self, column: &str, value: impl AsRef<str>) -> Self {
        self.filter(column, "lte", value.as_ref())
    }

    /// `coluna=in.("a","b")` — valores entre aspas para aceitar vírgulas
    pub fn in_list<S: AsRef<str>>(self, column: &str, values: &[S]) -> Self {
        let quoted = values
            .iter()
            .map(|v| format!("\"{}\"", v.as_ref().replace('"', "\\\"")))
            .collect::<Vec<_>>()
            .join(",");
        self.filter(column, "in", &format!("({})", quoted))
    }

    /// Ordenações sucessivas viram um único `order=a.desc,b.asc`
    pub fn order(mut self, column: &str, ascending: bool) -> Self {
        let direction = if ascending { "asc" } else { "desc" };
        let term = format!("{}.{}", column, direction);

        match self.params.iter_mut().find(|(k, _)| k == "order") {
            Some((_, existing)) => {
                existing.push(',');
                existing.push_str(&term);
            }
            None => self.params.push(("order".to_string(), term)),
        }
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.params.push(("limit".to_string(), limit.to_string()));
        self
    }

    fn filter(mut self, column: &str, operator: &str, value: &str) -> Self {
        self.params
            .push((column.to_string(), format!("{}.{}", operator, value)));
        self
    }

    /// `true` se existe pelo menos um filtro de coluna (ignora select/order/limit)
    pub fn has_filters(&self) -> bool {
        self.params
            .iter()
            .any(|(k, _)| !matches!(k.as_str(), "select" | "order" | "limit"))
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// Query string já codificada, sem o `?` inicial
    pub fn to_query_string(&self) -> String {
        self.params
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

//! Builder for PostgREST table reads (`GET /rest/v1/<table>?...`).
//!
//! Only the filters the dashboard needs are supported. Values are
//! percent-encoded; column names are trusted identifiers.

/// A read against one table, rendered to a path + query string by
/// [`TableQuery::to_path`].
#[derive(Debug, Clone, PartialEq)]
pub struct TableQuery {
    table: String,
    select: String,
    filters: Vec<(String, String)>,
    order: Vec<String>,
    range: Option<(usize, usize)>,
}

impl TableQuery {
    pub fn from(table: &str) -> Self {
        Self {
            table: table.to_string(),
            select: "*".to_string(),
            filters: Vec::new(),
            order: Vec::new(),
            range: None,
        }
    }

    pub fn select(mut self, columns: &str) -> Self {
        self.select = columns.split(',').map(str::trim).collect::<Vec<_>>().join(",");
        self
    }

    pub fn eq(self, column: &str, value: &str) -> Self {
        self.filter(column, "eq", value)
    }

    pub fn ilike(self, column: &str, pattern: &str) -> Self {
        self.filter(column, "ilike", pattern)
    }

    pub fn gte(self, column: &str, value: &str) -> Self {
        self.filter(column, "gte", value)
    }

    pub fn lte(self, column: &str, value: &str) -> Self {
        self.filter(column, "lte", value)
    }

    /// Sort key. Repeated calls add tie-breakers in call order; paged reads
    /// need a unique key last or rows can repeat or vanish across pages.
    pub fn order(mut self, column: &str, ascending: bool) -> Self {
        let dir = if ascending { "asc" } else { "desc" };
        self.order.push(format!("{}.{}", column, dir));
        self
    }

    /// Inclusive row range, as in `Range: from-to`.
    pub fn range(mut self, from: usize, to: usize) -> Self {
        self.range = Some((from, to.max(from)));
        self
    }

    fn filter(mut self, column: &str, op: &str, value: &str) -> Self {
        self.filters.push((column.to_string(), format!("{}.{}", op, value)));
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn to_path(&self) -> String {
        let mut parts = vec![format!("select={}", self.select)];
        for (column, expr) in &self.filters {
            parts.push(format!("{}={}", column, urlencoding::encode(expr)));
        }
        if !self.order.is_empty() {
            parts.push(format!("order={}", self.order.join(",")));
        }
        if let Some((from, to)) = self.range {
            parts.push(format!("offset={}", from));
            parts.push(format!("limit={}", to - from + 1));
        }
        format!("/rest/v1/{}?{}", self.table, parts.join("&"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::shop_filter::shop_ilike_pattern;

    #[test]
    fn test_builds_filtered_path() {
        let path = TableQuery::from("ordini")
            .select("id, data_ordine, shop")
            .ilike("shop", &shop_ilike_pattern("MyShop"))
            .gte("data_ordine", "2024-01-01")
            .lte("data_ordine", "2024-12-31")
            .order("id", true)
            .range(1000, 1999)
            .to_path();
        assert_eq!(
            path,
            "/rest/v1/ordini?select=id,data_ordine,shop\
             &shop=ilike.%25MyShop%25\
             &data_ordine=gte.2024-01-01\
             &data_ordine=lte.2024-12-31\
             &order=id.asc&offset=1000&limit=1000"
        );
    }

    #[test]
    fn test_escaped_pattern_survives_encoding() {
        let path = TableQuery::from("ordini")
            .ilike("shop", &shop_ilike_pattern("a_b%"))
            .to_path();
        // %  \  _  \  %  %  ->  %25 %5C _ %5C %25 %25
        assert!(path.ends_with("shop=ilike.%25a%5C_b%5C%25%25"), "{}", path);
    }

    #[test]
    fn test_eq_filter() {
        let path = TableQuery::from("profili")
            .select("id,shops_abilitati")
            .eq("id", "u-1")
            .to_path();
        assert_eq!(path, "/rest/v1/profili?select=id,shops_abilitati&id=eq.u-1");
    }

    #[test]
    fn test_order_with_tie_breaker() {
        let path = TableQuery::from("ordini")
            .order("data_ordine", true)
            .order("id", false)
            .range(0, 999)
            .to_path();
        assert_eq!(
            path,
            "/rest/v1/ordini?select=*&order=data_ordine.asc,id.desc&offset=0&limit=1000"
        );
    }
}

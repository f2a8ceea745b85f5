use contracts::domain::a001_order::aggregate::{
    OrderRow, OrderStatusRow, StatusCatalog, ORDERS_TABLE, ORDER_COLUMNS, ORDER_STATUS_TABLE,
};
use contracts::shared::fetch::{fetch_all_pages, fetch_per_year, FetchError, PAGE_SIZE};
use contracts::shared::rest_query::TableQuery;
use contracts::shared::shop_filter::{retain_shop, shop_ilike_pattern};

use crate::shared::supabase::SupabaseClient;

#[derive(Debug, Clone, PartialEq)]
pub struct OrdersKey {
    pub shop: String,
    pub years: Vec<i32>,
}

/// Orders of one shop placed in `year`, every page.
async fn list_orders_for_year(client: SupabaseClient, shop: String, year: i32) -> Result<Vec<OrderRow>, FetchError> {
    let base = TableQuery::from(ORDERS_TABLE)
        .select(ORDER_COLUMNS)
        .ilike("shop", &shop_ilike_pattern(&shop))
        .gte("data_ordine", &format!("{}-01-01", year))
        .lte("data_ordine", &format!("{}-12-31", year))
        .order("data_ordine", true)
        .order("id", true);

    fetch_all_pages(PAGE_SIZE, |from, to| {
        let client = client.clone();
        let query = base.clone().range(from, to);
        async move { client.select::<OrderRow>(&query).await }
    })
    .await
}

/// Orders of the selected years, merged. The pattern filter on the server
/// is narrowed to exact (trimmed, case-insensitive) shop matches here.
pub async fn list_orders(client: SupabaseClient, key: OrdersKey) -> Result<Vec<OrderRow>, FetchError> {
    let shop = key.shop;
    let mut rows = fetch_per_year(&key.years, |year| list_orders_for_year(client.clone(), shop.clone(), year)).await?;
    retain_shop(&mut rows, &shop, |o| o.shop.as_deref());
    Ok(rows)
}

pub async fn list_statuses(client: SupabaseClient) -> Result<StatusCatalog, FetchError> {
    let query = TableQuery::from(ORDER_STATUS_TABLE).select("id, label_stati, nomi_stati");
    let rows: Vec<OrderStatusRow> = client.select(&query).await?;
    Ok(StatusCatalog::new(rows))
}

use contracts::dashboards::d410_sales_overview::kpi::KpiSnapshot;
use contracts::dashboards::d410_sales_overview::period::Period;
use contracts::dashboards::d410_sales_overview::{
    AvailablePeriods, ChartAggParams, ChartAggRow, DashboardAggRow, KpisRow, PeriodParams, PeriodRow,
    ShopParams, RPC_AVAILABLE_PERIODS, RPC_CHART_AGG, RPC_DASHBOARD_AGG, RPC_KPIS_FOR_PERIOD,
};
use contracts::shared::fetch::{fetch_all_pages, fetch_per_year, FetchError, PAGE_SIZE};

use crate::shared::supabase::SupabaseClient;

/// Shop plus closed date interval; the key of every per-period fetcher.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodKey {
    pub shop: String,
    pub start: String,
    pub end: String,
}

impl PeriodKey {
    pub fn new(shop: &str, period: &Period) -> Self {
        Self {
            shop: shop.to_string(),
            start: period.start_str(),
            end: period.end_str(),
        }
    }

    fn params(&self) -> PeriodParams {
        PeriodParams {
            p_shop: self.shop.clone(),
            p_data_inizio: self.start.clone(),
            p_data_fine: self.end.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartKey {
    pub shop: String,
    pub years: Vec<i32>,
}

/// Years and months for which the shop has orders
pub async fn get_available_periods(client: SupabaseClient, shop: String) -> Result<AvailablePeriods, FetchError> {
    let rows: Vec<PeriodRow> = client
        .rpc_rows(RPC_AVAILABLE_PERIODS, &ShopParams { p_shop: shop })
        .await?;
    Ok(AvailablePeriods::new(rows))
}

/// KPI totals over one interval
pub async fn get_kpis(client: SupabaseClient, key: PeriodKey) -> Result<KpiSnapshot, FetchError> {
    let row: Option<KpisRow> = client.rpc_single(RPC_KPIS_FOR_PERIOD, &key.params()).await?;
    Ok(KpiSnapshot::from_row(row.as_ref()))
}

/// Revenue by country and source over one interval
pub async fn get_dashboard_agg(client: SupabaseClient, key: PeriodKey) -> Result<Vec<DashboardAggRow>, FetchError> {
    client.rpc_rows(RPC_DASHBOARD_AGG, &key.params()).await
}

/// Monthly chart aggregates: one paginated call per year, merged.
pub async fn get_chart_agg(client: SupabaseClient, key: ChartKey) -> Result<Vec<ChartAggRow>, FetchError> {
    let shop = key.shop;
    fetch_per_year(&key.years, |year| {
        let client = client.clone();
        let params = ChartAggParams {
            p_shop: shop.clone(),
            p_years: vec![year],
        };
        async move {
            fetch_all_pages(PAGE_SIZE, |from, to| {
                let client = client.clone();
                let params = params.clone();
                async move { client.rpc_rows_page(RPC_CHART_AGG, &params, from, to).await }
            })
            .await
        }
    })
    .await
}

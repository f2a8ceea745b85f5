pub mod breakdown_table;
pub mod chart;
pub mod dashboard;
pub mod filters;
pub mod kpi_cards;

pub mod config;
pub mod fetch;
pub mod numeric;
pub mod rest_query;
pub mod shop_filter;

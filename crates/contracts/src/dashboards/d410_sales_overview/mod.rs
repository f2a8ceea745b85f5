pub mod breakdown;
pub mod chart;
pub mod dto;
pub mod kpi;
pub mod period;
pub mod selection;

pub use dto::*;

pub mod multi_select;
pub mod stat_card;

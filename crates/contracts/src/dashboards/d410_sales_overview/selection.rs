//! Selection state: the selected shop, the period selector and the chart
//! multi-selects.
//!
//! Each multi-select is a small state machine
//! `Uninitialized -> Defaulted -> UserControlled`. The first non-empty option
//! set applies a default and later option sets re-apply it until the user
//! edits the selection. From then on option sets only prune it. Changing
//! shop resets everything.

use super::chart::ChartFilter;
use super::dto::AvailablePeriods;
use super::period::{PeriodFilters, PeriodMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterPhase {
    Uninitialized,
    Defaulted,
    UserControlled,
}

/// What to select when options first arrive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultPolicy {
    /// Only the first option (options are expected most-relevant first).
    First,
    All,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterSelection<T> {
    phase: FilterPhase,
    policy: DefaultPolicy,
    selected: Vec<T>,
}

impl<T: Clone + PartialEq> FilterSelection<T> {
    pub fn new(policy: DefaultPolicy) -> Self {
        Self {
            phase: FilterPhase::Uninitialized,
            policy,
            selected: Vec::new(),
        }
    }

    pub fn phase(&self) -> FilterPhase {
        self.phase
    }

    pub fn selected(&self) -> &[T] {
        &self.selected
    }

    pub fn is_selected(&self, value: &T) -> bool {
        self.selected.contains(value)
    }

    /// Apply a freshly loaded option set.
    pub fn on_options_loaded(&mut self, options: &[T]) {
        match self.phase {
            FilterPhase::Uninitialized => {
                if options.is_empty() {
                    return;
                }
                self.selected = self.default_for(options);
                self.phase = FilterPhase::Defaulted;
            }
            FilterPhase::Defaulted => {
                self.selected = self.default_for(options);
            }
            FilterPhase::UserControlled => {
                let pruned: Vec<T> = self
                    .selected
                    .iter()
                    .filter(|v| options.contains(v))
                    .cloned()
                    .collect();
                self.selected = if pruned.is_empty() { options.to_vec() } else { pruned };
            }
        }
    }

    fn default_for(&self, options: &[T]) -> Vec<T> {
        match self.policy {
            DefaultPolicy::First => options.iter().take(1).cloned().collect(),
            DefaultPolicy::All => options.to_vec(),
        }
    }

    /// Add or remove one value.
    pub fn toggle(&mut self, value: T) {
        if let Some(pos) = self.selected.iter().position(|v| *v == value) {
            self.selected.remove(pos);
        } else {
            self.selected.push(value);
        }
        self.phase = FilterPhase::UserControlled;
    }

    pub fn set(&mut self, values: Vec<T>) {
        self.selected = values;
        self.phase = FilterPhase::UserControlled;
    }

    pub fn reset(&mut self) {
        self.selected.clear();
        self.phase = FilterPhase::Uninitialized;
    }

    /// Whether the selection narrows `options` (empty means "everything").
    pub fn narrows(&self, options: &[T]) -> bool {
        !self.selected.is_empty() && options.iter().any(|o| !self.selected.contains(o))
    }
}

/// Everything the dashboard lets the user choose.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionState {
    shop: Option<String>,
    pub period: PeriodFilters,
    period_phase: FilterPhase,
    pub chart_years: FilterSelection<i32>,
    pub chart_countries: FilterSelection<String>,
    pub chart_sources: FilterSelection<String>,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self {
            shop: None,
            period: PeriodFilters::default(),
            period_phase: FilterPhase::Uninitialized,
            chart_years: FilterSelection::new(DefaultPolicy::First),
            chart_countries: FilterSelection::new(DefaultPolicy::All),
            chart_sources: FilterSelection::new(DefaultPolicy::All),
        }
    }
}

impl SelectionState {
    pub fn shop(&self) -> Option<&str> {
        self.shop.as_deref()
    }

    /// Switch shop. A different shop resets every dependent filter so the
    /// next option sets apply fresh defaults.
    pub fn select_shop(&mut self, shop: Option<String>) {
        if self.shop == shop {
            return;
        }
        let mode = self.period.mode;
        *self = Self {
            shop,
            period: PeriodFilters {
                mode,
                ..Default::default()
            },
            ..Default::default()
        };
    }

    /// Default the period selector to the most recent year/month with data,
    /// once; later loads only repair a year or month that disappeared.
    pub fn on_periods_loaded(&mut self, periods: &AvailablePeriods) {
        let years = periods.years();
        let Some(&latest) = years.first() else {
            return;
        };
        let year_valid = self.period.year_value().is_some_and(|y| years.contains(&y));
        if self.period_phase == FilterPhase::Uninitialized || !year_valid {
            self.period.year = latest.to_string();
            self.period.month.clear();
            if self.period_phase == FilterPhase::Uninitialized {
                self.period_phase = FilterPhase::Defaulted;
            }
        }
        self.ensure_month(periods);
        self.chart_years.on_options_loaded(&years);
    }

    fn ensure_month(&mut self, periods: &AvailablePeriods) {
        let Some(year) = self.period.year_value() else {
            return;
        };
        let months = periods.months_for_year(year);
        if !months.iter().any(|m| m.value == self.period.month) {
            self.period.month = months.last().map(|m| m.value.clone()).unwrap_or_default();
        }
    }

    pub fn set_period_mode(&mut self, mode: PeriodMode, periods: &AvailablePeriods) {
        self.period.mode = mode;
        if mode == PeriodMode::Month {
            self.ensure_month(periods);
        }
        self.period_phase = FilterPhase::UserControlled;
    }

    pub fn set_period_year(&mut self, year: String, periods: &AvailablePeriods) {
        self.period.year = year;
        self.ensure_month(periods);
        self.period_phase = FilterPhase::UserControlled;
    }

    pub fn set_period_month(&mut self, month: String) {
        self.period.month = month;
        self.period_phase = FilterPhase::UserControlled;
    }

    pub fn set_date_range(&mut self, start: String, end: String) {
        self.period.date_start = start;
        self.period.date_end = end;
        self.period_phase = FilterPhase::UserControlled;
    }

    /// Prune/default the country and source selections against the options
    /// present in the loaded chart rows.
    pub fn on_chart_options_loaded(&mut self, countries: &[String], sources: &[String]) {
        self.chart_countries.on_options_loaded(countries);
        self.chart_sources.on_options_loaded(sources);
    }

    /// Filter handed to the bucketing engine. A selection covering every
    /// option is no filter at all.
    pub fn chart_filter(&self, countries: &[String], sources: &[String]) -> ChartFilter {
        let mut years = self.chart_years.selected().to_vec();
        years.sort_unstable_by(|a, b| b.cmp(a));
        ChartFilter {
            years,
            countries: if self.chart_countries.narrows(countries) {
                self.chart_countries.selected().to_vec()
            } else {
                Vec::new()
            },
            sources: if self.chart_sources.narrows(sources) {
                self.chart_sources.selected().to_vec()
            } else {
                Vec::new()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboards::d410_sales_overview::chart::{build_bar_data, chart_options, OTHER_KEY};
    use crate::dashboards::d410_sales_overview::dto::{ChartAggRow, PeriodRow};

    fn s(v: &[&str]) -> Vec<String> {
        v.iter().map(|x| x.to_string()).collect()
    }

    fn periods() -> AvailablePeriods {
        AvailablePeriods::new(vec![
            PeriodRow { year: 2023, month: 4 },
            PeriodRow { year: 2024, month: 1 },
            PeriodRow { year: 2024, month: 7 },
        ])
    }

    #[test]
    fn test_first_load_applies_default_once() {
        let mut sel = FilterSelection::new(DefaultPolicy::All);
        sel.on_options_loaded(&s(&[]));
        assert_eq!(sel.phase(), FilterPhase::Uninitialized);
        sel.on_options_loaded(&s(&["IT", "DE"]));
        assert_eq!(sel.phase(), FilterPhase::Defaulted);
        assert_eq!(sel.selected(), &s(&["IT", "DE"])[..]);

        let mut years = FilterSelection::new(DefaultPolicy::First);
        years.on_options_loaded(&[2025, 2024]);
        assert_eq!(years.selected(), &[2025]);
    }

    #[test]
    fn test_user_edits_survive_reload() {
        let mut sel = FilterSelection::new(DefaultPolicy::All);
        sel.on_options_loaded(&s(&["IT", "DE", "FR"]));
        sel.toggle("DE".to_string());
        assert_eq!(sel.phase(), FilterPhase::UserControlled);
        sel.on_options_loaded(&s(&["IT", "DE", "FR", "ES"]));
        assert_eq!(sel.selected(), &s(&["IT", "FR"])[..]);
    }

    #[test]
    fn test_prune_and_fallback_to_all() {
        let mut sel = FilterSelection::new(DefaultPolicy::All);
        sel.set(s(&["IT", "DE"]));
        sel.on_options_loaded(&s(&["IT", "ES"]));
        assert_eq!(sel.selected(), &s(&["IT"])[..]);
        sel.on_options_loaded(&s(&["FR", "ES"]));
        assert_eq!(sel.selected(), &s(&["FR", "ES"])[..]);
    }

    #[test]
    fn test_shop_switch_resets_filters() {
        let mut state = SelectionState::default();
        state.select_shop(Some("A".into()));
        state.on_periods_loaded(&periods());
        state.chart_years.toggle(2023);
        state.set_period_mode(PeriodMode::Month, &periods());
        state.select_shop(Some("B".into()));
        assert_eq!(state.shop(), Some("B"));
        assert_eq!(state.chart_years.phase(), FilterPhase::Uninitialized);
        assert!(state.chart_years.selected().is_empty());
        assert_eq!(state.period.year, "");
        assert_eq!(state.period.mode, PeriodMode::Month);

        state.on_periods_loaded(&periods());
        assert_eq!(state.period.year, "2024");
        assert_eq!(state.chart_years.selected(), &[2024]);
    }

    #[test]
    fn test_same_shop_keeps_state() {
        let mut state = SelectionState::default();
        state.select_shop(Some("A".into()));
        state.on_periods_loaded(&periods());
        state.select_shop(Some("A".into()));
        assert_eq!(state.period.year, "2024");
    }

    #[test]
    fn test_periods_default_latest_year_and_month() {
        let mut state = SelectionState::default();
        state.select_shop(Some("A".into()));
        state.on_periods_loaded(&periods());
        assert_eq!(state.period.year, "2024");
        assert_eq!(state.period.month, "07");

        state.set_period_year("2023".into(), &periods());
        assert_eq!(state.period.month, "04");
        state.on_periods_loaded(&periods());
        assert_eq!(state.period.year, "2023");
    }

    #[test]
    fn test_chart_filter_full_selection_is_no_filter() {
        let mut state = SelectionState::default();
        state.select_shop(Some("A".into()));
        state.on_periods_loaded(&periods());
        let countries = s(&["IT", "DE"]);
        let sources = s(&["web"]);
        state.on_chart_options_loaded(&countries, &sources);
        let f = state.chart_filter(&countries, &sources);
        assert_eq!(f.years, vec![2024]);
        assert!(f.countries.is_empty());
        assert!(f.sources.is_empty());

        state.chart_countries.toggle("DE".into());
        let f = state.chart_filter(&countries, &sources);
        assert_eq!(f.countries, s(&["IT"]));
    }

    #[test]
    fn test_defaulted_selection_follows_new_options() {
        let mut sel = FilterSelection::new(DefaultPolicy::All);
        sel.on_options_loaded(&s(&["IT", "DE"]));
        sel.on_options_loaded(&s(&["IT", "DE", "PL"]));
        assert_eq!(sel.phase(), FilterPhase::Defaulted);
        assert_eq!(sel.selected(), &s(&["IT", "DE", "PL"])[..]);
        assert!(!sel.narrows(&s(&["IT", "DE", "PL"])));

        sel.on_options_loaded(&[]);
        assert!(sel.selected().is_empty());
        assert_eq!(sel.phase(), FilterPhase::Defaulted);
    }

    fn chart_row(year: i32, country: &str, revenue: f64) -> ChartAggRow {
        ChartAggRow {
            year,
            month: 1,
            country: country.to_string(),
            source: "web".to_string(),
            revenue,
        }
    }

    #[test]
    fn test_adding_a_year_keeps_default_countries_unfiltered() {
        let mut rows: Vec<ChartAggRow> = ["AT", "BE", "DE", "ES", "FR", "IT", "NL"]
            .iter()
            .enumerate()
            .map(|(i, c)| chart_row(2025, c, 100.0 + i as f64))
            .collect();

        let mut state = SelectionState::default();
        state.select_shop(Some("A".into()));
        state.on_periods_loaded(&AvailablePeriods::new(vec![
            PeriodRow { year: 2025, month: 1 },
            PeriodRow { year: 2024, month: 1 },
        ]));
        let (countries, sources) = chart_options(&rows);
        state.on_chart_options_loaded(&countries, &sources);

        state.chart_years.toggle(2024);
        rows.push(chart_row(2024, "PL", 500.0));
        let (countries, sources) = chart_options(&rows);
        state.on_chart_options_loaded(&countries, &sources);

        let filter = state.chart_filter(&countries, &sources);
        assert_eq!(filter.years, vec![2025, 2024]);
        assert!(filter.countries.is_empty());

        let january = &build_bar_data(&rows, &filter)[0];
        let bar_2024 = january.bars.iter().find(|b| b.year == 2024).unwrap();
        assert_eq!(bar_2024.total(), 500.0);
        let bar_2025 = january.bars.iter().find(|b| b.year == 2025).unwrap();
        assert!(bar_2025.segments.iter().any(|seg| seg.key == OTHER_KEY));
    }
}

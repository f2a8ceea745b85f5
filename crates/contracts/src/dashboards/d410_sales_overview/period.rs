//! Period resolution: turns the period selector into a closed date interval
//! and derives the comparable previous period.
//!
//! All arithmetic is done on `NaiveDate` (local calendar dates); nothing is
//! ever round-tripped through a UTC timestamp.

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PeriodMode {
    #[default]
    Year,
    Month,
    DateRange,
}

impl PeriodMode {
    pub fn label(&self) -> &'static str {
        match self {
            PeriodMode::Year => "Year",
            PeriodMode::Month => "Month",
            PeriodMode::DateRange => "Dates",
        }
    }
}

/// Raw period selector values as edited in the UI.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeriodFilters {
    pub mode: PeriodMode,
    /// `"2024"`
    pub year: String,
    /// Zero-padded month, `"02"`
    pub month: String,
    /// `YYYY-MM-DD`, used in date-range mode only
    pub date_start: String,
    /// `YYYY-MM-DD`, used in date-range mode only
    pub date_end: String,
}

impl PeriodFilters {
    pub fn year_value(&self) -> Option<i32> {
        self.year.trim().parse::<i32>().ok()
    }
}

/// Closed interval `[start, end]`. `end >= start` is the caller's concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    pub mode: PeriodMode,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Period {
    pub fn start_str(&self) -> String {
        self.start.format(DATE_FORMAT).to_string()
    }

    pub fn end_str(&self) -> String {
        self.end.format(DATE_FORMAT).to_string()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

/// Last calendar day of `month` (`"01"`..`"12"`) in `year`.
pub fn last_day_of_month(year: i32, month: &str) -> Option<NaiveDate> {
    let m = month.trim().parse::<u32>().ok()?;
    NaiveDate::from_ymd_opt(year, m, 1)?
        .checked_add_months(Months::new(1))?
        .pred_opt()
}

/// Resolve the current selection to a date interval. `None` means there is
/// nothing to fetch: no shop, an unparsable year, a missing month, or empty
/// explicit dates.
pub fn resolve_period(shop: Option<&str>, filters: &PeriodFilters) -> Option<Period> {
    shop.filter(|s| !s.trim().is_empty())?;
    let (start, end) = match filters.mode {
        PeriodMode::Year => {
            let y = filters.year_value()?;
            (NaiveDate::from_ymd_opt(y, 1, 1)?, NaiveDate::from_ymd_opt(y, 12, 31)?)
        }
        PeriodMode::Month => {
            let y = filters.year_value()?;
            let m = filters.month.trim().parse::<u32>().ok()?;
            (NaiveDate::from_ymd_opt(y, m, 1)?, last_day_of_month(y, &filters.month)?)
        }
        PeriodMode::DateRange => (parse_date(&filters.date_start)?, parse_date(&filters.date_end)?),
    };
    Some(Period {
        mode: filters.mode,
        start,
        end,
    })
}

/// Same calendar day one year earlier; 29 February becomes 28 February.
pub fn one_year_earlier(date: NaiveDate) -> Option<NaiveDate> {
    date.checked_sub_months(Months::new(12))
}

/// Whether `today` falls inside the current selection.
fn in_progress(period: &Period, today: NaiveDate) -> bool {
    match period.mode {
        PeriodMode::Year => period.start.year() == today.year(),
        PeriodMode::Month => {
            period.start.year() == today.year() && period.start.month() == today.month()
        }
        PeriodMode::DateRange => period.contains(today),
    }
}

/// The comparable previous period: the same span one year earlier. While
/// the current period is still running its end is clamped to "today, one
/// year ago" so both sides cover the same number of elapsed days.
pub fn previous_period(shop: Option<&str>, filters: &PeriodFilters, today: NaiveDate) -> Option<Period> {
    let current = resolve_period(shop, filters)?;
    let start = one_year_earlier(current.start)?;
    let mut end = one_year_earlier(current.end)?;
    if in_progress(&current, today) {
        end = end.min(one_year_earlier(today)?);
    }
    Some(Period {
        mode: current.mode,
        start,
        end,
    })
}

/// Period-over-period comparison is meaningful only when the shop has data
/// in a year before the one selected.
pub fn comparison_available(available_years: &[i32], period: &Period) -> bool {
    let year = period.start.year();
    available_years.iter().any(|&y| y < year)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn year(y: &str) -> PeriodFilters {
        PeriodFilters {
            mode: PeriodMode::Year,
            year: y.to_string(),
            ..Default::default()
        }
    }

    fn month(y: &str, m: &str) -> PeriodFilters {
        PeriodFilters {
            mode: PeriodMode::Month,
            year: y.to_string(),
            month: m.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_last_day_of_month_leap_years() {
        assert_eq!(last_day_of_month(2024, "02"), Some(d(2024, 2, 29)));
        assert_eq!(last_day_of_month(2023, "02"), Some(d(2023, 2, 28)));
        assert_eq!(last_day_of_month(2000, "02"), Some(d(2000, 2, 29)));
        assert_eq!(last_day_of_month(1900, "02"), Some(d(1900, 2, 28)));
        assert_eq!(last_day_of_month(2024, "12"), Some(d(2024, 12, 31)));
        assert_eq!(last_day_of_month(2024, "13"), None);
        assert_eq!(last_day_of_month(2024, ""), None);
    }

    #[test]
    fn test_year_and_month_intervals() {
        let p = resolve_period(Some("Shop"), &year("2024")).unwrap();
        assert_eq!((p.start_str(), p.end_str()), ("2024-01-01".into(), "2024-12-31".into()));

        let p = resolve_period(Some("Shop"), &month("2024", "04")).unwrap();
        assert_eq!((p.start, p.end), (d(2024, 4, 1), d(2024, 4, 30)));
    }

    #[test]
    fn test_date_range_passes_through_unvalidated() {
        let filters = PeriodFilters {
            mode: PeriodMode::DateRange,
            date_start: "2024-05-10".into(),
            date_end: "2024-05-01".into(),
            ..Default::default()
        };
        let p = resolve_period(Some("Shop"), &filters).unwrap();
        assert_eq!((p.start, p.end), (d(2024, 5, 10), d(2024, 5, 1)));
    }

    #[test]
    fn test_unresolvable_selection_is_none() {
        assert_eq!(resolve_period(None, &year("2024")), None);
        assert_eq!(resolve_period(Some("  "), &year("2024")), None);
        assert_eq!(resolve_period(Some("Shop"), &year("abc")), None);
        assert_eq!(resolve_period(Some("Shop"), &month("2024", "")), None);
        let empty_dates = PeriodFilters {
            mode: PeriodMode::DateRange,
            ..Default::default()
        };
        assert_eq!(resolve_period(Some("Shop"), &empty_dates), None);
    }

    #[test]
    fn test_mode_switch_keeps_year_start() {
        let mut filters = year("2024");
        let before = resolve_period(Some("Shop"), &filters).unwrap().start;
        filters.mode = PeriodMode::Month;
        filters.month = "01".into();
        assert_eq!(resolve_period(Some("Shop"), &filters).unwrap().start, d(2024, 1, 1));
        filters.mode = PeriodMode::Year;
        assert_eq!(resolve_period(Some("Shop"), &filters).unwrap().start, before);
        assert_eq!(before, d(2024, 1, 1));
    }

    #[test]
    fn test_previous_of_closed_year_is_full_year() {
        let prev = previous_period(Some("Shop"), &year("2023"), d(2025, 6, 15)).unwrap();
        assert_eq!((prev.start, prev.end), (d(2022, 1, 1), d(2022, 12, 31)));
    }

    #[test]
    fn test_previous_of_running_year_is_clamped_to_today() {
        let prev = previous_period(Some("Shop"), &year("2025"), d(2025, 6, 15)).unwrap();
        assert_eq!((prev.start, prev.end), (d(2024, 1, 1), d(2024, 6, 15)));
    }

    #[test]
    fn test_previous_of_running_month_is_clamped() {
        let prev = previous_period(Some("Shop"), &month("2025", "03"), d(2025, 3, 9)).unwrap();
        assert_eq!((prev.start, prev.end), (d(2024, 3, 1), d(2024, 3, 9)));

        let closed = previous_period(Some("Shop"), &month("2025", "02"), d(2025, 3, 9)).unwrap();
        assert_eq!((closed.start, closed.end), (d(2024, 2, 1), d(2024, 2, 29)));
    }

    #[test]
    fn test_previous_on_leap_day() {
        let prev = previous_period(Some("Shop"), &month("2024", "02"), d(2024, 2, 29)).unwrap();
        assert_eq!((prev.start, prev.end), (d(2023, 2, 1), d(2023, 2, 28)));
    }

    #[test]
    fn test_previous_of_running_date_range() {
        let filters = PeriodFilters {
            mode: PeriodMode::DateRange,
            date_start: "2025-01-10".into(),
            date_end: "2025-12-31".into(),
            ..Default::default()
        };
        let prev = previous_period(Some("Shop"), &filters, d(2025, 2, 1)).unwrap();
        assert_eq!((prev.start, prev.end), (d(2024, 1, 10), d(2024, 2, 1)));
    }

    #[test]
    fn test_previous_requires_shop() {
        assert_eq!(previous_period(None, &year("2024"), d(2024, 1, 1)), None);
    }

    #[test]
    fn test_comparison_suppressed_for_earliest_year() {
        let years = [2025, 2024, 2023];
        let p2023 = resolve_period(Some("Shop"), &year("2023")).unwrap();
        let p2024 = resolve_period(Some("Shop"), &year("2024")).unwrap();
        assert!(!comparison_available(&years, &p2023));
        assert!(comparison_available(&years, &p2024));
        assert!(!comparison_available(&[], &p2024));
    }
}

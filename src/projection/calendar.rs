//! Calendar labels for projection periods

use chrono::{Datelike, Months, NaiveDate};

/// `YYYY-MM` label for each period 0..=periods, starting at `start`'s month
pub fn period_labels(start: NaiveDate, periods: u32) -> Vec<String> {
    let first_of_month = start.with_day(1).unwrap_or(start);
    (0..=periods)
        .map_while(|i| first_of_month.checked_add_months(Months::new(i)))
        .map(|date| date.format("%Y-%m").to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_roll_over_year() {
        let start = NaiveDate::from_ymd_opt(2024, 11, 30).unwrap();
        let labels = period_labels(start, 3);
        assert_eq!(labels, vec!["2024-11", "2024-12", "2025-01", "2025-02"]);
    }

    #[test]
    fn test_label_count_matches_series_length() {
        let start = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        assert_eq!(period_labels(start, 36).len(), 37);
    }
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Portfolio activity series for the dashboard chart.

use crate::models::PortfolioSummary;
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Chart window selected on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    /// Seven daily buckets ending today.
    #[default]
    Week,
    /// Four seven-day buckets ending today.
    Month,
    /// The current and two previous calendar months.
    Quarter,
}

/// One bar of the chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityPoint {
    /// Label of the bucket's last day, e.g. `Mar 5`.
    pub date: String,
    pub portfolios: usize,
}

/// Parse a backend timestamp.
///
/// The backend sends zone-less local date-times (`2024-03-05T10:30:00`,
/// optionally with fractional seconds); RFC 3339 is accepted too. Zone-less
/// values are read as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Count portfolios created in each bucket of `range`, oldest bucket first.
pub fn activity_series(
    portfolios: &[PortfolioSummary],
    range: TimeRange,
    now: DateTime<Utc>,
) -> Vec<ActivityPoint> {
    let created: Vec<NaiveDate> = portfolios
        .iter()
        .filter_map(|p| p.created_at.as_deref())
        .filter_map(parse_timestamp)
        .map(|dt| dt.date_naive())
        .collect();
    let today = now.date_naive();

    let buckets: Vec<(NaiveDate, NaiveDate)> = match range {
        TimeRange::Week => (0..7)
            .rev()
            .map(|i| {
                let day = today - Duration::days(i);
                (day, day)
            })
            .collect(),
        TimeRange::Month => (0..4)
            .rev()
            .map(|i| {
                let end = today - Duration::days(i * 7);
                (end - Duration::days(6), end)
            })
            .collect(),
        TimeRange::Quarter => (0..3)
            .rev()
            .filter_map(|i| month_bounds(today, i))
            .collect(),
    };

    buckets
        .into_iter()
        .map(|(start, end)| ActivityPoint {
            date: end.format("%b %-d").to_string(),
            portfolios: created.iter().filter(|d| **d >= start && **d <= end).count(),
        })
        .collect()
}

/// First and last day of the month `months_back` months before `today`.
fn month_bounds(today: NaiveDate, months_back: u32) -> Option<(NaiveDate, NaiveDate)> {
    let total = today.year() * 12 + today.month0() as i32 - months_back as i32;
    let (year, month0) = (total.div_euclid(12), total.rem_euclid(12) as u32);
    let first = NaiveDate::from_ymd_opt(year, month0 + 1, 1)?;
    let next_first = if month0 == 11 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month0 + 2, 1)?
    };
    Some((first, next_first - Duration::days(1)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn portfolio(created_at: &str) -> PortfolioSummary {
        PortfolioSummary {
            portfolio_id: "P".to_string(),
            title: "T".to_string(),
            created_at: Some(created_at.to_string()),
            updated_at: None,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_parse_timestamp_formats() {
        assert!(parse_timestamp("2026-03-10T08:15:00").is_some());
        assert!(parse_timestamp("2026-03-10T08:15:00.123456").is_some());
        assert!(parse_timestamp("2026-03-10T08:15:00Z").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_week_series_counts_per_day() {
        let portfolios = vec![
            portfolio("2026-03-10T01:00:00"),
            portfolio("2026-03-10T23:00:00"),
            portfolio("2026-03-04T09:00:00"),
            portfolio("2026-03-03T09:00:00"), // outside the window
        ];
        let series = activity_series(&portfolios, TimeRange::Week, now());

        assert_eq!(series.len(), 7);
        assert_eq!(series[0].date, "Mar 4");
        assert_eq!(series[0].portfolios, 1);
        assert_eq!(series[6].date, "Mar 10");
        assert_eq!(series[6].portfolios, 2);
        assert_eq!(series.iter().map(|p| p.portfolios).sum::<usize>(), 3);
    }

    #[test]
    fn test_month_series_uses_weekly_buckets() {
        let portfolios = vec![
            portfolio("2026-03-04T00:00:00"),
            portfolio("2026-03-03T00:00:00"),
            portfolio("2026-02-11T00:00:00"),
        ];
        let series = activity_series(&portfolios, TimeRange::Month, now());

        assert_eq!(series.len(), 4);
        assert_eq!(series[3].date, "Mar 10");
        assert_eq!(series[3].portfolios, 1);
        assert_eq!(series[2].date, "Mar 3");
        assert_eq!(series[2].portfolios, 1);
        assert_eq!(series[0].date, "Feb 17");
        assert_eq!(series[0].portfolios, 1);
    }

    #[test]
    fn test_quarter_series_crosses_year_boundary() {
        let now = Utc.with_ymd_and_hms(2026, 1, 15, 0, 0, 0).unwrap();
        let portfolios = vec![
            portfolio("2025-11-30T00:00:00"),
            portfolio("2025-12-01T00:00:00"),
            portfolio("2026-01-02T00:00:00"),
        ];
        let series = activity_series(&portfolios, TimeRange::Quarter, now);

        let labels: Vec<&str> = series.iter().map(|p| p.date.as_str()).collect();
        assert_eq!(labels, vec!["Nov 30", "Dec 31", "Jan 31"]);
        assert_eq!(
            series.iter().map(|p| p.portfolios).collect::<Vec<_>>(),
            vec![1, 1, 1]
        );
    }
}

//! Period bucketing: turning a report request into an ordered list of
//! calendar-aligned date ranges.
//!
//! # Conventions
//!
//! One convention is used for every report type:
//!
//! - Ranges are **half-open** `[start, end)`: an order created exactly at a
//!   range's `end` belongs to the next range. Adjacent buckets therefore
//!   share a boundary instant with no gap and no overlap.
//! - Weeks start on **Monday**.
//! - Buckets are emitted **newest first** (bucket 0 contains the reference
//!   instant); the assembler reverses them for chronological display.
//!
//! Boundary arithmetic is calendar-based (`chrono::Days`/`chrono::Months`),
//! so month lengths and year boundaries are handled correctly.

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::ReportType;

/// A half-open UTC date range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    /// Whether `instant` falls inside the range.
    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant < self.end
    }
}

/// One report bucket: a labelled date range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodBucket {
    /// Display label, e.g. `"10 Jan 2025"`, `"Week of 06 Jan 2025"`.
    pub label: String,
    /// The bucket's date range.
    pub range: DateRange,
}

/// Compute `periods` buckets of `report_type` ending at `reference`.
///
/// Bucket 0 is the period containing `reference`; the last bucket is the
/// oldest. For yearly reports an explicit `year` re-anchors bucket 0 to that
/// calendar year. `periods == 0` yields an empty (valid) sequence.
#[must_use]
pub fn bucketize(
    report_type: ReportType,
    periods: u32,
    reference: DateTime<Utc>,
    year: Option<i32>,
) -> Vec<PeriodBucket> {
    let today = reference.date_naive();

    (0..periods)
        .map(|i| match report_type {
            ReportType::Daily => daily_bucket(today, i),
            ReportType::Weekly => weekly_bucket(today, i),
            ReportType::Monthly => monthly_bucket(today, i),
            ReportType::Quarterly => quarterly_bucket(today, i),
            ReportType::Yearly => yearly_bucket(year.unwrap_or_else(|| today.year()), i),
        })
        .collect()
}

/// Midnight UTC at the start of `date`.
fn day_start(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Subtract whole days with a saturating fallback at the calendar edge.
fn minus_days(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_sub_days(Days::new(days)).unwrap_or(NaiveDate::MIN)
}

/// Subtract whole months with a saturating fallback at the calendar edge.
fn minus_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_sub_months(Months::new(months))
        .unwrap_or(NaiveDate::MIN)
}

fn daily_bucket(today: NaiveDate, i: u32) -> PeriodBucket {
    let day = minus_days(today, u64::from(i));
    let start = day_start(day);
    PeriodBucket {
        label: day.format("%d %b %Y").to_string(),
        range: DateRange {
            start,
            end: day_start(day.succ_opt().unwrap_or(day)),
        },
    }
}

fn weekly_bucket(today: NaiveDate, i: u32) -> PeriodBucket {
    let anchor = minus_days(today, u64::from(i) * 7);
    let week_start = minus_days(anchor, u64::from(anchor.weekday().num_days_from_monday()));
    let start = day_start(week_start);
    let end = start + chrono::Duration::days(7);
    PeriodBucket {
        label: format!("Week of {}", week_start.format("%d %b %Y")),
        range: DateRange { start, end },
    }
}

fn monthly_bucket(today: NaiveDate, i: u32) -> PeriodBucket {
    let month_start = minus_months(today.with_day(1).unwrap_or(today), i);
    let start = day_start(month_start);
    let end = day_start(
        month_start
            .checked_add_months(Months::new(1))
            .unwrap_or(month_start),
    );
    PeriodBucket {
        label: month_start.format("%b %Y").to_string(),
        range: DateRange { start, end },
    }
}

fn quarterly_bucket(today: NaiveDate, i: u32) -> PeriodBucket {
    // Align to the start of the quarter containing `today`, then step back
    // whole quarters.
    let quarter_month = (today.month0() / 3) * 3 + 1;
    let current_quarter = NaiveDate::from_ymd_opt(today.year(), quarter_month, 1)
        .unwrap_or_else(|| today.with_day(1).unwrap_or(today));
    let quarter_start = minus_months(current_quarter, i * 3);
    let start = day_start(quarter_start);
    let end = day_start(
        quarter_start
            .checked_add_months(Months::new(3))
            .unwrap_or(quarter_start),
    );
    let quarter_number = quarter_start.month0() / 3 + 1;
    PeriodBucket {
        label: format!("Q{} {}", quarter_number, quarter_start.year()),
        range: DateRange { start, end },
    }
}

fn yearly_bucket(anchor_year: i32, i: u32) -> PeriodBucket {
    let year = anchor_year - i32::try_from(i).unwrap_or(i32::MAX);
    let start_date = NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(NaiveDate::MIN);
    let end_date = NaiveDate::from_ymd_opt(year + 1, 1, 1).unwrap_or(NaiveDate::MAX);
    PeriodBucket {
        label: year.to_string(),
        range: DateRange {
            start: day_start(start_date),
            end: day_start(end_date),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn reference() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 10, 12, 30, 0).single().expect("valid date")
    }

    /// Chronologically sorted ranges must tile the window: each end equals
    /// the next start, with exactly N buckets.
    fn assert_contiguous(buckets: &[PeriodBucket], n: usize) {
        assert_eq!(buckets.len(), n);
        let mut chronological: Vec<_> = buckets.iter().rev().collect();
        chronological.sort_by_key(|b| b.range.start);
        for pair in chronological.windows(2) {
            assert_eq!(
                pair[0].range.end, pair[1].range.start,
                "gap or overlap between {:?} and {:?}",
                pair[0].label, pair[1].label
            );
        }
        for b in buckets {
            assert!(b.range.start < b.range.end);
        }
    }

    #[test]
    fn test_daily_buckets() {
        let buckets = bucketize(ReportType::Daily, 3, reference(), None);
        assert_contiguous(&buckets, 3);

        // Bucket 0 is the day containing the reference instant.
        assert!(buckets[0].range.contains(reference()));
        assert_eq!(buckets[0].label, "10 Jan 2025");
        assert_eq!(buckets[1].label, "09 Jan 2025");
        assert_eq!(buckets[2].label, "08 Jan 2025");
    }

    #[test]
    fn test_daily_crosses_year_boundary() {
        let buckets = bucketize(ReportType::Daily, 15, reference(), None);
        assert_contiguous(&buckets, 15);
        assert_eq!(buckets[14].label, "27 Dec 2024");
    }

    #[test]
    fn test_weekly_starts_monday() {
        // 2025-01-10 is a Friday; its week starts Monday 2025-01-06.
        let buckets = bucketize(ReportType::Weekly, 4, reference(), None);
        assert_contiguous(&buckets, 4);
        assert_eq!(buckets[0].label, "Week of 06 Jan 2025");
        for b in &buckets {
            assert_eq!(b.range.end - b.range.start, chrono::Duration::days(7));
            assert_eq!(
                b.range.start.date_naive().weekday(),
                chrono::Weekday::Mon
            );
        }
    }

    #[test]
    fn test_monthly_calendar_lengths() {
        let buckets = bucketize(ReportType::Monthly, 3, reference(), None);
        assert_contiguous(&buckets, 3);
        assert_eq!(buckets[0].label, "Jan 2025");
        assert_eq!(buckets[1].label, "Dec 2024");
        assert_eq!(buckets[2].label, "Nov 2024");

        // November is 30 days, December 31.
        let nov = &buckets[2].range;
        assert_eq!((nov.end - nov.start).num_days(), 30);
        let dec = &buckets[1].range;
        assert_eq!((dec.end - dec.start).num_days(), 31);
    }

    #[test]
    fn test_quarterly_alignment() {
        let buckets = bucketize(ReportType::Quarterly, 4, reference(), None);
        assert_contiguous(&buckets, 4);
        assert_eq!(buckets[0].label, "Q1 2025");
        assert_eq!(buckets[1].label, "Q4 2024");
        assert_eq!(buckets[3].label, "Q2 2024");
    }

    #[test]
    fn test_yearly_with_anchor_year() {
        let buckets = bucketize(ReportType::Yearly, 3, reference(), Some(2023));
        assert_contiguous(&buckets, 3);
        assert_eq!(buckets[0].label, "2023");
        assert_eq!(buckets[2].label, "2021");
    }

    #[test]
    fn test_yearly_defaults_to_reference_year() {
        let buckets = bucketize(ReportType::Yearly, 1, reference(), None);
        assert_eq!(buckets[0].label, "2025");
    }

    #[test]
    fn test_zero_periods_is_empty() {
        assert!(bucketize(ReportType::Daily, 0, reference(), None).is_empty());
    }

    #[test]
    fn test_half_open_boundary() {
        let buckets = bucketize(ReportType::Daily, 2, reference(), None);
        let midnight = buckets[0].range.start;
        assert!(buckets[0].range.contains(midnight));
        assert!(!buckets[1].range.contains(midnight));
    }
}

use crate::config::{FirstDayOfWeek, Period};
use crate::model::{GraphError, IntensityLevel};
use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime};
use log::debug;

/// Inclusive window of calendar instants.
///
/// `start <= end` holds for every named period. A custom window is taken
/// verbatim, so an inverted one is possible and reads as empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Set when a custom period lacked usable bounds and the 12-month window
    /// was substituted.
    pub fallback: bool,
}

impl DateRange {
    pub fn start_date(&self) -> NaiveDate {
        self.start.date()
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end.date()
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date() && date <= self.end_date()
    }
}

/// Zero-padded `YYYY-MM-DD` from the value's own calendar fields.
pub fn format_date<D: Datelike>(date: &D) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}

pub fn parse_date(input: &str) -> Result<NaiveDate, GraphError> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map_err(|_| GraphError::InvalidInput(format!("invalid date (use YYYY-MM-DD): {}", trimmed)))
}

/// Buckets a raw count into the five visual levels.
pub fn activity_level(count: i64) -> Result<IntensityLevel, GraphError> {
    if count < 0 {
        return Err(GraphError::InvalidInput(format!(
            "activity count must not be negative: {}",
            count
        )));
    }
    Ok(IntensityLevel::from_count(
        u32::try_from(count).unwrap_or(u32::MAX),
    ))
}

pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    start_of_day(date) + Duration::milliseconds(86_399_999)
}

pub fn compute_date_range(
    period: Period,
    custom_start: Option<&str>,
    custom_end: Option<&str>,
    today: NaiveDate,
) -> DateRange {
    let months_back = match period {
        Period::OneMonth => 1,
        Period::ThreeMonths => 3,
        Period::SixMonths => 6,
        Period::TwelveMonths => 12,
        Period::Custom => {
            let bounds = match (custom_start, custom_end) {
                (Some(start), Some(end)) => parse_date(start).ok().zip(parse_date(end).ok()),
                _ => None,
            };
            if let Some((start, end)) = bounds {
                return DateRange {
                    start: start_of_day(start),
                    end: end_of_day(end),
                    fallback: false,
                };
            }
            debug!(
                "custom period bounds unusable (start={:?}, end={:?}); using 12 months",
                custom_start, custom_end
            );
            let mut range = months_ending(today, 12);
            range.fallback = true;
            return range;
        }
    };
    months_ending(today, months_back)
}

fn months_ending(today: NaiveDate, months: u32) -> DateRange {
    let start = today
        .checked_sub_months(Months::new(months))
        .unwrap_or(NaiveDate::MIN);
    DateRange {
        start: start_of_day(start),
        end: end_of_day(today),
        fallback: false,
    }
}

/// First-of-month dates for every month touching `[start, end]`.
pub fn months_in_range(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut months = Vec::new();
    let mut current = first_of_month(start);
    while current <= end {
        months.push(current);
        match current.checked_add_months(Months::new(1)) {
            Some(next) => current = next,
            None => break,
        }
    }
    months
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return 0;
    };
    first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .map(|d| d.day())
        .unwrap_or(31)
}

/// Blank cells before day 1 so it lands under its weekday column. Always in `0..=6`.
pub fn calendar_padding(first_of_month: NaiveDate, first_day: FirstDayOfWeek) -> u32 {
    (first_of_month.weekday().num_days_from_sunday() + 7 - first_day.number()) % 7
}

/// Latest date on or before `date` that falls on `first_day`.
pub fn align_to_week_start(date: NaiveDate, first_day: FirstDayOfWeek) -> NaiveDate {
    let back = calendar_padding(date, first_day);
    date - Duration::days(back as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn format_date_pads_fields() {
        assert_eq!(format_date(&ymd(2024, 3, 5)), "2024-03-05");
        assert_eq!(format_date(&ymd(987, 12, 31)), "0987-12-31");
    }

    #[test]
    fn format_date_round_trips_through_parse() {
        let mut date = ymd(2023, 12, 25);
        for _ in 0..800 {
            assert_eq!(parse_date(&format_date(&date)).unwrap(), date);
            date = date.succ_opt().unwrap();
        }
    }

    #[test]
    fn format_date_uses_local_fields_of_datetimes() {
        let dt = ymd(2024, 6, 15).and_hms_opt(23, 59, 59).unwrap();
        assert_eq!(format_date(&dt), "2024-06-15");
    }

    #[test]
    fn parse_date_rejects_garbage() {
        assert!(matches!(
            parse_date("2024-13-40"),
            Err(GraphError::InvalidInput(_))
        ));
        assert!(parse_date("yesterday").is_err());
    }

    #[rstest]
    #[case(0, IntensityLevel::None)]
    #[case(1, IntensityLevel::Low)]
    #[case(2, IntensityLevel::Low)]
    #[case(3, IntensityLevel::Medium)]
    #[case(5, IntensityLevel::Medium)]
    #[case(6, IntensityLevel::High)]
    #[case(10, IntensityLevel::High)]
    #[case(11, IntensityLevel::VeryHigh)]
    #[case(5000, IntensityLevel::VeryHigh)]
    fn activity_level_thresholds(#[case] count: i64, #[case] expected: IntensityLevel) {
        assert_eq!(activity_level(count).unwrap(), expected);
    }

    #[test]
    fn activity_level_is_monotonic() {
        let mut previous = IntensityLevel::None;
        for count in 0..200 {
            let level = activity_level(count).unwrap();
            assert!(level >= previous);
            previous = level;
        }
    }

    #[test]
    fn activity_level_rejects_negative_counts() {
        assert!(matches!(activity_level(-1), Err(GraphError::InvalidInput(_))));
    }

    #[test]
    fn twelve_months_ends_today_at_end_of_day() {
        let range = compute_date_range(Period::TwelveMonths, None, None, ymd(2024, 6, 15));
        assert_eq!(range.start, ymd(2023, 6, 15).and_hms_opt(0, 0, 0).unwrap());
        assert_eq!(
            range.end,
            ymd(2024, 6, 15).and_hms_milli_opt(23, 59, 59, 999).unwrap()
        );
        assert!(!range.fallback);
    }

    #[rstest]
    #[case(Period::OneMonth, ymd(2024, 5, 15))]
    #[case(Period::ThreeMonths, ymd(2024, 3, 15))]
    #[case(Period::SixMonths, ymd(2023, 12, 15))]
    fn named_periods_step_back_whole_months(#[case] period: Period, #[case] start: NaiveDate) {
        let range = compute_date_range(period, None, None, ymd(2024, 6, 15));
        assert_eq!(range.start_date(), start);
        assert_eq!(range.end_date(), ymd(2024, 6, 15));
    }

    #[test]
    fn month_subtraction_clamps_to_month_end() {
        let range = compute_date_range(Period::OneMonth, None, None, ymd(2024, 3, 31));
        assert_eq!(range.start_date(), ymd(2024, 2, 29));
    }

    #[test]
    fn custom_range_is_taken_verbatim() {
        let range = compute_date_range(
            Period::Custom,
            Some("2024-01-01"),
            Some("2024-01-31"),
            ymd(2030, 1, 1),
        );
        assert_eq!(range.start, ymd(2024, 1, 1).and_hms_opt(0, 0, 0).unwrap());
        assert_eq!(
            range.end,
            ymd(2024, 1, 31).and_hms_milli_opt(23, 59, 59, 999).unwrap()
        );
        assert!(!range.fallback);
    }

    #[test]
    fn custom_range_without_bounds_falls_back_to_twelve_months() {
        let today = ymd(2024, 6, 15);
        let named = compute_date_range(Period::TwelveMonths, None, None, today);
        let custom = compute_date_range(Period::Custom, None, None, today);
        assert!(custom.fallback);
        assert_eq!((custom.start, custom.end), (named.start, named.end));
    }

    // A single missing bound is treated like both missing.
    #[rstest]
    #[case(Some("2024-01-01"), None)]
    #[case(None, Some("2024-01-31"))]
    #[case(Some("2024-01-01"), Some("not a date"))]
    fn partial_custom_bounds_fall_back(#[case] start: Option<&str>, #[case] end: Option<&str>) {
        let range = compute_date_range(Period::Custom, start, end, ymd(2024, 6, 15));
        assert!(range.fallback);
        assert_eq!(range.start_date(), ymd(2023, 6, 15));
    }

    #[test]
    fn inverted_custom_range_is_empty() {
        let range = compute_date_range(
            Period::Custom,
            Some("2024-02-01"),
            Some("2024-01-01"),
            ymd(2024, 6, 15),
        );
        assert!(range.is_empty());
        assert!(!range.contains(ymd(2024, 1, 15)));
    }

    #[test]
    fn months_in_range_includes_partial_months() {
        let months = months_in_range(ymd(2024, 1, 15), ymd(2024, 3, 10));
        assert_eq!(months, vec![ymd(2024, 1, 1), ymd(2024, 2, 1), ymd(2024, 3, 1)]);
    }

    #[test]
    fn months_in_range_single_day_and_inverted() {
        assert_eq!(months_in_range(ymd(2024, 2, 29), ymd(2024, 2, 29)), vec![ymd(2024, 2, 1)]);
        assert!(months_in_range(ymd(2024, 3, 1), ymd(2024, 2, 1)).is_empty());
    }

    #[test]
    fn months_in_range_crosses_years() {
        let months = months_in_range(ymd(2023, 11, 30), ymd(2024, 1, 1));
        assert_eq!(months.len(), 3);
        assert_eq!(months[2], ymd(2024, 1, 1));
    }

    #[rstest]
    #[case(2024, 2, 29)]
    #[case(2023, 2, 28)]
    #[case(2024, 4, 30)]
    #[case(2024, 12, 31)]
    fn days_in_month_handles_lengths(#[case] year: i32, #[case] month: u32, #[case] days: u32) {
        assert_eq!(days_in_month(year, month), days);
    }

    #[test]
    fn padding_stays_in_week_bounds() {
        for month in 1..=12 {
            let first = ymd(2024, month, 1);
            for first_day in [FirstDayOfWeek::Sunday, FirstDayOfWeek::Monday] {
                let padding = calendar_padding(first, first_day);
                assert!(padding <= 6);
                let expected =
                    (first.weekday().num_days_from_sunday() as i64 - first_day.number() as i64 + 7) % 7;
                assert_eq!(padding as i64, expected);
            }
        }
    }

    #[test]
    fn align_moves_back_to_first_day() {
        // 2024-01-17 is a Wednesday
        let wednesday = ymd(2024, 1, 17);
        assert_eq!(align_to_week_start(wednesday, FirstDayOfWeek::Monday), ymd(2024, 1, 15));
        assert_eq!(align_to_week_start(wednesday, FirstDayOfWeek::Sunday), ymd(2024, 1, 14));
        let monday = ymd(2024, 1, 15);
        assert_eq!(align_to_week_start(monday, FirstDayOfWeek::Monday), monday);
    }
}

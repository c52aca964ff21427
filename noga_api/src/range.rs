//! Inclusive calendar date ranges in the format the gateway expects.

use chrono::{Days, NaiveDate};

/// Date format used at the request boundary, e.g. `26-05-2024`.
pub const API_DATE_FMT: &str = "%d-%m-%Y";

/// Error returned when a range's `from` date falls after its `to` date.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid date range: {from} is after {to}")]
pub struct InvalidRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

/// An inclusive pair of calendar dates. `from` never exceeds `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    from: NaiveDate,
    to: NaiveDate,
}

impl DateRange {
    /// Builds an inclusive range, rejecting inverted bounds.
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self, InvalidRange> {
        if from > to {
            return Err(InvalidRange { from, to });
        }
        Ok(Self { from, to })
    }

    /// A range covering exactly one day.
    pub fn single(day: NaiveDate) -> Self {
        Self { from: day, to: day }
    }

    /// The most recent complete day relative to `today`, i.e. yesterday.
    pub fn recent(today: NaiveDate) -> Self {
        Self::single(today.pred_opt().unwrap_or(today))
    }

    /// From a dataset's earliest known date through yesterday.
    pub fn history(start: NaiveDate, today: NaiveDate) -> Result<Self, InvalidRange> {
        let yesterday = today
            .checked_sub_days(Days::new(1))
            .unwrap_or(start);
        Self::new(start, yesterday)
    }

    pub fn start(&self) -> NaiveDate {
        self.from
    }

    pub fn end(&self) -> NaiveDate {
        self.to
    }

    /// The `fromDate` request parameter, formatted as `dd-mm-yyyy`.
    pub fn from_param(&self) -> String {
        self.from.format(API_DATE_FMT).to_string()
    }

    /// The `toDate` request parameter, formatted as `dd-mm-yyyy`.
    pub fn to_param(&self) -> String {
        self.to.format(API_DATE_FMT).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn recent_range_is_yesterday_only() {
        let range = DateRange::recent(date(2024, 3, 15));
        assert_eq!(range.start(), date(2024, 3, 14));
        assert_eq!(range.end(), date(2024, 3, 14));
    }

    #[test]
    fn history_range_spans_start_through_yesterday() {
        let range = DateRange::history(date(2021, 1, 1), date(2024, 3, 15)).unwrap();
        assert_eq!(range.start(), date(2021, 1, 1));
        assert_eq!(range.end(), date(2024, 3, 14));
    }

    #[test]
    fn history_start_after_yesterday_is_rejected() {
        let err = DateRange::history(date(2024, 3, 15), date(2024, 3, 15)).unwrap_err();
        assert_eq!(err.from, date(2024, 3, 15));
        assert_eq!(err.to, date(2024, 3, 14));
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        assert!(DateRange::new(date(2024, 1, 2), date(2024, 1, 1)).is_err());
    }

    #[test]
    fn params_use_day_first_format() {
        let range = DateRange::single(date(2024, 5, 26));
        assert_eq!(range.from_param(), "26-05-2024");
        assert_eq!(range.to_param(), "26-05-2024");
    }

    #[test]
    fn recent_crosses_month_boundary() {
        let range = DateRange::recent(date(2024, 3, 1));
        assert_eq!(range.from_param(), "29-02-2024");
    }
}

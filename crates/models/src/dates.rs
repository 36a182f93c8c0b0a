use chrono::{Datelike, Months, NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;

/// Format used when dates are shown in list responses and accepted by the
/// `startDate`/`endDate` query parameters, e.g. `01-Jun-2025`
pub const DISPLAY_FORMAT: &str = "%d-%b-%Y";

/// Format accepted for dates in request bodies, e.g. `01-06-2025`
pub const INPUT_FORMAT: &str = "%d-%m-%Y";

/// Format of raw timestamps in single record responses
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

const END_OF_DAY: NaiveTime = match NaiveTime::from_hms_micro_opt(23, 59, 59, 999_999) {
    Some(time) => time,
    None => panic!("invalid end of day"),
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid date `{value}`, expected format {expected}")]
pub struct DateParseError {
    pub value: String,
    pub expected: &'static str,
}

fn parse_with(
    value: &str,
    format: &'static str,
    expected: &'static str,
) -> Result<NaiveDate, DateParseError> {
    NaiveDate::parse_from_str(value.trim(), format).map_err(|_| DateParseError {
        value: value.to_owned(),
        expected,
    })
}

/// Parses a `DD-MMM-YYYY` date (month name is case-insensitive)
pub fn parse_display_date(value: &str) -> Result<NaiveDate, DateParseError> {
    parse_with(value, DISPLAY_FORMAT, "DD-MMM-YYYY")
}

/// Parses a `DD-MM-YYYY` date
pub fn parse_input_date(value: &str) -> Result<NaiveDate, DateParseError> {
    parse_with(value, INPUT_FORMAT, "DD-MM-YYYY")
}

pub fn format_display(date: NaiveDate) -> String {
    date.format(DISPLAY_FORMAT).to_string()
}

/// Formats the day part of a timestamp as `DD-MMM-YYYY`
pub fn format_display_timestamp(timestamp: NaiveDateTime) -> String {
    format_display(timestamp.date())
}

pub fn format_input(date: NaiveDate) -> String {
    date.format(INPUT_FORMAT).to_string()
}

pub fn format_timestamp(timestamp: NaiveDateTime) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

/// Inclusive range of calendar days
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Builds a range from the raw `startDate`/`endDate` query values.
    ///
    /// Only applies when both bounds are present and non-empty, otherwise
    /// returns `Ok(None)`.
    pub fn from_query(
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<Option<Self>, DateParseError> {
        let start = start.map(str::trim).filter(|s| !s.is_empty());
        let end = end.map(str::trim).filter(|s| !s.is_empty());

        match (start, end) {
            (Some(start), Some(end)) => Ok(Some(Self::new(
                parse_display_date(start)?,
                parse_display_date(end)?,
            ))),
            _ => Ok(None),
        }
    }

    /// The calendar month that contains `date`
    pub fn month_containing(date: NaiveDate) -> Option<Self> {
        let start = date.with_day(1)?;
        let end = start.checked_add_months(Months::new(1))?.pred_opt()?;

        Some(Self::new(start, end))
    }

    /// The calendar month right before this range's starting month
    pub fn previous_month(&self) -> Option<Self> {
        let start = self.start.with_day(1)?.checked_sub_months(Months::new(1))?;

        Self::month_containing(start)
    }

    /// First instant of the starting day
    pub fn start_of_day(&self) -> NaiveDateTime {
        self.start.and_time(NaiveTime::MIN)
    }

    /// Last instant of the ending day
    pub fn end_of_day(&self) -> NaiveDateTime {
        self.end.and_time(END_OF_DAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_display_date() {
        assert_eq!(parse_display_date("01-Jun-2025").unwrap(), date(2025, 6, 1));
        assert_eq!(parse_display_date(" 15-jan-2024 ").unwrap(), date(2024, 1, 15));
        assert!(parse_display_date("2025-06-01").is_err());
    }

    #[test]
    fn test_parse_input_date() {
        assert_eq!(parse_input_date("01-06-2025").unwrap(), date(2025, 6, 1));
        assert!(parse_input_date("01-Jun-2025").is_err());
    }

    #[test]
    fn test_course_date_formats() {
        let start = parse_input_date("01-06-2025").unwrap();

        assert_eq!(format_display(start), "01-Jun-2025");
        assert_eq!(format_input(start), "01-06-2025");
    }

    #[test]
    fn test_format_timestamp() {
        let ts = date(2025, 6, 1).and_hms_opt(8, 30, 0).unwrap();

        assert_eq!(format_timestamp(ts), "2025-06-01T08:30:00.000");
        assert_eq!(format_display_timestamp(ts), "01-Jun-2025");
    }

    #[test]
    fn test_range_requires_both_bounds() {
        assert_eq!(DateRange::from_query(Some("01-Jun-2025"), None).unwrap(), None);
        assert_eq!(DateRange::from_query(None, Some("01-Jun-2025")).unwrap(), None);
        assert_eq!(DateRange::from_query(Some(""), Some("01-Jun-2025")).unwrap(), None);

        let range = DateRange::from_query(Some("01-Jun-2025"), Some("30-Jun-2025"))
            .unwrap()
            .unwrap();
        assert_eq!(range, DateRange::new(date(2025, 6, 1), date(2025, 6, 30)));
    }

    #[test]
    fn test_range_rejects_malformed_bound() {
        let err = DateRange::from_query(Some("01-Jun-2025"), Some("yesterday")).unwrap_err();
        assert_eq!(err.value, "yesterday");
    }

    #[test]
    fn test_range_day_bounds() {
        let range = DateRange::new(date(2025, 6, 1), date(2025, 6, 2));

        assert_eq!(range.start_of_day(), date(2025, 6, 1).and_hms_opt(0, 0, 0).unwrap());
        assert_eq!(
            range.end_of_day(),
            date(2025, 6, 2).and_hms_micro_opt(23, 59, 59, 999_999).unwrap()
        );
    }

    #[test]
    fn test_month_boundaries() {
        let feb = DateRange::month_containing(date(2024, 2, 17)).unwrap();
        assert_eq!(feb, DateRange::new(date(2024, 2, 1), date(2024, 2, 29)));

        let jan = feb.previous_month().unwrap();
        assert_eq!(jan, DateRange::new(date(2024, 1, 1), date(2024, 1, 31)));

        let dec = jan.previous_month().unwrap();
        assert_eq!(dec, DateRange::new(date(2023, 12, 1), date(2023, 12, 31)));
    }
}

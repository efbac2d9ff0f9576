//! Permissive parsers used by the cleaner.
//!
//! Both parsers are total: anything they cannot read becomes `None`, which the
//! cleaner stores as `Cell::Missing`.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::cell::Cell;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

// Month-first slash formats go before "%Y/%m/%d": "%Y" reads "01/05/24" as year 1.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%m/%d/%y",
    "%m/%d/%Y",
    "%Y/%m/%d",
    "%m-%d-%Y",
    "%d %b %Y",
    "%d-%b-%Y",
    "%d %B %Y",
    "%b %d, %Y",
    "%B %d, %Y",
];

/// Read a cell as a finite number.
pub fn parse_number(cell: &Cell) -> Option<f64> {
    match cell {
        Cell::Number(n) => Some(*n).filter(|n| n.is_finite()),
        Cell::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        Cell::Date(_) | Cell::Missing => None,
    }
}

/// Read a cell as a date/time. Date-only values land on midnight.
pub fn parse_date(cell: &Cell) -> Option<NaiveDateTime> {
    match cell {
        Cell::Date(d) => Some(*d),
        Cell::Text(s) => parse_date_str(s),
        Cell::Number(_) | Cell::Missing => None,
    }
}

pub fn parse_date_str(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }

    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
    {
        return Some(dt);
    }

    parse_compact_ymd(s)
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
        })
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// `YYYYMMDD`, e.g. "20240105".
fn parse_compact_ymd(s: &str) -> Option<NaiveDate> {
    if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year: i32 = s[0..4].parse().ok()?;
    let month: u32 = s[4..6].parse().ok()?;
    let day: u32 = s[6..8].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    #[test]
    fn test_parse_number_accepts_plain_numerics() {
        assert_eq!(parse_number(&text("100")), Some(100.0));
        assert_eq!(parse_number(&text(" -15.25 ")), Some(-15.25));
        assert_eq!(parse_number(&text("1e3")), Some(1000.0));
        assert_eq!(parse_number(&text("+.5")), Some(0.5));
        assert_eq!(parse_number(&Cell::Number(7.0)), Some(7.0));
    }

    #[test]
    fn test_parse_number_rejects_garbage() {
        assert_eq!(parse_number(&text("abc")), None);
        assert_eq!(parse_number(&text("$1,000.00")), None);
        assert_eq!(parse_number(&text("inf")), None);
        assert_eq!(parse_number(&text("NaN")), None);
        assert_eq!(parse_number(&Cell::Number(f64::NAN)), None);
        assert_eq!(parse_number(&Cell::Missing), None);
        assert_eq!(parse_number(&Cell::Date(ymd(2024, 1, 1))), None);
    }

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(parse_date_str("2024-01-05"), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_date_str("2024/01/05"), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_date_str("20240105"), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_date_str("01/05/2024"), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_date_str("01/05/24"), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_date_str("01-05-2024"), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_date_str("5 Jan 2024"), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_date_str("05-Jan-2024"), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_date_str("Jan 5, 2024"), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_date_str("January 5, 2024"), Some(ymd(2024, 1, 5)));
    }

    #[test]
    fn test_parse_datetime_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 5)
            .unwrap()
            .and_hms_opt(13, 45, 10)
            .unwrap();
        assert_eq!(parse_date_str("2024-01-05 13:45:10"), Some(expected));
        assert_eq!(parse_date_str("2024-01-05T13:45:10"), Some(expected));
        assert_eq!(parse_date_str("2024-01-05T15:45:10+02:00"), Some(expected));
        assert_eq!(parse_date_str("2024-01-05T13:45:10Z"), Some(expected));
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert_eq!(parse_date_str(""), None);
        assert_eq!(parse_date_str("not a date"), None);
        assert_eq!(parse_date_str("2024-13-01"), None);
        assert_eq!(parse_date_str("20241301"), None);
        assert_eq!(parse_date(&Cell::Number(20240105.0)), None);
        assert_eq!(parse_date(&Cell::Missing), None);
    }
}

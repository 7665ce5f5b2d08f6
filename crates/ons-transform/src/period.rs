//! Month labels to dates.
//!
//! Releases label time with date cells, `Jan-2020`-style text, bare month
//! names (with the year implied by the release) or separate Month and Year
//! columns. Every form resolves to the first day of the month, except full
//! dates which are kept as given.

use chrono::{Datelike, NaiveDate};
use ons_ingest::{Cell, excel_serial_to_date};

/// Parses an English month name, full or abbreviated, case-insensitively.
pub fn parse_month_name(name: &str) -> Option<u32> {
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(&format!("1 {name} 2000"), "%d %B %Y")
        .ok()
        .map(|date| date.month())
}

/// First day of `month` (a name) in `year`.
pub fn month_with_year(month: &str, year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, parse_month_name(month)?, 1)
}

/// Parses `YYYY-MM-DD`, `Jan-2020`, `January 2021`, `Jan-21` and similar.
pub fn parse_month_year(label: &str) -> Option<NaiveDate> {
    let label = label.trim();
    if let Ok(date) = NaiveDate::parse_from_str(label, "%Y-%m-%d") {
        return Some(date);
    }
    let (month, year) = label.rsplit_once(['-', ' '])?;
    let year = year.trim();
    if year.is_empty() || !year.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let year: i32 = match year.len() {
        4 => year.parse().ok()?,
        2 => 2000 + year.parse::<i32>().ok()?,
        _ => return None,
    };
    month_with_year(month, year)
}

/// Reads a row-index cell as a date.
pub fn index_cell_to_date(cell: &Cell) -> Option<NaiveDate> {
    match cell {
        Cell::Date(date) => Some(*date),
        Cell::Text(text) => parse_month_year(text),
        Cell::Number(serial) => excel_serial_to_date(*serial),
        Cell::Empty | Cell::Bool(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn month_names() {
        assert_eq!(parse_month_name("January"), Some(1));
        assert_eq!(parse_month_name(" march "), Some(3));
        assert_eq!(parse_month_name("Sep"), Some(9));
        assert_eq!(parse_month_name("Total"), None);
        assert_eq!(parse_month_name(""), None);
    }

    #[test]
    fn month_year_labels() {
        assert_eq!(parse_month_year("Jan-2020"), Some(ymd(2020, 1, 1)));
        assert_eq!(parse_month_year("January 2021"), Some(ymd(2021, 1, 1)));
        assert_eq!(parse_month_year("Dec-21"), Some(ymd(2021, 12, 1)));
        assert_eq!(parse_month_year("2021-05-01"), Some(ymd(2021, 5, 1)));
        assert_eq!(parse_month_year("Jan-202"), None);
        assert_eq!(parse_month_year("Total"), None);
    }

    #[test]
    fn fixed_year_months() {
        assert_eq!(month_with_year("April", 2021), Some(ymd(2021, 4, 1)));
        assert_eq!(month_with_year("Year to date", 2021), None);
    }

    #[test]
    fn index_cells() {
        assert_eq!(
            index_cell_to_date(&Cell::Date(ymd(2021, 2, 1))),
            Some(ymd(2021, 2, 1))
        );
        assert_eq!(
            index_cell_to_date(&Cell::Text("Feb-2021".to_string())),
            Some(ymd(2021, 2, 1))
        );
        assert_eq!(index_cell_to_date(&Cell::Empty), None);
    }
}

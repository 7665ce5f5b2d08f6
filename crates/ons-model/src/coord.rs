//! Dimension labels.

use std::fmt;

use chrono::NaiveDate;

/// A single label along a dimension.
///
/// Releases label most axes with text (cause of death, vaccination status,
/// age group, variable) and the time axis with calendar dates. Ordering is
/// total: every text label sorts before every date, then natural order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Coord {
    Text(String),
    Date(NaiveDate),
}

impl Coord {
    /// Creates a text label.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Returns the text label, if this is one.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            Self::Date(_) => None,
        }
    }

    /// Returns the date label, if this is one.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Text(_) => None,
            Self::Date(date) => Some(*date),
        }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(value) => f.write_str(value),
            Self::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

impl From<&str> for Coord {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Coord {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<NaiveDate> for Coord {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

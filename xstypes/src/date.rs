use std::fmt;
use thiserror::Error;

use crate::calendar::{days_in_month, shift_by_minutes};
use crate::timezone::{ParseTimeZoneError, TimeZoneOffset};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseDateError {
    #[error("malformed date literal: {0:?}")]
    Malformed(String),
    #[error("date component out of range")]
    OutOfRange,
    #[error(transparent)]
    TimeZone(#[from] ParseTimeZoneError),
}

/// An XSD `date` value: a calendar day, optionally time-zoned.
#[derive(Copy, Clone, Debug)]
pub struct Date {
    pub year: i64,
    pub month: u8,
    pub day: u8,
    pub tz: Option<TimeZoneOffset>,
}

impl Date {
    pub fn new(year: i64, month: u8, day: u8, tz: Option<TimeZoneOffset>) -> Result<Self, ParseDateError> {
        if !(1..=12).contains(&month) {
            return Err(ParseDateError::OutOfRange);
        }
        if day < 1 || day > days_in_month(year, month) {
            return Err(ParseDateError::OutOfRange);
        }
        Ok(Self { year, month, day, tz })
    }

    /// Normalizes a time-zoned date to its UTC calendar day, treating the local value as
    /// midnight. Per spec §4.2 this is only meaningful for cross-value equality comparisons.
    fn to_utc_ymd(self) -> (i64, u8, u8) {
        match self.tz {
            None => (self.year, self.month, self.day),
            Some(tz) => {
                let (y, m, d, _, _, _) =
                    shift_by_minutes(self.year, self.month, self.day, 0, 0, 0, tz.minutes());
                (y, m, d)
            }
        }
    }
}

impl std::str::FromStr for Date {
    type Err = ParseDateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (tz, body) = TimeZoneOffset::parse_suffix(s)?;
        let (sign, rest) = match body.as_bytes().first() {
            Some(b'-') => (-1i64, &body[1..]),
            _ => (1i64, body),
        };
        let parts: Vec<&str> = rest.split('-').collect();
        if parts.len() != 3 {
            return Err(ParseDateError::Malformed(s.to_string()));
        }
        let year_digits = parts[0];
        if year_digits.len() < 4 || !year_digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseDateError::Malformed(s.to_string()));
        }
        let year: i64 = year_digits
            .parse()
            .map_err(|_| ParseDateError::Malformed(s.to_string()))?;
        let year = sign * year;
        if parts[1].len() != 2 || parts[2].len() != 2 {
            return Err(ParseDateError::Malformed(s.to_string()));
        }
        let month: u8 = parts[1]
            .parse()
            .map_err(|_| ParseDateError::Malformed(s.to_string()))?;
        let day: u8 = parts[2]
            .parse()
            .map_err(|_| ParseDateError::Malformed(s.to_string()))?;
        Date::new(year, month, day, tz)
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)?;
        if let Some(tz) = self.tz {
            write!(f, "{tz}")?;
        }
        Ok(())
    }
}

impl PartialEq for Date {
    fn eq(&self, other: &Self) -> bool {
        match (self.tz, other.tz) {
            (Some(_), Some(_)) => self.to_utc_ymd() == other.to_utc_ymd(),
            (None, None) => (self.year, self.month, self.day) == (other.year, other.month, other.day),
            // Mixed presence: never equal (spec §4.2).
            _ => false,
        }
    }
}

use std::fmt;
use thiserror::Error;

use crate::calendar::{add_one_day, days_in_month, shift_by_minutes};
use crate::time::{parse_hms, ParseTimeError};
use crate::timezone::{ParseTimeZoneError, TimeZoneOffset};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseDateTimeError {
    #[error("malformed dateTime literal: {0:?}")]
    Malformed(String),
    #[error("dateTime component out of range")]
    OutOfRange,
    #[error(transparent)]
    TimeZone(#[from] ParseTimeZoneError),
    #[error(transparent)]
    Time(#[from] ParseTimeError),
}

/// An XSD `dateTime` value. `24:00:00` canonicalizes to `00:00:00` of the following day
/// (spec §4.2), unlike a bare `time` which has no date to roll into.
#[derive(Copy, Clone, Debug)]
pub struct DateTime {
    pub year: i64,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub nanosecond: u32,
    pub tz: Option<TimeZoneOffset>,
}

impl DateTime {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        year: i64,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
        nanosecond: u32,
        tz: Option<TimeZoneOffset>,
    ) -> Result<Self, ParseDateTimeError> {
        if !(1..=12).contains(&month) || day < 1 || day > days_in_month(year, month) {
            return Err(ParseDateTimeError::OutOfRange);
        }
        if hour == 24 {
            if minute != 0 || second != 0 || nanosecond != 0 {
                return Err(ParseDateTimeError::OutOfRange);
            }
            let (year, month, day) = add_one_day(year, month, day);
            return Ok(Self { year, month, day, hour: 0, minute: 0, second: 0, nanosecond: 0, tz });
        }
        if hour > 23 || minute > 59 || second > 59 || nanosecond >= 1_000_000_000 {
            return Err(ParseDateTimeError::OutOfRange);
        }
        Ok(Self { year, month, day, hour, minute, second, nanosecond, tz })
    }

    fn to_utc(self) -> (i64, u8, u8, u8, u8, u8, u32) {
        match self.tz {
            None => (self.year, self.month, self.day, self.hour, self.minute, self.second, self.nanosecond),
            Some(tz) => {
                let (y, m, d, h, mi, s) = shift_by_minutes(
                    self.year, self.month, self.day, self.hour, self.minute, self.second, tz.minutes(),
                );
                (y, m, d, h, mi, s, self.nanosecond)
            }
        }
    }
}

impl std::str::FromStr for DateTime {
    type Err = ParseDateTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (tz, body) = TimeZoneOffset::parse_suffix(s)?;
        let (date_part, time_part) = body
            .split_once('T')
            .ok_or_else(|| ParseDateTimeError::Malformed(s.to_string()))?;
        let (sign, date_rest) = match date_part.as_bytes().first() {
            Some(b'-') => (-1i64, &date_part[1..]),
            _ => (1i64, date_part),
        };
        let date_fields: Vec<&str> = date_rest.split('-').collect();
        if date_fields.len() != 3 || date_fields[0].len() < 4 {
            return Err(ParseDateTimeError::Malformed(s.to_string()));
        }
        let year: i64 = date_fields[0]
            .parse()
            .map_err(|_| ParseDateTimeError::Malformed(s.to_string()))?;
        let year = sign * year;
        let month: u8 = date_fields[1]
            .parse()
            .map_err(|_| ParseDateTimeError::Malformed(s.to_string()))?;
        let day: u8 = date_fields[2]
            .parse()
            .map_err(|_| ParseDateTimeError::Malformed(s.to_string()))?;
        let (hour, minute, second, nanosecond) = parse_hms(time_part)?;
        DateTime::new(year, month, day, hour, minute, second, nanosecond, tz)
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}", self.year, self.month, self.day, self.hour, self.minute, self.second)?;
        if self.nanosecond != 0 {
            let mut frac = format!("{:09}", self.nanosecond);
            while frac.ends_with('0') {
                frac.pop();
            }
            write!(f, ".{frac}")?;
        }
        if let Some(tz) = self.tz {
            write!(f, "{tz}")?;
        }
        Ok(())
    }
}

impl PartialEq for DateTime {
    fn eq(&self, other: &Self) -> bool {
        match (self.tz, other.tz) {
            (Some(_), Some(_)) => self.to_utc() == other.to_utc(),
            (None, None) => {
                (self.year, self.month, self.day, self.hour, self.minute, self.second, self.nanosecond)
                    == (other.year, other.month, other.day, other.hour, other.minute, other.second, other.nanosecond)
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        for s in ["2024-06-15T12:30:00", "2024-06-15T23:59:59.25Z", "2024-02-28T10:00:00+02:00"] {
            let v: DateTime = s.parse().unwrap();
            assert_eq!(v.to_string(), s);
        }
    }

    #[test]
    fn midnight_rolls_date_forward() {
        let v: DateTime = "2024-02-28T24:00:00".parse().unwrap();
        assert_eq!(v.to_string(), "2024-02-29T00:00:00");
    }

    #[test]
    fn midnight_rolls_year_forward() {
        let v: DateTime = "2023-12-31T24:00:00".parse().unwrap();
        assert_eq!(v.to_string(), "2024-01-01T00:00:00");
    }

    #[test]
    fn tz_normalizes_for_equality() {
        let a: DateTime = "2024-06-15T23:00:00+01:00".parse().unwrap();
        let b: DateTime = "2024-06-15T22:00:00Z".parse().unwrap();
        assert_eq!(a, b);
    }
}

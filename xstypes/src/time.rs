use std::fmt;
use thiserror::Error;

use crate::timezone::{ParseTimeZoneError, TimeZoneOffset};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseTimeError {
    #[error("malformed time literal: {0:?}")]
    Malformed(String),
    #[error("time component out of range")]
    OutOfRange,
    #[error(transparent)]
    TimeZone(#[from] ParseTimeZoneError),
}

/// An XSD `time` value. `24:00:00` is accepted and canonicalizes to `00:00:00` (spec §4.2); a
/// bare `time` has no date to roll over, so the canonicalization only discards the `24:`.
#[derive(Copy, Clone, Debug)]
pub struct Time {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub nanosecond: u32,
    pub tz: Option<TimeZoneOffset>,
}

impl Time {
    pub fn new(
        hour: u8,
        minute: u8,
        second: u8,
        nanosecond: u32,
        tz: Option<TimeZoneOffset>,
    ) -> Result<Self, ParseTimeError> {
        if hour == 24 {
            if minute != 0 || second != 0 || nanosecond != 0 {
                return Err(ParseTimeError::OutOfRange);
            }
            return Ok(Self { hour: 0, minute: 0, second: 0, nanosecond: 0, tz });
        }
        if hour > 23 || minute > 59 || second > 59 || nanosecond >= 1_000_000_000 {
            return Err(ParseTimeError::OutOfRange);
        }
        Ok(Self { hour, minute, second, nanosecond, tz })
    }

    fn to_utc_hms(self) -> (u8, u8, u8, u32) {
        match self.tz {
            None => (self.hour, self.minute, self.second, self.nanosecond),
            Some(tz) => {
                // Shift within a single day for display purposes; date rollover is the
                // dateTime type's responsibility (spec §4.2).
                let total = self.hour as i32 * 60 + self.minute as i32 - tz.minutes() as i32;
                let total = total.rem_euclid(24 * 60);
                ((total / 60) as u8, (total % 60) as u8, self.second, self.nanosecond)
            }
        }
    }
}

pub(crate) fn parse_hms(body: &str) -> Result<(u8, u8, u8, u32), ParseTimeError> {
    let parts: Vec<&str> = body.split(':').collect();
    if parts.len() != 3 || parts[0].len() != 2 || parts[1].len() != 2 {
        return Err(ParseTimeError::Malformed(body.to_string()));
    }
    let hour: u8 = parts[0].parse().map_err(|_| ParseTimeError::Malformed(body.to_string()))?;
    let minute: u8 = parts[1].parse().map_err(|_| ParseTimeError::Malformed(body.to_string()))?;
    let (sec_str, nanosecond) = match parts[2].split_once('.') {
        Some((s, frac)) => {
            if frac.is_empty() || !frac.bytes().all(|b| b.is_ascii_digit()) {
                return Err(ParseTimeError::Malformed(body.to_string()));
            }
            let mut frac = frac.to_string();
            frac.truncate(9);
            while frac.len() < 9 {
                frac.push('0');
            }
            (s, frac.parse().unwrap_or(0))
        }
        None => (parts[2], 0),
    };
    if sec_str.len() != 2 {
        return Err(ParseTimeError::Malformed(body.to_string()));
    }
    let second: u8 = sec_str.parse().map_err(|_| ParseTimeError::Malformed(body.to_string()))?;
    Ok((hour, minute, second, nanosecond))
}

impl std::str::FromStr for Time {
    type Err = ParseTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (tz, body) = TimeZoneOffset::parse_suffix(s)?;
        let (hour, minute, second, nanosecond) = parse_hms(body)?;
        Time::new(hour, minute, second, nanosecond, tz)
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hour, self.minute, self.second)?;
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

impl PartialEq for Time {
    fn eq(&self, other: &Self) -> bool {
        match (self.tz, other.tz) {
            (Some(_), Some(_)) => self.to_utc_hms() == other.to_utc_hms(),
            (None, None) => {
                (self.hour, self.minute, self.second, self.nanosecond)
                    == (other.hour, other.minute, other.second, other.nanosecond)
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
        for s in ["00:00:00", "23:59:59.5", "12:00:00+02:00", "00:00:00Z"] {
            let v: Time = s.parse().unwrap();
            assert_eq!(v.to_string(), s);
        }
    }

    #[test]
    fn midnight_canonicalizes() {
        let v: Time = "24:00:00".parse().unwrap();
        assert_eq!(v.to_string(), "00:00:00");
    }

    #[test]
    fn rejects_bad_midnight() {
        assert!("24:00:01".parse::<Time>().is_err());
    }
}

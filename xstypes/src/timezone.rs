use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseTimeZoneError {
    #[error("time zone offset out of range -14:00..+14:00")]
    OutOfRange,
    #[error("malformed time zone offset: {0:?}")]
    Malformed(String),
}

/// Minute-offset time zone, `-14:00..=+14:00` (spec §4.2).
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeZoneOffset {
    minutes: i16,
}

impl TimeZoneOffset {
    pub const UTC: TimeZoneOffset = TimeZoneOffset { minutes: 0 };
    const MAX_MINUTES: i16 = 14 * 60;

    pub fn from_minutes(minutes: i16) -> Result<Self, ParseTimeZoneError> {
        if minutes.abs() > Self::MAX_MINUTES {
            return Err(ParseTimeZoneError::OutOfRange);
        }
        Ok(Self { minutes })
    }

    pub fn minutes(self) -> i16 {
        self.minutes
    }

    /// Parses the lexical time zone suffix (`Z`, `+hh:mm`, `-hh:mm`), returning the offset and
    /// the remainder of the string with the suffix stripped.
    pub fn parse_suffix(s: &str) -> Result<(Option<Self>, &str), ParseTimeZoneError> {
        if let Some(rest) = s.strip_suffix('Z') {
            return Ok((Some(Self::UTC), rest));
        }
        // Find a trailing +hh:mm or -hh:mm, not confusing it with a leading '-' on the year.
        if s.len() >= 6 {
            let tail = &s[s.len() - 6..];
            let bytes = tail.as_bytes();
            let sign = bytes[0];
            if (sign == b'+' || sign == b'-')
                && bytes[1].is_ascii_digit()
                && bytes[2].is_ascii_digit()
                && bytes[3] == b':'
                && bytes[4].is_ascii_digit()
                && bytes[5].is_ascii_digit()
            {
                let hours: i16 = tail[1..3]
                    .parse()
                    .map_err(|_| ParseTimeZoneError::Malformed(s.to_string()))?;
                let minutes: i16 = tail[4..6]
                    .parse()
                    .map_err(|_| ParseTimeZoneError::Malformed(s.to_string()))?;
                if minutes >= 60 {
                    return Err(ParseTimeZoneError::Malformed(s.to_string()));
                }
                let total = hours * 60 + minutes;
                let total = if sign == b'-' { -total } else { total };
                let offset = Self::from_minutes(total)?;
                return Ok((Some(offset), &s[..s.len() - 6]));
            }
        }
        Ok((None, s))
    }
}

impl fmt::Display for TimeZoneOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.minutes == 0 {
            return write!(f, "Z");
        }
        let sign = if self.minutes < 0 { '-' } else { '+' };
        let abs = self.minutes.abs();
        write!(f, "{sign}{:02}:{:02}", abs / 60, abs % 60)
    }
}

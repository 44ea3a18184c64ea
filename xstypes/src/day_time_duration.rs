use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseDayTimeDurationError {
    #[error("malformed dayTimeDuration literal: {0:?}")]
    Malformed(String),
}

/// An XSD `dayTimeDuration`: the day/time-only subset of `duration`, normalized into a flat
/// second count (decomposed into `D`/`H`/`M`/`S` only when formatting). Negative zero collapses
/// to positive zero.
#[derive(Copy, Clone, Debug)]
pub struct DayTimeDuration {
    negative: bool,
    total_seconds: u64,
    nanosecond: u32,
}

impl DayTimeDuration {
    pub fn new(negative: bool, total_seconds: u64, nanosecond: u32) -> Self {
        let negative = negative && (total_seconds != 0 || nanosecond != 0);
        Self { negative, total_seconds, nanosecond }
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }
}

impl std::str::FromStr for DayTimeDuration {
    type Err = ParseDayTimeDurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (negative, rest) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let rest = rest
            .strip_prefix('P')
            .ok_or_else(|| ParseDayTimeDurationError::Malformed(s.to_string()))?;
        if rest.contains('Y') {
            return Err(ParseDayTimeDurationError::Malformed(s.to_string()));
        }
        let (date_part, time_part) = match rest.split_once('T') {
            Some((d, t)) => (d, Some(t)),
            None => (rest, None),
        };
        if date_part.contains('M') {
            return Err(ParseDayTimeDurationError::Malformed(s.to_string()));
        }
        let days = if date_part.is_empty() {
            0
        } else {
            let days_str = date_part
                .strip_suffix('D')
                .ok_or_else(|| ParseDayTimeDurationError::Malformed(s.to_string()))?;
            days_str
                .parse::<u64>()
                .map_err(|_| ParseDayTimeDurationError::Malformed(s.to_string()))?
        };

        let mut hours = 0u64;
        let mut minutes = 0u64;
        let mut seconds = 0u64;
        let mut nanosecond = 0u32;
        if let Some(time_part) = time_part {
            if time_part.is_empty() {
                return Err(ParseDayTimeDurationError::Malformed(s.to_string()));
            }
            let mut remaining = time_part;
            while !remaining.is_empty() {
                let digit_end = remaining
                    .find(|c: char| !c.is_ascii_digit() && c != '.')
                    .ok_or_else(|| ParseDayTimeDurationError::Malformed(s.to_string()))?;
                let (number, tail) = remaining.split_at(digit_end);
                let designator = tail
                    .chars()
                    .next()
                    .ok_or_else(|| ParseDayTimeDurationError::Malformed(s.to_string()))?;
                match designator {
                    'H' => {
                        hours = number
                            .parse()
                            .map_err(|_| ParseDayTimeDurationError::Malformed(s.to_string()))?
                    }
                    'M' => {
                        minutes = number
                            .parse()
                            .map_err(|_| ParseDayTimeDurationError::Malformed(s.to_string()))?
                    }
                    'S' => {
                        let (whole, frac) = match number.split_once('.') {
                            Some((w, f)) => {
                                let mut f = f.to_string();
                                f.truncate(9);
                                while f.len() < 9 {
                                    f.push('0');
                                }
                                (w, f.parse().unwrap_or(0))
                            }
                            None => (number, 0),
                        };
                        seconds = whole
                            .parse()
                            .map_err(|_| ParseDayTimeDurationError::Malformed(s.to_string()))?;
                        nanosecond = frac;
                    }
                    _ => return Err(ParseDayTimeDurationError::Malformed(s.to_string())),
                }
                remaining = &tail[1..];
            }
        }
        if date_part.is_empty() && time_part.is_none() {
            return Err(ParseDayTimeDurationError::Malformed(s.to_string()));
        }
        let total_seconds = days * 86_400 + hours * 3600 + minutes * 60 + seconds;
        Ok(DayTimeDuration::new(negative, total_seconds, nanosecond))
    }
}

impl fmt::Display for DayTimeDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            write!(f, "-")?;
        }
        write!(f, "P")?;
        let days = self.total_seconds / 86_400;
        let rem = self.total_seconds % 86_400;
        let hours = rem / 3600;
        let minutes = (rem % 3600) / 60;
        let seconds = rem % 60;
        let mut wrote_days = false;
        if days != 0 {
            write!(f, "{days}D")?;
            wrote_days = true;
        }
        let has_time = hours != 0 || minutes != 0 || seconds != 0 || self.nanosecond != 0;
        if has_time {
            write!(f, "T")?;
            if hours != 0 {
                write!(f, "{hours}H")?;
            }
            if minutes != 0 {
                write!(f, "{minutes}M")?;
            }
            if seconds != 0 || self.nanosecond != 0 || (!wrote_days && !has_time) {
                write!(f, "{seconds}")?;
                if self.nanosecond != 0 {
                    let mut frac = format!("{:09}", self.nanosecond);
                    while frac.ends_with('0') {
                        frac.pop();
                    }
                    write!(f, ".{frac}")?;
                }
                write!(f, "S")?;
            }
        } else if !wrote_days {
            write!(f, "T0S")?;
        }
        Ok(())
    }
}

impl PartialEq for DayTimeDuration {
    fn eq(&self, other: &Self) -> bool {
        self.negative == other.negative
            && self.total_seconds == other.total_seconds
            && self.nanosecond == other.nanosecond
    }
}

impl PartialOrd for DayTimeDuration {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        let signed = |d: &Self| {
            let magnitude = d.total_seconds as i128 * 1_000_000_000 + d.nanosecond as i128;
            if d.negative {
                -magnitude
            } else {
                magnitude
            }
        };
        Some(signed(self).cmp(&signed(other)))
    }
}

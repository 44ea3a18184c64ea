use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseDurationError {
    #[error("malformed duration literal: {0:?}")]
    Malformed(String),
}

/// Parses the digits-and-designator run of a duration body (the part after `P` or `T`),
/// returning `(years_or_days_component, found_any)` pairs per designator in order.
fn parse_components<'a>(
    body: &'a str,
    designators: &[char],
) -> Result<Vec<Option<(u64, u32)>>, ParseDurationError> {
    let mut out = vec![None; designators.len()];
    let mut rest = body;
    while !rest.is_empty() {
        let digit_end = rest
            .find(|c: char| !c.is_ascii_digit() && c != '.')
            .ok_or_else(|| ParseDurationError::Malformed(body.to_string()))?;
        let (number, designator_rest) = rest.split_at(digit_end);
        let designator = designator_rest
            .chars()
            .next()
            .ok_or_else(|| ParseDurationError::Malformed(body.to_string()))?;
        let index = designators
            .iter()
            .position(|d| *d == designator)
            .ok_or_else(|| ParseDurationError::Malformed(body.to_string()))?;
        let (whole, frac_nanos) = match number.split_once('.') {
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
        let whole: u64 = whole
            .parse()
            .map_err(|_| ParseDurationError::Malformed(body.to_string()))?;
        out[index] = Some((whole, frac_nanos));
        rest = &designator_rest[designator.len_utf8()..];
    }
    Ok(out)
}

/// A general XSD `duration`: a signed span of calendar months plus clock seconds.
///
/// Normalized per spec §4.2: `months` and `seconds`/`nanosecond` are stored as flat totals and
/// decomposed into `Y`/`M`/`D`/`H`/`M`/`S` designators only when formatting. A zero-length
/// duration is always positive (negative zero collapses to positive zero).
#[derive(Copy, Clone, Debug)]
pub struct Duration {
    negative: bool,
    months: u64,
    seconds: u64,
    nanosecond: u32,
}

impl Duration {
    pub fn new(negative: bool, months: u64, seconds: u64, nanosecond: u32) -> Self {
        let negative = negative && (months != 0 || seconds != 0 || nanosecond != 0);
        Self { negative, months, seconds, nanosecond }
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }
}

impl std::str::FromStr for Duration {
    type Err = ParseDurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (negative, rest) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let rest = rest
            .strip_prefix('P')
            .ok_or_else(|| ParseDurationError::Malformed(s.to_string()))?;
        let (date_part, time_part) = match rest.split_once('T') {
            Some((d, t)) => (d, Some(t)),
            None => (rest, None),
        };
        let date = parse_components(date_part, &['Y', 'M', 'D'])?;
        let years = date[0].unwrap_or((0, 0)).0;
        let months_field = date[1].unwrap_or((0, 0)).0;
        let days = date[2].unwrap_or((0, 0)).0;

        let (hours, minutes, seconds, nanos) = if let Some(time_part) = time_part {
            if time_part.is_empty() {
                return Err(ParseDurationError::Malformed(s.to_string()));
            }
            let time = parse_components(time_part, &['H', 'M', 'S'])?;
            (
                time[0].unwrap_or((0, 0)).0,
                time[1].unwrap_or((0, 0)).0,
                time[2].unwrap_or((0, 0)).0,
                time[2].unwrap_or((0, 0)).1,
            )
        } else {
            (0, 0, 0, 0)
        };

        if date_part.is_empty() && time_part.map(|t| t.is_empty()).unwrap_or(true) {
            return Err(ParseDurationError::Malformed(s.to_string()));
        }

        let months = years * 12 + months_field;
        let total_seconds = days * 86_400 + hours * 3600 + minutes * 60 + seconds;
        Ok(Duration::new(negative, months, total_seconds, nanos))
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            write!(f, "-")?;
        }
        write!(f, "P")?;
        let years = self.months / 12;
        let months = self.months % 12;
        let days = self.seconds / 86_400;
        let rem = self.seconds % 86_400;
        let hours = rem / 3600;
        let minutes = (rem % 3600) / 60;
        let seconds = rem % 60;

        let mut wrote_date = false;
        if years != 0 {
            write!(f, "{years}Y")?;
            wrote_date = true;
        }
        if months != 0 {
            write!(f, "{months}M")?;
            wrote_date = true;
        }
        if days != 0 {
            write!(f, "{days}D")?;
            wrote_date = true;
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
            if seconds != 0 || self.nanosecond != 0 || (!wrote_date && !has_time) {
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
        } else if !wrote_date {
            write!(f, "T0S")?;
        }
        Ok(())
    }
}

impl PartialEq for Duration {
    fn eq(&self, other: &Self) -> bool {
        self.negative == other.negative
            && self.months == other.months
            && self.seconds == other.seconds
            && self.nanosecond == other.nanosecond
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        for s in ["P1Y2M3DT4H5M6S", "PT0S", "P0D", "-P1Y", "PT1.5S"] {
            let v: Duration = s.parse().unwrap();
            let reparsed: Duration = v.to_string().parse().unwrap();
            assert_eq!(v, reparsed, "round trip for {s}");
        }
    }

    #[test]
    fn month_normalization() {
        let v: Duration = "P13M".parse().unwrap();
        assert_eq!(v.to_string(), "P1Y1M");
    }

    #[test]
    fn negative_zero_collapses() {
        let v: Duration = "-P0D".parse().unwrap();
        assert!(!v.is_negative());
    }
}

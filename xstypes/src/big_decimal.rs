use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::big_int::{BigInt, ParseBigIntError};

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid decimal literal: {0:?}")]
pub struct ParseBigDecimalError(pub String);

impl From<ParseBigIntError> for ParseBigDecimalError {
    fn from(e: ParseBigIntError) -> Self {
        ParseBigDecimalError(e.0)
    }
}

/// Arbitrary-precision decimal: `significand * 10^exponent`.
///
/// Normalized so `significand` is not divisible by ten unless it is zero (in which case
/// `exponent` is also zero), giving every value a single canonical representation.
#[derive(Clone, Debug, Eq)]
pub struct BigDecimal {
    significand: BigInt,
    exponent: i32,
}

impl BigDecimal {
    pub const DIVISION_PRECISION: u32 = 28;

    pub fn zero() -> Self {
        Self {
            significand: BigInt::zero(),
            exponent: 0,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.significand.is_zero()
    }

    fn normalize(mut self) -> Self {
        if self.significand.is_zero() {
            self.exponent = 0;
            return self;
        }
        let ten = BigInt::from(10i64);
        loop {
            let rem = self.significand.clone() % ten.clone();
            if !rem.is_zero() {
                break;
            }
            self.significand = self.significand.clone() / ten.clone();
            self.exponent += 1;
        }
        self
    }

    /// Scales both operands' significands to a common exponent (the smaller of the two).
    fn align(a: &BigDecimal, b: &BigDecimal) -> (BigInt, BigInt, i32) {
        let exponent = a.exponent.min(b.exponent);
        let ten = BigInt::from(10i64);
        let scale = |sig: &BigInt, exp: i32| -> BigInt {
            let mut sig = sig.clone();
            let mut diff = exp - exponent;
            while diff > 0 {
                sig = sig * ten.clone();
                diff -= 1;
            }
            sig
        };
        (scale(&a.significand, a.exponent), scale(&b.significand, b.exponent), exponent)
    }
}

impl FromStr for BigDecimal {
    type Err = ParseBigDecimalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseBigDecimalError(s.to_string()));
        }
        let (sign, rest) = match s.as_bytes()[0] {
            b'+' => ("", &s[1..]),
            b'-' => ("-", &s[1..]),
            _ => ("", s),
        };
        let (int_part, frac_part) = match rest.split_once('.') {
            Some((i, f)) => (i, f),
            None => (rest, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(ParseBigDecimalError(s.to_string()));
        }
        if !int_part.bytes().all(|b| b.is_ascii_digit())
            || !frac_part.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(ParseBigDecimalError(s.to_string()));
        }
        let digits = format!("{sign}{int_part}{frac_part}");
        let digits = if digits.is_empty() || digits == "-" { format!("{sign}0") } else { digits };
        let significand: BigInt = digits.parse()?;
        let exponent = -(frac_part.len() as i32);
        Ok(Self { significand, exponent }.normalize())
    }
}

impl fmt::Display for BigDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.exponent >= 0 {
            let ten = BigInt::from(10i64);
            let mut sig = self.significand.clone();
            let mut e = self.exponent;
            while e > 0 {
                sig = sig * ten.clone();
                e -= 1;
            }
            return write!(f, "{sig}");
        }
        let digits = self.significand.to_string();
        let negative = digits.starts_with('-');
        let digits = digits.trim_start_matches('-');
        let frac_len = (-self.exponent) as usize;
        let (int_digits, frac_digits) = if digits.len() > frac_len {
            digits.split_at(digits.len() - frac_len)
        } else {
            ("", digits)
        };
        let int_digits = if int_digits.is_empty() { "0" } else { int_digits };
        let padded_frac = format!("{:0>width$}", frac_digits, width = frac_len);
        if negative {
            write!(f, "-")?;
        }
        write!(f, "{int_digits}.{padded_frac}")
    }
}

impl PartialEq for BigDecimal {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl PartialOrd for BigDecimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BigDecimal {
    fn cmp(&self, other: &Self) -> Ordering {
        let (a, b, _) = Self::align(self, other);
        a.cmp(&b)
    }
}

impl std::ops::Neg for BigDecimal {
    type Output = BigDecimal;
    fn neg(self) -> BigDecimal {
        BigDecimal { significand: -self.significand, exponent: self.exponent }.normalize()
    }
}

impl std::ops::Add for BigDecimal {
    type Output = BigDecimal;
    fn add(self, rhs: BigDecimal) -> BigDecimal {
        let (a, b, exponent) = Self::align(&self, &rhs);
        BigDecimal { significand: a + b, exponent }.normalize()
    }
}

impl std::ops::Sub for BigDecimal {
    type Output = BigDecimal;
    fn sub(self, rhs: BigDecimal) -> BigDecimal {
        self + (-rhs)
    }
}

impl std::ops::Mul for BigDecimal {
    type Output = BigDecimal;
    fn mul(self, rhs: BigDecimal) -> BigDecimal {
        BigDecimal {
            significand: self.significand * rhs.significand,
            exponent: self.exponent + rhs.exponent,
        }
        .normalize()
    }
}

impl std::ops::Div for BigDecimal {
    type Output = BigDecimal;
    fn div(self, rhs: BigDecimal) -> BigDecimal {
        assert!(!rhs.is_zero(), "division by zero");
        // Scale the dividend up so the quotient carries DIVISION_PRECISION significant digits,
        // then truncate (spec §4.2: "division uses 28 significant digits and truncates").
        let ten = BigInt::from(10i64);
        let mut numerator = self.significand.clone();
        let mut scale_exponent = self.exponent - rhs.exponent;
        for _ in 0..Self::DIVISION_PRECISION {
            numerator = numerator * ten.clone();
            scale_exponent -= 1;
        }
        let quotient = numerator / rhs.significand.clone();
        BigDecimal { significand: quotient, exponent: scale_exponent }.normalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_parse_format() {
        for s in ["0.0", "1", "-1.5", "123.456", "-0.001", "100"] {
            let v: BigDecimal = s.parse().unwrap();
            let formatted = v.to_string();
            let reparsed: BigDecimal = formatted.parse().unwrap();
            assert_eq!(v, reparsed, "round trip for {s}");
        }
    }

    #[test]
    fn negative_zero_collapses() {
        let v: BigDecimal = "-0.0".parse().unwrap();
        assert_eq!(v, BigDecimal::zero());
        assert_eq!(v.to_string(), "0");
    }

    #[test]
    fn addition_and_alignment() {
        let a: BigDecimal = "1.1".parse().unwrap();
        let b: BigDecimal = "2.25".parse().unwrap();
        assert_eq!((a + b).to_string(), "3.35");
    }

    #[test]
    fn division_truncates() {
        let a: BigDecimal = "10".parse().unwrap();
        let b: BigDecimal = "3".parse().unwrap();
        let q = a / b;
        assert!(q.to_string().starts_with("3.333333"));
    }
}

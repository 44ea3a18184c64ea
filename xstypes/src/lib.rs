//! Qualified names, arbitrary-precision numerics, and XSD date/time value types.
//!
//! These are the leaf types of the schema compiler: every other crate in the workspace builds
//! on `QName` for cross-references and on the numeric/date-time types for facet values and
//! lexical round-tripping (spec §4.2).

mod big_decimal;
mod big_int;
mod calendar;
mod date;
mod date_time;
mod duration;
mod day_time_duration;
mod qname;
mod time;
mod timezone;
mod year_month_duration;

pub use big_decimal::{BigDecimal, ParseBigDecimalError};
pub use big_int::{BigInt, ParseBigIntError};
pub use date::{Date, ParseDateError};
pub use date_time::{DateTime, ParseDateTimeError};
pub use day_time_duration::{DayTimeDuration, ParseDayTimeDurationError};
pub use duration::{Duration, ParseDurationError};
pub use qname::QName;
pub use time::{ParseTimeError, Time};
pub use timezone::{ParseTimeZoneError, TimeZoneOffset};
pub use year_month_duration::{ParseYearMonthDurationError, YearMonthDuration};

/// Ordered, possibly-repeating list — the IM's name for schema-spec "sequence" properties.
pub type Sequence<T> = Vec<T>;
/// Unordered, deduplicated-by-convention list — the IM's name for schema-spec "set" properties.
pub type Set<T> = Vec<T>;

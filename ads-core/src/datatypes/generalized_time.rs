//! ASN.1 GeneralizedTime in its DER profile (`YYYYMMDDHHMMSSZ`)

use crate::error::{CodecError, CodecResult};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use time::macros::format_description;
use time::{Date, Month, OffsetDateTime, PrimitiveDateTime, Time};

/// DER GeneralizedTime: UTC, no fractional seconds, always 15 characters.
static GENERALIZED_TIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{14}Z$").expect("GeneralizedTime pattern is valid")
});

/// Length in bytes of an encoded GeneralizedTime value
pub const GENERALIZED_TIME_LENGTH: usize = 15;

/// Years the four-digit profile can represent
const YEAR_RANGE: std::ops::RangeInclusive<i32> = 0..=9999;

/// A UTC point in time with one-second resolution, limited to the years
/// 0000-9999 so that every value has a 15-character encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct GeneralizedTime {
    inner: OffsetDateTime,
}

impl GeneralizedTime {
    /// Create from seconds since the Unix epoch
    ///
    /// # Errors
    /// Returns an error if the instant falls outside the years 0000-9999.
    pub fn from_unix_seconds(seconds: i64) -> CodecResult<Self> {
        let inner = OffsetDateTime::from_unix_timestamp(seconds).map_err(|err| {
            CodecError::invalid_field("GeneralizedTime", format!("{} seconds: {}", seconds, err))
        })?;
        Self::checked(inner)
    }

    /// Create from an `OffsetDateTime` in any offset, truncated to whole
    /// seconds
    ///
    /// # Errors
    /// Returns an error if the instant falls outside the years 0000-9999.
    pub fn from_offset_date_time(date_time: OffsetDateTime) -> CodecResult<Self> {
        Self::from_unix_seconds(date_time.unix_timestamp())
    }

    /// Create from calendar fields (UTC)
    ///
    /// # Errors
    /// Returns an error if a field is out of range for the calendar.
    pub fn from_fields(
        year: i64,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
    ) -> CodecResult<Self> {
        let year = i32::try_from(year)
            .ok()
            .filter(|year| YEAR_RANGE.contains(year))
            .ok_or_else(|| {
                CodecError::invalid_field("GeneralizedTime", format!("year {} out of range", year))
            })?;
        let month = Month::try_from(component("month", month)?).map_err(range_error)?;
        let date = Date::from_calendar_date(year, month, component("day", day)?)
            .map_err(range_error)?;
        let time = Time::from_hms(
            component("hour", hour)?,
            component("minute", minute)?,
            component("second", second)?,
        )
        .map_err(range_error)?;
        Ok(Self {
            inner: PrimitiveDateTime::new(date, time).assume_utc(),
        })
    }

    /// Parse the textual DER form `YYYYMMDDHHMMSSZ`
    pub fn parse(s: &str) -> CodecResult<Self> {
        if !GENERALIZED_TIME.is_match(s) {
            return Err(CodecError::invalid_field(
                "GeneralizedTime",
                format!("'{}' is not in YYYYMMDDHHMMSSZ form", s),
            ));
        }
        let parsed = PrimitiveDateTime::parse(
            s,
            format_description!("[year][month][day][hour][minute][second]Z"),
        )
        .map_err(|err| CodecError::invalid_field("GeneralizedTime", format!("'{}': {}", s, err)))?;
        Self::checked(parsed.assume_utc())
    }

    /// Decode the value octets of a GeneralizedTime TLV
    pub fn from_bytes(bytes: &[u8]) -> CodecResult<Self> {
        let text = std::str::from_utf8(bytes).map_err(|_| {
            CodecError::invalid_field("GeneralizedTime", "value is not ASCII")
        })?;
        Self::parse(text)
    }

    /// Encode as value octets (`YYYYMMDDHHMMSSZ`)
    pub fn to_bytes(&self) -> Vec<u8> {
        self.to_string().into_bytes()
    }

    /// Seconds since the Unix epoch
    pub fn unix_seconds(&self) -> i64 {
        self.inner.unix_timestamp()
    }

    /// The instant as an `OffsetDateTime` in UTC
    pub fn as_offset_date_time(&self) -> OffsetDateTime {
        self.inner
    }

    /// Calendar fields `(year, month, day, hour, minute, second)`
    pub fn fields(&self) -> (i64, u32, u32, u32, u32, u32) {
        (
            self.inner.year() as i64,
            u8::from(self.inner.month()) as u32,
            self.inner.day() as u32,
            self.inner.hour() as u32,
            self.inner.minute() as u32,
            self.inner.second() as u32,
        )
    }

    fn checked(inner: OffsetDateTime) -> CodecResult<Self> {
        if !YEAR_RANGE.contains(&inner.year()) {
            return Err(CodecError::invalid_field(
                "GeneralizedTime",
                format!("year {} does not fit four digits", inner.year()),
            ));
        }
        Ok(Self { inner })
    }
}

fn component(name: &str, value: u32) -> CodecResult<u8> {
    u8::try_from(value).map_err(|_| {
        CodecError::invalid_field("GeneralizedTime", format!("{} {} out of range", name, value))
    })
}

fn range_error(err: time::error::ComponentRange) -> CodecError {
    CodecError::invalid_field("GeneralizedTime", err.to_string())
}

impl Default for GeneralizedTime {
    fn default() -> Self {
        Self {
            inner: OffsetDateTime::UNIX_EPOCH,
        }
    }
}

impl TryFrom<i64> for GeneralizedTime {
    type Error = CodecError;

    fn try_from(seconds: i64) -> CodecResult<Self> {
        Self::from_unix_seconds(seconds)
    }
}

impl From<GeneralizedTime> for i64 {
    fn from(time: GeneralizedTime) -> Self {
        time.unix_seconds()
    }
}

impl TryFrom<OffsetDateTime> for GeneralizedTime {
    type Error = CodecError;

    fn try_from(date_time: OffsetDateTime) -> CodecResult<Self> {
        Self::from_offset_date_time(date_time)
    }
}

impl fmt::Display for GeneralizedTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self
            .inner
            .format(format_description!("[year][month][day][hour][minute][second]Z"))
            .map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::UtcOffset;

    /// 9999-12-31T23:59:59Z
    const LAST_SECOND: i64 = 253_402_300_799;
    /// 0000-01-01T00:00:00Z
    const FIRST_SECOND: i64 = -62_167_219_200;

    #[test]
    fn test_parse_epoch() {
        let time = GeneralizedTime::parse("19700101000000Z").unwrap();
        assert_eq!(time.unix_seconds(), 0);
        assert_eq!(time, GeneralizedTime::default());
        assert_eq!(time.to_string(), "19700101000000Z");
    }

    #[test]
    fn test_parse_known_instant() {
        let time = GeneralizedTime::parse("20240229123456Z").unwrap();
        assert_eq!(time.unix_seconds(), 1_709_210_096);
        assert_eq!(time.fields(), (2024, 2, 29, 12, 34, 56));
        assert_eq!(time.to_bytes(), b"20240229123456Z".to_vec());
        assert_eq!(GeneralizedTime::from_fields(2024, 2, 29, 12, 34, 56).unwrap(), time);
    }

    #[test]
    fn test_before_epoch() {
        let time = GeneralizedTime::parse("19691231235959Z").unwrap();
        assert_eq!(time.unix_seconds(), -1);
        assert_eq!(time.to_string(), "19691231235959Z");
    }

    #[test]
    fn test_rejects_bad_syntax() {
        assert!(GeneralizedTime::parse("20240229123456").is_err());
        assert!(GeneralizedTime::parse("20240229123456.5Z").is_err());
        assert!(GeneralizedTime::parse("2024022912345Z").is_err());
        assert!(GeneralizedTime::parse("+2024022912345Z").is_err());
        assert!(GeneralizedTime::from_bytes(&[0xFF; 15]).is_err());
    }

    #[test]
    fn test_rejects_out_of_range_fields() {
        assert!(GeneralizedTime::parse("20230229000000Z").is_err());
        assert!(GeneralizedTime::parse("20241301000000Z").is_err());
        assert!(GeneralizedTime::parse("20240101240000Z").is_err());
        assert!(GeneralizedTime::parse("20240101006000Z").is_err());
        assert!(GeneralizedTime::from_fields(10_000, 1, 1, 0, 0, 0).is_err());
        assert!(GeneralizedTime::from_fields(-1, 12, 31, 0, 0, 0).is_err());
        assert!(GeneralizedTime::from_fields(2024, 1, 300, 0, 0, 0).is_err());
    }

    #[test]
    fn test_four_digit_year_bounds() {
        let last = GeneralizedTime::from_unix_seconds(LAST_SECOND).unwrap();
        assert_eq!(last.to_string(), "99991231235959Z");
        assert_eq!(GeneralizedTime::from_bytes(&last.to_bytes()).unwrap(), last);

        let first = GeneralizedTime::from_unix_seconds(FIRST_SECOND).unwrap();
        assert_eq!(first.to_string(), "00000101000000Z");
        assert_eq!(GeneralizedTime::from_bytes(&first.to_bytes()).unwrap(), first);

        assert!(GeneralizedTime::from_unix_seconds(LAST_SECOND + 1).is_err());
        assert!(GeneralizedTime::from_unix_seconds(FIRST_SECOND - 1).is_err());
        assert!(GeneralizedTime::from_unix_seconds(i64::MAX).is_err());
    }

    #[test]
    fn test_from_offset_date_time() {
        let date_time = OffsetDateTime::from_unix_timestamp(1_709_210_096)
            .unwrap()
            .replace_nanosecond(500_000_000)
            .unwrap()
            .to_offset(UtcOffset::from_hms(2, 0, 0).unwrap());
        let time = GeneralizedTime::try_from(date_time).unwrap();
        assert_eq!(time.to_string(), "20240229123456Z");
        assert_eq!(time.as_offset_date_time().offset(), UtcOffset::UTC);
    }

    #[test]
    fn test_ordering_follows_time() {
        let early = GeneralizedTime::parse("20200101000000Z").unwrap();
        let late = GeneralizedTime::parse("20200101000001Z").unwrap();
        assert!(early < late);
    }
}

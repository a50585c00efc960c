//! Calendar date codec.
//!
//! Saves store timestamps as a packed 32-bit integer:
//! `((year + 5000) * 365 + days_since_jan1) * 24 + (hour - 1)`. The calendar
//! has no leap days. Textual dates use the dotted form `Y.M.D.H`.
use std::fmt;
use std::str::FromStr;

use crate::checked;
use crate::{Error, Result};

/// A game date. All fields are one-based; a zero anywhere is invalid.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Date {
    /// Signed year. Zero is invalid.
    pub year: i16,
    /// Month, `1..=12`.
    pub month: u8,
    /// Day of month, bounded by the month's length.
    pub day: u8,
    /// Hour, `1..=24`.
    pub hour: u8,
}

const DAYS_PER_MONTH: [u8; 13] = [0, 31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Rendering styles for [`Date::format`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
    /// `Y.M.D.H` without zero padding.
    DotShort,
    /// `Y.M.D.H` with month, day and hour padded to two digits.
    DotWide,
    /// `YYYY-MM-DDTHH`, with the hour shifted to zero-based.
    Iso8601,
}

impl Date {
    /// Whether every field is within its calendar range.
    pub fn is_valid(&self) -> bool {
        self.year != 0
            && (1..=12).contains(&self.month)
            && self.day != 0
            && self.day <= DAYS_PER_MONTH[self.month as usize]
            && (1..=24).contains(&self.hour)
    }

    /// Unpack a binary date.
    pub fn from_binary(packed: i32) -> Result<Self> {
        let invalid = || Error::InvalidBinaryDate(packed);
        let mut s = packed;
        let hour = s % 24;
        s /= 24;
        let days_since_jan1 = s % 365;
        if hour < 0 || days_since_jan1 < 0 {
            return Err(invalid());
        }
        s /= 365;
        let year: i16 = checked::sub(s, 5000)
            .and_then(checked::cast)
            .map_err(|_| invalid())?;
        let (month, day) = month_day_from_julian(days_since_jan1);
        let date = Date {
            year,
            month,
            day,
            hour: hour as u8 + 1,
        };
        if !date.is_valid() {
            return Err(invalid());
        }
        Ok(date)
    }

    /// Pack into the binary form. Fails on a date outside the calendar.
    pub fn to_binary(&self) -> Result<i32> {
        if !self.is_valid() {
            return Err(Error::InvalidDate(self.to_string()));
        }
        let days_since_jan1 = DAYS_PER_MONTH[1..self.month as usize]
            .iter()
            .map(|&d| i32::from(d))
            .sum::<i32>()
            + i32::from(self.day)
            - 1;
        let years = checked::add(i32::from(self.year), 5000)?;
        let days = checked::add(checked::mul(years, 365)?, days_since_jan1)?;
        checked::add(checked::mul(days, 24)?, i32::from(self.hour) - 1)
    }

    /// Render in the given style.
    pub fn format(&self, format: DateFormat) -> String {
        match format {
            DateFormat::DotShort => self.to_string(),
            DateFormat::DotWide => format!(
                "{}.{:02}.{:02}.{:02}",
                self.year, self.month, self.day, self.hour
            ),
            DateFormat::Iso8601 => format!(
                "{:04}-{:02}-{:02}T{:02}",
                self.year,
                self.month,
                self.day,
                self.hour.saturating_sub(1)
            ),
        }
    }
}

fn month_day_from_julian(days_since_jan1: i32) -> (u8, u8) {
    let mut days = days_since_jan1;
    let mut month = 1u8;
    while month < 12 && days >= i32::from(DAYS_PER_MONTH[month as usize]) {
        days -= i32::from(DAYS_PER_MONTH[month as usize]);
        month += 1;
    }
    (month, days as u8 + 1)
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}.{}.{}.{}", self.year, self.month, self.day, self.hour)
    }
}

impl FromStr for Date {
    type Err = Error;

    /// Parse either a packed integer or the dotted form
    /// `Y.M[M].D[D][.H[H]]`. Validity is checked after parsing, so a
    /// dotted date without an hour never passes.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidDate(s.to_string());
        if !s.contains('.') {
            let packed: i64 = s.parse().map_err(|_| invalid())?;
            let packed: i32 = checked::cast(packed).map_err(|_| invalid())?;
            return Date::from_binary(packed).map_err(|_| invalid());
        }
        let mut parts = s.split('.');
        let year: i64 = parts
            .next()
            .ok_or_else(invalid)?
            .parse()
            .map_err(|_| invalid())?;
        let year: i16 = checked::cast(year).map_err(|_| invalid())?;
        let month = short_field(parts.next(), false).ok_or_else(invalid)?;
        let day = short_field(parts.next(), false).ok_or_else(invalid)?;
        let hour = match parts.next() {
            None => 0,
            Some(h) => short_field(Some(h), true).ok_or_else(invalid)?,
        };
        if parts.next().is_some() {
            return Err(invalid());
        }
        let date = Date {
            year,
            month,
            day,
            hour,
        };
        if !date.is_valid() {
            return Err(invalid());
        }
        Ok(date)
    }
}

/// One or two decimal digits. The hour additionally rejects a leading zero.
fn short_field(part: Option<&str>, no_leading_zero: bool) -> Option<u8> {
    let part = part?;
    let bytes = part.as_bytes();
    if bytes.is_empty() || bytes.len() > 2 || !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }
    if no_leading_zero && bytes[0] == b'0' {
        return None;
    }
    part.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const JAN_1_1936_13: Date = Date {
        year: 1936,
        month: 1,
        day: 1,
        hour: 13,
    };

    #[test]
    fn binary_round_trip() -> Result<()> {
        let packed = JAN_1_1936_13.to_binary()?;
        assert_eq!(packed, ((1936 + 5000) * 365) * 24 + 12);
        assert_eq!(Date::from_binary(packed)?, JAN_1_1936_13);

        let eve = Date {
            year: -1,
            month: 12,
            day: 31,
            hour: 24,
        };
        assert_eq!(Date::from_binary(eve.to_binary()?)?, eve);
        Ok(())
    }

    #[test]
    fn negative_packed_dates_are_invalid() {
        assert!(matches!(
            Date::from_binary(-1),
            Err(Error::InvalidBinaryDate(-1))
        ));
        assert!(Date::from_binary(i32::MIN).is_err());
    }

    #[test]
    fn julian_table_covers_the_year() -> Result<()> {
        assert_eq!(month_day_from_julian(0), (1, 1));
        assert_eq!(month_day_from_julian(30), (1, 31));
        assert_eq!(month_day_from_julian(31), (2, 1));
        assert_eq!(month_day_from_julian(58), (2, 28));
        assert_eq!(month_day_from_julian(59), (3, 1));
        assert_eq!(month_day_from_julian(364), (12, 31));
        Ok(())
    }

    #[test]
    fn validity_bounds() {
        assert!(JAN_1_1936_13.is_valid());
        let ok = |year, month, day, hour| {
            Date {
                year,
                month,
                day,
                hour,
            }
            .is_valid()
        };
        assert!(ok(1936, 1, 31, 24));
        assert!(ok(1936, 2, 28, 1));
        assert!(!ok(0, 1, 1, 1));
        assert!(!ok(1936, 0, 1, 1));
        assert!(!ok(1936, 13, 1, 1));
        assert!(!ok(1936, 2, 29, 1));
        assert!(!ok(1936, 1, 0, 1));
        assert!(!ok(1936, 1, 1, 0));
        assert!(!ok(1936, 1, 1, 25));
    }

    #[test]
    fn parse_dotted() -> Result<()> {
        assert_eq!("1936.1.1.13".parse::<Date>()?, JAN_1_1936_13);
        assert_eq!("1936.01.01.13".parse::<Date>()?, JAN_1_1936_13);
        assert_eq!(
            "-5.12.31.24".parse::<Date>()?,
            Date {
                year: -5,
                month: 12,
                day: 31,
                hour: 24,
            }
        );
        assert_eq!(
            "1936.1.31.1".parse::<Date>()?,
            Date {
                year: 1936,
                month: 1,
                day: 31,
                hour: 1,
            }
        );
        Ok(())
    }

    #[test]
    fn parse_integer_form() -> Result<()> {
        let packed = JAN_1_1936_13.to_binary()?;
        assert_eq!(packed.to_string().parse::<Date>()?, JAN_1_1936_13);
        Ok(())
    }

    #[test]
    fn parse_rejections() {
        for bad in [
            "",
            "abc",
            "1936.1.1",         // no hour
            "1936.1.1.",        // empty hour
            "1936.1.1.0",       // zero hour
            "1936.1.1.07",      // leading zero hour
            "1936.1.1.123",     // three digit hour
            "1936.123.1.1",     // three digit month
            "1936.13.1.1",      // month range
            "1936.2.29.1",      // no leap days
            "1936.1.1.1.1",     // trailing segment
            "1936..1.1",        // empty month
            "1936.1a.1.1",      // junk
            "99999999999999999999", // i64 overflow
            "9999999999",       // fits i64, not i32
        ] {
            assert!(
                bad.parse::<Date>().is_err(),
                "{bad:?} should not parse"
            );
        }
    }

    #[test]
    fn parse_small_integer() {
        // 1936 = 80 * 24 + 16: day 81 of year -5000, hour 17.
        let d: Date = "1936".parse().unwrap();
        assert_eq!(
            d,
            Date {
                year: -5000,
                month: 3,
                day: 22,
                hour: 17,
            }
        );
    }

    #[test]
    fn formats() {
        assert_eq!(JAN_1_1936_13.to_string(), "1936.1.1.13");
        assert_eq!(JAN_1_1936_13.format(DateFormat::DotShort), "1936.1.1.13");
        assert_eq!(JAN_1_1936_13.format(DateFormat::DotWide), "1936.01.01.13");
        assert_eq!(JAN_1_1936_13.format(DateFormat::Iso8601), "1936-01-01T12");
    }

    #[test]
    fn dotted_short_round_trips() -> Result<()> {
        for d in [
            JAN_1_1936_13,
            Date {
                year: -44,
                month: 3,
                day: 15,
                hour: 1,
            },
            Date {
                year: 9999,
                month: 12,
                day: 31,
                hour: 24,
            },
        ] {
            assert_eq!(d.format(DateFormat::DotShort).parse::<Date>()?, d);
        }
        Ok(())
    }
}
/* vim: textwidth=80
 */

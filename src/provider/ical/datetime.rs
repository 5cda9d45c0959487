use chrono::{NaiveDate, NaiveDateTime};
use ical::property::Property;
use nom::{
    bytes::complete::take_while_m_n,
    character::complete::char,
    combinator::{all_consuming, map, map_res, opt},
    sequence::{preceded, tuple},
    IResult,
};
use std::str::FromStr;

use crate::provider::{Error, ErrorKind, Result};

use super::param;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IcalDateTime {
    Date(NaiveDate),
    Floating(NaiveDateTime),
    Utc(NaiveDateTime),
    Local(NaiveDateTime, String),
}

type DateParts = (i32, u32, u32);
type TimeParts = (u32, u32, u32, bool);

fn digits<'a>(count: usize) -> impl FnMut(&'a str) -> IResult<&'a str, u32> {
    map_res(
        take_while_m_n(count, count, |c: char| c.is_ascii_digit()),
        |s: &str| s.parse::<u32>(),
    )
}

fn date_parts(input: &str) -> IResult<&str, DateParts> {
    tuple((
        map_res(
            take_while_m_n(4, 4, |c: char| c.is_ascii_digit()),
            |s: &str| s.parse::<i32>(),
        ),
        digits(2),
        digits(2),
    ))(input)
}

fn time_parts(input: &str) -> IResult<&str, TimeParts> {
    preceded(
        char('T'),
        tuple((
            digits(2),
            digits(2),
            digits(2),
            map(opt(char('Z')), |z| z.is_some()),
        )),
    )(input)
}

fn value_parts(input: &str) -> IResult<&str, (DateParts, Option<TimeParts>)> {
    all_consuming(tuple((date_parts, opt(time_parts))))(input)
}

impl FromStr for IcalDateTime {
    type Err = Error;

    /// Parses `YYYYMMDD`, `YYYYMMDDTHHMMSS` and `YYYYMMDDTHHMMSSZ`.
    fn from_str(s: &str) -> Result<Self> {
        let (_, ((year, month, day), time)) = value_parts(s.trim())?;

        let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
            Error::new(ErrorKind::DateParse, &format!("'{}' is not a valid date", s))
        })?;

        let Some((hour, minute, second, utc)) = time else {
            return Ok(IcalDateTime::Date(date));
        };

        // RFC 5545 allows a leap second
        let datetime = date
            .and_hms_opt(hour, minute, second.min(59))
            .ok_or_else(|| {
                Error::new(ErrorKind::DateParse, &format!("'{}' is not a valid time", s))
            })?;

        if utc {
            Ok(IcalDateTime::Utc(datetime))
        } else {
            Ok(IcalDateTime::Floating(datetime))
        }
    }
}

impl TryFrom<&Property> for IcalDateTime {
    type Error = Error;

    fn try_from(value: &Property) -> Result<Self> {
        let val = value
            .value
            .as_deref()
            .ok_or(Error::from(ErrorKind::DateParse).with_msg("Missing datetime value"))?;

        let parsed = val.parse::<IcalDateTime>()?;

        match (parsed, param(value, "TZID")) {
            (IcalDateTime::Floating(dt), Some(tzid)) => {
                Ok(IcalDateTime::Local(dt, tzid.to_owned()))
            }
            (parsed, _) => Ok(parsed),
        }
    }
}

impl IcalDateTime {
    /// Calendar date as written in the value, without timezone conversion.
    pub fn date(&self) -> NaiveDate {
        match self {
            IcalDateTime::Date(date) => *date,
            IcalDateTime::Floating(dt) => dt.date(),
            IcalDateTime::Utc(dt) => dt.date(),
            IcalDateTime::Local(dt, _) => dt.date(),
        }
    }
}

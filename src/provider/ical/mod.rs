pub mod datetime;
pub mod event;
pub mod ser;

pub use datetime::IcalDateTime;
pub use event::Eventlike;

use ::ical::parser::ical::component::IcalCalendar;
use ::ical::parser::ical::IcalParser;
use ::ical::property::Property;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;

use crate::provider::{Error, ErrorKind, Result};

pub const ICAL_FILE_EXT: &str = "ics";

/// First value of parameter `name` of `property`.
pub fn param<'a>(property: &'a Property, name: &str) -> Option<&'a str> {
    property
        .params
        .as_ref()?
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .and_then(|(_, values)| values.first())
        .map(String::as_str)
}

/// Reads every `VCALENDAR` contained in `reader`.
pub fn from_reader<R: BufRead>(reader: R) -> Result<Vec<IcalCalendar>> {
    let calendars = IcalParser::new(reader)
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::new(ErrorKind::CalendarParse, &format!("{}", e)))?;

    if calendars.is_empty() {
        return Err(Error::new(
            ErrorKind::CalendarParse,
            "No calendar could be read",
        ));
    }

    Ok(calendars)
}

pub fn from_file(path: &Path) -> Result<Vec<IcalCalendar>> {
    if path.extension().map_or(true, |ext| ext != ICAL_FILE_EXT) {
        log::warn!("'{}' does not look like an iCalendar file", path.display());
    }

    let buf = io::BufReader::new(fs::File::open(path)?);

    from_reader(buf).map_err(|e| {
        Error::new(
            ErrorKind::CalendarParse,
            &format!(
                "No calendar could be read from '{p}': {e}",
                p = path.display(),
                e = e
            ),
        )
    })
}

pub fn to_writer<W: Write>(mut writer: W, calendars: &[IcalCalendar]) -> Result<()> {
    for calendar in calendars {
        writer.write_all(ser::to_string(calendar)?.as_bytes())?;
    }
    writer.flush()?;
    Ok(())
}

pub fn to_file(path: &Path, calendars: &[IcalCalendar]) -> Result<()> {
    // Serialize everything before touching the output file
    let mut out = Vec::new();
    to_writer(&mut out, calendars)?;
    fs::write(path, out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CALENDAR: &str = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
PRODID:-//Test//EN\r\n\
BEGIN:VEVENT\r\n\
UID:1\r\n\
DTSTART;VALUE=DATE:20241225\r\n\
SUMMARY:Christmas\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

    #[test]
    fn read_calendar() {
        let calendars = from_reader(CALENDAR.as_bytes()).unwrap();
        assert_eq!(calendars.len(), 1);
        assert_eq!(calendars[0].events.len(), 1);

        let dtstart = calendars[0].events[0]
            .properties
            .iter()
            .find(|p| p.name == "DTSTART")
            .unwrap();
        assert_eq!(param(dtstart, "value"), Some("DATE"));
        assert_eq!(param(dtstart, "TZID"), None);
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(from_reader("".as_bytes()).is_err());
    }

    #[test]
    fn write_then_read() {
        let calendars = from_reader(CALENDAR.as_bytes()).unwrap();
        let mut out = Vec::new();
        to_writer(&mut out, &calendars).unwrap();

        let reread = from_reader(out.as_slice()).unwrap();
        assert_eq!(reread[0].properties.len(), calendars[0].properties.len());
        assert_eq!(
            reread[0].events[0].properties.len(),
            calendars[0].events[0].properties.len()
        );
    }
}

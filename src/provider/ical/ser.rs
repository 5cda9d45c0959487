use ical::parser::ical::component::*;
use ical::property::Property;
use itertools::Itertools;
use std::fmt::Display;

use crate::provider::{Error, ErrorKind, Result};

// RFC 5545, 3.1: lines should not be longer than 75 octets
const MAX_LINE_OCTETS: usize = 75;
const LINE_SEPARATOR: &str = "\r\n";

pub fn to_string(value: &IcalCalendar) -> Result<String> {
    let mut serial = Serializer::default();
    serial.serialize_calendar(value)?;
    serial.finish()
}

#[derive(Debug)]
enum Section {
    Calendar,
    Timezones,
    TimezoneTransition(&'static str),
    Alarms,
    Events,
    Todos,
    Journals,
    FreeBusys,
}

impl Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Calendar => "VCALENDAR",
            Self::Alarms => "VALARM",
            Self::Events => "VEVENT",
            Self::Todos => "VTODO",
            Self::Journals => "VJOURNAL",
            Self::FreeBusys => "VFREEBUSY",
            Self::Timezones => "VTIMEZONE",
            Self::TimezoneTransition(s) => *s,
        };

        write!(f, "{}", s)
    }
}

/// Writes a parsed calendar back into its textual form.
pub struct Serializer {
    lines: Vec<String>,
    section: Vec<Section>,
}

impl Serializer {
    fn begin_section(&mut self, sec: Section) {
        self.lines.push(format!("BEGIN:{}", &sec));
        self.section.push(sec);
    }

    fn end_section(&mut self) -> Result<()> {
        let sec = self.section.pop().ok_or_else(|| {
            Error::new(
                ErrorKind::SerializeError,
                "Cannot end section: no section open",
            )
        })?;
        self.lines.push(format!("END:{}", sec));
        Ok(())
    }

    fn serialize_param_value(value: &str) -> String {
        // DQUOTE is not allowed inside parameter values at all
        let value = value.replace('"', "");
        if value.contains(|c: char| matches!(c, ':' | ';' | ',')) {
            format!("\"{}\"", value)
        } else {
            value
        }
    }

    fn serialize_properties(&mut self, value: &[Property]) -> Result<()> {
        for Property {
            name,
            params,
            value,
        } in value
        {
            if name.is_empty() {
                log::warn!("{:?}", self.section);
                return Err(Error::new(
                    ErrorKind::SerializeError,
                    "Cannot serialize property without name",
                ));
            }

            let mut line = name.clone();

            for (key, values) in params.iter().flatten() {
                line += ";";
                line += key;
                line += "=";
                line += &values
                    .iter()
                    .map(|v| Self::serialize_param_value(v))
                    .join(",");
            }

            line += ":";
            line += value.as_deref().unwrap_or_default();

            self.lines.push(line);
        }
        Ok(())
    }

    fn serialize_alarm(&mut self, value: &IcalAlarm) -> Result<()> {
        self.begin_section(Section::Alarms);
        self.serialize_properties(&value.properties)?;
        self.end_section()
    }

    fn serialize_events(&mut self, value: &IcalEvent) -> Result<()> {
        self.begin_section(Section::Events);
        self.serialize_properties(&value.properties)?;

        // VEVENTS may encapsulate one or more VALARMs
        for alarm in value.alarms.iter() {
            self.serialize_alarm(alarm)?;
        }

        self.end_section()
    }

    fn serialize_todos(&mut self, value: &IcalTodo) -> Result<()> {
        self.begin_section(Section::Todos);
        self.serialize_properties(&value.properties)?;

        for alarm in value.alarms.iter() {
            self.serialize_alarm(alarm)?;
        }

        self.end_section()
    }

    fn serialize_journals(&mut self, value: &IcalJournal) -> Result<()> {
        self.begin_section(Section::Journals);
        self.serialize_properties(&value.properties)?;
        self.end_section()
    }

    fn serialize_free_busys(&mut self, value: &IcalFreeBusy) -> Result<()> {
        self.begin_section(Section::FreeBusys);
        self.serialize_properties(&value.properties)?;
        self.end_section()
    }

    fn serialize_timezones(&mut self, value: &IcalTimeZone) -> Result<()> {
        self.begin_section(Section::Timezones);
        self.serialize_properties(&value.properties)?;

        for transition in value.transitions.iter() {
            match transition.transition {
                IcalTimeZoneTransitionType::STANDARD => {
                    self.begin_section(Section::TimezoneTransition("STANDARD"))
                }
                IcalTimeZoneTransitionType::DAYLIGHT => {
                    self.begin_section(Section::TimezoneTransition("DAYLIGHT"))
                }
            }

            self.serialize_properties(&transition.properties)?;
            self.end_section()?;
        }

        self.end_section()
    }

    fn serialize_calendar(&mut self, calendar: &IcalCalendar) -> Result<()> {
        // First serialize the properties of the calendar itself
        self.serialize_properties(&calendar.properties)?;

        for timezone in calendar.timezones.iter() {
            self.serialize_timezones(timezone)?;
        }

        for event in calendar.events.iter() {
            self.serialize_events(event)?;
        }

        for todo in calendar.todos.iter() {
            self.serialize_todos(todo)?;
        }

        for journal in calendar.journals.iter() {
            self.serialize_journals(journal)?;
        }

        for free_busy in calendar.free_busys.iter() {
            self.serialize_free_busys(free_busy)?;
        }

        for alarm in calendar.alarms.iter() {
            self.serialize_alarm(alarm)?;
        }

        Ok(())
    }

    pub fn finish(mut self) -> Result<String> {
        self.end_section()?;

        if !self.section.is_empty() {
            return Err(Error::new(
                ErrorKind::SerializeError,
                &format!("Unterminated sections: {:?}", self.section),
            ));
        }

        let mut output = String::new();
        for line in self.lines.iter() {
            output += &fold_line(line);
            output += LINE_SEPARATOR;
        }
        Ok(output)
    }
}

impl Default for Serializer {
    fn default() -> Self {
        let mut serial = Serializer {
            lines: Vec::new(),
            section: Vec::new(),
        };
        serial.begin_section(Section::Calendar);
        serial
    }
}

/// Splits `line` into continuation lines of at most 75 octets each,
/// never inside a UTF-8 sequence.
fn fold_line(line: &str) -> String {
    if line.len() <= MAX_LINE_OCTETS {
        return line.to_owned();
    }

    let mut folded = String::with_capacity(line.len() + line.len() / MAX_LINE_OCTETS * 3);
    let mut budget = MAX_LINE_OCTETS;
    let mut used = 0;

    for c in line.chars() {
        if used + c.len_utf8() > budget {
            folded += LINE_SEPARATOR;
            folded.push(' ');
            // The leading space counts towards the limit
            budget = MAX_LINE_OCTETS - 1;
            used = 0;
        }
        folded.push(c);
        used += c.len_utf8();
    }

    folded
}

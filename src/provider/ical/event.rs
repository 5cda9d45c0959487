use chrono::NaiveDate;
use ical::parser::ical::component::IcalEvent;
use ical::parser::Component;
use ical::property::Property;

use super::datetime::IcalDateTime;
use crate::provider::{Error, ErrorKind, Result};

/// Fields of a calendar event the overlay reads and rewrites.
pub trait Eventlike {
    fn start(&self) -> Result<IcalDateTime>;
    fn title(&self) -> &str;
    fn set_title(&mut self, title: &str);

    fn start_date(&self) -> Result<NaiveDate> {
        self.start().map(|dt| dt.date())
    }
}

fn is_summary(prop: &Property) -> bool {
    prop.name.eq_ignore_ascii_case("SUMMARY")
}

impl Eventlike for IcalEvent {
    fn start(&self) -> Result<IcalDateTime> {
        let dtstart = self.get_property("DTSTART").ok_or_else(|| {
            Error::new(ErrorKind::EventMissingKey, "Event has no 'DTSTART'")
        })?;

        IcalDateTime::try_from(dtstart)
    }

    /// Missing `SUMMARY` reads as the empty title.
    fn title(&self) -> &str {
        self.properties
            .iter()
            .find(|prop| is_summary(prop))
            .and_then(|prop| prop.value.as_deref())
            .unwrap_or_default()
    }

    fn set_title(&mut self, title: &str) {
        if let Some(prop) = self.properties.iter_mut().find(|prop| is_summary(prop)) {
            prop.value = Some(title.to_owned());
        } else {
            self.add_property(Property {
                name: "SUMMARY".to_owned(),
                params: None,
                value: Some(title.to_owned()),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(properties: &[(&str, &str)]) -> IcalEvent {
        let mut event = IcalEvent::new();
        for (name, value) in properties {
            event.add_property(Property {
                name: name.to_string(),
                params: None,
                value: Some(value.to_string()),
            });
        }
        event
    }

    #[test]
    fn start_date() {
        let event = event(&[("DTSTART", "20240329T180000Z"), ("SUMMARY", "Stations")]);
        assert_eq!(
            event.start_date().unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 29).unwrap()
        );
        assert_eq!(event.title(), "Stations");
    }

    #[test]
    fn missing_start() {
        let event = event(&[("SUMMARY", "Nothing")]);
        let err = event.start().unwrap_err();
        assert!(matches!(err.kind, ErrorKind::EventMissingKey));
    }

    #[test]
    fn set_title_replaces_or_adds() {
        let mut with_summary = event(&[("SUMMARY", "Christmas")]);
        with_summary.set_title("✝️ Christmas");
        assert_eq!(with_summary.title(), "✝️ Christmas");
        assert_eq!(with_summary.properties.len(), 1);

        let mut without_summary = event(&[("DTSTART", "20240628")]);
        assert_eq!(without_summary.title(), "");
        without_summary.set_title("⛔🐟");
        assert_eq!(without_summary.title(), "⛔🐟");
        assert_eq!(without_summary.properties.len(), 2);
    }

    #[test]
    fn summary_name_is_case_insensitive() {
        let mut event = event(&[("Summary", "Assumption")]);
        assert_eq!(event.title(), "Assumption");

        event.set_title("✝️ Assumption");
        assert_eq!(event.title(), "✝️ Assumption");
        assert_eq!(event.properties.len(), 1);
    }
}

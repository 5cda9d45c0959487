use chrono::NaiveDate;
use ical::parser::ical::component::IcalCalendar;
use std::fmt;
use std::io::{BufRead, Write};
use std::ops::AddAssign;
use std::path::Path;

use crate::config::Config;
use crate::liturgy::{Classification, Classifier, HolyDays};
use crate::provider::ical::{self as ics, Eventlike};
use crate::provider::Result;
use crate::title::{self, Symbols};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub events: usize,
    pub marked: usize,
    pub skipped: usize,
    pub holy_days: usize,
    pub fast_days: usize,
    pub abstinence_days: usize,
}

impl Stats {
    fn count(&mut self, marks: &Classification) {
        self.events += 1;
        self.marked += marks.is_marked() as usize;
        self.holy_days += marks.holy_day as usize;
        self.fast_days += marks.fast as usize;
        self.abstinence_days += marks.abstinence as usize;
    }
}

impl AddAssign for Stats {
    fn add_assign(&mut self, other: Self) {
        self.events += other.events;
        self.marked += other.marked;
        self.skipped += other.skipped;
        self.holy_days += other.holy_days;
        self.fast_days += other.fast_days;
        self.abstinence_days += other.abstinence_days;
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} events ({} marked, {} skipped): {} holy days, {} fast days, {} days of abstinence",
            self.events,
            self.marked,
            self.skipped,
            self.holy_days,
            self.fast_days,
            self.abstinence_days
        )
    }
}

/// Prefixes event titles with holy day, fast and abstinence markers.
pub struct Overlay {
    classifier: Classifier,
    holy_days: HolyDays,
    symbols: Symbols,
}

impl Overlay {
    pub fn new(config: &Config) -> Self {
        let holy_days = config.holy_days();
        if holy_days.is_empty() {
            log::warn!("No holy days configured");
        } else {
            log::debug!("Matching {} holy day titles", holy_days.len());
        }

        Overlay {
            classifier: Classifier::new(config.mark_sundays_as_holy),
            holy_days,
            symbols: config.symbols.clone(),
        }
    }

    /// `title` is the raw `SUMMARY` value, still escaped.
    pub fn classify(&self, date: &NaiveDate, title: &str) -> Classification {
        let key = title::normalize(&title::unescape(title), &self.symbols);
        let named_holy_day = self.holy_days.contains(&key);

        self.classifier.classify(date, named_holy_day)
    }

    /// Replaces any markers in the title of `event` with the ones for its start date.
    pub fn rewrite<E: Eventlike>(&self, event: &mut E) -> Result<Classification> {
        let date = event.start_date()?;
        let marks = self.classify(&date, event.title());

        let base = title::strip_markers(event.title(), &self.symbols);
        let new_title = self.symbols.apply(&marks, &base);

        log::trace!("{}: '{}' -> '{}'", date, event.title(), new_title);
        event.set_title(&new_title);

        Ok(marks)
    }

    pub fn apply(&self, calendar: &mut IcalCalendar) -> Stats {
        let mut stats = Stats::default();

        for event in calendar.events.iter_mut() {
            match self.rewrite(event) {
                Ok(marks) => stats.count(&marks),
                Err(e) => {
                    log::warn!("Skipping event '{}': {}", event.title(), e);
                    stats.skipped += 1;
                }
            }
        }

        stats
    }

    pub fn process<R: BufRead, W: Write>(&self, reader: R, writer: W) -> Result<Stats> {
        let mut calendars = ics::from_reader(reader)?;

        let mut stats = Stats::default();
        for calendar in calendars.iter_mut() {
            stats += self.apply(calendar);
        }

        ics::to_writer(writer, &calendars)?;
        Ok(stats)
    }

    pub fn process_file(&self, input: &Path, output: &Path) -> Result<Stats> {
        let mut calendars = ics::from_file(input)?;

        let mut stats = Stats::default();
        for calendar in calendars.iter_mut() {
            stats += self.apply(calendar);
        }

        ics::to_file(output, &calendars)?;
        Ok(stats)
    }
}

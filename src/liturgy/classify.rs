use chrono::{Datelike, NaiveDate, Weekday};

use super::computus::{ComputusCache, YearComputus};

/// Liturgical character of a single date.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Classification {
    pub holy_day: bool,
    pub fast: bool,
    pub abstinence: bool,
}

impl Classification {
    /// Fast and abstinence obligations of `date`, ignoring holy days.
    ///
    /// `computus` must belong to the year of `date`.
    pub fn penitential(date: &NaiveDate, computus: &YearComputus) -> Self {
        debug_assert_eq!(date.year(), computus.year);

        let sunday = date.weekday() == Weekday::Sun;
        let mut marks = Classification::default();

        if date.weekday() == Weekday::Fri {
            marks.abstinence = true;
        }

        if computus.in_lent(date) && !sunday {
            marks.fast = true;
            marks.abstinence = true;
        }

        if computus.is_ember_day(date) && !sunday {
            marks.fast = true;
            marks.abstinence = true;
        }

        if computus.is_vigil(date) && !sunday {
            marks.fast = true;
            marks.abstinence = true;
        }

        marks
    }

    /// Holy days dispense from fast and abstinence.
    pub fn into_holy_day(self) -> Self {
        Classification {
            holy_day: true,
            fast: false,
            abstinence: false,
        }
    }

    pub fn is_marked(&self) -> bool {
        self.holy_day || self.fast || self.abstinence
    }
}

/// Classifies dates against the 1962 calendar.
#[derive(Default)]
pub struct Classifier {
    cache: ComputusCache,
    mark_sundays_as_holy: bool,
}

impl Classifier {
    pub fn new(mark_sundays_as_holy: bool) -> Self {
        Classifier {
            cache: ComputusCache::new(),
            mark_sundays_as_holy,
        }
    }

    pub fn computus(&self, year: i32) -> &YearComputus {
        self.cache.lookup(year)
    }

    /// `named_holy_day` tells whether the event's title is a recognized holy day.
    pub fn classify(&self, date: &NaiveDate, named_holy_day: bool) -> Classification {
        let marks = Classification::penitential(date, self.computus(date.year()));

        let holy = named_holy_day || (self.mark_sundays_as_holy && date.weekday() == Weekday::Sun);
        if holy {
            marks.into_holy_day()
        } else {
            marks
        }
    }
}

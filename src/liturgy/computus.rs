use chrono::{Datelike, Duration, NaiveDate, Weekday};
use elsa::FrozenBTreeMap;
use std::collections::BTreeSet;

/// Date of Easter Sunday in the Gregorian calendar.
///
/// Anonymous Gregorian algorithm (Meeus/Jones/Butcher). Total for every year
/// `NaiveDate` can represent.
pub fn easter(year: i32) -> NaiveDate {
    let a = year.rem_euclid(19);
    let b = year.div_euclid(100);
    let c = year.rem_euclid(100);
    let d = b.div_euclid(4);
    let e = b.rem_euclid(4);
    let f = (b + 8).div_euclid(25);
    let g = (b - f + 1).div_euclid(3);
    let h = (19 * a + b - d - g + 15).rem_euclid(30);
    let i = c.div_euclid(4);
    let k = c.rem_euclid(4);
    let l = (32 + 2 * e + 2 * i - h - k).rem_euclid(7);
    let m = (a + 11 * h + 22 * l).div_euclid(451);
    let month = (h + l - 7 * m + 114).div_euclid(31);
    let day = (h + l - 7 * m + 114).rem_euclid(31) + 1;

    ymd(year, month as u32, day as u32)
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("Date should be in range")
}

/// First `weekday` on or after `date`.
fn next_or_same(date: NaiveDate, weekday: Weekday) -> NaiveDate {
    let offset = (7 + weekday.num_days_from_monday() - date.weekday().num_days_from_monday()) % 7;
    date + Duration::days(offset as i64)
}

/// Wednesday, Friday and Saturday of one Ember week.
fn ember_week(wednesday: NaiveDate) -> [NaiveDate; 3] {
    [
        wednesday,
        wednesday + Duration::days(2),
        wednesday + Duration::days(3),
    ]
}

/// Movable feasts and penitential days of one year, all derived from Easter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearComputus {
    pub year: i32,
    pub easter: NaiveDate,
    pub ash_wednesday: NaiveDate,
    pub holy_saturday: NaiveDate,
    pub pentecost: NaiveDate,
    pub ember_days: BTreeSet<NaiveDate>,
    pub vigils: BTreeSet<NaiveDate>,
}

impl YearComputus {
    pub fn new(year: i32) -> Self {
        let easter = easter(year);
        let ash_wednesday = easter - Duration::days(46);
        let holy_saturday = easter - Duration::days(1);
        let pentecost = easter + Duration::days(49);

        let mut ember_days = BTreeSet::new();

        // Advent: week of the first Wednesday on or after St. Lucy
        ember_days.extend(ember_week(next_or_same(ymd(year, 12, 13), Weekday::Wed)));

        // Lent: week after the first Sunday of Lent
        let first_sunday_of_lent = next_or_same(ash_wednesday, Weekday::Sun);
        ember_days.extend(ember_week(first_sunday_of_lent + Duration::days(3)));

        // Pentecost: Whit week
        ember_days.extend(ember_week(pentecost + Duration::days(3)));

        // September: week after the third Sunday
        let third_sunday = next_or_same(ymd(year, 9, 1), Weekday::Sun) + Duration::days(14);
        ember_days.extend(ember_week(third_sunday + Duration::days(3)));

        let vigils = BTreeSet::from([
            // Christmas
            ymd(year, 12, 24),
            // Assumption
            ymd(year, 8, 14),
            // All Saints
            ymd(year, 10, 31),
            // Pentecost
            pentecost - Duration::days(1),
            // Ss. Peter and Paul
            ymd(year, 6, 28),
        ]);

        YearComputus {
            year,
            easter,
            ash_wednesday,
            holy_saturday,
            pentecost,
            ember_days,
            vigils,
        }
    }

    /// Ash Wednesday through Holy Saturday, both inclusive.
    pub fn in_lent(&self, date: &NaiveDate) -> bool {
        (self.ash_wednesday..=self.holy_saturday).contains(date)
    }

    pub fn is_ember_day(&self, date: &NaiveDate) -> bool {
        self.ember_days.contains(date)
    }

    pub fn is_vigil(&self, date: &NaiveDate) -> bool {
        self.vigils.contains(date)
    }
}

/// Append-only per-year store of `YearComputus`.
///
/// Entries are computed on first lookup and never invalidated.
#[derive(Default)]
pub struct ComputusCache(FrozenBTreeMap<i32, Box<YearComputus>>);

impl ComputusCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, year: i32) -> &YearComputus {
        if let Some(computus) = self.0.get(&year) {
            computus
        } else {
            log::debug!("Computing movable feasts for {}", year);
            self.0.insert(year, Box::new(YearComputus::new(year)))
        }
    }
}

#[cfg(test)]
impl ComputusCache {
    fn contains(&self, year: i32) -> bool {
        self.0.get(&year).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn known_easter_dates() {
        assert_eq!(easter(2024), date(2024, 3, 31));
        assert_eq!(easter(2025), date(2025, 4, 20));
        assert_eq!(easter(2000), date(2000, 4, 23));
        assert_eq!(easter(1961), date(1961, 4, 2));
        assert_eq!(easter(2008), date(2008, 3, 23));
        assert_eq!(easter(2038), date(2038, 4, 25));
        assert_eq!(easter(2285), date(2285, 3, 22));
    }

    #[test]
    fn easter_is_a_sunday_within_bounds() {
        for year in 1900..=2100 {
            let e = easter(year);
            assert_eq!(e.weekday(), Weekday::Sun, "{}", year);
            assert!(e >= date(year, 3, 22), "{}", e);
            assert!(e <= date(year, 4, 25), "{}", e);
        }
    }

    #[test]
    fn derived_feasts_are_offsets_of_easter() {
        for year in 1900..=2100 {
            let c = YearComputus::new(year);
            assert_eq!(c.ash_wednesday, c.easter - Duration::days(46));
            assert_eq!(c.holy_saturday, c.easter - Duration::days(1));
            assert_eq!(c.pentecost, c.easter + Duration::days(49));
            assert_eq!(c.ash_wednesday.weekday(), Weekday::Wed);
        }
    }

    #[test]
    fn ash_wednesday_2024() {
        let c = YearComputus::new(2024);
        assert_eq!(c.ash_wednesday, date(2024, 2, 14));
        assert_eq!(c.holy_saturday, date(2024, 3, 30));
        assert_eq!(c.pentecost, date(2024, 5, 19));
    }

    #[test]
    fn ember_days_2024() {
        let c = YearComputus::new(2024);
        let expected = BTreeSet::from([
            // Lent
            date(2024, 2, 21),
            date(2024, 2, 23),
            date(2024, 2, 24),
            // Pentecost
            date(2024, 5, 22),
            date(2024, 5, 24),
            date(2024, 5, 25),
            // September
            date(2024, 9, 18),
            date(2024, 9, 20),
            date(2024, 9, 21),
            // Advent
            date(2024, 12, 18),
            date(2024, 12, 20),
            date(2024, 12, 21),
        ]);
        assert_eq!(c.ember_days, expected);
    }

    #[test]
    fn advent_ember_wednesday_on_st_lucy() {
        // Dec 13, 2023 is itself a Wednesday
        let c = YearComputus::new(2023);
        assert!(c.is_ember_day(&date(2023, 12, 13)));
        assert!(c.is_ember_day(&date(2023, 12, 15)));
        assert!(c.is_ember_day(&date(2023, 12, 16)));
    }

    #[test]
    fn ember_days_fall_on_wed_fri_sat() {
        for year in 1900..=2100 {
            let c = YearComputus::new(year);
            assert_eq!(c.ember_days.len(), 12);
            for day in c.ember_days.iter() {
                assert!(matches!(
                    day.weekday(),
                    Weekday::Wed | Weekday::Fri | Weekday::Sat
                ));
            }
        }
    }

    #[test]
    fn vigils_2024() {
        let c = YearComputus::new(2024);
        assert_eq!(c.vigils.len(), 5);
        assert!(c.is_vigil(&date(2024, 12, 24)));
        assert!(c.is_vigil(&date(2024, 8, 14)));
        assert!(c.is_vigil(&date(2024, 10, 31)));
        assert!(c.is_vigil(&date(2024, 5, 18)));
        assert!(c.is_vigil(&date(2024, 6, 28)));
    }

    #[test]
    fn lent_window_is_inclusive() {
        let c = YearComputus::new(2024);
        assert!(!c.in_lent(&date(2024, 2, 13)));
        assert!(c.in_lent(&date(2024, 2, 14)));
        assert!(c.in_lent(&date(2024, 3, 30)));
        assert!(!c.in_lent(&date(2024, 3, 31)));
    }

    #[test]
    fn cache_computes_each_year_once() {
        let cache = ComputusCache::new();
        assert!(!cache.contains(2024));

        let first = cache.lookup(2024) as *const YearComputus;
        let second = cache.lookup(2024) as *const YearComputus;
        assert_eq!(first, second);
        assert!(cache.contains(2024));
        assert!(!cache.contains(2025));

        assert_eq!(cache.lookup(2025), &YearComputus::new(2025));
        assert!(cache.contains(2025));
    }
}

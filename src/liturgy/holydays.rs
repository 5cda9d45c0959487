use phf::phf_set;
use std::collections::BTreeSet;

/// Holy days of obligation of the 1962 calendar, as normalized titles.
///
/// Keys must already be in the form produced by `title::normalize`.
pub static HOLY_DAYS_1962: phf::Set<&'static str> = phf_set! {
    // Jan 1
    "circumcision of our lord",

    // Jan 6
    "epiphany of our lord",
    "the epiphany of our lord",

    // Mar 19
    "st joseph spouse of the blessed virgin mary",
    "st joseph",
    "st. joseph",

    // Ascension / Corpus Christi
    "ascension of our lord",
    "the ascension of our lord",
    "corpus christi",

    // Jun 29
    "ss peter and paul apostles",
    "ss. peter and paul",
    "saints peter and paul",
    "st. peter and st. paul",
    "st peter and st paul",

    // Aug 15
    "assumption of the blessed virgin mary",
    "the assumption of the blessed virgin mary",
    "assumption",

    // Nov 1
    "all saints",
    "all saints day",

    // Dec 8
    "immaculate conception of the blessed virgin mary",
    "the immaculate conception",
    "immaculate conception",

    // Dec 25
    "nativity of our lord",
    "christmas",
};

/// Titles recognized as holy days of obligation.
#[derive(Debug, Clone)]
pub struct HolyDays {
    builtin: bool,
    extra: BTreeSet<String>,
}

impl Default for HolyDays {
    fn default() -> Self {
        HolyDays {
            builtin: true,
            extra: BTreeSet::new(),
        }
    }
}

impl HolyDays {
    /// `extra` titles are expected to be normalized already.
    pub fn new(builtin: bool, extra: impl IntoIterator<Item = String>) -> Self {
        HolyDays {
            builtin,
            extra: extra.into_iter().collect(),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        (self.builtin && HOLY_DAYS_1962.contains(key)) || self.extra.contains(key)
    }

    pub fn len(&self) -> usize {
        let builtin = if self.builtin {
            HOLY_DAYS_1962.len()
        } else {
            0
        };
        builtin
            + self
                .extra
                .iter()
                .filter(|t| !(self.builtin && HOLY_DAYS_1962.contains(t.as_str())))
                .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

//! Movable feasts and the fast, abstinence and holy-day rules of the 1962 calendar.

pub mod classify;
pub mod computus;
pub mod holydays;

pub use classify::{Classification, Classifier};
pub use computus::{easter, ComputusCache, YearComputus};
pub use holydays::{HolyDays, HOLY_DAYS_1962};

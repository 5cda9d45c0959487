//! Calendar file formats the overlay can read and write.

pub mod error;
pub mod ical;

pub use error::{Error, ErrorKind};

pub type Result<T> = std::result::Result<T, Error>;

//! Calendar source for investment dates.

use chrono::NaiveDate;

pub trait Clock {
    fn today(&self) -> NaiveDate;
}

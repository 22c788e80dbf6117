//! Wall-clock adapter.

use chrono::{Local, NaiveDate};

use crate::ports::clock_port::Clock;

/// Uses the local calendar date of the host.
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

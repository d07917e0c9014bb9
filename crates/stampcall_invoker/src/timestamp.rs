use chrono::{Local, NaiveDateTime};

/// The rendering of timestamps handed to the entry point: `YYYY-MM-DD HH:MM:SS`, zero padded.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Renders `time` using [`TIMESTAMP_FORMAT`]. For years 0 through 9999 the result is always 19
/// bytes long.
pub fn format_timestamp(time: &NaiveDateTime) -> String {
    time.format(TIMESTAMP_FORMAT).to_string()
}

/// A source of wall-clock time.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// The local wall clock of the system.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock that is stuck at a single point in time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDateTime);

impl FixedClock {
    /// Returns a clock fixed at the given date and time, or `None` if it does not exist.
    pub fn at(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> Option<Self> {
        chrono::NaiveDate::from_ymd_opt(year, month, day)?
            .and_hms_opt(hour, min, sec)
            .map(FixedClock)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

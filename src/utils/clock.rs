use chrono::{DateTime, Local, NaiveDateTime};

use super::time::to_wall_time;

/// Represents an entity responsible for providing dates across application. The store gets a
/// single sample of it, so every computation inside one invocation agrees on what "now" is.
pub trait Clock {
    fn time(&self) -> DateTime<Local>;

    /// Local wall-clock time truncated to whole seconds, the precision of the log files.
    fn wall_time(&self) -> NaiveDateTime {
        to_wall_time(self.time())
    }
}

pub struct DefaultClock;

impl Clock for DefaultClock {
    fn time(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Clock that always returns the same moment. The cli samples [DefaultClock] into one of these,
/// so parsing and storage share a single "now".
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Local>);

impl Clock for FixedClock {
    fn time(&self) -> DateTime<Local> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Local, TimeZone, Timelike};

    use super::{Clock, FixedClock};

    #[test]
    fn test_wall_time_drops_subseconds() {
        let moment = Local
            .with_ymd_and_hms(2012, 5, 16, 15, 8, 0)
            .single()
            .unwrap()
            .with_nanosecond(500_000_000)
            .unwrap();
        let clock = FixedClock(moment);
        assert_eq!(clock.wall_time().nanosecond(), 0);
        assert_eq!(clock.wall_time(), moment.naive_local().with_nanosecond(0).unwrap());
    }
}

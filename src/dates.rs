use time::{macros::format_description, Date, Duration, OffsetDateTime, Time};

time::serde::format_description!(pub iso_date, Date, "[year]-[month]-[day]");

/// Current time in the server's local offset, UTC when that is unknown.
pub fn now_local() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

pub fn parse_iso_date(s: &str) -> Option<Date> {
    Date::parse(s.trim(), format_description!("[year]-[month]-[day]")).ok()
}

/// Calendar day as the half-open interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub date: Date,
    pub start: OffsetDateTime,
    pub end: OffsetDateTime,
}

impl DayWindow {
    /// The day containing `at`, in `at`'s offset.
    pub fn containing(at: OffsetDateTime) -> Self {
        let start = at.replace_time(Time::MIDNIGHT);
        Self {
            date: at.date(),
            start,
            end: start + Duration::days(1),
        }
    }

    /// The given calendar day in the server's local offset.
    pub fn for_date(date: Date) -> Self {
        let offset = now_local().offset();
        let start = date.with_time(Time::MIDNIGHT).assume_offset(offset);
        Self {
            date,
            start,
            end: start + Duration::days(1),
        }
    }

    pub fn contains(&self, at: OffsetDateTime) -> bool {
        self.start <= at && at < self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn window_is_half_open() {
        let w = DayWindow::containing(datetime!(2024-01-01 13:45 UTC));
        assert_eq!(w.start, datetime!(2024-01-01 00:00 UTC));
        assert_eq!(w.end, datetime!(2024-01-02 00:00 UTC));
        assert!(w.contains(datetime!(2024-01-01 00:00 UTC)));
        assert!(w.contains(datetime!(2024-01-01 23:59:59.999 UTC)));
        assert!(!w.contains(datetime!(2024-01-02 00:00 UTC)));
    }

    #[test]
    fn boundary_instant_belongs_to_next_day() {
        let at = datetime!(2024-01-02 00:00 UTC);
        let w = DayWindow::containing(at);
        assert_eq!(w.date, time::macros::date!(2024 - 01 - 02));
        assert!(!DayWindow::containing(datetime!(2024-01-01 12:00 UTC)).contains(at));
    }

    #[test]
    fn window_keeps_offset() {
        let w = DayWindow::containing(datetime!(2024-03-10 01:30 +05:30));
        assert_eq!(w.start, datetime!(2024-03-10 00:00 +05:30));
        assert_eq!(w.date, time::macros::date!(2024 - 03 - 10));
    }

    #[test]
    fn parses_iso_dates() {
        assert_eq!(
            parse_iso_date("2024-02-29"),
            Some(time::macros::date!(2024 - 02 - 29))
        );
        assert_eq!(parse_iso_date("2023-02-29"), None);
        assert_eq!(parse_iso_date("yesterday"), None);
    }
}

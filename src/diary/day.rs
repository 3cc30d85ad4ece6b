use std::fmt;

use time::{
    format_description::FormatItem, macros::format_description, Date, OffsetDateTime, UtcOffset,
};

const ISO_DATE: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");
const LONG_DATE: &[FormatItem<'static>] = format_description!(
    "[weekday repr:long], [month repr:long] [day padding:none], [year]"
);

/// The day the diary is looking at. Steps one calendar day at a time in
/// either direction, with no end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SelectedDay(Date);

impl SelectedDay {
    pub fn new(date: Date) -> Self {
        Self(date)
    }

    pub fn today(offset: UtcOffset) -> Self {
        Self(OffsetDateTime::now_utc().to_offset(offset).date())
    }

    /// `YYYY-MM-DD`.
    pub fn parse(raw: &str) -> Option<Self> {
        Date::parse(raw.trim(), ISO_DATE).ok().map(Self)
    }

    pub fn date(self) -> Date {
        self.0
    }

    pub fn previous_day(self) -> Self {
        self.0.previous_day().map(Self).unwrap_or(self)
    }

    pub fn next_day(self) -> Self {
        self.0.next_day().map(Self).unwrap_or(self)
    }

    /// "Today", or e.g. "Sunday, March 10, 2024".
    pub fn label(self, today: Date) -> String {
        if self.0 == today {
            return "Today".to_string();
        }
        self.0
            .format(LONG_DATE)
            .unwrap_or_else(|_| self.to_string())
    }
}

impl fmt::Display for SelectedDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.format(ISO_DATE) {
            Ok(s) => f.write_str(&s),
            Err(_) => Err(fmt::Error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, offset};

    #[test]
    fn steps_across_month_year_and_leap_boundaries() {
        let day = SelectedDay::new(date!(2024 - 03 - 01));
        assert_eq!(day.previous_day().date(), date!(2024 - 02 - 29));
        assert_eq!(
            SelectedDay::new(date!(2023 - 12 - 31)).next_day().date(),
            date!(2024 - 01 - 01)
        );
        assert_eq!(day.next_day().previous_day(), day);
    }

    #[test]
    fn steps_by_calendar_day_over_dst_changes() {
        // US DST started 2024-03-10; a day is still a day.
        let day = SelectedDay::new(date!(2024 - 03 - 10));
        assert_eq!(day.next_day().to_string(), "2024-03-11");
        assert_eq!(day.previous_day().to_string(), "2024-03-09");
    }

    #[test]
    fn parses_and_prints_iso_dates() {
        let day = SelectedDay::parse("2024-03-10").unwrap();
        assert_eq!(day.date(), date!(2024 - 03 - 10));
        assert_eq!(day.to_string(), "2024-03-10");
        assert!(SelectedDay::parse("2024-3-10").is_none());
        assert!(SelectedDay::parse("2024-02-30").is_none());
    }

    #[test]
    fn today_is_taken_in_the_given_offset() {
        let utc = SelectedDay::today(offset!(UTC)).date();
        let east = SelectedDay::today(offset!(+14)).date();
        assert!(east >= utc);
        assert!(east <= utc.next_day().unwrap());
    }

    #[test]
    fn labels_today_specially() {
        let today = date!(2024 - 03 - 10);
        assert_eq!(SelectedDay::new(today).label(today), "Today");
        assert_eq!(
            SelectedDay::new(date!(2024 - 03 - 09)).label(today),
            "Saturday, March 9, 2024"
        );
    }
}

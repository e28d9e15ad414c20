//! Human-friendly formatting of creation dates and due dates

use chrono::{NaiveDate, NaiveDateTime};

use crate::config::{BadgeColors, BADGE_COLORS, LOCALE_DATE_FORMAT};

/// How many days a relative creation date ("N days ago") can go back
const MAX_RELATIVE_DAYS_AGO: i64 = 6;
/// How many days ahead a due date is considered "this week"
const DAYS_IN_A_WEEK: i64 = 7;


/// Format a date the way the user's locale would
pub fn locale_date(date: NaiveDate) -> String {
    let format = crate::config::get(&LOCALE_DATE_FORMAT);
    date.format(&format).to_string()
}

/// Format a creation timestamp relatively to `now`
///
/// * `today HH:MM` for today,
/// * `yesterday`,
/// * `N days ago` within the last week,
/// * a locale date otherwise (including timestamps in the future)
pub fn format_created(created_at: &NaiveDateTime, now: &NaiveDateTime) -> String {
    let days_ago = (now.date() - created_at.date()).num_days();
    match days_ago {
        0 => format!("today {}", created_at.format("%H:%M")),
        1 => "yesterday".to_string(),
        n if n > 1 && n <= MAX_RELATIVE_DAYS_AGO => format!("{} days ago", n),
        _ => locale_date(created_at.date()),
    }
}


/// How urgent a due date is
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Urgency {
    /// The due date is in the past (by that many days)
    Overdue(i64),
    Today,
    Tomorrow,
    /// Due within a week (in that many days)
    ThisWeek(i64),
    Later,
}

impl Urgency {
    /// Classify a due date, relatively to today
    pub fn of(due_date: NaiveDate, today: NaiveDate) -> Self {
        let days_left = (due_date - today).num_days();
        match days_left {
            n if n < 0 => Urgency::Overdue(-n),
            0 => Urgency::Today,
            1 => Urgency::Tomorrow,
            n if n <= DAYS_IN_A_WEEK => Urgency::ThisWeek(n),
            _ => Urgency::Later,
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Urgency::Overdue(_) => "due-overdue",
            Urgency::Today => "due-today",
            Urgency::Tomorrow => "due-tomorrow",
            Urgency::ThisWeek(_) => "due-soon",
            Urgency::Later => "due-later",
        }
    }

    fn configured_color<'a>(&self, colors: &'a BadgeColors) -> &'a str {
        match self {
            Urgency::Overdue(_) => &colors.overdue,
            Urgency::Today => &colors.today,
            Urgency::Tomorrow => &colors.tomorrow,
            Urgency::ThisWeek(_) => &colors.this_week,
            Urgency::Later => &colors.later,
        }
    }
}


/// The badge displayed next to a task that has a due date
#[derive(Clone, Debug, PartialEq)]
pub struct DueBadge {
    urgency: Urgency,
    label: String,
    color: Option<String>,
}

impl DueBadge {
    pub fn new(due_date: NaiveDate, today: NaiveDate) -> Self {
        let urgency = Urgency::of(due_date, today);
        let label = match urgency {
            Urgency::Overdue(1) => "1 day overdue".to_string(),
            Urgency::Overdue(n) => format!("{} days overdue", n),
            Urgency::Today => "Today".to_string(),
            Urgency::Tomorrow => "Tomorrow".to_string(),
            Urgency::ThisWeek(n) => format!("In {} days", n),
            Urgency::Later => locale_date(due_date),
        };

        let colors = crate::config::get(&BADGE_COLORS);
        let color_spec = urgency.configured_color(&colors);
        let color = match csscolorparser::parse(color_spec) {
            Ok(color) => Some(color.to_hex_string()),
            Err(err) => {
                log::warn!("Invalid badge color {:?}: {}. Ignoring it", color_spec, err);
                None
            },
        };

        Self { urgency, label, color }
    }

    pub fn urgency(&self) -> Urgency { self.urgency }
    pub fn label(&self) -> &str      { &self.label }

    /// The badge color, as an `#rrggbb` string
    pub fn color_hex(&self) -> Option<&str> {
        self.color.as_deref()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        date(y, m, d).and_hms_opt(h, min, 0).unwrap()
    }

    #[test]
    fn relative_creation_dates() {
        let now = at(2024, 3, 15, 18, 0);
        assert_eq!(format_created(&at(2024, 3, 15, 9, 5), &now), "today 09:05");
        assert_eq!(format_created(&at(2024, 3, 14, 23, 59), &now), "yesterday");
        assert_eq!(format_created(&at(2024, 3, 12, 8, 0), &now), "3 days ago");
        assert_eq!(format_created(&at(2024, 3, 9, 8, 0), &now), "6 days ago");
        assert_eq!(format_created(&at(2024, 3, 8, 8, 0), &now), locale_date(date(2024, 3, 8)));
        assert_eq!(format_created(&at(2024, 3, 20, 8, 0), &now), locale_date(date(2024, 3, 20)));
    }

    #[test]
    fn due_badges() {
        let today = date(2024, 3, 15);
        assert_eq!(DueBadge::new(today, today).label(), "Today");
        assert_eq!(DueBadge::new(date(2024, 3, 16), today).label(), "Tomorrow");
        assert_eq!(DueBadge::new(date(2024, 3, 12), today).label(), "3 days overdue");
        assert_eq!(DueBadge::new(date(2024, 3, 14), today).urgency(), Urgency::Overdue(1));
        assert_eq!(DueBadge::new(date(2024, 3, 22), today).label(), "In 7 days");
        assert_eq!(DueBadge::new(date(2024, 3, 23), today).urgency(), Urgency::Later);
    }

    #[test]
    fn badge_colors() {
        let today = date(2024, 3, 15);
        assert_eq!(DueBadge::new(today, today).color_hex(), Some("#ff0000"));
        assert_eq!(DueBadge::new(date(2024, 3, 16), today).color_hex(), Some("#ffa500"));
    }
}

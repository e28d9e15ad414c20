//! The 6-week grid of a calendar month

use chrono::{Datelike, Duration, NaiveDate};

use bitflags::bitflags;

use crate::calendar::{CalendarIndex, Month};
use crate::config::MAX_TITLES_PER_DAY;
use crate::task::Task;

/// How many days a grid always contains (6 full weeks)
pub const GRID_DAYS: usize = 42;
const DAYS_PER_WEEK: usize = 7;

bitflags! {
    /// How a day cell should be highlighted
    pub struct CellFlags: u8 {
        /// The cell is the current day
        const TODAY = 1;
        /// The cell belongs to the previous or the next month
        const OTHER_MONTH = 2;
        /// The cell is the day the detail panel is open for
        const SELECTED = 4;
    }
}

/// One day of the grid
#[derive(Clone, Debug, PartialEq)]
pub struct DayCell<'a> {
    date: NaiveDate,
    flags: CellFlags,
    /// The first tasks of the day
    shown: Vec<&'a Task>,
    /// How many tasks are not shown
    overflow: usize,
}

impl<'a> DayCell<'a> {
    pub fn date(&self) -> NaiveDate     { self.date }
    pub fn flags(&self) -> CellFlags    { self.flags }
    pub fn shown(&self) -> &[&'a Task]  { &self.shown }
    pub fn overflow(&self) -> usize     { self.overflow }

    pub fn is_today(&self) -> bool       { self.flags.contains(CellFlags::TODAY) }
    pub fn is_other_month(&self) -> bool { self.flags.contains(CellFlags::OTHER_MONTH) }
    pub fn is_selected(&self) -> bool    { self.flags.contains(CellFlags::SELECTED) }

    /// How many tasks are due on this day
    pub fn task_count(&self) -> usize {
        self.shown.len() + self.overflow
    }
}


/// The grid of a month: 42 consecutive days, starting on the Sunday on or before the first day of the month
#[derive(Clone, Debug, PartialEq)]
pub struct MonthGrid<'a> {
    month: Month,
    cells: Vec<DayCell<'a>>,
}

impl<'a> MonthGrid<'a> {
    /// Lay out the tasks of an index
    pub fn new(index: &'a CalendarIndex, today: NaiveDate, selected: Option<NaiveDate>) -> Self {
        let month = index.month();
        let cells = grid_dates(month)
            .into_iter()
            .map(|date| {
                let mut flags = CellFlags::empty();
                if date == today {
                    flags.insert(CellFlags::TODAY);
                }
                if month.contains(date) == false {
                    flags.insert(CellFlags::OTHER_MONTH);
                }
                if selected == Some(date) {
                    flags.insert(CellFlags::SELECTED);
                }

                let tasks = index.tasks_on(date);
                let shown: Vec<&Task> = tasks.iter().take(MAX_TITLES_PER_DAY).collect();
                let overflow = tasks.len() - shown.len();
                DayCell { date, flags, shown, overflow }
            })
            .collect();

        Self { month, cells }
    }

    pub fn month(&self) -> Month {
        self.month
    }

    pub fn cells(&self) -> &[DayCell<'a>] {
        &self.cells
    }

    /// The cells, 7 by 7, from Sunday to Saturday
    pub fn weeks(&self) -> impl Iterator<Item = &[DayCell<'a>]> {
        self.cells.chunks(DAYS_PER_WEEK)
    }

    pub fn cell(&self, date: NaiveDate) -> Option<&DayCell<'a>> {
        self.cells.iter().find(|c| c.date == date)
    }
}

/// The 42 days displayed for a month
///
/// Days that cannot be represented are left out, which only happens for the first and last months `chrono` supports.
pub fn grid_dates(month: Month) -> Vec<NaiveDate> {
    let first = month.first_day();
    let days_since_sunday = first.weekday().num_days_from_sunday() as i64;

    (0..GRID_DAYS as i64)
        .filter_map(|offset| first.checked_add_signed(Duration::days(offset - days_since_sunday)))
        .collect()
}

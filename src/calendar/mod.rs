//! The monthly calendar view
//!
//! Tasks that have a due date are displayed in a month grid. The tasks displayed in the grid are kept in a [`CalendarIndex`], which is fetched from the server every time the month changes, and patched after every local change.

pub mod grid;
pub mod controller;

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

use chrono::{Datelike, Duration, NaiveDate};

use crate::task::{Task, TaskId};
use crate::traits::MonthTasks;

pub use controller::CalendarController;
pub use grid::{CellFlags, DayCell, MonthGrid};

const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
];


/// A month of a given year, whose whole grid can be represented
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Month {
    first_day: NaiveDate,
}

impl Month {
    pub fn new(year: i32, month: u32) -> Result<Self, Box<dyn Error>> {
        if month < 1 || month > 12 {
            return Err(format!("Invalid month number {}", month).into());
        }
        let first_day = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| format!("Year {} is out of range", year))?;
        let month = Self { first_day };
        if month.grid_bounds().is_none() {
            return Err(format!("{} is out of the supported range", month).into());
        }
        Ok(month)
    }

    /// The month a date belongs to
    ///
    /// At the very edges of the supported dates, the grid of this month may be incomplete (see [`grid::grid_dates`])
    pub fn of(date: NaiveDate) -> Self {
        Self { first_day: date.with_day(1).unwrap_or(date) }
    }

    pub fn year(&self) -> i32  { self.first_day.year() }
    pub fn month(&self) -> u32 { self.first_day.month() }

    pub fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }

    /// The first and last days displayed in the grid of this month
    pub fn grid_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let days_since_sunday = self.first_day.weekday().num_days_from_sunday() as i64;
        let start = self.first_day.checked_sub_signed(Duration::days(days_since_sunday))?;
        let end = start.checked_add_signed(Duration::days(grid::GRID_DAYS as i64 - 1))?;
        Some((start, end))
    }

    /// Whether a date is displayed in the grid of this month (including the days of the adjacent months)
    pub fn grid_contains(&self, date: NaiveDate) -> bool {
        match self.grid_bounds() {
            Some((start, end)) => start <= date && date <= end,
            None => self.contains(date),
        }
    }

    /// The following month, unless it is out of the supported range
    pub fn next(&self) -> Option<Self> {
        if self.month() >= 12 {
            Self::new(self.year().checked_add(1)?, 1).ok()
        } else {
            Self::new(self.year(), self.month() + 1).ok()
        }
    }

    /// The preceding month, unless it is out of the supported range
    pub fn previous(&self) -> Option<Self> {
        if self.month() <= 1 {
            Self::new(self.year().checked_sub(1)?, 12).ok()
        } else {
            Self::new(self.year(), self.month() - 1).ok()
        }
    }

    pub fn name(&self) -> &'static str {
        MONTH_NAMES[(self.month() as usize - 1) % 12]
    }
}

impl Display for Month {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{} {}", self.name(), self.year())
    }
}


/// The tasks displayed in the grid of a month, grouped by due date
///
/// A task appears in at most one bucket, buckets are never empty, and every bucket is a day of the grid (which includes a few days of the adjacent months).
#[derive(Clone, Debug, PartialEq)]
pub struct CalendarIndex {
    month: Month,
    days: BTreeMap<NaiveDate, Vec<Task>>,
}

impl CalendarIndex {
    /// Create an empty index
    pub fn new(month: Month) -> Self {
        Self { month, days: BTreeMap::new() }
    }

    /// Build an index from what the server returned for a month
    pub fn from_month_tasks(month: Month, month_tasks: MonthTasks) -> Self {
        let mut index = Self::new(month);
        for (date, tasks) in month_tasks {
            if month.grid_contains(date) == false {
                log::warn!("The server returned tasks for {}, which is not displayed with {}. Ignoring them", date, month);
                continue;
            }
            for task in tasks {
                if task.due_date() != Some(date) {
                    log::warn!("Task {} is listed under {}, but is due on {:?}", task, date, task.due_date());
                }
                index.upsert(task);
            }
        }
        index
    }

    pub fn month(&self) -> Month {
        self.month
    }

    /// The tasks due on a given day
    pub fn tasks_on(&self, date: NaiveDate) -> &[Task] {
        self.days.get(&date)
            .map(|tasks| tasks.as_slice())
            .unwrap_or(&[])
    }

    /// Every day that has at least one task
    pub fn days(&self) -> impl Iterator<Item = (&NaiveDate, &Vec<Task>)> {
        self.days.iter()
    }

    /// How many tasks this index contains
    pub fn len(&self) -> usize {
        self.days.values().map(|tasks| tasks.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.days.values()
            .flat_map(|tasks| tasks.iter())
            .find(|t| t.id() == id)
    }

    /// Remove a task from whichever day it was in
    pub fn remove(&mut self, id: TaskId) -> Option<Task> {
        let mut removed = None;
        for tasks in self.days.values_mut() {
            if let Some(position) = tasks.iter().position(|t| t.id() == id) {
                removed = Some(tasks.remove(position));
            }
        }
        self.days.retain(|_, tasks| tasks.is_empty() == false);
        removed
    }

    /// Insert a newer version of a task, in the bucket of its (possibly new) due date.
    ///
    /// A task that keeps its due date keeps its position in its bucket.
    /// A task that has no due date anymore, or whose due date is not displayed in the grid, is removed from the index.
    pub fn upsert(&mut self, task: Task) {
        let target = task.due_date().filter(|date| self.month.grid_contains(*date));

        if let Some(date) = target {
            if let Some(existing) = self.days.get_mut(&date).and_then(|tasks| tasks.iter_mut().find(|t| t.id() == task.id())) {
                *existing = task;
                return;
            }
        }

        self.remove(task.id());
        match target {
            None => log::debug!("Task {} is not due in the grid of {}. It is not part of the index", task, self.month),
            Some(date) => self.days.entry(date).or_insert_with(Vec::new).push(task),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn task(id: u64, due: Option<NaiveDate>) -> Task {
        let created_at = crate::task::parse_timestamp("2024-03-01 09:00:00").unwrap();
        Task::new(TaskId::from(id), format!("task {}", id), String::new(), false, created_at, due)
    }

    #[test]
    fn month_navigation() {
        let march = Month::new(2024, 3).unwrap();
        assert_eq!(march.next(), Some(Month::new(2024, 4).unwrap()));
        assert_eq!(Month::new(2024, 12).unwrap().next(), Some(Month::new(2025, 1).unwrap()));
        assert_eq!(Month::new(2024, 1).unwrap().previous(), Some(Month::new(2023, 12).unwrap()));
        assert_eq!(Month::of(date(2024, 3, 31)), march);
        assert_eq!(march.to_string(), "March 2024");
        assert!(Month::new(2024, 13).is_err());
        assert!(Month::new(2024, 0).is_err());
        assert!(march.contains(date(2024, 3, 31)));
        assert!(march.contains(date(2024, 4, 1)) == false);
    }

    #[test]
    fn grid_scope() {
        let march = Month::new(2024, 3).unwrap();
        assert_eq!(march.grid_bounds(), Some((date(2024, 2, 25), date(2024, 4, 6))));
        assert!(march.grid_contains(date(2024, 2, 25)));
        assert!(march.grid_contains(date(2024, 4, 6)));
        assert!(march.grid_contains(date(2024, 2, 24)) == false);
        assert!(march.grid_contains(date(2024, 4, 7)) == false);
    }

    #[test]
    fn months_at_the_edge_of_the_calendar() {
        // The grid of this month would end after the last representable date
        assert!(Month::new(262142, 12).is_err());

        let last = Month::new(262142, 11).unwrap();
        assert_eq!(last.next(), None);
        assert_eq!(last.previous(), Some(Month::new(262142, 10).unwrap()));
        assert_eq!(grid::grid_dates(last).len(), grid::GRID_DAYS);

        let first = Month::new(-262143, 2).unwrap();
        assert_eq!(grid::grid_dates(first).len(), grid::GRID_DAYS);

        // Months built from an edge date still have a (partial) grid
        let partial = Month::of(NaiveDate::MAX);
        assert!(grid::grid_dates(partial).len() < grid::GRID_DAYS);
    }

    #[test]
    fn moving_tasks_between_days() {
        let march = Month::new(2024, 3).unwrap();
        let mut index = CalendarIndex::new(march);
        index.upsert(task(1, Some(date(2024, 3, 15))));
        index.upsert(task(2, Some(date(2024, 3, 15))));
        assert_eq!(index.tasks_on(date(2024, 3, 15)).len(), 2);

        index.upsert(task(1, Some(date(2024, 3, 20))));
        assert_eq!(index.tasks_on(date(2024, 3, 15)).len(), 1);
        assert_eq!(index.tasks_on(date(2024, 3, 20)).len(), 1);
        assert_eq!(index.len(), 2);

        // On a trailing day of the grid: still in the index
        index.upsert(task(1, Some(date(2024, 4, 2))));
        assert_eq!(index.tasks_on(date(2024, 4, 2)).len(), 1);

        // Out of the grid, or without due date: out of the index
        index.upsert(task(1, Some(date(2024, 4, 10))));
        assert!(index.get(TaskId::from(1)).is_none());
        index.upsert(task(2, None));
        assert!(index.is_empty());
        assert_eq!(index.days().count(), 0);
    }

    #[test]
    fn updates_keep_positions() {
        let mut index = CalendarIndex::new(Month::new(2024, 3).unwrap());
        for id in 1..=3 {
            index.upsert(task(id, Some(date(2024, 3, 15))));
        }
        index.upsert(task(2, Some(date(2024, 3, 15))));
        let ids: Vec<_> = index.tasks_on(date(2024, 3, 15)).iter().map(|t| t.id().as_u64()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn building_from_server_data() {
        let march = Month::new(2024, 3).unwrap();
        let mut month_tasks = MonthTasks::new();
        month_tasks.insert(date(2024, 3, 15), vec![task(1, Some(date(2024, 3, 15)))]);
        month_tasks.insert(date(2024, 4, 1), vec![task(2, Some(date(2024, 4, 1)))]);
        month_tasks.insert(date(2024, 4, 15), vec![task(3, Some(date(2024, 4, 15)))]);
        month_tasks.insert(date(2024, 3, 16), vec![]);

        let mut index = CalendarIndex::from_month_tasks(march, month_tasks);
        assert_eq!(index.len(), 2);
        assert_eq!(index.days().count(), 2);
        assert!(index.get(TaskId::from(3)).is_none());
        assert_eq!(index.remove(TaskId::from(1)).is_some(), true);
    }
}

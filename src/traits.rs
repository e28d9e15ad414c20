use std::collections::BTreeMap;
use std::error::Error;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::task::{NewTask, Stats, Task, TaskId, TaskUpdate};

/// Tasks grouped by due date, as returned for a calendar month
pub type MonthTasks = BTreeMap<NaiveDate, Vec<Task>>;

/// A data source that owns the tasks, and is the only one entitled to create or alter them.
///
/// This is usually a remote server (see [`Client`](crate::client::Client)), but it can be mocked (see [`MemorySource`](crate::memory::MemorySource)).
#[async_trait]
pub trait TodoSource {
    /// Returns every task this source contains
    async fn get_todos(&self) -> Result<Vec<Task>, Box<dyn Error>>;
    /// Returns the tasks due on a given date
    async fn get_todos_by_date(&self, date: NaiveDate, show_completed: bool) -> Result<Vec<Task>, Box<dyn Error>>;
    /// Returns the tasks due in a given month, grouped by due date
    async fn get_month(&self, year: i32, month: u32, show_completed: bool) -> Result<MonthTasks, Box<dyn Error>>;
    /// Returns some counters about the tasks
    async fn get_stats(&self) -> Result<Stats, Box<dyn Error>>;

    /// Create a task, and return it the way the source has stored it
    async fn create_todo(&self, new_task: &NewTask) -> Result<Task, Box<dyn Error>>;
    /// Update a task, and return its new version
    async fn update_todo(&self, id: TaskId, update: &TaskUpdate) -> Result<Task, Box<dyn Error>>;
    /// Delete a task
    async fn delete_todo(&self, id: TaskId) -> Result<(), Box<dyn Error>>;
    /// Delete every completed task, and return how many were deleted, along with a message that can be shown to the user
    async fn clear_completed(&self) -> Result<(usize, String), Box<dyn Error>>;
}

/// So that a single source can be shared between several controllers
#[async_trait]
impl<T> TodoSource for Arc<T>
where
    T: TodoSource + Send + Sync + ?Sized,
{
    async fn get_todos(&self) -> Result<Vec<Task>, Box<dyn Error>> {
        (**self).get_todos().await
    }
    async fn get_todos_by_date(&self, date: NaiveDate, show_completed: bool) -> Result<Vec<Task>, Box<dyn Error>> {
        (**self).get_todos_by_date(date, show_completed).await
    }
    async fn get_month(&self, year: i32, month: u32, show_completed: bool) -> Result<MonthTasks, Box<dyn Error>> {
        (**self).get_month(year, month, show_completed).await
    }
    async fn get_stats(&self) -> Result<Stats, Box<dyn Error>> {
        (**self).get_stats().await
    }
    async fn create_todo(&self, new_task: &NewTask) -> Result<Task, Box<dyn Error>> {
        (**self).create_todo(new_task).await
    }
    async fn update_todo(&self, id: TaskId, update: &TaskUpdate) -> Result<Task, Box<dyn Error>> {
        (**self).update_todo(id, update).await
    }
    async fn delete_todo(&self, id: TaskId) -> Result<(), Box<dyn Error>> {
        (**self).delete_todo(id).await
    }
    async fn clear_completed(&self) -> Result<(usize, String), Box<dyn Error>> {
        (**self).clear_completed().await
    }
}


/// A form field that can be given the focus
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormField {
    /// The title input of the "new task" form
    NewTitle,
    /// The title input of the edit dialog
    EditTitle,
    /// The title input of the calendar quick-add form
    QuickAddTitle,
}

/// What controllers need from the user interface, apart from rendering
pub trait Interaction {
    /// Ask the user to confirm an action. Returns whether they agreed
    fn confirm(&self, message: &str) -> bool;
    /// Move the input focus to a given field
    fn focus(&self, field: FormField);
}

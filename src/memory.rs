//! An in-memory backend.
//!
//! It behaves like the actual server does (it assigns IDs and creation timestamps, and rejects invalid requests), which makes it suited for tests and for offline demos.

use std::error::Error;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, Timelike};

use crate::error::ApiError;
use crate::mock_behaviour::MockBehaviour;
use crate::task::{NewTask, Stats, Task, TaskId, TaskUpdate};
use crate::traits::{MonthTasks, TodoSource};

const TITLE_REQUIRED: &str = "Title is required";
const NOT_FOUND: &str = "Todo not found";


/// A [`TodoSource`] that stores its tasks in memory
#[derive(Debug, Default)]
pub struct MemorySource {
    data: Mutex<MemoryData>,
}

#[derive(Debug)]
struct MemoryData {
    tasks: Vec<Task>,
    next_id: u64,
    mock_behaviour: MockBehaviour,
    request_count: usize,
}

impl Default for MemoryData {
    fn default() -> Self {
        Self {
            tasks: Vec::new(),
            next_id: 1,
            mock_behaviour: MockBehaviour::default(),
            request_count: 0,
        }
    }
}

impl MemorySource {
    /// Create an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a source that already contains some tasks.
    /// New tasks will be given IDs greater than any of the existing ones.
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        let next_id = tasks.iter()
            .map(|t| t.id().as_u64() + 1)
            .max()
            .unwrap_or(1);
        Self {
            data: Mutex::new(MemoryData { tasks, next_id, ..MemoryData::default() }),
        }
    }

    /// Tweak the way this source will fail
    pub fn set_mock_behaviour(&self, behaviour: MockBehaviour) {
        self.data().mock_behaviour = behaviour;
    }

    /// How many requests this source has received so far (failed ones included)
    pub fn request_count(&self) -> usize {
        self.data().request_count
    }

    /// A copy of every stored task
    pub fn snapshot(&self) -> Vec<Task> {
        self.data().tasks.clone()
    }

    fn data(&self) -> MutexGuard<'_, MemoryData> {
        // A panicking test thread cannot leave the data in an inconsistent state
        match self.data.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl MemoryData {
    fn visible_tasks(&self, show_completed: bool) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
            .filter(move |t| show_completed || t.completed() == false)
    }

    fn find_mut(&mut self, id: TaskId) -> Result<&mut Task, Box<dyn Error>> {
        self.tasks.iter_mut()
            .find(|t| t.id() == id)
            .ok_or_else(|| ApiError::not_found(NOT_FOUND).into())
    }
}

fn now() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

#[async_trait]
impl TodoSource for MemorySource {
    async fn get_todos(&self) -> Result<Vec<Task>, Box<dyn Error>> {
        let mut data = self.data();
        data.request_count += 1;
        data.mock_behaviour.can_get_todos()?;
        Ok(data.tasks.clone())
    }

    async fn get_todos_by_date(&self, date: NaiveDate, show_completed: bool) -> Result<Vec<Task>, Box<dyn Error>> {
        let mut data = self.data();
        data.request_count += 1;
        data.mock_behaviour.can_get_todos()?;
        Ok(data.visible_tasks(show_completed)
            .filter(|t| t.is_due_on(date))
            .cloned()
            .collect())
    }

    async fn get_month(&self, year: i32, month: u32, show_completed: bool) -> Result<MonthTasks, Box<dyn Error>> {
        let mut data = self.data();
        data.request_count += 1;
        data.mock_behaviour.can_get_month()?;

        let mut result = MonthTasks::new();
        for task in data.visible_tasks(show_completed) {
            if let Some(due) = task.due_date() {
                if due.year() == year && due.month() == month {
                    result.entry(due).or_insert_with(Vec::new).push(task.clone());
                }
            }
        }
        Ok(result)
    }

    async fn get_stats(&self) -> Result<Stats, Box<dyn Error>> {
        let mut data = self.data();
        data.request_count += 1;
        data.mock_behaviour.can_get_stats()?;
        Ok(Stats::from_tasks(&data.tasks))
    }

    async fn create_todo(&self, new_task: &NewTask) -> Result<Task, Box<dyn Error>> {
        let mut data = self.data();
        data.request_count += 1;
        data.mock_behaviour.can_create_todo()?;

        let title = new_task.title.trim();
        if title.is_empty() {
            return Err(ApiError::bad_request(TITLE_REQUIRED).into());
        }

        let id = TaskId::from(data.next_id);
        data.next_id += 1;
        let task = Task::new(id, title.to_string(), new_task.description.trim().to_string(),
                             false, now(), new_task.due_date);
        log::debug!("Memory source: created task {}", task);
        data.tasks.push(task.clone());
        Ok(task)
    }

    async fn update_todo(&self, id: TaskId, update: &TaskUpdate) -> Result<Task, Box<dyn Error>> {
        let mut data = self.data();
        data.request_count += 1;
        data.mock_behaviour.can_update_todo()?;

        if update.is_empty() {
            return Err(ApiError::bad_request("Update data is required").into());
        }
        if let Some(title) = &update.title {
            if title.trim().is_empty() {
                return Err(ApiError::bad_request(TITLE_REQUIRED).into());
            }
        }

        let task = data.find_mut(id)?;
        if let Some(completed) = update.completed {
            task.set_completed(completed);
        }
        if let Some(title) = &update.title {
            task.set_title(title.trim().to_string());
        }
        if let Some(description) = &update.description {
            task.set_description(description.clone());
        }
        if let Some(due_date) = update.due_date {
            task.set_due_date(due_date);
        }
        Ok(task.clone())
    }

    async fn delete_todo(&self, id: TaskId) -> Result<(), Box<dyn Error>> {
        let mut data = self.data();
        data.request_count += 1;
        data.mock_behaviour.can_delete_todo()?;

        let len_before = data.tasks.len();
        data.tasks.retain(|t| t.id() != id);
        if data.tasks.len() == len_before {
            return Err(ApiError::not_found(NOT_FOUND).into());
        }
        Ok(())
    }

    async fn clear_completed(&self) -> Result<(usize, String), Box<dyn Error>> {
        let mut data = self.data();
        data.request_count += 1;
        data.mock_behaviour.can_clear_completed()?;

        let len_before = data.tasks.len();
        data.tasks.retain(|t| t.completed() == false);
        let count = len_before - data.tasks.len();
        Ok((count, format!("Deleted {} completed task(s)", count)))
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn ids_are_sequential() {
        let source = MemorySource::new();
        let a = source.create_todo(&NewTask::new("a")).await.unwrap();
        let b = source.create_todo(&NewTask::new("b")).await.unwrap();
        assert_eq!(a.id(), TaskId::from(1));
        assert_eq!(b.id(), TaskId::from(2));

        source.delete_todo(b.id()).await.unwrap();
        let c = source.create_todo(&NewTask::new("c")).await.unwrap();
        assert_eq!(c.id(), TaskId::from(3));
    }

    #[tokio::test]
    async fn rejects_invalid_requests() {
        let source = MemorySource::new();
        let err = source.create_todo(&NewTask::new("   ")).await.unwrap_err();
        assert_eq!(err.downcast_ref::<ApiError>().unwrap().server_message(), Some(TITLE_REQUIRED));

        let err = source.update_todo(TaskId::from(42), &TaskUpdate::completion(true)).await.unwrap_err();
        assert_eq!(err.downcast_ref::<ApiError>().unwrap().server_message(), Some(NOT_FOUND));

        assert!(source.delete_todo(TaskId::from(42)).await.is_err());
        assert!(source.snapshot().is_empty());
    }

    #[tokio::test]
    async fn month_grouping() {
        let source = MemorySource::new();
        source.create_todo(&NewTask::new("Buy milk").due_on(date(2024, 3, 15))).await.unwrap();
        source.create_todo(&NewTask::new("Pay rent").due_on(date(2024, 3, 15))).await.unwrap();
        let done = source.create_todo(&NewTask::new("Taxes").due_on(date(2024, 3, 31))).await.unwrap();
        source.create_todo(&NewTask::new("Next month").due_on(date(2024, 4, 1))).await.unwrap();
        source.create_todo(&NewTask::new("Someday")).await.unwrap();
        source.update_todo(done.id(), &TaskUpdate::completion(true)).await.unwrap();

        let month = source.get_month(2024, 3, true).await.unwrap();
        assert_eq!(month.len(), 2);
        assert_eq!(month[&date(2024, 3, 15)].len(), 2);
        assert_eq!(month[&date(2024, 3, 31)].len(), 1);

        let month = source.get_month(2024, 3, false).await.unwrap();
        assert_eq!(month.len(), 1);

        let stats = source.get_stats().await.unwrap();
        assert_eq!(stats, Stats { total: 5, completed: 1, pending: 4 });
    }

    #[tokio::test]
    async fn partial_updates() {
        let source = MemorySource::new();
        let task = source.create_todo(&NewTask::new("a").with_description("desc").due_on(date(2024, 3, 15))).await.unwrap();

        let updated = source.update_todo(task.id(), &TaskUpdate { title: Some("b".into()), ..TaskUpdate::default() }).await.unwrap();
        assert_eq!(updated.title(), "b");
        assert_eq!(updated.description(), "desc");
        assert_eq!(updated.due_date(), Some(date(2024, 3, 15)));
        assert_eq!(updated.created_at(), task.created_at());

        let cleared = source.update_todo(task.id(), &TaskUpdate { due_date: Some(None), ..TaskUpdate::default() }).await.unwrap();
        assert_eq!(cleared.due_date(), None);
        assert_eq!(cleared.title(), "b");
    }

    #[tokio::test]
    async fn clear_completed_counts() {
        let source = MemorySource::new();
        for title in &["a", "b", "c"] {
            source.create_todo(&NewTask::new(title)).await.unwrap();
        }
        source.update_todo(TaskId::from(1), &TaskUpdate::completion(true)).await.unwrap();
        source.update_todo(TaskId::from(3), &TaskUpdate::completion(true)).await.unwrap();

        let (count, _message) = source.clear_completed().await.unwrap();
        assert_eq!(count, 2);
        assert_eq!(source.snapshot().len(), 1);
        assert_eq!(source.request_count(), 6);
    }
}

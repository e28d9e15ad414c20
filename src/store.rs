//! The local copy of the task list

use std::fmt::{Debug, Formatter};

use crate::task::{Task, TaskId};

/// A callback that is run whenever the content of a [`TaskStore`] changes
pub type Subscriber = Box<dyn FnMut(&[Task])>;

/// An ordered list of tasks, mirroring the one of a server.
///
/// Every change is meant to come from a server reply. Registered subscribers are called after every change, typically to re-render the view.
#[derive(Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
    subscribers: Vec<Subscriber>,
}

impl Debug for TaskStore {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        f.debug_struct("TaskStore")
            .field("tasks", &self.tasks)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback that will be called after every change
    pub fn subscribe<F: FnMut(&[Task]) + 'static>(&mut self, subscriber: F) {
        self.subscribers.push(Box::new(subscriber));
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id() == id)
    }

    /// Replace the whole content
    pub fn reset(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
        self.notify();
    }

    /// Replace the task that has the same ID, or append it in case it is not known yet
    pub fn upsert(&mut self, task: Task) {
        match self.tasks.iter_mut().find(|t| t.id() == task.id()) {
            Some(existing) => *existing = task,
            None => self.tasks.push(task),
        }
        self.notify();
    }

    /// Remove a task. Returns it, if it was known
    pub fn remove(&mut self, id: TaskId) -> Option<Task> {
        let position = self.tasks.iter().position(|t| t.id() == id)?;
        let removed = self.tasks.remove(position);
        self.notify();
        Some(removed)
    }

    /// Keep only the tasks that match a predicate
    pub fn retain<F: FnMut(&Task) -> bool>(&mut self, f: F) {
        self.tasks.retain(f);
        self.notify();
    }

    fn notify(&mut self) {
        let tasks = &self.tasks;
        for subscriber in self.subscribers.iter_mut() {
            subscriber(tasks);
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn task(id: u64, title: &str) -> Task {
        let created_at = crate::task::parse_timestamp("2024-03-01 09:00:00").unwrap();
        Task::new(TaskId::from(id), title.to_string(), String::new(), false, created_at, None)
    }

    #[test]
    fn upsert_replaces_in_place() {
        let mut store = TaskStore::new();
        store.reset(vec![task(1, "a"), task(2, "b"), task(3, "c")]);
        store.upsert(task(2, "B"));
        let titles: Vec<_> = store.tasks().iter().map(|t| t.title()).collect();
        assert_eq!(titles, vec!["a", "B", "c"]);

        store.upsert(task(4, "d"));
        assert_eq!(store.len(), 4);
        assert_eq!(store.remove(TaskId::from(1)).map(|t| t.id()), Some(TaskId::from(1)));
        assert!(store.remove(TaskId::from(1)).is_none());
    }

    #[test]
    fn subscribers_are_notified() {
        let renders = Rc::new(Cell::new(0));
        let mut store = TaskStore::new();
        let counter = renders.clone();
        store.subscribe(move |_tasks| counter.set(counter.get() + 1));

        store.reset(vec![task(1, "a")]);
        store.upsert(task(1, "b"));
        store.retain(|_| true);
        assert_eq!(renders.get(), 3);

        // Unknown IDs do not change anything
        store.remove(TaskId::from(42));
        assert_eq!(renders.get(), 3);
    }
}

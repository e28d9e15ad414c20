//! The task list view

use chrono::{Local, NaiveDateTime};

use crate::filter::Filter;
use crate::notification::Notifier;
use crate::ops::{self, TaskForm};
use crate::store::TaskStore;
use crate::task::{Stats, Task, TaskId};
use crate::traits::{FormField, Interaction, TodoSource};

/// Controls the task list: it keeps a local copy of the server's tasks, sends the user's changes to the server, and renders the list according to the active filter.
///
/// The local copy is never modified before the server has acknowledged a change: it is then updated with what the server replied.
/// Every operation reports its failures through the notifier, and returns whether it succeeded.
pub struct ListController<S: TodoSource> {
    source: S,
    store: TaskStore,
    filter: Filter,
    notifier: Notifier,
    interaction: Box<dyn Interaction>,
    /// The task the edit dialog is open for
    editing: Option<TaskId>,
}

impl<S: TodoSource> ListController<S> {
    pub fn new(source: S, interaction: Box<dyn Interaction>) -> Self {
        Self {
            source,
            store: TaskStore::new(),
            filter: Filter::default(),
            notifier: Notifier::new(),
            interaction,
            editing: None,
        }
    }

    /// Use a custom notifier (e.g. one that is bound to a notification channel)
    pub fn with_notifier(mut self, notifier: Notifier) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn source(&self) -> &S                { &self.source }
    pub fn tasks(&self) -> &[Task]            { self.store.tasks() }
    pub fn filter(&self) -> Filter            { self.filter }
    pub fn notifier(&self) -> &Notifier       { &self.notifier }
    pub fn editing(&self) -> Option<TaskId>   { self.editing }

    /// The local copy of the tasks. Use it to subscribe to changes
    pub fn store_mut(&mut self) -> &mut TaskStore {
        &mut self.store
    }

    /// The tasks the active filter lets through
    pub fn visible_tasks(&self) -> Vec<&Task> {
        self.filter.apply(self.store.tasks())
    }

    /// Counters of the locally known tasks
    pub fn stats(&self) -> Stats {
        Stats::from_tasks(self.store.tasks())
    }

    pub fn set_filter(&mut self, filter: Filter) {
        log::debug!("Switching to filter {}", filter);
        self.filter = filter;
    }

    /// Fetch every task from the server
    pub async fn load(&mut self) -> bool {
        match self.source.get_todos().await {
            Err(err) => {
                self.notifier.failure("Unable to load tasks", err.as_ref());
                false
            },
            Ok(tasks) => {
                log::info!("Loaded {} tasks", tasks.len());
                self.store.reset(tasks);
                true
            }
        }
    }

    /// Create a task from the content of the "new task" form
    pub async fn add(&mut self, form: TaskForm) -> bool {
        let new_task = match form.to_new_task() {
            Err(err) => {
                ops::reject_form(&mut self.notifier, self.interaction.as_ref(), FormField::NewTitle, err);
                return false;
            },
            Ok(body) => body,
        };

        match self.source.create_todo(&new_task).await {
            Err(err) => {
                self.notifier.failure("Unable to add task", err.as_ref());
                false
            },
            Ok(task) => {
                log::info!("Created task {}", task);
                let message = format!("Added \"{}\"", task.title());
                self.store.upsert(task);
                self.notifier.success(message);
                true
            }
        }
    }

    /// Flip the completion status of a task
    pub async fn toggle(&mut self, id: TaskId) -> bool {
        let task = match self.known_task(id) {
            None => return false,
            Some(t) => t,
        };

        match ops::toggle(&self.source, &task).await {
            Err(err) => {
                self.notifier.failure("Unable to update task", err.as_ref());
                false
            },
            Ok(updated) => {
                log::info!("Toggled task {}", updated);
                let message = ops::toggled_message(&updated);
                self.store.upsert(updated);
                self.notifier.success(message);
                true
            }
        }
    }

    /// Delete a task, once the user has confirmed it
    pub async fn delete(&mut self, id: TaskId) -> bool {
        let task = match self.known_task(id) {
            None => return false,
            Some(t) => t,
        };
        if ops::confirm_deletion(self.interaction.as_ref(), &task) == false {
            log::debug!("Deletion of {} cancelled", task);
            return false;
        }

        match self.source.delete_todo(id).await {
            Err(err) => {
                self.notifier.failure("Unable to delete task", err.as_ref());
                false
            },
            Ok(()) => {
                log::info!("Deleted task {}", task);
                self.store.remove(id);
                if self.editing == Some(id) {
                    self.editing = None;
                }
                self.notifier.success(format!("Deleted \"{}\"", task.title()));
                true
            }
        }
    }

    /// Delete every completed task, once the user has confirmed it
    pub async fn clear_completed(&mut self) -> bool {
        let n_completed = self.stats().completed;
        if n_completed == 0 {
            self.notifier.info("There are no completed tasks to clear");
            return false;
        }
        if self.interaction.confirm(&format!("Delete {} completed task(s)?", n_completed)) == false {
            return false;
        }

        match self.source.clear_completed().await {
            Err(err) => {
                self.notifier.failure("Unable to clear completed tasks", err.as_ref());
                false
            },
            Ok((count, message)) => {
                log::info!("Cleared {} completed tasks", count);
                self.store.retain(|t| t.completed() == false);
                if let Some(id) = self.editing {
                    if self.store.get(id).is_none() {
                        self.editing = None;
                    }
                }
                self.notifier.success(message);
                true
            }
        }
    }

    /// Open the edit dialog for a task. Returns the pre-filled form
    pub fn open_edit(&mut self, id: TaskId) -> Option<TaskForm> {
        let form = TaskForm::from_task(self.store.get(id)?);
        self.editing = Some(id);
        Some(form)
    }

    pub fn close_edit(&mut self) {
        self.editing = None;
    }

    /// Send the content of the edit dialog to the server. The dialog is closed on success
    pub async fn save_edit(&mut self, id: TaskId, form: TaskForm) -> bool {
        if self.known_task(id).is_none() {
            return false;
        }
        let update = match form.to_update() {
            Err(err) => {
                ops::reject_form(&mut self.notifier, self.interaction.as_ref(), FormField::EditTitle, err);
                return false;
            },
            Ok(update) => update,
        };

        match ops::save_edit(&self.source, id, &update).await {
            Err(err) => {
                self.notifier.failure("Unable to update task", err.as_ref());
                false
            },
            Ok(updated) => {
                log::info!("Updated task {}", updated);
                self.store.upsert(updated);
                self.editing = None;
                self.notifier.success("Task updated");
                true
            }
        }
    }

    /// Render the list, as of now
    pub fn render(&self) -> String {
        self.render_at(&Local::now().naive_local())
    }

    /// Render the list, with dates relative to `now`
    pub fn render_at(&self, now: &NaiveDateTime) -> String {
        crate::render::list_page(&self.visible_tasks(), self.filter, &self.stats(), now)
    }

    fn known_task(&self, id: TaskId) -> Option<Task> {
        let task = self.store.get(id).cloned();
        if task.is_none() {
            log::warn!("Task {} is not known locally. Ignoring it", id);
        }
        task
    }
}

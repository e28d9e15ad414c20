//! The controller of the calendar view

use chrono::{Local, NaiveDate, NaiveDateTime};

use crate::calendar::{CalendarIndex, Month, MonthGrid};
use crate::notification::Notifier;
use crate::ops::{self, TaskForm};
use crate::task::{Task, TaskId};
use crate::traits::{FormField, Interaction, TodoSource};

/// Controls the calendar view: the displayed month, its tasks, and the detail panel of the selected day.
///
/// Changing the month fetches the whole month from the server. Any other change is applied to the server first, then patched into the local index with what the server replied.
pub struct CalendarController<S: TodoSource> {
    source: S,
    index: CalendarIndex,
    today: NaiveDate,
    /// The day the detail panel is open for
    selected: Option<NaiveDate>,
    show_completed: bool,
    notifier: Notifier,
    interaction: Box<dyn Interaction>,
    editing: Option<TaskId>,
}

impl<S: TodoSource> CalendarController<S> {
    /// Create a controller that displays the current month. Call [`Self::reload`] to fetch its tasks
    pub fn new(source: S, interaction: Box<dyn Interaction>) -> Self {
        Self::new_at(source, interaction, Local::now().date_naive())
    }

    /// Create a controller, as if today was `today`
    pub fn new_at(source: S, interaction: Box<dyn Interaction>, today: NaiveDate) -> Self {
        Self {
            source,
            index: CalendarIndex::new(Month::of(today)),
            today,
            selected: None,
            show_completed: true,
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

    pub fn source(&self) -> &S                  { &self.source }
    pub fn index(&self) -> &CalendarIndex       { &self.index }
    pub fn month(&self) -> Month                { self.index.month() }
    pub fn today(&self) -> NaiveDate            { self.today }
    pub fn selected(&self) -> Option<NaiveDate> { self.selected }
    pub fn show_completed(&self) -> bool        { self.show_completed }
    pub fn notifier(&self) -> &Notifier         { &self.notifier }
    pub fn editing(&self) -> Option<TaskId>     { self.editing }

    /// Tell the controller the date has changed (e.g. after midnight)
    pub fn set_today(&mut self, today: NaiveDate) {
        self.today = today;
    }

    /// The grid of the displayed month
    pub fn grid(&self) -> MonthGrid<'_> {
        MonthGrid::new(&self.index, self.today, self.selected)
    }

    /// The tasks due on a given day of the displayed month
    pub fn tasks_on(&self, date: NaiveDate) -> &[Task] {
        self.index.tasks_on(date)
    }

    /// The tasks listed in the detail panel, if it is open
    pub fn selected_tasks(&self) -> Option<&[Task]> {
        self.selected.map(|date| self.index.tasks_on(date))
    }

    /// Fetch the tasks of the displayed month again
    pub async fn reload(&mut self) -> bool {
        self.show_month(self.month()).await
    }

    pub async fn previous_month(&mut self) -> bool {
        match self.month().previous() {
            Some(month) => self.show_month(month).await,
            None => self.out_of_range(),
        }
    }

    pub async fn next_month(&mut self) -> bool {
        match self.month().next() {
            Some(month) => self.show_month(month).await,
            None => self.out_of_range(),
        }
    }

    pub async fn go_to_today(&mut self) -> bool {
        self.show_month(Month::of(self.today)).await
    }

    /// Display a month. The detail panel is closed.
    ///
    /// In case the tasks of this month cannot be fetched, the month is displayed without any task.
    pub async fn show_month(&mut self, month: Month) -> bool {
        self.close_panel();

        match self.source.get_month(month.year(), month.month(), self.show_completed).await {
            Err(err) => {
                self.index = CalendarIndex::new(month);
                self.notifier.failure(&format!("Unable to load {}", month), err.as_ref());
                false
            },
            Ok(month_tasks) => {
                self.index = CalendarIndex::from_month_tasks(month, month_tasks);
                log::info!("Displaying {} ({} tasks)", month, self.index.len());
                true
            }
        }
    }

    /// Include (or exclude) the completed tasks, and fetch the displayed month again
    pub async fn set_show_completed(&mut self, show_completed: bool) -> bool {
        let previous = self.show_completed;
        self.show_completed = show_completed;
        let success = self.reload().await;
        if success == false {
            self.show_completed = previous;
        }
        success
    }

    /// Open the detail panel for a day
    pub fn select_day(&mut self, date: NaiveDate) {
        log::debug!("Selecting {}", date);
        self.selected = Some(date);
    }

    pub fn close_panel(&mut self) {
        self.selected = None;
        self.editing = None;
    }

    /// Create a task that is due on the selected day
    pub async fn quick_add(&mut self, form: TaskForm) -> bool {
        let date = match self.selected {
            None => {
                log::warn!("No day is selected. Ignoring quick-add");
                return false;
            },
            Some(date) => date,
        };

        let new_task = match form.with_due_date(Some(date)).to_new_task() {
            Err(err) => {
                ops::reject_form(&mut self.notifier, self.interaction.as_ref(), FormField::QuickAddTitle, err);
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
                log::info!("Created task {} on {}", task, date);
                let message = format!("Added \"{}\"", task.title());
                self.apply(task);
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
                self.apply(updated);
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
                self.index.remove(id);
                if self.editing == Some(id) {
                    self.editing = None;
                }
                self.notifier.success(format!("Deleted \"{}\"", task.title()));
                true
            }
        }
    }

    /// Open the edit dialog for a task. Returns the pre-filled form
    pub fn open_edit(&mut self, id: TaskId) -> Option<TaskForm> {
        let form = TaskForm::from_task(self.index.get(id)?);
        self.editing = Some(id);
        Some(form)
    }

    pub fn close_edit(&mut self) {
        self.editing = None;
    }

    /// Send the content of the edit dialog to the server, and move the task to the day it is now due (if any)
    pub async fn save_edit(&mut self, id: TaskId, form: TaskForm) -> bool {
        let previous = match self.known_task(id) {
            None => return false,
            Some(t) => t,
        };
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
                if previous.due_date() != updated.due_date() {
                    log::info!("Task {} moved from {:?} to {:?}", updated, previous.due_date(), updated.due_date());
                } else {
                    log::info!("Updated task {}", updated);
                }
                self.apply(updated);
                self.editing = None;
                self.notifier.success("Task updated");
                true
            }
        }
    }

    /// Render the grid and the detail panel, as of now
    pub fn render(&self) -> String {
        self.render_at(&Local::now().naive_local())
    }

    /// Render the grid and the detail panel, with dates relative to `now`
    pub fn render_at(&self, now: &NaiveDateTime) -> String {
        let panel = self.selected.map(|date| (date, self.index.tasks_on(date)));
        crate::render::calendar_page(&self.grid(), panel, now)
    }

    /// Patch the index with a task the server has just replied
    fn apply(&mut self, task: Task) {
        if self.show_completed == false && task.completed() {
            self.index.remove(task.id());
        } else {
            self.index.upsert(task);
        }
    }

    fn out_of_range(&mut self) -> bool {
        log::warn!("Cannot navigate further than {}", self.month());
        self.notifier.error("This month cannot be displayed");
        false
    }

    fn known_task(&self, id: TaskId) -> Option<Task> {
        let task = self.index.get(id).cloned();
        if task.is_none() {
            log::warn!("Task {} is not displayed in {}. Ignoring it", id, self.month());
        }
        task
    }
}

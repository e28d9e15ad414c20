//! Request flows that are shared by the list and the calendar controllers

use std::error::Error;

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::notification::Notifier;
use crate::task::{parse_optional_date, NewTask, Task, TaskId, TaskUpdate};
use crate::traits::{FormField, Interaction, TodoSource};


/// The content of a task form (the "new task" form, the edit dialog, or the calendar quick-add form)
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TaskForm {
    pub title: String,
    pub description: String,
    pub due_date: Option<NaiveDate>,
}

impl TaskForm {
    pub fn new<S: ToString>(title: S) -> Self {
        Self { title: title.to_string(), ..Self::default() }
    }

    /// A form pre-filled with the current values of a task, as the edit dialog shows it
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title().to_string(),
            description: task.description().to_string(),
            due_date: task.due_date(),
        }
    }

    pub fn with_description<S: ToString>(mut self, description: S) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_due_date(mut self, due_date: Option<NaiveDate>) -> Self {
        self.due_date = due_date;
        self
    }

    /// Set the due date from the text of a date input (`YYYY-MM-DD`, or empty for "no due date")
    pub fn with_due_date_input(self, text: &str) -> Result<Self, Box<dyn Error>> {
        let due_date = parse_optional_date(text)?;
        Ok(self.with_due_date(due_date))
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        Ok(())
    }

    /// The body of a creation request
    pub fn to_new_task(&self) -> Result<NewTask, ValidationError> {
        self.validate()?;
        Ok(NewTask {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            due_date: self.due_date,
        })
    }

    /// The body of an update request. Every field is sent, so that a due date that has been removed is cleared on the server as well
    pub fn to_update(&self) -> Result<TaskUpdate, ValidationError> {
        self.validate()?;
        Ok(TaskUpdate {
            title: Some(self.title.trim().to_string()),
            description: Some(self.description.trim().to_string()),
            due_date: Some(self.due_date),
            completed: None,
        })
    }
}


/// Tell the user their form is not valid, and give the focus back to the faulty field
pub(crate) fn reject_form(notifier: &mut Notifier, interaction: &dyn Interaction, field: FormField, err: ValidationError) {
    log::debug!("Rejecting form: {}", err);
    notifier.error(err.to_string());
    interaction.focus(field);
}

/// Ask the server to flip the completion status of a task
pub(crate) async fn toggle<S: TodoSource>(source: &S, task: &Task) -> Result<Task, Box<dyn Error>> {
    let update = TaskUpdate::completion(task.completed() == false);
    source.update_todo(task.id(), &update).await
}

/// Ask the server to update a task from the content of the edit dialog
pub(crate) async fn save_edit<S: TodoSource>(source: &S, id: TaskId, update: &TaskUpdate) -> Result<Task, Box<dyn Error>> {
    source.update_todo(id, update).await
}

/// Ask the user whether they really want to delete a task
pub(crate) fn confirm_deletion(interaction: &dyn Interaction, task: &Task) -> bool {
    interaction.confirm(&format!("Delete \"{}\"?", task.title()))
}

/// The notification shown after a task has been toggled
pub(crate) fn toggled_message(task: &Task) -> String {
    if task.completed() {
        format!("\"{}\" marked as completed", task.title())
    } else {
        format!("\"{}\" marked as pending", task.title())
    }
}

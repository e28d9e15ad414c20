//! Some utility functions

use std::io::{stdin, stdout, BufRead, Write};

use crate::task::Task;
use crate::traits::{FormField, Interaction};

/// An [`Interaction`] that agrees to everything, and has no input to focus
#[derive(Clone, Copy, Debug, Default)]
pub struct AutoConfirm;

impl Interaction for AutoConfirm {
    fn confirm(&self, message: &str) -> bool {
        log::debug!("Auto-confirming {:?}", message);
        true
    }

    fn focus(&self, _field: FormField) {}
}


/// An [`Interaction`] that asks questions on the terminal
#[derive(Clone, Copy, Debug, Default)]
pub struct StdinPrompt;

impl Interaction for StdinPrompt {
    fn confirm(&self, message: &str) -> bool {
        let mut stdout = stdout();
        if let Err(err) = write!(stdout, "{} [y/N] ", message).and_then(|_| stdout.flush()) {
            log::warn!("Unable to prompt the user: {}", err);
            return false;
        }

        let mut answer = String::new();
        match stdin().lock().read_line(&mut answer) {
            Err(err) => {
                log::warn!("Unable to read the user answer: {}", err);
                false
            },
            Ok(_) => answer.trim().to_lowercase().starts_with('y'),
        }
    }

    fn focus(&self, field: FormField) {
        log::debug!("(focus would be given to {:?})", field);
    }
}


/// A debug utility that pretty-prints a task
pub fn print_task(task: &Task) {
    let completion = if task.completed() { "✓" } else { " " };
    let due = task.due_date()
        .map(|d| format!("\t(due {})", d))
        .unwrap_or_default();
    println!("    {} {:>3} {}{}", completion, task.id().as_u64(), task.title(), due);
    if task.has_description() {
        println!("          {}", task.description());
    }
}

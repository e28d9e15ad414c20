//! View filters applied to the task list

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::task::Task;

/// Which tasks should be displayed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Filter {
    /// Display every task
    All,
    /// Display only the tasks that are not completed yet
    Pending,
    /// Display only completed tasks
    Completed,
}

impl Default for Filter {
    fn default() -> Self {
        Filter::All
    }
}

impl Filter {
    /// Every filter, in the order their buttons are displayed
    pub const ALL: [Filter; 3] = [Filter::All, Filter::Pending, Filter::Completed];

    pub fn matches(&self, task: &Task) -> bool {
        match self {
            Filter::All => true,
            Filter::Pending => task.completed() == false,
            Filter::Completed => task.completed(),
        }
    }

    /// Returns the tasks that match this filter, in their original order
    pub fn apply<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        tasks.iter()
            .filter(|t| self.matches(t))
            .collect()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::Pending => "pending",
            Filter::Completed => "completed",
        }
    }

    /// The human-readable label of the filter button
    pub fn label(&self) -> &'static str {
        match self {
            Filter::All => "All",
            Filter::Pending => "Pending",
            Filter::Completed => "Completed",
        }
    }
}

impl Display for Filter {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Filter {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(Filter::All),
            "pending" => Ok(Filter::Pending),
            "completed" => Ok(Filter::Completed),
            other => Err(format!("Unknown filter {:?} (expected all, pending or completed)", other)),
        }
    }
}

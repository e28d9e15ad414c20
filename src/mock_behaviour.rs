//! This module provides ways to tweak the mocked backend, so that it can return errors on some tests

use std::error::Error;

use crate::error::ApiError;

/// This stores some behaviour tweaks, that describe how a mocked instance will behave during a given test
///
/// So that a functions fails _n_ times after _m_ initial successes, set `(m, n)` for the suited parameter
#[derive(Default, Clone, Debug)]
pub struct MockBehaviour {
    /// If this is true, every action will be allowed
    pub is_suspended: bool,

    pub get_todos_behaviour: (u32, u32),
    pub get_month_behaviour: (u32, u32),
    pub get_stats_behaviour: (u32, u32),

    pub create_todo_behaviour: (u32, u32),
    pub update_todo_behaviour: (u32, u32),
    pub delete_todo_behaviour: (u32, u32),
    pub clear_completed_behaviour: (u32, u32),
}

impl MockBehaviour {
    pub fn new() -> Self {
        Self::default()
    }

    /// All items will fail at once, for `n_fails` times
    pub fn fail_now(n_fails: u32) -> Self {
        Self {
            is_suspended: false,
            get_todos_behaviour: (0, n_fails),
            get_month_behaviour: (0, n_fails),
            get_stats_behaviour: (0, n_fails),
            create_todo_behaviour: (0, n_fails),
            update_todo_behaviour: (0, n_fails),
            delete_todo_behaviour: (0, n_fails),
            clear_completed_behaviour: (0, n_fails),
        }
    }

    /// Suspend this mock behaviour until you call `resume`
    pub fn suspend(&mut self) {
        self.is_suspended = true;
    }
    /// Make this behaviour active again
    pub fn resume(&mut self) {
        self.is_suspended = false;
    }

    pub fn can_get_todos(&mut self) -> Result<(), Box<dyn Error>> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.get_todos_behaviour, "get_todos")
    }
    pub fn can_get_month(&mut self) -> Result<(), Box<dyn Error>> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.get_month_behaviour, "get_month")
    }
    pub fn can_get_stats(&mut self) -> Result<(), Box<dyn Error>> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.get_stats_behaviour, "get_stats")
    }
    pub fn can_create_todo(&mut self) -> Result<(), Box<dyn Error>> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.create_todo_behaviour, "create_todo")
    }
    pub fn can_update_todo(&mut self) -> Result<(), Box<dyn Error>> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.update_todo_behaviour, "update_todo")
    }
    pub fn can_delete_todo(&mut self) -> Result<(), Box<dyn Error>> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.delete_todo_behaviour, "delete_todo")
    }
    pub fn can_clear_completed(&mut self) -> Result<(), Box<dyn Error>> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.clear_completed_behaviour, "clear_completed")
    }
}


/// Return Ok(()) in case the value is `(1+, _)` or `(_, 0)`, or return Err and decrement otherwise
fn decrement(value: &mut (u32, u32), descr: &str) -> Result<(), Box<dyn Error>> {
    let remaining_successes = value.0;
    let remaining_failures = value.1;

    if remaining_successes > 0 {
        value.0 = value.0 - 1;
        log::debug!("Mock behaviour: allowing a {} ({:?})", descr, value);
        Ok(())
    } else {
        if remaining_failures > 0 {
            value.1 = value.1 - 1;
            log::debug!("Mock behaviour: failing a {} ({:?})", descr, value);
            Err(ApiError::Mocked(format!("Mocked behaviour requires this {} to fail this time. ({:?})", descr, value)).into())
        } else {
            log::debug!("Mock behaviour: allowing a {} ({:?})", descr, value);
            Ok(())
        }
    }
}

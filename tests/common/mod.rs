//! Helpers shared by the integration tests

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use chrono::{NaiveDate, NaiveDateTime};

use fridge_door::traits::{FormField, Interaction};
use fridge_door::{Task, TaskId};

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    date(y, m, d).and_hms_opt(h, min, 0).unwrap()
}

/// A task, as if the server had created it on 2024-03-01
pub fn task(id: u64, title: &str, completed: bool, due_date: Option<NaiveDate>) -> Task {
    Task::new(TaskId::from(id), title.to_string(), String::new(), completed, at(2024, 3, 1, 9, 0), due_date)
}


/// Something a controller asked the user interface to do
#[derive(Clone, Debug, PartialEq)]
pub enum Prompt {
    Confirm(String),
    Focus(FormField),
}

/// An [`Interaction`] that records what it has been asked, and always answers the same to confirmations
pub struct Recorder {
    answer: bool,
    prompts: Rc<RefCell<Vec<Prompt>>>,
}

impl Interaction for Recorder {
    fn confirm(&self, message: &str) -> bool {
        self.prompts.borrow_mut().push(Prompt::Confirm(message.to_string()));
        self.answer
    }

    fn focus(&self, field: FormField) {
        self.prompts.borrow_mut().push(Prompt::Focus(field));
    }
}

/// Returns an interaction to give to a controller, and a handle to what it will record
pub fn recorder(answer: bool) -> (Box<dyn Interaction>, Rc<RefCell<Vec<Prompt>>>) {
    let prompts = Rc::new(RefCell::new(Vec::new()));
    let interaction = Recorder { answer, prompts: Rc::clone(&prompts) };
    (Box::new(interaction), prompts)
}

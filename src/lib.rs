//! This crate provides a client for a TODO list server.
//!
//! It provides an HTTP client in the [`client`] module, that can be used as a stand-alone module.
//! An in-memory server with the very same behaviour is available in the [`memory`] module, for offline use and for tests. \
//! Both implement the [`TodoSource`](traits::TodoSource) trait.
//!
//! On top of a `TodoSource`, this crate provides two views:
//! * a task list, with filters and statistics, in the [`list`] module
//! * a monthly calendar of the tasks that have a due date, in the [`calendar`] module
//!
//! Both views only change their local data once the server has acknowledged a change, and report what happened through a [`Notifier`](notification::Notifier).

pub mod traits;

mod task;
pub use task::{NewTask, Stats, Task, TaskId, TaskUpdate};
pub use task::{parse_optional_date, parse_timestamp, DATE_FORMAT, TIMESTAMP_FORMAT};
pub mod error;

pub mod client;
pub use client::Client;
pub mod memory;
pub use memory::MemorySource;
pub mod mock_behaviour;

pub mod filter;
pub mod store;
pub mod notification;
pub mod dates;
pub mod ops;

pub mod list;
pub use list::ListController;
pub mod calendar;
pub use calendar::CalendarController;
pub mod render;

pub mod config;
pub mod utils;

//! Support for library configuration options

use std::sync::{Arc, Mutex};
use std::time::Duration;

use once_cell::sync::Lazy;

/// The URL of the backend, used by [`Client::from_config`](crate::client::Client::from_config).
/// Feel free to override it when initing this library.
pub static API_BASE_URL: Lazy<Arc<Mutex<String>>> = Lazy::new(|| Arc::new(Mutex::new("http://localhost:8082/".to_string())));

/// How long a notification stays visible.
/// Feel free to override it when initing this library.
pub static NOTIFICATION_DURATION: Lazy<Arc<Mutex<Duration>>> = Lazy::new(|| Arc::new(Mutex::new(Duration::from_secs(3))));

/// How dates that are too far in the past or in the future to be displayed relatively are formatted (`strftime` syntax).
/// Feel free to override it when initing this library.
pub static LOCALE_DATE_FORMAT: Lazy<Arc<Mutex<String>>> = Lazy::new(|| Arc::new(Mutex::new("%Y/%m/%d".to_string())));

/// CSS colors of the due date badges.
/// Feel free to override them when initing this library.
pub static BADGE_COLORS: Lazy<Arc<Mutex<BadgeColors>>> = Lazy::new(|| Arc::new(Mutex::new(BadgeColors::default())));

/// How many task titles a calendar day cell shows, before summarizing the other ones in an overflow counter
pub const MAX_TITLES_PER_DAY: usize = 3;

/// CSS colors (in any syntax [`csscolorparser`] understands) of the due date badges
#[derive(Clone, Debug, PartialEq)]
pub struct BadgeColors {
    pub overdue: String,
    pub today: String,
    pub tomorrow: String,
    pub this_week: String,
    pub later: String,
}

impl Default for BadgeColors {
    fn default() -> Self {
        Self {
            overdue: "#dc3545".to_string(),
            today: "red".to_string(),
            tomorrow: "orange".to_string(),
            this_week: "#28a745".to_string(),
            later: "#6c757d".to_string(),
        }
    }
}


/// Returns the current value of a setting.
///
/// A poisoned lock is not an issue for plain values like these, so its content is used anyway.
pub fn get<T: Clone>(setting: &Lazy<Arc<Mutex<T>>>) -> T {
    match setting.lock() {
        Ok(value) => value.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

/// Overrides the value of a setting
pub fn set<T>(setting: &Lazy<Arc<Mutex<T>>>, new_value: T) {
    match setting.lock() {
        Ok(mut value) => *value = new_value,
        Err(poisoned) => *poisoned.into_inner() = new_value,
    }
}

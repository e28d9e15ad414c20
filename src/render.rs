//! HTML rendering of the views
//!
//! Markup is built with `maud`, which escapes every text that comes from the user (or from the server).

use chrono::{NaiveDate, NaiveDateTime};
use maud::{html, Markup};

use crate::calendar::{DayCell, MonthGrid};
use crate::dates::{format_created, locale_date, DueBadge};
use crate::filter::Filter;
use crate::notification::Notification;
use crate::task::{Stats, Task, DATE_FORMAT};

const WEEKDAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];


/// The whole list view: statistics, filter buttons, then either the tasks or a placeholder
pub fn list_page(visible: &[&Task], filter: Filter, stats: &Stats, now: &NaiveDateTime) -> String {
    let page = html! {
        (stats_bar(stats))
        (filter_buttons(filter))
        @if visible.is_empty() {
            (empty_state(filter))
        } @else {
            ul.todo-list {
                @for task in visible {
                    (task_card(task, now))
                }
            }
        }
    };
    page.into_string()
}

fn stats_bar(stats: &Stats) -> Markup {
    html! {
        div.stats {
            span.stat-total { (stats.total) } " total, "
            span.stat-pending { (stats.pending) } " pending, "
            span.stat-completed { (stats.completed) } " completed"
        }
    }
}

fn filter_buttons(active: Filter) -> Markup {
    html! {
        div.filters {
            @for filter in Filter::ALL.iter() {
                @let class = if *filter == active { "filter-btn active" } else { "filter-btn" };
                button class=(class) data-filter=(filter.as_str()) { (filter.label()) }
            }
        }
    }
}

fn empty_state(filter: Filter) -> Markup {
    let text = match filter {
        Filter::All => "No tasks yet. Add one above!",
        Filter::Pending => "No pending tasks.",
        Filter::Completed => "No completed tasks.",
    };
    html! {
        div.empty-state {
            p { (text) }
        }
    }
}

/// A single task, with its checkbox, title, description, creation date and due date badge
pub fn task_card(task: &Task, now: &NaiveDateTime) -> Markup {
    let class = if task.completed() { "todo-item completed" } else { "todo-item" };
    html! {
        li class=(class) data-id=(task.id().as_u64()) {
            input type="checkbox" class="todo-checkbox" data-action="toggle" checked[task.completed()];
            div.todo-content {
                div.todo-title { (task.title()) }
                @if task.has_description() {
                    div.todo-description { (task.description()) }
                }
                div.todo-meta {
                    span.todo-created { (format_created(task.created_at(), now)) }
                    @if let Some(due_date) = task.due_date() {
                        " "
                        (due_badge(due_date, now.date()))
                    }
                }
            }
            button.edit-btn data-action="edit" { "Edit" }
            button.delete-btn data-action="delete" { "Delete" }
        }
    }
}

/// The colored badge of a due date
pub fn due_badge(due_date: NaiveDate, today: NaiveDate) -> Markup {
    let badge = DueBadge::new(due_date, today);
    let class = format!("due-date {}", badge.urgency().css_class());
    let style = badge.color_hex().map(|color| format!("color: {}", color));
    html! {
        span class=(class) title=(due_date.format(DATE_FORMAT).to_string()) style=[style] { (badge.label()) }
    }
}


/// The whole calendar view: the month grid, then the detail panel of the selected day (if any)
pub fn calendar_page(grid: &MonthGrid<'_>, panel: Option<(NaiveDate, &[Task])>, now: &NaiveDateTime) -> String {
    let page = html! {
        h2.calendar-title { (grid.month().to_string()) }
        div.calendar-grid {
            @for name in WEEKDAY_NAMES.iter() {
                div.calendar-weekday { (name) }
            }
            @for cell in grid.cells() {
                (day_cell(cell))
            }
        }
        @if let Some((date, tasks)) = panel {
            (day_panel(date, tasks, now))
        }
    };
    page.into_string()
}

fn day_cell(cell: &DayCell<'_>) -> Markup {
    let mut classes = String::from("calendar-day");
    if cell.is_today() {
        classes.push_str(" today");
    }
    if cell.is_other_month() {
        classes.push_str(" other-month");
    }
    if cell.is_selected() {
        classes.push_str(" selected");
    }

    html! {
        div class=(classes) data-date=(cell.date().format(DATE_FORMAT).to_string()) {
            div.day-number { (cell.date().format("%-d").to_string()) }
            @for task in cell.shown() {
                @let class = if task.completed() { "day-task completed" } else { "day-task" };
                div class=(class) data-id=(task.id().as_u64()) { (task.title()) }
            }
            @if cell.overflow() > 0 {
                div.day-more { "+" (cell.overflow()) " more" }
            }
        }
    }
}

/// The side panel listing every task of a day, along with the quick-add form
pub fn day_panel(date: NaiveDate, tasks: &[Task], now: &NaiveDateTime) -> Markup {
    html! {
        aside.day-panel data-date=(date.format(DATE_FORMAT).to_string()) {
            h3 { (locale_date(date)) }
            @if tasks.is_empty() {
                div.empty-state {
                    p { "No tasks for this day." }
                }
            } @else {
                ul.todo-list {
                    @for task in tasks {
                        (task_card(task, now))
                    }
                }
            }
            form.quick-add {
                input type="text" name="title" placeholder="New task";
                input type="text" name="description" placeholder="Description";
                button type="submit" { "Add" }
            }
        }
    }
}


/// The notification banner
pub fn notification_banner(notification: &Notification) -> Markup {
    let class = format!("notification {}", notification.kind().css_class());
    html! {
        div class=(class) { (notification.message()) }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{CalendarIndex, Month};
    use crate::notification::Notifier;
    use crate::task::TaskId;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, min, 0).unwrap()
    }

    fn task(id: u64, title: &str, completed: bool, due: Option<NaiveDate>) -> Task {
        Task::new(TaskId::from(id), title.to_string(), String::new(), completed, at(2024, 3, 15, 9, 30), due)
    }

    #[test]
    fn cards_escape_titles() {
        let evil = task(1, "<img src=x onerror=alert(1)>", false, None);
        let html = task_card(&evil, &at(2024, 3, 15, 12, 0)).into_string();
        assert!(html.contains("&lt;img src=x onerror=alert(1)&gt;"));
        assert!(html.contains("<img") == false);
        assert!(html.contains("today 09:30"));
        assert!(html.contains("todo-description") == false);
        assert!(html.contains("<li class=\"todo-item\" data-id=\"1\">"));
    }

    #[test]
    fn quotes_and_ampersands_are_escaped() {
        let quoted = task(2, "say \"hi\" & leave", false, None);
        let html = task_card(&quoted, &at(2024, 3, 15, 12, 0)).into_string();
        assert!(html.contains("say &quot;hi&quot; &amp; leave"));
    }

    #[test]
    fn empty_lists_show_a_placeholder() {
        let stats = Stats::default();
        let html = list_page(&[], Filter::Completed, &stats, &at(2024, 3, 15, 12, 0));
        assert!(html.contains("empty-state"));
        assert!(html.contains("No completed tasks."));
        assert!(html.contains("todo-list") == false);
        assert!(html.contains("filter-btn active\" data-filter=\"completed\""));
    }

    #[test]
    fn due_badges_in_cards() {
        let now = at(2024, 3, 15, 12, 0);
        let overdue = task(1, "late", false, NaiveDate::from_ymd_opt(2024, 3, 13));
        let html = task_card(&overdue, &now).into_string();
        assert!(html.contains("due-overdue"));
        assert!(html.contains("2 days overdue"));
        assert!(html.contains("title=\"2024-03-13\""));

        let done = task(2, "done", true, None);
        let html = task_card(&done, &now).into_string();
        assert!(html.contains("todo-item completed"));
        assert!(html.contains(" checked>"));
        assert!(html.contains("due-date") == false);
    }

    #[test]
    fn calendar_cells() {
        let march = Month::new(2024, 3).unwrap();
        let mut index = CalendarIndex::new(march);
        let day = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        for id in 1..=4 {
            index.upsert(task(id, &format!("t{}", id), false, Some(day)));
        }
        let grid = MonthGrid::new(&index, day, Some(day));
        let html = calendar_page(&grid, Some((day, index.tasks_on(day))), &at(2024, 3, 15, 12, 0));

        assert_eq!(html.matches("class=\"calendar-day").count(), 42);
        assert!(html.contains("calendar-day today selected\" data-date=\"2024-03-15\""));
        assert!(html.contains("calendar-day other-month\" data-date=\"2024-02-25\""));
        assert!(html.contains("+1 more"));
        assert!(html.contains("day-panel"));
        assert!(html.contains("March 2024"));
    }

    #[test]
    fn banners() {
        let mut notifier = Notifier::new();
        notifier.error("Unable to load <March>");
        let html = notification_banner(notifier.last().unwrap()).into_string();
        assert_eq!(html, "<div class=\"notification notification-error\">Unable to load &lt;March&gt;</div>");
    }
}

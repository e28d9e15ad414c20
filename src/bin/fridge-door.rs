//! A command-line front-end to a TODO list server
//!
//! Set `RUST_LOG=debug` to see every request.

use std::error::Error;
use std::sync::Arc;

use chrono::{Duration, Local, NaiveDate};
use clap::{Parser, Subcommand};

use fridge_door::calendar::{CalendarController, Month, MonthGrid};
use fridge_door::filter::Filter;
use fridge_door::notification::{notification_channel, NotificationReceiver, Notifier};
use fridge_door::ops::TaskForm;
use fridge_door::traits::{Interaction, TodoSource};
use fridge_door::utils::{print_task, AutoConfirm, StdinPrompt};
use fridge_door::{config, parse_optional_date, Client, ListController, MemorySource, NewTask, TaskId};

type Source = Arc<dyn TodoSource + Send + Sync>;

#[derive(Parser)]
#[command(name = "fridge-door")]
#[command(about = "Manage the tasks of a TODO list server, as a list or as a monthly calendar")]
struct Cli {
    /// Base URL of the server
    #[arg(long, env = "FRIDGE_DOOR_URL")]
    url: Option<String>,

    /// Work on a throw-away, in-memory list of sample tasks instead of a server
    #[arg(long)]
    offline: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the tasks
    List {
        /// all, pending or completed
        #[arg(short, long, default_value = "all")]
        filter: Filter,
    },
    /// Create a task
    Add {
        title: String,
        #[arg(short, long, default_value = "")]
        description: String,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
    },
    /// Mark a task as completed
    Done { id: TaskId },
    /// Mark a task as pending
    Undo { id: TaskId },
    /// Change a task. Omitted fields are left unchanged
    Edit {
        id: TaskId,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// New due date (YYYY-MM-DD), or an empty string to remove it
        #[arg(long)]
        due: Option<String>,
    },
    /// Delete a task
    Delete {
        id: TaskId,
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Delete every completed task
    ClearCompleted {
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Display a month (the current one by default)
    Calendar {
        year: Option<i32>,
        month: Option<u32>,
        /// Hide the completed tasks
        #[arg(long)]
        hide_completed: bool,
    },
    /// List the tasks due on a day (YYYY-MM-DD)
    Day {
        date: String,
        /// Hide the completed tasks
        #[arg(long)]
        hide_completed: bool,
    },
    /// Show how many tasks are completed
    Stats,
    /// Print the HTML of a view
    Html {
        #[command(subcommand)]
        view: HtmlView,
    },
}

#[derive(Subcommand)]
enum HtmlView {
    List {
        #[arg(short, long, default_value = "all")]
        filter: Filter,
    },
    Calendar {
        year: Option<i32>,
        month: Option<u32>,
        /// Open the detail panel of this day (YYYY-MM-DD)
        #[arg(long)]
        day: Option<String>,
    },
}


#[tokio::main]
async fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        log::error!("{}", err);
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let source: Source = if cli.offline {
        log::info!("Working offline, on sample tasks");
        Arc::new(sample_source().await?)
    } else {
        if let Some(url) = &cli.url {
            config::set(&config::API_BASE_URL, url.clone());
        }
        let client = Client::from_config()?;
        log::debug!("Using server {}", client.url());
        Arc::new(client)
    };

    let (sender, receiver) = notification_channel();
    let notifier = Notifier::new_with_channel(sender);

    let success = match cli.command {
        Commands::List { filter } => {
            let mut list = ListController::new(source, Box::new(AutoConfirm)).with_notifier(notifier);
            let loaded = list.load().await;
            if loaded {
                list.set_filter(filter);
                print_list(&list);
            }
            loaded
        },
        Commands::Add { title, description, due } => {
            let form = TaskForm::new(title)
                .with_description(description)
                .with_due_date_input(due.as_deref().unwrap_or(""))?;
            let mut list = ListController::new(source, Box::new(StdinPrompt)).with_notifier(notifier);
            list.add(form).await
        },
        Commands::Done { id } => set_completion(source, notifier, id, true).await,
        Commands::Undo { id } => set_completion(source, notifier, id, false).await,
        Commands::Edit { id, title, description, due } => {
            let mut list = ListController::new(source, Box::new(StdinPrompt)).with_notifier(notifier);
            if list.load().await == false {
                false
            } else {
                match list.open_edit(id) {
                    None => return Err(format!("There is no task {}", id).into()),
                    Some(mut form) => {
                        if let Some(title) = title {
                            form.title = title;
                        }
                        if let Some(description) = description {
                            form.description = description;
                        }
                        if let Some(due) = due {
                            form.due_date = parse_optional_date(&due)?;
                        }
                        list.save_edit(id, form).await
                    }
                }
            }
        },
        Commands::Delete { id, yes } => {
            let mut list = ListController::new(source, interaction(yes)).with_notifier(notifier);
            list.load().await && list.delete(id).await
        },
        Commands::ClearCompleted { yes } => {
            let mut list = ListController::new(source, interaction(yes)).with_notifier(notifier);
            list.load().await && list.clear_completed().await
        },
        Commands::Calendar { year, month, hide_completed } => {
            let month = requested_month(year, month)?;
            let mut calendar = CalendarController::new(source, Box::new(AutoConfirm)).with_notifier(notifier);
            let shown = if hide_completed {
                calendar.set_show_completed(false).await
            } else {
                true
            };
            let shown = shown && calendar.show_month(month).await;
            if shown {
                print_grid(&calendar.grid());
            }
            shown
        },
        Commands::Day { date, hide_completed } => {
            let date = parse_date(&date)?;
            let tasks = source.get_todos_by_date(date, hide_completed == false).await?;
            println!("{}", fridge_door::dates::locale_date(date));
            if tasks.is_empty() {
                println!("    (no tasks)");
            }
            for task in &tasks {
                print_task(task);
            }
            true
        },
        Commands::Stats => {
            let stats = source.get_stats().await?;
            println!("{} tasks: {} pending, {} completed", stats.total, stats.pending, stats.completed);
            true
        },
        Commands::Html { view: HtmlView::List { filter } } => {
            let mut list = ListController::new(source, Box::new(AutoConfirm)).with_notifier(notifier);
            let loaded = list.load().await;
            if loaded {
                list.set_filter(filter);
                println!("{}", list.render());
            }
            loaded
        },
        Commands::Html { view: HtmlView::Calendar { year, month, day } } => {
            let month = requested_month(year, month)?;
            let mut calendar = CalendarController::new(source, Box::new(AutoConfirm)).with_notifier(notifier);
            let shown = calendar.show_month(month).await;
            if shown {
                if let Some(day) = day {
                    calendar.select_day(parse_date(&day)?);
                }
                println!("{}", calendar.render());
            }
            shown
        },
    };

    print_notification(&receiver);
    if success == false {
        return Err("The operation did not complete".into());
    }
    Ok(())
}

fn interaction(skip_confirmation: bool) -> Box<dyn Interaction> {
    if skip_confirmation {
        Box::new(AutoConfirm)
    } else {
        Box::new(StdinPrompt)
    }
}

async fn set_completion(source: Source, notifier: Notifier, id: TaskId, completed: bool) -> bool {
    let mut list = ListController::new(source, Box::new(AutoConfirm)).with_notifier(notifier);
    if list.load().await == false {
        return false;
    }
    match list.tasks().iter().find(|t| t.id() == id) {
        None => {
            log::warn!("There is no task {}", id);
            false
        },
        Some(task) if task.completed() == completed => {
            println!("{} is already in this state", task);
            true
        },
        Some(_) => list.toggle(id).await,
    }
}

fn requested_month(year: Option<i32>, month: Option<u32>) -> Result<Month, Box<dyn Error>> {
    let today = Local::now().date_naive();
    match (year, month) {
        (None, None) => Ok(Month::of(today)),
        (Some(year), Some(month)) => Month::new(year, month),
        _ => Err("Both a year and a month are expected".into()),
    }
}

fn parse_date(text: &str) -> Result<NaiveDate, Box<dyn Error>> {
    parse_optional_date(text)?
        .ok_or_else(|| "A date is expected".into())
}

fn print_list<S: TodoSource>(list: &ListController<S>) {
    let stats = list.stats();
    println!("{} tasks ({} pending, {} completed), showing {}", stats.total, stats.pending, stats.completed, list.filter().label());
    for task in list.visible_tasks() {
        print_task(task);
    }
}

/// Print the grid, one week per line, then the tasks of every day of the month
fn print_grid(grid: &MonthGrid<'_>) {
    println!("{:^34}", grid.month().to_string());
    println!("  Su   Mo   Tu   We   Th   Fr   Sa");
    for week in grid.weeks() {
        let line: Vec<String> = week.iter()
            .map(|cell| {
                let day = if cell.is_other_month() { String::from("  ") } else { cell.date().format("%e").to_string() };
                let mark = if cell.is_today() { '>' } else { ' ' };
                let count = match cell.task_count() {
                    0 => ' ',
                    1..=9 => std::char::from_digit(cell.task_count() as u32, 10).unwrap_or('+'),
                    _ => '+',
                };
                format!("{}{}{} ", mark, day, count)
            })
            .collect();
        println!("{}", line.join(" "));
    }

    for cell in grid.cells().iter().filter(|c| c.task_count() > 0) {
        println!("{}", cell.date());
        for task in cell.shown() {
            print_task(task);
        }
        if cell.overflow() > 0 {
            println!("    +{} more", cell.overflow());
        }
    }
}

fn print_notification(receiver: &NotificationReceiver) {
    if let Some(notification) = receiver.borrow().as_ref() {
        println!("{}", notification);
    }
}

/// A few tasks around today, for the `--offline` mode
async fn sample_source() -> Result<MemorySource, Box<dyn Error>> {
    let today = Local::now().date_naive();
    let source = MemorySource::new();
    let samples = vec![
        NewTask::new("Buy milk").due_on(today),
        NewTask::new("Call the plumber").with_description("The kitchen sink is leaking").due_on(today + Duration::days(1)),
        NewTask::new("Renew passport").due_on(today + Duration::days(5)),
        NewTask::new("Pay the electricity bill").due_on(today - Duration::days(2)),
        NewTask::new("Read a book"),
    ];
    for sample in &samples {
        source.create_todo(sample).await?;
    }
    let first = source.get_todos().await?
        .into_iter()
        .next()
        .ok_or("The sample tasks have not been created")?;
    source.update_todo(first.id(), &fridge_door::TaskUpdate::completion(true)).await?;
    Ok(source)
}

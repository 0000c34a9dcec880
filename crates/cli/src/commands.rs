//! Command handlers
//!
//! Each command probes and fetches first (the service's mount flow), runs
//! one operation, then prints any notifications the service raised.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use tokio::sync::broadcast;

use td_core::notify::{Notification, Severity};
use td_core::service::{Outcome, TaskService};
use td_core::task::{ListQuery, StatusFilter, Task, TaskDraft, TaskPatch, TaskStatus};

use crate::cli::Command;

pub async fn run(service: &TaskService, command: Command) -> anyhow::Result<()> {
    let mut notifications = service.subscribe();
    let result = dispatch(service, command).await;
    drain_notifications(&mut notifications);
    result
}

async fn dispatch(service: &TaskService, command: Command) -> anyhow::Result<()> {
    match command {
        Command::List { status, search } => list(service, &status, search).await,
        Command::Add {
            title,
            description,
            status,
            due,
        } => add(service, title, description, status, due).await,
        Command::Edit {
            id,
            title,
            description,
            status,
            due,
        } => {
            let mut patch = TaskPatch::new();
            if let Some(title) = title {
                patch = patch.with_title(title);
            }
            if let Some(description) = description {
                patch = patch.with_description(description);
            }
            if let Some(status) = status {
                patch = patch.with_status(TaskStatus::from_str(&status)?);
            }
            if let Some(due) = due {
                patch = patch.with_due_date(parse_due(&due)?);
            }
            edit(service, id, patch).await
        }
        Command::Done { id } => {
            let patch = TaskPatch::new().with_status(TaskStatus::Completed);
            edit(service, id, patch).await
        }
        Command::Rm { id } => rm(service, id).await,
    }
}

async fn list(service: &TaskService, status: &str, search: String) -> anyhow::Result<()> {
    service.init().await?;

    let state = service.state().await;
    let query = ListQuery {
        status: parse_filter(status)?,
        search,
    };
    let visible = query.apply(&state.tasks);

    if visible.is_empty() {
        println!("No tasks found");
        if !query.search.is_empty() || query.status != StatusFilter::All {
            println!("Try changing your search or filter criteria");
        } else {
            println!("Get started by creating your first task");
        }
        return Ok(());
    }

    render_table(&visible);
    Ok(())
}

async fn add(
    service: &TaskService,
    title: String,
    description: Option<String>,
    status: Option<String>,
    due: Option<String>,
) -> anyhow::Result<()> {
    service.init().await?;

    let mut draft = TaskDraft::new(title);
    if let Some(description) = description {
        draft = draft.with_description(description);
    }
    if let Some(status) = status {
        draft = draft.with_status(TaskStatus::from_str(&status)?);
    }
    if let Some(due) = due {
        draft = draft.with_due_date(parse_due(&due)?);
    }

    match service.create(draft).await? {
        Outcome::Remote(task) => println!("Created task #{}", id_text(&task)),
        Outcome::LocalFallback(task) => {
            println!("Created task #{} (saved locally)", id_text(&task))
        }
    }
    Ok(())
}

async fn edit(service: &TaskService, id: i64, patch: TaskPatch) -> anyhow::Result<()> {
    service.init().await?;

    match service.update(id, patch).await? {
        Outcome::Remote(task) => println!("Updated task #{}", id_text(&task)),
        Outcome::LocalFallback(task) => {
            println!("Updated task #{} (saved locally)", id_text(&task))
        }
    }
    Ok(())
}

async fn rm(service: &TaskService, id: i64) -> anyhow::Result<()> {
    service.init().await?;

    match service.delete(id).await? {
        Outcome::Remote(()) => println!("Deleted task #{}", id),
        Outcome::LocalFallback(()) => println!("Deleted task #{} (removed locally)", id),
    }
    Ok(())
}

fn parse_filter(text: &str) -> anyhow::Result<StatusFilter> {
    if text.eq_ignore_ascii_case("all") {
        return Ok(StatusFilter::All);
    }
    Ok(StatusFilter::Only(TaskStatus::from_str(text)?))
}

fn parse_due(text: &str) -> anyhow::Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.with_timezone(&Utc));
    }

    let date = NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map_err(|_| anyhow::anyhow!("Invalid due date '{}': use RFC 3339 or YYYY-MM-DD", text))?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| anyhow::anyhow!("Invalid due date '{}'", text))?;
    Ok(Utc.from_utc_datetime(&midnight))
}

fn id_text(task: &Task) -> String {
    task.id.map_or_else(|| "-".to_string(), |id| id.to_string())
}

fn due_text(task: &Task) -> String {
    task.due_date
        .map_or_else(|| "-".to_string(), |due| due.format("%Y-%m-%d").to_string())
}

fn render_table(tasks: &[Task]) {
    let id_width = tasks
        .iter()
        .map(|t| id_text(t).len())
        .max()
        .unwrap_or(0)
        .max("ID".len());

    println!(
        "{:>width$}  {:<11}  {:<10}  TITLE",
        "ID",
        "STATUS",
        "DUE",
        width = id_width
    );
    for task in tasks {
        println!(
            "{:>width$}  {:<11}  {:<10}  {}",
            id_text(task),
            task.status.to_string(),
            due_text(task),
            task.title,
            width = id_width
        );
        if let Some(description) = &task.description {
            println!("{:>width$}  {}", "", description, width = id_width);
        }
    }
}

fn drain_notifications(rx: &mut broadcast::Receiver<Notification>) {
    while let Ok(notification) = rx.try_recv() {
        match notification.severity {
            Severity::Error => eprintln!("! {}: {}", notification.title, notification.body),
            Severity::Info => println!("  {}: {}", notification.title, notification.body),
        }
    }
}

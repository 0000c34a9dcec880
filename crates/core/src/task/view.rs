//! List view-model
//!
//! Pure transformation of the task list into the displayed, ordered,
//! filtered subset. No state of its own; recomputed from scratch on every
//! render.

use std::cmp::Ordering;

use super::model::{Task, TaskStatus};

/// Status facet of the list filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(TaskStatus),
}

impl StatusFilter {
    fn matches(&self, status: TaskStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => *wanted == status,
        }
    }
}

/// Filter settings for the displayed task list
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub status: StatusFilter,
    pub search: String,
}

impl ListQuery {
    /// Whether the task passes both the status and the search facet.
    ///
    /// The search is a case-insensitive substring match against title and
    /// description; an empty query matches everything.
    pub fn matches(&self, task: &Task) -> bool {
        if !self.status.matches(task.status) {
            return false;
        }
        if self.search.is_empty() {
            return true;
        }

        let needle = self.search.to_lowercase();
        task.title.to_lowercase().contains(&needle)
            || task
                .description
                .as_ref()
                .is_some_and(|d| d.to_lowercase().contains(&needle))
    }

    /// Produce the displayed subset in display order.
    pub fn apply(&self, tasks: &[Task]) -> Vec<Task> {
        let mut visible: Vec<Task> = tasks
            .iter()
            .filter(|task| self.matches(task))
            .cloned()
            .collect();
        visible.sort_by(display_order);
        visible
    }
}

/// Total display order: open statuses first, then ascending due date with
/// dated tasks ahead of undated ones. Ties keep input order (stable sort).
fn display_order(a: &Task, b: &Task) -> Ordering {
    match a.status.priority().cmp(&b.status.priority()) {
        Ordering::Equal => {}
        other => return other,
    }

    match (a.due_date, b.due_date) {
        (Some(a_due), Some(b_due)) => a_due.cmp(&b_due),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskDraft;
    use chrono::{Duration, Utc};

    fn task(title: &str, status: TaskStatus) -> Task {
        let mut task = Task::from_draft(TaskDraft::new(title));
        task.status = status;
        task
    }

    #[test]
    fn test_status_filter() {
        let tasks = vec![
            task("a", TaskStatus::Pending),
            task("b", TaskStatus::Completed),
            task("c", TaskStatus::Pending),
        ];

        let all = ListQuery::default().apply(&tasks);
        assert_eq!(all.len(), 3);

        let query = ListQuery {
            status: StatusFilter::Only(TaskStatus::Pending),
            search: String::new(),
        };
        let pending = query.apply(&tasks);
        assert_eq!(pending.len(), 2);
        assert!(pending.iter().all(|t| t.status == TaskStatus::Pending));
    }

    #[test]
    fn test_search_matches_title_and_description() {
        let mut with_description = task("Buy groceries", TaskStatus::Pending);
        with_description.description = Some("Milk and EGGS".to_string());

        let tasks = vec![with_description, task("Call plumber", TaskStatus::Pending)];

        let query = ListQuery {
            status: StatusFilter::All,
            search: "eggs".to_string(),
        };
        let matched = query.apply(&tasks);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].title, "Buy groceries");

        let query = ListQuery {
            status: StatusFilter::All,
            search: "PLUMBER".to_string(),
        };
        assert_eq!(query.apply(&tasks).len(), 1);
    }

    #[test]
    fn test_empty_search_matches_all() {
        let tasks = vec![
            task("one", TaskStatus::Pending),
            task("two", TaskStatus::Completed),
        ];
        assert_eq!(ListQuery::default().apply(&tasks).len(), 2);
    }

    #[test]
    fn test_sort_by_status_priority() {
        let tasks = vec![
            task("done", TaskStatus::Completed),
            task("doing", TaskStatus::InProgress),
            task("open", TaskStatus::Pending),
        ];

        let sorted = ListQuery::default().apply(&tasks);
        assert_eq!(sorted[0].title, "open");
        assert_eq!(sorted[1].title, "doing");
        assert_eq!(sorted[2].title, "done");
    }

    #[test]
    fn test_overdue_task_sorts_first() {
        let now = Utc::now();
        let mut yesterday = task("overdue", TaskStatus::Pending);
        yesterday.due_date = Some(now - Duration::days(1));
        let mut tomorrow = task("upcoming", TaskStatus::Pending);
        tomorrow.due_date = Some(now + Duration::days(1));

        let sorted = ListQuery::default().apply(&[tomorrow, yesterday]);
        assert_eq!(sorted[0].title, "overdue");
        assert_eq!(sorted[1].title, "upcoming");
    }

    #[test]
    fn test_dated_task_sorts_before_undated() {
        let now = Utc::now();
        let undated = task("someday", TaskStatus::Pending);
        let mut dated = task("deadline", TaskStatus::Pending);
        // A due date far in the future still beats no due date
        dated.due_date = Some(now + Duration::days(365));

        let sorted = ListQuery::default().apply(&[undated, dated]);
        assert_eq!(sorted[0].title, "deadline");
        assert_eq!(sorted[1].title, "someday");
    }

    #[test]
    fn test_undated_tasks_keep_input_order() {
        let tasks = vec![
            task("first", TaskStatus::Pending),
            task("second", TaskStatus::Pending),
            task("third", TaskStatus::Pending),
        ];

        let sorted = ListQuery::default().apply(&tasks);
        let titles: Vec<&str> = sorted.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_status_outranks_due_date() {
        let now = Utc::now();
        let mut done_soon = task("finished early", TaskStatus::Completed);
        done_soon.due_date = Some(now - Duration::days(2));
        let open_later = task("still open", TaskStatus::Pending);

        let sorted = ListQuery::default().apply(&[done_soon, open_later]);
        assert_eq!(sorted[0].title, "still open");
    }
}

//! Application state and the task lifecycle controller.
//!
//! All mutation goes through [`Hearth`]: the in-memory cache is updated
//! first, then written through to the store. A failed write is surfaced as a
//! non-fatal notice and the in-memory change stands; there is no rollback.
//! That is a softer guarantee than transactional, acceptable for a
//! single-user local store.

use chrono::{Local, NaiveDate};

use crate::calendar::MonthView;
use crate::config::HearthConfig;
use crate::core::member::{AVATARS, Member};
use crate::core::task::{Task, TaskStatus, parse_instant};
use crate::error::HearthError;
use crate::intake::ParsedTask;
use crate::notify;
use crate::store::Store;

/// Draft for the new-task editor. `due` holds the raw field text
/// (`YYYY-MM-DDTHH:MM` or a full ISO instant) and is validated on create.
#[derive(Debug, Clone)]
pub struct NewTaskForm {
    pub title: String,
    pub description: String,
    pub due: String,
    pub assigned_to: String,
}

impl NewTaskForm {
    fn for_date(date: NaiveDate) -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            due: format!("{}T12:00", date.format("%Y-%m-%d")),
            assigned_to: String::new(),
        }
    }
}

impl Default for NewTaskForm {
    fn default() -> Self {
        Self::for_date(Local::now().date_naive())
    }
}

pub struct Hearth {
    store: Store,
    pub tasks: Vec<Task>,
    pub members: Vec<Member>,
    pub calendar: MonthView,
    pub form: NewTaskForm,
    /// Whether the new-task editor is open. An intake result that arrives
    /// after the editor closed is discarded rather than resurrecting it.
    pub editor_open: bool,
    /// Gates re-entrant intake submission while a parse is in flight.
    pub parse_in_flight: bool,
    /// Id of the task whose detail view has focus, if any.
    pub active_task: Option<String>,
    /// Last persistence failure, cleared by the next successful write.
    pub notice: Option<String>,
}

impl Hearth {
    pub fn load(config: &HearthConfig) -> Result<Self, HearthError> {
        let store = Store::open(&config.data_directory)?;
        let tasks = store.load_tasks()?;
        let members = store.load_members()?;

        let mut form = NewTaskForm::default();
        if let Some(first) = members.first() {
            form.assigned_to = first.id.clone();
        }

        Ok(Self {
            store,
            tasks,
            members,
            calendar: MonthView::default(),
            form,
            editor_open: false,
            parse_in_flight: false,
            active_task: None,
            notice: None,
        })
    }

    fn persist_tasks(&mut self) {
        match self.store.save_tasks(&self.tasks) {
            Ok(()) => self.notice = None,
            Err(e) => {
                log::error!("failed to save tasks: {}", e);
                self.notice = Some(format!("changes not saved: {}", e));
            }
        }
    }

    fn persist_members(&mut self) {
        match self.store.save_members(&self.members) {
            Ok(()) => self.notice = None,
            Err(e) => {
                log::error!("failed to save members: {}", e);
                self.notice = Some(format!("changes not saved: {}", e));
            }
        }
    }

    /// Create a task from the current draft.
    ///
    /// Validates the draft, appends, persists, then fires the notification
    /// hook post-commit. The hook is best-effort: its failure can neither
    /// roll back nor block the creation.
    pub fn create_task(&mut self) -> Result<Task, HearthError> {
        let title = self.form.title.trim().to_string();
        if title.is_empty() {
            return Err(HearthError::Validation("title must not be empty".into()));
        }
        let due = parse_instant(&self.form.due).ok_or_else(|| {
            HearthError::Validation(format!("\"{}\" is not a valid due date", self.form.due))
        })?;

        let task = Task::new(
            title,
            self.form.description.trim(),
            due,
            self.form.assigned_to.clone(),
        );
        self.tasks.push(task.clone());
        self.persist_tasks();

        self.editor_open = false;
        self.form = NewTaskForm::default();
        if let Some(first) = self.members.first() {
            self.form.assigned_to = first.id.clone();
        }

        if let Some(assignee) = self.member(&task.assigned_to) {
            notify::dispatch(&task, assignee);
        }

        Ok(task)
    }

    /// Flip a task between pending and completed. Returns the new status, or
    /// `None` when no task has that id.
    pub fn toggle_status(&mut self, id: &str) -> Option<TaskStatus> {
        let task = self.tasks.iter_mut().find(|t| t.id == id)?;
        task.toggle();
        let status = task.status;
        self.persist_tasks();
        Some(status)
    }

    /// Remove a task permanently. Returns false when no task has that id.
    pub fn delete_task(&mut self, id: &str) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() == before {
            return false;
        }
        if self.active_task.as_deref() == Some(id) {
            self.active_task = None;
        }
        self.persist_tasks();
        true
    }

    pub fn add_member(
        &mut self,
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Member {
        let avatar = AVATARS[self.members.len() % AVATARS.len()];
        let member = Member::new(name, email, phone, avatar);
        self.members.push(member.clone());
        self.persist_members();
        member
    }

    /// Remove a member. Tasks assigned to them keep their now-dangling
    /// member id and display as unassigned; there is no cascade.
    pub fn remove_member(&mut self, id: &str) -> bool {
        let before = self.members.len();
        self.members.retain(|m| m.id != id);
        if self.members.len() == before {
            return false;
        }
        self.persist_members();
        true
    }

    /// Soft lookup: a missing id is "not found", never an error.
    pub fn member(&self, id: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.id == id)
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn assignee_name(&self, task: &Task) -> &str {
        self.member(&task.assigned_to)
            .map(|m| m.name.as_str())
            .unwrap_or("Unassigned")
    }

    /// Open the new-task editor, optionally prefilled from a clicked day.
    pub fn open_editor(&mut self, date: Option<NaiveDate>) {
        let assigned = if self.form.assigned_to.is_empty() {
            self.members.first().map(|m| m.id.clone()).unwrap_or_default()
        } else {
            self.form.assigned_to.clone()
        };
        self.form = NewTaskForm::for_date(date.unwrap_or_else(|| Local::now().date_naive()));
        self.form.assigned_to = assigned;
        self.editor_open = true;
    }

    pub fn close_editor(&mut self) {
        self.editor_open = false;
    }

    /// Start an intake call. Returns false when one is already in flight,
    /// in which case the caller must not submit another.
    pub fn begin_parse(&mut self) -> bool {
        if self.parse_in_flight {
            return false;
        }
        self.parse_in_flight = true;
        true
    }

    /// Apply the result of an intake call to the draft.
    ///
    /// `None` (the adapter swallowed a failure) leaves the draft exactly as
    /// it was, keeping manual entry as the fallback. A result that lands
    /// after the editor was closed is discarded.
    pub fn finish_parse(&mut self, result: Option<ParsedTask>) {
        self.parse_in_flight = false;
        if !self.editor_open {
            if result.is_some() {
                log::debug!("discarding parse result for a dismissed editor");
            }
            return;
        }
        if let Some(parsed) = result {
            self.form.title = parsed.title;
            self.form.description = parsed.description;
            self.form.due = parsed.due_date;
        }
    }

    pub fn pending_count(&self) -> usize {
        self.tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Pending)
            .count()
    }

    pub fn completed_count(&self) -> usize {
        self.tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Completed)
            .count()
    }

    /// The earliest-due pending task, for the "next up" dashboard slot.
    pub fn next_up(&self) -> Option<&Task> {
        self.tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Pending)
            .min_by_key(|t| t.due_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_temp() -> (tempfile::TempDir, Hearth) {
        let dir = tempfile::tempdir().unwrap();
        let config = HearthConfig {
            data_directory: dir.path().join("hearth"),
            api_key: None,
        };
        let app = Hearth::load(&config).unwrap();
        (dir, app)
    }

    fn draft(app: &mut Hearth, title: &str, due: &str) {
        app.form.title = title.into();
        app.form.due = due.into();
        // Keep creation free of notification side effects in tests.
        app.form.assigned_to = String::new();
    }

    #[test]
    fn load_seeds_members_and_defaults_the_assignee() {
        let (_dir, app) = open_temp();
        assert_eq!(app.members.len(), 2);
        assert_eq!(app.form.assigned_to, "1");
        assert!(app.tasks.is_empty());
    }

    #[test]
    fn create_then_delete_restores_the_collection() {
        let (_dir, mut app) = open_temp();
        draft(&mut app, "Take out trash", "2026-09-14T18:00");
        let keep = app.create_task().unwrap();

        draft(&mut app, "Buy milk", "2026-09-15T17:00");
        let task = app.create_task().unwrap();
        assert_eq!(app.tasks.len(), 2);

        assert!(app.delete_task(&task.id));
        let ids: Vec<&str> = app.tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec![keep.id.as_str()]);
    }

    #[test]
    fn create_rejects_empty_title_and_bad_due() {
        let (_dir, mut app) = open_temp();
        draft(&mut app, "   ", "2026-09-15T17:00");
        assert!(matches!(
            app.create_task(),
            Err(HearthError::Validation(_))
        ));

        draft(&mut app, "Buy milk", "soonish");
        assert!(matches!(
            app.create_task(),
            Err(HearthError::Validation(_))
        ));
        assert!(app.tasks.is_empty());
    }

    #[test]
    fn create_resets_the_draft_and_closes_the_editor() {
        let (_dir, mut app) = open_temp();
        app.open_editor(None);
        draft(&mut app, "Buy milk", "2026-09-15T17:00");
        app.create_task().unwrap();
        assert!(!app.editor_open);
        assert!(app.form.title.is_empty());
        assert_eq!(app.form.assigned_to, "1");
    }

    #[test]
    fn toggle_twice_returns_to_the_original_status() {
        let (_dir, mut app) = open_temp();
        draft(&mut app, "Buy milk", "2026-09-15T17:00");
        let task = app.create_task().unwrap();

        assert_eq!(app.toggle_status(&task.id), Some(TaskStatus::Completed));
        assert_eq!(app.toggle_status(&task.id), Some(TaskStatus::Pending));
        assert_eq!(app.task(&task.id).unwrap().status, TaskStatus::Pending);
    }

    #[test]
    fn toggle_and_delete_of_unknown_ids_are_noops() {
        let (_dir, mut app) = open_temp();
        assert_eq!(app.toggle_status("missing"), None);
        assert!(!app.delete_task("missing"));
    }

    #[test]
    fn deleting_the_active_task_clears_the_focus() {
        let (_dir, mut app) = open_temp();
        draft(&mut app, "Buy milk", "2026-09-15T17:00");
        let task = app.create_task().unwrap();
        app.active_task = Some(task.id.clone());
        app.delete_task(&task.id);
        assert_eq!(app.active_task, None);
    }

    #[test]
    fn removing_a_member_leaves_their_tasks_dangling() {
        let (_dir, mut app) = open_temp();
        app.form.title = "Buy milk".into();
        app.form.due = "2026-09-15T17:00".into();
        let member = app.add_member("Kim", "kim@example.com", "");
        app.form.assigned_to = member.id.clone();
        let task = app.create_task().unwrap();

        assert!(app.remove_member(&member.id));
        let task = app.task(&task.id).unwrap().clone();
        assert_eq!(task.assigned_to, member.id);
        assert_eq!(app.assignee_name(&task), "Unassigned");
    }

    #[test]
    fn new_members_cycle_through_the_avatar_pool() {
        let (_dir, mut app) = open_temp();
        let a = app.add_member("A", "a@example.com", "");
        let b = app.add_member("B", "b@example.com", "");
        assert_eq!(a.avatar, AVATARS[2]);
        assert_eq!(b.avatar, AVATARS[3]);
    }

    #[test]
    fn state_survives_a_reload() {
        let dir = tempfile::tempdir().unwrap();
        let config = HearthConfig {
            data_directory: dir.path().join("hearth"),
            api_key: None,
        };
        let task = {
            let mut app = Hearth::load(&config).unwrap();
            draft(&mut app, "Buy milk", "2026-09-15T17:00");
            app.create_task().unwrap()
        };
        let app = Hearth::load(&config).unwrap();
        assert_eq!(app.tasks.len(), 1);
        assert_eq!(app.tasks[0], task);
        assert_eq!(app.members.len(), 2);
    }

    #[test]
    fn failed_parse_leaves_the_draft_untouched() {
        let (_dir, mut app) = open_temp();
        app.open_editor(None);
        app.form.title = "half-typed".into();
        let before = app.form.clone();

        assert!(app.begin_parse());
        app.finish_parse(None);

        assert!(!app.parse_in_flight);
        assert_eq!(app.form.title, before.title);
        assert_eq!(app.form.description, before.description);
        assert_eq!(app.form.due, before.due);
    }

    #[test]
    fn parse_result_after_closing_the_editor_is_discarded() {
        let (_dir, mut app) = open_temp();
        app.open_editor(None);
        assert!(app.begin_parse());
        assert!(!app.begin_parse());

        app.close_editor();
        let parsed: ParsedTask = serde_json::from_str(
            r#"{"title":"Buy milk","description":"","dueDate":"2026-09-15T17:00:00Z"}"#,
        )
        .unwrap();
        app.finish_parse(Some(parsed));

        assert!(!app.editor_open);
        assert!(app.form.title.is_empty());
    }

    #[test]
    fn successful_parse_fills_the_draft() {
        let (_dir, mut app) = open_temp();
        app.open_editor(None);
        let parsed: ParsedTask = serde_json::from_str(
            r#"{"title":"Buy milk","description":"2 liters","dueDate":"2026-09-15T17:00:00Z"}"#,
        )
        .unwrap();
        app.begin_parse();
        app.finish_parse(Some(parsed));

        assert_eq!(app.form.title, "Buy milk");
        assert_eq!(app.form.description, "2 liters");
        assert_eq!(app.form.due, "2026-09-15T17:00:00Z");
        assert!(app.editor_open);
    }

    #[test]
    fn dashboard_counts_and_next_up() {
        let (_dir, mut app) = open_temp();
        draft(&mut app, "Later", "2026-09-20T12:00");
        app.create_task().unwrap();
        draft(&mut app, "Sooner", "2026-09-10T12:00");
        let sooner = app.create_task().unwrap();
        draft(&mut app, "Done already", "2026-09-01T12:00");
        let done = app.create_task().unwrap();
        app.toggle_status(&done.id);

        assert_eq!(app.pending_count(), 2);
        assert_eq!(app.completed_count(), 1);
        assert_eq!(app.next_up().map(|t| t.id.as_str()), Some(sooner.id.as_str()));
    }
}

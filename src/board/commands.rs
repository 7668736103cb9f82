use crate::api::*;
use crate::error::Result;
use crate::timeline::{DropAction, ItemKind, ItemRef};

/// A user action that needs the backend
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    LoadAll,
    MoveTask { id: TaskId, start_time: String },
    MoveEntry { id: EntryId, start_time: String },
    /// Copy `task` onto today's schedule. The task itself is left as is.
    CommitTask { task: Task, start_time: String },
    CreateTask(NewTask),
    DeleteTask(TaskId),
    DeleteEntry(EntryId),
    SetTaskColor { id: TaskId, color: String },
    SetEntryColor { id: EntryId, color: String },
    SetCompleted { id: EntryId, completed: bool },
    Sync,
}

/// What a command touches, for refusing concurrent commands on the same thing
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PendingKey {
    Item(ItemRef),
    Commit(TaskId),
    NewTask,
    Schedule,
    All,
}

/// Result of a command, applied to the board on the UI thread
#[derive(Debug, Clone, PartialEq)]
pub enum BoardEvent {
    TasksLoaded(Vec<Task>),
    ScheduleLoaded(Vec<ScheduleEntry>),
    Loaded {
        tasks: Vec<Task>,
        schedule: Vec<ScheduleEntry>,
    },
    Synced(Vec<ScheduleEntry>),
    Failed { message: String },
}

impl Command {
    /// Command for a drop on a timeline. Committing a task that is no longer
    /// on the board yields nothing.
    pub fn from_drop(action: DropAction, tasks: &[Task]) -> Option<Self> {
        match action {
            DropAction::MoveTask { id, start_time } => Some(Self::MoveTask { id, start_time }),
            DropAction::MoveEntry { id, start_time } => Some(Self::MoveEntry { id, start_time }),
            DropAction::CommitTask { task_id, start_time } => {
                let task = tasks.iter().find(|t| t.id == task_id)?.clone();
                Some(Self::CommitTask { task, start_time })
            }
            DropAction::None => None,
        }
    }

    /// Delete command for a block's item
    pub fn delete(item: ItemRef) -> Self {
        match item.kind {
            ItemKind::Task => Self::DeleteTask(item.id),
            ItemKind::Schedule => Self::DeleteEntry(item.id),
        }
    }

    pub fn set_color(item: ItemRef, color: impl Into<String>) -> Self {
        let color = color.into();
        match item.kind {
            ItemKind::Task => Self::SetTaskColor { id: item.id, color },
            ItemKind::Schedule => Self::SetEntryColor { id: item.id, color },
        }
    }

    pub fn key(&self) -> PendingKey {
        match self {
            Self::LoadAll => PendingKey::All,
            Self::MoveTask { id, .. } | Self::DeleteTask(id) | Self::SetTaskColor { id, .. } => {
                PendingKey::Item(ItemRef::task(*id))
            }
            Self::MoveEntry { id, .. }
            | Self::DeleteEntry(id)
            | Self::SetEntryColor { id, .. }
            | Self::SetCompleted { id, .. } => PendingKey::Item(ItemRef::schedule(*id)),
            Self::CommitTask { task, .. } => PendingKey::Commit(task.id),
            Self::CreateTask(_) => PendingKey::NewTask,
            Self::Sync => PendingKey::Schedule,
        }
    }

    fn changes_tasks(&self) -> bool {
        matches!(
            self,
            Self::MoveTask { .. } | Self::CreateTask(_) | Self::DeleteTask(_) | Self::SetTaskColor { .. }
        )
    }

    fn failure_message(&self) -> &'static str {
        match self {
            Self::LoadAll => "Failed to load data. Please refresh the page.",
            Self::MoveTask { .. } | Self::MoveEntry { .. } | Self::CommitTask { .. } => {
                "Failed to move item. Please try again."
            }
            Self::CreateTask(_) => "Failed to create task. Please try again.",
            Self::DeleteTask(_) | Self::DeleteEntry(_) => "Failed to delete item. Please try again.",
            Self::SetTaskColor { .. } | Self::SetEntryColor { .. } => {
                "Failed to update color. Please try again."
            }
            Self::SetCompleted { .. } => "Failed to update completion status. Please try again.",
            Self::Sync => "Failed to sync schedule. Please try again.",
        }
    }
}

/// Run `command` against the backend and reload whatever it changed
pub async fn execute(api: &dyn BoardApi, command: Command) -> BoardEvent {
    match run(api, &command).await {
        Ok(event) => event,
        Err(e) => {
            tracing::error!(?command, error = %e, "Command failed");
            BoardEvent::Failed {
                message: command.failure_message().to_string(),
            }
        }
    }
}

async fn run(api: &dyn BoardApi, command: &Command) -> Result<BoardEvent> {
    match command {
        Command::LoadAll => {
            let (tasks, schedule) = tokio::try_join!(api.list_tasks(), api.list_schedule())?;
            tracing::info!(tasks = tasks.len(), entries = schedule.len(), "Board loaded");
            return Ok(BoardEvent::Loaded { tasks, schedule });
        }
        Command::Sync => {
            let schedule = api.sync_schedule().await?;
            tracing::info!(entries = schedule.len(), "Schedule synced");
            return Ok(BoardEvent::Synced(schedule));
        }

        Command::MoveTask { id, start_time } => {
            api.update_task(*id, &TaskUpdate::start_time(start_time.as_str())).await?;
        }
        Command::CreateTask(task) => {
            api.create_task(task).await?;
        }
        Command::DeleteTask(id) => {
            api.delete_task(*id).await?;
        }
        Command::SetTaskColor { id, color } => {
            api.update_task(*id, &TaskUpdate::color(color.as_str())).await?;
        }

        Command::MoveEntry { id, start_time } => {
            api.update_schedule_entry(*id, &EntryUpdate::start_time(start_time.as_str())).await?;
        }
        Command::CommitTask { task, start_time } => {
            api.create_schedule_entry(&NewScheduleEntry::from_task(task, start_time)).await?;
        }
        Command::DeleteEntry(id) => {
            api.delete_schedule_entry(*id).await?;
        }
        Command::SetEntryColor { id, color } => {
            api.update_schedule_entry(*id, &EntryUpdate::color(color.as_str())).await?;
        }
        Command::SetCompleted { id, completed } => {
            api.update_schedule_entry(*id, &EntryUpdate::completed(*completed)).await?;
        }
    }

    if command.changes_tasks() {
        Ok(BoardEvent::TasksLoaded(api.list_tasks().await?))
    } else {
        Ok(BoardEvent::ScheduleLoaded(api.list_schedule().await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::testing::{task, RecordingApi, Call};

    #[tokio::test]
    async fn committing_a_task_creates_one_entry_and_leaves_the_task() {
        let api = RecordingApi::with_tasks(vec![task(7, 30)]);
        let command = Command::from_drop(
            DropAction::CommitTask { task_id: 7, start_time: "14:05".to_string() },
            &api.tasks(),
        )
        .unwrap();

        let event = execute(&api, command).await;

        let created = api.created_entries();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].task_id, Some(7));
        assert_eq!(created[0].start_time, "14:05");
        assert_eq!(created[0].duration, 30);
        assert!(api.calls().iter().all(|c| !matches!(c, Call::UpdateTask(..))));
        match event {
            BoardEvent::ScheduleLoaded(schedule) => {
                assert_eq!(schedule.len(), 1);
                assert_eq!(schedule[0].start_time.as_deref(), Some("14:05"));
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn committing_a_missing_task_is_a_no_op() {
        let action = DropAction::CommitTask { task_id: 99, start_time: "14:05".to_string() };
        assert_eq!(Command::from_drop(action, &[task(7, 30)]), None);
        assert_eq!(Command::from_drop(DropAction::None, &[task(7, 30)]), None);
    }

    #[tokio::test]
    async fn moving_a_task_reloads_tasks() {
        let api = RecordingApi::with_tasks(vec![task(1, 60)]);
        let event = execute(&api, Command::MoveTask { id: 1, start_time: "20:15".to_string() }).await;

        assert_eq!(
            api.calls(),
            vec![
                Call::UpdateTask(1, TaskUpdate::start_time("20:15")),
                Call::ListTasks,
            ]
        );
        match event {
            BoardEvent::TasksLoaded(tasks) => assert_eq!(tasks[0].start_time.as_deref(), Some("20:15")),
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[tokio::test]
    async fn load_all_fetches_both_lists() {
        let api = RecordingApi::with_tasks(vec![task(1, 60), task(2, 30)]);
        match execute(&api, Command::LoadAll).await {
            BoardEvent::Loaded { tasks, schedule } => {
                assert_eq!(tasks.len(), 2);
                assert!(schedule.is_empty());
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[tokio::test]
    async fn failures_carry_the_alert_text() {
        let api = RecordingApi::failing();

        let cases = [
            (Command::LoadAll, "Failed to load data. Please refresh the page."),
            (Command::MoveEntry { id: 1, start_time: "10:00".to_string() }, "Failed to move item. Please try again."),
            (Command::CreateTask(NewTask { name: "x".into(), duration: 30, color: "#FF6B6B".into() }), "Failed to create task. Please try again."),
            (Command::DeleteEntry(1), "Failed to delete item. Please try again."),
            (Command::SetTaskColor { id: 1, color: "#FF6B6B".into() }, "Failed to update color. Please try again."),
            (Command::SetCompleted { id: 1, completed: true }, "Failed to update completion status. Please try again."),
            (Command::Sync, "Failed to sync schedule. Please try again."),
        ];

        for (command, message) in cases {
            assert_eq!(
                execute(&api, command).await,
                BoardEvent::Failed { message: message.to_string() }
            );
        }
    }

    #[test]
    fn keys_identify_the_touched_item() {
        assert_eq!(Command::DeleteTask(3).key(), PendingKey::Item(ItemRef::task(3)));
        assert_eq!(
            Command::SetCompleted { id: 3, completed: true }.key(),
            PendingKey::Item(ItemRef::schedule(3))
        );
        assert_eq!(Command::delete(ItemRef::schedule(4)), Command::DeleteEntry(4));
        assert_eq!(
            Command::set_color(ItemRef::task(5), "#2C3E50"),
            Command::SetTaskColor { id: 5, color: "#2C3E50".to_string() }
        );
    }
}

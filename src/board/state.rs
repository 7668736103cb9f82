use std::collections::HashSet;

use chrono::NaiveDate;

use super::commands::{BoardEvent, Command, PendingKey};
use super::form::NewTaskForm;
use crate::api::{ScheduleEntry, Task};
use crate::sunset::{LocationStatus, SunsetContext};
use crate::timeline::{self, Block, DragController, TimeMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Info,
    Error,
}

/// Single modal message, replaced by the next one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub kind: AlertKind,
    pub message: String,
}

impl Alert {
    pub fn info(message: impl Into<String>) -> Self {
        Self { kind: AlertKind::Info, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { kind: AlertKind::Error, message: message.into() }
    }
}

pub struct BoardState {
    pub tasks: Vec<Task>,
    pub schedule: Vec<ScheduleEntry>,
    pub sunset: SunsetContext,
    /// `None` until the sunset lookup finishes
    pub location: Option<LocationStatus>,
    pub drag: DragController,
    /// Kept populated until the backend accepts the task
    pub form: NewTaskForm,
    pending: HashSet<PendingKey>,
    pub alert: Option<Alert>,
}

impl BoardState {
    pub fn new(today: NaiveDate, grid_minutes: u32) -> Self {
        Self {
            tasks: Vec::new(),
            schedule: Vec::new(),
            sunset: SunsetContext::defaults(today),
            location: None,
            drag: DragController::new(grid_minutes),
            form: NewTaskForm::default(),
            pending: HashSet::new(),
            alert: None,
        }
    }

    pub fn time_map(&self) -> TimeMap {
        self.sunset.time_map()
    }

    pub fn task_blocks(&self) -> Vec<Block> {
        timeline::render_tasks(&self.tasks, &self.time_map(), &self.schedule)
    }

    pub fn schedule_blocks(&self) -> Vec<Block> {
        timeline::render_schedule(&self.schedule, &self.time_map())
    }

    pub fn set_sunset(&mut self, context: SunsetContext, status: LocationStatus) {
        self.sunset = context;
        self.location = Some(status);
    }

    /// Mark `command` as in flight. Returns false, leaving state untouched,
    /// when a command for the same item is already pending.
    pub fn begin(&mut self, command: &Command) -> bool {
        let key = command.key();
        if !self.pending.insert(key.clone()) {
            tracing::debug!(?key, "Command already in flight");
            return false;
        }
        true
    }

    pub fn is_pending(&self, key: &PendingKey) -> bool {
        self.pending.contains(key)
    }

    pub fn is_busy(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Release `key` and apply the outcome of its command
    pub fn apply(&mut self, key: &PendingKey, event: BoardEvent) {
        self.pending.remove(key);
        if *key == PendingKey::NewTask && !matches!(event, BoardEvent::Failed { .. }) {
            self.form.clear();
        }
        match event {
            BoardEvent::TasksLoaded(tasks) => self.tasks = tasks,
            BoardEvent::ScheduleLoaded(schedule) => self.schedule = schedule,
            BoardEvent::Loaded { tasks, schedule } => {
                self.tasks = tasks;
                self.schedule = schedule;
            }
            BoardEvent::Synced(schedule) => {
                self.schedule = schedule;
                self.alert = Some(Alert::info("Schedule synced successfully!"));
            }
            BoardEvent::Failed { message } => self.alert = Some(Alert::error(message)),
        }
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }
}

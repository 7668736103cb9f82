//! In-memory backend that records every request, for command tests.

use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::api::*;
use crate::error::{BoardError, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ListTasks,
    CreateTask(NewTask),
    UpdateTask(TaskId, TaskUpdate),
    DeleteTask(TaskId),
    ListSchedule,
    CreateEntry(NewScheduleEntry),
    UpdateEntry(EntryId, EntryUpdate),
    DeleteEntry(EntryId),
    Sync,
    Sunset,
}

#[derive(Default)]
pub struct RecordingApi {
    fail: bool,
    calls: Mutex<Vec<Call>>,
    tasks: Mutex<Vec<Task>>,
    schedule: Mutex<Vec<ScheduleEntry>>,
}

pub fn task(id: TaskId, duration: u32) -> Task {
    Task {
        id,
        name: format!("task {}", id),
        duration,
        color: "#FF6B6B".to_string(),
        start_time: None,
        order_index: id as i32,
        template_id: Some(1),
        created_at: None,
        updated_at: None,
    }
}

impl RecordingApi {
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks: Mutex::new(tasks),
            ..Self::default()
        }
    }

    /// Every request answers 500
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.tasks.lock().unwrap().clone()
    }

    pub fn created_entries(&self) -> Vec<NewScheduleEntry> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::CreateEntry(entry) => Some(entry),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        if self.fail {
            return Err(BoardError::Http {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                body: "boom".to_string(),
            });
        }
        Ok(())
    }

    fn next_entry_id(&self) -> EntryId {
        self.schedule.lock().unwrap().iter().map(|e| e.id).max().unwrap_or(0) + 1
    }
}

#[async_trait]
impl BoardApi for RecordingApi {
    async fn list_tasks(&self) -> Result<Vec<Task>> {
        self.record(Call::ListTasks)?;
        Ok(self.tasks())
    }

    async fn create_task(&self, task: &NewTask) -> Result<Task> {
        self.record(Call::CreateTask(task.clone()))?;
        let mut tasks = self.tasks.lock().unwrap();
        let created = Task {
            id: tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1,
            name: task.name.clone(),
            duration: task.duration,
            color: task.color.clone(),
            start_time: None,
            order_index: tasks.len() as i32,
            template_id: Some(1),
            created_at: None,
            updated_at: None,
        };
        tasks.push(created.clone());
        Ok(created)
    }

    async fn update_task(&self, id: TaskId, update: &TaskUpdate) -> Result<Task> {
        self.record(Call::UpdateTask(id, update.clone()))?;
        let mut tasks = self.tasks.lock().unwrap();
        let task = tasks.iter_mut().find(|t| t.id == id).ok_or(BoardError::Http {
            status: StatusCode::NOT_FOUND,
            body: String::new(),
        })?;
        if let Some(start_time) = &update.start_time {
            task.start_time = Some(start_time.clone());
        }
        if let Some(color) = &update.color {
            task.color = color.clone();
        }
        Ok(task.clone())
    }

    async fn delete_task(&self, id: TaskId) -> Result<()> {
        self.record(Call::DeleteTask(id))?;
        self.tasks.lock().unwrap().retain(|t| t.id != id);
        Ok(())
    }

    async fn list_schedule(&self) -> Result<Vec<ScheduleEntry>> {
        self.record(Call::ListSchedule)?;
        Ok(self.schedule.lock().unwrap().clone())
    }

    async fn create_schedule_entry(&self, entry: &NewScheduleEntry) -> Result<ScheduleEntry> {
        self.record(Call::CreateEntry(entry.clone()))?;
        let created = ScheduleEntry {
            id: self.next_entry_id(),
            task_id: entry.task_id,
            name: entry.name.clone(),
            duration: entry.duration,
            color: entry.color.clone(),
            start_time: Some(entry.start_time.clone()),
            completed: false,
            date: None,
            created_at: None,
            updated_at: None,
        };
        self.schedule.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update_schedule_entry(&self, id: EntryId, update: &EntryUpdate) -> Result<ScheduleEntry> {
        self.record(Call::UpdateEntry(id, update.clone()))?;
        let mut schedule = self.schedule.lock().unwrap();
        let entry = schedule.iter_mut().find(|e| e.id == id).ok_or(BoardError::Http {
            status: StatusCode::NOT_FOUND,
            body: String::new(),
        })?;
        if let Some(start_time) = &update.start_time {
            entry.start_time = Some(start_time.clone());
        }
        if let Some(color) = &update.color {
            entry.color = color.clone();
        }
        if let Some(completed) = update.completed {
            entry.completed = completed;
        }
        Ok(entry.clone())
    }

    async fn delete_schedule_entry(&self, id: EntryId) -> Result<()> {
        self.record(Call::DeleteEntry(id))?;
        self.schedule.lock().unwrap().retain(|e| e.id != id);
        Ok(())
    }

    async fn sync_schedule(&self) -> Result<Vec<ScheduleEntry>> {
        self.record(Call::Sync)?;
        let synced: Vec<ScheduleEntry> = self
            .tasks()
            .iter()
            .enumerate()
            .map(|(i, task)| ScheduleEntry {
                id: i as EntryId + 1,
                task_id: Some(task.id),
                name: task.name.clone(),
                duration: task.duration,
                color: task.color.clone(),
                start_time: Some(task.start_time.clone().unwrap_or_else(|| "09:00".to_string())),
                completed: false,
                date: None,
                created_at: None,
                updated_at: None,
            })
            .collect();
        *self.schedule.lock().unwrap() = synced.clone();
        Ok(synced)
    }

    async fn sunset(&self, _latitude: f64, _longitude: f64) -> Result<SunsetResponse> {
        self.record(Call::Sunset)?;
        Err(BoardError::Http {
            status: StatusCode::SERVICE_UNAVAILABLE,
            body: String::new(),
        })
    }
}

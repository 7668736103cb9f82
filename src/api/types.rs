use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub type TaskId = i64;
pub type EntryId = i64;

/// Planned activity on the optimal timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    pub duration: u32,
    pub color: String,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub order_index: i32,
    #[serde(default)]
    pub template_id: Option<i32>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Actual occurrence on today's timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub id: EntryId,
    #[serde(default)]
    pub task_id: Option<TaskId>,
    pub name: String,
    pub duration: u32,
    pub color: String,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Body for `POST /tasks`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTask {
    pub name: String,
    pub duration: u32,
    pub color: String,
}

/// Body for `POST /schedule`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewScheduleEntry {
    pub task_id: Option<TaskId>,
    pub name: String,
    pub duration: u32,
    pub color: String,
    pub start_time: String,
}

impl NewScheduleEntry {
    /// Copy of a planned task placed on today's timeline
    pub fn from_task(task: &Task, start_time: &str) -> Self {
        Self {
            task_id: Some(task.id),
            name: task.name.clone(),
            duration: task.duration,
            color: task.color.clone(),
            start_time: start_time.to_string(),
        }
    }
}

/// Partial body for `PUT /tasks/{id}`; absent fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TaskUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl TaskUpdate {
    pub fn start_time(time: impl Into<String>) -> Self {
        Self { start_time: Some(time.into()), ..Self::default() }
    }

    pub fn color(color: impl Into<String>) -> Self {
        Self { color: Some(color.into()), ..Self::default() }
    }
}

/// Partial body for `PUT /schedule/{id}`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EntryUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl EntryUpdate {
    pub fn start_time(time: impl Into<String>) -> Self {
        Self { start_time: Some(time.into()), ..Self::default() }
    }

    pub fn color(color: impl Into<String>) -> Self {
        Self { color: Some(color.into()), ..Self::default() }
    }

    pub fn completed(completed: bool) -> Self {
        Self { completed: Some(completed), ..Self::default() }
    }
}

/// Response of `GET /sunset`. Timestamps are ISO 8601 with offset; prayer
/// times are local "HH:MM" strings and may be missing when the prayer-time
/// service was unavailable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SunsetResponse {
    pub sunset: String,
    pub sunrise: String,
    #[serde(default)]
    pub sunset_time: Option<String>,
    #[serde(default)]
    pub sunrise_time: Option<String>,
    #[serde(default)]
    pub dhuhr_time: Option<String>,
    #[serde(default)]
    pub asr_time: Option<String>,
    #[serde(default)]
    pub isha_time: Option<String>,
}

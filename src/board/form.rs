use std::num::IntErrorKind;

use crate::api::NewTask;
use crate::error::ValidationError;
use crate::timeline::palette::DEFAULT_COLOR;

/// Contents of the new-task form
#[derive(Debug, Clone, PartialEq)]
pub struct NewTaskForm {
    pub name: String,
    pub duration: String,
    pub color: String,
}

impl Default for NewTaskForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            duration: String::new(),
            color: DEFAULT_COLOR.to_string(),
        }
    }
}

impl NewTaskForm {
    /// Task to create, or why the form can't be submitted yet.
    /// A blank, non-numeric or zero duration counts as missing.
    pub fn validate(&self, min_duration: u32, max_duration: u32) -> Result<NewTask, ValidationError> {
        let name = self.name.trim();
        let duration = match self.duration.trim().parse::<i64>() {
            Ok(minutes) => minutes,
            Err(e) => match e.kind() {
                IntErrorKind::PosOverflow => i64::MAX,
                IntErrorKind::NegOverflow => i64::MIN,
                _ => 0,
            },
        };
        if name.is_empty() || duration == 0 {
            return Err(ValidationError::MissingFields);
        }
        if duration < i64::from(min_duration) {
            return Err(ValidationError::TooShort { min: min_duration });
        }
        if duration > i64::from(max_duration) {
            return Err(ValidationError::TooLong { max: max_duration });
        }
        Ok(NewTask {
            name: name.to_string(),
            // Bounded by max_duration above
            duration: duration as u32,
            color: self.color.clone(),
        })
    }

    /// Back to an empty form after a successful submit
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

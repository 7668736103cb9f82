//! Board controller: the loaded tasks and schedule, and the commands that
//! change them through the backend.

mod commands;
mod form;
mod state;
#[cfg(test)]
mod testing;

pub use commands::{execute, BoardEvent, Command, PendingKey};
pub use form::NewTaskForm;
pub use state::{Alert, AlertKind, BoardState};

//! Shared leaf types for the dialog.
//!
//! Contains types with no dialog dependencies (tasks, text helpers, widgets).
//!
//! IMPORTANT: This module must NOT import `UiEvent` or dialog state
//! to avoid circular dependencies.

pub mod render_utils;
pub mod task;
pub mod text;

pub use task::{TaskCompleted, TaskId, TaskKind, TaskSeq, TaskState, Tasks};

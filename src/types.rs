//! Payload types shared by the studio endpoints.

use serde_json::{Map, Value};

/// An open-ended JSON record as returned by the studio.
///
/// No schema is enforced; callers pick out the fields they need.
pub type PsData = Map<String, Value>;

/// Lifecycle stages of a background task, as numeric codes on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskState {
    Queued,
    Running,
}

impl TaskState {
    /// Stages selected when listing running tasks.
    pub const ACTIVE: [TaskState; 2] = [TaskState::Queued, TaskState::Running];

    pub fn code(self) -> u16 {
        match self {
            TaskState::Queued => 10,
            TaskState::Running => 20,
        }
    }

    /// Render a set of stages as the comma-separated `n_taskstate_in` filter.
    pub fn filter(states: &[TaskState]) -> String {
        states
            .iter()
            .map(|s| s.code().to_string())
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Returns true when a value is present: not absent, not null, and not an
/// empty string, array or object.
pub fn not_nil_empty(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(a)) => !a.is_empty(),
        Some(Value::Object(o)) => !o.is_empty(),
        Some(_) => true,
    }
}

/// Short name of a JSON value's kind, used in shape errors.
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

//! Task classifier and validator: `(tool, payload)` to [`Task`].
//!
//! Pure functions only. A request that fails here never reaches a provider.

use super::sanitize::{sanitize, screen};
use super::task::{AspectRatio, Creativity, ImageTask, QualityTier, Task, TaskInput, TaskKind, Tone};
use serde_json::{Map, Value};
use thiserror::Error;

pub const MAX_TEXT_CHARS: usize = 10_000;
pub const MAX_TOPIC_CHARS: usize = 500;
pub const MAX_INSTRUCTION_CHARS: usize = 500;
pub const MAX_MESSAGE_CHARS: usize = 2_000;
pub const MAX_IMAGE_PROMPT_CHARS: usize = 1_000;
pub const MAX_STYLE_CHARS: usize = 500;
pub const MAX_GAMEDEV_PROMPT_CHARS: usize = 2_000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("unknown tool '{tool}'")]
    UnknownTool { tool: String },
    #[error("request body must be a JSON object")]
    NotAnObject,
    #[error("field '{field}' is required")]
    Missing { field: &'static str },
    #[error("field '{field}' must be a {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },
    #[error("field '{field}' is empty")]
    Empty { field: &'static str },
    #[error("field '{field}' has unsupported value '{value}'")]
    InvalidChoice { field: &'static str, value: String },
    #[error("field '{field}' was rejected: {reason}")]
    Suspicious {
        field: &'static str,
        reason: &'static str,
    },
    #[error("task '{task}' cannot be streamed")]
    NotStreamable { task: &'static str },
}

impl ValidationError {
    /// Name of the offending field, when the error concerns one.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ValidationError::UnknownTool { .. }
            | ValidationError::NotAnObject
            | ValidationError::NotStreamable { .. } => None,
            ValidationError::Missing { field }
            | ValidationError::WrongType { field, .. }
            | ValidationError::Empty { field }
            | ValidationError::InvalidChoice { field, .. }
            | ValidationError::Suspicious { field, .. } => Some(field),
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            ValidationError::UnknownTool { tool } => format!("Unknown tool '{tool}'."),
            ValidationError::NotAnObject => "Invalid request data.".to_string(),
            ValidationError::Missing { field } | ValidationError::Empty { field } => {
                format!("Please provide a non-empty '{field}'.")
            }
            ValidationError::WrongType { field, expected } => {
                format!("Field '{field}' must be a {expected}.")
            }
            ValidationError::InvalidChoice { field, value } => {
                format!("'{value}' is not a supported value for '{field}'.")
            }
            ValidationError::Suspicious { field, .. } => format!(
                "Your {field} contains patterns that may compromise security. Please rephrase your request."
            ),
            ValidationError::NotStreamable { task } => {
                format!("Streaming is not available for '{task}'.")
            }
        }
    }
}

impl Task {
    /// Classify and validate a caller request.
    pub fn from_tool(tool: &str, payload: &Value) -> Result<Self, ValidationError> {
        classify(tool, payload)
    }
}

pub fn classify(tool: &str, payload: &Value) -> Result<Task, ValidationError> {
    let kind = TaskKind::from_tool(tool).ok_or_else(|| ValidationError::UnknownTool {
        tool: tool.to_string(),
    })?;
    let fields = Fields::new(payload)?;

    let input = match kind {
        TaskKind::Summarize => TaskInput::Summarize {
            text: fields.required_text("text", MAX_TEXT_CHARS)?,
        },
        TaskKind::GenerateIdeas => TaskInput::GenerateIdeas {
            topic: fields.required_text("topic", MAX_TOPIC_CHARS)?,
        },
        TaskKind::RefineContent => TaskInput::RefineContent {
            text: fields.required_text("text", MAX_TEXT_CHARS)?,
            instruction: fields.optional_text("instruction", MAX_INSTRUCTION_CHARS)?,
        },
        TaskKind::Chat => TaskInput::Chat {
            message: fields.required_text("message", MAX_MESSAGE_CHARS)?,
            tone: fields
                .optional_choice("tone", Tone::parse)?
                .unwrap_or_default(),
            creativity: fields
                .optional_number("creativity")?
                .map(Creativity::clamped)
                .unwrap_or_default(),
        },
        TaskKind::GenerateImage => TaskInput::GenerateImage(ImageTask {
            prompt: fields.required_text("prompt", MAX_IMAGE_PROMPT_CHARS)?,
            style: fields.optional_text("style", MAX_STYLE_CHARS)?,
            aspect_ratio: fields
                .optional_choice("aspect_ratio", AspectRatio::parse)?
                .unwrap_or_default(),
            quality: fields
                .optional_choice("quality", QualityTier::parse)?
                .unwrap_or_default(),
        }),
        TaskKind::GamedevStory => TaskInput::GamedevStory {
            prompt: fields.required_text("prompt", MAX_GAMEDEV_PROMPT_CHARS)?,
        },
        TaskKind::GamedevDialogue => TaskInput::GamedevDialogue {
            prompt: fields.required_text("prompt", MAX_GAMEDEV_PROMPT_CHARS)?,
        },
        TaskKind::GamedevMechanics => TaskInput::GamedevMechanics {
            prompt: fields.required_text("prompt", MAX_GAMEDEV_PROMPT_CHARS)?,
        },
        TaskKind::GamedevCode => TaskInput::GamedevCode {
            prompt: fields.required_text("prompt", MAX_GAMEDEV_PROMPT_CHARS)?,
        },
        TaskKind::GamedevExplain => TaskInput::GamedevExplain {
            prompt: fields.required_text("prompt", MAX_GAMEDEV_PROMPT_CHARS)?,
        },
    };

    Ok(Task {
        input,
        provider_hint: fields.provider_hint()?,
    })
}

struct Fields<'a> {
    map: &'a Map<String, Value>,
}

impl<'a> Fields<'a> {
    fn new(payload: &'a Value) -> Result<Self, ValidationError> {
        payload
            .as_object()
            .map(|map| Self { map })
            .ok_or(ValidationError::NotAnObject)
    }

    /// Null is treated the same as an absent key.
    fn get(&self, field: &str) -> Option<&'a Value> {
        self.map.get(field).filter(|value| !value.is_null())
    }

    fn string(&self, field: &'static str) -> Result<Option<&'a str>, ValidationError> {
        match self.get(field) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(_) => Err(ValidationError::WrongType {
                field,
                expected: "string",
            }),
        }
    }

    fn required_text(&self, field: &'static str, max: usize) -> Result<String, ValidationError> {
        let raw = self
            .string(field)?
            .ok_or(ValidationError::Missing { field })?;
        let cleaned = sanitize(raw, max);
        if cleaned.is_empty() {
            return Err(ValidationError::Empty { field });
        }
        screen(&cleaned).map_err(|reason| ValidationError::Suspicious { field, reason })?;
        Ok(cleaned)
    }

    fn optional_text(
        &self,
        field: &'static str,
        max: usize,
    ) -> Result<Option<String>, ValidationError> {
        let Some(raw) = self.string(field)? else {
            return Ok(None);
        };
        let cleaned = sanitize(raw, max);
        if cleaned.is_empty() {
            return Ok(None);
        }
        screen(&cleaned).map_err(|reason| ValidationError::Suspicious { field, reason })?;
        Ok(Some(cleaned))
    }

    fn optional_choice<T>(
        &self,
        field: &'static str,
        parse: fn(&str) -> Option<T>,
    ) -> Result<Option<T>, ValidationError> {
        match self.string(field)? {
            None => Ok(None),
            Some(raw) if raw.trim().is_empty() => Ok(None),
            Some(raw) => parse(raw)
                .map(Some)
                .ok_or_else(|| ValidationError::InvalidChoice {
                    field,
                    value: raw.trim().to_string(),
                }),
        }
    }

    fn optional_number(&self, field: &'static str) -> Result<Option<f64>, ValidationError> {
        match self.get(field) {
            None => Ok(None),
            Some(value) => value.as_f64().map(Some).ok_or(ValidationError::WrongType {
                field,
                expected: "number",
            }),
        }
    }

    fn provider_hint(&self) -> Result<Option<String>, ValidationError> {
        Ok(self
            .string("provider")?
            .map(|raw| raw.trim().to_ascii_lowercase())
            .filter(|hint| !hint.is_empty()))
    }
}

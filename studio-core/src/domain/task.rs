//! Canonical task representation.
//!
//! A [`Task`] is built once per incoming request by the validator and is never
//! mutated afterwards. Dispatch on [`TaskInput`] is exhaustive, so adding a task
//! kind forces every match (prompt rendering, selection, docs) to be updated.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a supported task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskKind {
    Summarize,
    GenerateIdeas,
    RefineContent,
    Chat,
    GenerateImage,
    GamedevStory,
    GamedevDialogue,
    GamedevMechanics,
    GamedevCode,
    GamedevExplain,
}

impl TaskKind {
    pub const ALL: [TaskKind; 10] = [
        TaskKind::Summarize,
        TaskKind::GenerateIdeas,
        TaskKind::RefineContent,
        TaskKind::Chat,
        TaskKind::GenerateImage,
        TaskKind::GamedevStory,
        TaskKind::GamedevDialogue,
        TaskKind::GamedevMechanics,
        TaskKind::GamedevCode,
        TaskKind::GamedevExplain,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::Summarize => "summarize",
            TaskKind::GenerateIdeas => "generate-ideas",
            TaskKind::RefineContent => "refine-content",
            TaskKind::Chat => "chat",
            TaskKind::GenerateImage => "generate-image",
            TaskKind::GamedevStory => "gamedev-story",
            TaskKind::GamedevDialogue => "gamedev-dialogue",
            TaskKind::GamedevMechanics => "gamedev-mechanics",
            TaskKind::GamedevCode => "gamedev-code",
            TaskKind::GamedevExplain => "gamedev-explain",
        }
    }

    /// Parse a canonical task name (as used in configuration files).
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(name))
    }

    /// Resolve a caller-facing tool name, accepting route-style aliases
    /// such as `gamedev/story` and `image-generator`.
    pub fn from_tool(tool: &str) -> Option<Self> {
        let tool = tool.trim().trim_matches('/');
        let tool = tool.strip_prefix("api/").unwrap_or(tool);
        match tool.to_ascii_lowercase().as_str() {
            "image-generator" => Some(TaskKind::GenerateImage),
            other => Self::parse(&other.replace('/', "-")),
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self, TaskKind::GenerateImage)
    }

    /// Text tasks can be streamed; images arrive whole.
    pub fn supports_streaming(&self) -> bool {
        !self.is_image()
    }

    /// Every text-producing task, used to expand the `text` capability shorthand.
    pub fn text_kinds() -> impl Iterator<Item = TaskKind> {
        Self::ALL.into_iter().filter(|kind| !kind.is_image())
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Conversational tone for the chat task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Friendly,
    Professional,
    Playful,
    Expert,
}

impl Tone {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "friendly" => Some(Tone::Friendly),
            "professional" => Some(Tone::Professional),
            "playful" => Some(Tone::Playful),
            "expert" => Some(Tone::Expert),
            _ => None,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Tone::Friendly => "Warm, upbeat, and encouraging with conversational phrasing",
            Tone::Professional => "Clear, confident, and executive-ready with minimal emojis",
            Tone::Playful => "Energetic, witty, and emoji-rich without sacrificing clarity",
            Tone::Expert => {
                "Insightful, reference-driven, and authoritative with structured explanations"
            }
        }
    }
}

/// Sampling creativity, always within `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Creativity(f64);

impl Creativity {
    pub const DEFAULT: Creativity = Creativity(0.7);

    /// Clamp any finite input into range; non-finite values fall back to the default.
    pub fn clamped(value: f64) -> Self {
        if value.is_finite() {
            Creativity(value.clamp(0.0, 1.0))
        } else {
            Self::DEFAULT
        }
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl Default for Creativity {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectRatio {
    #[default]
    Square,
    Portrait,
    Landscape,
}

impl AspectRatio {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "square" => Some(AspectRatio::Square),
            "portrait" => Some(AspectRatio::Portrait),
            "landscape" => Some(AspectRatio::Landscape),
            _ => None,
        }
    }

    /// Pixel dimensions as `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            AspectRatio::Square => (1024, 1024),
            AspectRatio::Portrait => (832, 1216),
            AspectRatio::Landscape => (1216, 832),
        }
    }

    /// Ratio label in the `W:H` form image APIs expect.
    pub fn ratio_label(&self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Portrait => "3:4",
            AspectRatio::Landscape => "4:3",
        }
    }
}

/// Requested image quality. Without an explicit provider hint the tier picks
/// the image fallback chain.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    Fast,
    #[default]
    Balanced,
    High,
    Ultra,
}

impl QualityTier {
    pub const ALL: [QualityTier; 4] = [
        QualityTier::Fast,
        QualityTier::Balanced,
        QualityTier::High,
        QualityTier::Ultra,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|tier| tier.as_str().eq_ignore_ascii_case(value))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QualityTier::Fast => "fast",
            QualityTier::Balanced => "balanced",
            QualityTier::High => "high",
            QualityTier::Ultra => "ultra",
        }
    }

    pub fn is_premium(&self) -> bool {
        matches!(self, QualityTier::High | QualityTier::Ultra)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageTask {
    pub prompt: String,
    pub style: Option<String>,
    pub aspect_ratio: AspectRatio,
    pub quality: QualityTier,
}

impl ImageTask {
    /// Prompt with the optional style appended, as sent to image providers.
    pub fn description(&self) -> String {
        match &self.style {
            Some(style) => format!("{}, {}", self.prompt, style),
            None => self.prompt.clone(),
        }
    }
}

/// Task-specific validated parameters, one variant per [`TaskKind`].
#[derive(Debug, Clone, PartialEq)]
pub enum TaskInput {
    Summarize {
        text: String,
    },
    GenerateIdeas {
        topic: String,
    },
    RefineContent {
        text: String,
        instruction: Option<String>,
    },
    Chat {
        message: String,
        tone: Tone,
        creativity: Creativity,
    },
    GenerateImage(ImageTask),
    GamedevStory {
        prompt: String,
    },
    GamedevDialogue {
        prompt: String,
    },
    GamedevMechanics {
        prompt: String,
    },
    GamedevCode {
        prompt: String,
    },
    GamedevExplain {
        prompt: String,
    },
}

impl TaskInput {
    pub fn kind(&self) -> TaskKind {
        match self {
            TaskInput::Summarize { .. } => TaskKind::Summarize,
            TaskInput::GenerateIdeas { .. } => TaskKind::GenerateIdeas,
            TaskInput::RefineContent { .. } => TaskKind::RefineContent,
            TaskInput::Chat { .. } => TaskKind::Chat,
            TaskInput::GenerateImage(_) => TaskKind::GenerateImage,
            TaskInput::GamedevStory { .. } => TaskKind::GamedevStory,
            TaskInput::GamedevDialogue { .. } => TaskKind::GamedevDialogue,
            TaskInput::GamedevMechanics { .. } => TaskKind::GamedevMechanics,
            TaskInput::GamedevCode { .. } => TaskKind::GamedevCode,
            TaskInput::GamedevExplain { .. } => TaskKind::GamedevExplain,
        }
    }
}

/// A validated content-generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub input: TaskInput,
    /// Provider id the caller asked for; advisory only.
    pub provider_hint: Option<String>,
}

impl Task {
    pub fn new(input: TaskInput) -> Self {
        Self {
            input,
            provider_hint: None,
        }
    }

    pub fn with_provider_hint(mut self, hint: impl Into<String>) -> Self {
        self.provider_hint = Some(hint.into());
        self
    }

    pub fn kind(&self) -> TaskKind {
        self.input.kind()
    }

    /// Image quality tier, for image tasks only.
    pub fn quality(&self) -> Option<QualityTier> {
        match &self.input {
            TaskInput::GenerateImage(image) => Some(image.quality),
            _ => None,
        }
    }
}

pub mod prompt;
pub mod result;
pub mod sanitize;
pub mod task;
pub mod validation;

pub use prompt::{ImagePrompt, ProviderRequest, TextPrompt};
pub use result::NormalizedResult;
pub use task::{AspectRatio, Creativity, ImageTask, QualityTier, Task, TaskInput, TaskKind, Tone};
pub use validation::{ValidationError, classify};

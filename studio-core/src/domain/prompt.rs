//! Renders a validated task into the provider-neutral request handed to upstream clients.

use super::task::{QualityTier, Task, TaskInput};
use crate::constants::DEFAULT_TEMPERATURE;

#[derive(Debug, Clone, PartialEq)]
pub struct TextPrompt {
    pub prompt: String,
    pub temperature: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImagePrompt {
    pub description: String,
    pub width: u32,
    pub height: u32,
    pub ratio: &'static str,
    pub quality: QualityTier,
}

/// What an upstream provider is asked to produce.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderRequest {
    Text(TextPrompt),
    Image(ImagePrompt),
}

impl ProviderRequest {
    pub fn is_image(&self) -> bool {
        matches!(self, ProviderRequest::Image(_))
    }
}

impl Task {
    pub fn render(&self) -> ProviderRequest {
        render(self)
    }
}

fn text(prompt: String) -> ProviderRequest {
    ProviderRequest::Text(TextPrompt {
        prompt,
        temperature: DEFAULT_TEMPERATURE,
    })
}

pub fn render(task: &Task) -> ProviderRequest {
    match &task.input {
        TaskInput::Summarize { text: input } => text(format!(
            "Please provide a concise and comprehensive summary of the following text.\n\
             Focus on the main points, key concepts, and important details.\n\
             Make the summary clear, well-structured, and easy to understand.\n\n\
             Format your response with:\n\
             - Emojis where appropriate to make it more engaging\n\
             - Bullet points for complex information when helpful\n\
             - Line breaks for readability\n\n\
             Text to summarize:\n{input}"
        )),
        TaskInput::GenerateIdeas { topic } => text(format!(
            "Generate 5-7 creative and diverse ideas related to the following topic: \"{topic}\"\n\n\
             Please provide:\n\
             - Creative and innovative approaches\n\
             - Different perspectives and angles\n\
             - Practical and actionable ideas\n\
             - A mix of beginner and advanced concepts\n\n\
             Format the response as a numbered list with a brief explanation for each idea, \
             using an emoji per idea and line breaks for readability."
        )),
        TaskInput::RefineContent {
            text: input,
            instruction: Some(instruction),
        } => text(format!(
            "Please refine and improve the following content based on this specific instruction: \"{instruction}\"\n\n\
             Content to refine:\n{input}\n\n\
             Please ensure the refined content:\n\
             - Follows the specific instruction provided\n\
             - Maintains the original meaning and intent\n\
             - Improves clarity, flow, and readability\n\
             - Uses appropriate tone and style\n\
             - Uses proper formatting with line breaks and structure"
        )),
        TaskInput::RefineContent {
            text: input,
            instruction: None,
        } => text(format!(
            "Please refine and improve the following content for better clarity, flow, and readability:\n\n\
             Content to refine:\n{input}\n\n\
             Please ensure the refined content:\n\
             - Maintains the original meaning and intent\n\
             - Improves grammar and sentence structure\n\
             - Enhances clarity and coherence\n\
             - Uses appropriate tone and style\n\
             - Uses proper formatting with line breaks and structure"
        )),
        TaskInput::Chat {
            message,
            tone,
            creativity,
        } => ProviderRequest::Text(TextPrompt {
            prompt: format!(
                "You are a helpful AI assistant for the Smart Content Studio application.\n\
                 Adopt the following communication tone: {}.\n\n\
                 User message: {message}\n\n\
                 Please provide a thoughtful response that:\n\
                 - Addresses the user's question or comment directly\n\
                 - Is helpful and informative\n\
                 - Uses line breaks, bullet points, or numbered lists when helpful\n\
                 - Encourages further discussion if appropriate",
                tone.description()
            ),
            temperature: creativity.value(),
        }),
        TaskInput::GenerateImage(image) => {
            let (width, height) = image.aspect_ratio.dimensions();
            ProviderRequest::Image(ImagePrompt {
                description: image.description(),
                width,
                height,
                ratio: image.aspect_ratio.ratio_label(),
                quality: image.quality,
            })
        }
        TaskInput::GamedevStory { prompt } => text(format!(
            "You are a creative narrative designer for video games.\n\n\
             Generate a compelling backstory, quest idea, or world-building concept based on the following prompt:\n\n\
             {prompt}\n\n\
             Response should include:\n\
             - Title\n\
             - Setting\n\
             - Main conflict or hook\n\
             - Suggested gameplay elements"
        )),
        TaskInput::GamedevDialogue { prompt } => text(format!(
            "You are a professional NPC dialogue writer for a fantasy RPG.\n\n\
             Based on the input below, generate a short, flavorful dialogue (4-6 lines) between an NPC and the player.\n\n\
             Context: {prompt}\n\n\
             Ensure the dialogue:\n\
             - Has character personality\n\
             - Uses natural tone and speech\n\
             - Can be directly used in a quest or interaction"
        )),
        TaskInput::GamedevMechanics { prompt } => text(format!(
            "You are a gameplay systems designer.\n\n\
             Based on the game concept provided below, suggest 2-3 unique gameplay mechanics or balancing ideas:\n\n\
             {prompt}\n\n\
             Include:\n\
             - Name of each mechanic\n\
             - Brief description\n\
             - Optional: balancing tips"
        )),
        TaskInput::GamedevCode { prompt } => text(format!(
            "You are a game developer assistant specialized in Unity (C#) and Godot (GDScript).\n\n\
             Based on this request: \"{prompt}\"\n\n\
             Provide a clear, short code snippet with comments. Mention the engine used and context of use."
        )),
        TaskInput::GamedevExplain { prompt } => text(format!(
            "You are an expert game engine educator.\n\n\
             Explain the following concept in simple, beginner-friendly terms with real-life analogies:\n\n\
             \"{prompt}\"\n\n\
             Use line breaks and bullet points to improve readability."
        )),
    }
}

//! The four assistant-backed intents as one configuration table.
//!
//! Suggest, enhance, surprise-me and continue-story differ only in their busy
//! status, their prerequisite, whether the image is attached and the
//! instruction sent. `AssistantIntent::profile` holds those differences;
//! `Orchestrator::run_assistant` does the rest once for all of them.

use clasher_core::config::TemplateOverrides;
use clasher_core::error::{ClasherError, GuardViolation, Result};
use clasher_core::session::{OperationStatus, SessionState};
use minijinja::Environment;
use serde::Serialize;
use strum::{Display, EnumIter, IntoEnumIterator};

const SUGGEST_TEMPLATE: &str = "Analyze this image and generate one creative, highly-detailed prompt for an AI to animate it. Describe a short 3-5 second scene with motion, emotion, and a cinematic style based on the subject. Make it epic and inspiring.";

const ENHANCE_TEMPLATE: &str = "Take the following user's idea and expand it into a highly detailed, creative, and cinematic prompt for an AI video generator. Add details about camera motion, character expression, lighting changes, and atmosphere to bring the scene to life. Make it epic. Do not use markdown. User's idea: \"{{ prompt }}\"";

const SURPRISE_ME_TEMPLATE: &str = "Generate one completely random, unique, and highly creative prompt for an AI video generator. The prompt should describe a short, visually stunning, and imaginative 3-5 second clip. Do not use markdown.";

const CONTINUE_STORY_TEMPLATE: &str = "Based on the following prompt that just created an animation, create a new prompt that describes the very next scene in a continuing story. Build upon the previous scene, describing what happens next in a 3-5 second clip. Do not use markdown. Previous prompt: \"{{ previous_prompt }}\"";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum AssistantIntent {
    Suggest,
    Enhance,
    SurpriseMe,
    ContinueStory,
}

/// Session field an intent cannot run without.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Image,
    Prompt,
    PriorPrompt,
}

impl Requirement {
    fn is_met(self, state: &SessionState) -> bool {
        match self {
            Requirement::Image => state.has_image(),
            Requirement::Prompt => state.has_prompt(),
            Requirement::PriorPrompt => state.last_successful_prompt.is_some(),
        }
    }

    fn violation(self) -> GuardViolation {
        match self {
            Requirement::Image => GuardViolation::MissingImage,
            Requirement::Prompt => GuardViolation::EmptyPrompt,
            Requirement::PriorPrompt => GuardViolation::NoPriorPrompt,
        }
    }
}

/// One row of the intent table.
#[derive(Debug, Clone, Copy)]
pub struct IntentProfile {
    pub status: OperationStatus,
    /// Prerequisite and the message written into the session when it is not met.
    pub requirement: Option<(Requirement, &'static str)>,
    pub attach_image: bool,
    pub default_template: &'static str,
}

impl AssistantIntent {
    pub fn profile(self) -> IntentProfile {
        match self {
            AssistantIntent::Suggest => IntentProfile {
                status: OperationStatus::Suggesting,
                requirement: Some((
                    Requirement::Image,
                    "Please upload an image first to get suggestions.",
                )),
                attach_image: true,
                default_template: SUGGEST_TEMPLATE,
            },
            AssistantIntent::Enhance => IntentProfile {
                status: OperationStatus::Enhancing,
                requirement: Some((
                    Requirement::Prompt,
                    "Please write a basic prompt first to enhance it.",
                )),
                attach_image: false,
                default_template: ENHANCE_TEMPLATE,
            },
            AssistantIntent::SurpriseMe => IntentProfile {
                status: OperationStatus::SurprisingMe,
                requirement: None,
                attach_image: false,
                default_template: SURPRISE_ME_TEMPLATE,
            },
            AssistantIntent::ContinueStory => IntentProfile {
                status: OperationStatus::Continuing,
                requirement: Some((
                    Requirement::PriorPrompt,
                    "Generate an animation first to continue its story.",
                )),
                attach_image: false,
                default_template: CONTINUE_STORY_TEMPLATE,
            },
        }
    }

    /// Checks the prerequisite against `state`.
    pub(crate) fn check(self, state: &SessionState) -> std::result::Result<(), (GuardViolation, String)> {
        match self.profile().requirement {
            Some((requirement, message)) if !requirement.is_met(state) => {
                Err((requirement.violation(), message.to_string()))
            }
            _ => Ok(()),
        }
    }
}

/// Values a template can reference.
#[derive(Debug, Clone, Serialize)]
pub struct InstructionContext {
    pub prompt: String,
    pub previous_prompt: String,
}

impl InstructionContext {
    pub fn from_state(state: &SessionState) -> Self {
        Self {
            prompt: state.prompt.clone(),
            previous_prompt: state.last_successful_prompt.clone().unwrap_or_default(),
        }
    }
}

/// Instruction templates for every assistant intent.
pub struct InstructionSet {
    env: Environment<'static>,
    templates: Vec<(AssistantIntent, String)>,
}

impl InstructionSet {
    /// Built-in instructions, with any configured overrides applied.
    ///
    /// Every template is compiled once here so a broken override fails at
    /// startup rather than on first use.
    pub fn new(overrides: &TemplateOverrides) -> Result<Self> {
        let env = Environment::new();
        let mut templates = Vec::new();

        for intent in AssistantIntent::iter() {
            let source = match intent {
                AssistantIntent::Suggest => overrides.suggest.clone(),
                AssistantIntent::Enhance => overrides.enhance.clone(),
                AssistantIntent::SurpriseMe => overrides.surprise_me.clone(),
                AssistantIntent::ContinueStory => overrides.continue_story.clone(),
            }
            .unwrap_or_else(|| intent.profile().default_template.to_string());

            env.template_from_str(&source).map_err(|e| {
                ClasherError::config(format!("Invalid {intent} instruction template: {e}"))
            })?;
            templates.push((intent, source));
        }

        Ok(Self { env, templates })
    }

    pub fn render(&self, intent: AssistantIntent, context: &InstructionContext) -> Result<String> {
        let source = self
            .templates
            .iter()
            .find(|(candidate, _)| *candidate == intent)
            .map(|(_, source)| source.as_str())
            .ok_or_else(|| ClasherError::internal(format!("No template for {intent}")))?;

        self.env
            .render_str(source, context)
            .map_err(|e| ClasherError::internal(format!("Failed to render {intent} instruction: {e}")))
    }
}

impl Default for InstructionSet {
    fn default() -> Self {
        let env = Environment::new();
        let templates = AssistantIntent::iter()
            .map(|intent| (intent, intent.profile().default_template.to_string()))
            .collect();
        Self { env, templates }
    }
}

//! Session state record and the views derived from it.

use super::status::OperationStatus;
use crate::media::{ImagePayload, VideoPayload};
use serde::{Deserialize, Serialize};

/// The single mutable record shared by every operation of a session.
///
/// Only the orchestrator mutates it. Observers receive clones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    /// Current editable prompt.
    pub prompt: String,
    /// Currently uploaded source image.
    pub image: Option<ImagePayload>,
    /// Last generated animation.
    pub result: Option<VideoPayload>,
    /// Prompt that produced `result`; written together with it.
    pub last_successful_prompt: Option<String>,
    pub status: OperationStatus,
    pub error_message: Option<String>,
}

impl SessionState {
    /// Creates an empty, idle session.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.status.is_busy()
    }

    pub fn has_image(&self) -> bool {
        self.image.as_ref().is_some_and(|image| !image.is_empty())
    }

    pub fn has_prompt(&self) -> bool {
        !self.prompt.is_empty()
    }

    /// Stores a generated animation together with the prompt that produced it.
    pub fn set_result(&mut self, video: VideoPayload, prompt: String) {
        self.result = Some(video);
        self.last_successful_prompt = Some(prompt);
    }

    /// Drops the animation and the prompt linked to it.
    pub fn clear_result(&mut self) {
        self.result = None;
        self.last_successful_prompt = None;
    }

    /// What a presentation layer should show in the result area.
    pub fn display_state(&self) -> DisplayState {
        if self.is_busy() {
            DisplayState::Busy(self.status)
        } else if let Some(message) = &self.error_message {
            DisplayState::Error(message.clone())
        } else if self.result.is_some() {
            DisplayState::Result
        } else {
            DisplayState::Empty
        }
    }

    /// Which intents are currently allowed.
    pub fn affordances(&self) -> Affordances {
        let idle = !self.is_busy();
        Affordances {
            suggest: idle && self.has_image(),
            enhance: idle && self.has_prompt(),
            surprise_me: idle,
            continue_story: idle && self.last_successful_prompt.is_some(),
            generate_animation: idle && self.has_prompt() && self.has_image(),
            download: idle && self.result.is_some(),
        }
    }
}

/// Result-area rendering, in precedence order busy > error > result > empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum DisplayState {
    Busy(OperationStatus),
    Error(String),
    /// Idle with a generated animation available.
    Result,
    Empty,
}

/// Enabled/disabled flags for every user action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Affordances {
    pub suggest: bool,
    pub enhance: bool,
    pub surprise_me: bool,
    pub continue_story: bool,
    pub generate_animation: bool,
    pub download: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image() -> ImagePayload {
        ImagePayload::new("image/png", vec![1, 2, 3]).unwrap()
    }

    #[test]
    fn test_new_session_is_idle_and_empty() {
        let state = SessionState::new();
        assert_eq!(state.status, OperationStatus::Idle);
        assert!(state.prompt.is_empty());
        assert!(state.image.is_none());
        assert!(state.result.is_none());
        assert!(state.last_successful_prompt.is_none());
        assert_eq!(state.display_state(), DisplayState::Empty);
    }

    #[test]
    fn test_affordances_follow_prerequisites() {
        let mut state = SessionState::new();
        let empty = state.affordances();
        assert!(empty.surprise_me);
        assert!(!empty.suggest);
        assert!(!empty.enhance);
        assert!(!empty.generate_animation);
        assert!(!empty.continue_story);
        assert!(!empty.download);

        state.image = Some(image());
        assert!(state.affordances().suggest);
        assert!(!state.affordances().enhance);

        state.prompt = "  ".to_string();
        assert!(state.affordances().enhance);

        state.prompt = "A fox in snow".to_string();
        assert!(state.affordances().generate_animation);

        state.set_result(VideoPayload::inline(vec![0]), state.prompt.clone());
        assert!(state.affordances().continue_story);
        assert!(state.affordances().download);
    }

    #[test]
    fn test_busy_disables_everything() {
        let mut state = SessionState::new();
        state.image = Some(image());
        state.prompt = "prompt".to_string();
        state.set_result(VideoPayload::remote("https://example.com/a.mp4"), "p".into());
        state.status = OperationStatus::Continuing;

        assert_eq!(state.affordances(), Affordances::default());
        assert_eq!(
            state.display_state(),
            DisplayState::Busy(OperationStatus::Continuing)
        );
    }

    #[test]
    fn test_clear_result_unlinks_prompt() {
        let mut state = SessionState::new();
        state.set_result(VideoPayload::inline(vec![1]), "a dragon wakes".into());
        state.clear_result();

        assert!(state.result.is_none());
        assert!(state.last_successful_prompt.is_none());
        assert!(!state.affordances().continue_story);
        assert!(!state.affordances().download);
    }

    #[test]
    fn test_error_takes_precedence_over_result() {
        let mut state = SessionState::new();
        state.set_result(VideoPayload::inline(vec![1]), "p".into());
        assert_eq!(state.display_state(), DisplayState::Result);

        state.error_message = Some("boom".into());
        assert_eq!(state.display_state(), DisplayState::Error("boom".into()));
    }
}

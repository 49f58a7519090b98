//! Stub endpoint clients shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use clasher_application::Orchestrator;
use clasher_core::animation::{AnimationClient, AnimationOptions};
use clasher_core::assistant::AssistantClient;
use clasher_core::error::{ClasherError, Result};
use clasher_core::media::{ImagePayload, ImageUpload, VideoPayload};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Semaphore;

/// One recorded assistant call: the instruction and whether an image was attached.
#[derive(Debug, Clone)]
pub struct AssistantCall {
    pub instruction: String,
    pub image: Option<ImagePayload>,
}

/// Replies from a queue; falls back to a fixed completion when it runs dry.
/// With a gate, each call waits for a permit before answering.
#[derive(Default)]
pub struct StubAssistant {
    replies: Mutex<VecDeque<Result<String>>>,
    calls: Mutex<Vec<AssistantCall>>,
    gate: Option<Arc<Semaphore>>,
}

impl StubAssistant {
    pub fn replying<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(|r| Ok(r.into())).collect()),
            ..Self::default()
        }
    }

    pub fn failing(err: ClasherError) -> Self {
        Self {
            replies: Mutex::new(VecDeque::from([Err(err)])),
            ..Self::default()
        }
    }

    pub fn gated(gate: Arc<Semaphore>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<AssistantCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl AssistantClient for StubAssistant {
    async fn generate_text(&self, prompt: &str, image: Option<&ImagePayload>) -> Result<String> {
        self.calls.lock().unwrap().push(AssistantCall {
            instruction: prompt.to_string(),
            image: image.cloned(),
        });
        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }
        let reply = self.replies.lock().unwrap().pop_front();
        reply.unwrap_or_else(|| Ok("stub completion".to_string()))
    }
}

/// Animation stub; fails with "Quota exceeded" when its queue runs dry.
#[derive(Default)]
pub struct StubAnimation {
    replies: Mutex<VecDeque<Result<VideoPayload>>>,
    prompts: Mutex<Vec<String>>,
    gate: Option<Arc<Semaphore>>,
}

impl StubAnimation {
    pub fn succeeding() -> Self {
        Self {
            replies: Mutex::new(VecDeque::from([Ok(generated_video())])),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self::default()
    }

    pub fn with_replies(replies: Vec<Result<VideoPayload>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            ..Self::default()
        }
    }

    pub fn gated(mut self, gate: Arc<Semaphore>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl AnimationClient for StubAnimation {
    async fn generate_animation(
        &self,
        prompt: &str,
        _image: &ImagePayload,
        _options: &AnimationOptions,
    ) -> Result<VideoPayload> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }
        let reply = self.replies.lock().unwrap().pop_front();
        reply.unwrap_or_else(|| Err(ClasherError::animation("Quota exceeded")))
    }
}

pub fn generated_video() -> VideoPayload {
    VideoPayload::inline(vec![0x00, 0x00, 0x00, 0x18, b'f', b't', b'y', b'p'])
}

pub fn png_upload() -> ImageUpload {
    ImageUpload::new("sunset.png", vec![0x89, b'P', b'N', b'G'])
}

/// Orchestrator over the given stubs with no settle delay.
pub fn orchestrator(
    assistant: &Arc<StubAssistant>,
    animation: &Arc<StubAnimation>,
) -> Orchestrator {
    Orchestrator::new(assistant.clone(), animation.clone()).with_settle_delay(Duration::ZERO)
}

/// Orchestrator with an image uploaded and `prompt` set.
pub fn ready_orchestrator(
    assistant: &Arc<StubAssistant>,
    animation: &Arc<StubAnimation>,
    prompt: &str,
) -> Orchestrator {
    let orchestrator = orchestrator(assistant, animation);
    orchestrator.upload_image(png_upload()).unwrap();
    orchestrator.set_prompt(prompt);
    orchestrator
}

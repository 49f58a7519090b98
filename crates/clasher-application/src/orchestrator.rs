//! Session orchestrator.
//!
//! `Orchestrator` owns the [`SessionState`] of one session and is the only
//! place it is mutated. Every user intent goes through it:
//!
//! - prerequisites and the single-flight guard are checked atomically, before
//!   any network call
//! - the busy status is entered, the remote client is awaited, and the
//!   outcome is written back
//! - each mutation is broadcast to subscribers as a full snapshot
//!
//! The state lock is never held across an `.await`.

use crate::assistant_intent::{AssistantIntent, InstructionContext, InstructionSet};
use crate::observer::SessionObservers;
use chrono::Utc;
use clasher_core::animation::{AnimationClient, AnimationOptions, FallbackPolicy};
use clasher_core::assistant::AssistantClient;
use clasher_core::config::OrchestratorConfig;
use clasher_core::error::{ClasherError, GuardViolation, Result};
use clasher_core::export::{ExportStamp, VideoExport};
use clasher_core::media::{ImagePayload, ImageUpload, VideoPayload};
use clasher_core::session::{Affordances, OperationStatus, SessionState};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use uuid::Uuid;

const PROMPT_REQUIRED_MESSAGE: &str = "Please enter a prompt to generate an animation.";
const IMAGE_REQUIRED_MESSAGE: &str = "Please upload an image to animate.";

/// How an intent ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntentOutcome {
    /// The remote call succeeded and its result was stored.
    Applied,
    /// The remote call failed; the session ended in `OperationStatus::Error`.
    Failed { message: String },
    /// Animation failed and the placeholder video was stored instead.
    /// `message` stays in the session's `error_message`.
    FellBack { message: String },
    /// Refused before any network call.
    Rejected(GuardViolation),
}

impl IntentOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

struct Inner {
    state: SessionState,
    observers: SessionObservers,
    export_stamp: ExportStamp,
}

impl Inner {
    fn publish(&mut self) {
        self.observers.broadcast(&self.state);
    }
}

/// Inputs captured at dispatch time.
struct AssistantRequest {
    instruction_context: InstructionContext,
    image: Option<ImagePayload>,
}

struct AnimationRequest {
    prompt: String,
    image: ImagePayload,
}

pub struct Orchestrator {
    assistant: Arc<dyn AssistantClient>,
    animation: Arc<dyn AnimationClient>,
    instructions: InstructionSet,
    options: AnimationOptions,
    fallback: FallbackPolicy,
    settle_delay: Duration,
    inner: Mutex<Inner>,
}

impl Orchestrator {
    /// Creates an orchestrator with built-in instructions, the placeholder
    /// fallback and the default settle delay.
    pub fn new(assistant: Arc<dyn AssistantClient>, animation: Arc<dyn AnimationClient>) -> Self {
        let defaults = OrchestratorConfig::default();
        Self {
            assistant,
            animation,
            instructions: InstructionSet::default(),
            options: AnimationOptions::default(),
            fallback: FallbackPolicy::default(),
            settle_delay: defaults.settle_delay(),
            inner: Mutex::new(Inner {
                state: SessionState::new(),
                observers: SessionObservers::default(),
                export_stamp: ExportStamp::new(),
            }),
        }
    }

    /// Applies orchestrator settings and animation options from configuration.
    pub fn from_config(
        assistant: Arc<dyn AssistantClient>,
        animation: Arc<dyn AnimationClient>,
        config: &OrchestratorConfig,
        options: AnimationOptions,
    ) -> Result<Self> {
        Ok(Self::new(assistant, animation)
            .with_instructions(InstructionSet::new(&config.templates)?)
            .with_fallback(FallbackPolicy::from(&config.fallback))
            .with_settle_delay(config.settle_delay())
            .with_options(options))
    }

    pub fn with_instructions(mut self, instructions: InstructionSet) -> Self {
        self.instructions = instructions;
        self
    }

    pub fn with_fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn with_settle_delay(mut self, settle_delay: Duration) -> Self {
        self.settle_delay = settle_delay;
        self
    }

    pub fn with_options(mut self, options: AnimationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn fallback(&self) -> &FallbackPolicy {
        &self.fallback
    }

    // ------------------------------------------------------------------
    // Observation
    // ------------------------------------------------------------------

    /// Receives a snapshot after every state mutation, in mutation order.
    pub fn subscribe(&self) -> UnboundedReceiver<SessionState> {
        self.lock().observers.subscribe()
    }

    pub fn snapshot(&self) -> SessionState {
        self.lock().state.clone()
    }

    pub fn affordances(&self) -> Affordances {
        self.lock().state.affordances()
    }

    // ------------------------------------------------------------------
    // Local edits
    // ------------------------------------------------------------------

    /// Replaces the prompt text. Allowed at any time; in-flight calls keep
    /// the prompt they were dispatched with.
    pub fn set_prompt(&self, prompt: impl Into<String>) {
        let prompt = prompt.into();
        self.update(|state| state.prompt = prompt);
    }

    /// Validates and stores an uploaded image.
    ///
    /// On rejection the previous image is cleared and the reason is written
    /// into `error_message`.
    pub fn upload_image(&self, upload: ImageUpload) -> Result<()> {
        let file_name = upload.file_name.clone();
        match upload.into_payload() {
            Ok(payload) => {
                tracing::info!(
                    target: "clasher::upload",
                    file = %file_name,
                    mime = %payload.mime_type,
                    size = payload.len(),
                    "Image accepted"
                );
                self.update(|state| {
                    state.image = Some(payload);
                    state.error_message = None;
                    if state.status == OperationStatus::Error {
                        state.status = OperationStatus::Idle;
                    }
                });
                Ok(())
            }
            Err(err) => {
                tracing::warn!(target: "clasher::upload", file = %file_name, "Image rejected: {}", err);
                let message = err.user_message();
                self.update(|state| {
                    state.image = None;
                    state.error_message = Some(message);
                    if !state.is_busy() {
                        state.status = OperationStatus::Error;
                    }
                });
                Err(err)
            }
        }
    }

    // ------------------------------------------------------------------
    // Assistant intents
    // ------------------------------------------------------------------

    pub async fn suggest_prompt(&self) -> IntentOutcome {
        self.run_assistant(AssistantIntent::Suggest).await
    }

    pub async fn enhance_prompt(&self) -> IntentOutcome {
        self.run_assistant(AssistantIntent::Enhance).await
    }

    pub async fn surprise_me(&self) -> IntentOutcome {
        self.run_assistant(AssistantIntent::SurpriseMe).await
    }

    pub async fn continue_story(&self) -> IntentOutcome {
        self.run_assistant(AssistantIntent::ContinueStory).await
    }

    /// Runs one assistant-backed intent.
    ///
    /// On success the completion replaces the prompt. On failure the prompt is
    /// left untouched and the session ends in `OperationStatus::Error`.
    pub async fn run_assistant(&self, intent: AssistantIntent) -> IntentOutcome {
        let profile = intent.profile();
        let request = match self.try_begin(profile.status, |state| {
            intent.check(state)?;
            Ok(AssistantRequest {
                instruction_context: InstructionContext::from_state(state),
                image: if profile.attach_image {
                    state.image.clone()
                } else {
                    None
                },
            })
        }) {
            Ok(request) => request,
            Err(violation) => return IntentOutcome::Rejected(violation),
        };

        let operation_id = Uuid::new_v4();
        tracing::info!(target: "clasher::assistant", %operation_id, %intent, "Assistant request dispatched");

        let completion = match self
            .instructions
            .render(intent, &request.instruction_context)
        {
            Ok(instruction) => {
                self.assistant
                    .generate_text(&instruction, request.image.as_ref())
                    .await
            }
            Err(err) => Err(err),
        };

        match completion {
            Ok(text) => {
                tracing::info!(
                    target: "clasher::assistant",
                    %operation_id,
                    %intent,
                    chars = text.chars().count(),
                    "Assistant request completed"
                );
                self.update(|state| {
                    state.prompt = text;
                    state.status = OperationStatus::Idle;
                });
                IntentOutcome::Applied
            }
            Err(err) => {
                tracing::error!(target: "clasher::assistant", %operation_id, %intent, "Assistant request failed: {}", err);
                self.fail(&err)
            }
        }
    }

    // ------------------------------------------------------------------
    // Animation
    // ------------------------------------------------------------------

    /// Generates an animation from the current prompt and image.
    ///
    /// The previous result is cleared on dispatch. Once the call settles, the
    /// busy status is held for the settle delay before returning to idle.
    /// Failures are handled by the configured [`FallbackPolicy`].
    pub async fn generate_animation(&self) -> IntentOutcome {
        let request = match self.try_begin(OperationStatus::GeneratingAnimation, |state| {
            if !state.has_prompt() {
                return Err((
                    GuardViolation::EmptyPrompt,
                    PROMPT_REQUIRED_MESSAGE.to_string(),
                ));
            }
            let image = state
                .image
                .clone()
                .filter(|image| !image.is_empty())
                .ok_or_else(|| {
                    (
                        GuardViolation::MissingImage,
                        IMAGE_REQUIRED_MESSAGE.to_string(),
                    )
                })?;
            state.clear_result();
            Ok(AnimationRequest {
                prompt: state.prompt.clone(),
                image,
            })
        }) {
            Ok(request) => request,
            Err(violation) => return IntentOutcome::Rejected(violation),
        };

        let operation_id = Uuid::new_v4();
        tracing::info!(
            target: "clasher::animation",
            %operation_id,
            quality = %self.options.quality,
            look = %self.options.look,
            "Animation request dispatched"
        );

        match self.request_animation(operation_id, &request).await {
            Ok(video) => {
                tracing::info!(target: "clasher::animation", %operation_id, "Animation generated");
                let prompt = request.prompt;
                self.update(|state| state.set_result(video, prompt));
                self.settle().await;
                self.update(|state| state.status = OperationStatus::Idle);
                IntentOutcome::Applied
            }
            Err(err) => {
                let message = err.user_message();
                tracing::error!(target: "clasher::animation", %operation_id, "Animation failed: {}", err);

                // Reported at once; the busy status is kept until the delay elapses.
                let reported = message.clone();
                self.update(|state| state.error_message = Some(reported));
                self.settle().await;

                match &self.fallback {
                    FallbackPolicy::Placeholder { video } => {
                        tracing::warn!(target: "clasher::animation", %operation_id, "Substituting placeholder animation");
                        let video = video.clone();
                        let prompt = request.prompt;
                        self.update(|state| {
                            state.set_result(video, prompt);
                            state.status = OperationStatus::Idle;
                        });
                        IntentOutcome::FellBack { message }
                    }
                    FallbackPolicy::None | FallbackPolicy::Retry { .. } => {
                        self.update(|state| state.status = OperationStatus::Error);
                        IntentOutcome::Failed { message }
                    }
                }
            }
        }
    }

    async fn request_animation(
        &self,
        operation_id: Uuid,
        request: &AnimationRequest,
    ) -> Result<VideoPayload> {
        let retries = match self.fallback {
            FallbackPolicy::Retry { attempts } => attempts,
            _ => 0,
        };

        let mut attempt = 0;
        loop {
            match self
                .animation
                .generate_animation(&request.prompt, &request.image, &self.options)
                .await
            {
                Ok(video) => return Ok(video),
                Err(err) if attempt < retries => {
                    attempt += 1;
                    tracing::warn!(
                        target: "clasher::animation",
                        %operation_id,
                        attempt,
                        retries,
                        "Animation attempt failed, retrying: {}",
                        err
                    );
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn settle(&self) {
        if !self.settle_delay.is_zero() {
            tokio::time::sleep(self.settle_delay).await;
        }
    }

    // ------------------------------------------------------------------
    // Download
    // ------------------------------------------------------------------

    /// Packages the current result for saving.
    ///
    /// Does not touch the session. Repeated calls return the same payload
    /// under distinct file names. Refusals come back as `ClasherError::Guard`.
    pub fn download(&self) -> Result<VideoExport> {
        let mut inner = self.lock();
        if inner.state.is_busy() {
            return Err(GuardViolation::Busy {
                active: inner.state.status,
            }
            .into());
        }
        let payload = inner.state.result.clone().ok_or(GuardViolation::NoResult)?;
        let stamp = inner.export_stamp.next(Utc::now().timestamp_millis());
        let export = VideoExport::new(stamp, payload);
        tracing::debug!(target: "clasher::download", file = %export.file_name, "Prepared export");
        Ok(export)
    }

    // ------------------------------------------------------------------
    // State plumbing
    // ------------------------------------------------------------------

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Applies `mutate` and notifies observers under the same lock, so
    /// snapshots arrive in mutation order.
    fn update<R>(&self, mutate: impl FnOnce(&mut SessionState) -> R) -> R {
        let mut inner = self.lock();
        let out = mutate(&mut inner.state);
        inner.publish();
        out
    }

    /// Checks the guard and enters `status` in one critical section.
    ///
    /// A busy session is left untouched. A failed prerequisite writes its
    /// message into the session. Otherwise `prepare` captures the request
    /// inputs, `error_message` is cleared and `status` is entered.
    fn try_begin<T>(
        &self,
        status: OperationStatus,
        prepare: impl FnOnce(&mut SessionState) -> std::result::Result<T, (GuardViolation, String)>,
    ) -> std::result::Result<T, GuardViolation> {
        let mut inner = self.lock();

        if inner.state.is_busy() {
            let active = inner.state.status;
            tracing::debug!(target: "clasher::guard", requested = %status, %active, "Rejected while busy");
            return Err(GuardViolation::Busy { active });
        }

        match prepare(&mut inner.state) {
            Ok(captured) => {
                inner.state.status = status;
                inner.state.error_message = None;
                inner.publish();
                Ok(captured)
            }
            Err((violation, message)) => {
                tracing::debug!(target: "clasher::guard", requested = %status, "Prerequisite missing: {}", violation);
                inner.state.status = OperationStatus::Error;
                inner.state.error_message = Some(message);
                inner.publish();
                Err(violation)
            }
        }
    }

    fn fail(&self, err: &ClasherError) -> IntentOutcome {
        let message = err.user_message();
        let reported = message.clone();
        self.update(|state| {
            state.status = OperationStatus::Error;
            state.error_message = Some(reported);
        });
        IntentOutcome::Failed { message }
    }
}

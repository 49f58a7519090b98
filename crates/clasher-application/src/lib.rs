//! Application layer for Clasher.
//!
//! [`Orchestrator`] runs the session state machine over the client traits from
//! `clasher-core`; [`OrchestratorFactory`] wires it to the Gemini and Vertex
//! clients using configuration and secrets from `clasher-infrastructure`.

pub mod assistant_intent;
pub mod factory;
mod observer;
pub mod orchestrator;
pub mod telemetry;

pub use assistant_intent::{AssistantIntent, InstructionSet};
pub use factory::OrchestratorFactory;
pub use orchestrator::{IntentOutcome, Orchestrator};
pub use telemetry::init_tracing;

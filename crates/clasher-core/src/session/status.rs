//! Operation status for the session state machine.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

/// The single status field of a session.
///
/// At most one busy value can be active because the session holds exactly one
/// `OperationStatus`; the orchestrator makes entering a busy value atomic.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OperationStatus {
    #[default]
    Idle,
    Suggesting,
    Enhancing,
    SurprisingMe,
    Continuing,
    GeneratingAnimation,
    /// Last operation failed; cleared by the next accepted intent.
    Error,
}

impl OperationStatus {
    /// Any status other than `Idle`/`Error` means a remote call is in flight.
    pub fn is_busy(self) -> bool {
        !matches!(self, Self::Idle | Self::Error)
    }
}

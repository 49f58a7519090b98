//! Session domain module.
//!
//! # Module Structure
//!
//! - `status`: the operation status enum (`OperationStatus`)
//! - `state`: the session record (`SessionState`) and its derived views
//!   (`DisplayState`, `Affordances`)

mod state;
mod status;

pub use state::{Affordances, DisplayState, SessionState};
pub use status::OperationStatus;

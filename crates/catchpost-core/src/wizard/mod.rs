//! Catch-report wizard.
//!
//! - `steps` -- static step catalog: order, owned fields, input kinds
//! - `draft_ext` -- `DraftExt` mutation helpers for `Draft`
//! - `validate` -- free-text validation rules
//! - `prompt` -- per-step prompt text and keyboards
//! - `engine` -- pure state machine: (step, event, draft) -> transition
//! - `service` -- load / transition / persist / deliver loop per event

pub mod draft_ext;
pub mod engine;
pub mod prompt;
pub mod service;
pub mod steps;
pub mod validate;

pub use engine::{Effect, Transition, WizardEngine};
pub use service::WizardService;

//! Inbound event and outbound action shapes, abstracted from the transport.
//!
//! The transport adapter decodes platform updates into [`Inbound`] values;
//! the wizard engine answers with [`Action`]s that the delivery layer turns
//! back into platform calls.

use serde::{Deserialize, Serialize};

use std::fmt;

use crate::ids::{ChatId, MediaRef, MessageRef, UserId};
use crate::keyboard::Keyboard;
use crate::step::Step;

/// Navigation direction of a back/forward button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Back,
    Forward,
}

/// What the user did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// Explicit start of the flow. `payload` carries a deep-link argument.
    Start { payload: Option<String> },
    /// A button press selecting `option` on the step the button belongs to.
    Selection { step_hint: Step, option: String },
    /// A typed message.
    Text { text: String },
    /// An uploaded photo or document.
    Media { media_ref: MediaRef, is_image: bool },
    /// Back/forward navigation. `target` is the step the button pointed at.
    Navigation {
        direction: Direction,
        target: Option<Step>,
    },
    /// Abandon the submission.
    Cancel,
}

impl EventKind {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::Start { .. } => "start",
            EventKind::Selection { .. } => "selection",
            EventKind::Text { .. } => "text",
            EventKind::Media { .. } => "media",
            EventKind::Navigation { .. } => "navigation",
            EventKind::Cancel => "cancel",
        }
    }
}

/// An event addressed to one user's dialogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    pub user_id: UserId,
    pub kind: EventKind,
    /// The message a pressed button was attached to, if any.
    pub origin: Option<MessageRef>,
    /// Platform id of the button press, to be acknowledged.
    pub callback_id: Option<String>,
}

impl InboundEvent {
    /// An event without a button origin (typed text, upload, command).
    pub fn new(user_id: UserId, kind: EventKind) -> Self {
        Self {
            user_id,
            kind,
            origin: None,
            callback_id: None,
        }
    }

    /// Attach the button origin.
    pub fn with_callback(mut self, callback_id: impl Into<String>, origin: Option<MessageRef>) -> Self {
        self.callback_id = Some(callback_id.into());
        self.origin = origin;
        self
    }
}

/// Outbound UI action produced by the wizard engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Show a step prompt (edits the originating message when there is one).
    ShowPrompt {
        user_id: UserId,
        text: String,
        controls: Option<Keyboard>,
    },
    /// Replace only the keyboard of the originating message.
    UpdateControls { user_id: UserId, controls: Keyboard },
    /// Ephemeral, non-advancing warning or notice.
    Notify { user_id: UserId, text: String },
}

/// Moderator verdict on a submitted draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModerationDecision {
    Approve,
    Reject,
}

impl fmt::Display for ModerationDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModerationDecision::Approve => write!(f, "approve"),
            ModerationDecision::Reject => write!(f, "reject"),
        }
    }
}

/// A moderator pressed approve or reject on a ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModerationEvent {
    pub decision: ModerationDecision,
    /// The user whose draft is being resolved.
    pub target: UserId,
    /// Chat the button was pressed in.
    pub chat_id: ChatId,
    /// The control message the button was attached to.
    pub origin: Option<MessageRef>,
    pub callback_id: Option<String>,
}

/// A decoded inbound update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    Wizard(InboundEvent),
    Moderation(ModerationEvent),
}

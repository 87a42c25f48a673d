//! Inline keyboard model and the compact callback-data codec.
//!
//! Buttons carry a [`CallbackData`] value that is encoded into the short
//! string the platform echoes back on press:
//!
//! | Data                          | Encoding                |
//! |-------------------------------|-------------------------|
//! | select option on a step       | `sel:{step}:{code}`     |
//! | navigate back / forward       | `nav:back:{step}`, `nav:next:{step}` |
//! | cancel the submission         | `cancel`                |
//! | moderator approve / reject    | `mod:ok:{user}`, `mod:no:{user}` |

use std::fmt;
use std::str::FromStr;

use crate::event::{Direction, ModerationDecision};
use crate::ids::UserId;
use crate::step::Step;

/// Decoded payload of a button press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackData {
    Select { step: Step, code: String },
    Navigate { direction: Direction, target: Step },
    Cancel,
    Moderate {
        decision: ModerationDecision,
        user_id: UserId,
    },
}

impl fmt::Display for CallbackData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallbackData::Select { step, code } => write!(f, "sel:{step}:{code}"),
            CallbackData::Navigate {
                direction: Direction::Back,
                target,
            } => write!(f, "nav:back:{target}"),
            CallbackData::Navigate {
                direction: Direction::Forward,
                target,
            } => write!(f, "nav:next:{target}"),
            CallbackData::Cancel => f.write_str("cancel"),
            CallbackData::Moderate {
                decision: ModerationDecision::Approve,
                user_id,
            } => write!(f, "mod:ok:{user_id}"),
            CallbackData::Moderate {
                decision: ModerationDecision::Reject,
                user_id,
            } => write!(f, "mod:no:{user_id}"),
        }
    }
}

impl FromStr for CallbackData {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "cancel" {
            return Ok(CallbackData::Cancel);
        }

        let mut parts = s.splitn(3, ':');
        let (Some(kind), Some(arg), Some(rest)) = (parts.next(), parts.next(), parts.next()) else {
            return Err(format!("malformed callback data: '{s}'"));
        };

        match (kind, arg) {
            ("sel", step) if !rest.is_empty() => Ok(CallbackData::Select {
                step: step.parse()?,
                code: rest.to_string(),
            }),
            ("nav", "back") => Ok(CallbackData::Navigate {
                direction: Direction::Back,
                target: rest.parse()?,
            }),
            ("nav", "next") => Ok(CallbackData::Navigate {
                direction: Direction::Forward,
                target: rest.parse()?,
            }),
            ("mod", verdict @ ("ok" | "no")) => {
                let user_id = rest
                    .parse()
                    .map_err(|e| format!("invalid user id in '{s}': {e}"))?;
                let decision = if verdict == "ok" {
                    ModerationDecision::Approve
                } else {
                    ModerationDecision::Reject
                };
                Ok(CallbackData::Moderate { decision, user_id })
            }
            _ => Err(format!("unknown callback data: '{s}'")),
        }
    }
}

/// What pressing a button does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ButtonAction {
    Callback(CallbackData),
    Url(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub action: ButtonAction,
}

impl Button {
    pub fn callback(label: impl Into<String>, data: CallbackData) -> Self {
        Self {
            label: label.into(),
            action: ButtonAction::Callback(data),
        }
    }

    pub fn url(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            action: ButtonAction::Url(url.into()),
        }
    }
}

/// Rows of inline buttons.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keyboard {
    pub rows: Vec<Vec<Button>>,
}

impl Keyboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row; empty rows are dropped.
    pub fn row(mut self, row: Vec<Button>) -> Self {
        if !row.is_empty() {
            self.rows.push(row);
        }
        self
    }

    /// Lay `buttons` out `per_row` to a row.
    pub fn grid(mut self, buttons: Vec<Button>, per_row: usize) -> Self {
        let mut current = Vec::with_capacity(per_row);
        for button in buttons {
            current.push(button);
            if current.len() == per_row {
                self.rows.push(std::mem::take(&mut current));
            }
        }
        if !current.is_empty() {
            self.rows.push(current);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All buttons, row by row.
    pub fn buttons(&self) -> impl Iterator<Item = &Button> {
        self.rows.iter().flatten()
    }
}

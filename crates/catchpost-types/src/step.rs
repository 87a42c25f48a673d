//! Wizard step identities.
//!
//! `Step` names a position in the catch-report dialogue. The neighbour
//! relationships, owned fields and validation rules of each step live in
//! the step catalog in `catchpost-core`; this module only defines the
//! identities and their stable string form (used in callback data and in
//! the persisted draft record).

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// A named position in the wizard state machine.
///
/// `*Text` steps are sub-states entered only to collect free-form text for
/// their parent step. `Submitted` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Greeting,
    Location,
    PointType,
    FishType,
    FishTypeText,
    FishingType,
    Detail,
    Coords,
    CoordsText,
    Temp,
    Photos,
    Comment,
    CommentText,
    Author,
    Preview,
    Submitted,
    Cancelled,
}

impl Step {
    /// Every step in dialogue order, terminal outcomes last.
    pub const ALL: [Step; 17] = [
        Step::Greeting,
        Step::Location,
        Step::PointType,
        Step::FishType,
        Step::FishTypeText,
        Step::FishingType,
        Step::Detail,
        Step::Coords,
        Step::CoordsText,
        Step::Temp,
        Step::Photos,
        Step::Comment,
        Step::CommentText,
        Step::Author,
        Step::Preview,
        Step::Submitted,
        Step::Cancelled,
    ];

    /// Stable snake_case name.
    pub fn as_str(self) -> &'static str {
        match self {
            Step::Greeting => "greeting",
            Step::Location => "location",
            Step::PointType => "point_type",
            Step::FishType => "fish_type",
            Step::FishTypeText => "fish_type_text",
            Step::FishingType => "fishing_type",
            Step::Detail => "detail",
            Step::Coords => "coords",
            Step::CoordsText => "coords_text",
            Step::Temp => "temp",
            Step::Photos => "photos",
            Step::Comment => "comment",
            Step::CommentText => "comment_text",
            Step::Author => "author",
            Step::Preview => "preview",
            Step::Submitted => "submitted",
            Step::Cancelled => "cancelled",
        }
    }

    /// Whether the dialogue has ended at this step.
    pub fn is_terminal(self) -> bool {
        matches!(self, Step::Submitted | Step::Cancelled)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Step {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Step::ALL
            .into_iter()
            .find(|step| step.as_str() == wanted)
            .ok_or_else(|| format!("invalid step: '{s}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_string_roundtrip_for_all() {
        for step in Step::ALL {
            assert_eq!(step.to_string().parse::<Step>().unwrap(), step);
        }
    }

    #[test]
    fn test_step_from_str_rejects_unknown() {
        assert!("lake".parse::<Step>().is_err());
    }

    #[test]
    fn test_step_serde_matches_display() {
        let json = serde_json::to_string(&Step::FishTypeText).unwrap();
        assert_eq!(json, "\"fish_type_text\"");
    }

    #[test]
    fn test_terminal_steps() {
        assert!(Step::Submitted.is_terminal());
        assert!(Step::Cancelled.is_terminal());
        assert!(!Step::Preview.is_terminal());
    }
}

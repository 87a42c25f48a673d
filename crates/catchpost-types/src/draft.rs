//! The Draft answer set and its persisted record.
//!
//! A `Draft` is the evolving set of answers for one user's in-progress
//! catch report. Every field is optional until the step that owns it has
//! been completed. Mutation helpers live in `catchpost-core`
//! (`wizard::draft_ext::DraftExt`); this module only defines the shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;

use crate::ids::{MediaRef, UserId};
use crate::step::Step;

/// Maximum number of photos attached to one report.
pub const MAX_PHOTOS: usize = 10;

/// Maximum number of point types selected at once.
pub const MAX_POINT_TYPES: usize = 2;

/// Fish answer: either a catalog code picked from the keyboard or a
/// free-text name typed by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FishChoice {
    Preset(String),
    Custom(String),
}

/// The in-progress answer set for one user's submission.
///
/// Serialized as JSON into the draft store. Unknown fields are ignored and
/// missing fields take their defaults, so records written by other versions
/// still load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Draft {
    /// Location code.
    pub location: Option<String>,
    /// Point type codes in selection order (at most `MAX_POINT_TYPES`).
    pub point_types: Vec<String>,
    pub fish_type: Option<FishChoice>,
    /// Fishing technique code.
    pub fishing_type: Option<String>,
    /// Technique parameter (clip distance, depth, retrieve speed, ...).
    pub fishing_extra: Option<String>,
    /// Coordinates in `-?\d{1,3}:\d{1,6}` form.
    pub coords: Option<String>,
    /// Temperature code; `"absent"` when the user skipped the question.
    pub water_temp: Option<String>,
    /// Unique media references in upload order (at most `MAX_PHOTOS`).
    pub photos: Vec<MediaRef>,
    pub comment: Option<String>,
    /// Player nickname.
    pub author: Option<String>,
}

/// A field of the draft, used by the step catalog to declare ownership and
/// back-navigation invalidation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftField {
    Location,
    PointTypes,
    FishType,
    FishingType,
    FishingExtra,
    Coords,
    WaterTemp,
    Photos,
    Comment,
    Author,
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DraftField::Location => "location",
            DraftField::PointTypes => "point_types",
            DraftField::FishType => "fish_type",
            DraftField::FishingType => "fishing_type",
            DraftField::FishingExtra => "fishing_extra",
            DraftField::Coords => "coords",
            DraftField::WaterTemp => "water_temp",
            DraftField::Photos => "photos",
            DraftField::Comment => "comment",
            DraftField::Author => "author",
        };
        f.write_str(name)
    }
}

/// A stored draft: the answers plus the step the dialogue is waiting at.
///
/// Persisting the step together with the answers lets a restarted process
/// resume the dialogue where the user left it.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftRecord {
    pub user_id: UserId,
    pub step: Step,
    pub draft: Draft,
    /// When the record was first written (store-managed).
    pub created_at: DateTime<Utc>,
    /// When the record was last written.
    pub updated_at: DateTime<Utc>,
}

impl DraftRecord {
    /// A fresh record stamped with the current time.
    pub fn new(user_id: UserId, step: Step, draft: Draft) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            step,
            draft,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Lightweight listing entry for stored drafts.
#[derive(Debug, Clone)]
pub struct DraftSummary {
    pub user_id: UserId,
    pub step: Step,
    pub author: Option<String>,
    pub photo_count: usize,
    pub updated_at: DateTime<Utc>,
}

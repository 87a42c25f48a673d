//! Draft mutation helpers.
//!
//! The `Draft` struct lives in `catchpost-types`; this module adds an
//! extension trait (`DraftExt`) with the field-level operations the wizard
//! engine needs: presence checks, clearing, selection, point-type
//! toggling, and bounded photo accumulation.

use catchpost_types::draft::{Draft, DraftField, FishChoice, MAX_PHOTOS};
use catchpost_types::ids::MediaRef;

/// Outcome of toggling a multi-select option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Selected,
    Deselected,
    LimitReached,
}

/// Outcome of adding a photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoAdded {
    /// Stored; carries the new photo count.
    Added(usize),
    /// Already present; nothing changed.
    Duplicate,
    /// The draft already holds `MAX_PHOTOS` photos.
    LimitReached,
}

pub trait DraftExt {
    /// Whether `field` holds a value. Empty lists count as absent.
    fn has(&self, field: DraftField) -> bool;

    /// Reset `field` to its empty value.
    fn clear(&mut self, field: DraftField);

    /// Set a single-choice field from an option code.
    ///
    /// Returns `false` when `field` is not a single-choice field.
    fn select(&mut self, field: DraftField, code: &str) -> bool;

    /// Store a free-text answer in `field`.
    ///
    /// Returns `false` when `field` does not take free text.
    fn set_text(&mut self, field: DraftField, value: String) -> bool;

    /// Toggle a point type on or off, keeping selection order.
    fn toggle_point_type(&mut self, code: &str, max: usize) -> Toggle;

    /// Append a photo unless it is a duplicate or the limit is reached.
    fn add_photo(&mut self, media: MediaRef) -> PhotoAdded;
}

impl DraftExt for Draft {
    fn has(&self, field: DraftField) -> bool {
        match field {
            DraftField::Location => self.location.is_some(),
            DraftField::PointTypes => !self.point_types.is_empty(),
            DraftField::FishType => self.fish_type.is_some(),
            DraftField::FishingType => self.fishing_type.is_some(),
            DraftField::FishingExtra => self.fishing_extra.is_some(),
            DraftField::Coords => self.coords.is_some(),
            DraftField::WaterTemp => self.water_temp.is_some(),
            DraftField::Photos => !self.photos.is_empty(),
            DraftField::Comment => self.comment.is_some(),
            DraftField::Author => self.author.is_some(),
        }
    }

    fn clear(&mut self, field: DraftField) {
        match field {
            DraftField::Location => self.location = None,
            DraftField::PointTypes => self.point_types.clear(),
            DraftField::FishType => self.fish_type = None,
            DraftField::FishingType => self.fishing_type = None,
            DraftField::FishingExtra => self.fishing_extra = None,
            DraftField::Coords => self.coords = None,
            DraftField::WaterTemp => self.water_temp = None,
            DraftField::Photos => self.photos.clear(),
            DraftField::Comment => self.comment = None,
            DraftField::Author => self.author = None,
        }
    }

    fn select(&mut self, field: DraftField, code: &str) -> bool {
        let code = code.to_string();
        match field {
            DraftField::Location => self.location = Some(code),
            DraftField::FishType => self.fish_type = Some(FishChoice::Preset(code)),
            DraftField::FishingType => self.fishing_type = Some(code),
            DraftField::WaterTemp => self.water_temp = Some(code),
            _ => return false,
        }
        true
    }

    fn set_text(&mut self, field: DraftField, value: String) -> bool {
        match field {
            DraftField::FishType => self.fish_type = Some(FishChoice::Custom(value)),
            DraftField::FishingExtra => self.fishing_extra = Some(value),
            DraftField::Coords => self.coords = Some(value),
            DraftField::Comment => self.comment = Some(value),
            DraftField::Author => self.author = Some(value),
            _ => return false,
        }
        true
    }

    fn toggle_point_type(&mut self, code: &str, max: usize) -> Toggle {
        if let Some(pos) = self.point_types.iter().position(|c| c == code) {
            self.point_types.remove(pos);
            return Toggle::Deselected;
        }
        if self.point_types.len() >= max {
            return Toggle::LimitReached;
        }
        self.point_types.push(code.to_string());
        Toggle::Selected
    }

    fn add_photo(&mut self, media: MediaRef) -> PhotoAdded {
        if self.photos.contains(&media) {
            return PhotoAdded::Duplicate;
        }
        if self.photos.len() >= MAX_PHOTOS {
            return PhotoAdded::LimitReached;
        }
        self.photos.push(media);
        PhotoAdded::Added(self.photos.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_point_type_respects_limit_and_order() {
        let mut draft = Draft::default();
        assert_eq!(draft.toggle_point_type("quest", 2), Toggle::Selected);
        assert_eq!(draft.toggle_point_type("farm", 2), Toggle::Selected);
        assert_eq!(draft.toggle_point_type("trophy", 2), Toggle::LimitReached);
        assert_eq!(draft.point_types, vec!["quest", "farm"]);

        assert_eq!(draft.toggle_point_type("quest", 2), Toggle::Deselected);
        assert_eq!(draft.toggle_point_type("trophy", 2), Toggle::Selected);
        assert_eq!(draft.point_types, vec!["farm", "trophy"]);
    }

    #[test]
    fn test_add_photo_dedups_and_caps() {
        let mut draft = Draft::default();
        assert_eq!(draft.add_photo(MediaRef::new("a")), PhotoAdded::Added(1));
        assert_eq!(draft.add_photo(MediaRef::new("a")), PhotoAdded::Duplicate);
        for i in 1..MAX_PHOTOS {
            draft.add_photo(MediaRef::new(format!("p{i}")));
        }
        assert_eq!(draft.photos.len(), MAX_PHOTOS);
        assert_eq!(draft.add_photo(MediaRef::new("extra")), PhotoAdded::LimitReached);
        assert_eq!(draft.photos.len(), MAX_PHOTOS);
        assert_eq!(draft.photos[0], MediaRef::new("a"));
    }

    #[test]
    fn test_clear_and_has() {
        let mut draft = Draft::default();
        assert!(!draft.has(DraftField::PointTypes));
        draft.toggle_point_type("farm", 2);
        assert!(draft.has(DraftField::PointTypes));
        draft.clear(DraftField::PointTypes);
        assert!(!draft.has(DraftField::PointTypes));
    }

    #[test]
    fn test_select_and_set_text_target_the_right_fields() {
        let mut draft = Draft::default();
        assert!(draft.select(DraftField::FishType, "mix"));
        assert_eq!(draft.fish_type, Some(FishChoice::Preset("mix".to_string())));
        assert!(draft.set_text(DraftField::FishType, "Налим".to_string()));
        assert_eq!(draft.fish_type, Some(FishChoice::Custom("Налим".to_string())));
        assert!(!draft.select(DraftField::Author, "x"));
        assert!(!draft.set_text(DraftField::Location, "x".to_string()));
    }
}

//! Static step catalog.
//!
//! One `StepSpec` per wizard step. The table drives back navigation
//! (which fields to clear when a step is undone), forward validation
//! (which field must be present), and input dispatch. Text sub-steps
//! (`FishTypeText`, `CoordsText`, `CommentText`) hang off a parent step:
//! they have no `next`, and their `prev` is the parent.

use catchpost_types::catalog::{self, FISH, LOCATIONS, POINT_TYPES, WATER_TEMPS};
use catchpost_types::draft::{DraftField, MAX_POINT_TYPES};
use catchpost_types::step::Step;

use super::validate::TextRule;

/// How a step accepts input.
#[derive(Debug, Clone, Copy)]
pub enum InputKind {
    /// No input; the only way on is the forward button.
    Intro,
    /// Pick one option; picking again replaces the value.
    Single {
        field: DraftField,
        accepts: fn(&str) -> bool,
    },
    /// Toggle options on and off, up to `max` at a time.
    Multi { accepts: fn(&str) -> bool, max: usize },
    /// Free text typed directly on this step.
    Text { field: DraftField, rule: TextRule },
    /// Free text collected on behalf of a parent step.
    SubText { field: DraftField, rule: TextRule },
    /// Buttons only; the value is entered on a sub-step.
    Entry,
    /// Photo uploads.
    Media,
    /// Final review before submission.
    Review,
    /// Terminal; no input accepted.
    Terminal,
}

/// A selectable option on a step that switches to a text sub-step.
#[derive(Debug, Clone, Copy)]
pub struct SubEntry {
    pub option: &'static str,
    pub step: Step,
}

#[derive(Debug, Clone, Copy)]
pub struct StepSpec {
    pub step: Step,
    pub prev: Option<Step>,
    pub next: Option<Step>,
    /// Fields cleared when the user navigates back over this step.
    pub clears_on_back: &'static [DraftField],
    /// Field that must be present before moving forward.
    pub required: Option<DraftField>,
    pub input: InputKind,
    pub sub_entry: Option<SubEntry>,
    /// Option code that clears this step's fields and moves forward.
    pub skip_option: Option<&'static str>,
    /// Warning shown when forward is pressed without the required field.
    pub missing_warning: &'static str,
}

/// Option code on the fish step that opens free-text entry.
pub const FISH_CUSTOM: &str = "custom";
/// Option code on the coordinates step that opens free-text entry.
pub const COORDS_ENTER: &str = "enter";
/// Option codes on the comment step.
pub const COMMENT_WRITE: &str = "write";
pub const COMMENT_SKIP: &str = "skip";

const SHORT_TEXT: usize = 100;
const LONG_TEXT: usize = 600;

fn is_location(code: &str) -> bool {
    catalog::contains(LOCATIONS, code)
}

fn is_point_type(code: &str) -> bool {
    catalog::contains(POINT_TYPES, code)
}

fn is_fish(code: &str) -> bool {
    catalog::contains(FISH, code)
}

fn is_fishing_type(code: &str) -> bool {
    catalog::fishing_option(code).is_some()
}

fn is_water_temp(code: &str) -> bool {
    catalog::contains(WATER_TEMPS, code)
}

const fn base(step: Step, prev: Option<Step>, next: Option<Step>, input: InputKind) -> StepSpec {
    StepSpec {
        step,
        prev,
        next,
        clears_on_back: &[],
        required: None,
        input,
        sub_entry: None,
        skip_option: None,
        missing_warning: "",
    }
}

const GREETING: StepSpec = base(Step::Greeting, None, Some(Step::Location), InputKind::Intro);

const LOCATION: StepSpec = StepSpec {
    clears_on_back: &[DraftField::Location],
    required: Some(DraftField::Location),
    missing_warning: "Выберите водоём перед продолжением ⛔",
    ..base(
        Step::Location,
        Some(Step::Greeting),
        Some(Step::PointType),
        InputKind::Single {
            field: DraftField::Location,
            accepts: is_location,
        },
    )
};

const POINT_TYPE: StepSpec = StepSpec {
    clears_on_back: &[DraftField::PointTypes],
    required: Some(DraftField::PointTypes),
    missing_warning: "Выберите хотя бы один тип точки перед продолжением ⛔",
    ..base(
        Step::PointType,
        Some(Step::Location),
        Some(Step::FishType),
        InputKind::Multi {
            accepts: is_point_type,
            max: MAX_POINT_TYPES,
        },
    )
};

const FISH_TYPE: StepSpec = StepSpec {
    clears_on_back: &[DraftField::FishType],
    required: Some(DraftField::FishType),
    sub_entry: Some(SubEntry {
        option: FISH_CUSTOM,
        step: Step::FishTypeText,
    }),
    missing_warning: "Выберите рыбу или введите её вручную ⛔",
    ..base(
        Step::FishType,
        Some(Step::PointType),
        Some(Step::FishingType),
        InputKind::Single {
            field: DraftField::FishType,
            accepts: is_fish,
        },
    )
};

const FISH_TYPE_TEXT: StepSpec = base(
    Step::FishTypeText,
    Some(Step::FishType),
    None,
    InputKind::SubText {
        field: DraftField::FishType,
        rule: TextRule::NonEmpty {
            max_len: SHORT_TEXT,
            warning: "Введите корректное название рыбы ⛔",
        },
    },
);

const FISHING_TYPE: StepSpec = StepSpec {
    clears_on_back: &[DraftField::FishingType],
    required: Some(DraftField::FishingType),
    missing_warning: "Выберите тип ловли перед продолжением ⛔",
    ..base(
        Step::FishingType,
        Some(Step::FishType),
        Some(Step::Detail),
        InputKind::Single {
            field: DraftField::FishingType,
            accepts: is_fishing_type,
        },
    )
};

const DETAIL: StepSpec = StepSpec {
    clears_on_back: &[DraftField::FishingExtra],
    required: Some(DraftField::FishingExtra),
    missing_warning: "Введите значение параметра ⛔",
    ..base(
        Step::Detail,
        Some(Step::FishingType),
        Some(Step::Coords),
        InputKind::Text {
            field: DraftField::FishingExtra,
            rule: TextRule::NonEmpty {
                max_len: SHORT_TEXT,
                warning: "Введите корректное значение ⛔",
            },
        },
    )
};

const COORDS: StepSpec = StepSpec {
    clears_on_back: &[DraftField::Coords],
    required: Some(DraftField::Coords),
    sub_entry: Some(SubEntry {
        option: COORDS_ENTER,
        step: Step::CoordsText,
    }),
    missing_warning: "Введите координаты ⛔",
    ..base(Step::Coords, Some(Step::Detail), Some(Step::Temp), InputKind::Entry)
};

const COORDS_TEXT: StepSpec = base(
    Step::CoordsText,
    Some(Step::Coords),
    None,
    InputKind::SubText {
        field: DraftField::Coords,
        rule: TextRule::Coords,
    },
);

const TEMP: StepSpec = StepSpec {
    clears_on_back: &[DraftField::WaterTemp],
    required: Some(DraftField::WaterTemp),
    missing_warning: "Выберите температуру или нажмите «Пропустить» ⛔",
    ..base(
        Step::Temp,
        Some(Step::Coords),
        Some(Step::Photos),
        InputKind::Single {
            field: DraftField::WaterTemp,
            accepts: is_water_temp,
        },
    )
};

const PHOTOS: StepSpec = StepSpec {
    clears_on_back: &[DraftField::Photos],
    ..base(Step::Photos, Some(Step::Temp), Some(Step::Comment), InputKind::Media)
};

const COMMENT: StepSpec = StepSpec {
    clears_on_back: &[DraftField::Comment],
    sub_entry: Some(SubEntry {
        option: COMMENT_WRITE,
        step: Step::CommentText,
    }),
    skip_option: Some(COMMENT_SKIP),
    ..base(Step::Comment, Some(Step::Photos), Some(Step::Author), InputKind::Entry)
};

const COMMENT_TEXT: StepSpec = base(
    Step::CommentText,
    Some(Step::Comment),
    None,
    InputKind::SubText {
        field: DraftField::Comment,
        rule: TextRule::NonEmpty {
            max_len: LONG_TEXT,
            warning: "Комментарий не может быть пустым ⛔",
        },
    },
);

const AUTHOR: StepSpec = StepSpec {
    clears_on_back: &[DraftField::Author],
    required: Some(DraftField::Author),
    missing_warning: "Введите корректный ник ⛔",
    ..base(
        Step::Author,
        Some(Step::Comment),
        Some(Step::Preview),
        InputKind::Text {
            field: DraftField::Author,
            rule: TextRule::NonEmpty {
                max_len: SHORT_TEXT,
                warning: "Введите корректный ник ⛔",
            },
        },
    )
};

const PREVIEW: StepSpec = base(
    Step::Preview,
    Some(Step::Author),
    Some(Step::Submitted),
    InputKind::Review,
);

const SUBMITTED: StepSpec = base(Step::Submitted, None, None, InputKind::Terminal);
const CANCELLED: StepSpec = base(Step::Cancelled, None, None, InputKind::Terminal);

/// Catalog entry of `step`.
pub fn spec(step: Step) -> &'static StepSpec {
    match step {
        Step::Greeting => &GREETING,
        Step::Location => &LOCATION,
        Step::PointType => &POINT_TYPE,
        Step::FishType => &FISH_TYPE,
        Step::FishTypeText => &FISH_TYPE_TEXT,
        Step::FishingType => &FISHING_TYPE,
        Step::Detail => &DETAIL,
        Step::Coords => &COORDS,
        Step::CoordsText => &COORDS_TEXT,
        Step::Temp => &TEMP,
        Step::Photos => &PHOTOS,
        Step::Comment => &COMMENT,
        Step::CommentText => &COMMENT_TEXT,
        Step::Author => &AUTHOR,
        Step::Preview => &PREVIEW,
        Step::Submitted => &SUBMITTED,
        Step::Cancelled => &CANCELLED,
    }
}

/// Whether `step` is a text sub-step of some parent.
pub fn is_sub_step(step: Step) -> bool {
    matches!(spec(step).input, InputKind::SubText { .. })
}

/// The steps undone by going back from `from` to `target`: every step
/// after `target` up to and including `from`, nearest first.
///
/// Returns `None` when `target` is not a predecessor of `from`.
pub fn steps_between(from: Step, target: Step) -> Option<Vec<Step>> {
    let mut undone = Vec::new();
    let mut current = from;
    while current != target {
        undone.push(current);
        current = spec(current).prev?;
    }
    if undone.is_empty() { None } else { Some(undone) }
}

//! Option catalogs: the codes a user can pick in selection steps and their
//! display names.
//!
//! Codes are stored in the draft verbatim. Lookups return `None` for codes
//! not present in the table so callers can fall back to the raw code, which
//! keeps drafts saved by a newer catalog renderable by an older one.

/// A selectable option: stable code plus human-readable label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogOption {
    pub code: &'static str,
    pub label: &'static str,
}

const fn opt(code: &'static str, label: &'static str) -> CatalogOption {
    CatalogOption { code, label }
}

/// Water bodies, in keyboard order.
pub const LOCATIONS: &[CatalogOption] = &[
    opt("oz_komarino", "оз. Комариное"),
    opt("oz_losinoe", "оз. Лосиное"),
    opt("r_vyunok", "р. Вьюнок"),
    opt("oz_stary_ostrog", "оз. Старый Острог"),
    opt("r_belaya", "р. Белая"),
    opt("oz_kuori", "оз. Куори"),
    opt("oz_medvezhye", "оз. Медвежье"),
    opt("r_volhov", "р. Волхов"),
    opt("r_severskiy_donets", "р. Северский Донец"),
    opt("r_sura", "р. Сура"),
    opt("ladoga", "Ладожское озеро"),
    opt("oz_yantarnoe", "оз. Янтарное"),
    opt("ladoga_arch", "Ладожский архипелаг"),
    opt("r_ahtuba", "р. Ахтуба"),
    opt("oz_mednoe", "оз. Медное"),
    opt("r_nizhnyaya_tunguska", "р. Нижняя Тунгуска"),
    opt("r_yama", "р. Яма"),
    opt("norwegian_sea", "Норвежское море"),
    opt("penalty_pond", "Штрафной пруд"),
];

pub const POINT_TYPES: &[CatalogOption] = &[
    opt("farm", "Фарм"),
    opt("trophy", "Трофей"),
    opt("vysek", "Высед"),
    opt("quest", "Задание"),
];

/// Fish names known to the renderer. Only `mix` is offered as a button;
/// anything else arrives as free text.
pub const FISH: &[CatalogOption] = &[
    opt("mix", "Разнорыбица"),
    opt("carp", "Карп"),
    opt("pike", "Щука"),
    opt("perch", "Окунь"),
    opt("bream", "Лещ"),
];

/// Fish codes offered on the keyboard.
pub const FISH_BUTTONS: &[&str] = &["mix"];

/// A fishing technique with its post label and follow-up question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FishingOption {
    pub code: &'static str,
    /// Keyboard label.
    pub label: &'static str,
    /// Label used in the rendered post; the detail value is appended to it.
    pub post_label: &'static str,
    /// Prompt asking for the technique-specific parameter.
    pub detail_prompt: &'static str,
}

pub const FISHING_TYPES: &[FishingOption] = &[
    FishingOption {
        code: "donka",
        label: "Донка",
        post_label: "Донка кл.",
        detail_prompt: "🎣 Укажите клипсу (например: 15 м.)",
    },
    FishingOption {
        code: "poplavok",
        label: "Поплавок",
        post_label: "Поплавок гл.",
        detail_prompt: "🎣 Укажите глубину (например: 150 см.)",
    },
    FishingOption {
        code: "spin",
        label: "Спиннинг",
        post_label: "Спиннинг ск.",
        detail_prompt: "🎣 Укажите скорость проводки (например: 15)",
    },
    FishingOption {
        code: "trol",
        label: "Троллинг",
        post_label: "Троллинг кл.",
        detail_prompt: "🎣 Укажите клипсу (например: 30 м.)",
    },
    FishingOption {
        code: "pilk",
        label: "Пилкинг",
        post_label: "Пилкинг",
        detail_prompt: "🎣 Укажите тип пилкинга (например: сильный)",
    },
];

/// Generic detail prompt for fishing codes missing from the table.
pub const DEFAULT_DETAIL_PROMPT: &str = "🎣 Укажите параметр:";

/// Code recorded when the user skips the temperature question.
pub const WATER_TEMP_ABSENT: &str = "absent";

/// Water temperature options, in keyboard order.
pub const WATER_TEMPS: &[CatalogOption] = &[
    opt("high", "Повышенная"),
    opt("low", "Пониженная"),
    opt("normal", "Нормальная"),
    opt(WATER_TEMP_ABSENT, "Пропустить"),
];

/// Label of `code` in `table`.
pub fn lookup(table: &[CatalogOption], code: &str) -> Option<&'static str> {
    table.iter().find(|o| o.code == code).map(|o| o.label)
}

pub fn location_name(code: &str) -> Option<&'static str> {
    lookup(LOCATIONS, code)
}

pub fn point_type_name(code: &str) -> Option<&'static str> {
    lookup(POINT_TYPES, code)
}

pub fn fish_name(code: &str) -> Option<&'static str> {
    lookup(FISH, code)
}

pub fn fishing_option(code: &str) -> Option<&'static FishingOption> {
    FISHING_TYPES.iter().find(|o| o.code == code)
}

/// Display name of a temperature code. The "absent" code has no display
/// name: it renders as nothing.
pub fn water_temp_name(code: &str) -> Option<&'static str> {
    if code == WATER_TEMP_ABSENT {
        return None;
    }
    lookup(WATER_TEMPS, code)
}

/// Whether `code` is a known option of the given table.
pub fn contains(table: &[CatalogOption], code: &str) -> bool {
    table.iter().any(|o| o.code == code)
}

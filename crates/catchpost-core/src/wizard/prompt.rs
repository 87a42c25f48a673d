//! Per-step prompt text and inline keyboards.
//!
//! `prompt` is a pure function of the step, the draft and the wizard
//! settings, so re-rendering a step always reflects exactly what is
//! persisted. Selected options are marked with a leading "✅ ".

use catchpost_types::catalog::{
    self, CatalogOption, DEFAULT_DETAIL_PROMPT, FISH, FISHING_TYPES, FISH_BUTTONS, LOCATIONS,
    POINT_TYPES, WATER_TEMPS,
};
use catchpost_types::config::WizardConfig;
use catchpost_types::draft::{Draft, FishChoice, MAX_PHOTOS};
use catchpost_types::event::Direction;
use catchpost_types::keyboard::{Button, CallbackData, Keyboard};
use catchpost_types::step::Step;

use super::steps::{self, COMMENT_SKIP, COMMENT_WRITE, COORDS_ENTER, FISH_CUSTOM};
use crate::render::render;

const GREETING_TEXT: &str = "🎣 Привет, рыбак!\n\
Добро пожаловать в место, где делятся удачей, опытом и самыми жирными трофеями!\n\n\
Здесь ты можешь:\n\
• Похвастаться своим уловом 🐟\n\
• Поделиться рабочей точкой для фарма 🎯\n\n\
Чтобы всё было по красоте, укажи:\n\
📍 Водоём и координаты\n\
🎣 Вид рыбы\n\
🖼️ Скриншоты (до 10 шт.)\n\
🧢 Твой игровой ник\n\n\
Огромное СПАСИБО за вклад в развитие канала!";

const PHOTOS_TEXT: &str = "📸 Шаг 7: Загрузите до 10 скриншотов.\n\n\
Скриншоты должны включать:\n\
• 🎯 Место ловли\n\
• 🎒 Садок\n\
• 🧂 Прикорм\n\
• 🗺 Карту точки\n\
• 🎣 Сборку с наживкой\n\n\
📤 Отправляйте скриншоты обычными сообщениями.\n\
🚫 Фотографии монитора не принимаются.\n\n\
Когда загрузите все изображения, нажмите «✅ Подтвердить».";

pub const SUBMITTED_TEXT: &str = "✅ Ваш пост отправлен на модерацию.";
pub const CANCELLED_TEXT: &str = "❌ Отправка поста отменена.\nЧтобы начать заново, отправьте /start.";

/// A rendered step: message text plus optional keyboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub text: String,
    pub controls: Option<Keyboard>,
}

impl Prompt {
    fn new(text: impl Into<String>, controls: Keyboard) -> Self {
        Self {
            text: text.into(),
            controls: Some(controls),
        }
    }

    fn bare(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            controls: None,
        }
    }
}

/// Render the prompt for `step` given the current draft.
pub fn prompt(step: Step, draft: &Draft, settings: &WizardConfig) -> Prompt {
    match step {
        Step::Greeting => {
            let mut keyboard = Keyboard::new().row(vec![Button::callback(
                "📮 Предложить пост",
                CallbackData::Navigate {
                    direction: Direction::Forward,
                    target: Step::Location,
                },
            )]);
            if let Some(url) = settings.search_url.as_deref().filter(|u| !u.is_empty()) {
                keyboard = keyboard.row(vec![Button::url("🔍 Поиск точки", url)]);
            }
            Prompt::new(GREETING_TEXT, keyboard)
        }
        Step::Location => Prompt::new(
            "📍 Шаг 1: Выберите водоём:",
            options_keyboard(step, LOCATIONS, |code| draft.location.as_deref() == Some(code)),
        ),
        Step::PointType => Prompt::new(
            "🎯 Шаг 2: Выберите тип точки (не более 2):",
            options_keyboard(step, POINT_TYPES, |code| {
                draft.point_types.iter().any(|c| c == code)
            }),
        ),
        Step::FishType => {
            let preset = |code: &str| {
                matches!(&draft.fish_type, Some(FishChoice::Preset(c)) if c == code)
            };
            let custom = matches!(draft.fish_type, Some(FishChoice::Custom(_)));
            let mut buttons: Vec<Button> = FISH
                .iter()
                .filter(|o| FISH_BUTTONS.contains(&o.code))
                .map(|o| select_button(step, o.code, o.label, preset(o.code)))
                .collect();
            buttons.push(select_button(step, FISH_CUSTOM, "Написать самому ✍️", custom));

            let chosen = match &draft.fish_type {
                Some(FishChoice::Custom(text)) => Some(text.as_str()),
                Some(FishChoice::Preset(code)) => Some(catalog::fish_name(code).unwrap_or(code)),
                None => None,
            };
            Prompt::new(
                with_current("🐟 Шаг 3: Выберите вид рыбы:", chosen),
                Keyboard::new().grid(buttons, 2).row(nav_row(step)),
            )
        }
        Step::FishTypeText => Prompt::new("✍️ Введите название рыбы:", back_only(step)),
        Step::FishingType => {
            let buttons = FISHING_TYPES
                .iter()
                .map(|o| {
                    select_button(step, o.code, o.label, draft.fishing_type.as_deref() == Some(o.code))
                })
                .collect();
            Prompt::new(
                "🎣 Шаг 4: Выберите тип ловли:",
                Keyboard::new().grid(buttons, 2).row(nav_row(step)),
            )
        }
        Step::Detail => {
            let question = draft
                .fishing_type
                .as_deref()
                .and_then(catalog::fishing_option)
                .map(|o| o.detail_prompt)
                .unwrap_or(DEFAULT_DETAIL_PROMPT);
            let text = match draft.fishing_extra.as_deref() {
                Some(value) => format!("✅ Сохранено: {value}\n\nТеперь нажмите «✅ Подтвердить», чтобы продолжить."),
                None => format!("Шаг 4.1: {question}"),
            };
            Prompt::new(text, Keyboard::new().row(nav_row(step)))
        }
        Step::Coords => {
            let text = match draft.coords.as_deref() {
                Some(value) => format!("✅ Координаты сохранены: {value}\n\nТеперь нажмите «✅ Подтвердить», чтобы продолжить."),
                None => "🗺 Шаг 5: Укажите координаты точки (например: 56:123).".to_string(),
            };
            let enter = select_button(step, COORDS_ENTER, "✍️ Ввести координаты", false);
            Prompt::new(text, Keyboard::new().row(vec![enter]).row(nav_row(step)))
        }
        Step::CoordsText => Prompt::new("📍 Введите координаты в формате 56:123:", back_only(step)),
        Step::Temp => Prompt::new(
            with_current(
                "🌡 Шаг 6: Укажите температуру воды:",
                draft.water_temp.as_deref().and_then(|code| catalog::lookup(WATER_TEMPS, code)),
            ),
            options_keyboard(step, WATER_TEMPS, |code| draft.water_temp.as_deref() == Some(code)),
        ),
        Step::Photos => {
            let text = if draft.photos.is_empty() {
                PHOTOS_TEXT.to_string()
            } else {
                format!("{PHOTOS_TEXT}\n\nЗагружено: {}/{MAX_PHOTOS}", draft.photos.len())
            };
            Prompt::new(text, Keyboard::new().row(nav_row(step)))
        }
        Step::Comment => {
            let text = match draft.comment.as_deref() {
                Some(comment) => format!("✅ Комментарий сохранён: {comment}\n\nНажмите «✅ Подтвердить», чтобы перейти к следующему шагу."),
                None => "📝 Шаг 8: Добавьте комментарий (необязательно):".to_string(),
            };
            let keyboard = Keyboard::new()
                .row(vec![select_button(step, COMMENT_WRITE, "✏️ Написать комментарий", false)])
                .row(vec![select_button(step, COMMENT_SKIP, "➡️ Пропустить", false)])
                .row(nav_row(step));
            Prompt::new(text, keyboard)
        }
        Step::CommentText => Prompt::new("Введите ваш комментарий:", back_only(step)),
        Step::Author => {
            let text = match draft.author.as_deref() {
                Some(nick) => format!("✅ Ник сохранён: {nick}\n\nТеперь нажмите «✅ Подтвердить», чтобы перейти к предпросмотру."),
                None => "👤 Шаг 9: Укажите свой игровой ник:".to_string(),
            };
            Prompt::new(text, Keyboard::new().row(nav_row(step)))
        }
        Step::Preview => {
            let mut text = format!("👀 Шаг 10: Предпросмотр:\n\n{}", render(draft));
            if !draft.photos.is_empty() {
                text.push_str(&format!("\n\n🖼 Скриншотов: {}", draft.photos.len()));
            }
            let keyboard = Keyboard::new()
                .row(vec![Button::callback(
                    "✅ Опубликовать (на модерацию)",
                    CallbackData::Navigate {
                        direction: Direction::Forward,
                        target: Step::Submitted,
                    },
                )])
                .row(vec![Button::callback("❌ Отмена", CallbackData::Cancel)])
                .row(nav_row(step));
            Prompt::new(text, keyboard)
        }
        Step::Submitted => Prompt::bare(SUBMITTED_TEXT),
        Step::Cancelled => Prompt::bare(CANCELLED_TEXT),
    }
}

/// Navigation row: back to the previous step and, for steps with a regular
/// successor, forward to it.
pub fn nav_row(step: Step) -> Vec<Button> {
    let spec = steps::spec(step);
    let mut row = Vec::with_capacity(2);
    if let Some(prev) = spec.prev {
        row.push(Button::callback(
            "⬅️ Назад",
            CallbackData::Navigate {
                direction: Direction::Back,
                target: prev,
            },
        ));
    }
    if let Some(next) = spec.next.filter(|n| !n.is_terminal()) {
        row.push(Button::callback(
            "✅ Подтвердить",
            CallbackData::Navigate {
                direction: Direction::Forward,
                target: next,
            },
        ));
    }
    row
}

fn back_only(step: Step) -> Keyboard {
    Keyboard::new().row(nav_row(step))
}

fn select_button(step: Step, code: &str, label: &str, selected: bool) -> Button {
    let label = if selected {
        format!("✅ {label}")
    } else {
        label.to_string()
    };
    Button::callback(
        label,
        CallbackData::Select {
            step,
            code: code.to_string(),
        },
    )
}

fn options_keyboard(
    step: Step,
    options: &[CatalogOption],
    is_selected: impl Fn(&str) -> bool,
) -> Keyboard {
    let buttons = options
        .iter()
        .map(|o| select_button(step, o.code, o.label, is_selected(o.code)))
        .collect();
    Keyboard::new().grid(buttons, 2).row(nav_row(step))
}

fn with_current(question: &str, current: Option<&str>) -> String {
    match current {
        Some(value) => format!("{question}\n\nВы выбрали: {value}"),
        None => question.to_string(),
    }
}

//! Wizard state machine.
//!
//! `WizardEngine::transition` is a pure function of the current step, the
//! inbound event and the draft. It returns the next step, the updated
//! draft, the UI actions to deliver, and an `Effect` telling the service
//! what to do with the stored record. Nothing here touches storage or the
//! network, so every rule is testable without fakes.

use catchpost_types::config::WizardConfig;
use catchpost_types::draft::{Draft, MAX_PHOTOS};
use catchpost_types::event::{Action, Direction, EventKind, InboundEvent};
use catchpost_types::ids::{MediaRef, UserId};
use catchpost_types::keyboard::Keyboard;
use catchpost_types::step::Step;

use super::draft_ext::{DraftExt, PhotoAdded, Toggle};
use super::prompt::{self, Prompt};
use super::steps::{self, InputKind};

pub const PRESS_START: &str = "Чтобы начать, отправьте /start.";
pub const ON_MODERATION: &str = "⏳ Ваш пост уже на модерации. Дождитесь решения модератора.";
pub const STALE_BUTTON: &str = "⚠️ Эта кнопка устарела. Продолжите с текущего шага.";
pub const USE_BUTTONS: &str = "Используйте кнопки ниже ⬇️";
pub const PHOTOS_NOT_EXPECTED: &str = "Сейчас скриншоты не нужны. Используйте кнопки ниже ⬇️";
pub const NOT_AN_IMAGE: &str = "⛔ Отправьте именно скриншот (фото).";
pub const SEND_AS_PHOTO: &str = "📸 Отправьте скриншот как фото.";

/// What the service must do with the stored record after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Nothing changed; do not write.
    Unchanged,
    /// Save the new step and draft.
    Persist,
    /// Delete the stored record.
    Discard,
    /// Hand the draft to moderation, then save it as submitted.
    Submit,
}

/// Result of applying one event.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub step: Step,
    pub draft: Draft,
    pub actions: Vec<Action>,
    pub effect: Effect,
}

impl Transition {
    fn unchanged(step: Step, draft: Draft, actions: Vec<Action>) -> Self {
        Self {
            step,
            draft,
            actions,
            effect: Effect::Unchanged,
        }
    }

    fn persist(step: Step, draft: Draft, actions: Vec<Action>) -> Self {
        Self {
            step,
            draft,
            actions,
            effect: Effect::Persist,
        }
    }
}

/// The wizard state machine.
#[derive(Debug, Clone, Default)]
pub struct WizardEngine {
    settings: WizardConfig,
}

impl WizardEngine {
    pub fn new(settings: WizardConfig) -> Self {
        Self { settings }
    }

    /// Render the prompt of `step` for `draft`.
    pub fn prompt(&self, step: Step, draft: &Draft) -> Prompt {
        prompt::prompt(step, draft, &self.settings)
    }

    /// Handle an event from a user who has no stored draft.
    pub fn without_draft(&self, event: &InboundEvent) -> Transition {
        match &event.kind {
            EventKind::Start { payload } => self.start(event.user_id, payload.as_deref()),
            _ => Transition::unchanged(
                Step::Greeting,
                Draft::default(),
                vec![notify(event.user_id, PRESS_START)],
            ),
        }
    }

    /// Apply `event` to a user whose stored record is at `step`.
    pub fn transition(&self, step: Step, event: &InboundEvent, draft: Draft) -> Transition {
        let user = event.user_id;
        match (&event.kind, step) {
            (EventKind::Start { payload }, _) => self.start(user, payload.as_deref()),
            (_, Step::Submitted) => {
                Transition::unchanged(step, draft, vec![notify(user, ON_MODERATION)])
            }
            (_, Step::Cancelled) => {
                Transition::unchanged(step, draft, vec![notify(user, PRESS_START)])
            }
            (EventKind::Cancel, _) => self.cancel(user),
            (
                EventKind::Navigation {
                    direction: Direction::Back,
                    target,
                },
                _,
            ) => self.back(user, step, *target, draft),
            (
                EventKind::Navigation {
                    direction: Direction::Forward,
                    target,
                },
                _,
            ) => self.forward(user, step, *target, draft),
            (EventKind::Selection { step_hint, option }, _) => {
                self.select(user, step, *step_hint, option, draft)
            }
            (EventKind::Text { text }, _) => self.text(user, step, text, draft),
            (
                EventKind::Media {
                    media_ref,
                    is_image,
                },
                _,
            ) => self.media(user, step, media_ref, *is_image, draft),
        }
    }

    /// `/start` always begins a fresh, empty draft. The `post` payload
    /// skips the greeting.
    fn start(&self, user: UserId, payload: Option<&str>) -> Transition {
        let step = match payload.map(str::trim) {
            Some("post") => Step::Location,
            _ => Step::Greeting,
        };
        let draft = Draft::default();
        let actions = vec![self.show(user, step, &draft)];
        Transition::persist(step, draft, actions)
    }

    fn cancel(&self, user: UserId) -> Transition {
        let draft = Draft::default();
        Transition {
            step: Step::Cancelled,
            actions: vec![self.show(user, Step::Cancelled, &draft)],
            draft,
            effect: Effect::Discard,
        }
    }

    fn back(&self, user: UserId, step: Step, target: Option<Step>, mut draft: Draft) -> Transition {
        let Some(prev) = steps::spec(step).prev else {
            return self.stale(user, step, draft);
        };
        let target = target.unwrap_or(prev);
        if target == step {
            return self.rerender(user, step, draft);
        }
        let Some(undone) = steps::steps_between(step, target) else {
            return self.stale(user, step, draft);
        };

        for undone_step in undone {
            for field in steps::spec(undone_step).clears_on_back {
                draft.clear(*field);
            }
        }
        let actions = vec![self.show(user, target, &draft)];
        Transition::persist(target, draft, actions)
    }

    fn forward(&self, user: UserId, step: Step, target: Option<Step>, draft: Draft) -> Transition {
        let spec = steps::spec(step);
        let Some(next) = spec.next else {
            return self.stale(user, step, draft);
        };
        match target {
            Some(t) if t == step => return self.rerender(user, step, draft),
            Some(t) if t != next => return self.stale(user, step, draft),
            _ => {}
        }

        if let Some(field) = spec.required {
            if !draft.has(field) {
                let actions = vec![
                    self.show(user, step, &draft),
                    notify(user, spec.missing_warning),
                ];
                return Transition::unchanged(step, draft, actions);
            }
        }

        let actions = vec![self.show(user, next, &draft)];
        if next == Step::Submitted {
            return Transition {
                step: next,
                draft,
                actions,
                effect: Effect::Submit,
            };
        }
        Transition::persist(next, draft, actions)
    }

    fn select(&self, user: UserId, step: Step, hint: Step, option: &str, mut draft: Draft) -> Transition {
        if hint != step {
            return self.stale(user, step, draft);
        }
        let spec = steps::spec(step);

        if let Some(entry) = spec.sub_entry.filter(|e| e.option == option) {
            let actions = vec![self.show(user, entry.step, &draft)];
            return Transition::persist(entry.step, draft, actions);
        }

        if let (Some(skip), Some(next)) = (spec.skip_option, spec.next) {
            if skip == option {
                for field in spec.clears_on_back {
                    draft.clear(*field);
                }
                let actions = vec![self.show(user, next, &draft)];
                return Transition::persist(next, draft, actions);
            }
        }

        match spec.input {
            InputKind::Single { field, accepts } if accepts(option) => {
                let mut updated = draft.clone();
                updated.select(field, option);
                self.refresh(user, step, &draft, updated)
            }
            InputKind::Multi { accepts, max } if accepts(option) => {
                let mut updated = draft.clone();
                match updated.toggle_point_type(option, max) {
                    Toggle::LimitReached => Transition::unchanged(
                        step,
                        draft,
                        vec![notify(user, format!("Можно выбрать не более {max} типов."))],
                    ),
                    Toggle::Selected | Toggle::Deselected => self.refresh(user, step, &draft, updated),
                }
            }
            _ => self.stale(user, step, draft),
        }
    }

    fn text(&self, user: UserId, step: Step, text: &str, mut draft: Draft) -> Transition {
        let spec = steps::spec(step);
        let (field, rule, land_on) = match spec.input {
            InputKind::Text { field, rule } => (field, rule, step),
            InputKind::SubText { field, rule } => match spec.prev {
                Some(parent) => (field, rule, parent),
                None => return self.stale(user, step, draft),
            },
            InputKind::Media => {
                return Transition::unchanged(step, draft, vec![notify(user, SEND_AS_PHOTO)]);
            }
            _ => return Transition::unchanged(step, draft, vec![notify(user, USE_BUTTONS)]),
        };

        match rule.apply(text) {
            Ok(value) => {
                draft.set_text(field, value);
                let actions = vec![self.show(user, land_on, &draft)];
                Transition::persist(land_on, draft, actions)
            }
            Err(warning) => Transition::unchanged(step, draft, vec![notify(user, warning)]),
        }
    }

    fn media(&self, user: UserId, step: Step, media: &MediaRef, is_image: bool, mut draft: Draft) -> Transition {
        if !matches!(steps::spec(step).input, InputKind::Media) {
            return Transition::unchanged(step, draft, vec![notify(user, PHOTOS_NOT_EXPECTED)]);
        }
        if !is_image {
            return Transition::unchanged(step, draft, vec![notify(user, NOT_AN_IMAGE)]);
        }

        match draft.add_photo(media.clone()) {
            PhotoAdded::Added(count) => {
                let actions = vec![Action::ShowPrompt {
                    user_id: user,
                    text: format!(
                        "✅ Скриншот добавлен ({count}/{MAX_PHOTOS}).\nКогда закончите, нажмите «✅ Подтвердить»."
                    ),
                    controls: Some(Keyboard::new().row(prompt::nav_row(step))),
                }];
                Transition::persist(step, draft, actions)
            }
            PhotoAdded::Duplicate => Transition::unchanged(step, draft, Vec::new()),
            PhotoAdded::LimitReached => Transition::unchanged(
                step,
                draft,
                vec![notify(
                    user,
                    format!(
                        "📸 Вы уже загрузили {MAX_PHOTOS} скриншотов, это максимум.\nНажмите «✅ Подтвердить», чтобы продолжить."
                    ),
                )],
            ),
        }
    }

    /// Persist a selection and update the step's message: only the keyboard
    /// when the prompt text is unaffected, otherwise the whole prompt.
    fn refresh(&self, user: UserId, step: Step, before: &Draft, after: Draft) -> Transition {
        if *before == after {
            return Transition::unchanged(step, after, Vec::new());
        }
        let old = self.prompt(step, before);
        let new = self.prompt(step, &after);
        let action = match new.controls {
            Some(controls) if old.text == new.text => Action::UpdateControls {
                user_id: user,
                controls,
            },
            controls => Action::ShowPrompt {
                user_id: user,
                text: new.text,
                controls,
            },
        };
        Transition::persist(step, after, vec![action])
    }

    fn rerender(&self, user: UserId, step: Step, draft: Draft) -> Transition {
        let actions = vec![self.show(user, step, &draft)];
        Transition::unchanged(step, draft, actions)
    }

    fn stale(&self, user: UserId, step: Step, draft: Draft) -> Transition {
        let actions = vec![self.show(user, step, &draft), notify(user, STALE_BUTTON)];
        Transition::unchanged(step, draft, actions)
    }

    fn show(&self, user: UserId, step: Step, draft: &Draft) -> Action {
        let Prompt { text, controls } = self.prompt(step, draft);
        Action::ShowPrompt {
            user_id: user,
            text,
            controls,
        }
    }
}

fn notify(user: UserId, text: impl Into<String>) -> Action {
    Action::Notify {
        user_id: user,
        text: text.into(),
    }
}

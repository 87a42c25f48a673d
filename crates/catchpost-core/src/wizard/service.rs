//! Wizard service.
//!
//! Handles one inbound event end to end under the user's lock: load the
//! stored record, run the engine, write the result back, then deliver the
//! UI actions. The record is written before anything is shown, so a crash
//! never leaves the user looking at a step that was not persisted.

use std::sync::Arc;

use catchpost_types::config::WizardConfig;
use catchpost_types::draft::DraftRecord;
use catchpost_types::error::WizardError;
use catchpost_types::event::{Action, InboundEvent};
use catchpost_types::ids::UserId;
use catchpost_types::step::Step;
use tracing::{debug, error, info};

use super::engine::{Effect, Transition, WizardEngine};
use crate::moderation::ModerationCoordinator;
use crate::storage::draft_store::DraftStore;
use crate::sync::UserLocks;
use crate::transport::Messenger;
use crate::transport::delivery::deliver;

pub const SUBMIT_FAILED: &str = "❗ Не удалось отправить пост на модерацию. Попробуйте ещё раз позже.";

/// Drives the wizard for all users.
///
/// Generic over `DraftStore` and `Messenger` so catchpost-core never
/// depends on catchpost-infra.
pub struct WizardService<S: DraftStore, M: Messenger> {
    store: Arc<S>,
    messenger: Arc<M>,
    locks: Arc<UserLocks>,
    moderation: Arc<ModerationCoordinator<S, M>>,
    engine: WizardEngine,
}

impl<S: DraftStore, M: Messenger> WizardService<S, M> {
    pub fn new(
        store: Arc<S>,
        messenger: Arc<M>,
        locks: Arc<UserLocks>,
        moderation: Arc<ModerationCoordinator<S, M>>,
        settings: WizardConfig,
    ) -> Self {
        Self {
            store,
            messenger,
            locks,
            moderation,
            engine: WizardEngine::new(settings),
        }
    }

    pub fn engine(&self) -> &WizardEngine {
        &self.engine
    }

    /// Apply one event and return the step the user ends up on.
    ///
    /// Storage failures abort before anything is shown. Delivery failures
    /// are reported after the new state has been saved.
    #[tracing::instrument(
        name = "wizard_event",
        skip(self, event),
        fields(user_id = %event.user_id, event = event.kind.name())
    )]
    pub async fn handle(&self, event: InboundEvent) -> Result<Step, WizardError> {
        let user_id = event.user_id;
        let _guard = self.locks.acquire(user_id).await;

        let record = self.store.load(user_id).await?;
        let from = record.as_ref().map(|r| r.step);
        let mut transition = match record {
            Some(record) => self.engine.transition(record.step, &event, record.draft),
            None => self.engine.without_draft(&event),
        };
        debug!(from = ?from, to = %transition.step, effect = ?transition.effect, "Wizard transition");

        match transition.effect {
            Effect::Unchanged => {}
            Effect::Persist => {
                let record = DraftRecord::new(user_id, transition.step, transition.draft.clone());
                self.store.save(&record).await?;
            }
            Effect::Discard => {
                self.store.delete(user_id).await?;
                info!("Draft discarded");
            }
            Effect::Submit => {
                transition = self.submit(user_id, transition).await?;
            }
        }

        deliver(
            self.messenger.as_ref(),
            event.origin.as_ref(),
            event.callback_id.as_deref(),
            transition.actions,
        )
        .await?;

        Ok(transition.step)
    }

    /// Mark the draft submitted, then forward it for review. If forwarding
    /// fails the record goes back to the preview and the user is asked to
    /// retry.
    ///
    /// Every review message has a `Submitted` record behind it.
    async fn submit(&self, user_id: UserId, transition: Transition) -> Result<Transition, WizardError> {
        let submitted = DraftRecord::new(user_id, Step::Submitted, transition.draft.clone());
        self.store.save(&submitted).await?;

        match self.moderation.submit(user_id, &transition.draft).await {
            Ok(_) => {
                info!("Draft submitted for moderation");
                Ok(transition)
            }
            Err(e) => {
                error!(error = %e, "Failed to forward draft for review");
                let preview = DraftRecord::new(user_id, Step::Preview, transition.draft.clone());
                self.store.save(&preview).await?;
                Ok(Transition {
                    step: Step::Preview,
                    draft: transition.draft,
                    actions: vec![Action::Notify {
                        user_id,
                        text: SUBMIT_FAILED.to_string(),
                    }],
                    effect: Effect::Unchanged,
                })
            }
        }
    }
}

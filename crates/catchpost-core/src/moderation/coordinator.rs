//! Moderation coordinator.
//!
//! Bridges a submitted draft to the moderator chat and carries out the
//! moderator's decision. Approve and reject run under the same per-user
//! lock as the wizard and act only on drafts whose persisted step is
//! `Submitted`. Approval deletes the draft before publishing, so no retry
//! publishes the same submission twice.

use std::sync::Arc;

use catchpost_types::config::ModerationConfig;
use catchpost_types::draft::Draft;
use catchpost_types::error::{ModerationError, TransportError};
use catchpost_types::event::{ModerationDecision, ModerationEvent};
use catchpost_types::ids::{ChatId, MediaRef, MessageRef, UserId};
use catchpost_types::keyboard::{Button, CallbackData, Keyboard};
use catchpost_types::step::Step;
use tracing::{error, info, warn};

use crate::render::{author_label, render, render_publication};
use crate::storage::draft_store::DraftStore;
use crate::sync::UserLocks;
use crate::transport::Messenger;

pub const USER_PUBLISHED: &str = "✅ Ваш пост опубликован.";
pub const USER_REJECTED: &str = "❌ Ваш пост отклонён модератором.";
pub const TICKET_APPROVED: &str = "✅ Пост одобрен и опубликован.";
pub const TICKET_REJECTED: &str = "🚫 Отклонено модератором.";

/// Where submissions go and how publications end.
#[derive(Debug, Clone, Default)]
pub struct ModerationSettings {
    pub moderator_chat: Option<ChatId>,
    pub channel: Option<ChatId>,
    pub call_to_action: String,
}

impl From<&ModerationConfig> for ModerationSettings {
    fn from(config: &ModerationConfig) -> Self {
        Self {
            moderator_chat: config.moderator_chat_id.map(ChatId),
            channel: config.channel_id.map(ChatId),
            call_to_action: config.call_to_action.clone(),
        }
    }
}

/// Outcome of a moderator decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Published,
    Rejected,
    /// No submitted draft for the user; an earlier decision or a restart
    /// by the author got there first.
    AlreadyResolved,
    /// The decision did not come from the moderator chat.
    Unauthorized,
}

pub struct ModerationCoordinator<S: DraftStore, M: Messenger> {
    store: Arc<S>,
    messenger: Arc<M>,
    locks: Arc<UserLocks>,
    tickets: super::ModerationTickets,
    settings: ModerationSettings,
}

impl<S: DraftStore, M: Messenger> ModerationCoordinator<S, M> {
    pub fn new(store: Arc<S>, messenger: Arc<M>, locks: Arc<UserLocks>, settings: ModerationSettings) -> Self {
        Self {
            store,
            messenger,
            locks,
            tickets: super::ModerationTickets::new(),
            settings,
        }
    }

    pub fn settings(&self) -> &ModerationSettings {
        &self.settings
    }

    pub fn tickets(&self) -> &super::ModerationTickets {
        &self.tickets
    }

    /// Forward `draft` to the moderator chat and record the ticket.
    ///
    /// Called by the wizard while it holds the user's lock; does not lock.
    pub async fn submit(&self, user_id: UserId, draft: &Draft) -> Result<MessageRef, ModerationError> {
        let chat = self
            .settings
            .moderator_chat
            .ok_or(ModerationError::NotConfigured("moderator chat"))?;

        let ticket = self
            .forward_for_review(chat, user_id, author_label(draft), &render(draft), &draft.photos)
            .await?;
        self.tickets.record(user_id, ticket);

        info!(user_id = %user_id, photos = draft.photos.len(), "Draft forwarded for review");
        Ok(ticket)
    }

    /// Send the post to `chat`, followed by the approve/reject control
    /// message. Returns the control message.
    pub async fn forward_for_review(
        &self,
        chat: ChatId,
        user_id: UserId,
        author: &str,
        text: &str,
        media: &[MediaRef],
    ) -> Result<MessageRef, TransportError> {
        self.send_post(chat, text, media).await?;

        let controls = Keyboard::new().row(vec![
            Button::callback(
                "👍 Одобрить",
                CallbackData::Moderate {
                    decision: ModerationDecision::Approve,
                    user_id,
                },
            ),
            Button::callback(
                "🚫 Отклонить",
                CallbackData::Moderate {
                    decision: ModerationDecision::Reject,
                    user_id,
                },
            ),
        ]);
        self.messenger
            .send_text(chat, &format!("👤 Автор: {author}\n\nОдобрить пост?"), Some(&controls))
            .await
    }

    /// Replace the control message text, removing its buttons.
    pub async fn update_review_message(&self, ticket: &MessageRef, text: &str) -> Result<(), TransportError> {
        self.messenger.edit_message(ticket, text, None).await
    }

    /// Publish `text` with `media` to the public channel.
    pub async fn publish(&self, text: &str, media: &[MediaRef]) -> Result<(), ModerationError> {
        let channel = self
            .settings
            .channel
            .ok_or(ModerationError::NotConfigured("public channel"))?;
        self.send_post(channel, text, media).await?;
        Ok(())
    }

    /// Apply a moderator button press: check it came from the moderator
    /// chat, carry out the decision, and answer the press.
    pub async fn resolve(&self, event: &ModerationEvent) -> Result<Resolution, ModerationError> {
        if self.settings.moderator_chat != Some(event.chat_id) {
            warn!(
                chat_id = %event.chat_id,
                target = %event.target,
                "Moderation decision from outside the moderator chat ignored"
            );
            self.acknowledge(event, Some("⛔ Недостаточно прав."), true).await;
            return Ok(Resolution::Unauthorized);
        }

        let result = match event.decision {
            ModerationDecision::Approve => self.approve(event.target, event.origin).await,
            ModerationDecision::Reject => self.reject(event.target, event.origin).await,
        };

        let (text, alert) = match &result {
            Ok(Resolution::Published) => ("Опубликовано ✅", false),
            Ok(Resolution::Rejected) => ("Отклонено 🚫", false),
            Ok(Resolution::AlreadyResolved | Resolution::Unauthorized) => ("Уже обработано.", false),
            Err(_) => ("❗ Не удалось выполнить действие. Попробуйте ещё раз.", true),
        };
        self.acknowledge(event, Some(text), alert).await;
        result
    }

    /// Retire the user's submitted draft, publish it, notify the user, and
    /// close the ticket.
    ///
    /// The draft is deleted before publishing, so a post goes out at most
    /// once per submission. If publishing fails the record is written back
    /// and the ticket left open so the moderator can retry.
    pub async fn approve(&self, user_id: UserId, origin: Option<MessageRef>) -> Result<Resolution, ModerationError> {
        let _guard = self.locks.acquire(user_id).await;

        let Some(record) = self.store.load(user_id).await? else {
            info!(user_id = %user_id, "Approve for missing draft, already resolved");
            return Ok(Resolution::AlreadyResolved);
        };
        if record.step != Step::Submitted {
            info!(user_id = %user_id, step = %record.step, "Approve for draft not under review, ignoring");
            return Ok(Resolution::AlreadyResolved);
        }

        if self.settings.channel.is_none() {
            return Err(ModerationError::NotConfigured("public channel"));
        }
        self.store.delete(user_id).await?;

        let text = render_publication(&record.draft, &self.settings.call_to_action);
        if let Err(e) = self.publish(&text, &record.draft.photos).await {
            error!(user_id = %user_id, error = %e, "Failed to publish approved post");
            if let Err(restore) = self.store.save(&record).await {
                error!(user_id = %user_id, error = %restore, "Failed to restore draft after publish failure");
            }
            return Err(e);
        }
        info!(user_id = %user_id, "Post published");

        if let Err(e) = self
            .messenger
            .send_text(ChatId::from(user_id), USER_PUBLISHED, None)
            .await
        {
            warn!(user_id = %user_id, error = %e, "Failed to notify author of publication");
        }
        self.close_ticket(user_id, origin, TICKET_APPROVED).await;

        Ok(Resolution::Published)
    }

    /// Delete the user's submitted draft, notify the user, and close the
    /// ticket.
    pub async fn reject(&self, user_id: UserId, origin: Option<MessageRef>) -> Result<Resolution, ModerationError> {
        let _guard = self.locks.acquire(user_id).await;

        let Some(record) = self.store.load(user_id).await? else {
            info!(user_id = %user_id, "Reject for missing draft, already resolved");
            return Ok(Resolution::AlreadyResolved);
        };
        if record.step != Step::Submitted {
            info!(user_id = %user_id, step = %record.step, "Reject for draft not under review, ignoring");
            return Ok(Resolution::AlreadyResolved);
        }

        self.store.delete(user_id).await?;
        info!(user_id = %user_id, "Submission rejected");

        if let Err(e) = self
            .messenger
            .send_text(ChatId::from(user_id), USER_REJECTED, None)
            .await
        {
            warn!(user_id = %user_id, error = %e, "Failed to notify author of rejection");
        }
        self.close_ticket(user_id, origin, TICKET_REJECTED).await;

        Ok(Resolution::Rejected)
    }

    async fn close_ticket(&self, user_id: UserId, origin: Option<MessageRef>, text: &str) {
        let Some(ticket) = self.tickets.take(user_id).or(origin) else {
            return;
        };
        if let Err(e) = self.update_review_message(&ticket, text).await {
            warn!(user_id = %user_id, error = %e, "Failed to update moderation message");
        }
    }

    async fn acknowledge(&self, event: &ModerationEvent, text: Option<&str>, alert: bool) {
        let Some(id) = event.callback_id.as_deref() else {
            return;
        };
        if let Err(e) = self.messenger.answer_callback(id, text, alert).await {
            warn!(error = %e, "Failed to acknowledge moderation callback");
        }
    }

    /// Send a post in the shape its media dictates: text alone, one photo
    /// with a caption, or a photo group captioned on the first photo.
    async fn send_post(&self, chat: ChatId, text: &str, media: &[MediaRef]) -> Result<(), TransportError> {
        match media {
            [] => self.messenger.send_text(chat, text, None).await.map(|_| ()),
            [photo] => self.messenger.send_photo(chat, photo, text).await.map(|_| ()),
            photos => self
                .messenger
                .send_photo_group(chat, photos, text)
                .await
                .map(|_| ()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{CHANNEL, CTA, Harness, MOD_CHAT, Sent};
    use catchpost_types::draft::{DraftRecord, FishChoice};

    const AUTHOR: UserId = UserId(555);

    fn submitted_draft(photos: usize) -> Draft {
        Draft {
            location: Some("ladoga".to_string()),
            point_types: vec!["farm".to_string()],
            fish_type: Some(FishChoice::Preset("mix".to_string())),
            fishing_type: Some("spin".to_string()),
            fishing_extra: Some("15".to_string()),
            coords: Some("56:123".to_string()),
            water_temp: Some("normal".to_string()),
            photos: (0..photos).map(|i| MediaRef::new(format!("ph{i}"))).collect(),
            comment: None,
            author: Some("Vasya".to_string()),
        }
    }

    async fn seed_submitted(h: &Harness, photos: usize) -> MessageRef {
        let draft = submitted_draft(photos);
        let ticket = h.moderation.submit(AUTHOR, &draft).await.unwrap();
        h.store.insert(DraftRecord::new(AUTHOR, Step::Submitted, draft));
        ticket
    }

    fn decision(decision: ModerationDecision, chat: ChatId) -> ModerationEvent {
        ModerationEvent {
            decision,
            target: AUTHOR,
            chat_id: chat,
            origin: None,
            callback_id: Some("mod-cb".to_string()),
        }
    }

    #[tokio::test]
    async fn test_submit_shapes_by_photo_count() {
        for (photos, expect_group, expect_photo) in [(0, false, false), (1, false, true), (3, true, false)] {
            let h = Harness::new();
            seed_submitted(&h, photos).await;
            let sent = h.messenger.to_chat(MOD_CHAT);
            assert_eq!(sent.len(), 2, "post plus control message");
            assert_eq!(matches!(sent[0], Sent::Group { .. }), expect_group);
            assert_eq!(matches!(sent[0], Sent::Photo { .. }), expect_photo);
            assert!(sent[0].text().unwrap().contains("📍 Водоём: #ладожское_озеро"));
            match &sent[1] {
                Sent::Text { text, keyboard, .. } => {
                    assert_eq!(text, "👤 Автор: Vasya\n\nОдобрить пост?");
                    let data: Vec<String> = keyboard
                        .as_ref()
                        .unwrap()
                        .buttons()
                        .map(|b| match &b.action {
                            catchpost_types::keyboard::ButtonAction::Callback(d) => d.to_string(),
                            catchpost_types::keyboard::ButtonAction::Url(u) => u.clone(),
                        })
                        .collect();
                    assert_eq!(data, vec!["mod:ok:555", "mod:no:555"]);
                }
                other => panic!("unexpected control message {other:?}"),
            }
            assert!(h.moderation.tickets().get(AUTHOR).is_some());
        }
    }

    #[tokio::test]
    async fn test_submit_without_moderator_chat_fails() {
        let h = Harness::with_settings(ModerationSettings {
            moderator_chat: None,
            channel: Some(CHANNEL),
            call_to_action: CTA.to_string(),
        });
        let err = h.moderation.submit(AUTHOR, &submitted_draft(0)).await.unwrap_err();
        assert!(matches!(err, ModerationError::NotConfigured(_)));
        assert!(h.messenger.sent().is_empty());
    }

    #[tokio::test]
    async fn test_approve_publishes_once_and_cleans_up() {
        let h = Harness::new();
        let ticket = seed_submitted(&h, 2).await;
        h.messenger.clear();

        let first = h.moderation.resolve(&decision(ModerationDecision::Approve, MOD_CHAT)).await.unwrap();
        assert_eq!(first, Resolution::Published);

        let published = h.messenger.to_chat(CHANNEL);
        assert_eq!(published.len(), 1);
        match &published[0] {
            Sent::Group { photos, caption, .. } => {
                assert_eq!(photos.len(), 2);
                assert!(caption.ends_with(&format!("\n\n{CTA}")));
            }
            other => panic!("expected photo group, got {other:?}"),
        }
        assert!(h.store.get(AUTHOR).is_none());
        assert!(h.moderation.tickets().get(AUTHOR).is_none());
        assert!(h
            .messenger
            .to_chat(ChatId::from(AUTHOR))
            .iter()
            .any(|s| s.text() == Some(USER_PUBLISHED)));
        assert!(h.messenger.sent().iter().any(|s| matches!(
            s,
            Sent::Edit { message, text, keyboard: None } if *message == ticket && text == TICKET_APPROVED
        )));

        let second = h.moderation.resolve(&decision(ModerationDecision::Approve, MOD_CHAT)).await.unwrap();
        assert_eq!(second, Resolution::AlreadyResolved);
        assert_eq!(h.messenger.to_chat(CHANNEL).len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_approvals_publish_once() {
        let h = Harness::new();
        seed_submitted(&h, 0).await;

        let a = decision(ModerationDecision::Approve, MOD_CHAT);
        let b = decision(ModerationDecision::Approve, MOD_CHAT);
        let (ra, rb) = tokio::join!(h.moderation.resolve(&a), h.moderation.resolve(&b));
        let mut outcomes = vec![ra.unwrap(), rb.unwrap()];
        outcomes.sort_by_key(|r| *r == Resolution::Published);
        assert_eq!(outcomes, vec![Resolution::AlreadyResolved, Resolution::Published]);
        assert_eq!(h.messenger.to_chat(CHANNEL).len(), 1);
    }

    #[tokio::test]
    async fn test_approve_then_reject_is_noop() {
        let h = Harness::new();
        seed_submitted(&h, 0).await;
        h.moderation.approve(AUTHOR, None).await.unwrap();
        let rejected = h.moderation.reject(AUTHOR, None).await.unwrap();
        assert_eq!(rejected, Resolution::AlreadyResolved);
        assert!(!h
            .messenger
            .to_chat(ChatId::from(AUTHOR))
            .iter()
            .any(|s| s.text() == Some(USER_REJECTED)));
    }

    #[tokio::test]
    async fn test_reject_deletes_without_publishing() {
        let h = Harness::new();
        seed_submitted(&h, 1).await;
        let result = h.moderation.resolve(&decision(ModerationDecision::Reject, MOD_CHAT)).await.unwrap();
        assert_eq!(result, Resolution::Rejected);
        assert!(h.store.get(AUTHOR).is_none());
        assert!(h.messenger.to_chat(CHANNEL).is_empty());
        assert!(h.messenger.sent().iter().any(|s| s.text() == Some(TICKET_REJECTED)));
        assert!(h.messenger.sent().iter().any(|s| s.text() == Some(USER_REJECTED)));
    }

    #[tokio::test]
    async fn test_publish_failure_keeps_draft_and_ticket() {
        let h = Harness::new();
        let ticket = seed_submitted(&h, 0).await;
        h.messenger.fail_chat(CHANNEL);

        let err = h.moderation.resolve(&decision(ModerationDecision::Approve, MOD_CHAT)).await;
        assert!(matches!(err, Err(ModerationError::Transport(_))));
        assert_eq!(h.store.get(AUTHOR).map(|r| r.step), Some(Step::Submitted));
        assert_eq!(h.moderation.tickets().get(AUTHOR), Some(ticket));
        assert!(!h.messenger.sent().iter().any(|s| s.text() == Some(TICKET_APPROVED)));
        assert!(h.messenger.answers().iter().any(|s| matches!(s, Sent::Answer { alert: true, .. })));

        h.messenger.heal_chat(CHANNEL);
        let retry = h.moderation.resolve(&decision(ModerationDecision::Approve, MOD_CHAT)).await.unwrap();
        assert_eq!(retry, Resolution::Published);
        assert_eq!(h.messenger.to_chat(CHANNEL).len(), 1);
    }

    #[tokio::test]
    async fn test_failed_retirement_publishes_nothing() {
        let h = Harness::new();
        let ticket = seed_submitted(&h, 0).await;
        h.store.set_failing_deletes(true);

        let err = h.moderation.resolve(&decision(ModerationDecision::Approve, MOD_CHAT)).await;
        assert!(matches!(err, Err(ModerationError::Storage(_))));
        assert!(h.messenger.to_chat(CHANNEL).is_empty());
        assert_eq!(h.store.get(AUTHOR).map(|r| r.step), Some(Step::Submitted));
        assert_eq!(h.moderation.tickets().get(AUTHOR), Some(ticket));

        h.store.set_failing_deletes(false);
        let retry = h.moderation.resolve(&decision(ModerationDecision::Approve, MOD_CHAT)).await.unwrap();
        assert_eq!(retry, Resolution::Published);
        let again = h.moderation.resolve(&decision(ModerationDecision::Approve, MOD_CHAT)).await.unwrap();
        assert_eq!(again, Resolution::AlreadyResolved);
        assert_eq!(h.messenger.to_chat(CHANNEL).len(), 1);
    }

    #[tokio::test]
    async fn test_approve_without_channel_keeps_draft() {
        let h = Harness::with_settings(ModerationSettings {
            moderator_chat: Some(MOD_CHAT),
            channel: None,
            call_to_action: CTA.to_string(),
        });
        seed_submitted(&h, 0).await;
        let err = h.moderation.approve(AUTHOR, None).await.unwrap_err();
        assert!(matches!(err, ModerationError::NotConfigured("public channel")));
        assert!(h.store.get(AUTHOR).is_some());
    }

    #[tokio::test]
    async fn test_decision_from_other_chat_is_ignored() {
        let h = Harness::new();
        seed_submitted(&h, 0).await;
        let result = h.moderation.resolve(&decision(ModerationDecision::Approve, ChatId(999))).await.unwrap();
        assert_eq!(result, Resolution::Unauthorized);
        assert!(h.messenger.to_chat(CHANNEL).is_empty());
        assert!(h.store.get(AUTHOR).is_some());
    }

    #[tokio::test]
    async fn test_restarted_draft_is_left_alone() {
        let h = Harness::new();
        seed_submitted(&h, 0).await;
        h.store.insert(DraftRecord::new(AUTHOR, Step::Location, Draft::default()));

        let result = h.moderation.approve(AUTHOR, None).await.unwrap();
        assert_eq!(result, Resolution::AlreadyResolved);
        assert_eq!(h.store.get(AUTHOR).map(|r| r.step), Some(Step::Location));
        assert!(h.messenger.to_chat(CHANNEL).is_empty());
    }

    #[tokio::test]
    async fn test_origin_used_when_ticket_missing() {
        let store = {
            let h = Harness::new();
            seed_submitted(&h, 0).await;
            Arc::clone(&h.store)
        };
        let restarted = Harness::over(
            store,
            ModerationSettings {
                moderator_chat: Some(MOD_CHAT),
                channel: Some(CHANNEL),
                call_to_action: CTA.to_string(),
            },
        );
        let origin = MessageRef::new(MOD_CHAT, 4242);
        restarted.moderation.reject(AUTHOR, Some(origin)).await.unwrap();
        assert!(restarted.messenger.sent().iter().any(|s| matches!(
            s,
            Sent::Edit { message, .. } if *message == origin
        )));
    }
}

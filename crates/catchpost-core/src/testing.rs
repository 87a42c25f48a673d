//! In-memory fakes for the core ports, used by unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

use catchpost_types::draft::{DraftRecord, DraftSummary};
use catchpost_types::error::{RepositoryError, TransportError};
use catchpost_types::ids::{ChatId, MediaRef, MessageRef, UserId};
use catchpost_types::keyboard::Keyboard;
use catchpost_types::step::Step;

use crate::moderation::{ModerationCoordinator, ModerationSettings};
use crate::storage::draft_store::DraftStore;
use crate::sync::UserLocks;
use crate::transport::Messenger;

pub const MOD_CHAT: ChatId = ChatId(-100);
pub const CHANNEL: ChatId = ChatId(-200);
pub const CTA: &str = "📨 ПРЕДЛОЖИТЬ ПОСТ";

/// HashMap-backed draft store with failure injection.
#[derive(Default)]
pub struct InMemoryDraftStore {
    records: Mutex<HashMap<UserId, DraftRecord>>,
    failing: AtomicBool,
    failing_step: Mutex<Option<Step>>,
    failing_deletes: AtomicBool,
}

impl InMemoryDraftStore {
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Fail only saves of records at `step`.
    pub fn fail_saves_at(&self, step: Option<Step>) {
        *self.failing_step.lock().unwrap() = step;
    }

    pub fn set_failing_deletes(&self, failing: bool) {
        self.failing_deletes.store(failing, Ordering::SeqCst);
    }

    pub fn get(&self, user_id: UserId) -> Option<DraftRecord> {
        self.records.lock().unwrap().get(&user_id).cloned()
    }

    pub fn insert(&self, record: DraftRecord) {
        self.records.lock().unwrap().insert(record.user_id, record);
    }

    fn check(&self) -> Result<(), RepositoryError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(RepositoryError::Query("injected failure".to_string()))
        } else {
            Ok(())
        }
    }
}

impl DraftStore for InMemoryDraftStore {
    async fn save(&self, record: &DraftRecord) -> Result<(), RepositoryError> {
        self.check()?;
        if *self.failing_step.lock().unwrap() == Some(record.step) {
            return Err(RepositoryError::Query(format!("injected failure saving {}", record.step)));
        }
        let mut records = self.records.lock().unwrap();
        let mut record = record.clone();
        if let Some(existing) = records.get(&record.user_id) {
            record.created_at = existing.created_at;
        }
        records.insert(record.user_id, record);
        Ok(())
    }

    async fn load(&self, user_id: UserId) -> Result<Option<DraftRecord>, RepositoryError> {
        self.check()?;
        Ok(self.get(user_id))
    }

    async fn delete(&self, user_id: UserId) -> Result<(), RepositoryError> {
        self.check()?;
        if self.failing_deletes.load(Ordering::SeqCst) {
            return Err(RepositoryError::Query("injected failure deleting".to_string()));
        }
        self.records.lock().unwrap().remove(&user_id);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<DraftSummary>, RepositoryError> {
        self.check()?;
        let mut summaries: Vec<DraftSummary> = self
            .records
            .lock()
            .unwrap()
            .values()
            .map(|r| DraftSummary {
                user_id: r.user_id,
                step: r.step,
                author: r.draft.author.clone(),
                photo_count: r.draft.photos.len(),
                updated_at: r.updated_at,
            })
            .collect();
        summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(summaries)
    }
}

/// One recorded messenger call.
#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
    Text {
        chat: ChatId,
        text: String,
        keyboard: Option<Keyboard>,
    },
    Photo {
        chat: ChatId,
        photo: MediaRef,
        caption: String,
    },
    Group {
        chat: ChatId,
        photos: Vec<MediaRef>,
        caption: String,
    },
    Edit {
        message: MessageRef,
        text: String,
        keyboard: Option<Keyboard>,
    },
    EditControls {
        message: MessageRef,
        keyboard: Option<Keyboard>,
    },
    Answer {
        callback_id: String,
        text: Option<String>,
        alert: bool,
    },
}

impl Sent {
    /// Chat a send or edit targeted; `None` for callback answers.
    pub fn chat(&self) -> Option<ChatId> {
        match self {
            Sent::Text { chat, .. } | Sent::Photo { chat, .. } | Sent::Group { chat, .. } => Some(*chat),
            Sent::Edit { message, .. } | Sent::EditControls { message, .. } => Some(message.chat_id),
            Sent::Answer { .. } => None,
        }
    }

    /// Text or caption carried by the call.
    pub fn text(&self) -> Option<&str> {
        match self {
            Sent::Text { text, .. } | Sent::Edit { text, .. } => Some(text),
            Sent::Photo { caption, .. } | Sent::Group { caption, .. } => Some(caption),
            Sent::Answer { text, .. } => text.as_deref(),
            Sent::EditControls { .. } => None,
        }
    }
}

/// Messenger that records every call and can be told to fail per chat.
pub struct RecordingMessenger {
    sent: Mutex<Vec<Sent>>,
    failing_chats: Mutex<HashSet<ChatId>>,
    failing_edits: AtomicBool,
    next_id: AtomicI64,
}

impl Default for RecordingMessenger {
    fn default() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failing_chats: Mutex::new(HashSet::new()),
            failing_edits: AtomicBool::new(false),
            next_id: AtomicI64::new(1),
        }
    }
}

impl RecordingMessenger {
    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.sent.lock().unwrap().clear();
    }

    /// Calls that delivered content to `chat` (sends and edits).
    pub fn to_chat(&self, chat: ChatId) -> Vec<Sent> {
        self.sent()
            .into_iter()
            .filter(|s| s.chat() == Some(chat))
            .collect()
    }

    pub fn answers(&self) -> Vec<Sent> {
        self.sent()
            .into_iter()
            .filter(|s| matches!(s, Sent::Answer { .. }))
            .collect()
    }

    pub fn fail_chat(&self, chat: ChatId) {
        self.failing_chats.lock().unwrap().insert(chat);
    }

    pub fn heal_chat(&self, chat: ChatId) {
        self.failing_chats.lock().unwrap().remove(&chat);
    }

    pub fn fail_edits(&self, failing: bool) {
        self.failing_edits.store(failing, Ordering::SeqCst);
    }

    fn check(&self, chat: ChatId) -> Result<(), TransportError> {
        if self.failing_chats.lock().unwrap().contains(&chat) {
            Err(TransportError::Timeout)
        } else {
            Ok(())
        }
    }

    fn check_edit(&self, chat: ChatId) -> Result<(), TransportError> {
        self.check(chat)?;
        if self.failing_edits.load(Ordering::SeqCst) {
            return Err(TransportError::Api {
                code: 400,
                description: "message can't be edited".to_string(),
            });
        }
        Ok(())
    }

    fn record(&self, sent: Sent) {
        self.sent.lock().unwrap().push(sent);
    }

    fn next_ref(&self, chat: ChatId) -> MessageRef {
        MessageRef::new(chat, self.next_id.fetch_add(1, Ordering::SeqCst))
    }
}

impl Messenger for RecordingMessenger {
    async fn send_text(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<MessageRef, TransportError> {
        self.check(chat_id)?;
        self.record(Sent::Text {
            chat: chat_id,
            text: text.to_string(),
            keyboard: keyboard.cloned(),
        });
        Ok(self.next_ref(chat_id))
    }

    async fn send_photo(
        &self,
        chat_id: ChatId,
        photo: &MediaRef,
        caption: &str,
    ) -> Result<MessageRef, TransportError> {
        self.check(chat_id)?;
        self.record(Sent::Photo {
            chat: chat_id,
            photo: photo.clone(),
            caption: caption.to_string(),
        });
        Ok(self.next_ref(chat_id))
    }

    async fn send_photo_group(
        &self,
        chat_id: ChatId,
        photos: &[MediaRef],
        caption: &str,
    ) -> Result<Vec<MessageRef>, TransportError> {
        self.check(chat_id)?;
        self.record(Sent::Group {
            chat: chat_id,
            photos: photos.to_vec(),
            caption: caption.to_string(),
        });
        Ok(photos.iter().map(|_| self.next_ref(chat_id)).collect())
    }

    async fn edit_message(
        &self,
        message: &MessageRef,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), TransportError> {
        self.check_edit(message.chat_id)?;
        self.record(Sent::Edit {
            message: *message,
            text: text.to_string(),
            keyboard: keyboard.cloned(),
        });
        Ok(())
    }

    async fn edit_controls(
        &self,
        message: &MessageRef,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), TransportError> {
        self.check_edit(message.chat_id)?;
        self.record(Sent::EditControls {
            message: *message,
            keyboard: keyboard.cloned(),
        });
        Ok(())
    }

    async fn answer_callback(
        &self,
        callback_id: &str,
        text: Option<&str>,
        alert: bool,
    ) -> Result<(), TransportError> {
        self.record(Sent::Answer {
            callback_id: callback_id.to_string(),
            text: text.map(str::to_string),
            alert,
        });
        Ok(())
    }
}

/// Shared fixtures wired the way the application wires them.
pub struct Harness {
    pub store: Arc<InMemoryDraftStore>,
    pub messenger: Arc<RecordingMessenger>,
    pub locks: Arc<UserLocks>,
    pub moderation: Arc<ModerationCoordinator<InMemoryDraftStore, RecordingMessenger>>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_settings(ModerationSettings {
            moderator_chat: Some(MOD_CHAT),
            channel: Some(CHANNEL),
            call_to_action: CTA.to_string(),
        })
    }

    pub fn with_settings(settings: ModerationSettings) -> Self {
        Self::over(Arc::new(InMemoryDraftStore::default()), settings)
    }

    /// A fresh process over an existing store: new messenger, locks and
    /// ticket map.
    pub fn over(store: Arc<InMemoryDraftStore>, settings: ModerationSettings) -> Self {
        let messenger = Arc::new(RecordingMessenger::default());
        let locks = Arc::new(UserLocks::new());
        let moderation = Arc::new(ModerationCoordinator::new(
            Arc::clone(&store),
            Arc::clone(&messenger),
            Arc::clone(&locks),
            settings,
        ));
        Self {
            store,
            messenger,
            locks,
            moderation,
        }
    }
}

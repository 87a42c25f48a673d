//! Draft persistence trait.
//!
//! Defines `DraftStore` for saving and restoring in-progress catch reports.
//! Each user has at most one record; saving replaces whatever was stored
//! before, so a new submission overwrites an abandoned one. The wizard
//! saves after every mutation, which lets the process crash or restart
//! between steps without losing committed answers.

use std::future::Future;

use catchpost_types::draft::{DraftRecord, DraftSummary};
use catchpost_types::error::RepositoryError;
use catchpost_types::ids::UserId;

/// Persistence interface for drafts, keyed 1:1 by user.
///
/// Uses RPITIT (return position `impl Trait` in traits) consistent with
/// all async traits in this project.
pub trait DraftStore: Send + Sync {
    /// Save or replace the user's draft (upsert on user id).
    ///
    /// The store keeps the original `created_at` of an existing record.
    fn save(
        &self,
        record: &DraftRecord,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    /// Load the user's draft.
    ///
    /// Returns `None` if no draft exists. Never returns a partial record:
    /// a row that fails to decode is an error.
    fn load(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Option<DraftRecord>, RepositoryError>> + Send;

    /// Delete the user's draft.
    ///
    /// No-op if the draft does not exist.
    fn delete(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    /// List all stored drafts, most recently updated first.
    fn list(&self) -> impl Future<Output = Result<Vec<DraftSummary>, RepositoryError>> + Send;
}

//! In-memory remote client
//!
//! A scripted stand-in for the remote service, used by tests and for
//! exercising the transfer engine without network access.

use anyhow::{Result, bail};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{BindError, MoveOutcome, RemoteMailClient};
use crate::models::{FolderHandle, FolderId, ItemId, MailItem};

#[derive(Default)]
struct State {
    /// (mailbox, folder name) -> handle
    folders: HashMap<(String, String), FolderHandle>,
    /// (mailbox, folder name) pairs the caller may not open
    denied: HashSet<(String, String)>,
    /// Outcomes returned for successive move attempts per item
    move_scripts: HashMap<ItemId, VecDeque<MoveOutcome>>,
    /// Item counts returned for successive count queries per folder
    count_scripts: HashMap<FolderId, VecDeque<u64>>,
    failing_counts: HashSet<FolderId>,
    attempts: Vec<ItemId>,
    moved: Vec<(ItemId, FolderId)>,
    count_queries: usize,
}

/// In-memory implementation of RemoteMailClient
///
/// Moves succeed unless scripted otherwise. Item counts are zero unless a
/// sequence was scripted; the last value of a sequence repeats once the
/// sequence is exhausted.
#[derive(Default)]
pub struct InMemoryMailClient {
    state: Mutex<State>,
}

impl InMemoryMailClient {
    /// Create a new client with no folders
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a folder and return its handle
    pub fn add_folder(&self, mailbox: &str, name: &str, id: &str) -> FolderHandle {
        let handle = FolderHandle::new(FolderId::new(id), name, mailbox);
        self.state()
            .folders
            .insert((mailbox.to_string(), name.to_string()), handle.clone());
        handle
    }

    /// Make binding a folder fail with AccessDenied
    pub fn deny_folder(&self, mailbox: &str, name: &str) {
        self.state()
            .denied
            .insert((mailbox.to_string(), name.to_string()));
    }

    /// Script the outcomes of successive move attempts for an item
    pub fn script_moves(&self, item: &ItemId, outcomes: impl IntoIterator<Item = MoveOutcome>) {
        self.state()
            .move_scripts
            .entry(item.clone())
            .or_default()
            .extend(outcomes);
    }

    /// Script the values of successive item-count queries for a folder
    pub fn script_counts(&self, folder: &FolderId, counts: impl IntoIterator<Item = u64>) {
        self.state()
            .count_scripts
            .entry(folder.clone())
            .or_default()
            .extend(counts);
    }

    /// Make item-count queries for a folder fail
    pub fn fail_counts(&self, folder: &FolderId) {
        self.state().failing_counts.insert(folder.clone());
    }

    /// Every move attempt, in order, including throttled and failed ones
    pub fn attempts(&self) -> Vec<ItemId> {
        self.state().attempts.clone()
    }

    /// Number of attempts made for one item
    pub fn attempts_for(&self, item: &ItemId) -> usize {
        self.state().attempts.iter().filter(|id| *id == item).count()
    }

    /// Successfully moved items with their destination, in order
    pub fn moved(&self) -> Vec<(ItemId, FolderId)> {
        self.state().moved.clone()
    }

    pub fn count_queries(&self) -> usize {
        self.state().count_queries
    }
}

impl RemoteMailClient for InMemoryMailClient {
    fn bind(&self, folder_name: &str, mailbox: &str) -> Result<FolderHandle, BindError> {
        let state = self.state();
        let key = (mailbox.to_string(), folder_name.to_string());

        if state.denied.contains(&key) {
            return Err(BindError::AccessDenied {
                folder: folder_name.to_string(),
                mailbox: mailbox.to_string(),
            });
        }

        state
            .folders
            .get(&key)
            .cloned()
            .ok_or_else(|| BindError::NotFound {
                folder: folder_name.to_string(),
                mailbox: mailbox.to_string(),
            })
    }

    fn move_item(&self, item: &MailItem, destination: &FolderHandle) -> MoveOutcome {
        let mut state = self.state();
        state.attempts.push(item.id.clone());

        let outcome = state
            .move_scripts
            .get_mut(&item.id)
            .and_then(VecDeque::pop_front)
            .unwrap_or(MoveOutcome::Moved);

        if outcome == MoveOutcome::Moved {
            state.moved.push((item.id.clone(), destination.id.clone()));
        }
        outcome
    }

    fn item_count(&self, folder: &FolderHandle) -> Result<u64> {
        let mut state = self.state();
        state.count_queries += 1;

        if state.failing_counts.contains(&folder.id) {
            bail!("item count unavailable for folder {}", folder.id);
        }

        let count = match state.count_scripts.get_mut(&folder.id) {
            Some(script) if script.len() > 1 => script.pop_front().unwrap_or_default(),
            Some(script) => script.front().copied().unwrap_or_default(),
            None => 0,
        };
        Ok(count)
    }
}

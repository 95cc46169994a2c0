//! Per-owner conversation histories.
//!
//! The main bot and every registered friend own exactly one ordered
//! history. Histories never share storage, so appending to one owner can
//! never leak into another.

use std::collections::HashMap;
use std::fmt;

use crate::core::error::ChatError;
use crate::core::message::{Role, Turn};

/// Identity that owns a history: the reserved main bot or a friend.
///
/// Friend keys are case-folded so `Alex` and `alex` address the same
/// history.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OwnerKey {
    MainBot,
    Persona(String),
}

impl OwnerKey {
    pub fn persona(name: &str) -> Self {
        OwnerKey::Persona(name.to_lowercase())
    }
}

impl fmt::Display for OwnerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OwnerKey::MainBot => f.write_str("the main AI"),
            OwnerKey::Persona(name) => write!(f, "friend '{name}'"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConversationStore {
    histories: HashMap<OwnerKey, Vec<Turn>>,
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationStore {
    /// Create a store with an empty main-bot history already registered.
    pub fn new() -> Self {
        let mut histories = HashMap::new();
        histories.insert(OwnerKey::MainBot, Vec::new());
        Self { histories }
    }

    /// Register a fresh, empty history. Returns `false` if the owner was
    /// already known, in which case its history is left untouched.
    pub fn init(&mut self, owner: OwnerKey) -> bool {
        if self.histories.contains_key(&owner) {
            return false;
        }
        self.histories.insert(owner, Vec::new());
        true
    }

    pub fn contains(&self, owner: &OwnerKey) -> bool {
        self.histories.contains_key(owner)
    }

    pub fn append(
        &mut self,
        owner: &OwnerKey,
        role: Role,
        text: impl Into<String>,
    ) -> Result<(), ChatError> {
        let history = self
            .histories
            .get_mut(owner)
            .ok_or_else(|| ChatError::UnknownOwner(owner.clone()))?;
        history.push(Turn::new(role, text));
        Ok(())
    }

    /// Read-only view of an owner's turns in insertion order.
    pub fn get(&self, owner: &OwnerKey) -> Result<&[Turn], ChatError> {
        self.histories
            .get(owner)
            .map(Vec::as_slice)
            .ok_or_else(|| ChatError::UnknownOwner(owner.clone()))
    }

    /// Owned copy of an owner's turns, suitable for handing to a provider
    /// request that outlives the borrow of the store.
    pub fn snapshot(&self, owner: &OwnerKey) -> Result<Vec<Turn>, ChatError> {
        self.get(owner).map(<[Turn]>::to_vec)
    }

    /// Empty a history while keeping its owner registered.
    pub fn clear(&mut self, owner: &OwnerKey) -> Result<(), ChatError> {
        let history = self
            .histories
            .get_mut(owner)
            .ok_or_else(|| ChatError::UnknownOwner(owner.clone()))?;
        history.clear();
        Ok(())
    }

    /// Remove a history entirely. Returns `false` when nothing was stored.
    ///
    /// The main-bot history cannot be dropped; it is cleared instead.
    pub fn drop_history(&mut self, owner: &OwnerKey) -> bool {
        if *owner == OwnerKey::MainBot {
            if let Some(history) = self.histories.get_mut(owner) {
                history.clear();
            }
            return false;
        }
        self.histories.remove(owner).is_some()
    }

    pub fn len(&self, owner: &OwnerKey) -> usize {
        self.histories.get(owner).map_or(0, Vec::len)
    }
}

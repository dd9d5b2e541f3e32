//! # Holder Set Index
//!
//! Per identifier, the unordered set of accounts currently holding a balance.
//!
//! Each set pairs a backing sequence (for enumeration) with a
//! holder → position map. The position map doubles as the membership flag
//! and turns swap-and-pop removal into an O(1) operation.

use crate::domain::value_objects::{Address, TokenId};
use crate::errors::LedgerError;
use std::collections::HashMap;
use tracing::debug;

// =============================================================================
// HOLDER SET
// =============================================================================

/// Holders of a single identifier.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HolderSet {
    members: Vec<Address>,
    positions: HashMap<Address, usize>,
}

impl HolderSet {
    /// Returns true if `holder` is registered.
    #[must_use]
    pub fn contains(&self, holder: &Address) -> bool {
        self.positions.contains_key(holder)
    }

    /// Register `holder`. Returns false if it was already present.
    pub fn insert(&mut self, holder: Address) -> bool {
        if self.contains(&holder) {
            return false;
        }
        self.positions.insert(holder, self.members.len());
        self.members.push(holder);
        true
    }

    /// Unregister `holder` by moving the last member into its slot.
    /// Returns false if it was not present.
    pub fn swap_remove(&mut self, holder: &Address) -> bool {
        let Some(position) = self.positions.remove(holder) else {
            return false;
        };
        self.members.swap_remove(position);
        if let Some(moved) = self.members.get(position) {
            self.positions.insert(*moved, position);
        }
        true
    }

    /// Members in backing-sequence order.
    #[must_use]
    pub fn members(&self) -> &[Address] {
        &self.members
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns true if nobody is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Returns true if every member appears exactly once and its recorded
    /// position matches the sequence.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.members.len() == self.positions.len()
            && self
                .members
                .iter()
                .enumerate()
                .all(|(i, holder)| self.positions.get(holder) == Some(&i))
    }
}

// =============================================================================
// HOLDER INDEX
// =============================================================================

/// Holder sets for every identifier.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HolderIndex {
    sets: HashMap<TokenId, HolderSet>,
}

impl HolderIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `holder` for `id`. No-op if already registered.
    pub fn add(&mut self, id: TokenId, holder: Address) {
        if self.sets.entry(id).or_default().insert(holder) {
            debug!(%id, holder = %holder, "holder registered");
        }
    }

    /// Unregister `holder` for `id`.
    pub fn remove(&mut self, id: TokenId, holder: Address) -> Result<(), LedgerError> {
        let set = self
            .sets
            .get_mut(&id)
            .ok_or(LedgerError::NotAMember { id, holder })?;
        if !set.swap_remove(&holder) {
            return Err(LedgerError::NotAMember { id, holder });
        }
        if set.is_empty() {
            self.sets.remove(&id);
        }
        debug!(%id, holder = %holder, "holder unregistered");
        Ok(())
    }

    /// Returns true if `holder` is registered for `id`.
    #[must_use]
    pub fn contains(&self, id: TokenId, holder: Address) -> bool {
        self.sets.get(&id).is_some_and(|set| set.contains(&holder))
    }

    /// Registered holders of `id`. Order reflects insertion and swap history.
    #[must_use]
    pub fn members(&self, id: TokenId) -> &[Address] {
        match self.sets.get(&id) {
            Some(set) => set.members(),
            None => &[],
        }
    }

    /// Iterate over every non-empty holder set.
    pub fn iter(&self) -> impl Iterator<Item = (&TokenId, &HolderSet)> {
        self.sets.iter()
    }
}

// =============================================================================
// TESTS
// =============================================================================

//! # Append-Only Identity Indices
//!
//! Maps an account to the ordered list of record ids associated with it.
//! Indices only ever append — revocation never removes an id, it flips a
//! flag on the underlying record, so lookups must separately check
//! revocation status.
//!
//! Appends are O(1); a windowed read is O(limit). Serving a page never
//! scans the full index.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use attestr_core::AccountId;

/// A page of ids plus the total size of the underlying index.
///
/// Callers must use `total` — not `items.len()` — to decide whether more
/// pages exist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    /// The ids within the requested window, in insertion order.
    pub items: Vec<T>,
    /// Total number of entries in the full index, not just this window.
    pub total: usize,
}

/// An append-only index from account to ordered record ids.
///
/// Generic over the id type so the registry (credential ids) and the
/// verifier (verification ids) share one implementation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdIndex<T> {
    entries: HashMap<AccountId, Vec<T>>,
}

impl<T: Clone> IdIndex<T> {
    /// Create an empty index.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Append `id` to `account`'s list.
    pub fn append(&mut self, account: &AccountId, id: T) {
        self.entries.entry(account.clone()).or_default().push(id);
    }

    /// Total number of ids recorded for `account`.
    pub fn total(&self, account: &AccountId) -> usize {
        self.entries.get(account).map_or(0, Vec::len)
    }

    /// A window of at most `limit` ids starting at `offset`, in insertion
    /// order (oldest first), plus the total count.
    ///
    /// An `offset` past the end yields an empty window, not an error.
    pub fn page(&self, account: &AccountId, offset: usize, limit: usize) -> Page<T> {
        match self.entries.get(account) {
            Some(ids) => {
                let items = ids
                    .iter()
                    .skip(offset)
                    .take(limit)
                    .cloned()
                    .collect();
                Page {
                    items,
                    total: ids.len(),
                }
            }
            None => Page {
                items: Vec::new(),
                total: 0,
            },
        }
    }
}

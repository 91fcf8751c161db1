//! Session-local approval overrides layered on top of fetched transactions

use serde::Serialize;
use std::collections::HashMap;

use crate::models::{ResolvedTransaction, Transaction};
use crate::types::TransactionId;

/// Immutable map of locally approved/unapproved transactions.
///
/// Keys are never removed; a missing key means the transaction's own
/// `approved` flag applies.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ApprovalOverlay {
    entries: HashMap<TransactionId, bool>,
}

impl ApprovalOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a new overlay with `id` set to `approved`
    #[must_use]
    pub fn with_approved(&self, id: TransactionId, approved: bool) -> Self {
        let mut entries = self.entries.clone();
        entries.insert(id, approved);
        Self { entries }
    }

    pub fn get(&self, id: &TransactionId) -> Option<bool> {
        self.entries.get(id).copied()
    }

    /// Approval of `transaction` with the overlay applied
    pub fn resolve(&self, transaction: &Transaction) -> bool {
        self.get(&transaction.id).unwrap_or(transaction.approved)
    }

    pub fn apply(&self, transactions: &[Transaction]) -> Vec<ResolvedTransaction> {
        transactions
            .iter()
            .map(|transaction| ResolvedTransaction {
                resolved_approved: self.resolve(transaction),
                transaction: transaction.clone(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

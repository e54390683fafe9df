//! Observable budget store
//!
//! Holds the current budget document and transaction list. Every mutation
//! bumps the revision and synchronously notifies subscribers with the event
//! and the new state. Selectors read immutable snapshots.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{BudgetDocument, NewTransaction, Transaction};

/// State handed to selectors and subscribers
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BudgetSnapshot {
    /// `None` until the backend delivers a document
    pub document: Option<BudgetDocument>,
    pub transactions: Vec<Transaction>,
}

impl BudgetSnapshot {
    pub fn new(document: Option<BudgetDocument>, transactions: Vec<Transaction>) -> Self {
        Self {
            document,
            transactions,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.document.is_some()
    }
}

/// What changed
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    DocumentReplaced,
    DocumentCleared,
    TransactionAdded(i64),
    TransactionUpdated(i64),
    TransactionRemoved(i64),
    TransactionsReplaced,
}

/// Handle returned by `subscribe`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&StoreEvent, &BudgetSnapshot)>;

static NEXT_INSTANCE: AtomicU64 = AtomicU64::new(1);

pub struct BudgetStore {
    instance: u64,
    state: BudgetSnapshot,
    revision: u64,
    next_transaction_id: i64,
    next_subscription_id: u64,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
}

impl Default for BudgetStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for BudgetStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BudgetStore")
            .field("instance", &self.instance)
            .field("state", &self.state)
            .field("revision", &self.revision)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl BudgetStore {
    pub fn new() -> Self {
        Self {
            instance: NEXT_INSTANCE.fetch_add(1, Ordering::Relaxed),
            state: BudgetSnapshot::default(),
            revision: 0,
            next_transaction_id: 1,
            next_subscription_id: 1,
            subscribers: Vec::new(),
        }
    }

    /// Create a store pre-loaded with a snapshot (no notification)
    pub fn with_snapshot(snapshot: BudgetSnapshot) -> Self {
        let next_transaction_id = snapshot
            .transactions
            .iter()
            .map(|t| t.id)
            .max()
            .unwrap_or(0)
            + 1;
        Self {
            state: snapshot,
            next_transaction_id,
            ..Self::new()
        }
    }

    /// Current state, borrowed
    pub fn state(&self) -> &BudgetSnapshot {
        &self.state
    }

    /// Current state, owned copy
    pub fn snapshot(&self) -> BudgetSnapshot {
        self.state.clone()
    }

    pub fn document(&self) -> Option<&BudgetDocument> {
        self.state.document.as_ref()
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.state.transactions
    }

    /// Incremented on every mutation
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Unique per store in this process; with `revision` identifies a state
    pub fn instance(&self) -> u64 {
        self.instance
    }

    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&StoreEvent, &BudgetSnapshot) + 'static,
    {
        let id = SubscriptionId(self.next_subscription_id);
        self.next_subscription_id += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Returns false if the id was not subscribed
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub_id, _)| *sub_id != id);
        self.subscribers.len() != before
    }

    /// Replace the document wholesale
    pub fn set_document(&mut self, document: BudgetDocument) {
        self.state.document = Some(document);
        self.commit(StoreEvent::DocumentReplaced);
    }

    /// Back to "not loaded", e.g. on sign-out
    pub fn clear_document(&mut self) {
        self.state.document = None;
        self.commit(StoreEvent::DocumentCleared);
    }

    /// Append a transaction, returning its id
    pub fn add_transaction(&mut self, tx: NewTransaction) -> Result<i64> {
        tx.validate()?;
        let id = self.next_transaction_id;
        self.next_transaction_id += 1;
        self.state.transactions.push(tx.into_transaction(id));
        self.commit(StoreEvent::TransactionAdded(id));
        Ok(id)
    }

    /// Edit a transaction in place, keeping its id and position
    pub fn update_transaction(&mut self, id: i64, tx: NewTransaction) -> Result<()> {
        tx.validate()?;
        let slot = self
            .state
            .transactions
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| Error::NotFound(format!("Transaction {}", id)))?;
        *slot = tx.into_transaction(id);
        self.commit(StoreEvent::TransactionUpdated(id));
        Ok(())
    }

    pub fn remove_transaction(&mut self, id: i64) -> Result<Transaction> {
        let index = self
            .state
            .transactions
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| Error::NotFound(format!("Transaction {}", id)))?;
        let removed = self.state.transactions.remove(index);
        self.commit(StoreEvent::TransactionRemoved(id));
        Ok(removed)
    }

    /// Replace the whole list, e.g. when the backend delivers a fresh page
    pub fn replace_transactions(&mut self, transactions: Vec<Transaction>) {
        let max_id = transactions.iter().map(|t| t.id).max().unwrap_or(0);
        self.next_transaction_id = self.next_transaction_id.max(max_id + 1);
        self.state.transactions = transactions;
        self.commit(StoreEvent::TransactionsReplaced);
    }

    fn commit(&mut self, event: StoreEvent) {
        self.revision += 1;
        tracing::debug!(revision = self.revision, event = ?event, "Store updated");

        let mut subscribers = std::mem::take(&mut self.subscribers);
        for (_, callback) in subscribers.iter_mut() {
            callback(&event, &self.state);
        }
        self.subscribers = subscribers;
    }
}

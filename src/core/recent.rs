use serde::{Serialize, Deserialize};
use serde::de::DeserializeOwned;

use crate::core::store::KvStore;

pub const COMMANDS_KEY: &str = "recent_commands";
pub const SOURCE_CHAINS_KEY: &str = "recent_source_chains";
pub const TARGET_CHAINS_KEY: &str = "recent_target_chains";
pub const TOKENS_KEY: &str = "recent_tokens";

pub const COMMAND_CAPACITY: usize = 10;
pub const CHAIN_CAPACITY: usize = 10;
pub const TOKEN_CAPACITY: usize = 5;

/// Bounded most-recent-first list: push to the front, drop older duplicates,
/// truncate to capacity after every insert.
#[derive(Debug, Clone, PartialEq)]
pub struct RecencyList<T> {
    capacity: usize,
    items: Vec<T>,
}

impl<T: PartialEq> RecencyList<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            items: Vec::new(),
        }
    }

    /// Rebuild from stored items (already most-recent-first), enforcing the
    /// dedup and capacity invariants on the way in.
    pub fn from_items(capacity: usize, items: Vec<T>) -> Self {
        let mut list = Self::new(capacity);
        for item in items {
            if !list.items.contains(&item) {
                list.items.push(item);
            }
        }
        list.items.truncate(capacity);
        list
    }

    pub fn push(&mut self, value: T) {
        self.items.retain(|existing| existing != &value);
        self.items.insert(0, value);
        self.items.truncate(self.capacity);
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Recency identity for tokens is the whole tuple, not just the symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentToken {
    pub symbol: Option<String>,
    pub contract_address: Option<String>,
    pub token_id: Option<String>,
}

impl RecentToken {
    pub fn display(&self) -> String {
        match (&self.symbol, &self.contract_address) {
            (Some(symbol), _) => symbol.clone(),
            (None, Some(address)) => address.clone(),
            (None, None) => String::new(),
        }
    }
}

/// Read-only view of all four lists, handed to the suggestion engine as
/// part of the context.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecentSnapshot {
    pub commands: Vec<String>,
    pub source_chains: Vec<String>,
    pub target_chains: Vec<String>,
    pub tokens: Vec<RecentToken>,
}

/// Owns the four recency lists behind a key-value port. Writes happen only
/// after a successful final submission, never while typing.
pub struct RecencyManager<S: KvStore> {
    store: S,
}

impl<S: KvStore> RecencyManager<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn snapshot(&self) -> RecentSnapshot {
        RecentSnapshot {
            commands: self.read_list(COMMANDS_KEY, COMMAND_CAPACITY).into_items(),
            source_chains: self.read_list(SOURCE_CHAINS_KEY, CHAIN_CAPACITY).into_items(),
            target_chains: self.read_list(TARGET_CHAINS_KEY, CHAIN_CAPACITY).into_items(),
            tokens: self.read_list(TOKENS_KEY, TOKEN_CAPACITY).into_items(),
        }
    }

    pub fn record_command(&mut self, raw: &str) -> Result<(), String> {
        self.record(COMMANDS_KEY, COMMAND_CAPACITY, raw.to_string())
    }

    pub fn record_source_chain(&mut self, chain_id: &str) -> Result<(), String> {
        self.record(SOURCE_CHAINS_KEY, CHAIN_CAPACITY, chain_id.to_string())
    }

    pub fn record_target_chain(&mut self, chain_id: &str) -> Result<(), String> {
        self.record(TARGET_CHAINS_KEY, CHAIN_CAPACITY, chain_id.to_string())
    }

    pub fn record_token(&mut self, token: RecentToken) -> Result<(), String> {
        self.record(TOKENS_KEY, TOKEN_CAPACITY, token)
    }

    fn record<T>(&mut self, key: &str, capacity: usize, value: T) -> Result<(), String>
    where
        T: Serialize + DeserializeOwned + PartialEq,
    {
        let mut list = self.read_list(key, capacity);
        list.push(value);
        self.write_list(key, &list)
    }

    fn read_list<T>(&self, key: &str, capacity: usize) -> RecencyList<T>
    where
        T: DeserializeOwned + PartialEq,
    {
        let Some(json) = self.store.get(key) else {
            return RecencyList::new(capacity);
        };

        match serde_json::from_str::<Vec<T>>(&json) {
            Ok(items) => RecencyList::from_items(capacity, items),
            Err(e) => {
                log::warn!("Ignoring corrupt recency list '{}': {}", key, e);
                RecencyList::new(capacity)
            }
        }
    }

    fn write_list<T: Serialize + PartialEq>(&mut self, key: &str, list: &RecencyList<T>) -> Result<(), String> {
        let json = serde_json::to_string(list.items())
            .map_err(|e| format!("Failed to serialize recency list '{}': {}", key, e))?;
        self.store.set(key, &json)
    }
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! OS keychain store with a file fallback.
//!
//! Each key is one keychain entry under a shared service name. When the
//! keychain is unavailable (no secret service, a locked-down container) the
//! affected keys go to a [`FileStore`] instead. Reads check the keychain first,
//! then the file.

use super::{FileStore, KeyValueStore};
use crate::error::StorageError;
use dashmap::DashMap;
use keyring::Entry;

/// Key-value store backed by the OS keychain.
pub struct KeyringStore {
    service: String,
    /// One entry per key, created on first use and reused afterwards
    entries: DashMap<String, Entry>,
    fallback: FileStore,
}

impl KeyringStore {
    pub fn new(service: impl Into<String>, fallback: FileStore) -> Self {
        Self {
            service: service.into(),
            entries: DashMap::new(),
            fallback,
        }
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn fallback(&self) -> &FileStore {
        &self.fallback
    }

    fn with_entry<T>(
        &self,
        key: &str,
        op: impl FnOnce(&Entry) -> keyring::Result<T>,
    ) -> keyring::Result<T> {
        if let Some(entry) = self.entries.get(key) {
            return op(entry.value());
        }
        let entry = Entry::new(&self.service, key)?;
        let entry = self.entries.entry(key.to_string()).or_insert(entry);
        op(entry.value())
    }

    /// Delete keychain copies, ignoring keys that were never stored.
    fn remove_entries(&self, keys: &[&str]) {
        for key in keys {
            match self.with_entry(key, Entry::delete_credential) {
                Ok(()) | Err(keyring::Error::NoEntry) => {}
                Err(error) => tracing::warn!(%error, key, "Keyring delete failed"),
            }
        }
    }
}

impl KeyValueStore for KeyringStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match self.with_entry(key, Entry::get_password) {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => self.fallback.get(key),
            Err(error) => {
                tracing::warn!(%error, key, "Keyring read failed; falling back to file");
                self.fallback.get(key)
            }
        }
    }

    fn multi_set(&self, entries: &[(&str, &str)]) -> Result<(), StorageError> {
        let keys: Vec<&str> = entries.iter().map(|(key, _)| *key).collect();

        let stored = entries
            .iter()
            .try_for_each(|(key, value)| self.with_entry(key, |entry| entry.set_password(value)));

        match stored {
            Ok(()) => {
                // Older file copies must not outlive the keychain values.
                if let Err(error) = self.fallback.multi_remove(&keys) {
                    tracing::warn!(%error, "Failed to drop file copies of keychain values");
                }
                Ok(())
            }
            Err(error) => {
                tracing::warn!(%error, "Keyring store failed; falling back to file");
                // A partial keychain write would shadow the file values.
                self.remove_entries(&keys);
                self.fallback.multi_set(entries)
            }
        }
    }

    fn multi_remove(&self, keys: &[&str]) -> Result<(), StorageError> {
        self.remove_entries(keys);
        self.fallback.multi_remove(keys)
    }
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Device key-value storage for credentials.

pub mod file;
pub mod keychain;
pub mod memory;
pub mod tokens;

pub use file::FileStore;
pub use keychain::KeyringStore;
pub use memory::MemoryStore;
pub use tokens::TokenStore;

use crate::error::StorageError;

/// Storage keys as constants.
pub mod keys {
    pub const ACCESS_TOKEN: &str = "accessToken";
    pub const REFRESH_TOKEN: &str = "refreshToken";
    /// Numeric user id decoded from the access token
    pub const USER_ID: &str = "userId";
}

/// String key-value storage, in the shape of a device's local storage.
///
/// `multi_set` and `multi_remove` apply all entries in one call so that
/// related keys are written and cleared together.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn multi_set(&self, entries: &[(&str, &str)]) -> Result<(), StorageError>;

    fn multi_remove(&self, keys: &[&str]) -> Result<(), StorageError>;
}

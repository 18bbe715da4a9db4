//! Token caching implementation for GitHub App authentication.
//!
//! Holds one installation token per installation plus an arena of
//! per-installation refresh locks. Reads never wait on a refresh in progress;
//! refreshes for different installations never wait on each other.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use super::{InstallationId, InstallationToken};
use crate::error::CacheError;

/// In-memory installation token cache.
///
/// Entries live behind a `RwLock` so the fast path only needs a read lock. The
/// refresh sections are `tokio` mutexes so that a holder may await network
/// calls while keeping other callers for the same installation parked.
pub struct InMemoryTokenCache {
    entries: RwLock<HashMap<InstallationId, InstallationToken>>,
    refresh_sections: Mutex<HashMap<InstallationId, Arc<tokio::sync::Mutex<()>>>>,
}

impl InMemoryTokenCache {
    /// Create a new in-memory token cache.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            refresh_sections: Mutex::new(HashMap::new()),
        }
    }

    /// Get the cached token for an installation, whatever its age.
    pub fn get(
        &self,
        installation_id: InstallationId,
    ) -> Result<Option<InstallationToken>, CacheError> {
        let entries = self
            .entries
            .read()
            .map_err(|e| CacheError::OperationFailed {
                message: format!("Failed to acquire read lock: {}", e),
            })?;

        Ok(entries.get(&installation_id).cloned())
    }

    /// Store a token, replacing any previous entry for its installation.
    pub fn store(&self, token: InstallationToken) -> Result<(), CacheError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| CacheError::OperationFailed {
                message: format!("Failed to acquire write lock: {}", e),
            })?;

        entries.insert(token.installation_id(), token);
        Ok(())
    }

    /// Drop the cached token for an installation.
    pub fn invalidate(&self, installation_id: InstallationId) -> Result<(), CacheError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| CacheError::OperationFailed {
                message: format!("Failed to acquire write lock: {}", e),
            })?;

        entries.remove(&installation_id);
        Ok(())
    }

    /// Remove every expired entry. Returns the number of entries removed.
    pub fn cleanup_expired(&self) -> usize {
        match self.entries.write() {
            Ok(mut entries) => {
                let before = entries.len();
                entries.retain(|_, token| !token.is_expired());
                before - entries.len()
            }
            Err(_) => 0,
        }
    }

    /// Number of cached entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the refresh section for an installation, creating it on first use.
    ///
    /// Every caller for the same installation receives the same mutex.
    pub fn refresh_section(
        &self,
        installation_id: InstallationId,
    ) -> Result<Arc<tokio::sync::Mutex<()>>, CacheError> {
        let mut sections =
            self.refresh_sections
                .lock()
                .map_err(|e| CacheError::OperationFailed {
                    message: format!("Failed to acquire refresh section arena: {}", e),
                })?;

        Ok(sections
            .entry(installation_id)
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone())
    }
}

impl Default for InMemoryTokenCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;

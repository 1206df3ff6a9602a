//! Account Cache
//!
//! Local store of server accounts and their tokens, one entry per
//! `(rest_api, email)` pair. Persisted as JSON next to the config file.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One cached login
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedAccount {
    pub account_id: u64,
    /// Human-readable server name
    pub server_name: String,
    /// API root the token is valid for
    pub rest_api: String,
    pub email: String,
    pub token: String,
    #[serde(default)]
    pub is_default: bool,
    pub added_at: DateTime<Utc>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CacheFile {
    #[serde(default)]
    next_id: u64,
    #[serde(default)]
    accounts: Vec<CachedAccount>,
}

/// File-backed account cache
#[derive(Debug)]
pub struct AccountCache {
    path: PathBuf,
    file: CacheFile,
}

fn sanitize_host(host: &str) -> &str {
    host.trim_matches('/').trim_matches('\\')
}

impl AccountCache {
    /// `<config_dir>/speckle/accounts.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("speckle").join("accounts.json"))
    }

    /// Open the cache at `path`; a missing file is an empty cache
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let file = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            serde_json::from_str(&content)
                .map_err(|e| Error::Cache(format!("{}: {}", path.display(), e)))?
        } else {
            CacheFile::default()
        };

        tracing::debug!("Account cache {:?}: {} accounts", path, file.accounts.len());
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn account_exists(&self, host: &str, email: &str) -> bool {
        self.get_account(host, email).is_some()
    }

    /// Store a token. Returns false, leaving the cache untouched, when the
    /// account is already present.
    pub fn write_account(
        &mut self,
        host: &str,
        host_name: &str,
        email: &str,
        token: &str,
    ) -> Result<bool> {
        let host = sanitize_host(host);
        let email = email.trim();

        if self.account_exists(host, email) {
            tracing::warn!("Account {} on {} already cached", email, host);
            return Ok(false);
        }

        self.file.next_id += 1;
        let is_default = self.file.accounts.is_empty();
        self.file.accounts.push(CachedAccount {
            account_id: self.file.next_id,
            server_name: host_name.to_string(),
            rest_api: host.to_string(),
            email: email.to_string(),
            token: token.to_string(),
            is_default,
            added_at: Utc::now(),
        });

        self.persist()?;
        Ok(true)
    }

    /// Returns whether an account was removed
    pub fn delete_account(&mut self, host: &str, email: &str) -> Result<bool> {
        let host = sanitize_host(host);
        let email = email.trim();

        let Some(index) = self
            .file
            .accounts
            .iter()
            .position(|a| a.rest_api == host && a.email == email)
        else {
            return Ok(false);
        };

        let removed = self.file.accounts.remove(index);
        if removed.is_default {
            // Oldest remaining account inherits the default
            if let Some(next) = self.file.accounts.first_mut() {
                next.is_default = true;
            }
        }

        self.persist()?;
        Ok(true)
    }

    /// Insert the account, or replace the token of an existing one while
    /// keeping its id, default flag and `added_at`
    pub fn store_token(
        &mut self,
        host: &str,
        host_name: &str,
        email: &str,
        token: &str,
    ) -> Result<()> {
        let host = sanitize_host(host);
        let email = email.trim();

        let existing = self
            .file
            .accounts
            .iter_mut()
            .find(|a| a.rest_api == host && a.email == email);

        match existing {
            Some(account) => {
                account.token = token.to_string();
                account.server_name = host_name.to_string();
                tracing::debug!("Replaced cached token for {} on {}", email, host);
                self.persist()
            },
            None => self.write_account(host, host_name, email, token).map(|_| ()),
        }
    }

    pub fn get_account(&self, host: &str, email: &str) -> Option<&CachedAccount> {
        let host = sanitize_host(host);
        let email = email.trim();
        self.file
            .accounts
            .iter()
            .find(|a| a.rest_api == host && a.email == email)
    }

    pub fn get_all_accounts(&self) -> &[CachedAccount] {
        &self.file.accounts
    }

    pub fn default_account(&self) -> Option<&CachedAccount> {
        self.file.accounts.iter().find(|a| a.is_default)
    }

    /// Mark one account as default, clearing the flag on the others
    pub fn set_default(&mut self, host: &str, email: &str) -> Result<bool> {
        if !self.account_exists(host, email) {
            return Ok(false);
        }

        let host = sanitize_host(host);
        let email = email.trim();
        for account in &mut self.file.accounts {
            account.is_default = account.rest_api == host && account.email == email;
        }

        self.persist()?;
        Ok(true)
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(&self.file)
            .map_err(|e| Error::Cache(e.to_string()))?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HESTIA: &str = "https://hestia.speckle.works/api/v1";

    fn temp_cache() -> (tempfile::TempDir, AccountCache) {
        let dir = tempfile::tempdir().unwrap();
        let cache = AccountCache::open(dir.path().join("accounts.json")).unwrap();
        (dir, cache)
    }

    #[test]
    fn test_missing_file_is_empty_cache() {
        let (_dir, cache) = temp_cache();
        assert!(cache.get_all_accounts().is_empty());
        assert!(!cache.path().exists());
    }

    #[test]
    fn test_write_and_reopen() {
        let (dir, mut cache) = temp_cache();
        assert!(cache
            .write_account(HESTIA, "Hestia Speckle", "user@test.com", "abcd")
            .unwrap());
        assert!(cache
            .write_account("https://hestia.speckle.works/api/v99", "Wam Balam", "other@test.com", "efgh")
            .unwrap());

        let reopened = AccountCache::open(dir.path().join("accounts.json")).unwrap();
        assert_eq!(reopened.get_all_accounts().len(), 2);

        let account = reopened.get_account(HESTIA, "user@test.com").unwrap();
        assert_eq!(account.server_name, "Hestia Speckle");
        assert_eq!(account.token, "abcd");
        assert!(account.is_default);
        assert_eq!(reopened.default_account().unwrap().email, "user@test.com");
    }

    #[test]
    fn test_duplicate_write_is_ignored() {
        let (_dir, mut cache) = temp_cache();
        cache
            .write_account(HESTIA, "Hestia", "user@test.com", "first")
            .unwrap();
        let written = cache
            .write_account(&format!("{}/", HESTIA), "Hestia", " user@test.com ", "second")
            .unwrap();

        assert!(!written);
        assert_eq!(cache.get_all_accounts().len(), 1);
        assert_eq!(cache.get_account(HESTIA, "user@test.com").unwrap().token, "first");
    }

    #[test]
    fn test_delete_account() {
        let (_dir, mut cache) = temp_cache();
        cache.write_account(HESTIA, "Hestia", "user@test.com", "abcd").unwrap();

        assert!(cache.delete_account(HESTIA, "user@test.com").unwrap());
        assert!(!cache.account_exists(HESTIA, "user@test.com"));
        assert!(!cache.delete_account(HESTIA, "user@test.com").unwrap());
    }

    #[test]
    fn test_set_default_moves_flag() {
        let (_dir, mut cache) = temp_cache();
        cache.write_account(HESTIA, "Hestia", "a@test.com", "1").unwrap();
        cache.write_account(HESTIA, "Hestia", "b@test.com", "2").unwrap();

        assert!(cache.set_default(HESTIA, "b@test.com").unwrap());
        assert_eq!(cache.default_account().unwrap().email, "b@test.com");
        assert!(!cache.get_account(HESTIA, "a@test.com").unwrap().is_default);
        assert!(!cache.set_default(HESTIA, "nobody@test.com").unwrap());
    }

    #[test]
    fn test_corrupt_file_is_cache_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("accounts.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(AccountCache::open(&path), Err(Error::Cache(_))));
    }

    #[test]
    fn test_store_token_keeps_default_flag() {
        let (_dir, mut cache) = temp_cache();
        cache.write_account(HESTIA, "Hestia", "a@test.com", "old").unwrap();
        cache.write_account(HESTIA, "Hestia", "b@test.com", "2").unwrap();

        cache.store_token(HESTIA, "Hestia", "a@test.com", "new").unwrap();

        let default = cache.default_account().unwrap();
        assert_eq!(default.email, "a@test.com");
        assert_eq!(default.token, "new");
        assert_eq!(default.account_id, 1);
        assert_eq!(cache.get_all_accounts().len(), 2);

        cache.store_token(HESTIA, "Hestia", "c@test.com", "3").unwrap();
        assert!(!cache.get_account(HESTIA, "c@test.com").unwrap().is_default);
    }

    #[test]
    fn test_deleting_default_hands_flag_on() {
        let (_dir, mut cache) = temp_cache();
        cache.write_account(HESTIA, "Hestia", "a@test.com", "1").unwrap();
        cache.write_account(HESTIA, "Hestia", "b@test.com", "2").unwrap();

        cache.delete_account(HESTIA, "a@test.com").unwrap();
        cache.write_account(HESTIA, "Hestia", "a@test.com", "3").unwrap();

        assert_eq!(cache.default_account().unwrap().email, "b@test.com");
        assert_eq!(
            cache.get_all_accounts().iter().filter(|a| a.is_default).count(),
            1
        );
    }
}

// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::sync::Mutex;

use anyhow::{Context, Result, anyhow};
use log::debug;
use time::{Duration, OffsetDateTime};
use vconsole_app::CosCredentials;

use crate::client::Client;

/// Credentials this close to expiry are refreshed before use.
pub const DEFAULT_REFRESH_MARGIN: Duration = Duration::minutes(1);

impl Client {
    pub fn cos_credentials(&self) -> Result<CosCredentials> {
        self.get("/public/cos/secret")
            .context("load object storage credentials")
    }
}

/// Lazily fetched object-storage credentials shared by every uploader.
///
/// The lock is held across a refresh, so concurrent callers wait for one
/// fetch instead of each issuing their own.
#[derive(Debug)]
pub struct CredentialCache {
    margin: Duration,
    cached: Mutex<Option<CosCredentials>>,
}

impl Default for CredentialCache {
    fn default() -> Self {
        Self::new(DEFAULT_REFRESH_MARGIN)
    }
}

impl CredentialCache {
    pub fn new(margin: Duration) -> Self {
        Self {
            margin,
            cached: Mutex::new(None),
        }
    }

    pub fn get(&self, client: &Client) -> Result<CosCredentials> {
        self.get_or_fetch(OffsetDateTime::now_utc(), || client.cos_credentials())
    }

    pub fn get_or_fetch(
        &self,
        now: OffsetDateTime,
        fetch: impl FnOnce() -> Result<CosCredentials>,
    ) -> Result<CosCredentials> {
        let mut cached = self
            .cached
            .lock()
            .map_err(|_| anyhow!("credential cache lock poisoned"))?;
        if let Some(credentials) = cached.as_ref()
            && self.is_fresh(credentials, now)
        {
            return Ok(credentials.clone());
        }

        debug!("refreshing object storage credentials");
        let credentials = fetch()?;
        *cached = Some(credentials.clone());
        Ok(credentials)
    }

    pub fn invalidate(&self) {
        match self.cached.lock() {
            Ok(mut cached) => *cached = None,
            Err(poisoned) => *poisoned.into_inner() = None,
        }
    }

    fn is_fresh(&self, credentials: &CosCredentials, now: OffsetDateTime) -> bool {
        let deadline = now + self.margin;
        credentials.expired_time > deadline.unix_timestamp()
    }
}

#[cfg(test)]
mod tests {
    use super::CredentialCache;
    use anyhow::{Result, bail};
    use std::cell::Cell;
    use time::{Duration, OffsetDateTime};
    use vconsole_app::{CosCredentials, TemporaryKeys};

    fn credentials(id: &str, expired_time: i64) -> CosCredentials {
        CosCredentials {
            credentials: TemporaryKeys {
                tmp_secret_id: id.to_owned(),
                tmp_secret_key: "key".to_owned(),
                session_token: "token".to_owned(),
            },
            start_time: expired_time - 1800,
            expired_time,
        }
    }

    #[test]
    fn fresh_credentials_are_reused() -> Result<()> {
        let cache = CredentialCache::new(Duration::minutes(1));
        let now = OffsetDateTime::from_unix_timestamp(10_000)?;
        let fetches = Cell::new(0);
        let fetch = || {
            fetches.set(fetches.get() + 1);
            Ok(credentials("first", 20_000))
        };

        cache.get_or_fetch(now, fetch)?;
        let again = cache.get_or_fetch(now, || bail!("must not refetch"))?;
        assert_eq!(again.credentials.tmp_secret_id, "first");
        assert_eq!(fetches.get(), 1);
        Ok(())
    }

    #[test]
    fn credentials_inside_the_margin_are_refreshed() -> Result<()> {
        let cache = CredentialCache::new(Duration::minutes(1));
        let expiry = 20_000;
        cache.get_or_fetch(OffsetDateTime::from_unix_timestamp(0)?, || {
            Ok(credentials("first", expiry))
        })?;

        let near_expiry = OffsetDateTime::from_unix_timestamp(expiry - 30)?;
        let refreshed =
            cache.get_or_fetch(near_expiry, || Ok(credentials("second", expiry + 1800)))?;
        assert_eq!(refreshed.credentials.tmp_secret_id, "second");
        Ok(())
    }

    #[test]
    fn failed_refresh_leaves_cache_empty() -> Result<()> {
        let cache = CredentialCache::default();
        let now = OffsetDateTime::from_unix_timestamp(0)?;
        assert!(cache.get_or_fetch(now, || bail!("network error")).is_err());
        let fetched = cache.get_or_fetch(now, || Ok(credentials("later", 10_000)))?;
        assert_eq!(fetched.credentials.tmp_secret_id, "later");

        cache.invalidate();
        let refetched = cache.get_or_fetch(now, || Ok(credentials("again", 10_000)))?;
        assert_eq!(refetched.credentials.tmp_secret_id, "again");
        Ok(())
    }
}

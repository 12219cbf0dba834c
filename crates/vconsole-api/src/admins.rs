// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::IgnoredAny;
use vconsole_app::{AccountId, AdminAccount, AdminFilter, NewAdminAccount, PageParams, PageResult};

use crate::client::Client;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WithCountryCode<'a, T> {
    country_code: &'a str,
    #[serde(flatten)]
    account: &'a T,
}

impl Client {
    pub fn paging_admins(&self, params: PageParams) -> Result<PageResult<AdminAccount>> {
        self.get_query("/superAdmin/manager/page", &params)
            .with_context(|| format!("load admin page {}", params.page))
    }

    pub fn admin_account(&self, id: AccountId) -> Result<AdminAccount> {
        self.get_query("/superAdmin/manager", &[("id", id.get())])
    }

    pub fn add_admin_account(&self, account: &NewAdminAccount) -> Result<()> {
        self.post::<IgnoredAny, _>(
            "/superAdmin/manager",
            &WithCountryCode {
                country_code: "86",
                account,
            },
        )?;
        Ok(())
    }

    pub fn modify_admin_account(&self, account: &AdminAccount) -> Result<()> {
        self.put::<IgnoredAny, _>(
            "/superAdmin/manager",
            &WithCountryCode {
                country_code: "86",
                account,
            },
        )?;
        Ok(())
    }

    /// Searches admin accounts; `filter` is sent with every key present.
    pub fn filter_admin_accounts(&self, filter: &AdminFilter) -> Result<Vec<AdminAccount>> {
        self.post("/superAdmin/search", filter)
            .context("search admin accounts")
    }
}

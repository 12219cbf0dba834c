// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::IgnoredAny;
use vconsole_app::{
    PageParams, PageResult, Volunteer, VolunteerDetail, VolunteerFilter, VolunteerId,
    VolunteerLookup, VolunteerWhitelistState,
};

use crate::client::Client;

#[derive(Debug, Serialize)]
struct StateChange<'a> {
    ids: &'a [VolunteerId],
    state: VolunteerWhitelistState,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WhitelistExtension<'a> {
    ids: &'a [VolunteerId],
    expire_at: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Forbid<'a> {
    ids: &'a [VolunteerId],
    release_at: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PhoneLookup<'a> {
    pure_phone_numbers: &'a [String],
}

impl Client {
    pub fn paging_volunteers(&self, params: PageParams) -> Result<PageResult<Volunteer>> {
        self.get_query("/superAdmin/volunteer/page", &params)
            .with_context(|| format!("load volunteer page {}", params.page))
    }

    pub fn filter_volunteers(&self, filter: &VolunteerFilter) -> Result<Vec<Volunteer>> {
        self.post("/superAdmin/volunteer/search", filter)
            .context("search volunteers")
    }

    pub fn batch_modify_whitelist_state(
        &self,
        ids: &[VolunteerId],
        state: VolunteerWhitelistState,
    ) -> Result<()> {
        self.put::<IgnoredAny, _>(
            "/superAdmin/volunteer/changeBatchState",
            &StateChange { ids, state },
        )?;
        Ok(())
    }

    /// Extends whitelist membership until `expire_at` (`YYYY-MM-DD HH:MM:SS`).
    pub fn batch_extend_whitelist(&self, ids: &[VolunteerId], expire_at: &str) -> Result<()> {
        self.put::<IgnoredAny, _>(
            "/superAdmin/volunteer/editBatchWhite",
            &WhitelistExtension { ids, expire_at },
        )?;
        Ok(())
    }

    pub fn batch_forbid_volunteers(&self, ids: &[VolunteerId], release_at: &str) -> Result<()> {
        self.put::<IgnoredAny, _>(
            "/superAdmin/volunteer/editBatchViolate",
            &Forbid { ids, release_at },
        )?;
        Ok(())
    }

    pub fn volunteer_detail(&self, id: VolunteerId) -> Result<VolunteerDetail> {
        self.get_query("/superAdmin/volunteer/detail", &[("id", id.get())])
            .with_context(|| format!("load volunteer {id}"))
    }

    pub fn search_volunteers_by_phone(&self, phones: &[String]) -> Result<VolunteerLookup> {
        self.post(
            "/superAdmin/volunteer/searchedVolunteer",
            &PhoneLookup {
                pure_phone_numbers: phones,
            },
        )
    }
}

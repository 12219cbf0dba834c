// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use vconsole_app::{
    ActivityFilter, ActivityId, ActivityPreview, AdminAccount, AdminFilter, ListSource,
    PageParams, PageResult, SignUpFilter, SignUpRecord, Volunteer, VolunteerFilter,
};

use crate::client::Client;

#[derive(Debug, Clone)]
pub struct AdminSource {
    client: Client,
}

impl AdminSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl ListSource for AdminSource {
    type Record = AdminAccount;
    type Filter = AdminFilter;

    fn fetch_page(&mut self, params: PageParams) -> Result<PageResult<AdminAccount>> {
        self.client.paging_admins(params)
    }

    fn run_query(&mut self, filter: &AdminFilter) -> Result<Vec<AdminAccount>> {
        self.client.filter_admin_accounts(filter)
    }
}

#[derive(Debug, Clone)]
pub struct ActivitySource {
    client: Client,
}

impl ActivitySource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl ListSource for ActivitySource {
    type Record = ActivityPreview;
    type Filter = ActivityFilter;

    fn fetch_page(&mut self, params: PageParams) -> Result<PageResult<ActivityPreview>> {
        self.client.paging_activities(params)
    }

    fn run_query(&mut self, filter: &ActivityFilter) -> Result<Vec<ActivityPreview>> {
        self.client.filter_activities(filter)
    }
}

#[derive(Debug, Clone)]
pub struct VolunteerSource {
    client: Client,
}

impl VolunteerSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl ListSource for VolunteerSource {
    type Record = Volunteer;
    type Filter = VolunteerFilter;

    fn fetch_page(&mut self, params: PageParams) -> Result<PageResult<Volunteer>> {
        self.client.paging_volunteers(params)
    }

    fn run_query(&mut self, filter: &VolunteerFilter) -> Result<Vec<Volunteer>> {
        self.client.filter_volunteers(filter)
    }
}

/// Sign-up records of one activity; `activity_id` rides along on every call.
#[derive(Debug, Clone)]
pub struct SignUpSource {
    client: Client,
    activity_id: ActivityId,
}

impl SignUpSource {
    pub fn new(client: Client, activity_id: ActivityId) -> Self {
        Self {
            client,
            activity_id,
        }
    }

    pub fn activity_id(&self) -> ActivityId {
        self.activity_id
    }
}

impl ListSource for SignUpSource {
    type Record = SignUpRecord;
    type Filter = SignUpFilter;

    fn fetch_page(&mut self, params: PageParams) -> Result<PageResult<SignUpRecord>> {
        self.client.paging_sign_up_records(self.activity_id, params)
    }

    fn run_query(&mut self, filter: &SignUpFilter) -> Result<Vec<SignUpRecord>> {
        self.client.filter_sign_up_records(self.activity_id, filter)
    }
}

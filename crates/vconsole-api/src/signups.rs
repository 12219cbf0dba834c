// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use vconsole_app::{
    ActivityId, ActivityWorkId, PageParams, PageResult, SignUpFilter, SignUpRecord,
    SignUpRecordDetail, SignUpRecordId, TemporaryVolunteerForm, Volunteer, VolunteerLookup,
    VolunteerSignUpState,
};

use crate::client::Client;

/// A volunteer as listed under one work slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityWorkVolunteer {
    #[serde(flatten)]
    pub volunteer: Volunteer,
    pub activity_work_volunteer_state: VolunteerSignUpState,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SignUpPage {
    page: u32,
    size: u32,
    activity_id: ActivityId,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SignUpSearch<'a> {
    #[serde(flatten)]
    filter: &'a SignUpFilter,
    activity_id: ActivityId,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WorkVolunteers {
    activity_id: ActivityId,
    activity_work_id: ActivityWorkId,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StateChange {
    id: SignUpRecordId,
    activity_work_volunteer_state: VolunteerSignUpState,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchStateChange<'a> {
    ids: &'a [SignUpRecordId],
    activity_work_volunteer_state: VolunteerSignUpState,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AvailableLookup<'a> {
    activity_id: ActivityId,
    pure_phone_numbers: &'a [String],
}

#[derive(Debug, Serialize)]
struct Ids<'a> {
    ids: &'a [SignUpRecordId],
}

impl Client {
    pub fn paging_sign_up_records(
        &self,
        activity_id: ActivityId,
        params: PageParams,
    ) -> Result<PageResult<SignUpRecord>> {
        self.get_query(
            "/manage/activityWorkVolunteer/page",
            &SignUpPage {
                page: params.page,
                size: params.size,
                activity_id,
            },
        )
        .with_context(|| format!("load sign-up page {} of activity {activity_id}", params.page))
    }

    pub fn filter_sign_up_records(
        &self,
        activity_id: ActivityId,
        filter: &SignUpFilter,
    ) -> Result<Vec<SignUpRecord>> {
        self.post(
            "/manage/activityWorkVolunteer/search",
            &SignUpSearch {
                filter,
                activity_id,
            },
        )
        .with_context(|| format!("search sign-ups of activity {activity_id}"))
    }

    pub fn activity_work_volunteers(
        &self,
        activity_id: ActivityId,
        activity_work_id: ActivityWorkId,
    ) -> Result<Vec<ActivityWorkVolunteer>> {
        self.get_query(
            "/manage/activityWorkVolunteer/list",
            &WorkVolunteers {
                activity_id,
                activity_work_id,
            },
        )
    }

    pub fn sign_up_record_detail(&self, id: SignUpRecordId) -> Result<SignUpRecordDetail> {
        self.get_query("/manage/activityWorkVolunteer/detail", &[("id", id.get())])
            .with_context(|| format!("load sign-up {id}"))
    }

    pub fn set_sign_up_record_state(
        &self,
        id: SignUpRecordId,
        state: VolunteerSignUpState,
    ) -> Result<()> {
        self.put::<IgnoredAny, _>(
            "/manage/activityWorkVolunteer/changeState",
            &StateChange {
                id,
                activity_work_volunteer_state: state,
            },
        )?;
        Ok(())
    }

    pub fn batch_audit_sign_up_state(
        &self,
        ids: &[SignUpRecordId],
        state: VolunteerSignUpState,
    ) -> Result<()> {
        self.put::<IgnoredAny, _>(
            "activityWorkVolunteerState",
            &BatchStateChange {
                ids,
                activity_work_volunteer_state: state,
            },
        )?;
        Ok(())
    }

    /// Looks up volunteers that can still be pulled into `activity_id`.
    pub fn search_available_volunteers(
        &self,
        activity_id: ActivityId,
        phones: &[String],
    ) -> Result<VolunteerLookup> {
        self.post(
            "/manage/activityWorkVolunteer/searchWillPushVolunteer",
            &AvailableLookup {
                activity_id,
                pure_phone_numbers: phones,
            },
        )
    }

    pub fn batch_set_temp_volunteers(&self, form: &TemporaryVolunteerForm) -> Result<()> {
        self.post::<IgnoredAny, _>("/manage/activityWorkVolunteer/batchPull", form)?;
        Ok(())
    }

    pub fn batch_remove_temp_volunteers(&self, ids: &[SignUpRecordId]) -> Result<()> {
        self.delete::<IgnoredAny, _>("/manage/activityWorkVolunteer/batchKick", &Ids { ids })?;
        Ok(())
    }
}

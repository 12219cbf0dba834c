// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::IgnoredAny;
use vconsole_app::{
    ActivityDetail, ActivityDraft, ActivityFilter, ActivityForm, ActivityId, ActivityPreview,
    ActivityWorkId, ActivityWorkOption, PageParams, PageResult, VolunteerWork, VolunteerWorkForm,
};

use crate::client::Client;

#[derive(Debug, Serialize)]
struct ById {
    id: ActivityId,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DraftChange<'a> {
    id: ActivityId,
    #[serde(flatten)]
    form: &'a ActivityForm,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WorkAppend<'a> {
    id: ActivityId,
    work_list: [&'a VolunteerWorkForm; 1],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WorkAvailability {
    activity_id: ActivityId,
    work_id: ActivityWorkId,
    is_full: bool,
}

impl Client {
    pub fn paging_activities(&self, params: PageParams) -> Result<PageResult<ActivityPreview>> {
        self.get_query("/manage/activity/page", &params)
            .with_context(|| format!("load activity page {}", params.page))
    }

    pub fn filter_activities(&self, filter: &ActivityFilter) -> Result<Vec<ActivityPreview>> {
        self.post("/manage/activity/search", filter)
            .context("search activities")
    }

    pub fn activity_detail(&self, id: ActivityId) -> Result<ActivityDetail> {
        self.get_query("/manage/activity/detail", &ById { id })
            .with_context(|| format!("load activity {id}"))
    }

    pub fn create_activity_draft(&self, form: &ActivityForm) -> Result<()> {
        self.post::<IgnoredAny, _>("/admin/manage/activity/saveDraft", form)?;
        Ok(())
    }

    pub fn delete_activity_draft(&self, id: ActivityId) -> Result<()> {
        self.delete::<IgnoredAny, _>("/admin/manage/activity/delete", &ById { id })?;
        Ok(())
    }

    pub fn modify_activity_draft(&self, id: ActivityId, form: &ActivityForm) -> Result<()> {
        self.put::<IgnoredAny, _>("/manage/activity/update", &DraftChange { id, form })?;
        Ok(())
    }

    pub fn activity_draft(&self, id: ActivityId) -> Result<ActivityDraft> {
        self.get_query("/manage/activity/get", &ById { id })
            .with_context(|| format!("load draft {id}"))
    }

    /// Publishes an activity directly, skipping the audit step.
    pub fn publish_activity(&self, form: &ActivityForm) -> Result<()> {
        self.post::<IgnoredAny, _>("/superAdmin/manage/activity/publish", form)?;
        Ok(())
    }

    pub fn end_activity(&self, id: ActivityId) -> Result<()> {
        self.put::<IgnoredAny, _>("/manage/activityWorkVolunteer/ended", &ById { id })?;
        Ok(())
    }

    pub fn append_work(&self, id: ActivityId, work: &VolunteerWorkForm) -> Result<()> {
        self.post::<IgnoredAny, _>(
            "/manage/activity/work/batchAdd",
            &WorkAppend {
                id,
                work_list: [work],
            },
        )?;
        Ok(())
    }

    pub fn audit_pass_activity(&self, id: ActivityId) -> Result<()> {
        self.put::<IgnoredAny, _>("/superAdmin/manage/activity/reviewSuccess", &ById { id })?;
        Ok(())
    }

    pub fn audit_reject_activity(&self, id: ActivityId) -> Result<()> {
        self.put::<IgnoredAny, _>("/superAdmin/manage/activity/reviewFail", &ById { id })?;
        Ok(())
    }

    pub fn apply_for_activity(&self, id: ActivityId) -> Result<()> {
        self.put::<IgnoredAny, _>("/admin/manage/activity/apply", &ById { id })?;
        Ok(())
    }

    pub fn cancel_activity_application(&self, id: ActivityId) -> Result<()> {
        self.put::<IgnoredAny, _>("/admin/manage/activity/cancel", &ById { id })?;
        Ok(())
    }

    pub fn set_work_full(
        &self,
        activity_id: ActivityId,
        work_id: ActivityWorkId,
        is_full: bool,
    ) -> Result<()> {
        self.put::<IgnoredAny, _>(
            "/manage/activity/work/setFull",
            &WorkAvailability {
                activity_id,
                work_id,
                is_full,
            },
        )?;
        Ok(())
    }

    pub fn activity_work_detail(&self, id: ActivityWorkId) -> Result<VolunteerWork> {
        self.get_query("/manage/activityWork/detail", &[("id", id.get())])
    }

    /// Work slots of an activity, for select boxes.
    pub fn activity_works(&self, id: ActivityId) -> Result<Vec<ActivityWorkOption>> {
        self.get_query("/selectBox/activityWork", &ById { id })
    }
}

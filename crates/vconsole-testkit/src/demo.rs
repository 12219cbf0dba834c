// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use serde::Serialize;
use serde_json::{Map, Value, json};
use vconsole_app::{
    AccountId, ActivityPreview, AdminAccount, Gender, PageResult, Role, SignUpRecord,
    UserProfile, Volunteer, WorkRef,
};

use crate::ConsoleFaker;
use crate::backend::{FakeBackend, FakeResponse, RecordedRequest, envelope_fail, envelope_ok};

/// Seeded record set served by [`demo_backend`].
#[derive(Debug, Clone, PartialEq)]
pub struct DemoData {
    pub profile: UserProfile,
    pub admins: Vec<AdminAccount>,
    pub activities: Vec<ActivityPreview>,
    pub volunteers: Vec<Volunteer>,
    pub works: Vec<WorkRef>,
    pub sign_ups: Vec<SignUpRecord>,
}

impl DemoData {
    pub fn generate(seed: u64) -> Self {
        let mut faker = ConsoleFaker::new(seed);
        let admins = (1..=37).map(|id| faker.admin_account(id)).collect();
        let activities = (1..=58).map(|id| faker.activity_preview(id)).collect();
        let volunteers = (1..=120).map(|id| faker.volunteer(id)).collect::<Vec<_>>();
        let works = (1..=4).map(|id| faker.work(id)).collect::<Vec<_>>();
        let sign_ups = (1..=90)
            .map(|id| {
                let work = &works[faker.int_n(works.len())];
                faker.sign_up_record(id, work)
            })
            .collect();
        Self {
            profile: UserProfile {
                id: AccountId::new(1),
                name: "Demo Operator".to_owned(),
                sex: Gender::Unknown,
                desensitized_phone: "138****0000".to_owned(),
                role: Role::SuperAdmin,
            },
            admins,
            activities,
            volunteers,
            works,
            sign_ups,
        }
    }

    /// Answers one request the way the console backend would.
    pub fn respond(&self, request: &RecordedRequest) -> FakeResponse {
        if request.cookie("Authorization").is_none_or(|token| token.is_empty()) {
            return FakeResponse::status(401);
        }
        match (request.method.as_str(), request.path()) {
            ("GET", "/manage/account") => to_envelope(&self.profile),
            ("GET", "/superAdmin/manager/page") => page_of(&self.admins, request),
            ("POST", "/superAdmin/search") => search(&self.admins, request),
            ("GET", "/manage/activity/page") => page_of(&self.activities, request),
            ("POST", "/manage/activity/search") => search(&self.activities, request),
            ("GET", "/superAdmin/volunteer/page") => page_of(&self.volunteers, request),
            ("POST", "/superAdmin/volunteer/search") => search(&self.volunteers, request),
            ("GET", "/manage/activityWorkVolunteer/page") => page_of(&self.sign_ups, request),
            ("POST", "/manage/activityWorkVolunteer/search") => search(&self.sign_ups, request),
            ("GET", "/selectBox/activityWork") => to_envelope(&self.works),
            _ => FakeResponse::status(404),
        }
    }
}

/// Starts a fake backend serving [`DemoData::generate`] for `seed`.
pub fn demo_backend(seed: u64) -> Result<FakeBackend> {
    let data = DemoData::generate(seed);
    FakeBackend::start(move |request| data.respond(request))
}

fn to_envelope<T: Serialize + ?Sized>(value: &T) -> FakeResponse {
    match serde_json::to_value(value) {
        Ok(data) => envelope_ok(data),
        Err(error) => envelope_fail(&format!("encode response: {error}")),
    }
}

fn page_of<T: Serialize + Clone>(records: &[T], request: &RecordedRequest) -> FakeResponse {
    let number = |key: &str, default: u32| {
        request
            .query_param(key)
            .and_then(|value| value.parse::<u32>().ok())
            .filter(|value| *value > 0)
            .unwrap_or(default)
    };
    let page = number("page", 1);
    let size = number("size", 12);

    let total = records.len();
    let start = ((page - 1) as usize).saturating_mul(size as usize).min(total);
    let end = start.saturating_add(size as usize).min(total);
    let pages = total.div_ceil(size as usize);
    to_envelope(&PageResult {
        page,
        size,
        pages: u32::try_from(pages).unwrap_or(u32::MAX),
        total: total as u64,
        has_previous: page > 1,
        has_next: end < total,
        records: records[start..end].to_vec(),
    })
}

fn search<T: Serialize>(records: &[T], request: &RecordedRequest) -> FakeResponse {
    let filter = match request.json() {
        Ok(Value::Object(filter)) => filter,
        Ok(_) => return envelope_fail("search body must be an object"),
        Err(error) => return envelope_fail(&format!("{error:#}")),
    };
    let mut matches = Vec::new();
    for record in records {
        let Ok(value) = serde_json::to_value(record) else {
            continue;
        };
        if record_matches(&value, &filter) {
            matches.push(value);
        }
    }
    envelope_ok(json!(matches))
}

fn record_matches(record: &Value, filter: &Map<String, Value>) -> bool {
    filter
        .iter()
        .filter(|(key, value)| !value.is_null() && key.as_str() != "activityId")
        .all(|(key, wanted)| match key.as_str() {
            "keyword" => ["name", "city", "address"]
                .iter()
                .any(|field| text_contains(&record[*field], wanted)),
            "activityWorkId" => record["activityWork"]["id"] == *wanted,
            field => match (&record[field], wanted) {
                (Value::String(_), Value::String(_)) => text_contains(&record[field], wanted),
                (actual, wanted) => actual == wanted,
            },
        })
}

fn text_contains(haystack: &Value, needle: &Value) -> bool {
    match (haystack.as_str(), needle.as_str()) {
        (Some(haystack), Some(needle)) => haystack
            .to_lowercase()
            .contains(&needle.to_lowercase()),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::DemoData;
    use crate::backend::RecordedRequest;
    use anyhow::Result;
    use serde_json::{Value, json};

    fn request(method: &str, url: &str, body: Value) -> RecordedRequest {
        RecordedRequest {
            method: method.to_owned(),
            url: url.to_owned(),
            headers: vec![("Cookie".to_owned(), "Authorization=demo".to_owned())],
            body: body.to_string(),
        }
    }

    #[test]
    fn pages_report_totals() -> Result<()> {
        let data = DemoData::generate(1);
        let reply = data.respond(&request(
            "GET",
            "/superAdmin/manager/page?page=4&size=12",
            Value::Null,
        ));
        let body: Value = serde_json::from_str(&reply.body)?;
        assert_eq!(body["code"], 1);
        assert_eq!(body["data"]["total"], 37);
        assert_eq!(body["data"]["records"].as_array().map(Vec::len), Some(1));
        Ok(())
    }

    #[test]
    fn search_matches_text_and_codes() -> Result<()> {
        let data = DemoData::generate(2);
        let city = data.activities[0].city.clone();
        let state = data.activities[0].state;
        let reply = data.respond(&request(
            "POST",
            "/manage/activity/search",
            json!({"keyword": city.to_lowercase(), "state": state}),
        ));
        let body: Value = serde_json::from_str(&reply.body)?;
        let matches = body["data"].as_array().cloned().unwrap_or_default();
        let expected = data
            .activities
            .iter()
            .filter(|activity| activity.state == state && activity.name.contains(&city))
            .count();
        assert_eq!(matches.len(), expected);
        assert!(expected >= 1);
        Ok(())
    }

    #[test]
    fn sign_up_search_filters_by_work() -> Result<()> {
        let data = DemoData::generate(3);
        let work = data.works[0].id;
        let reply = data.respond(&request(
            "POST",
            "/manage/activityWorkVolunteer/search",
            json!({"activityId": 1, "activityWorkId": work, "purePhoneNumber": null}),
        ));
        let body: Value = serde_json::from_str(&reply.body)?;
        let expected = data
            .sign_ups
            .iter()
            .filter(|record| record.activity_work.id == work)
            .count();
        assert_eq!(body["data"].as_array().map(Vec::len), Some(expected));
        Ok(())
    }

    #[test]
    fn missing_session_is_rejected() {
        let data = DemoData::generate(4);
        let mut anonymous = request("GET", "/manage/account", Value::Null);
        anonymous.headers.clear();
        assert_eq!(data.respond(&anonymous).status, 401);
    }

    #[test]
    fn unknown_paths_are_not_found() {
        let data = DemoData::generate(5);
        assert_eq!(
            data.respond(&request("GET", "/nowhere", Value::Null)).status,
            404
        );
    }
}

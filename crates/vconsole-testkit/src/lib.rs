// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod backend;
mod demo;
mod memory;

pub use backend::{FakeBackend, FakeResponse, RecordedRequest, envelope_fail, envelope_ok};
pub use demo::{DemoData, demo_backend};
pub use memory::{InMemorySource, SourceCall};

use time::macros::format_description;
use time::{Date, Duration, Month, OffsetDateTime, Time};
use vconsole_app::{
    AccountId, ActivityId, ActivityPreview, ActivityState, ActivityWorkId, AdminAccount,
    AdminAccountState, Gender, SignUpRecord, SignUpRecordId, Volunteer, VolunteerId,
    VolunteerIdentity, VolunteerSignUpState, VolunteerType, VolunteerWhitelistState, WorkRef,
};

const FIRST_NAMES: [&str; 16] = [
    "Avery", "Jordan", "Taylor", "Riley", "Morgan", "Casey", "Alex", "Quinn", "Parker", "Drew",
    "Kai", "Elliot", "Robin", "Cameron", "Hayden", "Rowan",
];
const LAST_NAMES: [&str; 18] = [
    "Wang", "Li", "Zhang", "Liu", "Chen", "Yang", "Zhao", "Huang", "Zhou", "Wu", "Xu", "Sun",
    "Hu", "Zhu", "Gao", "Lin", "He", "Guo",
];

const CITIES: [&str; 10] = [
    "Hangzhou",
    "Shanghai",
    "Beijing",
    "Chengdu",
    "Nanjing",
    "Wuhan",
    "Xiamen",
    "Suzhou",
    "Shenzhen",
    "Guangzhou",
];
const VENUES: [&str; 8] = [
    "Olympic Sports Center",
    "Expo Hall",
    "Riverside Park",
    "Grand Theatre",
    "Music Pier",
    "City Arena",
    "Culture Plaza",
    "Lakeside Stage",
];
const EVENT_KINDS: [&str; 8] = [
    "Spring Gala",
    "Music Festival",
    "Marathon",
    "Book Fair",
    "Jazz Night",
    "Comedy Show",
    "Film Week",
    "Food Market",
];
const WORK_NAMES: [&str; 6] = [
    "Gate check",
    "Ticketing",
    "Wayfinding",
    "First aid",
    "Backstage",
    "Cleanup",
];

const REFERENCE_YEAR: i32 = 2026;

struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }

    fn bool(&mut self) -> bool {
        (self.next_u64() & 1) == 1
    }
}

/// Deterministic fixture generator for console records.
pub struct ConsoleFaker {
    rng: DeterministicRng,
}

impl ConsoleFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
        }
    }

    pub fn int_n(&mut self, n: usize) -> usize {
        self.rng.int_n(n)
    }

    pub fn person_name(&mut self) -> String {
        format!("{} {}", self.pick(&FIRST_NAMES), self.pick(&LAST_NAMES))
    }

    pub fn phone_number(&mut self) -> String {
        format!(
            "1{}{:09}",
            self.pick(&["3", "5", "7", "8"]),
            self.int_range_i64(0, 999_999_999)
        )
    }

    pub fn admin_account(&mut self, id: i64) -> AdminAccount {
        AdminAccount {
            id: AccountId::new(id),
            name: self.person_name(),
            sex: self.gender(),
            pure_phone_number: self.phone_number(),
            state: if self.rng.int_n(5) == 0 {
                AdminAccountState::Disabled
            } else {
                AdminAccountState::Normal
            },
            role: None,
        }
    }

    pub fn activity_preview(&mut self, id: i64) -> ActivityPreview {
        let city = self.pick(&CITIES).to_owned();
        let start = self.datetime_in_year(REFERENCE_YEAR);
        let end = start + Duration::hours(self.int_range_i64(2, 10));
        ActivityPreview {
            id: ActivityId::new(id),
            name: format!("{city} {}", self.pick(&EVENT_KINDS)),
            city,
            address: self.pick(&VENUES).to_owned(),
            state: ActivityState::ALL[self.rng.int_n(ActivityState::ALL.len())],
            cover_url: format!("https://cdn.example.com/cover/{id}.png"),
            start_at: format_timestamp(start),
            end_at: format_timestamp(end),
        }
    }

    pub fn volunteer(&mut self, id: i64) -> Volunteer {
        let identity = if self.rng.bool() {
            VolunteerIdentity::Student
        } else {
            VolunteerIdentity::SocialFigure
        };
        let state = self.whitelist_state();
        let reviewed = state != VolunteerWhitelistState::Normal;
        Volunteer {
            id: VolunteerId::new(id),
            name: self.person_name(),
            sex: self.gender(),
            age: self.int_range_i64(18, 60),
            country_code: "86".to_owned(),
            pure_phone_number: self.phone_number(),
            state,
            identity,
            create_at: format_timestamp(self.datetime_in_year(REFERENCE_YEAR - 1)),
            reviewer_name: reviewed.then(|| self.person_name()),
            review_at: reviewed.then(|| format_timestamp(self.datetime_in_year(REFERENCE_YEAR))),
            is_student_verified: identity == VolunteerIdentity::Student && self.rng.bool(),
        }
    }

    pub fn work(&mut self, id: i64) -> WorkRef {
        WorkRef {
            id: ActivityWorkId::new(id),
            label: self.pick(&WORK_NAMES).to_owned(),
        }
    }

    pub fn sign_up_record(&mut self, id: i64, work: &WorkRef) -> SignUpRecord {
        let state = VolunteerSignUpState::ALL[self.rng.int_n(VolunteerSignUpState::ALL.len())];
        let identity = VolunteerType::ALL[self.rng.int_n(VolunteerType::ALL.len())];
        let volunteer_state = self.whitelist_state();
        SignUpRecord {
            id: SignUpRecordId::new(id),
            pure_phone_number: self.phone_number(),
            name: self.person_name(),
            sex: self.gender(),
            age: self.int_range_i64(18, 60),
            volunteer_state,
            activity_work: work.clone(),
            activity_work_volunteer_state: state,
            activity_work_volunteer_identity: identity,
            use_white: volunteer_state == VolunteerWhitelistState::Whitelist,
            join_at: format_timestamp(self.datetime_in_year(REFERENCE_YEAR)),
            reviewer_name: (state != VolunteerSignUpState::AwaitingAudit)
                .then(|| self.person_name()),
            review_at: None,
            ip: format!(
                "10.{}.{}.{}",
                self.int_range_i64(0, 255),
                self.int_range_i64(0, 255),
                self.int_range_i64(1, 254)
            ),
            is_student_verified: self.rng.bool(),
            household_register: vec![self.pick(&CITIES).to_owned()],
        }
    }

    pub fn datetime_in_year(&mut self, year: i32) -> OffsetDateTime {
        let start = midnight_utc(year, Month::January, 1);
        let span = Duration::days(365).whole_seconds();
        start + Duration::seconds(self.int_range_i64(0, span - 1))
    }

    fn gender(&mut self) -> Gender {
        if self.rng.bool() {
            Gender::Male
        } else {
            Gender::Female
        }
    }

    fn whitelist_state(&mut self) -> VolunteerWhitelistState {
        match self.rng.int_n(10) {
            0 => VolunteerWhitelistState::Ignored,
            1 => VolunteerWhitelistState::Forbidden,
            2 | 3 => VolunteerWhitelistState::Whitelist,
            _ => VolunteerWhitelistState::Normal,
        }
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }

    fn int_range_i64(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        let span = max - min + 1;
        min + (self.rng.next_u64() % (span as u64)) as i64
    }
}

/// Formats a timestamp the way the backend sends them.
pub fn format_timestamp(value: OffsetDateTime) -> String {
    let format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    value
        .format(format)
        .unwrap_or_else(|_| value.unix_timestamp().to_string())
}

fn midnight_utc(year: i32, month: Month, day: u8) -> OffsetDateTime {
    match Date::from_calendar_date(year, month, day) {
        Ok(date) => date.with_time(Time::MIDNIGHT).assume_utc(),
        Err(_) => OffsetDateTime::UNIX_EPOCH,
    }
}

#[cfg(test)]
mod tests {
    use super::{ConsoleFaker, format_timestamp, midnight_utc};
    use time::Month;
    use vconsole_app::{VolunteerIdentity, VolunteerWhitelistState};

    #[test]
    fn same_seed_same_records() {
        let mut left = ConsoleFaker::new(42);
        let mut right = ConsoleFaker::new(42);
        assert_eq!(left.volunteer(1), right.volunteer(1));
        assert_eq!(left.activity_preview(2), right.activity_preview(2));
    }

    #[test]
    fn phone_numbers_have_eleven_digits() {
        let mut faker = ConsoleFaker::new(7);
        for _ in 0..50 {
            let phone = faker.phone_number();
            assert_eq!(phone.len(), 11, "{phone}");
            assert!(phone.starts_with('1'));
            assert!(phone.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn reviewed_volunteers_carry_a_reviewer() {
        let mut faker = ConsoleFaker::new(3);
        for id in 1..100 {
            let volunteer = faker.volunteer(id);
            let reviewed = volunteer.state != VolunteerWhitelistState::Normal;
            assert_eq!(volunteer.reviewer_name.is_some(), reviewed);
            if volunteer.is_student_verified {
                assert_eq!(volunteer.identity, VolunteerIdentity::Student);
            }
        }
    }

    #[test]
    fn sign_up_records_reference_their_work() {
        let mut faker = ConsoleFaker::new(5);
        let work = faker.work(9);
        let record = faker.sign_up_record(1, &work);
        assert_eq!(record.activity_work, work);
        assert_eq!(record.join_at.len(), 19);
    }

    #[test]
    fn timestamps_use_backend_layout() {
        let value = midnight_utc(2026, Month::March, 4);
        assert_eq!(format_timestamp(value), "2026-03-04 00:00:00");
    }

    #[test]
    fn int_n() {
        let mut faker = ConsoleFaker::new(11);
        for _ in 0..100 {
            assert!(faker.int_n(4) < 4);
        }
        assert_eq!(faker.int_n(1), 0);
    }
}

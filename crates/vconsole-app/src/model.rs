// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

use crate::columns::StatusTone;
use crate::ids::*;

/// Declares an enum carried on the wire as its integer code.
macro_rules! wire_enum {
    ($name:ident { $($variant:ident = $code:literal => $label:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "i64", into = "i64")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            pub const fn code(self) -> i64 {
                match self {
                    $(Self::$variant => $code),+
                }
            }

            pub fn from_code(code: i64) -> Option<Self> {
                match code {
                    $($code => Some(Self::$variant),)+
                    _ => None,
                }
            }

            pub const fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }

            /// Accepts either the integer code or the label, case-insensitively.
            pub fn parse(value: &str) -> Option<Self> {
                let value = value.trim();
                if let Ok(code) = value.parse::<i64>() {
                    return Self::from_code(code);
                }
                Self::ALL
                    .iter()
                    .copied()
                    .find(|candidate| candidate.label().eq_ignore_ascii_case(value))
            }
        }

        impl From<$name> for i64 {
            fn from(value: $name) -> Self {
                value.code()
            }
        }

        impl TryFrom<i64> for $name {
            type Error = String;

            fn try_from(code: i64) -> Result<Self, Self::Error> {
                Self::from_code(code)
                    .ok_or_else(|| format!("unknown {} code {code}", stringify!($name)))
            }
        }
    };
}

wire_enum!(Role {
    User = 0 => "user",
    Volunteer = 1 => "volunteer",
    Admin = 2 => "admin",
    SuperAdmin = 3 => "super admin",
});

wire_enum!(Gender {
    Male = 0 => "male",
    Female = 1 => "female",
    Unknown = 2 => "unknown",
});

wire_enum!(AdminAccountState {
    Normal = 0 => "active",
    Disabled = 1 => "disabled",
});

wire_enum!(ActivityType {
    Concert = 0 => "concert",
    Drama = 1 => "drama",
    Talkshow = 2 => "talk show",
    MusicFestival = 3 => "music festival",
    Sports = 4 => "sports",
});

wire_enum!(ActivityState {
    AwaitingSubmit = 0 => "draft",
    AwaitingAudit = 1 => "awaiting audit",
    AuditFailed = 2 => "returned",
    AuditPassed = 3 => "upcoming",
    Activated = 4 => "in progress",
    Finished = 5 => "finished",
});

wire_enum!(ActivityFeature {
    Insurance = 0 => "insurance",
    Meal = 1 => "meal",
    Water = 2 => "water",
    Clothes = 3 => "vest",
    Money = 4 => "allowance",
    Band = 5 => "wristband",
});

wire_enum!(VolunteerIdentity {
    Student = 0 => "student",
    SocialFigure = 1 => "public",
});

wire_enum!(VolunteerType {
    Normal = 0 => "regular",
    Temporary = 1 => "temporary",
    PersonInCharge = 2 => "lead",
});

wire_enum!(VolunteerSignUpState {
    AwaitingAudit = 0 => "awaiting audit",
    AuditPassed = 1 => "approved",
    AuditFailed = 2 => "rejected",
    Cancelled = 3 => "cancelled",
    CancelledForViolation = 4 => "cancelled (violation)",
    AtWork = 5 => "at work",
    Finished = 6 => "finished",
    OffWork = 7 => "absent",
});

wire_enum!(VolunteerWhitelistState {
    Normal = 0 => "normal",
    Ignored = 1 => "blacklist",
    Whitelist = 2 => "whitelist",
    Forbidden = 3 => "forbidden",
});

wire_enum!(WorkTag {
    Normal = 0 => "normal",
    Appended = 1 => "backfilled",
});

wire_enum!(BannerType {
    Activity = 0 => "activity",
    Live = 1 => "live recap",
    NoLink = 2 => "no link",
    MiniProgram = 3 => "mini program",
});

wire_enum!(IdCardType {
    MainlandIdCard = 0 => "mainland id card",
    HmtPass = 1 => "hk/macao/taiwan pass",
    Passport = 2 => "passport",
});

impl AdminAccountState {
    pub const fn tone(self) -> StatusTone {
        match self {
            Self::Normal => StatusTone::Success,
            Self::Disabled => StatusTone::Error,
        }
    }
}

impl ActivityState {
    pub const fn tone(self) -> StatusTone {
        match self {
            Self::AwaitingSubmit => StatusTone::Warning,
            Self::AwaitingAudit | Self::AuditPassed => StatusTone::Info,
            Self::AuditFailed => StatusTone::Error,
            Self::Activated => StatusTone::Success,
            Self::Finished => StatusTone::Neutral,
        }
    }
}

impl VolunteerWhitelistState {
    pub const fn tone(self) -> StatusTone {
        match self {
            Self::Normal => StatusTone::Success,
            Self::Ignored => StatusTone::Warning,
            Self::Whitelist => StatusTone::Info,
            Self::Forbidden => StatusTone::Error,
        }
    }
}

impl VolunteerType {
    pub const fn tone(self) -> StatusTone {
        match self {
            Self::Normal => StatusTone::Success,
            Self::Temporary => StatusTone::Info,
            Self::PersonInCharge => StatusTone::Warning,
        }
    }
}

impl VolunteerSignUpState {
    pub const fn tone(self) -> StatusTone {
        match self {
            Self::AwaitingAudit => StatusTone::Warning,
            Self::AuditPassed | Self::AtWork | Self::Finished => StatusTone::Success,
            Self::AuditFailed | Self::CancelledForViolation | Self::OffWork => StatusTone::Error,
            Self::Cancelled => StatusTone::Neutral,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginForm {
    pub phone: String,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: AccountId,
    pub name: String,
    pub sex: Gender,
    pub desensitized_phone: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminAccount {
    pub id: AccountId,
    pub name: String,
    pub sex: Gender,
    pub pure_phone_number: String,
    pub state: AdminAccountState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAdminAccount {
    pub name: String,
    pub sex: Gender,
    pub pure_phone_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityPreview {
    pub id: ActivityId,
    pub name: String,
    pub city: String,
    pub address: String,
    pub state: ActivityState,
    pub cover_url: String,
    pub start_at: String,
    pub end_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressDetail {
    pub detail: String,
    pub longitude: String,
    pub latitude: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolunteerWork {
    pub id: ActivityWorkId,
    pub name: String,
    pub is_full: bool,
    pub start_at: String,
    pub end_at: String,
    pub money: f64,
    pub integral: i64,
    pub label: WorkTag,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signup_success_count: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolunteerWorkForm {
    pub name: String,
    pub start_at: String,
    pub end_at: String,
    pub money: f64,
    pub integral: i64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityForm {
    pub name: String,
    pub cover_url: String,
    pub city: String,
    pub address: String,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    pub start_at: String,
    pub end_at: String,
    pub signup_start_at: String,
    pub signup_end_at: String,
    pub signup_cancel_at: String,
    #[serde(default)]
    pub address_detail: AddressDetail,
    #[serde(default)]
    pub announcement: String,
    #[serde(default)]
    pub features: Vec<ActivityFeature>,
    #[serde(default)]
    pub work_list: Vec<VolunteerWork>,
    #[serde(default)]
    pub is_display: bool,
    #[serde(default)]
    pub is_white: bool,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_work_instruction: bool,
    #[serde(default)]
    pub is_check: bool,
    #[serde(default)]
    pub is_money: bool,
    #[serde(default)]
    pub is_student_verify: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityDetail {
    pub id: ActivityId,
    pub state: ActivityState,
    #[serde(default)]
    pub signup_success_count: i64,
    #[serde(default)]
    pub manager: Option<AdminAccount>,
    #[serde(default)]
    pub reviewer: Option<AdminAccount>,
    #[serde(flatten)]
    pub form: ActivityForm,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityDraft {
    pub id: ActivityId,
    pub state: ActivityState,
    #[serde(flatten)]
    pub form: ActivityForm,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volunteer {
    pub id: VolunteerId,
    pub name: String,
    pub sex: Gender,
    pub age: i64,
    #[serde(default)]
    pub country_code: String,
    pub pure_phone_number: String,
    pub state: VolunteerWhitelistState,
    pub identity: VolunteerIdentity,
    #[serde(default)]
    pub create_at: String,
    #[serde(default)]
    pub reviewer_name: Option<String>,
    #[serde(default)]
    pub review_at: Option<String>,
    #[serde(default)]
    pub is_student_verified: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IdentityInfo {
    pub school: Option<String>,
    pub grade: Option<String>,
    pub major: Option<String>,
    pub job_unit: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViolationInfo {
    pub violate_count: i64,
    pub current_violate_count: i64,
    pub violate_at: Option<String>,
    pub release_at: Option<String>,
    pub white_list_expire_at: Option<String>,
    pub black_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkExperience {
    pub id: i64,
    pub activity_name: String,
    pub activity_work_names: String,
    pub activity_work_at: String,
    #[serde(default)]
    pub activity_transfer_amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolunteerDetail {
    pub id: VolunteerId,
    pub name: String,
    pub sex: Gender,
    pub age: i64,
    pub pure_phone_number: String,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub avatar_url: String,
    #[serde(default)]
    pub id_card: String,
    pub id_card_type: Option<IdCardType>,
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub volunteer_identity_vo: IdentityInfo,
    #[serde(default)]
    pub state_vo: ViolationInfo,
    #[serde(default)]
    pub activity_work_experience_total_num: i64,
    #[serde(default)]
    pub activity_work_experience_vos: Vec<WorkExperience>,
    #[serde(default)]
    pub total_activity_transfer_amount: Option<f64>,
}

/// A work slot as referenced from other records and select boxes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkRef {
    pub id: ActivityWorkId,
    pub label: String,
}

pub type ActivityWorkOption = WorkRef;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRecord {
    pub id: SignUpRecordId,
    pub pure_phone_number: String,
    pub name: String,
    pub sex: Gender,
    pub age: i64,
    pub volunteer_state: VolunteerWhitelistState,
    pub activity_work: WorkRef,
    pub activity_work_volunteer_state: VolunteerSignUpState,
    pub activity_work_volunteer_identity: VolunteerType,
    #[serde(default)]
    pub use_white: bool,
    #[serde(default)]
    pub join_at: String,
    #[serde(default)]
    pub reviewer_name: Option<String>,
    #[serde(default)]
    pub review_at: Option<String>,
    #[serde(default)]
    pub ip: String,
    #[serde(default)]
    pub is_student_verified: bool,
    #[serde(default)]
    pub household_register: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRecordDetail {
    #[serde(flatten)]
    pub record: SignUpRecord,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub identity_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemporaryVolunteerForm {
    pub id: ActivityId,
    pub volunteer_ids: Vec<VolunteerId>,
    pub activity_work_volunteer_identity: VolunteerType,
    pub money: f64,
    pub integral: i64,
    pub remark: String,
}

/// Result of looking volunteers up by phone number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolunteerLookup {
    pub result: Vec<Volunteer>,
    pub not_found: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemSettings {
    pub activity_cancel_count_limit: i64,
    pub violate_count_limit: i64,
    pub white_expire: i64,
    pub violate_expire: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Banner {
    pub id: BannerId,
    #[serde(rename = "type")]
    pub banner_type: BannerType,
    pub cover_url: String,
    pub target_id: i64,
    pub target_name: String,
    #[serde(rename = "miniProgramAppid")]
    pub mini_program_app_id: String,
    pub mini_program_page_path: String,
    pub is_display: bool,
}

/// Banner payload for create/modify; the backend resolves `coverPath` to a URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BannerForm {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<BannerId>,
    #[serde(rename = "type")]
    pub banner_type: BannerType,
    pub cover_path: String,
    pub target_id: i64,
    pub target_name: String,
    #[serde(rename = "miniProgramAppid")]
    pub mini_program_app_id: String,
    pub mini_program_page_path: String,
    pub is_display: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionItem<T = i64> {
    pub label: String,
    pub value: T,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemporaryKeys {
    pub tmp_secret_id: String,
    pub tmp_secret_key: String,
    pub session_token: String,
}

/// Temporary object-storage credentials; times are unix seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CosCredentials {
    pub credentials: TemporaryKeys,
    pub start_time: i64,
    pub expired_time: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TabKind {
    Admins,
    Activities,
    Volunteers,
    SignUps,
}

impl TabKind {
    pub const ALL: [Self; 4] = [
        Self::Admins,
        Self::Activities,
        Self::Volunteers,
        Self::SignUps,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Admins => "admins",
            Self::Activities => "activities",
            Self::Volunteers => "volunteers",
            Self::SignUps => "sign-ups",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "admins" => Some(Self::Admins),
            "activities" => Some(Self::Activities),
            "volunteers" => Some(Self::Volunteers),
            "sign-ups" | "signups" => Some(Self::SignUps),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppMode {
    Browse,
    Filter,
}

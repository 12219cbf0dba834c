// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;

use crate::ids::*;
use crate::model::{
    ActivityState, AdminAccountState, Gender, VolunteerIdentity, VolunteerSignUpState,
    VolunteerWhitelistState,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterField {
    /// Wire key, as it appears in the outgoing search payload.
    pub key: &'static str,
    pub label: &'static str,
}

/// A value that can sit in a filter form field.
pub trait FilterValue: Sized + Clone {
    fn parse_value(raw: &str) -> Result<Self>;

    fn display_value(&self) -> String;

    fn is_blank(&self) -> bool {
        false
    }

    /// Folds blank values to `None`.
    fn normalize(self) -> Option<Self> {
        if self.is_blank() { None } else { Some(self) }
    }
}

impl FilterValue for String {
    fn parse_value(raw: &str) -> Result<Self> {
        Ok(raw.trim().to_owned())
    }

    fn display_value(&self) -> String {
        self.clone()
    }

    fn is_blank(&self) -> bool {
        self.trim().is_empty()
    }

    fn normalize(self) -> Option<Self> {
        let trimmed = self.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_owned())
        }
    }
}

macro_rules! enum_filter_value {
    ($($name:ident),+ $(,)?) => {
        $(
            impl FilterValue for $name {
                fn parse_value(raw: &str) -> Result<Self> {
                    Self::parse(raw).ok_or_else(|| {
                        let known = Self::ALL
                            .iter()
                            .map(|value| value.label())
                            .collect::<Vec<_>>()
                            .join(", ");
                        anyhow!("unknown value {raw:?} -- expected one of: {known}")
                    })
                }

                fn display_value(&self) -> String {
                    self.label().to_owned()
                }
            }
        )+
    };
}

enum_filter_value!(
    ActivityState,
    AdminAccountState,
    Gender,
    VolunteerIdentity,
    VolunteerSignUpState,
    VolunteerWhitelistState,
);

impl FilterValue for ActivityWorkId {
    fn parse_value(raw: &str) -> Result<Self> {
        let value = raw
            .trim()
            .parse::<i64>()
            .with_context(|| format!("work id {raw:?} is not a number"))?;
        Ok(Self::new(value))
    }

    fn display_value(&self) -> String {
        self.to_string()
    }
}

/// A search form whose fields are all optional.
pub trait FilterForm:
    Clone + Default + PartialEq + std::fmt::Debug + Serialize + DeserializeOwned
{
    const FIELDS: &'static [FilterField];

    /// True when every field is unset or blank.
    fn is_empty(&self) -> bool;

    /// Trimmed copy with blank values folded to `None`.
    fn normalized(&self) -> Self;

    /// Sets a field from raw text input. Blank input clears the field.
    fn set_field(&mut self, key: &str, raw: &str) -> Result<()>;

    fn field_value(&self, key: &str) -> Option<String>;
}

fn parse_field<T: FilterValue>(raw: &str) -> Result<Option<T>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    T::parse_value(raw).map(Some)
}

macro_rules! filter_form {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($field:ident: $ty:ty => ($key:literal, $label:literal)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub struct $name {
            $(pub $field: Option<$ty>),+
        }

        impl FilterForm for $name {
            const FIELDS: &'static [FilterField] = &[
                $(FilterField { key: $key, label: $label }),+
            ];

            fn is_empty(&self) -> bool {
                true $(&& self.$field.as_ref().is_none_or(FilterValue::is_blank))+
            }

            fn normalized(&self) -> Self {
                Self {
                    $($field: self.$field.clone().and_then(FilterValue::normalize)),+
                }
            }

            fn set_field(&mut self, key: &str, raw: &str) -> Result<()> {
                match key {
                    $(
                        $key => {
                            self.$field = parse_field(raw)
                                .with_context(|| format!("invalid {}", $label))?;
                            Ok(())
                        }
                    )+
                    _ => bail!("unknown filter field {key:?}"),
                }
            }

            fn field_value(&self, key: &str) -> Option<String> {
                match key {
                    $($key => self.$field.as_ref().map(FilterValue::display_value),)+
                    _ => None,
                }
            }
        }
    };
}

filter_form!(AdminFilter {
    name: String => ("name", "name"),
    sex: Gender => ("sex", "gender"),
    state: AdminAccountState => ("state", "account state"),
});

filter_form!(ActivityFilter {
    state: ActivityState => ("state", "activity state"),
    keyword: String => ("keyword", "keyword"),
});

filter_form!(VolunteerFilter {
    name: String => ("name", "name"),
    pure_phone_number: String => ("purePhoneNumber", "phone"),
    identity: VolunteerIdentity => ("identity", "identity"),
    state: VolunteerWhitelistState => ("state", "list state"),
});

filter_form!(SignUpFilter {
    activity_work_id: ActivityWorkId => ("activityWorkId", "work"),
    activity_work_volunteer_state: VolunteerSignUpState => ("activityWorkVolunteerState", "sign-up state"),
    volunteer_state: VolunteerWhitelistState => ("volunteerState", "list state"),
    pure_phone_number: String => ("purePhoneNumber", "phone"),
});

// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::IgnoredAny;
use vconsole_app::{Gender, LoginForm, UserProfile};

use crate::client::Client;

const COUNTRY_CODE: &str = "86";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PhoneCode<'a> {
    country_code: &'a str,
    sms_code: &'a str,
    pure_phone_number: &'a str,
}

impl<'a> PhoneCode<'a> {
    fn from_form(form: &'a LoginForm) -> Self {
        Self {
            country_code: COUNTRY_CODE,
            sms_code: &form.code,
            pure_phone_number: &form.phone,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Phone<'a> {
    country_code: &'a str,
    pure_phone_number: &'a str,
}

#[derive(Debug, Serialize)]
struct ProfileChange<'a> {
    name: &'a str,
    sex: Gender,
}

impl Client {
    /// Signs in with an SMS code; the backend answers with session cookies.
    pub fn login(&self, form: &LoginForm) -> Result<()> {
        self.post::<IgnoredAny, _>("/public/manage/account/smsLogin", &PhoneCode::from_form(form))
            .context("sign in")?;
        Ok(())
    }

    /// Sends a sign-in code; the backend checks the number belongs to an admin.
    pub fn send_sms_code(&self, phone: &str) -> Result<()> {
        self.post::<IgnoredAny, _>(
            "/public/sms/manage/send",
            &Phone {
                country_code: COUNTRY_CODE,
                pure_phone_number: phone,
            },
        )?;
        Ok(())
    }

    pub fn send_sms_code_unchecked(&self, phone: &str) -> Result<()> {
        self.post::<IgnoredAny, _>(
            "/public/sms/send",
            &Phone {
                country_code: COUNTRY_CODE,
                pure_phone_number: phone,
            },
        )?;
        Ok(())
    }

    pub fn logout(&self) -> Result<()> {
        self.delete_without_body::<IgnoredAny>("/manage/account/logout")?;
        Ok(())
    }

    pub fn user_profile(&self) -> Result<UserProfile> {
        self.get("/manage/account").context("load profile")
    }

    pub fn modify_user_profile(&self, name: &str, sex: Gender) -> Result<()> {
        self.put::<IgnoredAny, _>("/manage/account", &ProfileChange { name, sex })?;
        Ok(())
    }

    pub fn update_phone_number(&self, form: &LoginForm) -> Result<()> {
        self.put::<IgnoredAny, _>("/manage/account/changePhone", &PhoneCode::from_form(form))?;
        Ok(())
    }
}

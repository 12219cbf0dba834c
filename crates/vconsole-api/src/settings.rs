// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use serde::de::IgnoredAny;
use vconsole_app::SystemSettings;

use crate::client::Client;

impl Client {
    pub fn system_settings(&self) -> Result<SystemSettings> {
        self.get("/superAdmin/redis/get").context("load system settings")
    }

    pub fn modify_system_settings(&self, settings: &SystemSettings) -> Result<()> {
        self.put::<IgnoredAny, _>("/superAdmin/redis/set", settings)?;
        Ok(())
    }
}

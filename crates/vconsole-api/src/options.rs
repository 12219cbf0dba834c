// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use vconsole_app::OptionItem;

use crate::client::Client;

impl Client {
    /// City names matching `keyword`.
    pub fn autocomplete_city(&self, keyword: &str) -> Result<Vec<String>> {
        self.get_with(
            "/public/autoComplete/city",
            &[("keyword", keyword)],
            |options: Vec<OptionItem<String>>| {
                options.into_iter().map(|option| option.value).collect()
            },
        )
    }

    pub fn activity_options(&self) -> Result<Vec<OptionItem>> {
        self.get("/getActivities")
    }

    pub fn live_options(&self) -> Result<Vec<OptionItem>> {
        self.get("/getLives")
    }
}

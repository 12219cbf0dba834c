// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use serde::Serialize;
use serde::de::IgnoredAny;
use vconsole_app::{Banner, BannerForm, BannerId};

use crate::client::Client;

#[derive(Debug, Serialize)]
struct ById {
    id: BannerId,
}

impl Client {
    pub fn banners(&self) -> Result<Vec<Banner>> {
        self.get("/superAdmin/getBannerList")
    }

    pub fn append_banner(&self, form: &BannerForm) -> Result<()> {
        if form.id.is_some() {
            bail!("new banners must not carry an id -- use modify_banner to edit one");
        }
        self.post::<IgnoredAny, _>("/addBanner", form)?;
        Ok(())
    }

    pub fn modify_banner(&self, form: &BannerForm) -> Result<()> {
        if form.id.is_none() {
            bail!("banner id is required to modify a banner");
        }
        self.put::<IgnoredAny, _>("/modifyBanner", form)?;
        Ok(())
    }

    pub fn delete_banner(&self, id: BannerId) -> Result<()> {
        self.delete::<IgnoredAny, _>("/deleteBanner", &ById { id })?;
        Ok(())
    }

    /// Sets the display order; `ids` lists every banner, first shown first.
    pub fn set_banner_order(&self, ids: &[BannerId]) -> Result<()> {
        self.put::<IgnoredAny, _>("/setBannerList", ids)?;
        Ok(())
    }
}

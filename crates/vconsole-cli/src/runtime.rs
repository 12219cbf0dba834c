// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use std::sync::Arc;
use vconsole_api::{ActivitySource, AdminSource, Client, SignUpSource, VolunteerSource};
use vconsole_app::{ActivityId, ListPanel, ListView, Notice, NoticeLog, TabKind};

/// Binds the four console tabs to backend list views.
pub struct ApiRuntime {
    client: Client,
    notices: Arc<NoticeLog>,
    page_size: u32,
    admins: ListView<AdminSource>,
    activities: ListView<ActivitySource>,
    volunteers: ListView<VolunteerSource>,
    sign_ups: Option<ListView<SignUpSource>>,
}

impl ApiRuntime {
    /// `notices` must be the sink `client` was built with.
    pub fn new(client: Client, notices: Arc<NoticeLog>, page_size: u32) -> Result<Self> {
        Ok(Self {
            admins: ListView::new(AdminSource::new(client.clone()), page_size)?,
            activities: ListView::new(ActivitySource::new(client.clone()), page_size)?,
            volunteers: ListView::new(VolunteerSource::new(client.clone()), page_size)?,
            sign_ups: None,
            client,
            notices,
            page_size,
        })
    }
}

impl vconsole_tui::ConsoleRuntime for ApiRuntime {
    fn panel(&mut self, tab: TabKind) -> Option<&mut dyn ListPanel> {
        match tab {
            TabKind::Admins => Some(&mut self.admins),
            TabKind::Activities => Some(&mut self.activities),
            TabKind::Volunteers => Some(&mut self.volunteers),
            TabKind::SignUps => self
                .sign_ups
                .as_mut()
                .map(|view| view as &mut dyn ListPanel),
        }
    }

    fn open_sign_ups(&mut self, activity_id: ActivityId) -> Result<()> {
        let source = SignUpSource::new(self.client.clone(), activity_id);
        self.sign_ups = Some(ListView::new(source, self.page_size)?);
        log::info!("sign-ups tab now lists activity {activity_id}");
        Ok(())
    }

    fn drain_notices(&mut self) -> Vec<Notice> {
        self.notices.drain()
    }

    fn login_required(&self) -> Option<u16> {
        self.notices.login_required_status()
    }
}

#[cfg(test)]
mod tests {
    use super::ApiRuntime;
    use anyhow::{Result, anyhow};
    use std::sync::Arc;
    use vconsole_api::{Client, ClientOptions, Session};
    use vconsole_app::{ActivityId, ListMode, NoticeLog, Role, TabKind};
    use vconsole_testkit::{FakeBackend, demo_backend};
    use vconsole_tui::ConsoleRuntime;

    fn sign_up_activity(runtime: &ApiRuntime) -> Option<ActivityId> {
        runtime
            .sign_ups
            .as_ref()
            .map(|view| view.source().activity_id())
    }

    fn runtime_for(backend: &FakeBackend, token: Option<&str>) -> Result<ApiRuntime> {
        let notices = Arc::new(NoticeLog::new());
        let mut options = ClientOptions::new(backend.base_url());
        options.session = token
            .map(|token| Session::new(token, Some(Role::SuperAdmin)))
            .transpose()?;
        let client = Client::new(options, notices.clone())?;
        ApiRuntime::new(client, notices, 12)
    }

    #[test]
    fn every_list_tab_has_a_panel_until_sign_ups() -> Result<()> {
        let backend = demo_backend(3)?;
        let mut runtime = runtime_for(&backend, Some("demo"))?;
        for tab in [TabKind::Admins, TabKind::Activities, TabKind::Volunteers] {
            let panel = runtime
                .panel(tab)
                .ok_or_else(|| anyhow!("{} has no panel", tab.label()))?;
            panel.load(1)?;
            assert_eq!(panel.mode(), ListMode::Paging);
            assert!(!panel.rows(false).is_empty());
        }
        assert!(runtime.panel(TabKind::SignUps).is_none());
        assert!(runtime.drain_notices().is_empty());
        Ok(())
    }

    #[test]
    fn open_sign_ups_scopes_requests_to_the_activity() -> Result<()> {
        let backend = demo_backend(3)?;
        let mut runtime = runtime_for(&backend, Some("demo"))?;
        runtime.open_sign_ups(ActivityId::new(8))?;
        assert_eq!(sign_up_activity(&runtime), Some(ActivityId::new(8)));

        let panel = runtime
            .panel(TabKind::SignUps)
            .ok_or_else(|| anyhow!("sign-ups panel missing"))?;
        panel.load(2)?;
        assert_eq!(panel.pagination().current_page, 2);

        let request = backend.last_request().ok_or_else(|| anyhow!("no request"))?;
        assert_eq!(request.path(), "/manage/activityWorkVolunteer/page");
        assert_eq!(request.query_param("activityId").as_deref(), Some("8"));
        assert_eq!(request.query_param("page").as_deref(), Some("2"));
        Ok(())
    }

    #[test]
    fn reopening_sign_ups_starts_a_fresh_list() -> Result<()> {
        let backend = demo_backend(3)?;
        let mut runtime = runtime_for(&backend, Some("demo"))?;
        runtime.open_sign_ups(ActivityId::new(8))?;
        runtime
            .panel(TabKind::SignUps)
            .ok_or_else(|| anyhow!("sign-ups panel missing"))?
            .load(3)?;

        runtime.open_sign_ups(ActivityId::new(9))?;
        let panel = runtime
            .panel(TabKind::SignUps)
            .ok_or_else(|| anyhow!("sign-ups panel missing"))?;
        assert_eq!(panel.pagination().current_page, 1);
        assert!(panel.rows(false).is_empty());
        assert_eq!(sign_up_activity(&runtime), Some(ActivityId::new(9)));
        Ok(())
    }

    #[test]
    fn missing_session_reports_login_required() -> Result<()> {
        let backend = demo_backend(3)?;
        let mut runtime = runtime_for(&backend, None)?;
        let panel = runtime
            .panel(TabKind::Admins)
            .ok_or_else(|| anyhow!("admins panel missing"))?;
        assert!(panel.load(1).is_err());

        assert_eq!(runtime.login_required(), Some(401));
        let notices = runtime.drain_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].message, "not signed in");
        Ok(())
    }
}

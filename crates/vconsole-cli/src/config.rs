// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use vconsole_api::Session;
use vconsole_app::{DEFAULT_PAGE_SIZE, Role, TabKind};

pub const APP_NAME: &str = "vconsole";
const CONFIG_VERSION: i64 = 1;
const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";
const DEFAULT_TIMEOUT: &str = "10s";
const CONFIG_PATH_ENV: &str = "VCONSOLE_CONFIG_PATH";
const TOKEN_ENV: &str = "VCONSOLE_TOKEN";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub server: Server,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub ui: Ui,
    #[serde(default)]
    pub log: Log,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            server: Server::default(),
            session: SessionConfig::default(),
            ui: Ui::default(),
            log: Log::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Server {
    pub base_url: Option<String>,
    pub timeout: Option<String>,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            base_url: Some(DEFAULT_BASE_URL.to_owned()),
            timeout: Some(DEFAULT_TIMEOUT.to_owned()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionConfig {
    pub token: Option<String>,
    /// Role label (`"super admin"`) or its numeric code.
    pub role: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ui {
    pub page_size: Option<u32>,
    pub default_tab: Option<String>,
    pub slice_query_results: Option<bool>,
}

impl Default for Ui {
    fn default() -> Self {
        Self {
            page_size: Some(DEFAULT_PAGE_SIZE),
            default_tab: Some(TabKind::Activities.label().to_owned()),
            slice_query_results: Some(false),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Log {
    pub file: Option<String>,
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set {CONFIG_PATH_ENV} to the config file")
        })?;

        let app_dir = config_root.join(APP_NAME);
        fs::create_dir_all(&app_dir)
            .with_context(|| format!("create config directory {}", app_dir.display()))?;
        Ok(app_dir.join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} is not versioned. Add `version = 1` and put values under [server], [session], [ui], and [log]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(base_url) = &self.server.base_url {
            let trimmed = base_url.trim();
            if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
                bail!(
                    "server.base_url in {} must start with http:// or https://, got {:?}",
                    path.display(),
                    base_url
                );
            }
        }

        if let Some(timeout) = &self.server.timeout {
            let parsed = parse_duration(timeout)?;
            if parsed <= Duration::ZERO {
                bail!(
                    "server.timeout in {} must be positive, got {}",
                    path.display(),
                    timeout
                );
            }
        }

        if let Some(role) = &self.session.role {
            parse_role(role).with_context(|| format!("invalid session.role in {}", path.display()))?;
        }

        if let Some(page_size) = self.ui.page_size
            && page_size == 0
        {
            bail!(
                "ui.page_size in {} must be positive, got 0",
                path.display()
            );
        }

        if let Some(tab) = &self.ui.default_tab {
            parse_tab(tab).with_context(|| format!("invalid ui.default_tab in {}", path.display()))?;
        }

        Ok(())
    }

    pub fn base_url(&self) -> &str {
        self.server
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim()
            .trim_end_matches('/')
    }

    pub fn timeout(&self) -> Result<Duration> {
        parse_duration(self.server.timeout.as_deref().unwrap_or(DEFAULT_TIMEOUT))
    }

    /// The session to start with; `VCONSOLE_TOKEN` wins over `[session] token`.
    pub fn session(&self) -> Result<Option<Session>> {
        let token = env::var(TOKEN_ENV)
            .ok()
            .filter(|token| !token.trim().is_empty())
            .or_else(|| self.session.token.clone())
            .filter(|token| !token.trim().is_empty());
        let Some(token) = token else {
            return Ok(None);
        };
        let role = self.session.role.as_deref().map(parse_role).transpose()?;
        Session::new(&token, role).map(Some)
    }

    pub fn page_size(&self) -> u32 {
        self.ui.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    pub fn default_tab(&self) -> Result<TabKind> {
        self.ui
            .default_tab
            .as_deref()
            .map_or(Ok(TabKind::Activities), parse_tab)
    }

    pub fn slice_query_results(&self) -> bool {
        self.ui.slice_query_results.unwrap_or(false)
    }

    pub fn log_file(&self) -> Result<PathBuf> {
        if let Some(file) = &self.log.file {
            return Ok(PathBuf::from(file));
        }
        let data_root = dirs::data_dir().ok_or_else(|| {
            anyhow!("cannot resolve data directory; set [log] file to a writable path")
        })?;
        Ok(data_root.join(APP_NAME).join("vconsole.log"))
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# vconsole config\n# Place this file at: {}\n\nversion = 1\n\n[server]\nbase_url = \"{}\"\ntimeout = \"{}\"\n\n[session]\n# Token from the Authorization cookie of a signed-in browser session,\n# or from `vconsole --login <phone>`. VCONSOLE_TOKEN overrides it.\n# token = \"...\"\n# role = \"super admin\"\n\n[ui]\npage_size = {}\ndefault_tab = \"activities\"\nslice_query_results = false\n\n[log]\n# Optional. Default is the platform data dir (for example ~/.local/share/vconsole/vconsole.log)\n# file = \"/absolute/path/to/vconsole.log\"\n",
            path.display(),
            DEFAULT_BASE_URL,
            DEFAULT_TIMEOUT,
            DEFAULT_PAGE_SIZE,
        )
    }
}

fn parse_role(raw: &str) -> Result<Role> {
    Role::parse(raw).ok_or_else(|| {
        let known = Role::ALL
            .iter()
            .map(|role| role.label())
            .collect::<Vec<_>>()
            .join(", ");
        anyhow!("unknown role {raw:?} -- use one of: {known}")
    })
}

fn parse_tab(raw: &str) -> Result<TabKind> {
    TabKind::parse(raw).ok_or_else(|| {
        let known = TabKind::ALL
            .iter()
            .map(|tab| tab.label())
            .collect::<Vec<_>>()
            .join(", ");
        anyhow!("unknown tab {raw:?} -- use one of: {known}")
    })
}

fn parse_duration(raw: &str) -> Result<Duration> {
    if let Some(value) = raw.strip_suffix("ms") {
        let millis: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        return Ok(Duration::from_millis(millis));
    }
    if let Some(value) = raw.strip_suffix('s') {
        let secs: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        return Ok(Duration::from_secs(secs));
    }
    if let Some(value) = raw.strip_suffix('m') {
        let mins: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        return Ok(Duration::from_secs(mins * 60));
    }

    bail!("invalid duration {raw:?}; use one of: <N>ms, <N>s, <N>m (for example 500ms or 5s)")
}

#[cfg(test)]
mod tests {
    use super::{Config, parse_duration};
    use anyhow::Result;
    use std::path::PathBuf;
    use std::sync::{Mutex, OnceLock};
    use std::time::Duration;
    use vconsole_app::{Role, TabKind};

    fn write_config(content: &str) -> Result<(tempfile::TempDir, PathBuf)> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("config.toml");
        std::fs::write(&path, content)?;
        Ok((temp, path))
    }

    fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        match ENV_LOCK.get_or_init(|| Mutex::new(())).lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    #[test]
    fn missing_config_uses_defaults() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let config = Config::load(&temp.path().join("missing.toml"))?;
        assert_eq!(config.version, 1);
        assert_eq!(config.base_url(), "http://127.0.0.1:8080");
        assert_eq!(config.timeout()?, Duration::from_secs(10));
        assert_eq!(config.page_size(), 12);
        assert_eq!(config.default_tab()?, TabKind::Activities);
        assert!(!config.slice_query_results());
        Ok(())
    }

    #[test]
    fn unversioned_config_is_rejected_with_actionable_message() -> Result<()> {
        let (_temp, path) = write_config("[server]\nbase_url = \"http://localhost\"\n")?;
        let error = Config::load(&path).expect_err("unversioned config should fail");
        let message = error.to_string();
        assert!(message.contains("version = 1"));
        assert!(message.contains("[server], [session], [ui], and [log]"));
        Ok(())
    }

    #[test]
    fn full_config_parses() -> Result<()> {
        let _guard = env_lock();
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::remove_var("VCONSOLE_TOKEN");
        }
        let (_temp, path) = write_config(
            "version = 1\n[server]\nbase_url = \"https://admin.example.org/api/\"\ntimeout = \"500ms\"\n[session]\ntoken = \"abc123\"\nrole = \"super admin\"\n[ui]\npage_size = 20\ndefault_tab = \"sign-ups\"\nslice_query_results = true\n[log]\nfile = \"/tmp/vconsole-test.log\"\n",
        )?;

        let config = Config::load(&path)?;
        assert_eq!(config.base_url(), "https://admin.example.org/api");
        assert_eq!(config.timeout()?, Duration::from_millis(500));
        assert_eq!(config.page_size(), 20);
        assert_eq!(config.default_tab()?, TabKind::SignUps);
        assert!(config.slice_query_results());
        assert_eq!(config.log_file()?, PathBuf::from("/tmp/vconsole-test.log"));

        let session = config.session()?.expect("token configured");
        assert_eq!(session.token, "abc123");
        assert_eq!(session.role, Some(Role::SuperAdmin));
        Ok(())
    }

    #[test]
    fn token_env_overrides_config() -> Result<()> {
        let _guard = env_lock();
        let (_temp, path) = write_config("version = 1\n[session]\ntoken = \"from-config\"\n")?;
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var("VCONSOLE_TOKEN", "from-env");
        }
        let session = Config::load(&path)?.session();
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var("VCONSOLE_TOKEN");
        }
        assert_eq!(session?.map(|session| session.token).as_deref(), Some("from-env"));
        Ok(())
    }

    #[test]
    fn blank_token_means_no_session() -> Result<()> {
        let _guard = env_lock();
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::remove_var("VCONSOLE_TOKEN");
        }
        let (_temp, path) = write_config("version = 1\n[session]\ntoken = \"  \"\n")?;
        assert!(Config::load(&path)?.session()?.is_none());
        Ok(())
    }

    #[test]
    fn malformed_config_returns_parse_error() -> Result<()> {
        let (_temp, path) = write_config("{{not toml")?;
        let error = Config::load(&path).expect_err("malformed config should fail");
        assert!(error.to_string().contains("parse TOML config"));
        Ok(())
    }

    #[test]
    fn unsupported_config_version_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 3\n")?;
        let error = Config::load(&path).expect_err("v3 config should fail");
        assert!(error.to_string().contains("unsupported config version 3"));
        Ok(())
    }

    #[test]
    fn default_path_honors_env_override() -> Result<()> {
        let _guard = env_lock();
        let temp = tempfile::tempdir()?;
        let override_path = temp.path().join("custom-config.toml");
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var("VCONSOLE_CONFIG_PATH", &override_path);
        }
        let resolved = Config::default_path()?;
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var("VCONSOLE_CONFIG_PATH");
        }
        assert_eq!(resolved, override_path);
        Ok(())
    }

    #[test]
    fn non_http_base_url_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[server]\nbase_url = \"ftp://example.org\"\n")?;
        let error = Config::load(&path).expect_err("ftp base url should fail");
        assert!(error.to_string().contains("http:// or https://"));
        Ok(())
    }

    #[test]
    fn zero_timeout_and_page_size_are_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[server]\ntimeout = \"0s\"\n")?;
        let error = Config::load(&path).expect_err("zero timeout should fail");
        assert!(error.to_string().contains("must be positive"));

        let (_temp, path) = write_config("version = 1\n[ui]\npage_size = 0\n")?;
        let error = Config::load(&path).expect_err("zero page size should fail");
        assert!(error.to_string().contains("ui.page_size"));
        Ok(())
    }

    #[test]
    fn unknown_tab_and_role_list_the_choices() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[ui]\ndefault_tab = \"banners\"\n")?;
        let error = Config::load(&path).expect_err("unknown tab should fail");
        assert!(format!("{error:#}").contains("admins, activities, volunteers, sign-ups"));

        let (_temp, path) = write_config("version = 1\n[session]\nrole = \"owner\"\n")?;
        let error = Config::load(&path).expect_err("unknown role should fail");
        assert!(format!("{error:#}").contains("super admin"));
        Ok(())
    }

    #[test]
    fn durations_parse_ms_seconds_and_minutes() -> Result<()> {
        assert_eq!(parse_duration("500ms")?, Duration::from_millis(500));
        assert_eq!(parse_duration("5s")?, Duration::from_secs(5));
        assert_eq!(parse_duration("2m")?, Duration::from_secs(120));
        assert!(parse_duration("soon").is_err());
        Ok(())
    }

    #[test]
    fn example_config_round_trips() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("config.toml");
        let example = Config::example_config(&path);
        assert!(example.contains("version = 1"));
        assert!(example.contains("[session]"));
        std::fs::write(&path, &example)?;
        let config = Config::load(&path)?;
        assert_eq!(config.page_size(), 12);
        Ok(())
    }
}

// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use log::{debug, warn};
use reqwest::blocking::{Client as HttpClient, RequestBuilder};
use reqwest::cookie::{CookieStore, Jar};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;
use vconsole_app::{Notice, NoticeLevel, Notifier};

use crate::error::ApiError;
use crate::session::Session;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Envelope code the backend uses for a failed call; any other code succeeds.
pub const FAILURE_CODE: i64 = 0;

#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub base_url: String,
    pub timeout: Duration,
    pub session: Option<Session>,
}

impl ClientOptions {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_owned(),
            timeout: DEFAULT_TIMEOUT,
            session: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct Envelope {
    code: i64,
    #[serde(default)]
    msg: String,
    #[serde(default)]
    data: Value,
}

/// Blocking client for the console backend.
///
/// Every call goes through one pipeline: cookies from the session jar are
/// attached, HTTP failures become notices plus an [`ApiError`], and the
/// `{code, msg, data}` envelope is unwrapped.
#[derive(Clone)]
pub struct Client {
    base_url: Url,
    http: HttpClient,
    jar: Arc<Jar>,
    notifier: Arc<dyn Notifier>,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

enum Payload<'a, B: ?Sized> {
    None,
    Query(&'a B),
    Json(&'a B),
}

impl Client {
    pub fn new(options: ClientOptions, notifier: Arc<dyn Notifier>) -> Result<Self> {
        let trimmed = options.base_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            bail!("server.base_url must not be empty");
        }
        let base_url = Url::parse(&format!("{trimmed}/"))
            .with_context(|| format!("server.base_url {trimmed:?} is not a valid URL"))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            bail!(
                "server.base_url must use http or https, got {:?}",
                base_url.scheme()
            );
        }

        let jar = Arc::new(Jar::default());
        if let Some(session) = &options.session {
            for cookie in session.cookies() {
                jar.add_cookie_str(&cookie, &base_url);
            }
        }

        let http = HttpClient::builder()
            .timeout(options.timeout)
            .cookie_provider(Arc::clone(&jar))
            .build()
            .context("build HTTP client")?;

        Ok(Self {
            base_url,
            http,
            jar,
            notifier,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// The session the cookie jar currently holds for the backend.
    pub fn session(&self) -> Option<Session> {
        let header = self.jar.cookies(&self.base_url)?;
        Session::from_cookie_header(header.to_str().ok()?)
    }

    pub fn set_session(&self, session: &Session) {
        for cookie in session.cookies() {
            self.jar.add_cookie_str(&cookie, &self.base_url);
        }
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    pub fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.call::<T, ()>(Method::GET, path, Payload::None)
    }

    pub fn get_query<T, Q>(&self, path: &str, query: &Q) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.call(Method::GET, path, Payload::Query(query))
    }

    /// Like [`Client::get_query`], with `transform` applied to the decoded data.
    pub fn get_with<T, Q, U>(
        &self,
        path: &str,
        query: &Q,
        transform: impl FnOnce(T) -> U,
    ) -> Result<U>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.get_query(path, query).map(transform)
    }

    pub fn post<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.call(Method::POST, path, Payload::Json(body))
    }

    pub fn put<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.call(Method::PUT, path, Payload::Json(body))
    }

    pub fn delete<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.call(Method::DELETE, path, Payload::Json(body))
    }

    pub fn delete_without_body<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.call::<T, ()>(Method::DELETE, path, Payload::None)
    }

    /// GETs an absolute URL and decodes the body as-is, without the envelope.
    pub fn raw_get<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let target = Url::parse(url).with_context(|| format!("invalid URL {url:?}"))?;
        let request = self.http.get(target.clone());
        let body = self.execute(request, target.as_str(), target.as_str())?;
        serde_json::from_str(&body).map_err(|source| {
            ApiError::Decode {
                path: target.to_string(),
                source,
            }
            .into()
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        let joined = format!("{}/{}", self.base_url(), path.trim_start_matches('/'));
        Url::parse(&joined).with_context(|| format!("invalid endpoint path {path:?}"))
    }

    fn call<T, B>(&self, method: Method, path: &str, payload: Payload<'_, B>) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.endpoint(path)?;
        debug!("{method} {url}");
        let mut request = self.http.request(method, url.clone());
        request = match payload {
            Payload::None => request,
            Payload::Query(query) => request.query(query),
            Payload::Json(body) => request.json(body),
        };

        let body = self.execute(request, url.as_str(), path)?;
        let envelope: Envelope =
            serde_json::from_str(&body).map_err(|source| ApiError::Decode {
                path: path.to_owned(),
                source,
            })?;
        if envelope.code == FAILURE_CODE {
            self.notify(NoticeLevel::Error, &envelope.msg);
            return Err(ApiError::Business {
                code: envelope.code,
                msg: envelope.msg,
            }
            .into());
        }

        serde_json::from_value(envelope.data).map_err(|source| {
            warn!("unexpected data shape from {path}: {source}");
            ApiError::Decode {
                path: path.to_owned(),
                source,
            }
            .into()
        })
    }

    /// Sends `request` to `url` and returns the body of a 2xx response.
    fn execute(&self, request: RequestBuilder, url: &str, path: &str) -> Result<String> {
        let response = request.send().map_err(|source| {
            self.notify(NoticeLevel::Error, "network error");
            ApiError::Transport {
                url: url.to_owned(),
                source,
            }
        })?;

        let status = response.status();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                let message = if status == StatusCode::UNAUTHORIZED {
                    "not signed in"
                } else {
                    "permission denied"
                };
                self.notify(NoticeLevel::Error, message);
                self.notifier.login_required(status.as_u16());
                return Err(ApiError::LoginRequired {
                    status: status.as_u16(),
                }
                .into());
            }
            _ if !status.is_success() => {
                self.notify(NoticeLevel::Error, "network error");
                return Err(ApiError::Status {
                    status: status.as_u16(),
                    path: path.to_owned(),
                }
                .into());
            }
            _ => {}
        }

        response.text().map_err(|source| {
            self.notify(NoticeLevel::Error, "network error");
            ApiError::Transport {
                url: url.to_owned(),
                source,
            }
            .into()
        })
    }

    fn notify(&self, level: NoticeLevel, message: &str) {
        self.notifier.notify(Notice::new(level, message));
    }
}

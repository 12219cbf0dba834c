// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde_json::{Value, json};
use tiny_http::{Header, Response, Server};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl RecordedRequest {
    pub fn path(&self) -> &str {
        self.url.split_once('?').map_or(self.url.as_str(), |(path, _)| path)
    }

    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let Some((_, query)) = self.url.split_once('?') else {
            return Vec::new();
        };
        url::form_urlencoded::parse(query.as_bytes())
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect()
    }

    pub fn query_param(&self, key: &str) -> Option<String> {
        self.query_pairs()
            .into_iter()
            .find_map(|(name, value)| (name == key).then_some(value))
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(field, _)| field.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn cookie(&self, name: &str) -> Option<String> {
        self.header("Cookie")?.split(';').find_map(|pair| {
            let (key, value) = pair.trim().split_once('=')?;
            (key == name).then(|| value.to_owned())
        })
    }

    pub fn json(&self) -> Result<Value> {
        serde_json::from_str(&self.body)
            .with_context(|| format!("decode body of {} {}", self.method, self.url))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeResponse {
    pub status: u16,
    pub body: String,
}

impl FakeResponse {
    pub fn json(status: u16, value: &Value) -> Self {
        Self {
            status,
            body: value.to_string(),
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: String::new(),
        }
    }
}

/// A success envelope wrapping `data`.
pub fn envelope_ok(data: Value) -> FakeResponse {
    FakeResponse::json(200, &json!({"code": 1, "msg": "success", "data": data}))
}

/// A business failure envelope carrying `msg`.
pub fn envelope_fail(msg: &str) -> FakeResponse {
    FakeResponse::json(200, &json!({"code": 0, "msg": msg, "data": null}))
}

/// An HTTP server on a loopback port that answers with `handler` and keeps
/// every request it saw. Stops when dropped.
pub struct FakeBackend {
    base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl FakeBackend {
    pub fn start<H>(handler: H) -> Result<Self>
    where
        H: Fn(&RecordedRequest) -> FakeResponse + Send + 'static,
    {
        let server =
            Server::http("127.0.0.1:0").map_err(|error| anyhow!("start fake backend: {error}"))?;
        let base_url = format!("http://{}", server.server_addr());
        let requests = Arc::new(Mutex::new(Vec::new()));
        let stop = Arc::new(AtomicBool::new(false));

        let thread_requests = Arc::clone(&requests);
        let thread_stop = Arc::clone(&stop);
        let handle = thread::Builder::new()
            .name("fake-backend".to_owned())
            .spawn(move || serve(&server, &handler, &thread_requests, &thread_stop))
            .context("spawn fake backend thread")?;

        log::debug!("fake backend listening on {base_url}");
        Ok(Self {
            base_url,
            requests,
            stop,
            handle: Some(handle),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        match self.requests.lock() {
            Ok(requests) => requests.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn request_count(&self) -> usize {
        self.requests().len()
    }

    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.requests().pop()
    }
}

impl Drop for FakeBackend {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn serve<H>(
    server: &Server,
    handler: &H,
    requests: &Mutex<Vec<RecordedRequest>>,
    stop: &AtomicBool,
) where
    H: Fn(&RecordedRequest) -> FakeResponse,
{
    while !stop.load(Ordering::SeqCst) {
        let mut request = match server.recv_timeout(Duration::from_millis(25)) {
            Ok(Some(request)) => request,
            Ok(None) => continue,
            Err(error) => {
                log::warn!("fake backend stopped: {error}");
                break;
            }
        };

        let mut body = String::new();
        if let Err(error) = request.as_reader().read_to_string(&mut body) {
            log::warn!("fake backend could not read request body: {error}");
        }
        let recorded = RecordedRequest {
            method: request.method().to_string(),
            url: request.url().to_owned(),
            headers: request
                .headers()
                .iter()
                .map(|header| (header.field.to_string(), header.value.to_string()))
                .collect(),
            body,
        };

        let reply = handler(&recorded);
        match requests.lock() {
            Ok(mut log) => log.push(recorded),
            Err(poisoned) => poisoned.into_inner().push(recorded),
        }

        let mut response = Response::from_string(reply.body).with_status_code(reply.status);
        if let Ok(header) = Header::from_bytes("Content-Type", "application/json") {
            response = response.with_header(header);
        }
        if let Err(error) = request.respond(response) {
            log::warn!("fake backend could not respond: {error}");
        }
    }
}

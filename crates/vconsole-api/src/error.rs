// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use thiserror::Error;

/// Failures of a backend call. Carried inside `anyhow::Error`; recover it
/// with `downcast_ref::<ApiError>()`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("cannot reach {url} -- check [server] base_url and that the backend is up ({source})")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("session rejected with HTTP {status} -- sign in again and update [session] token")]
    LoginRequired { status: u16 },

    #[error("server returned HTTP {status} for {path}")]
    Status { status: u16, path: String },

    #[error("{msg}")]
    Business { code: i64, msg: String },

    #[error("decode response from {path}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    pub fn is_login_required(&self) -> bool {
        matches!(self, Self::LoginRequired { .. })
    }
}

/// The HTTP status behind a login-required failure anywhere in `error`'s chain.
pub fn login_required_status(error: &anyhow::Error) -> Option<u16> {
    error.chain().find_map(|cause| match cause.downcast_ref::<ApiError>() {
        Some(ApiError::LoginRequired { status }) => Some(*status),
        _ => None,
    })
}

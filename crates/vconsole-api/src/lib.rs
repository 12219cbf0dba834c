// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod account;
mod activities;
mod admins;
mod banners;
mod client;
mod error;
mod options;
mod session;
mod settings;
mod signups;
mod sources;
mod storage;
mod volunteers;

pub use client::{Client, ClientOptions, DEFAULT_TIMEOUT, FAILURE_CODE};
pub use error::{ApiError, login_required_status};
pub use session::Session;
pub use signups::ActivityWorkVolunteer;
pub use sources::{ActivitySource, AdminSource, SignUpSource, VolunteerSource};
pub use storage::{CredentialCache, DEFAULT_REFRESH_MARGIN};

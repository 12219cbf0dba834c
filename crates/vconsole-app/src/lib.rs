// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod columns;
pub mod filters;
pub mod ids;
pub mod listing;
pub mod model;
pub mod notice;
pub mod panel;
pub mod state;

pub use columns::*;
pub use filters::*;
pub use ids::*;
pub use listing::*;
pub use model::*;
pub use notice::*;
pub use panel::*;
pub use state::*;

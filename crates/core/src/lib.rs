// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The workmode engine.
//!
//! [`TeleworkEngine`] loads records through the store traits in [`store`],
//! runs the resolution, conflict, validation and statistics rules from
//! `workmode_domain`, and writes override and profile changes back.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod engine;
mod error;
mod policy;
pub mod store;

#[cfg(test)]
mod tests;

pub use engine::{AUTO_APPROVER, OverrideRequest, RequestOutcome, TeleworkEngine};
pub use error::{CoreError, StoreError};
pub use policy::EnginePolicy;
pub use store::{OverrideStore, ProfileStore, TeamRuleStore};

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod catalog;
pub mod evaluator;
pub mod ledger;
pub mod progress;
pub mod sign_in;

pub use catalog::{CatalogError, CatalogService};
pub use evaluator::Evaluator;
pub use ledger::{PointsAward, PointsLedger, PointsSummary};
pub use progress::{ProgressService, ProgressUpdate};
pub use sign_in::{SignInOutcome, SignInStatus, SignInTracker};

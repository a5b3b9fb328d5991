// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Hanzi Garden: gamification backend for a children's Chinese-character
//! learning app.
//!
//! This crate provides the API for points, daily sign-in streaks,
//! achievements, badges and flashcard learning progress.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::Db;
use services::{CatalogService, Evaluator, PointsLedger, ProgressService, SignInTracker};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Db,
    pub catalog: Arc<CatalogService>,
    pub evaluator: Evaluator,
    pub ledger: PointsLedger,
    pub sign_in: SignInTracker,
    pub progress: ProgressService,
}

impl AppState {
    /// Wire the services around an opened database and a loaded catalog.
    pub fn new(config: Config, db: Db, catalog: CatalogService) -> Self {
        let catalog = Arc::new(catalog);
        let evaluator = Evaluator::new(db.clone(), catalog.clone());
        let ledger = PointsLedger::new(db.clone(), evaluator.clone());
        let sign_in = SignInTracker::new(
            db.clone(),
            ledger.clone(),
            evaluator.clone(),
            config.day_offset,
        );
        let progress = ProgressService::new(db.clone(), evaluator.clone());

        Self {
            config,
            db,
            catalog,
            evaluator,
            ledger,
            sign_in,
            progress,
        }
    }
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Public catalog routes.

use crate::models::{Achievement, Badge};
use crate::AppState;
use axum::{extract::State, routing::get, Json, Router};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/achievements", get(list_achievements))
        .route("/api/badges", get(list_badges))
}

/// All achievements, in catalog order.
async fn list_achievements(State(state): State<Arc<AppState>>) -> Json<Vec<Achievement>> {
    Json(state.catalog.achievements().to_vec())
}

/// All badges, in catalog order.
async fn list_badges(State(state): State<Arc<AppState>>) -> Json<Vec<Badge>> {
    Json(state.catalog.badges().to_vec())
}

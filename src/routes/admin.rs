// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Administrative routes (admin JWT claim required).

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::routes::api::UserBadgeDetails;
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::post,
    Extension, Json, Router,
};
use axum_extra::extract::WithRejection;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route(
        "/api/admin/users/{user_id}/badges/{badge_id}",
        post(grant_badge),
    )
}

/// Grant a badge to a user regardless of its threshold.
async fn grant_badge(
    State(state): State<Arc<AppState>>,
    Extension(admin): Extension<AuthUser>,
    WithRejection(Path((user_id, badge_id)), _): WithRejection<Path<(u64, u32)>, AppError>,
) -> Result<Json<UserBadgeDetails>> {
    tracing::info!(
        admin_id = admin.user_id,
        user_id,
        badge_id,
        "Admin badge grant requested"
    );

    let grant = state.evaluator.grant_badge(user_id, badge_id).await?;

    let badge = state
        .catalog
        .badge(badge_id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("Badge {} not found", badge_id)))?;

    Ok(Json(UserBadgeDetails { grant, badge }))
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for authenticated users.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{
    Achievement, Badge, LearningProgress, PointRecord, SignInEvent, UserAchievement, UserBadge,
};
use crate::services::CatalogService;
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, put},
    Extension, Json, Router,
};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// API routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/signin", get(get_sign_in_status).post(sign_in))
        .route("/api/points", get(get_points).post(add_points))
        .route("/api/me/achievements", get(get_my_achievements))
        .route("/api/me/badges", get(get_my_badges))
        .route("/api/progress", get(get_progress))
        .route("/api/progress/{flashcard_id}", put(update_progress))
}

// ─── Grant views ─────────────────────────────────────────────

/// Achievement grant with its catalog entry embedded.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserAchievementDetails {
    #[serde(flatten)]
    pub grant: UserAchievement,
    pub achievement: Achievement,
}

/// Badge grant with its catalog entry embedded.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserBadgeDetails {
    #[serde(flatten)]
    pub grant: UserBadge,
    pub badge: Badge,
}

/// Attach catalog entries to grants. Grants for entries no longer in the
/// catalog are dropped.
pub(crate) fn achievement_details(
    catalog: &CatalogService,
    grants: Vec<UserAchievement>,
) -> Vec<UserAchievementDetails> {
    grants
        .into_iter()
        .filter_map(|grant| match catalog.achievement(grant.achievement_id) {
            Some(achievement) => Some(UserAchievementDetails {
                achievement: achievement.clone(),
                grant,
            }),
            None => {
                tracing::debug!(
                    achievement_id = grant.achievement_id,
                    "Skipping grant for achievement missing from catalog"
                );
                None
            }
        })
        .collect()
}

pub(crate) fn badge_details(
    catalog: &CatalogService,
    grants: Vec<UserBadge>,
) -> Vec<UserBadgeDetails> {
    grants
        .into_iter()
        .filter_map(|grant| match catalog.badge(grant.badge_id) {
            Some(badge) => Some(UserBadgeDetails {
                badge: badge.clone(),
                grant,
            }),
            None => {
                tracing::debug!(
                    badge_id = grant.badge_id,
                    "Skipping grant for badge missing from catalog"
                );
                None
            }
        })
        .collect()
}

// ─── Sign-in ─────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SignInResponse {
    pub sign_in_record: SignInEvent,
    pub consecutive_days: u32,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub sign_in_points: i64,
    pub new_achievements: Vec<UserAchievementDetails>,
    pub new_badges: Vec<UserBadgeDetails>,
}

/// Sign in for today.
async fn sign_in(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<SignInResponse>> {
    let outcome = state
        .sign_in
        .sign_in(user.user_id, chrono::Utc::now())
        .await?;

    Ok(Json(SignInResponse {
        sign_in_record: outcome.sign_in,
        consecutive_days: outcome.consecutive_days,
        sign_in_points: outcome.sign_in_points,
        new_achievements: achievement_details(&state.catalog, outcome.new_achievements),
        new_badges: badge_details(&state.catalog, outcome.new_badges),
    }))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SignInStatusResponse {
    pub signed_in_today: bool,
    pub current_streak: u32,
}

async fn get_sign_in_status(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<SignInStatusResponse>> {
    let status = state
        .sign_in
        .status(user.user_id, chrono::Utc::now())
        .await?;

    Ok(Json(SignInStatusResponse {
        signed_in_today: status.signed_in_today,
        current_streak: status.current_streak,
    }))
}

// ─── Points ──────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PointsResponse {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total_points: i64,
    /// Newest first
    pub records: Vec<PointRecord>,
}

async fn get_points(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<PointsResponse>> {
    let summary = state.ledger.history(user.user_id).await?;

    Ok(Json(PointsResponse {
        total_points: summary.total_points,
        records: summary.records,
    }))
}

/// Body of a point award (e.g. a finished mini-game).
#[derive(Deserialize, Validate)]
pub struct AddPointsRequest {
    #[validate(
        required(message = "points is required"),
        range(min = -10000, max = 10000)
    )]
    points: Option<i64>,
    #[serde(rename = "type")]
    #[validate(
        required(message = "type is required"),
        length(min = 1, max = 32)
    )]
    kind: Option<String>,
    #[validate(length(max = 200))]
    description: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AddPointsResponse {
    pub record: PointRecord,
    pub new_achievements: Vec<UserAchievementDetails>,
}

async fn add_points(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Json(body), _): WithRejection<Json<AddPointsRequest>, AppError>,
) -> Result<Json<AddPointsResponse>> {
    body.validate()?;

    let (Some(points), Some(kind)) = (body.points, body.kind) else {
        return Err(AppError::Validation(
            "points and type are required".to_string(),
        ));
    };
    if points == 0 {
        return Err(AppError::Validation("points must be non-zero".to_string()));
    }

    let award = state
        .ledger
        .award_points(user.user_id, points, &kind, body.description)
        .await?;

    Ok(Json(AddPointsResponse {
        record: award.record,
        new_achievements: achievement_details(&state.catalog, award.new_achievements),
    }))
}

// ─── Achievements & Badges ───────────────────────────────────

/// The user's achievements, most recent first.
async fn get_my_achievements(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<UserAchievementDetails>>> {
    let grants = state.db.user_achievements(user.user_id).await?;
    Ok(Json(achievement_details(&state.catalog, grants)))
}

/// The user's badges, most recent first.
async fn get_my_badges(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<UserBadgeDetails>>> {
    let grants = state.db.user_badges(user.user_id).await?;
    Ok(Json(badge_details(&state.catalog, grants)))
}

// ─── Learning progress ───────────────────────────────────────

async fn get_progress(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<LearningProgress>>> {
    Ok(Json(state.progress.list(user.user_id).await?))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProgressRequest {
    is_learned: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UpdateProgressResponse {
    pub progress: LearningProgress,
    pub learned_count: u32,
    pub new_badges: Vec<UserBadgeDetails>,
}

async fn update_progress(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Path(flashcard_id), _): WithRejection<Path<u32>, AppError>,
    WithRejection(Json(body), _): WithRejection<Json<UpdateProgressRequest>, AppError>,
) -> Result<Json<UpdateProgressResponse>> {
    let update = state
        .progress
        .update(
            user.user_id,
            flashcard_id,
            body.is_learned,
            chrono::Utc::now(),
        )
        .await?;

    Ok(Json(UpdateProgressResponse {
        progress: update.progress,
        learned_count: update.learned_count,
        new_badges: badge_details(&state.catalog, update.new_badges),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_add_points_validation() {
        let valid: AddPointsRequest =
            serde_json::from_str(r#"{"points": 20, "type": "game"}"#).unwrap();
        assert!(valid.validate().is_ok());

        let missing_type: AddPointsRequest =
            serde_json::from_str(r#"{"points": 20}"#).unwrap();
        assert!(missing_type.validate().is_err());

        let empty_type: AddPointsRequest =
            serde_json::from_str(r#"{"points": 20, "type": ""}"#).unwrap();
        assert!(empty_type.validate().is_err());

        let too_many: AddPointsRequest =
            serde_json::from_str(r#"{"points": 1000000, "type": "game"}"#).unwrap();
        assert!(too_many.validate().is_err());
    }

    #[test]
    fn test_grant_details_embed_catalog_entry() {
        let catalog = CatalogService::seeded();
        let grants = vec![
            UserBadge::new(1, 5, Utc::now()),
            UserBadge::new(1, 999, Utc::now()),
        ];

        let details = badge_details(&catalog, grants);
        assert_eq!(details.len(), 1);

        let json = serde_json::to_value(&details[0]).unwrap();
        assert_eq!(json["badgeId"], 5);
        assert_eq!(json["badge"]["requiredValue"], 7);
        assert_eq!(json["badge"]["category"], "sign_in");
    }
}

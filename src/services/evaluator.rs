// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Achievement and badge threshold evaluation.
//!
//! Evaluation is a threshold scan over the catalog: every entry the user
//! does not hold yet and whose threshold the metric meets is granted in the
//! same pass. Grants are create-if-absent, so concurrent passes for the same
//! user produce one grant per entry.

use crate::db::Db;
use crate::error::{AppError, Result};
use crate::models::points::total_points;
use crate::models::{BadgeCategory, UserAchievement, UserBadge};
use crate::services::CatalogService;
use chrono::Utc;
use std::sync::Arc;

/// Grants achievements and badges against the shared catalog.
#[derive(Clone)]
pub struct Evaluator {
    db: Db,
    catalog: Arc<CatalogService>,
}

impl Evaluator {
    pub fn new(db: Db, catalog: Arc<CatalogService>) -> Self {
        Self { db, catalog }
    }

    /// Grant every achievement the user's current point total qualifies for.
    ///
    /// Returns the grants created by this call.
    pub async fn evaluate_achievements(&self, user_id: u64) -> Result<Vec<UserAchievement>> {
        let records = self.db.point_records_for_user(user_id).await?;
        let total = total_points(&records);

        let mut granted = Vec::new();
        for achievement in self.catalog.achievements() {
            if self
                .db
                .get_user_achievement(user_id, achievement.id)
                .await?
                .is_some()
            {
                continue;
            }
            if total < achievement.required_points {
                continue;
            }

            let grant = UserAchievement::new(user_id, achievement.id, Utc::now());
            if self.db.insert_user_achievement(&grant).await? {
                tracing::info!(
                    user_id,
                    achievement_id = achievement.id,
                    total_points = total,
                    "Achievement granted"
                );
                granted.push(grant);
            }
        }

        Ok(granted)
    }

    /// Grant every badge of `category` whose threshold `metric` meets.
    ///
    /// Badges of other categories are never consulted.
    pub async fn evaluate_badges(
        &self,
        user_id: u64,
        category: BadgeCategory,
        metric: i64,
    ) -> Result<Vec<UserBadge>> {
        let mut granted = Vec::new();
        for badge in self.catalog.badges_in(category) {
            if self.db.get_user_badge(user_id, badge.id).await?.is_some() {
                continue;
            }
            if metric < badge.required_value {
                continue;
            }

            let grant = UserBadge::new(user_id, badge.id, Utc::now());
            if self.db.insert_user_badge(&grant).await? {
                tracing::info!(
                    user_id,
                    badge_id = badge.id,
                    %category,
                    metric,
                    "Badge granted"
                );
                granted.push(grant);
            }
        }

        Ok(granted)
    }

    /// Best-effort [`Self::evaluate_achievements`]: failures are logged and
    /// yield no grants, so the triggering action still succeeds.
    pub async fn achievements_best_effort(&self, user_id: u64) -> Vec<UserAchievement> {
        match self.evaluate_achievements(user_id).await {
            Ok(granted) => granted,
            Err(e) => {
                tracing::warn!(user_id, error = %e, "Achievement evaluation failed");
                Vec::new()
            }
        }
    }

    /// Best-effort [`Self::evaluate_badges`].
    pub async fn badges_best_effort(
        &self,
        user_id: u64,
        category: BadgeCategory,
        metric: i64,
    ) -> Vec<UserBadge> {
        match self.evaluate_badges(user_id, category, metric).await {
            Ok(granted) => granted,
            Err(e) => {
                tracing::warn!(
                    user_id,
                    %category,
                    metric,
                    error = %e,
                    "Badge evaluation failed"
                );
                Vec::new()
            }
        }
    }

    /// Administrative grant: no threshold check.
    pub async fn grant_badge(&self, user_id: u64, badge_id: u32) -> Result<UserBadge> {
        if self.catalog.badge(badge_id).is_none() {
            return Err(AppError::NotFound(format!("Badge {} not found", badge_id)));
        }

        if self.db.get_user_badge(user_id, badge_id).await?.is_some() {
            return Err(AppError::AlreadyGranted);
        }

        let grant = UserBadge::new(user_id, badge_id, Utc::now());
        if !self.db.insert_user_badge(&grant).await? {
            return Err(AppError::AlreadyGranted);
        }

        tracing::info!(user_id, badge_id, "Badge granted manually");
        Ok(grant)
    }
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Flashcard learning progress.

use crate::db::Db;
use crate::error::Result;
use crate::models::{BadgeCategory, LearningProgress, UserBadge};
use crate::services::Evaluator;
use chrono::{DateTime, Utc};

/// Result of marking a flashcard learned or unlearned.
#[derive(Debug, Clone)]
pub struct ProgressUpdate {
    pub progress: LearningProgress,
    /// Flashcards the user has learned after this update
    pub learned_count: u32,
    pub new_badges: Vec<UserBadge>,
}

#[derive(Clone)]
pub struct ProgressService {
    db: Db,
    evaluator: Evaluator,
}

impl ProgressService {
    pub fn new(db: Db, evaluator: Evaluator) -> Self {
        Self { db, evaluator }
    }

    /// Set the learned flag for one flashcard, then evaluate learning badges
    /// against the number of learned flashcards.
    ///
    /// Unlearning lowers the count but never revokes a badge.
    pub async fn update(
        &self,
        user_id: u64,
        flashcard_id: u32,
        is_learned: bool,
        now: DateTime<Utc>,
    ) -> Result<ProgressUpdate> {
        let progress = LearningProgress {
            id: LearningProgress::key(user_id, flashcard_id),
            user_id,
            flashcard_id,
            is_learned,
            learned_at: is_learned.then_some(now),
            updated_at: now,
        };
        self.db.upsert_progress(&progress).await?;

        let learned_count = self
            .list(user_id)
            .await?
            .iter()
            .filter(|p| p.is_learned)
            .count() as u32;

        let new_badges = self
            .evaluator
            .badges_best_effort(user_id, BadgeCategory::Learning, i64::from(learned_count))
            .await;

        tracing::debug!(
            user_id,
            flashcard_id,
            is_learned,
            learned_count,
            "Learning progress updated"
        );

        Ok(ProgressUpdate {
            progress,
            learned_count,
            new_badges,
        })
    }

    /// Progress rows ordered by flashcard ID.
    pub async fn list(&self, user_id: u64) -> Result<Vec<LearningProgress>> {
        self.db.progress_for_user(user_id).await
    }
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Points ledger.
//!
//! Point records are append-only; a user's total is always re-derived by
//! summing them.

use crate::db::Db;
use crate::error::Result;
use crate::models::points::total_points;
use crate::models::{NewPointRecord, PointRecord, UserAchievement};
use crate::services::Evaluator;
use chrono::Utc;

/// A user's total and full point history.
#[derive(Debug, Clone)]
pub struct PointsSummary {
    pub total_points: i64,
    /// Newest first
    pub records: Vec<PointRecord>,
}

/// Result of awarding points.
#[derive(Debug, Clone)]
pub struct PointsAward {
    pub record: PointRecord,
    /// Achievements newly granted by this award
    pub new_achievements: Vec<UserAchievement>,
}

#[derive(Clone)]
pub struct PointsLedger {
    db: Db,
    evaluator: Evaluator,
}

impl PointsLedger {
    pub fn new(db: Db, evaluator: Evaluator) -> Self {
        Self { db, evaluator }
    }

    /// Append a point record. Does not evaluate achievements; use
    /// [`Self::award_points`] for that.
    pub async fn record_points(
        &self,
        user_id: u64,
        points: i64,
        kind: &str,
        description: Option<String>,
    ) -> Result<PointRecord> {
        let record = self
            .db
            .insert_point_record(NewPointRecord {
                user_id,
                points,
                kind: kind.to_string(),
                description,
                created_at: Utc::now(),
            })
            .await?;

        tracing::debug!(
            user_id,
            points,
            kind,
            record_id = %record.id,
            "Points recorded"
        );
        Ok(record)
    }

    /// Append a point record and then evaluate achievements against the new
    /// total. Evaluation always completes before this returns; its failures
    /// are logged and do not fail the award.
    pub async fn award_points(
        &self,
        user_id: u64,
        points: i64,
        kind: &str,
        description: Option<String>,
    ) -> Result<PointsAward> {
        let record = self
            .record_points(user_id, points, kind, description)
            .await?;
        let new_achievements = self.evaluator.achievements_best_effort(user_id).await;

        Ok(PointsAward {
            record,
            new_achievements,
        })
    }

    /// [`Self::award_points`] under a caller-chosen record ID.
    ///
    /// Returns `None` without evaluating anything if a record with `id`
    /// already exists.
    pub async fn award_points_once(
        &self,
        id: String,
        user_id: u64,
        points: i64,
        kind: &str,
        description: Option<String>,
    ) -> Result<Option<PointsAward>> {
        let record = NewPointRecord {
            user_id,
            points,
            kind: kind.to_string(),
            description,
            created_at: Utc::now(),
        }
        .with_id(id);

        if !self.db.insert_point_record_once(&record).await? {
            tracing::debug!(user_id, record_id = %record.id, "Point record already exists");
            return Ok(None);
        }

        tracing::debug!(user_id, points, kind, record_id = %record.id, "Points recorded");
        let new_achievements = self.evaluator.achievements_best_effort(user_id).await;

        Ok(Some(PointsAward {
            record,
            new_achievements,
        }))
    }

    pub async fn total_points(&self, user_id: u64) -> Result<i64> {
        let records = self.db.point_records_for_user(user_id).await?;
        Ok(total_points(&records))
    }

    pub async fn history(&self, user_id: u64) -> Result<PointsSummary> {
        let records = self.db.point_records_for_user(user_id).await?;
        Ok(PointsSummary {
            total_points: total_points(&records),
            records,
        })
    }
}

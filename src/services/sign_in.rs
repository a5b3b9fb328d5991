// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Daily sign-in tracking.
//!
//! Handles the sign-in workflow:
//! 1. Reject a second sign-in on the same calendar day
//! 2. Store the sign-in
//! 3. Compute the consecutive-day streak ending today
//! 4. Award the streak-tiered bonus through the ledger, keyed by day
//! 5. Evaluate achievements and sign-in badges

use crate::db::Db;
use crate::error::{AppError, Result};
use crate::models::points::SIGN_IN_POINTS_TYPE;
use crate::models::{BadgeCategory, PointRecord, SignInEvent, UserAchievement, UserBadge};
use crate::services::{Evaluator, PointsLedger};
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};

/// Bonus tiers, highest first: (minimum streak, points).
const SIGN_IN_BONUS_TIERS: [(u32, i64); 2] = [(7, 50), (3, 30)];
const BASE_SIGN_IN_POINTS: i64 = 10;

/// Points awarded for a sign-in that completes a `streak`-day run.
pub fn sign_in_bonus(streak: u32) -> i64 {
    SIGN_IN_BONUS_TIERS
        .iter()
        .find(|(min_streak, _)| streak >= *min_streak)
        .map(|(_, points)| *points)
        .unwrap_or(BASE_SIGN_IN_POINTS)
}

/// Length of the run of consecutive days ending at `head`.
///
/// `head` itself counts as one day. `history` holds earlier sign-in days,
/// most recent first; entries on or after `head` are ignored. The walk stops
/// at the first gap that is not exactly one day, even if older runs exist.
pub fn consecutive_days(head: NaiveDate, history: &[NaiveDate]) -> u32 {
    let mut streak = 1;
    let mut current = head;

    for &day in history.iter().filter(|d| **d < head) {
        if current.signed_duration_since(day).num_days() != 1 {
            break;
        }
        streak += 1;
        current = day;
    }

    streak
}

/// Calendar day of `now` in the given offset.
pub fn calendar_day(now: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    now.with_timezone(&offset).date_naive()
}

/// Result of a successful sign-in.
#[derive(Debug, Clone)]
pub struct SignInOutcome {
    pub sign_in: SignInEvent,
    pub consecutive_days: u32,
    pub sign_in_points: i64,
    pub new_achievements: Vec<UserAchievement>,
    pub new_badges: Vec<UserBadge>,
}

/// Where a user stands today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignInStatus {
    pub signed_in_today: bool,
    /// Streak through today, or through yesterday if today is still open
    pub current_streak: u32,
}

#[derive(Clone)]
pub struct SignInTracker {
    db: Db,
    ledger: PointsLedger,
    evaluator: Evaluator,
    day_offset: FixedOffset,
}

impl SignInTracker {
    pub fn new(db: Db, ledger: PointsLedger, evaluator: Evaluator, day_offset: FixedOffset) -> Self {
        Self {
            db,
            ledger,
            evaluator,
            day_offset,
        }
    }

    /// Sign a user in for the calendar day containing `now`.
    ///
    /// The bonus is stored under a per-day key. A day whose sign-in was
    /// stored but whose bonus was not is completed by the next attempt.
    pub async fn sign_in(&self, user_id: u64, now: DateTime<Utc>) -> Result<SignInOutcome> {
        let today = calendar_day(now, self.day_offset);
        let bonus_id = PointRecord::sign_in_key(user_id, today);

        let sign_in = match self.db.get_sign_in(user_id, today).await? {
            Some(existing) => {
                if self.db.get_point_record(user_id, &bonus_id).await?.is_some() {
                    return Err(AppError::AlreadySignedInToday);
                }
                tracing::warn!(user_id, %today, "Completing sign-in that is missing its bonus");
                existing
            }
            None => {
                let event = SignInEvent::new(user_id, today, now);
                if !self.db.insert_sign_in(&event).await? {
                    // A concurrent request for the same day got there first
                    tracing::info!(user_id, %today, "Lost sign-in race, rejecting duplicate");
                    return Err(AppError::AlreadySignedInToday);
                }
                event
            }
        };

        let consecutive_days = self.streak_ending(user_id, today).await?;
        let sign_in_points = sign_in_bonus(consecutive_days);
        let description = if consecutive_days == 1 {
            "Sign-in streak: 1 day".to_string()
        } else {
            format!("Sign-in streak: {} days", consecutive_days)
        };

        let award = match self
            .ledger
            .award_points_once(
                bonus_id,
                user_id,
                sign_in_points,
                SIGN_IN_POINTS_TYPE,
                Some(description),
            )
            .await
        {
            Ok(Some(award)) => award,
            Ok(None) => return Err(AppError::AlreadySignedInToday),
            Err(e) => {
                tracing::error!(
                    user_id,
                    %today,
                    error = %e,
                    "Sign-in stored without its bonus"
                );
                return Err(e);
            }
        };

        let new_badges = self
            .evaluator
            .badges_best_effort(user_id, BadgeCategory::SignIn, i64::from(consecutive_days))
            .await;

        tracing::info!(
            user_id,
            %today,
            consecutive_days,
            sign_in_points,
            new_achievements = award.new_achievements.len(),
            new_badges = new_badges.len(),
            "User signed in"
        );

        Ok(SignInOutcome {
            sign_in,
            consecutive_days,
            sign_in_points,
            new_achievements: award.new_achievements,
            new_badges,
        })
    }

    /// Sign-in state for the calendar day containing `now`.
    pub async fn status(&self, user_id: u64, now: DateTime<Utc>) -> Result<SignInStatus> {
        let today = calendar_day(now, self.day_offset);
        let history = self.history(user_id).await?;

        let signed_in_today = history.contains(&today);
        let current_streak = if signed_in_today {
            consecutive_days(today, &history)
        } else {
            match today.pred_opt() {
                Some(yesterday) if history.contains(&yesterday) => {
                    consecutive_days(yesterday, &history)
                }
                _ => 0,
            }
        };

        Ok(SignInStatus {
            signed_in_today,
            current_streak,
        })
    }

    /// Streak a sign-in on `today` would complete.
    async fn streak_ending(&self, user_id: u64, today: NaiveDate) -> Result<u32> {
        let Some(yesterday) = today.pred_opt() else {
            return Ok(1);
        };

        if self.db.get_sign_in(user_id, yesterday).await?.is_none() {
            return Ok(1);
        }

        let history = self.history(user_id).await?;
        Ok(consecutive_days(today, &history))
    }

    /// Sign-in days, most recent first.
    async fn history(&self, user_id: u64) -> Result<Vec<NaiveDate>> {
        Ok(self
            .db
            .sign_ins_for_user(user_id)
            .await?
            .into_iter()
            .map(|s| s.sign_in_date)
            .collect())
    }
}
